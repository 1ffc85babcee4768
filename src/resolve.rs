// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//    http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
use crate::command::{Command, Opcode};
use crate::errors::ResolveError;
use crate::label::Label;
use crate::program::Program;

/// Open-addressed `Label -> usize` table, live only for the duration
/// of resolution. Probing follows CPython's dict scheme: `pos =
/// (pos*5 + 1 + perturb) mod cap`, `perturb >>= 5`, seeded from the
/// label's own hash.
struct LabelMap {
    capacity: usize,
    len: usize,
    slots: Vec<Option<(Label, usize)>>,
}

impl LabelMap {
    const INITIAL_CAPACITY: usize = 16;
    const GROWTH_FACTOR: usize = 4;

    fn new() -> LabelMap {
        LabelMap {
            capacity: Self::INITIAL_CAPACITY,
            len: 0,
            slots: (0..Self::INITIAL_CAPACITY).map(|_| None).collect(),
        }
    }

    fn should_grow(&self) -> bool {
        (self.len + 1) * 3 > self.capacity * 2
    }

    /// `true` if inserted, `false` if an equal key was already present.
    fn insert(&mut self, label: Label, value: usize) -> bool {
        if self.should_grow() {
            self.grow();
        }
        self.insert_no_grow(label, value)
    }

    fn insert_no_grow(&mut self, label: Label, value: usize) -> bool {
        let hash = label.probe_hash();
        for pos in probe_sequence(hash, self.capacity) {
            match &self.slots[pos] {
                None => {
                    self.slots[pos] = Some((label, value));
                    self.len += 1;
                    return true;
                }
                Some((k, _)) if *k == label => return false,
                _ => continue,
            }
        }
        unreachable!("probe sequence must eventually find a slot")
    }

    fn grow(&mut self) {
        let old = std::mem::take(&mut self.slots);
        self.capacity *= Self::GROWTH_FACTOR;
        self.slots = (0..self.capacity).map(|_| None).collect();
        self.len = 0;
        for entry in old.into_iter().flatten() {
            self.insert_no_grow(entry.0, entry.1);
        }
    }

    fn get(&self, label: &Label) -> Option<usize> {
        let hash = label.probe_hash();
        for pos in probe_sequence(hash, self.capacity) {
            match &self.slots[pos] {
                None => return None,
                Some((k, v)) if k == label => return Some(*v),
                _ => continue,
            }
        }
        None
    }
}

fn probe_sequence(hash: i32, capacity: usize) -> impl Iterator<Item = usize> {
    let cap = capacity as i64;
    let mut pos = (hash as i64).rem_euclid(cap);
    let mut perturb = hash as i64;
    let mut first = true;
    std::iter::from_fn(move || {
        if !first {
            pos = (pos.wrapping_mul(5).wrapping_add(1).wrapping_add(perturb)).rem_euclid(cap);
            perturb >>= 5;
        }
        first = false;
        Some(pos as usize)
    })
}

/// Replace every symbolic `Label` in `program` with an absolute
/// command index: a two-pass algorithm matching the source's
/// `ws_compile` (first pass records `label` definitions, second
/// pass rewrites jump-family references).
pub fn resolve(program: &mut Program) -> Result<(), ResolveError> {
    if program.is_resolved() {
        return Err(ResolveError::AlreadyResolved);
    }

    let mut map = LabelMap::new();
    let mut worklist = Vec::new();
    let len = program.len();

    for i in 0..len {
        let op = program.commands()[i].opcode();
        if op == Opcode::Label {
            let old = std::mem::replace(&mut program.commands_mut()[i], Command::Plain(op));
            if let Command::WithLabel(_, label) = old {
                if !map.insert(label, i) {
                    return Err(ResolveError::DuplicateLabel { command: i });
                }
            }
            program.commands_mut()[i] = Command::WithOffset(op, i);
        } else if op.takes_label() {
            worklist.push(i);
        }
    }

    for i in worklist {
        let op = program.commands()[i].opcode();
        let old = std::mem::replace(&mut program.commands_mut()[i], Command::Plain(op));
        if let Command::WithLabel(_, label) = old {
            match map.get(&label) {
                Some(offset) => program.commands_mut()[i] = Command::WithOffset(op, offset),
                None => return Err(ResolveError::UndefinedLabel { command: i }),
            }
        }
    }

    program.set_resolved(true);
    log::debug!("resolved {len} commands, {} labels defined", map.len);
    Ok(())
}
