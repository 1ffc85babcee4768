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
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use crate::bigint::BigInt;

/// The Whitespace program's addressable store, `BigInt -> BigInt`.
/// Open-addressed with the same probing scheme as the label
/// resolver's map (initial capacity 16, grows ×4 at a 2/3 load
/// factor); never shrinks. `set` overwrites an existing key; `get`
/// on an absent key is the caller's job to turn into a fatal error.
pub struct Heap {
    capacity: usize,
    len: usize,
    slots: Vec<Option<(BigInt, BigInt)>>,
}

impl Heap {
    const INITIAL_CAPACITY: usize = 16;
    const GROWTH_FACTOR: usize = 4;

    pub fn new() -> Heap {
        Heap {
            capacity: Self::INITIAL_CAPACITY,
            len: 0,
            slots: (0..Self::INITIAL_CAPACITY).map(|_| None).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn set(&mut self, key: BigInt, value: BigInt) {
        if self.should_grow() {
            self.grow();
        }
        self.set_no_grow(key, value);
    }

    pub fn get(&self, key: &BigInt) -> Option<&BigInt> {
        let hash = hash_of(key);
        for pos in probe_sequence(hash, self.capacity) {
            match &self.slots[pos] {
                None => return None,
                Some((k, v)) if k == key => return Some(v),
                _ => continue,
            }
        }
        None
    }

    fn should_grow(&self) -> bool {
        (self.len + 1) * 3 > self.capacity * 2
    }

    fn set_no_grow(&mut self, key: BigInt, value: BigInt) {
        let hash = hash_of(&key);
        for pos in probe_sequence(hash, self.capacity) {
            match &mut self.slots[pos] {
                None => {
                    self.slots[pos] = Some((key, value));
                    self.len += 1;
                    return;
                }
                Some((k, v)) if *k == key => {
                    *v = value;
                    return;
                }
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
            self.set_no_grow(entry.0, entry.1);
        }
    }
}

impl Default for Heap {
    fn default() -> Self {
        Heap::new()
    }
}

fn hash_of(key: &BigInt) -> i64 {
    let mut hasher = DefaultHasher::new();
    key.hash(&mut hasher);
    hasher.finish() as i64
}

fn probe_sequence(hash: i64, capacity: usize) -> impl Iterator<Item = usize> {
    let cap = capacity as i64;
    let mut pos = hash.rem_euclid(cap);
    let mut perturb = hash;
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_then_get() {
        let mut heap = Heap::new();
        heap.set(BigInt::from_i32(1), BigInt::from_i32(42));
        assert_eq!(heap.get(&BigInt::from_i32(1)), Some(&BigInt::from_i32(42)));
    }

    #[test]
    fn test_get_missing_is_none() {
        let heap = Heap::new();
        assert_eq!(heap.get(&BigInt::from_i32(7)), None);
    }

    #[test]
    fn test_set_overwrites() {
        let mut heap = Heap::new();
        heap.set(BigInt::from_i32(1), BigInt::from_i32(1));
        heap.set(BigInt::from_i32(1), BigInt::from_i32(2));
        assert_eq!(heap.len(), 1);
        assert_eq!(heap.get(&BigInt::from_i32(1)), Some(&BigInt::from_i32(2)));
    }

    #[test]
    fn test_grows_past_load_factor() {
        let mut heap = Heap::new();
        for i in 0..500 {
            heap.set(BigInt::from_i32(i), BigInt::from_i32(i * 2));
        }
        for i in 0..500 {
            assert_eq!(heap.get(&BigInt::from_i32(i)), Some(&BigInt::from_i32(i * 2)));
        }
    }

    #[test]
    fn test_keys_equal_regardless_of_bigint_form() {
        let mut heap = Heap::new();
        let small_built = BigInt::from_i32(5);
        let via_arithmetic = BigInt::from_i32(2).add(&BigInt::from_i32(3));
        heap.set(small_built, BigInt::from_i32(100));
        assert_eq!(heap.get(&via_arithmetic), Some(&BigInt::from_i32(100)));
    }
}
