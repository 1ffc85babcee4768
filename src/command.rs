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
use std::fmt;

use crate::bigint::BigInt;
use crate::label::Label;

/// One of the 24 Whitespace operations. Declaration order matches
/// the source's opcode table, since the prefix/parameter/label
/// tables below are indexed by it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Opcode {
    Push = 0,
    Duplicate = 1,
    Copy = 2,
    Swap = 3,
    Discard = 4,
    Slide = 5,
    Add = 6,
    Subtract = 7,
    Multiply = 8,
    Divide = 9,
    Modulo = 10,
    Set = 11,
    Get = 12,
    Label = 13,
    Call = 14,
    Jump = 15,
    JumpIfZero = 16,
    JumpIfNegative = 17,
    EndSubroutine = 18,
    EndProgram = 19,
    PrintChar = 20,
    PrintNum = 21,
    InputChar = 22,
    InputNum = 23,
}

pub const OPCODE_COUNT: usize = 24;

const ALL_OPCODES: [Opcode; OPCODE_COUNT] = [
    Opcode::Push,
    Opcode::Duplicate,
    Opcode::Copy,
    Opcode::Swap,
    Opcode::Discard,
    Opcode::Slide,
    Opcode::Add,
    Opcode::Subtract,
    Opcode::Multiply,
    Opcode::Divide,
    Opcode::Modulo,
    Opcode::Set,
    Opcode::Get,
    Opcode::Label,
    Opcode::Call,
    Opcode::Jump,
    Opcode::JumpIfZero,
    Opcode::JumpIfNegative,
    Opcode::EndSubroutine,
    Opcode::EndProgram,
    Opcode::PrintChar,
    Opcode::PrintNum,
    Opcode::InputChar,
    Opcode::InputNum,
];

/// Significant-character prefix for each opcode, in table order.
/// Matching is shortest-prefix: the parser tries each entry against
/// the characters read so far.
const PREFIXES: [&str; OPCODE_COUNT] = [
    "  ", " \n ", " \t ", " \n\t", " \n\n", " \t\n", "\t   ", "\t  \t", "\t  \n", "\t \t ",
    "\t \t\t", "\t\t ", "\t\t\t", "\n  ", "\n \t", "\n \n", "\n\t ", "\n\t\t", "\n\t\n", "\n\n\n",
    "\t\n  ", "\t\n \t", "\t\n\t ", "\t\n\t\t",
];

const NAMES: [&str; OPCODE_COUNT] = [
    "push",
    "duplicate",
    "copy",
    "swap",
    "discard",
    "slide",
    "add",
    "subtract",
    "multiply",
    "divide",
    "modulo",
    "set",
    "get",
    "label",
    "call",
    "jump",
    "jumpifzero",
    "jumpifnegative",
    "endsubroutine",
    "endprogram",
    "printchar",
    "printnum",
    "inputchar",
    "inputnum",
];

impl Opcode {
    pub fn all() -> &'static [Opcode; OPCODE_COUNT] {
        &ALL_OPCODES
    }

    pub fn from_index(index: u8) -> Option<Opcode> {
        ALL_OPCODES.get(index as usize).copied()
    }

    pub fn index(self) -> u8 {
        self as u8
    }

    pub fn prefix(self) -> &'static str {
        PREFIXES[self.index() as usize]
    }

    pub fn name(self) -> &'static str {
        NAMES[self.index() as usize]
    }

    pub fn takes_int(self) -> bool {
        matches!(self, Opcode::Push | Opcode::Copy | Opcode::Slide)
    }

    pub fn takes_label(self) -> bool {
        matches!(
            self,
            Opcode::Label
                | Opcode::Call
                | Opcode::Jump
                | Opcode::JumpIfZero
                | Opcode::JumpIfNegative
        )
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single parsed instruction. The payload variant is determined by
/// `opcode.takes_int()`/`takes_label()`, collapsing the source's two
/// parallel boolean tables into pattern matching.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    Plain(Opcode),
    WithInt(Opcode, BigInt),
    WithLabel(Opcode, Label),
    WithOffset(Opcode, usize),
}

impl Command {
    pub fn opcode(&self) -> Opcode {
        match self {
            Command::Plain(op) => *op,
            Command::WithInt(op, _) => *op,
            Command::WithLabel(op, _) => *op,
            Command::WithOffset(op, _) => *op,
        }
    }

    pub fn label(&self) -> Option<&Label> {
        match self {
            Command::WithLabel(_, l) => Some(l),
            _ => None,
        }
    }

    pub fn offset(&self) -> Option<usize> {
        match self {
            Command::WithOffset(_, o) => Some(*o),
            _ => None,
        }
    }

    pub fn int(&self) -> Option<&BigInt> {
        match self {
            Command::WithInt(_, v) => Some(v),
            _ => None,
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Command::Plain(op) => write!(f, "{op}"),
            Command::WithInt(op, v) => write!(f, "{op} {v}"),
            Command::WithLabel(op, l) => write!(f, "{op} {l}"),
            Command::WithOffset(op, o) => write!(f, "{op} {o}"),
        }
    }
}
