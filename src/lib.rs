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

/// Arbitrary-precision integers, the value type of every stack and
/// heap slot.
pub mod bigint;
/// The instruction set: opcodes and the parsed `Command` they carry.
pub mod command;
/// Shared error types for every stage of the pipeline.
pub mod errors;
/// The fetch-dispatch-advance execution loop.
pub mod engine;
/// The `BigInt -> BigInt` addressable store opcodes read and write.
pub mod heap;
/// Symbolic jump targets as they appear before resolution.
pub mod label;
/// Turns a raw Whitespace source buffer into a `Program`.
pub mod parser;
/// An ordered, possibly-unresolved command sequence.
pub mod program;
/// Rewrites symbolic labels into absolute command offsets.
pub mod resolve;
/// The binary on-disk encoding for compiled programs.
pub mod serialize;
/// The operand stack and call stack.
pub mod stack;
/// Byte-level encoding/decoding helpers shared by the serializer.
pub mod util;

pub use bigint::BigInt;
pub use command::{Command, Opcode};
pub use engine::Engine;
pub use errors::Error;
pub use program::Program;
