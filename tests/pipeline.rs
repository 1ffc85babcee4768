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

//! End-to-end round trips: parse -> resolve -> serialize -> deserialize
//! -> execute, checked against stdout. Sources are built programmatically
//! from `Opcode::prefix()` rather than hand-typed whitespace literals, to
//! avoid transcription mistakes.

use wsil::command::Opcode;
use wsil::{parser, resolve, serialize, Engine};

fn push_bytes(magnitude: u32, negative: bool) -> Vec<u8> {
    let mut bits = Vec::new();
    bits.push(negative);
    if magnitude == 0 {
        // A sign bit alone with no magnitude bits decodes to zero.
    } else {
        let width = 32 - magnitude.leading_zeros();
        for i in (0..width).rev() {
            bits.push((magnitude >> i) & 1 == 1);
        }
    }
    bits.into_iter().map(|b| if b { b'\t' } else { b' ' }).collect()
}

fn emit_push(src: &mut Vec<u8>, value: i32) {
    src.extend_from_slice(Opcode::Push.prefix().as_bytes());
    src.extend_from_slice(&push_bytes(value.unsigned_abs(), value < 0));
    src.push(b'\n');
}

fn emit_plain(src: &mut Vec<u8>, op: Opcode) {
    src.extend_from_slice(op.prefix().as_bytes());
}

fn run_source(src: &[u8], stdin: &str) -> String {
    let mut program = parser::parse(src).unwrap();
    resolve::resolve(&mut program).unwrap();

    // Round-trip the resolved program through the binary format before
    // executing it, so the serializer is exercised on every scenario.
    let bytes = serialize::serialize(&program);
    let program = serialize::deserialize(&bytes).unwrap();

    let mut stdout = Vec::new();
    let mut engine = Engine::new(&program, stdin.as_bytes(), &mut stdout).unwrap();
    engine.run().unwrap();
    String::from_utf8(stdout).unwrap()
}

#[test]
fn print_a_and_halt() {
    let mut src = Vec::new();
    emit_push(&mut src, b'A' as i32);
    emit_plain(&mut src, Opcode::PrintChar);
    emit_plain(&mut src, Opcode::EndProgram);
    assert_eq!(run_source(&src, ""), "A");
}

#[test]
fn arithmetic_three_plus_four() {
    let mut src = Vec::new();
    emit_push(&mut src, 3);
    emit_push(&mut src, 4);
    emit_plain(&mut src, Opcode::Add);
    emit_plain(&mut src, Opcode::PrintNum);
    emit_plain(&mut src, Opcode::EndProgram);
    assert_eq!(run_source(&src, ""), "7");
}

#[test]
fn heap_store_and_load() {
    let mut src = Vec::new();
    emit_push(&mut src, 1);
    emit_push(&mut src, 42);
    emit_plain(&mut src, Opcode::Set);
    emit_push(&mut src, 1);
    emit_plain(&mut src, Opcode::Get);
    emit_plain(&mut src, Opcode::PrintNum);
    emit_plain(&mut src, Opcode::EndProgram);
    assert_eq!(run_source(&src, ""), "42");
}

#[test]
fn echoes_one_input_char() {
    let mut src = Vec::new();
    emit_push(&mut src, 0);
    emit_plain(&mut src, Opcode::InputChar);
    emit_push(&mut src, 0);
    emit_plain(&mut src, Opcode::Get);
    emit_plain(&mut src, Opcode::PrintChar);
    emit_plain(&mut src, Opcode::EndProgram);
    assert_eq!(run_source(&src, "Q"), "Q");
}

#[test]
fn copy_indexes_from_the_bottom_of_the_stack() {
    let mut src = Vec::new();
    emit_push(&mut src, 10); // bottom, index 0
    emit_push(&mut src, 20); // index 1
    emit_push(&mut src, 30); // index 2, top
    src.extend_from_slice(Opcode::Copy.prefix().as_bytes());
    src.extend_from_slice(&push_bytes(0, false));
    src.push(b'\n');
    emit_plain(&mut src, Opcode::PrintNum);
    emit_plain(&mut src, Opcode::EndProgram);
    assert_eq!(run_source(&src, ""), "10");
}

#[test]
fn parser_ignores_interleaved_comment_bytes() {
    let mut clean = Vec::new();
    emit_push(&mut clean, b'Z' as i32);
    emit_plain(&mut clean, Opcode::PrintChar);
    emit_plain(&mut clean, Opcode::EndProgram);

    let mut noisy = Vec::new();
    for &b in &clean {
        noisy.push(b'#');
        noisy.push(b);
    }

    assert_eq!(run_source(&clean, ""), run_source(&noisy, ""));
}

#[test]
fn divide_by_zero_is_a_runtime_fault() {
    let mut src = Vec::new();
    emit_push(&mut src, 1);
    emit_push(&mut src, 0);
    emit_plain(&mut src, Opcode::Divide);
    emit_plain(&mut src, Opcode::EndProgram);

    let mut program = parser::parse(&src).unwrap();
    resolve::resolve(&mut program).unwrap();
    let mut stdout = Vec::new();
    let mut engine = Engine::new(&program, std::io::empty(), &mut stdout).unwrap();
    assert!(engine.run().is_err());
}
