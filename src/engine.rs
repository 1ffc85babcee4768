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
use std::io::{Read, Write};

use crate::bigint::BigInt;
use crate::command::{Command, Opcode};
use crate::errors::EngineError;
use crate::heap::Heap;
use crate::program::Program;
use crate::stack::Stack;

/// The fetch-dispatch-advance loop over a resolved `Program`,
/// generic over the I/O handles `inputchar`/`inputnum` and
/// `printchar`/`printnum` use, so tests can run against an in-memory
/// buffer instead of the real console.
pub struct Engine<'p, R, W> {
    program: &'p Program,
    pc: usize,
    stack: Stack<BigInt>,
    callstack: Stack<usize>,
    heap: Heap,
    stdin: R,
    stdout: W,
}

impl<'p, R: Read, W: Write> Engine<'p, R, W> {
    pub fn new(program: &'p Program, stdin: R, stdout: W) -> Result<Self, EngineError> {
        if !program.is_resolved() {
            return Err(EngineError::NotResolved);
        }
        Ok(Engine {
            program,
            pc: 0,
            stack: Stack::new(),
            callstack: Stack::new(),
            heap: Heap::new(),
            stdin,
            stdout,
        })
    }

    pub fn heap_len(&self) -> usize {
        self.heap.len()
    }

    /// Run until `endprogram` or a fatal error. Returns `Ok(())` on
    /// a clean halt; falling off the end of the program is itself a
    /// fatal `EngineError::OutOfBounds`.
    pub fn run(&mut self) -> Result<(), EngineError> {
        loop {
            if self.pc >= self.program.len() {
                return Err(EngineError::OutOfBounds { pc: self.pc });
            }
            let program = self.program;
            let command = &program.commands()[self.pc];
            self.pc += 1;
            log::trace!("pc={} dispatch {command}", self.pc - 1);
            if self.dispatch(command)? {
                return Ok(());
            }
        }
    }

    /// Returns `true` when the command halted execution.
    fn dispatch(&mut self, command: &Command) -> Result<bool, EngineError> {
        match command.opcode() {
            Opcode::Push => {
                self.stack.push(command.int().expect("push without operand").clone());
            }
            Opcode::Duplicate => {
                let top = self.stack.top().cloned().ok_or(EngineError::StackUnderflow)?;
                self.stack.push(top);
            }
            Opcode::Copy => {
                let n = command.int().expect("copy without operand");
                let index = self.bounded_index(n)?;
                let value = self.stack.at(index).cloned().ok_or(EngineError::StackUnderflow)?;
                self.stack.push(value);
            }
            Opcode::Swap => {
                let top = self.stack.pop().ok_or(EngineError::StackUnderflow)?;
                let second = self.stack.pop().ok_or(EngineError::StackUnderflow)?;
                self.stack.push(top);
                self.stack.push(second);
            }
            Opcode::Discard => {
                self.stack.pop().ok_or(EngineError::StackUnderflow)?;
            }
            Opcode::Slide => {
                let n = command.int().expect("slide without operand");
                let index = self.bounded_index(n)?;
                self.stack.slide(index);
            }
            Opcode::Add => self.binary_op(BigInt::add)?,
            Opcode::Subtract => self.binary_op(BigInt::subtract)?,
            Opcode::Multiply => self.binary_op(BigInt::multiply)?,
            Opcode::Divide => self.binary_op_fallible(|a, b| a.divide(b))?,
            Opcode::Modulo => self.binary_op_fallible(|a, b| a.modulo(b))?,
            Opcode::Set => {
                let value = self.stack.pop().ok_or(EngineError::StackUnderflow)?;
                let key = self.stack.pop().ok_or(EngineError::StackUnderflow)?;
                self.heap.set(key, value);
            }
            Opcode::Get => {
                let key = self.stack.pop().ok_or(EngineError::StackUnderflow)?;
                let value = self.heap.get(&key).ok_or(EngineError::HeapMiss)?.clone();
                self.stack.push(value);
            }
            Opcode::Label => {}
            Opcode::Call => {
                let target = command.offset().expect("call without offset");
                self.callstack.push(self.pc);
                self.pc = target;
            }
            Opcode::Jump => {
                self.pc = command.offset().expect("jump without offset");
            }
            Opcode::JumpIfZero => {
                let v = self.stack.pop().ok_or(EngineError::StackUnderflow)?;
                if v.iszero() {
                    self.pc = command.offset().expect("jumpifzero without offset");
                }
            }
            Opcode::JumpIfNegative => {
                let v = self.stack.pop().ok_or(EngineError::StackUnderflow)?;
                if v.isnegative() {
                    self.pc = command.offset().expect("jumpifnegative without offset");
                }
            }
            Opcode::EndSubroutine => {
                self.pc = self.callstack.pop().ok_or(EngineError::CallstackUnderflow)?;
            }
            Opcode::EndProgram => {
                if !self.callstack.is_empty() {
                    log::warn!("endprogram with {} pending call frame(s)", self.callstack.len());
                }
                return Ok(true);
            }
            Opcode::PrintChar => {
                let v = self.stack.pop().ok_or(EngineError::StackUnderflow)?;
                self.stdout.write_all(&[v.low_byte()])?;
            }
            Opcode::PrintNum => {
                let v = self.stack.pop().ok_or(EngineError::StackUnderflow)?;
                self.stdout.write_all(v.to_decimal_string().as_bytes())?;
            }
            Opcode::InputChar => {
                let key = self.stack.top().cloned().ok_or(EngineError::StackUnderflow)?;
                let mut byte = [0u8; 1];
                self.stdin.read_exact(&mut byte)?;
                self.heap.set(key, BigInt::from_i32(byte[0] as i32));
            }
            Opcode::InputNum => {
                let key = self.stack.top().cloned().ok_or(EngineError::StackUnderflow)?;
                let value = BigInt::read_decimal(&mut self.stdin)?;
                self.heap.set(key, value);
            }
        }
        Ok(false)
    }

    fn bounded_index(&self, n: &BigInt) -> Result<usize, EngineError> {
        let index = n.to_i32_saturating();
        if index < 0 || index as usize >= self.stack.len() {
            return Err(EngineError::BadIndex {
                index,
                len: self.stack.len(),
            });
        }
        Ok(index as usize)
    }

    fn binary_op(&mut self, op: impl Fn(&BigInt, &BigInt) -> BigInt) -> Result<(), EngineError> {
        let b = self.stack.pop().ok_or(EngineError::StackUnderflow)?;
        let a = self.stack.pop().ok_or(EngineError::StackUnderflow)?;
        self.stack.push(op(&a, &b));
        Ok(())
    }

    fn binary_op_fallible(
        &mut self,
        op: impl Fn(&BigInt, &BigInt) -> Option<BigInt>,
    ) -> Result<(), EngineError> {
        let b = self.stack.pop().ok_or(EngineError::StackUnderflow)?;
        let a = self.stack.pop().ok_or(EngineError::StackUnderflow)?;
        let result = op(&a, &b).ok_or(EngineError::DivideByZero)?;
        self.stack.push(result);
        Ok(())
    }
}
