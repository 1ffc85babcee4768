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
use crate::bigint::BigInt;
use crate::command::{Command, Opcode};
use crate::errors::ParseError;
use crate::label::Label;
use crate::program::Program;

const SPACE: u8 = 0x20;
const TAB: u8 = 0x09;
const LINEFEED: u8 = 0x0A;

fn is_significant(b: u8) -> bool {
    b == SPACE || b == TAB || b == LINEFEED
}

fn match_prefix(buf: &[u8]) -> Option<Opcode> {
    Opcode::all()
        .iter()
        .copied()
        .find(|op| op.prefix().as_bytes() == buf)
}

/// Parse a raw Whitespace source buffer into an unresolved `Program`.
/// Bytes other than space, tab and linefeed are comments and are
/// skipped wherever they appear, including inside an opcode or
/// parameter span.
pub fn parse(source: &[u8]) -> Result<Program, ParseError> {
    let mut commands = Vec::new();
    let mut i = 0usize;
    let len = source.len();

    while i < len {
        while i < len && !is_significant(source[i]) {
            i += 1;
        }
        if i >= len {
            break;
        }
        let command_start = i;

        let mut buf: Vec<u8> = Vec::with_capacity(4);
        let opcode = loop {
            if i >= len {
                return Err(ParseError::Unterminated {
                    position: command_start,
                });
            }
            let b = source[i];
            i += 1;
            if !is_significant(b) {
                continue;
            }
            buf.push(b);
            if buf.len() == 1 {
                continue;
            }
            if let Some(op) = match_prefix(&buf) {
                break op;
            }
            if buf.len() == 4 {
                return Err(ParseError::UnknownOpcode {
                    position: command_start,
                });
            }
        };

        let command = if opcode.takes_int() || opcode.takes_label() {
            let mut bits: Vec<bool> = Vec::new();
            let mut terminated = false;
            while i < len {
                let b = source[i];
                i += 1;
                if !is_significant(b) {
                    continue;
                }
                if b == LINEFEED {
                    terminated = true;
                    break;
                }
                bits.push(b == TAB);
            }
            if !terminated {
                return Err(ParseError::Unterminated {
                    position: command_start,
                });
            }
            if opcode.takes_int() {
                Command::WithInt(opcode, BigInt::from_whitespace(&bits))
            } else {
                Command::WithLabel(opcode, Label::from_bits(&bits))
            }
        } else {
            Command::Plain(opcode)
        };

        log::trace!("parsed {command} at command index {}", commands.len());
        commands.push(command);
    }

    if commands.is_empty() {
        return Err(ParseError::EmptyProgram);
    }
    log::debug!("parsed {} commands", commands.len());
    Ok(Program::new(commands))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn print_a_source() -> Vec<u8> {
        let mut src = Vec::new();
        src.extend_from_slice(Opcode::Push.prefix().as_bytes());
        // 65 = 0b1000001: sign (positive) then magnitude MSB-first.
        src.extend_from_slice(b" \t     \t\n");
        src.extend_from_slice(Opcode::PrintChar.prefix().as_bytes());
        src.extend_from_slice(Opcode::EndProgram.prefix().as_bytes());
        src
    }

    #[test]
    fn test_print_a_and_halt() {
        let src = print_a_source();
        let program = parse(&src).unwrap();
        assert_eq!(program.len(), 3);
        assert_eq!(program.commands()[0].opcode(), Opcode::Push);
        assert_eq!(program.commands()[0].int(), Some(&BigInt::from_i32(65)));
        assert_eq!(program.commands()[1].opcode(), Opcode::PrintChar);
        assert_eq!(program.commands()[2].opcode(), Opcode::EndProgram);
    }

    #[test]
    fn test_comments_are_ignored() {
        let clean = parse(&print_a_source()).unwrap();
        let mut noisy = Vec::new();
        for &b in &print_a_source() {
            noisy.push(b'x');
            noisy.push(b);
        }
        let noisy = parse(&noisy).unwrap();
        assert_eq!(clean, noisy);
    }

    #[test]
    fn test_unterminated_command() {
        assert_eq!(
            parse(b" \t").unwrap_err(),
            ParseError::Unterminated { position: 0 }
        );
    }

    #[test]
    fn test_unknown_opcode() {
        // Matches no 2-, 3- or 4-character prefix in the opcode table.
        assert!(matches!(
            parse(b" \t\t "),
            Err(ParseError::UnknownOpcode { .. })
        ));
    }

    #[test]
    fn test_empty_program() {
        assert_eq!(parse(b"not whitespace at all").unwrap_err(), ParseError::EmptyProgram);
    }

    #[test]
    fn test_unterminated_parameter() {
        // push with no terminating linefeed
        assert!(matches!(
            parse(b"  \t "),
            Err(ParseError::Unterminated { .. })
        ));
    }
}
