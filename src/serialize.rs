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
use crate::errors::SerializeError;
use crate::label::Label;
use crate::program::Program;
use crate::util::{ByteDecoder, ByteEncoder};

const SIGN_BIT: u32 = 0x8000_0000;
const LENGTH_MASK: u32 = 0x7FFF_FFFF;
const RESOLVED_FLAG: u32 = 0x1;

/// Serialize a `Program` (resolved or not) into the little-endian
/// binary format described in the component design. Not versioned:
/// producer and consumer must agree on layout out of band.
pub fn serialize(program: &Program) -> Vec<u8> {
    let mut enc = ByteEncoder::new();
    let flags: u32 = if program.is_resolved() { RESOLVED_FLAG } else { 0 };
    enc.encode_u32(flags);
    enc.encode_u32(program.len() as u32);
    for command in program.commands() {
        encode_command(&mut enc, command, program.is_resolved());
    }
    enc.to_vec()
}

pub fn deserialize(bytes: &[u8]) -> Result<Program, SerializeError> {
    let mut dec = ByteDecoder::new(bytes);
    let flags = dec.decode_u32::<SerializeError>()?;
    let resolved = flags & RESOLVED_FLAG != 0;
    let length = dec.decode_u32::<SerializeError>()? as usize;
    let mut commands = Vec::with_capacity(length);
    for _ in 0..length {
        commands.push(decode_command(&mut dec, resolved)?);
    }
    log::debug!("deserialized {length} commands, resolved = {resolved}");
    Ok(Program::from_parts(resolved, commands))
}

fn encode_command(enc: &mut ByteEncoder, command: &Command, resolved: bool) {
    let op = command.opcode();
    enc.encode_u8(op.index());
    if op.takes_int() {
        encode_bigint(enc, command.int().expect("takes_int command without a BigInt payload"));
    } else if op.takes_label() {
        if resolved {
            let offset = command.offset().expect("resolved command without an offset");
            enc.encode_u32(offset as u32);
        } else {
            encode_label(enc, command.label().expect("unresolved command without a label"));
        }
    }
}

fn decode_command(dec: &mut ByteDecoder, resolved: bool) -> Result<Command, SerializeError> {
    let byte = dec.decode_u8::<SerializeError>()?;
    let op = Opcode::from_index(byte).ok_or(SerializeError::UnknownOpcode { byte })?;
    if op.takes_int() {
        Ok(Command::WithInt(op, decode_bigint(dec)?))
    } else if op.takes_label() {
        if resolved {
            let offset = dec.decode_u32::<SerializeError>()? as usize;
            Ok(Command::WithOffset(op, offset))
        } else {
            Ok(Command::WithLabel(op, decode_label(dec)?))
        }
    } else {
        Ok(Command::Plain(op))
    }
}

fn encode_bigint(enc: &mut ByteEncoder, value: &BigInt) {
    let (negative, digits) = value.to_serial_digits();
    if digits.len() <= 1 {
        // Always representable as a Small; use the inline form.
        let inline = if digits.is_empty() || digits[0] == 0 {
            0
        } else if negative {
            -(digits[0] as i32)
        } else {
            digits[0] as i32
        };
        enc.encode_u32(0);
        enc.encode_i32(inline);
    } else {
        let length_word = digits.len() as u32 | if negative { SIGN_BIT } else { 0 };
        enc.encode_u32(length_word);
        for digit in digits {
            enc.encode_u32(digit);
        }
    }
}

fn decode_bigint(dec: &mut ByteDecoder) -> Result<BigInt, SerializeError> {
    let length_word = dec.decode_u32::<SerializeError>()?;
    if length_word == 0 {
        let inline = dec.decode_i32::<SerializeError>()?;
        Ok(BigInt::from_i32(inline))
    } else {
        let negative = length_word & SIGN_BIT != 0;
        let count = (length_word & LENGTH_MASK) as usize;
        let mut digits = Vec::with_capacity(count);
        for _ in 0..count {
            digits.push(dec.decode_u32::<SerializeError>()?);
        }
        Ok(BigInt::from_serial_digits(negative, digits))
    }
}

fn encode_label(enc: &mut ByteEncoder, label: &Label) {
    enc.encode_u32(label.bit_len());
    enc.encode_bytes(label.bytes());
}

fn decode_label(dec: &mut ByteDecoder) -> Result<Label, SerializeError> {
    let bit_len = dec.decode_u32::<SerializeError>()?;
    let byte_len = ((bit_len + 7) / 8).max(1) as usize;
    let bytes = dec.decode_bytes::<SerializeError>(byte_len)?.to_vec();
    Ok(Label::from_parts(bit_len, bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::label::Label;

    #[test]
    fn test_round_trip_unresolved() {
        let program = Program::new(vec![
            Command::WithInt(Opcode::Push, BigInt::from_i32(65)),
            Command::WithLabel(Opcode::Jump, Label::from_bits(&[true, false])),
            Command::Plain(Opcode::EndProgram),
        ]);
        let bytes = serialize(&program);
        let round_tripped = deserialize(&bytes).unwrap();
        assert_eq!(program, round_tripped);
    }

    #[test]
    fn test_round_trip_resolved() {
        let mut program = Program::new(vec![
            Command::WithLabel(Opcode::Jump, Label::from_bits(&[true])),
            Command::WithLabel(Opcode::Label, Label::from_bits(&[true])),
        ]);
        crate::resolve::resolve(&mut program).unwrap();
        let bytes = serialize(&program);
        let round_tripped = deserialize(&bytes).unwrap();
        assert_eq!(program, round_tripped);
        assert!(round_tripped.is_resolved());
    }

    #[test]
    fn test_round_trip_large_bigint() {
        let big = BigInt::from_i32(1 << 29).multiply(&BigInt::from_i32(1 << 29));
        let program = Program::new(vec![
            Command::WithInt(Opcode::Push, big),
            Command::Plain(Opcode::PrintNum),
        ]);
        let bytes = serialize(&program);
        let round_tripped = deserialize(&bytes).unwrap();
        assert_eq!(program, round_tripped);
    }

    #[test]
    fn test_truncated_buffer_is_an_error() {
        let program = Program::new(vec![Command::Plain(Opcode::EndProgram)]);
        let mut bytes = serialize(&program);
        bytes.truncate(bytes.len() - 1);
        assert!(matches!(deserialize(&bytes), Err(SerializeError::Truncated)));
    }

    #[test]
    fn test_unknown_opcode_byte_is_an_error() {
        let mut bytes = vec![0u8; 9];
        bytes[4] = 1; // length = 1 (little-endian u32)
        bytes[8] = 200; // bogus opcode byte
        assert!(matches!(
            deserialize(&bytes),
            Err(SerializeError::UnknownOpcode { byte: 200 })
        ));
    }
}
