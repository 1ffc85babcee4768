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

/// A symbolic jump target: a bit-length-tagged binary string.
///
/// Whitespace spells a label as a run of space/tab characters
/// terminated by a linefeed (space = 0, tab = 1). Two labels compare
/// equal only when they have the same bit length *and* the same
/// bits — `Label` never degrades to a plain byte string, which would
/// conflate `""`, `"0"` and `"00"`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Label {
    bit_len: u32,
    bytes: Vec<u8>,
}

impl Label {
    /// Build a label from its bits in the order they appeared in
    /// the source, `true` meaning tab (1) and `false` meaning space
    /// (0). Bits are packed right-aligned: the last bit read from
    /// the source occupies the low end of the last byte.
    pub fn from_bits(bits: &[bool]) -> Label {
        let bit_len = bits.len();
        let byte_len = (bit_len + 7) / 8;
        let byte_len = byte_len.max(1);
        let mut bytes = vec![0u8; byte_len];
        for (idx, &bit) in bits.iter().enumerate() {
            if bit {
                let i = bit_len - 1 - idx;
                bytes[byte_len - 1 - i / 8] |= 1 << (i % 8);
            }
        }
        Label {
            bit_len: bit_len as u32,
            bytes,
        }
    }

    pub fn bit_len(&self) -> u32 {
        self.bit_len
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn from_parts(bit_len: u32, bytes: Vec<u8>) -> Label {
        Label { bit_len, bytes }
    }

    /// The open-addressing probe hash used by `LabelMap`, matching
    /// the source's CPython-inspired string hash: seed with
    /// `data[0] << 7`, fold every storage byte, then XOR with the
    /// bit length.
    pub fn probe_hash(&self) -> i32 {
        let mut value: i32 = (self.bytes[0] as i32) << 7;
        for &b in &self.bytes {
            value = value.wrapping_mul(1_000_003) ^ (b as i32);
        }
        value ^ (self.bit_len as i32)
    }
}

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        for idx in 0..self.bit_len as usize {
            let i = self.bit_len as usize - 1 - idx;
            let byte = self.bytes[self.bytes.len() - 1 - i / 8];
            let bit = (byte >> (i % 8)) & 1;
            f.write_str(if bit == 1 { "T" } else { "S" })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distinct_lengths() {
        let empty = Label::from_bits(&[]);
        let one = Label::from_bits(&[false]);
        let two = Label::from_bits(&[false, false]);
        assert_ne!(empty, one);
        assert_ne!(one, two);
        assert_ne!(empty, two);
    }

    #[test]
    fn test_equal_bits_equal_label() {
        let a = Label::from_bits(&[true, false, true]);
        let b = Label::from_bits(&[true, false, true]);
        assert_eq!(a, b);
        assert_eq!(a.probe_hash(), b.probe_hash());
    }

    #[test]
    fn test_distinguishes_content() {
        let a = Label::from_bits(&[true, false]);
        let b = Label::from_bits(&[false, true]);
        assert_ne!(a, b);
    }

    #[test]
    fn test_display_round_trip() {
        let a = Label::from_bits(&[true, false, true, true]);
        assert_eq!(a.to_string(), "TSTT");
    }
}
