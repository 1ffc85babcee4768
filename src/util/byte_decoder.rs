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

/// Utility for pulling structured data back out of a bytestream.
/// Used by the serializer to read the little-endian program format
/// back into commands.
pub struct ByteDecoder<'a> {
    bytes: &'a [u8],
    index: usize,
}

impl<'a> ByteDecoder<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, index: 0 }
    }

    /// Read the next byte from the sequence, and move our position
    /// to the next byte in the sequence. If no such byte is
    /// available, an error is reported.
    pub fn decode_u8<E: Default>(&mut self) -> Result<u8, E> {
        if self.index < self.bytes.len() {
            let next = self.bytes[self.index];
            self.index += 1;
            Ok(next)
        } else {
            Err(E::default())
        }
    }

    /// Read the next word from the sequence assuming a _little
    /// endian_ representation, whilst moving our position forward.
    pub fn decode_u32<E: Default>(&mut self) -> Result<u32, E> {
        let bytes = self.decode_bytes::<E>(4)?;
        Ok(u32::from_le_bytes(bytes.try_into().unwrap()))
    }

    pub fn decode_i32<E: Default>(&mut self) -> Result<i32, E> {
        let bytes = self.decode_bytes::<E>(4)?;
        Ok(i32::from_le_bytes(bytes.try_into().unwrap()))
    }

    /// Read the next `length` bytes from the sequence, whilst moving
    /// our position to the following byte. If there are insufficient
    /// bytes remaining, then an error is reported.
    pub fn decode_bytes<E: Default>(&mut self, length: usize) -> Result<&'a [u8], E> {
        let start = self.index;
        self.index += length;
        if self.index <= self.bytes.len() {
            Ok(&self.bytes[start..self.index])
        } else {
            Err(E::default())
        }
    }
}
