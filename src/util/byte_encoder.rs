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

/// A utility for encoding structured data into bytes, used by the
/// serializer to build up the little-endian program format.
pub struct ByteEncoder {
    bytes: Vec<u8>,
}

impl ByteEncoder {
    pub const fn new() -> Self {
        Self { bytes: Vec::new() }
    }

    /// Encode a single byte into this stream.
    pub fn encode_u8(&mut self, byte: u8) {
        self.bytes.push(byte);
    }

    /// Encode a 32bit word into this stream using a little endian
    /// representation.
    pub fn encode_u32(&mut self, word: u32) {
        self.bytes.extend(word.to_le_bytes());
    }

    pub fn encode_i32(&mut self, word: i32) {
        self.bytes.extend(word.to_le_bytes());
    }

    pub fn encode_bytes(&mut self, bytes: &[u8]) {
        self.bytes.extend_from_slice(bytes);
    }

    pub fn to_vec(self) -> Vec<u8> {
        self.bytes
    }
}

impl Default for ByteEncoder {
    fn default() -> Self {
        Self::new()
    }
}
