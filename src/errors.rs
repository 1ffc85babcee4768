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

/// Raised while tokenizing and decoding a raw source buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The buffer ended while a command or parameter was still open.
    Unterminated { position: usize },
    /// No opcode prefix matched within four significant characters.
    UnknownOpcode { position: usize },
    /// The source held no commands at all.
    EmptyProgram,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

impl std::error::Error for ParseError {}

/// Raised while resolving labels to absolute offsets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    DuplicateLabel { command: usize },
    UndefinedLabel { command: usize },
    AlreadyResolved,
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

impl std::error::Error for ResolveError {}

/// Raised while reading or writing the binary serialization format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SerializeError {
    Truncated,
    UnknownOpcode { byte: u8 },
}

impl fmt::Display for SerializeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

impl std::error::Error for SerializeError {}

/// `ByteDecoder`'s generic helpers raise this on running out of
/// buffer, regardless of what they were decoding.
impl Default for SerializeError {
    fn default() -> Self {
        SerializeError::Truncated
    }
}

/// Raised while executing a resolved program.
#[derive(Debug)]
pub enum EngineError {
    NotResolved,
    OutOfBounds { pc: usize },
    StackUnderflow,
    BadIndex { index: i32, len: usize },
    DivideByZero,
    HeapMiss,
    CallstackUnderflow,
    InputError(std::io::Error),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

impl std::error::Error for EngineError {}

impl From<std::io::Error> for EngineError {
    fn from(e: std::io::Error) -> Self {
        EngineError::InputError(e)
    }
}

/// Top-level error wrapping every subsystem's error type, so host
/// code can use `Result<T, Box<dyn Error>>` with `?` across the
/// whole pipeline.
#[derive(Debug)]
pub enum Error {
    Parse(ParseError),
    Resolve(ResolveError),
    Serialize(SerializeError),
    Engine(EngineError),
    Io(std::io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Parse(e) => write!(f, "{e}"),
            Error::Resolve(e) => write!(f, "{e}"),
            Error::Serialize(e) => write!(f, "{e}"),
            Error::Engine(e) => write!(f, "{e}"),
            Error::Io(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Parse(e) => Some(e),
            Error::Resolve(e) => Some(e),
            Error::Serialize(e) => Some(e),
            Error::Engine(e) => Some(e),
            Error::Io(e) => Some(e),
        }
    }
}

impl From<ParseError> for Error {
    fn from(e: ParseError) -> Self {
        Error::Parse(e)
    }
}

impl From<ResolveError> for Error {
    fn from(e: ResolveError) -> Self {
        Error::Resolve(e)
    }
}

impl From<SerializeError> for Error {
    fn from(e: SerializeError) -> Self {
        Error::Serialize(e)
    }
}

impl From<EngineError> for Error {
    fn from(e: EngineError) -> Self {
        Error::Engine(e)
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}
