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
use crate::command::Command;

/// An ordered command sequence, plus a flag recording whether label
/// resolution has already run. Never empty: the parser rejects a
/// source with zero commands before a `Program` is ever constructed.
#[derive(Clone, Debug, PartialEq)]
pub struct Program {
    resolved: bool,
    commands: Vec<Command>,
}

impl Program {
    /// Constructs an unresolved program. Panics if `commands` is
    /// empty — callers (the parser, the deserializer) are expected
    /// to have already turned that case into a proper error.
    pub fn new(commands: Vec<Command>) -> Program {
        assert!(!commands.is_empty(), "a Program must hold at least one command");
        Program {
            resolved: false,
            commands,
        }
    }

    pub(crate) fn from_parts(resolved: bool, commands: Vec<Command>) -> Program {
        Program { resolved, commands }
    }

    pub fn is_resolved(&self) -> bool {
        self.resolved
    }

    pub(crate) fn set_resolved(&mut self, resolved: bool) {
        self.resolved = resolved;
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub(crate) fn commands_mut(&mut self) -> &mut [Command] {
        &mut self.commands
    }
}

impl std::fmt::Display for Program {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        for (i, command) in self.commands.iter().enumerate() {
            writeln!(f, "{i:>6}  {command}")?;
        }
        Ok(())
    }
}
