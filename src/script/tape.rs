//! Working copy of a script under evaluation
//!
//! A `Vec<Command>` plus an instruction cursor. Control-flow opcodes and P2SH
//! redemption rewrite the unexecuted part of the same sequence.

use super::Command;
use crate::opcodes::{OP_EQUAL, OP_HASH160};
use crate::types::Hash160;

#[derive(Debug, Clone, Default)]
pub struct CommandTape {
    commands: Vec<Command>,
    cursor: usize,
}

impl CommandTape {
    pub fn new(commands: Vec<Command>) -> Self {
        Self {
            commands,
            cursor: 0,
        }
    }

    /// Take the command under the cursor and advance
    pub fn next_command(&mut self) -> Option<Command> {
        let command = self.commands.get(self.cursor)?.clone();
        self.cursor += 1;
        Some(command)
    }

    /// Commands not yet executed
    #[inline]
    pub fn remaining(&self) -> &[Command] {
        &self.commands[self.cursor..]
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cursor >= self.commands.len()
    }

    /// Replace the next `len` commands with `replacement`
    pub fn replace_front(&mut self, len: usize, replacement: Vec<Command>) {
        let end = (self.cursor + len).min(self.commands.len());
        self.commands.splice(self.cursor..end, replacement);
    }

    /// Append commands after everything still pending
    pub fn extend(&mut self, commands: impl IntoIterator<Item = Command>) {
        self.commands.extend(commands);
    }

    /// If exactly `OP_HASH160 <20 bytes> OP_EQUAL` remains, consume it and
    /// return the hash.
    pub fn take_p2sh_tail(&mut self) -> Option<Hash160> {
        let h160 = match self.remaining() {
            [Command::Op(OP_HASH160), Command::Data(h), Command::Op(OP_EQUAL)] => {
                Hash160::try_from(h.as_slice()).ok()?
            }
            _ => return None,
        };
        self.cursor += 3;
        Some(h160)
    }
}
