//! Script model and interpreter
//!
//! A [`Script`] is a sequence of [`Command`]s. Evaluation runs the commands on a
//! private [`CommandTape`] against a data stack and an alt stack, dispatching
//! opcodes through [`ops::OPERATIONS`].
//!
//! P2SH redemption happens inline: when a data push leaves exactly
//! `OP_HASH160 <20 bytes> OP_EQUAL` on the tape, the pushed bytes are hashed and
//! compared, and on a match re-parsed as a script and appended to the tape.

use std::fmt;
use std::ops::Add;

use log::info;
use num_bigint::BigUint;

use crate::config::get_config;
use crate::constants::{HASH160_SIZE, MAX_SCRIPT_ELEMENT_SIZE};
use crate::error::{Result, SigScriptError};
use crate::opcodes::*;
use crate::serialization::varint::{decode_varint, encode_varint};
use crate::types::ByteString;

pub mod num;
pub mod ops;
pub mod standard;
pub mod tape;

pub use ops::{Operation, OPERATIONS};
pub use standard::{p2pk_script, p2pkh_script, p2sh_script};
pub use tape::CommandTape;

/// Data stack (and alt stack) of byte strings
pub type Stack = Vec<ByteString>;

/// One element of a script
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Command {
    Op(u8),
    Data(ByteString),
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Op(op) => match opcode_name(*op) {
                Some(name) => f.write_str(name),
                None => write!(f, "OP_[{op}]"),
            },
            Command::Data(data) => f.write_str(&hex::encode(data)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Script {
    commands: Vec<Command>,
}

impl Script {
    pub fn new(commands: Vec<Command>) -> Self {
        Self { commands }
    }

    #[inline]
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Parse a varint-prefixed script, returning it and the bytes consumed.
    ///
    /// The declared length is bounded by `script.max_script_size`.
    pub fn parse(data: &[u8]) -> Result<(Self, usize)> {
        let (length, prefix_len) = decode_varint(data)?;
        let max = get_config().script.max_script_size;
        if length > max as u64 {
            return Err(SigScriptError::ScriptParse(
                format!("declared length {length} exceeds limit {max}").into(),
            ));
        }
        let length = length as usize;
        let body = data
            .get(prefix_len..prefix_len + length)
            .ok_or(SigScriptError::ScriptParse(
                "script shorter than its declared length".into(),
            ))?;
        Ok((Self::from_raw(body)?, prefix_len + length))
    }

    /// Parse a bare command stream with no length prefix (redeem scripts)
    pub fn from_raw(raw: &[u8]) -> Result<Self> {
        let mut commands = Vec::new();
        let mut offset = 0;
        while let Some(&byte) = raw.get(offset) {
            offset += 1;
            let push_len = match byte {
                1..=OP_PUSHBYTES_MAX => byte as usize,
                OP_PUSHDATA1 => {
                    let len = read_le(raw, offset, 1)?;
                    offset += 1;
                    len
                }
                OP_PUSHDATA2 => {
                    let len = read_le(raw, offset, 2)?;
                    offset += 2;
                    len
                }
                op => {
                    commands.push(Command::Op(op));
                    continue;
                }
            };
            let data = raw.get(offset..offset + push_len).ok_or_else(|| {
                SigScriptError::ScriptParse(
                    format!("push of {push_len} bytes overruns the script").into(),
                )
            })?;
            commands.push(Command::Data(data.to_vec()));
            offset += push_len;
        }
        Ok(Self { commands })
    }

    /// Command stream without the length prefix
    pub fn raw_serialize(&self) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        for command in &self.commands {
            match command {
                Command::Op(op) => out.push(*op),
                Command::Data(data) => {
                    let len = data.len();
                    if len <= OP_PUSHBYTES_MAX as usize {
                        out.push(len as u8);
                    } else if len <= 0xff {
                        out.push(OP_PUSHDATA1);
                        out.push(len as u8);
                    } else if len <= MAX_SCRIPT_ELEMENT_SIZE {
                        out.push(OP_PUSHDATA2);
                        out.extend_from_slice(&(len as u16).to_le_bytes());
                    } else {
                        return Err(SigScriptError::PushTooLong(len));
                    }
                    out.extend_from_slice(data);
                }
            }
        }
        Ok(out)
    }

    /// Varint length followed by the command stream
    pub fn serialize(&self) -> Result<Vec<u8>> {
        let raw = self.raw_serialize()?;
        let mut out = encode_varint(raw.len() as u64);
        out.extend_from_slice(&raw);
        Ok(out)
    }

    /// `self` followed by `other` (unlocking ++ locking)
    pub fn concat(&self, other: &Script) -> Script {
        let mut commands = Vec::with_capacity(self.commands.len() + other.commands.len());
        commands.extend_from_slice(&self.commands);
        commands.extend_from_slice(&other.commands);
        Script { commands }
    }

    /// Run the script against sighash `z`.
    ///
    /// `Ok(false)` is a failed script. `Err` is reserved for opcodes with no
    /// registered operation and redeem scripts that do not parse.
    pub fn evaluate(&self, z: &BigUint) -> Result<bool> {
        let mut tape = CommandTape::new(self.commands.clone());
        let mut stack = Stack::new();
        let mut altstack = Stack::new();

        while let Some(command) = tape.next_command() {
            match command {
                Command::Op(op) => {
                    let operation =
                        OPERATIONS[op as usize].ok_or(SigScriptError::UnsupportedOpcode(op))?;
                    let ok = match operation {
                        Operation::Stack(f) => f(&mut stack),
                        Operation::AltStack(f) => f(&mut stack, &mut altstack),
                        Operation::Tape(f) => f(&mut stack, &mut tape),
                        Operation::Sighash(f) => f(&mut stack, z),
                    };
                    if !ok {
                        info!("bad op: {}", Command::Op(op));
                        return Ok(false);
                    }
                }
                Command::Data(data) => {
                    stack.push(data);
                    if let Some(h160) = tape.take_p2sh_tail() {
                        if !redeem_script(&mut stack, &mut tape, &h160)? {
                            return Ok(false);
                        }
                    }
                }
            }
        }

        Ok(matches!(stack.last(), Some(top) if !top.is_empty()))
    }

    /// `OP_DUP OP_HASH160 <20 bytes> OP_EQUALVERIFY OP_CHECKSIG`
    pub fn is_p2pkh_script_pubkey(&self) -> bool {
        matches!(
            self.commands.as_slice(),
            [
                Command::Op(OP_DUP),
                Command::Op(OP_HASH160),
                Command::Data(h),
                Command::Op(OP_EQUALVERIFY),
                Command::Op(OP_CHECKSIG)
            ] if h.len() == HASH160_SIZE
        )
    }

    /// `OP_HASH160 <20 bytes> OP_EQUAL`
    pub fn is_p2sh_script_pubkey(&self) -> bool {
        matches!(
            self.commands.as_slice(),
            [Command::Op(OP_HASH160), Command::Data(h), Command::Op(OP_EQUAL)]
                if h.len() == HASH160_SIZE
        )
    }
}

/// Hash-check the redeem script on top of the stack and splice it onto the tape
fn redeem_script(stack: &mut Stack, tape: &mut CommandTape, h160: &[u8]) -> Result<bool> {
    let Some(redeem) = stack.last().cloned() else {
        return Ok(false);
    };
    let hash_ok = ops::op_hash160(stack) && {
        stack.push(h160.to_vec());
        ops::op_equalverify(stack)
    };
    if !hash_ok {
        info!("bad p2sh h160");
        return Ok(false);
    }
    tape.extend(Script::from_raw(&redeem)?.commands);
    Ok(true)
}

fn read_le(raw: &[u8], offset: usize, width: usize) -> Result<usize> {
    let bytes = raw.get(offset..offset + width).ok_or(SigScriptError::ScriptParse(
        "truncated push length".into(),
    ))?;
    Ok(bytes
        .iter()
        .rev()
        .fold(0usize, |acc, &b| (acc << 8) | b as usize))
}

impl Add for Script {
    type Output = Script;

    fn add(mut self, other: Script) -> Script {
        self.commands.extend(other.commands);
        self
    }
}

impl Add<&Script> for &Script {
    type Output = Script;

    fn add(self, other: &Script) -> Script {
        self.concat(other)
    }
}

impl fmt::Display for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, command) in self.commands.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{command}")?;
        }
        Ok(())
    }
}

impl From<Vec<Command>> for Script {
    fn from(commands: Vec<Command>) -> Self {
        Self::new(commands)
    }
}
