//! Standard locking-script templates

use super::{Command, Script};
use crate::opcodes::{OP_CHECKSIG, OP_DUP, OP_EQUAL, OP_EQUALVERIFY, OP_HASH160};
use crate::types::Hash160;

/// `OP_DUP OP_HASH160 <h160> OP_EQUALVERIFY OP_CHECKSIG`
pub fn p2pkh_script(h160: &Hash160) -> Script {
    Script::new(vec![
        Command::Op(OP_DUP),
        Command::Op(OP_HASH160),
        Command::Data(h160.to_vec()),
        Command::Op(OP_EQUALVERIFY),
        Command::Op(OP_CHECKSIG),
    ])
}

/// `OP_HASH160 <h160> OP_EQUAL`
pub fn p2sh_script(h160: &Hash160) -> Script {
    Script::new(vec![
        Command::Op(OP_HASH160),
        Command::Data(h160.to_vec()),
        Command::Op(OP_EQUAL),
    ])
}

/// `<sec> OP_CHECKSIG`
pub fn p2pk_script(sec: &[u8]) -> Script {
    Script::new(vec![Command::Data(sec.to_vec()), Command::Op(OP_CHECKSIG)])
}
