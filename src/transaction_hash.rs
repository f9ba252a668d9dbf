//! Transaction hash calculation for signature verification
//!
//! Legacy (pre-SegWit) signature hash. Only `SIGHASH_ALL` has defined
//! semantics here; the other types parse but are rejected when hashing.

use log::trace;
use num_bigint::BigUint;

use crate::crypto::hash256;
use crate::error::{Result, SigScriptError};
use crate::script::Script;
use crate::serialization::transaction::serialize_for_signing;
use crate::transaction::Tx;
use crate::types::Hash;

/// SIGHASH types for transaction signature verification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SighashType {
    /// Sign all inputs and outputs (default)
    All = 0x01,
    /// Sign no outputs
    None = 0x02,
    /// Sign output at same index as input
    Single = 0x03,
    /// Sign only this input
    AnyoneCanPay = 0x80,
}

impl SighashType {
    /// Parse sighash type from byte
    pub fn from_byte(byte: u8) -> Result<Self> {
        match byte {
            0x01 => Ok(SighashType::All),
            0x02 => Ok(SighashType::None),
            0x03 => Ok(SighashType::Single),
            0x80 => Ok(SighashType::AnyoneCanPay),
            _ => Err(SigScriptError::InvalidSighashType(byte)),
        }
    }

    /// Byte appended to a DER signature
    #[inline]
    pub fn as_byte(self) -> u8 {
        self as u8
    }

    /// Four-byte form appended to the preimage
    #[inline]
    pub fn as_u32(self) -> u32 {
        self as u32
    }
}

/// Calculate the legacy transaction sighash
///
/// The preimage is the transaction with every unlocking script emptied except
/// input `input_index`, which carries `script_code` (the previous locking
/// script, or the redeem script for P2SH), followed by the 4-byte sighash type.
///
/// # Returns
/// Double-SHA256 of the preimage, in digest byte order
pub fn calculate_transaction_sighash(
    tx: &Tx,
    input_index: usize,
    script_code: &Script,
    sighash_type: SighashType,
) -> Result<Hash> {
    if input_index >= tx.tx_ins.len() {
        return Err(SigScriptError::InvalidInputIndex(input_index));
    }
    if sighash_type != SighashType::All {
        return Err(SigScriptError::InvalidSighashType(sighash_type.as_byte()));
    }

    let mut preimage = serialize_for_signing(tx, input_index, script_code)?;
    preimage.extend_from_slice(&sighash_type.as_u32().to_le_bytes());

    let digest = hash256(&preimage);
    trace!(
        "sighash input {} over {} byte preimage: {}",
        input_index,
        preimage.len(),
        hex::encode(digest)
    );
    Ok(digest)
}

/// The digest read as a big-endian integer, the `z` signed by ECDSA
#[inline]
pub fn sighash_to_z(digest: &Hash) -> BigUint {
    BigUint::from_bytes_be(digest)
}
