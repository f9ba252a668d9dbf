//! Transaction wire format serialization/deserialization
//!
//! Legacy (pre-SegWit) layout only. A SegWit marker after the version is
//! rejected rather than silently misparsed.

use super::varint::{decode_varint, encode_varint};
use crate::error::{Result, SigScriptError};
use crate::script::Script;
use crate::transaction::{Tx, TxIn, TxOut};
use std::borrow::Cow;

/// Error type for transaction parsing failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionParseError {
    InsufficientBytes,
    SegwitMarker,
    InvalidInputCount,
    InvalidOutputCount,
}

impl std::fmt::Display for TransactionParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionParseError::InsufficientBytes => {
                write!(f, "Insufficient bytes to parse transaction")
            }
            TransactionParseError::SegwitMarker => {
                write!(f, "SegWit transactions are not supported")
            }
            TransactionParseError::InvalidInputCount => write!(f, "Invalid input count"),
            TransactionParseError::InvalidOutputCount => write!(f, "Invalid output count"),
        }
    }
}

impl std::error::Error for TransactionParseError {}

impl From<TransactionParseError> for SigScriptError {
    fn from(err: TransactionParseError) -> Self {
        SigScriptError::Serialization(Cow::Owned(err.to_string()))
    }
}

/// Upper bound on declared input/output counts
const MAX_IO_COUNT: u64 = 1_000_000;

/// Serialize a transaction to Bitcoin wire format
///
/// Format (non-SegWit):
/// - Version (4 bytes, little-endian)
/// - Input count (VarInt)
/// - For each input:
///   - Previous output hash (32 bytes, reverse of display order)
///   - Previous output index (4 bytes, little-endian)
///   - Script length (VarInt)
///   - Script bytes
///   - Sequence (4 bytes, little-endian)
/// - Output count (VarInt)
/// - For each output:
///   - Value (8 bytes, little-endian)
///   - Script length (VarInt)
///   - Script bytes
/// - Lock time (4 bytes, little-endian)
pub fn serialize_transaction(tx: &Tx) -> Result<Vec<u8>> {
    serialize_with(tx, |_, input| input.script_sig.serialize())
}

/// Serialize with every unlocking script emptied except input `signed_index`,
/// which carries `script_code`. This is the body of the legacy sighash preimage.
pub(crate) fn serialize_for_signing(
    tx: &Tx,
    signed_index: usize,
    script_code: &Script,
) -> Result<Vec<u8>> {
    serialize_with(tx, |i, _| {
        if i == signed_index {
            script_code.serialize()
        } else {
            Ok(encode_varint(0))
        }
    })
}

fn serialize_with<F>(tx: &Tx, mut script_sig: F) -> Result<Vec<u8>>
where
    F: FnMut(usize, &TxIn) -> Result<Vec<u8>>,
{
    let estimated_size = 4
        + 1
        + tx.tx_ins.len() * 41
        + 1
        + tx.tx_outs.len() * 9
        + 4;
    let mut result = Vec::with_capacity(estimated_size);

    // Version (4 bytes, little-endian)
    result.extend_from_slice(&tx.version.to_le_bytes());

    // Input count (VarInt)
    result.extend_from_slice(&encode_varint(tx.tx_ins.len() as u64));

    for (i, input) in tx.tx_ins.iter().enumerate() {
        // Previous output hash, stored in display order
        let mut prev_tx = input.prev_tx;
        prev_tx.reverse();
        result.extend_from_slice(&prev_tx);

        // Previous output index (4 bytes, little-endian)
        result.extend_from_slice(&input.prev_index.to_le_bytes());

        // Script (VarInt length + bytes)
        result.extend_from_slice(&script_sig(i, input)?);

        // Sequence (4 bytes, little-endian)
        result.extend_from_slice(&input.sequence.to_le_bytes());
    }

    // Output count (VarInt)
    result.extend_from_slice(&encode_varint(tx.tx_outs.len() as u64));

    for output in &tx.tx_outs {
        // Value (8 bytes, little-endian)
        result.extend_from_slice(&output.amount.to_le_bytes());

        // Script (VarInt length + bytes)
        result.extend_from_slice(&output.script_pubkey.serialize()?);
    }

    // Lock time (4 bytes, little-endian)
    result.extend_from_slice(&tx.locktime.to_le_bytes());

    Ok(result)
}

/// Deserialize a transaction from Bitcoin wire format
///
/// Returns the transaction and the number of bytes consumed. Trailing bytes
/// are left for the caller.
pub fn deserialize_transaction(data: &[u8], testnet: bool) -> Result<(Tx, usize)> {
    let mut offset = 0;

    // Version (4 bytes)
    let version = u32::from_le_bytes(read_array(data, &mut offset)?);

    // Marker 0x00 + flag 0x01 where the input count would be
    if matches!(data.get(offset..offset + 2), Some([0x00, 0x01])) {
        return Err(TransactionParseError::SegwitMarker.into());
    }

    // Input count (VarInt)
    let (input_count, varint_len) = decode_varint(remaining(data, offset)?)?;
    offset += varint_len;

    if input_count > MAX_IO_COUNT {
        return Err(TransactionParseError::InvalidInputCount.into());
    }

    let mut tx_ins = Vec::new();
    for _ in 0..input_count {
        // Previous output hash (32 bytes), flipped to display order
        let mut prev_tx: [u8; 32] = read_array(data, &mut offset)?;
        prev_tx.reverse();

        // Previous output index (4 bytes)
        let prev_index = u32::from_le_bytes(read_array(data, &mut offset)?);

        // Script
        let (script_sig, used) = Script::parse(remaining(data, offset)?)?;
        offset += used;

        // Sequence (4 bytes)
        let sequence = u32::from_le_bytes(read_array(data, &mut offset)?);

        tx_ins.push(TxIn {
            prev_tx,
            prev_index,
            script_sig,
            sequence,
        });
    }

    // Output count (VarInt)
    let (output_count, varint_len) = decode_varint(remaining(data, offset)?)?;
    offset += varint_len;

    if output_count > MAX_IO_COUNT {
        return Err(TransactionParseError::InvalidOutputCount.into());
    }

    let mut tx_outs = Vec::new();
    for _ in 0..output_count {
        // Value (8 bytes)
        let amount = u64::from_le_bytes(read_array(data, &mut offset)?);

        // Script
        let (script_pubkey, used) = Script::parse(remaining(data, offset)?)?;
        offset += used;

        tx_outs.push(TxOut {
            amount,
            script_pubkey,
        });
    }

    // Lock time (4 bytes)
    let locktime = u32::from_le_bytes(read_array(data, &mut offset)?);

    Ok((Tx::new(version, tx_ins, tx_outs, locktime, testnet), offset))
}

fn remaining(data: &[u8], offset: usize) -> Result<&[u8]> {
    Ok(data
        .get(offset..)
        .ok_or(TransactionParseError::InsufficientBytes)?)
}

fn read_array<const N: usize>(data: &[u8], offset: &mut usize) -> Result<[u8; N]> {
    let bytes = data
        .get(*offset..*offset + N)
        .ok_or(TransactionParseError::InsufficientBytes)?;
    let mut out = [0u8; N];
    out.copy_from_slice(bytes);
    *offset += N;
    Ok(out)
}
