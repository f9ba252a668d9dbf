//! Bitcoin VarInt encoding/decoding
//!
//! VarInt (Variable Integer) is a compact encoding for integers used throughout
//! Bitcoin's wire format. It uses 1-9 bytes depending on the value.
//!
//! Encoding rules:
//! - If value < 0xfd: single byte
//! - If value <= 0xffff: 0xfd prefix + 2 bytes (little-endian)
//! - If value <= 0xffffffff: 0xfe prefix + 4 bytes (little-endian)
//! - Otherwise: 0xff prefix + 8 bytes (little-endian)
//!
//! Script lengths, input/output counts and redeem-script prefixes all go through here.

use crate::error::{Result, SigScriptError};
use std::borrow::Cow;

/// Error type for VarInt encoding/decoding failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VarIntError {
    /// Insufficient bytes to decode VarInt
    InsufficientBytes,
    /// Value encoded with a longer prefix than necessary
    NonCanonical,
}

impl std::fmt::Display for VarIntError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VarIntError::InsufficientBytes => write!(f, "Insufficient bytes to decode VarInt"),
            VarIntError::NonCanonical => write!(f, "Non-canonical VarInt encoding"),
        }
    }
}

impl std::error::Error for VarIntError {}

impl From<VarIntError> for SigScriptError {
    fn from(err: VarIntError) -> Self {
        SigScriptError::Serialization(Cow::Owned(err.to_string()))
    }
}

/// Encode a u64 value as a Bitcoin VarInt
///
/// # Examples
///
/// ```
/// use blvm_sigscript::serialization::varint::encode_varint;
///
/// assert_eq!(encode_varint(0), vec![0]);
/// assert_eq!(encode_varint(252), vec![252]);
/// assert_eq!(encode_varint(253), vec![0xfd, 253, 0]);
/// assert_eq!(encode_varint(65535), vec![0xfd, 255, 255]);
/// assert_eq!(encode_varint(65536), vec![0xfe, 0, 0, 1, 0]);
/// ```
pub fn encode_varint(value: u64) -> Vec<u8> {
    if value < 0xfd {
        vec![value as u8]
    } else if value <= 0xffff {
        let mut result = vec![0xfd];
        result.extend_from_slice(&(value as u16).to_le_bytes());
        result
    } else if value <= 0xffffffff {
        let mut result = vec![0xfe];
        result.extend_from_slice(&(value as u32).to_le_bytes());
        result
    } else {
        let mut result = vec![0xff];
        result.extend_from_slice(&value.to_le_bytes());

        let len = result.len();
        debug_assert!(
            len == 9,
            "8-byte VarInt encoding must produce exactly 9 bytes, got {len}"
        );

        result
    }
}

/// Decode a Bitcoin VarInt from bytes
///
/// Returns the decoded value and the number of bytes consumed.
///
/// # Examples
///
/// ```
/// use blvm_sigscript::serialization::varint::decode_varint;
///
/// assert_eq!(decode_varint(&[0]), Ok((0, 1)));
/// assert_eq!(decode_varint(&[252]), Ok((252, 1)));
/// assert_eq!(decode_varint(&[0xfd, 253, 0]), Ok((253, 3)));
/// assert_eq!(decode_varint(&[0xfe, 0, 0, 1, 0]), Ok((65536, 5)));
/// assert!(decode_varint(&[]).is_err());
/// ```
pub fn decode_varint(data: &[u8]) -> Result<(u64, usize)> {
    let first_byte = *data.first().ok_or(VarIntError::InsufficientBytes)?;

    match first_byte {
        b if b < 0xfd => Ok((b as u64, 1)),

        0xfd => {
            let bytes: [u8; 2] = take(data, 1)?;
            let value = u16::from_le_bytes(bytes) as u64;
            // Core rejects values < 0xfd encoded with the 0xfd prefix
            if value < 0xfd {
                return Err(VarIntError::NonCanonical.into());
            }
            Ok((value, 3))
        }

        0xfe => {
            let bytes: [u8; 4] = take(data, 1)?;
            let value = u32::from_le_bytes(bytes) as u64;
            if value <= 0xffff {
                return Err(VarIntError::NonCanonical.into());
            }
            Ok((value, 5))
        }

        _ => {
            let bytes: [u8; 8] = take(data, 1)?;
            let value = u64::from_le_bytes(bytes);
            if value <= 0xffffffff {
                return Err(VarIntError::NonCanonical.into());
            }
            Ok((value, 9))
        }
    }
}

fn take<const N: usize>(data: &[u8], offset: usize) -> Result<[u8; N]> {
    data.get(offset..offset + N)
        .and_then(|slice| slice.try_into().ok())
        .ok_or_else(|| VarIntError::InsufficientBytes.into())
}
