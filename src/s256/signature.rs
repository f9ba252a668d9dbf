//! ECDSA signature and its DER encoding
//!
//! `30 <len> 02 <rlen> r 02 <slen> s`, each integer minimal big-endian with a
//! `0x00` pad when the high bit is set.

use std::fmt;

use num_bigint::BigUint;

use crate::error::{DerError, Result};

const SEQUENCE_TAG: u8 = 0x30;
const INTEGER_TAG: u8 = 0x02;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Signature {
    r: BigUint,
    s: BigUint,
}

impl Signature {
    pub fn new(r: BigUint, s: BigUint) -> Self {
        Self { r, s }
    }

    #[inline]
    pub fn r(&self) -> &BigUint {
        &self.r
    }

    #[inline]
    pub fn s(&self) -> &BigUint {
        &self.s
    }

    pub fn der(&self) -> Vec<u8> {
        let r = der_integer(&self.r);
        let s = der_integer(&self.s);
        let mut out = Vec::with_capacity(2 + r.len() + s.len());
        out.push(SEQUENCE_TAG);
        out.push((r.len() + s.len()) as u8);
        out.extend_from_slice(&r);
        out.extend_from_slice(&s);
        out
    }

    /// Strict DER parse; each structural defect has its own [`DerError`]
    pub fn parse(der: &[u8]) -> Result<Self> {
        let tag = *der.first().ok_or(DerError::Truncated)?;
        if tag != SEQUENCE_TAG {
            return Err(DerError::BadSequenceTag(tag).into());
        }
        let declared = *der.get(1).ok_or(DerError::Truncated)? as usize;
        let actual = der.len() - 2;
        if declared != actual {
            return Err(DerError::LengthMismatch { declared, actual }.into());
        }

        let mut offset = 2;
        let r = read_integer(der, &mut offset)?;
        let s = read_integer(der, &mut offset)?;
        if offset != der.len() {
            return Err(DerError::TrailingBytes(der.len() - offset).into());
        }
        Ok(Self { r, s })
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({:x},{:x})", self.r, self.s)
    }
}

fn der_integer(value: &BigUint) -> Vec<u8> {
    let mut bytes = value.to_bytes_be();
    if bytes[0] & 0x80 != 0 {
        bytes.insert(0, 0x00);
    }
    let mut out = Vec::with_capacity(bytes.len() + 2);
    out.push(INTEGER_TAG);
    out.push(bytes.len() as u8);
    out.extend_from_slice(&bytes);
    out
}

fn read_integer(der: &[u8], offset: &mut usize) -> std::result::Result<BigUint, DerError> {
    let tag = *der.get(*offset).ok_or(DerError::Truncated)?;
    if tag != INTEGER_TAG {
        return Err(DerError::BadIntegerTag(tag));
    }
    let len = *der.get(*offset + 1).ok_or(DerError::Truncated)? as usize;
    if len == 0 {
        return Err(DerError::EmptyInteger);
    }
    let start = *offset + 2;
    let body = der.get(start..start + len).ok_or(DerError::Truncated)?;
    if body[0] & 0x80 != 0 {
        return Err(DerError::NegativeInteger);
    }
    // A zero pad is only allowed in front of a set high bit
    if len > 1 && body[0] == 0x00 && body[1] & 0x80 == 0 {
        return Err(DerError::NonMinimalInteger);
    }
    *offset = start + len;
    Ok(BigUint::from_bytes_be(body))
}
