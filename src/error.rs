//! Error types for field arithmetic, encodings, script execution and signing

use std::borrow::Cow;
use thiserror::Error;

/// Reasons a DER-encoded signature is rejected
#[derive(Error, Debug, PartialEq, Eq, Clone, Copy)]
pub enum DerError {
    #[error("bad sequence tag 0x{0:02x}")]
    BadSequenceTag(u8),

    #[error("declared length {declared} does not match buffer length {actual}")]
    LengthMismatch { declared: usize, actual: usize },

    #[error("bad integer tag 0x{0:02x}")]
    BadIntegerTag(u8),

    #[error("zero-length integer")]
    EmptyInteger,

    #[error("negative integer")]
    NegativeInteger,

    #[error("integer has a redundant leading zero")]
    NonMinimalInteger,

    #[error("signature truncated")]
    Truncated,

    #[error("{0} trailing bytes after signature")]
    TrailingBytes(usize),
}

/// Reasons a SEC-encoded public key is rejected
#[derive(Error, Debug, PartialEq, Eq, Clone, Copy)]
pub enum SecError {
    #[error("empty public key")]
    Empty,

    #[error("unknown prefix 0x{0:02x}")]
    BadPrefix(u8),

    #[error("prefix 0x{prefix:02x} requires {expected} bytes, got {actual}")]
    BadLength {
        prefix: u8,
        expected: usize,
        actual: usize,
    },
}

#[derive(Error, Debug, PartialEq, Clone)]
pub enum SigScriptError {
    #[error("Cannot {0} two numbers in different fields")]
    FieldMismatch(&'static str),

    #[error("Num {num} not in field range 0 to {prime} - 1")]
    FieldRange { num: String, prime: String },

    #[error("Division by zero in field of order {0}")]
    DivisionByZero(String),

    #[error("Field domain error: {0}")]
    Domain(Cow<'static, str>),

    #[error("Points are not on the same curve")]
    CurveMismatch,

    #[error("({0}, {1}) is not on the curve")]
    NotOnCurve(String, String),

    #[error("Point at infinity has no encoding")]
    PointAtInfinity,

    #[error("Malformed DER signature: {0}")]
    MalformedSignature(#[from] DerError),

    #[error("Malformed SEC public key: {0}")]
    MalformedPublicKey(#[from] SecError),

    #[error("Secret is outside [1, n)")]
    SecretOutOfRange,

    #[error("Script parse failed: {0}")]
    ScriptParse(Cow<'static, str>),

    #[error("Push of {0} bytes exceeds the 520 byte limit")]
    PushTooLong(usize),

    #[error("Unsupported opcode: 0x{0:02x}")]
    UnsupportedOpcode(u8),

    #[error("Serialization error: {0}")]
    Serialization(Cow<'static, str>),

    #[error("Base58 decode failed: {0}")]
    Base58(Cow<'static, str>),

    #[error("Bad Base58Check checksum")]
    BadChecksum,

    #[error("Previous output not found: {0}:{1}")]
    PrevOutNotFound(String, u32),

    #[error("Invalid input index: {0}")]
    InvalidInputIndex(usize),

    #[error("Invalid sighash type: {0}")]
    InvalidSighashType(u8),

    #[error("Configuration error: {0}")]
    Config(Cow<'static, str>),
}

pub type Result<T> = std::result::Result<T, SigScriptError>;
