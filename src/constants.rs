//! Protocol constants for keys, addresses, scripts and transactions

/// Maximum script element size; longer pushes cannot be serialized
pub const MAX_SCRIPT_ELEMENT_SIZE: usize = 520;

/// Default upper bound on a declared script length
pub const MAX_SCRIPT_SIZE: usize = 10_000;

/// Largest operand (in bytes) accepted by numeric opcodes
pub const MAX_SCRIPT_NUM_SIZE: usize = 4;

/// Length of a HASH160 digest
pub const HASH160_SIZE: usize = 20;

/// Sequence number for final transaction
pub const SEQUENCE_FINAL: u32 = 0xffffffff;

// ============================================================================
// VERSION BYTES
// ============================================================================

/// P2PKH address prefix, mainnet
pub const P2PKH_MAINNET_PREFIX: u8 = 0x00;
/// P2PKH address prefix, testnet
pub const P2PKH_TESTNET_PREFIX: u8 = 0x6f;
/// P2SH address prefix, mainnet
pub const P2SH_MAINNET_PREFIX: u8 = 0x05;
/// P2SH address prefix, testnet
pub const P2SH_TESTNET_PREFIX: u8 = 0xc4;
/// WIF prefix, mainnet
pub const WIF_MAINNET_PREFIX: u8 = 0x80;
/// WIF prefix, testnet
pub const WIF_TESTNET_PREFIX: u8 = 0xef;
/// Suffix marking a WIF key whose public key is SEC-compressed
pub const WIF_COMPRESSED_SUFFIX: u8 = 0x01;

// ============================================================================
// SEC PREFIXES
// ============================================================================

pub const SEC_EVEN_PREFIX: u8 = 0x02;
pub const SEC_ODD_PREFIX: u8 = 0x03;
pub const SEC_UNCOMPRESSED_PREFIX: u8 = 0x04;
