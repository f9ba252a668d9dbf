//! Core types shared across the crate

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::*;

/// Hash type: 256-bit hash
pub type Hash = [u8; 32];

/// Byte string type
pub type ByteString = Vec<u8>;

/// Hash160 digest: RIPEMD160(SHA256(x))
pub type Hash160 = [u8; 20];

/// Network selector for version bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Network {
    #[default]
    Mainnet,
    Testnet,
}

impl Network {
    #[inline]
    pub fn from_testnet(testnet: bool) -> Self {
        if testnet {
            Network::Testnet
        } else {
            Network::Mainnet
        }
    }

    #[inline]
    pub fn is_testnet(self) -> bool {
        matches!(self, Network::Testnet)
    }

    /// Version byte of a P2PKH address
    pub fn p2pkh_prefix(self) -> u8 {
        match self {
            Network::Mainnet => P2PKH_MAINNET_PREFIX,
            Network::Testnet => P2PKH_TESTNET_PREFIX,
        }
    }

    /// Version byte of a P2SH address
    pub fn p2sh_prefix(self) -> u8 {
        match self {
            Network::Mainnet => P2SH_MAINNET_PREFIX,
            Network::Testnet => P2SH_TESTNET_PREFIX,
        }
    }

    /// Version byte of a WIF private key
    pub fn wif_prefix(self) -> u8 {
        match self {
            Network::Mainnet => WIF_MAINNET_PREFIX,
            Network::Testnet => WIF_TESTNET_PREFIX,
        }
    }
}

/// OutPoint: previous transaction id (display byte order) and output index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OutPoint {
    pub hash: Hash,
    pub index: u32,
}

impl fmt::Display for OutPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", hex::encode(self.hash), self.index)
    }
}
