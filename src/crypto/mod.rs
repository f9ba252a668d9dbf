//! Hash primitives used by keys, addresses, scripts and sighashes
//!
//! All digests come from the RustCrypto `sha2`, `sha1`, `ripemd` and `hmac` crates;
//! this module only fixes the Bitcoin compositions (HASH160, HASH256) and the
//! fixed-size array return types the rest of the crate expects.

use hmac::{Hmac, Mac};
use ripemd::Ripemd160;
use sha1::Sha1;
use sha2::{Digest, Sha256};

use crate::error::{Result, SigScriptError};
use crate::types::{Hash, Hash160};

type HmacSha256 = Hmac<Sha256>;

/// Single SHA256
#[inline]
pub fn sha256(data: &[u8]) -> Hash {
    Sha256::digest(data).into()
}

/// Double SHA256 (Bitcoin standard)
#[inline]
pub fn hash256(data: &[u8]) -> Hash {
    Sha256::digest(Sha256::digest(data)).into()
}

/// RIPEMD160
#[inline]
pub fn ripemd160(data: &[u8]) -> Hash160 {
    Ripemd160::digest(data).into()
}

/// RIPEMD160(SHA256(data))
#[inline]
pub fn hash160(data: &[u8]) -> Hash160 {
    Ripemd160::digest(Sha256::digest(data)).into()
}

/// SHA1, only reachable through OP_SHA1
#[inline]
pub fn sha1(data: &[u8]) -> [u8; 20] {
    Sha1::digest(data).into()
}

/// HMAC-SHA256 over the concatenation of `parts`
pub fn hmac_sha256(key: &[u8], parts: &[&[u8]]) -> Result<Hash> {
    let mut mac = HmacSha256::new_from_slice(key)
        .map_err(|_| SigScriptError::Domain("HMAC key rejected".into()))?;
    for part in parts {
        mac.update(part);
    }
    Ok(mac.finalize().into_bytes().into())
}
