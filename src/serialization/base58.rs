//! Base58Check encoding for addresses and WIF keys
//!
//! Payload layout: version byte, body, first four bytes of HASH256(version || body).
//! The Base58 alphabet conversion itself (including `'1'` for each leading zero
//! byte) is delegated to `bs58`.

use std::borrow::Cow;

use crate::crypto::hash256;
use crate::error::{Result, SigScriptError};
use crate::types::{Hash160, Network};

const CHECKSUM_LEN: usize = 4;

/// Plain Base58 with the Bitcoin alphabet
pub fn encode_base58(data: &[u8]) -> String {
    bs58::encode(data).into_string()
}

/// Base58 of `payload || HASH256(payload)[..4]`
pub fn encode_base58_check(payload: &[u8]) -> String {
    let mut data = Vec::with_capacity(payload.len() + CHECKSUM_LEN);
    data.extend_from_slice(payload);
    data.extend_from_slice(&hash256(payload)[..CHECKSUM_LEN]);
    encode_base58(&data)
}

/// Decode a Base58Check string and return the payload with the checksum stripped
pub fn decode_base58_check(s: &str) -> Result<Vec<u8>> {
    let mut data = bs58::decode(s)
        .into_vec()
        .map_err(|e| SigScriptError::Base58(Cow::Owned(e.to_string())))?;
    if data.len() < CHECKSUM_LEN + 1 {
        return Err(SigScriptError::Base58("payload too short".into()));
    }
    let checksum = data.split_off(data.len() - CHECKSUM_LEN);
    if hash256(&data)[..CHECKSUM_LEN] != checksum[..] {
        return Err(SigScriptError::BadChecksum);
    }
    Ok(data)
}

/// Split an address into its version byte and 20-byte hash
pub fn decode_address(address: &str) -> Result<(u8, Hash160)> {
    let payload = decode_base58_check(address)?;
    let (version, body) = payload
        .split_first()
        .ok_or(SigScriptError::Base58("empty payload".into()))?;
    let h160: Hash160 = body.try_into().map_err(|_| {
        SigScriptError::Base58(Cow::Owned(format!(
            "expected 20-byte hash, got {}",
            body.len()
        )))
    })?;
    Ok((*version, h160))
}

/// P2PKH address for a HASH160 of a SEC public key
pub fn h160_to_p2pkh_address(h160: &Hash160, testnet: bool) -> String {
    let mut payload = vec![Network::from_testnet(testnet).p2pkh_prefix()];
    payload.extend_from_slice(h160);
    encode_base58_check(&payload)
}

/// P2SH address for a HASH160 of a redeem script
pub fn h160_to_p2sh_address(h160: &Hash160, testnet: bool) -> String {
    let mut payload = vec![Network::from_testnet(testnet).p2sh_prefix()];
    payload.extend_from_slice(h160);
    encode_base58_check(&payload)
}
