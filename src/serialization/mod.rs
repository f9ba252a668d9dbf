//! Bitcoin wire format serialization/deserialization
//!
//! Consensus-critical encodings: VarInt, the legacy transaction layout and
//! Base58Check. All integers on the wire are little-endian.

pub mod base58;
pub mod transaction;
pub mod varint;

pub use base58::{
    decode_address, decode_base58_check, encode_base58, encode_base58_check,
    h160_to_p2pkh_address, h160_to_p2sh_address,
};
pub use transaction::{deserialize_transaction, serialize_transaction};
pub use varint::{decode_varint, encode_varint, VarIntError};
