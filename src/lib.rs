//! # blvm-sigscript
//!
//! secp256k1 arithmetic, deterministic ECDSA and a legacy Bitcoin script
//! interpreter, wired together into transaction signing and validation.
//!
//! ## Architecture
//!
//! Layers, leaves first:
//! - Finite field and generic curve group (`ecc`)
//! - secp256k1 points, signatures and private keys (`s256`)
//! - Script parsing and evaluation with P2SH expansion (`script`)
//! - Legacy transactions and the SIGHASH_ALL digest (`transaction`, `transaction_hash`)
//!
//! Previous outputs are never fetched here. Callers supply them through
//! [`prevout::PrevOutResolver`].
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: everything except `Tx::sign_input` is side-effect-free
//! 2. **Verdicts vs errors**: a failed script or signature is `Ok(false)`;
//!    `Err` means the inputs could not be interpreted at all
//! 3. **Exact Version Pinning**: consensus-relevant dependencies pinned to exact versions
//!
//! ## Usage
//!
//! ```rust
//! use blvm_sigscript::s256::PrivateKey;
//! use num_bigint::BigUint;
//!
//! let key = PrivateKey::new(BigUint::from(12345u32)).unwrap();
//! let z = BigUint::from(0xdeadbeefu32);
//! let sig = key.sign(&z).unwrap();
//! assert!(key.point().verify(&z, &sig).unwrap());
//! ```

pub mod config;
pub mod constants;
pub mod crypto;
pub mod ecc;
pub mod error;
pub mod opcodes;
pub mod prevout;
pub mod s256;
pub mod script;
pub mod serialization;
pub mod transaction;
pub mod transaction_hash;
pub mod types;

pub use config::{get_config, init_config, SigScriptConfig};
pub use ecc::{FieldElement, Point};
pub use error::{Result, SigScriptError};
pub use prevout::{PrevOutResolver, TxOutCache};
pub use s256::{PrivateKey, S256Point, Signature};
pub use script::{Command, Script};
pub use transaction::{Tx, TxIn, TxOut};
pub use transaction_hash::SighashType;
pub use types::*;
