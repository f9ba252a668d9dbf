//! Generic finite-field and elliptic-curve arithmetic
//!
//! These types work for any prime modulus and any `(a, b)` curve; the
//! secp256k1 specialisation lives in [`crate::s256`].

pub mod field;
pub mod point;

pub use field::FieldElement;
pub use point::Point;
