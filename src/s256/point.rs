//! Public points on secp256k1, SEC encoding and ECDSA verification

use std::fmt;

use num_bigint::BigUint;
use num_traits::Zero;

use super::{inv_mod_n, s256_field, to_32_bytes, Signature, A, B, G, N, P};
use crate::config::get_config;
use crate::constants::{SEC_EVEN_PREFIX, SEC_ODD_PREFIX, SEC_UNCOMPRESSED_PREFIX};
use crate::crypto::hash160;
use crate::ecc::{FieldElement, Point};
use crate::error::{Result, SecError, SigScriptError};
use crate::serialization::base58::h160_to_p2pkh_address;
use crate::types::Hash160;

const SEC_COMPRESSED_LEN: usize = 33;
const SEC_UNCOMPRESSED_LEN: usize = 65;

/// A point on secp256k1 (or the point at infinity)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct S256Point(Point);

impl S256Point {
    /// Construct from affine coordinates, checking the curve equation
    pub fn new(x: BigUint, y: BigUint) -> Result<Self> {
        let x = FieldElement::new(x, P.clone())?;
        let y = FieldElement::new(y, P.clone())?;
        Point::new(x, y, A.clone(), B.clone()).map(Self)
    }

    pub(crate) fn from_point(point: Point) -> Self {
        Self(point)
    }

    pub fn generator() -> &'static S256Point {
        &G
    }

    pub fn infinity() -> Self {
        Self(Point::infinity(A.clone(), B.clone()))
    }

    #[inline]
    pub fn is_infinity(&self) -> bool {
        self.0.is_infinity()
    }

    pub fn x(&self) -> Option<&BigUint> {
        self.0.x().map(FieldElement::num)
    }

    pub fn y(&self) -> Option<&BigUint> {
        self.0.y().map(FieldElement::num)
    }

    /// The underlying generic curve point
    pub fn point(&self) -> &Point {
        &self.0
    }

    pub fn add(&self, other: &Self) -> Result<Self> {
        self.0.add(&other.0).map(Self)
    }

    /// Scalar multiplication with the coefficient reduced mod `n` first
    pub fn scalar_mul(&self, coefficient: &BigUint) -> Result<Self> {
        let coef = coefficient % &*N;
        self.0.scalar_mul(&coef).map(Self)
    }

    /// ECDSA verification of `sig` over message scalar `z`.
    ///
    /// Out-of-range `r`/`s` and a sum at infinity are rejections, not errors.
    pub fn verify(&self, z: &BigUint, sig: &Signature) -> Result<bool> {
        let (r, s) = (sig.r(), sig.s());
        if r.is_zero() || r >= &*N || s.is_zero() || s >= &*N {
            return Ok(false);
        }
        let s_inv = inv_mod_n(s);
        let u = (z * &s_inv) % &*N;
        let v = (r * &s_inv) % &*N;
        let total = G.scalar_mul(&u)?.add(&self.scalar_mul(&v)?)?;
        match total.x() {
            Some(x) => Ok(&(x % &*N) == r),
            None => Ok(false),
        }
    }

    /// SEC encoding: `02|03 || x` compressed, `04 || x || y` uncompressed
    pub fn sec(&self, compressed: bool) -> Result<Vec<u8>> {
        let (x, y) = match (self.x(), self.y()) {
            (Some(x), Some(y)) => (x, y),
            _ => return Err(SigScriptError::PointAtInfinity),
        };
        let mut out = Vec::with_capacity(if compressed {
            SEC_COMPRESSED_LEN
        } else {
            SEC_UNCOMPRESSED_LEN
        });
        if compressed {
            out.push(if y.bit(0) {
                SEC_ODD_PREFIX
            } else {
                SEC_EVEN_PREFIX
            });
            out.extend_from_slice(&to_32_bytes(x));
        } else {
            out.push(SEC_UNCOMPRESSED_PREFIX);
            out.extend_from_slice(&to_32_bytes(x));
            out.extend_from_slice(&to_32_bytes(y));
        }
        Ok(out)
    }

    /// Inverse of [`S256Point::sec`]; compressed keys recover `y` by square root
    /// and parity.
    pub fn parse(sec: &[u8]) -> Result<Self> {
        let prefix = *sec.first().ok_or(SecError::Empty)?;
        let expected = match prefix {
            SEC_UNCOMPRESSED_PREFIX => SEC_UNCOMPRESSED_LEN,
            SEC_EVEN_PREFIX | SEC_ODD_PREFIX => SEC_COMPRESSED_LEN,
            other => return Err(SecError::BadPrefix(other).into()),
        };
        if sec.len() != expected {
            return Err(SecError::BadLength {
                prefix,
                expected,
                actual: sec.len(),
            }
            .into());
        }

        let x = BigUint::from_bytes_be(&sec[1..33]);
        if prefix == SEC_UNCOMPRESSED_PREFIX {
            return Self::new(x, BigUint::from_bytes_be(&sec[33..65]));
        }

        let x_fe = FieldElement::new(x.clone(), P.clone())?;
        let alpha = x_fe.square().mul(&x_fe)?.add(&B)?;
        let beta = alpha.sqrt()?;
        if beta.square() != alpha {
            return Err(SigScriptError::NotOnCurve(x.to_string(), "?".to_string()));
        }
        let want_odd = prefix == SEC_ODD_PREFIX;
        let y = if beta.num().bit(0) == want_odd {
            beta
        } else {
            s256_field(&*P - beta.num())
        };
        Self::new(x, y.num().clone())
    }

    /// HASH160 of the SEC encoding
    pub fn hash160(&self, compressed: bool) -> Result<Hash160> {
        Ok(hash160(&self.sec(compressed)?))
    }

    /// Base58Check P2PKH address
    pub fn address(&self, compressed: bool, testnet: bool) -> Result<String> {
        Ok(h160_to_p2pkh_address(&self.hash160(compressed)?, testnet))
    }

    /// Address for the configured network and SEC form
    pub fn default_address(&self) -> Result<String> {
        let config = get_config();
        self.address(config.keys.compressed_sec, config.network.testnet)
    }
}

impl fmt::Display for S256Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.x(), self.y()) {
            (Some(x), Some(y)) => write!(f, "S256Point({:064x}, {:064x})", x, y),
            _ => write!(f, "S256Point(infinity)"),
        }
    }
}
