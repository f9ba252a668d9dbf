//! Prime-field arithmetic over an arbitrary modulus
//!
//! Every result is reduced back into `[0, prime)`. Mixing elements of different
//! primes is a programming error and surfaces as `FieldMismatch` instead of
//! producing a plausible-looking number.

use std::fmt;

use num_bigint::{BigInt, BigUint};
use num_integer::Integer;
use num_traits::{One, Zero};

use crate::error::{Result, SigScriptError};

/// Element of the prime field `F_prime`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldElement {
    num: BigUint,
    prime: BigUint,
}

impl FieldElement {
    /// Create an element, rejecting `num >= prime` and moduli below 2
    pub fn new(num: BigUint, prime: BigUint) -> Result<Self> {
        if prime < BigUint::from(2u32) {
            return Err(SigScriptError::Domain(
                format!("field modulus {prime} is below 2").into(),
            ));
        }
        if num >= prime {
            return Err(SigScriptError::FieldRange {
                num: num.to_string(),
                prime: prime.to_string(),
            });
        }
        Ok(Self { num, prime })
    }

    /// Small-modulus convenience constructor
    pub fn from_u64(num: u64, prime: u64) -> Result<Self> {
        Self::new(BigUint::from(num), BigUint::from(prime))
    }

    /// Reduce an arbitrary integer into the field
    pub(crate) fn reduced(num: BigUint, prime: &BigUint) -> Self {
        Self {
            num: num % prime,
            prime: prime.clone(),
        }
    }

    #[inline]
    pub fn num(&self) -> &BigUint {
        &self.num
    }

    #[inline]
    pub fn prime(&self) -> &BigUint {
        &self.prime
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.num.is_zero()
    }

    fn ensure_same_field(&self, other: &Self, op: &'static str) -> Result<()> {
        if self.prime != other.prime {
            return Err(SigScriptError::FieldMismatch(op));
        }
        Ok(())
    }

    pub fn add(&self, other: &Self) -> Result<Self> {
        self.ensure_same_field(other, "add")?;
        Ok(Self::reduced(&self.num + &other.num, &self.prime))
    }

    pub fn sub(&self, other: &Self) -> Result<Self> {
        self.ensure_same_field(other, "subtract")?;
        Ok(Self::reduced(
            &self.num + &self.prime - &other.num,
            &self.prime,
        ))
    }

    pub fn mul(&self, other: &Self) -> Result<Self> {
        self.ensure_same_field(other, "multiply")?;
        Ok(Self::reduced(&self.num * &other.num, &self.prime))
    }

    /// `self * other^(p-2)`; fails when `other` is zero
    pub fn div(&self, other: &Self) -> Result<Self> {
        self.ensure_same_field(other, "divide")?;
        if other.is_zero() {
            return Err(SigScriptError::DivisionByZero(self.prime.to_string()));
        }
        let inverse = other.num.modpow(&(&self.prime - 2u32), &self.prime);
        Ok(Self::reduced(&self.num * inverse, &self.prime))
    }

    /// Exponentiation with the exponent taken modulo `p - 1` (Fermat), so negative
    /// exponents are inverses.
    pub fn pow(&self, exponent: &BigInt) -> Self {
        let order = BigInt::from(&self.prime - BigUint::one());
        let n = exponent.mod_floor(&order);
        Self {
            num: self.num.modpow(n.magnitude(), &self.prime),
            prime: self.prime.clone(),
        }
    }

    #[inline]
    pub fn square(&self) -> Self {
        Self::reduced(&self.num * &self.num, &self.prime)
    }

    /// Integer coefficient times element
    pub fn scale(&self, coefficient: &BigUint) -> Self {
        Self::reduced(&self.num * coefficient, &self.prime)
    }

    /// Additive inverse
    pub fn neg(&self) -> Self {
        Self::reduced(&self.prime - &self.num, &self.prime)
    }

    /// `x^((p+1)/4)`, one of the two square roots when one exists.
    ///
    /// Only valid for `p ≡ 3 (mod 4)`.
    pub fn sqrt(&self) -> Result<Self> {
        if &self.prime % 4u32 != BigUint::from(3u32) {
            return Err(SigScriptError::Domain(
                "sqrt requires a prime congruent to 3 mod 4".into(),
            ));
        }
        let exponent = (&self.prime + 1u32) / 4u32;
        Ok(Self {
            num: self.num.modpow(&exponent, &self.prime),
            prime: self.prime.clone(),
        })
    }

    /// Big-endian bytes left-padded to `len`
    pub fn to_bytes_be(&self, len: usize) -> Vec<u8> {
        let bytes = self.num.to_bytes_be();
        let mut out = vec![0u8; len.saturating_sub(bytes.len())];
        out.extend_from_slice(&bytes);
        out
    }
}

impl fmt::Display for FieldElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FieldElement_{}({})", self.prime, self.num)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fe(num: u64, prime: u64) -> FieldElement {
        FieldElement::from_u64(num, prime).unwrap()
    }

    #[test]
    fn test_out_of_range_rejected() {
        assert!(matches!(
            FieldElement::from_u64(31, 31),
            Err(SigScriptError::FieldRange { .. })
        ));
        assert!(FieldElement::from_u64(30, 31).is_ok());
    }

    #[test]
    fn test_degenerate_modulus_rejected() {
        for prime in [0, 1] {
            assert!(matches!(
                FieldElement::from_u64(0, prime),
                Err(SigScriptError::Domain(_))
            ));
        }
        assert!(FieldElement::from_u64(1, 2).is_ok());
    }

    #[test]
    fn test_equality() {
        assert_eq!(fe(2, 31), fe(2, 31));
        assert_ne!(fe(2, 31), fe(15, 31));
        assert_ne!(fe(2, 31), fe(2, 37));
    }

    #[test]
    fn test_add() {
        assert_eq!(fe(2, 31).add(&fe(15, 31)).unwrap(), fe(17, 31));
        assert_eq!(fe(17, 31).add(&fe(21, 31)).unwrap(), fe(7, 31));
    }

    #[test]
    fn test_sub() {
        assert_eq!(fe(29, 31).sub(&fe(4, 31)).unwrap(), fe(25, 31));
        assert_eq!(fe(15, 31).sub(&fe(30, 31)).unwrap(), fe(16, 31));
    }

    #[test]
    fn test_mul() {
        assert_eq!(fe(24, 31).mul(&fe(19, 31)).unwrap(), fe(22, 31));
    }

    #[test]
    fn test_pow() {
        assert_eq!(fe(17, 31).pow(&BigInt::from(3)), fe(15, 31));
        let a = fe(5, 31).pow(&BigInt::from(5));
        assert_eq!(a.mul(&fe(18, 31)).unwrap(), fe(16, 31));
    }

    #[test]
    fn test_negative_pow() {
        assert_eq!(fe(17, 31).pow(&BigInt::from(-3)), fe(29, 31));
        let a = fe(4, 31).pow(&BigInt::from(-4));
        assert_eq!(a.mul(&fe(11, 31)).unwrap(), fe(13, 31));
    }

    #[test]
    fn test_div() {
        assert_eq!(fe(3, 31).div(&fe(24, 31)).unwrap(), fe(4, 31));
    }

    #[test]
    fn test_div_by_zero() {
        assert!(matches!(
            fe(3, 31).div(&fe(0, 31)),
            Err(SigScriptError::DivisionByZero(_))
        ));
    }

    #[test]
    fn test_mismatched_primes() {
        let a = fe(2, 31);
        let b = fe(2, 37);
        assert_eq!(a.add(&b), Err(SigScriptError::FieldMismatch("add")));
        assert_eq!(a.sub(&b), Err(SigScriptError::FieldMismatch("subtract")));
        assert_eq!(a.mul(&b), Err(SigScriptError::FieldMismatch("multiply")));
        assert_eq!(a.div(&b), Err(SigScriptError::FieldMismatch("divide")));
    }

    #[test]
    fn test_scale_and_neg() {
        assert_eq!(fe(20, 31).scale(&BigUint::from(3u32)), fe(29, 31));
        assert_eq!(fe(0, 31).neg(), fe(0, 31));
        assert_eq!(fe(5, 31).neg(), fe(26, 31));
    }

    #[test]
    fn test_sqrt() {
        // 31 ≡ 3 mod 4
        let root = fe(5, 31).square().sqrt().unwrap();
        assert!(root == fe(5, 31) || root == fe(26, 31));
        assert!(matches!(fe(4, 13).sqrt(), Err(SigScriptError::Domain(_))));
    }

    #[test]
    fn test_display() {
        assert_eq!(fe(7, 13).to_string(), "FieldElement_13(7)");
    }
}
