//! Finite field arithmetic
//!
//! Small-prime vectors where every result can be checked by hand, plus the
//! error paths for mixed fields, out-of-range values and division by zero.

use blvm_sigscript::ecc::FieldElement;
use blvm_sigscript::error::SigScriptError;
use num_bigint::{BigInt, BigUint};

fn f31(n: u64) -> FieldElement {
    FieldElement::from_u64(n, 31).unwrap()
}

#[test]
fn test_addition_and_subtraction_wrap() {
    assert_eq!(f31(2).add(&f31(15)).unwrap(), f31(17));
    assert_eq!(f31(17).add(&f31(21)).unwrap(), f31(7));
    assert_eq!(f31(29).sub(&f31(4)).unwrap(), f31(25));
    assert_eq!(f31(15).sub(&f31(30)).unwrap(), f31(16));
}

#[test]
fn test_multiplication_and_powers() {
    assert_eq!(f31(24).mul(&f31(19)).unwrap(), f31(22));
    assert_eq!(f31(17).pow(&BigInt::from(3)), f31(15));
    assert_eq!(
        f31(5).pow(&BigInt::from(5)).mul(&f31(18)).unwrap(),
        f31(16)
    );
}

#[test]
fn test_division_and_negative_exponents() {
    assert_eq!(f31(3).div(&f31(24)).unwrap(), f31(4));
    assert_eq!(f31(17).pow(&BigInt::from(-3)), f31(29));
    assert_eq!(
        f31(4).pow(&BigInt::from(-4)).mul(&f31(11)).unwrap(),
        f31(13)
    );
}

#[test]
fn test_exponent_reduced_by_fermat() {
    // a^(p-1) = 1 for non-zero a
    for n in 1..31 {
        assert_eq!(f31(n).pow(&BigInt::from(30)), f31(1));
        assert_eq!(f31(n).pow(&BigInt::from(31)), f31(n));
    }
}

#[test]
fn test_out_of_range_rejected() {
    assert_eq!(
        FieldElement::from_u64(31, 31),
        Err(SigScriptError::FieldRange {
            num: "31".into(),
            prime: "31".into()
        })
    );
    assert!(FieldElement::from_u64(30, 31).is_ok());
}

#[test]
fn test_mixed_fields_rejected() {
    let a = FieldElement::from_u64(2, 31).unwrap();
    let b = FieldElement::from_u64(2, 37).unwrap();
    assert_eq!(a.add(&b), Err(SigScriptError::FieldMismatch("add")));
    assert_eq!(a.sub(&b), Err(SigScriptError::FieldMismatch("subtract")));
    assert_eq!(a.mul(&b), Err(SigScriptError::FieldMismatch("multiply")));
    assert_eq!(a.div(&b), Err(SigScriptError::FieldMismatch("divide")));
}

#[test]
fn test_division_by_zero() {
    assert_eq!(
        f31(5).div(&f31(0)),
        Err(SigScriptError::DivisionByZero("31".into()))
    );
}

#[test]
fn test_sqrt_needs_three_mod_four() {
    // 31 = 3 mod 4; 16 has roots 4 and 27
    let root = f31(16).sqrt().unwrap();
    assert!(root == f31(4) || root == f31(27));
    assert_eq!(root.square(), f31(16));

    // 13 = 1 mod 4
    let e = FieldElement::from_u64(4, 13).unwrap();
    assert!(matches!(e.sqrt(), Err(SigScriptError::Domain(_))));
}

#[test]
fn test_neg_scale_and_bytes() {
    assert_eq!(f31(5).neg(), f31(26));
    assert_eq!(f31(0).neg(), f31(0));
    assert_eq!(f31(7).scale(&BigUint::from(5u32)), f31(4));
    assert_eq!(f31(7).to_bytes_be(4), vec![0, 0, 0, 7]);
    assert_eq!(f31(7).to_string(), "FieldElement_31(7)");
}
