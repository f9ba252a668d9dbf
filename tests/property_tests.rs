//! Property-based tests for arithmetic and encoding invariants
//!
//! Uses PropTest to check field laws over the secp256k1 base field, encoding
//! round trips and sign/verify agreement on random keys.

use blvm_sigscript::ecc::FieldElement;
use blvm_sigscript::opcodes::{OP_PUSHBYTES_MAX, OP_PUSHDATA4};
use blvm_sigscript::s256::{PrivateKey, S256Point, Signature, HALF_N, N, P};
use blvm_sigscript::script::num::{cast_to_bool, decode_num, encode_num};
use blvm_sigscript::script::{Command, Script};
use blvm_sigscript::serialization::base58::{decode_base58_check, encode_base58_check};
use blvm_sigscript::serialization::varint::{decode_varint, encode_varint};
use num_bigint::{BigInt, BigUint};
use num_traits::Zero;
use proptest::prelude::*;

fn felt(bytes: &[u8; 32]) -> FieldElement {
    FieldElement::new(BigUint::from_bytes_be(bytes) % &*P, P.clone()).unwrap()
}

fn scalar(bytes: &[u8; 32]) -> BigUint {
    BigUint::from_bytes_be(bytes) % (&*N - 1u32) + 1u32
}

fn command() -> impl Strategy<Value = Command> {
    prop_oneof![
        // Non-push opcodes only: push opcodes are produced from Data
        any::<u8>()
            .prop_filter("push opcode", |op| *op == 0 || *op > OP_PUSHDATA4)
            .prop_map(Command::Op),
        prop::collection::vec(any::<u8>(), 1..=OP_PUSHBYTES_MAX as usize).prop_map(Command::Data),
        prop::collection::vec(any::<u8>(), 76..=520).prop_map(Command::Data),
    ]
}

// ============================================================================
// Field Laws
// ============================================================================

proptest! {
    #[test]
    fn field_add_commutes(a in any::<[u8; 32]>(), b in any::<[u8; 32]>()) {
        let (a, b) = (felt(&a), felt(&b));
        prop_assert_eq!(a.add(&b).unwrap(), b.add(&a).unwrap());
    }

    #[test]
    fn field_mul_distributes(
        a in any::<[u8; 32]>(),
        b in any::<[u8; 32]>(),
        c in any::<[u8; 32]>()
    ) {
        let (a, b, c) = (felt(&a), felt(&b), felt(&c));
        let left = a.mul(&b.add(&c).unwrap()).unwrap();
        let right = a.mul(&b).unwrap().add(&a.mul(&c).unwrap()).unwrap();
        prop_assert_eq!(left, right);
    }

    #[test]
    fn field_sub_inverts_add(a in any::<[u8; 32]>(), b in any::<[u8; 32]>()) {
        let (a, b) = (felt(&a), felt(&b));
        prop_assert_eq!(a.add(&b).unwrap().sub(&b).unwrap(), a.clone());
        prop_assert!(a.sub(&a).unwrap().is_zero());
    }

    #[test]
    fn field_div_inverts_mul(a in any::<[u8; 32]>(), b in any::<[u8; 32]>()) {
        let (a, b) = (felt(&a), felt(&b));
        prop_assume!(!b.is_zero());
        prop_assert_eq!(a.mul(&b).unwrap().div(&b).unwrap(), a);
    }

    #[test]
    fn field_negative_exponent_is_inverse(a in any::<[u8; 32]>()) {
        let a = felt(&a);
        prop_assume!(!a.is_zero());
        let one = FieldElement::new(BigUint::from(1u32), P.clone()).unwrap();
        prop_assert_eq!(a.pow(&BigInt::from(-1)).mul(&a).unwrap(), one);
    }

    #[test]
    fn field_sqrt_of_square(a in any::<[u8; 32]>()) {
        let a = felt(&a);
        let root = a.square().sqrt().unwrap();
        prop_assert!(root == a || root == a.neg());
    }
}

// ============================================================================
// Encoding Round Trips
// ============================================================================

proptest! {
    #[test]
    fn varint_round_trip(value in any::<u64>()) {
        let encoded = encode_varint(value);
        prop_assert_eq!(decode_varint(&encoded).unwrap(), (value, encoded.len()));
    }

    #[test]
    fn base58_check_round_trip(payload in prop::collection::vec(any::<u8>(), 1..64)) {
        let encoded = encode_base58_check(&payload);
        prop_assert_eq!(decode_base58_check(&encoded).unwrap(), payload);
    }

    #[test]
    fn der_round_trip(r in any::<[u8; 32]>(), s in any::<[u8; 32]>()) {
        let sig = Signature::new(scalar(&r), scalar(&s));
        let der = sig.der();
        prop_assert!(der.len() <= 72);
        prop_assert_eq!(Signature::parse(&der).unwrap(), sig);
    }

    #[test]
    fn script_num_round_trip(n in -(i32::MAX as i64)..=(i32::MAX as i64)) {
        let encoded = encode_num(n);
        prop_assert!(encoded.len() <= 4);
        prop_assert_eq!(decode_num(&encoded), Some(n));
        prop_assert_eq!(cast_to_bool(&encoded), n != 0);
    }

    #[test]
    fn script_serialization_round_trip(
        commands in prop::collection::vec(command(), 0..16)
    ) {
        let script = Script::new(commands);
        let serialized = script.serialize().unwrap();
        let (parsed, consumed) = Script::parse(&serialized).unwrap();
        prop_assert_eq!(consumed, serialized.len());
        prop_assert_eq!(parsed, script);
    }
}

// ============================================================================
// Keys and Signatures
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn sec_round_trip(secret in any::<[u8; 32]>()) {
        let key = PrivateKey::new(scalar(&secret)).unwrap();
        for compressed in [true, false] {
            let sec = key.point().sec(compressed).unwrap();
            prop_assert_eq!(&S256Point::parse(&sec).unwrap(), key.point());
        }
    }

    #[test]
    fn sign_then_verify(secret in any::<[u8; 32]>(), z in any::<[u8; 32]>()) {
        let key = PrivateKey::new(scalar(&secret)).unwrap();
        let z = BigUint::from_bytes_be(&z);
        let sig = key.sign(&z).unwrap();
        prop_assert!(!sig.r().is_zero());
        prop_assert!(sig.s() <= &*HALF_N);
        prop_assert!(key.point().verify(&z, &sig).unwrap());
        prop_assert!(!key.point().verify(&(z + 1u32), &sig).unwrap());
    }

    #[test]
    fn wif_round_trip(
        secret in any::<[u8; 32]>(),
        compressed in any::<bool>(),
        testnet in any::<bool>()
    ) {
        let key = PrivateKey::new(scalar(&secret)).unwrap();
        let (parsed, parsed_compressed, network) =
            PrivateKey::from_wif(&key.wif(compressed, testnet)).unwrap();
        prop_assert_eq!(parsed.secret(), key.secret());
        prop_assert_eq!(parsed_compressed, compressed);
        prop_assert_eq!(network.is_testnet(), testnet);
    }
}
