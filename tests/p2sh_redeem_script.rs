//! P2SH redeem script edge cases
//!
//! Tests for P2SH (Pay-to-Script-Hash) redemption. The redeem script travels as
//! the last push of the unlocking script; the interpreter hashes it against the
//! locking script and, on a match, runs it in place.

use blvm_sigscript::crypto::hash160;
use blvm_sigscript::error::SigScriptError;
use blvm_sigscript::opcodes::*;
use blvm_sigscript::s256::{PrivateKey, S256Point, Signature};
use blvm_sigscript::script::{p2sh_script, Command, Script};
use blvm_sigscript::serialization::base58::h160_to_p2sh_address;
use blvm_sigscript::transaction::{Tx, TxIn, TxOut};
use blvm_sigscript::types::OutPoint;
use num_bigint::BigUint;
use std::collections::HashMap;

/// 2-of-2 multisig redeem script from a published mainnet spend
const REDEEM_HEX: &str = "5221022626e955ea6ea6d98850c994f9107b036b1334f18ca8830bfff1295d21cfdb702103b287eaf122eea69030a0e9feed096bed8045c8b98bec453e1ffac7fbdbd4bb7152ae";

/// That spend with the redeem script standing in for input 0's unlocking script
const MODIFIED_TX_HEX: &str = "0100000001868278ed6ddfb6c1ed3ad5f8181eb0c7a385aa0836f01d5e4789e6bd304d87221a000000475221022626e955ea6ea6d98850c994f9107b036b1334f18ca8830bfff1295d21cfdb702103b287eaf122eea69030a0e9feed096bed8045c8b98bec453e1ffac7fbdbd4bb7152aeffffffff04d3b11400000000001976a914904a49878c0adfc3aa05de7afad2cc15f483a56a88ac7f400900000000001976a914418327e3f3dda4cf5b9089325a4b95abdfa0334088ac722c0c00000000001976a914ba35042cfe9fc66fd35ac2224eebdafd1028ad2788acdc4ace020000000017a91474d691da1574e6b3c192ecfb52cc8984ee7b6c568700000000";

fn big(hex_str: &str) -> BigUint {
    BigUint::parse_bytes(hex_str.as_bytes(), 16).unwrap()
}

fn signed(key: &PrivateKey, z: &BigUint) -> Vec<u8> {
    let mut sig = key.sign(z).unwrap().der();
    sig.push(0x01);
    sig
}

fn two_of_two(keys: &[PrivateKey; 2]) -> Vec<u8> {
    Script::new(vec![
        Command::Op(OP_2),
        Command::Data(keys[0].point().sec(true).unwrap()),
        Command::Data(keys[1].point().sec(true).unwrap()),
        Command::Op(OP_2),
        Command::Op(OP_CHECKMULTISIG),
    ])
    .raw_serialize()
    .unwrap()
}

/// Test the published redeem script hashes to its address
#[test]
fn test_redeem_script_address() {
    let redeem = hex::decode(REDEEM_HEX).unwrap();
    let h160 = hash160(&redeem);
    assert_eq!(hex::encode(h160), "74d691da1574e6b3c192ecfb52cc8984ee7b6c56");
    assert_eq!(
        h160_to_p2sh_address(&h160, false),
        "3CLoMMyuoDQTPRD3XYZtCvgvkadrAdvdXh"
    );
    let script = Script::from_raw(&redeem).unwrap();
    assert_eq!(script.commands().len(), 5);
    assert_eq!(script.raw_serialize().unwrap(), redeem);
}

/// Test the sighash over a redeem script against the published spend
#[test]
fn test_sig_hash_with_redeem_vector() {
    let mut tx = Tx::parse(&hex::decode(MODIFIED_TX_HEX).unwrap(), false).unwrap();
    tx.tx_ins[0].script_sig = Script::default();
    let redeem = Script::from_raw(&hex::decode(REDEEM_HEX).unwrap()).unwrap();

    let z = tx.sig_hash_with_redeem(0, &redeem).unwrap();
    assert_eq!(
        z,
        big("e71bfa115715d6fd33796948126f40a8cdd39f187e4afb03896795189fe1423c")
    );

    let sec = hex::decode("022626e955ea6ea6d98850c994f9107b036b1334f18ca8830bfff1295d21cfdb70")
        .unwrap();
    let der = hex::decode(
        "3045022100dc92655fe37036f47756db8102e0d7d5e28b3beb83a8fef4f5dc0559bddfb94e\
         02205a36d4e4e6c7fcd16658c50783e00c341609977aed3ad00937bf4ee942a89937",
    )
    .unwrap();
    let point = S256Point::parse(&sec).unwrap();
    let sig = Signature::parse(&der).unwrap();
    assert!(point.verify(&z, &sig).unwrap());
}

/// Test redeem script evaluation order
///
/// P2SH evaluation: unlocking pushes run, the redeem script hash is checked,
/// then the redeem script runs against what is left on the stack
#[test]
fn test_redeem_script_evaluation_order() {
    // Redeem script: OP_ADD 5 OP_EQUAL, satisfied by 2 3
    let redeem = vec![OP_ADD, OP_N_BASE + 5, OP_EQUAL];
    let locking = p2sh_script(&hash160(&redeem));

    let unlocking = Script::new(vec![
        Command::Op(OP_2),
        Command::Op(OP_3),
        Command::Data(redeem.clone()),
    ]);
    assert!(unlocking.concat(&locking).evaluate(&BigUint::from(0u32)).unwrap());

    let wrong = Script::new(vec![
        Command::Op(OP_2),
        Command::Op(OP_2),
        Command::Data(redeem),
    ]);
    assert!(!wrong.concat(&locking).evaluate(&BigUint::from(0u32)).unwrap());
}

/// Test hash mismatch fails before any splice
#[test]
fn test_redeem_hash_mismatch() {
    let redeem = vec![OP_1];
    let locking = p2sh_script(&hash160(&[OP_2]));
    let unlocking = Script::new(vec![Command::Data(redeem)]);
    assert_eq!(
        unlocking.concat(&locking).evaluate(&BigUint::from(0u32)),
        Ok(false)
    );
}

/// Test an unparseable redeem script with a matching hash is an error
#[test]
fn test_unparseable_redeem_script() {
    // Push of 5 bytes with only one following
    let redeem = vec![0x05, 0x01];
    let locking = p2sh_script(&hash160(&redeem));
    let unlocking = Script::new(vec![Command::Data(redeem)]);
    assert!(matches!(
        unlocking.concat(&locking).evaluate(&BigUint::from(0u32)),
        Err(SigScriptError::ScriptParse(_))
    ));
}

/// Test the tail is only recognised directly after a data push
#[test]
fn test_tail_after_opcode_is_plain_hash_check() {
    // OP_1 then the tail: no splice, just HASH160(0x01) vs the hash
    let locking = p2sh_script(&hash160(&[0x01]));
    let script = Script::new(vec![Command::Op(OP_1)]) + locking;
    assert!(script.evaluate(&BigUint::from(0u32)).unwrap());
}

/// Test spending a P2SH multisig output through a transaction
#[test]
fn test_p2sh_multisig_spend() {
    let keys = [
        PrivateKey::from_passphrase(b"p2sh key one").unwrap(),
        PrivateKey::from_passphrase(b"p2sh key two").unwrap(),
    ];
    let redeem_raw = two_of_two(&keys);
    let redeem = Script::from_raw(&redeem_raw).unwrap();

    let spent = TxIn::new([0x5a; 32], 0);
    let mut prevouts = HashMap::new();
    prevouts.insert(
        OutPoint {
            hash: spent.prev_tx,
            index: spent.prev_index,
        },
        TxOut::new(50_000, p2sh_script(&hash160(&redeem_raw))),
    );

    let mut tx = Tx::new(
        1,
        vec![spent],
        vec![TxOut::new(49_000, p2sh_script(&[0x77; 20]))],
        0,
        true,
    );
    let z = tx.sig_hash_with_redeem(0, &redeem).unwrap();
    tx.tx_ins[0].script_sig = Script::new(vec![
        Command::Op(OP_0),
        Command::Data(signed(&keys[0], &z)),
        Command::Data(signed(&keys[1], &z)),
        Command::Data(redeem_raw.clone()),
    ]);
    assert!(tx.verify_input(0, &prevouts).unwrap());
    assert!(tx.verify(&prevouts).unwrap());

    // Signatures in the wrong order
    tx.tx_ins[0].script_sig = Script::new(vec![
        Command::Op(OP_0),
        Command::Data(signed(&keys[1], &z)),
        Command::Data(signed(&keys[0], &z)),
        Command::Data(redeem_raw),
    ]);
    assert!(!tx.verify_input(0, &prevouts).unwrap());
}

/// Test a P2SH spend without any redeem script push
#[test]
fn test_p2sh_spend_without_redeem_push() {
    let spent = TxIn::new([0x5b; 32], 1);
    let mut prevouts = HashMap::new();
    prevouts.insert(
        OutPoint {
            hash: spent.prev_tx,
            index: spent.prev_index,
        },
        TxOut::new(1_000, p2sh_script(&[0x01; 20])),
    );
    let mut tx = Tx::new(1, vec![spent], vec![], 0, false);
    tx.tx_ins[0].script_sig = Script::new(vec![Command::Op(OP_1)]);
    assert!(!tx.verify_input(0, &prevouts).unwrap());
}
