//! Opcode operations and the 256-slot dispatch table
//!
//! Every operation reports success as `bool`; `false` makes the script fail.
//! Slots left `None` are opcodes this interpreter does not execute.

use std::sync::LazyLock;

use log::debug;
use num_bigint::BigUint;

use super::num::{cast_to_bool, decode_num, encode_bool, encode_num};
use super::tape::CommandTape;
use super::{Command, Stack};
use crate::crypto::{hash160, hash256, ripemd160, sha1, sha256};
use crate::opcodes::*;
use crate::s256::{S256Point, Signature};

/// Largest key count accepted by OP_CHECKMULTISIG
const MAX_PUBKEYS_PER_MULTISIG: i64 = 20;

/// An opcode implementation, tagged by the state it needs beyond the main stack
#[derive(Clone, Copy)]
pub enum Operation {
    Stack(fn(&mut Stack) -> bool),
    AltStack(fn(&mut Stack, &mut Stack) -> bool),
    Tape(fn(&mut Stack, &mut CommandTape) -> bool),
    Sighash(fn(&mut Stack, &BigUint) -> bool),
}

pub static OPERATIONS: LazyLock<[Option<Operation>; 256]> = LazyLock::new(build_table);

fn build_table() -> [Option<Operation>; 256] {
    use Operation::{AltStack, Sighash, Stack as S, Tape};

    let mut table: [Option<Operation>; 256] = [None; 256];
    let mut set = |op: u8, operation: Operation| table[op as usize] = Some(operation);

    set(OP_0, S(op_0));
    set(OP_1NEGATE, S(op_1negate));
    set(OP_1, S(op_push::<1>));
    set(OP_2, S(op_push::<2>));
    set(OP_3, S(op_push::<3>));
    set(0x54, S(op_push::<4>));
    set(0x55, S(op_push::<5>));
    set(0x56, S(op_push::<6>));
    set(0x57, S(op_push::<7>));
    set(0x58, S(op_push::<8>));
    set(0x59, S(op_push::<9>));
    set(0x5a, S(op_push::<10>));
    set(0x5b, S(op_push::<11>));
    set(0x5c, S(op_push::<12>));
    set(0x5d, S(op_push::<13>));
    set(0x5e, S(op_push::<14>));
    set(0x5f, S(op_push::<15>));
    set(OP_16, S(op_push::<16>));
    set(OP_NOP, S(op_nop));
    set(OP_IF, Tape(op_if));
    set(OP_NOTIF, Tape(op_notif));
    set(OP_ELSE, S(op_stray_branch));
    set(OP_ENDIF, S(op_stray_branch));
    set(OP_VERIFY, S(op_verify));
    set(OP_RETURN, S(op_return));
    set(OP_TOALTSTACK, AltStack(op_toaltstack));
    set(OP_FROMALTSTACK, AltStack(op_fromaltstack));
    set(OP_2DROP, S(op_2drop));
    set(OP_2DUP, S(op_2dup));
    set(OP_3DUP, S(op_3dup));
    set(OP_2OVER, S(op_2over));
    set(OP_2ROT, S(op_2rot));
    set(OP_2SWAP, S(op_2swap));
    set(OP_IFDUP, S(op_ifdup));
    set(OP_DEPTH, S(op_depth));
    set(OP_DROP, S(op_drop));
    set(OP_DUP, S(op_dup));
    set(OP_NIP, S(op_nip));
    set(OP_OVER, S(op_over));
    set(OP_PICK, S(op_pick));
    set(OP_ROLL, S(op_roll));
    set(OP_ROT, S(op_rot));
    set(OP_SWAP, S(op_swap));
    set(OP_TUCK, S(op_tuck));
    set(OP_SIZE, S(op_size));
    set(OP_EQUAL, S(op_equal));
    set(OP_EQUALVERIFY, S(op_equalverify));
    set(OP_1ADD, S(op_1add));
    set(OP_1SUB, S(op_1sub));
    set(OP_NEGATE, S(op_negate));
    set(OP_ABS, S(op_abs));
    set(OP_NOT, S(op_not));
    set(OP_0NOTEQUAL, S(op_0notequal));
    set(OP_ADD, S(op_add));
    set(OP_SUB, S(op_sub));
    set(OP_BOOLAND, S(op_booland));
    set(OP_BOOLOR, S(op_boolor));
    set(OP_NUMEQUAL, S(op_numequal));
    set(OP_NUMEQUALVERIFY, S(op_numequalverify));
    set(OP_NUMNOTEQUAL, S(op_numnotequal));
    set(OP_LESSTHAN, S(op_lessthan));
    set(OP_GREATERTHAN, S(op_greaterthan));
    set(OP_LESSTHANOREQUAL, S(op_lessthanorequal));
    set(OP_GREATERTHANOREQUAL, S(op_greaterthanorequal));
    set(OP_MIN, S(op_min));
    set(OP_MAX, S(op_max));
    set(OP_WITHIN, S(op_within));
    set(OP_RIPEMD160, S(op_ripemd160));
    set(OP_SHA1, S(op_sha1));
    set(OP_SHA256, S(op_sha256));
    set(OP_HASH160, S(op_hash160));
    set(OP_HASH256, S(op_hash256));
    set(OP_CHECKSIG, Sighash(op_checksig));
    set(OP_CHECKSIGVERIFY, Sighash(op_checksigverify));
    set(OP_CHECKMULTISIG, Sighash(op_checkmultisig));
    set(OP_CHECKMULTISIGVERIFY, Sighash(op_checkmultisigverify));
    set(OP_NOP1, S(op_nop));
    for op in OP_NOP4..=OP_NOP10 {
        set(op, S(op_nop));
    }
    table
}

// ============================================================================
// CONSTANTS
// ============================================================================

fn op_0(stack: &mut Stack) -> bool {
    stack.push(encode_num(0));
    true
}

fn op_1negate(stack: &mut Stack) -> bool {
    stack.push(encode_num(-1));
    true
}

/// OP_1 through OP_16
fn op_push<const N: i64>(stack: &mut Stack) -> bool {
    stack.push(encode_num(N));
    true
}

fn op_nop(_stack: &mut Stack) -> bool {
    true
}

// ============================================================================
// FLOW CONTROL
// ============================================================================

/// Split the tape at the matching OP_ENDIF, returning `(true_branch,
/// false_branch, consumed)`. Nested OP_IF/OP_NOTIF blocks are copied intact.
fn split_branches(tape: &CommandTape) -> Option<(Vec<Command>, Vec<Command>, usize)> {
    let mut true_branch = Vec::new();
    let mut false_branch = Vec::new();
    let mut in_else = false;
    let mut depth = 1usize;

    for (i, command) in tape.remaining().iter().enumerate() {
        let target = if in_else {
            &mut false_branch
        } else {
            &mut true_branch
        };
        match command {
            Command::Op(OP_IF | OP_NOTIF) => {
                depth += 1;
                target.push(command.clone());
            }
            Command::Op(OP_ELSE) if depth == 1 => in_else = !in_else,
            Command::Op(OP_ENDIF) if depth == 1 => {
                return Some((true_branch, false_branch, i + 1));
            }
            Command::Op(OP_ENDIF) => {
                depth -= 1;
                target.push(command.clone());
            }
            _ => target.push(command.clone()),
        }
    }
    None
}

fn branch(stack: &mut Stack, tape: &mut CommandTape, take_true_on: bool) -> bool {
    let Some((true_branch, false_branch, consumed)) = split_branches(tape) else {
        return false;
    };
    let Some(condition) = stack.pop() else {
        return false;
    };
    let chosen = if cast_to_bool(&condition) == take_true_on {
        true_branch
    } else {
        false_branch
    };
    tape.replace_front(consumed, chosen);
    true
}

fn op_if(stack: &mut Stack, tape: &mut CommandTape) -> bool {
    branch(stack, tape, true)
}

fn op_notif(stack: &mut Stack, tape: &mut CommandTape) -> bool {
    branch(stack, tape, false)
}

/// OP_ELSE / OP_ENDIF reached outside a branch taken by OP_IF
fn op_stray_branch(_stack: &mut Stack) -> bool {
    false
}

fn op_verify(stack: &mut Stack) -> bool {
    matches!(stack.pop(), Some(top) if cast_to_bool(&top))
}

fn op_return(_stack: &mut Stack) -> bool {
    false
}

// ============================================================================
// STACK
// ============================================================================

fn op_toaltstack(stack: &mut Stack, altstack: &mut Stack) -> bool {
    match stack.pop() {
        Some(item) => {
            altstack.push(item);
            true
        }
        None => false,
    }
}

fn op_fromaltstack(stack: &mut Stack, altstack: &mut Stack) -> bool {
    match altstack.pop() {
        Some(item) => {
            stack.push(item);
            true
        }
        None => false,
    }
}

fn op_2drop(stack: &mut Stack) -> bool {
    if stack.len() < 2 {
        return false;
    }
    stack.truncate(stack.len() - 2);
    true
}

/// Copy `count` items starting `depth` from the top onto the top
fn copy_from_top(stack: &mut Stack, depth: usize, count: usize) -> bool {
    if stack.len() < depth {
        return false;
    }
    let start = stack.len() - depth;
    stack.extend_from_within(start..start + count);
    true
}

fn op_2dup(stack: &mut Stack) -> bool {
    copy_from_top(stack, 2, 2)
}

fn op_3dup(stack: &mut Stack) -> bool {
    copy_from_top(stack, 3, 3)
}

fn op_2over(stack: &mut Stack) -> bool {
    copy_from_top(stack, 4, 2)
}

fn op_2rot(stack: &mut Stack) -> bool {
    if stack.len() < 6 {
        return false;
    }
    let start = stack.len() - 6;
    let moved: Vec<_> = stack.drain(start..start + 2).collect();
    stack.extend(moved);
    true
}

fn op_2swap(stack: &mut Stack) -> bool {
    if stack.len() < 4 {
        return false;
    }
    let start = stack.len() - 4;
    stack[start..].rotate_left(2);
    true
}

fn op_ifdup(stack: &mut Stack) -> bool {
    match stack.last() {
        Some(top) => {
            if cast_to_bool(top) {
                let top = top.clone();
                stack.push(top);
            }
            true
        }
        None => false,
    }
}

fn op_depth(stack: &mut Stack) -> bool {
    stack.push(encode_num(stack.len() as i64));
    true
}

fn op_drop(stack: &mut Stack) -> bool {
    stack.pop().is_some()
}

fn op_dup(stack: &mut Stack) -> bool {
    copy_from_top(stack, 1, 1)
}

fn op_nip(stack: &mut Stack) -> bool {
    if stack.len() < 2 {
        return false;
    }
    stack.remove(stack.len() - 2);
    true
}

fn op_over(stack: &mut Stack) -> bool {
    copy_from_top(stack, 2, 1)
}

/// Pop `n` and check at least `n + 1` items remain
fn pop_depth(stack: &mut Stack) -> Option<usize> {
    let n = pop_num(stack)?;
    let n = usize::try_from(n).ok()?;
    (stack.len() > n).then_some(n)
}

fn op_pick(stack: &mut Stack) -> bool {
    match pop_depth(stack) {
        Some(n) => copy_from_top(stack, n + 1, 1),
        None => false,
    }
}

fn op_roll(stack: &mut Stack) -> bool {
    let Some(n) = pop_depth(stack) else {
        return false;
    };
    let item = stack.remove(stack.len() - 1 - n);
    stack.push(item);
    true
}

fn op_rot(stack: &mut Stack) -> bool {
    if stack.len() < 3 {
        return false;
    }
    let item = stack.remove(stack.len() - 3);
    stack.push(item);
    true
}

fn op_swap(stack: &mut Stack) -> bool {
    if stack.len() < 2 {
        return false;
    }
    let len = stack.len();
    stack.swap(len - 1, len - 2);
    true
}

fn op_tuck(stack: &mut Stack) -> bool {
    if stack.len() < 2 {
        return false;
    }
    let top = stack[stack.len() - 1].clone();
    stack.insert(stack.len() - 2, top);
    true
}

fn op_size(stack: &mut Stack) -> bool {
    match stack.last() {
        Some(top) => {
            let size = encode_num(top.len() as i64);
            stack.push(size);
            true
        }
        None => false,
    }
}

// ============================================================================
// EQUALITY
// ============================================================================

fn op_equal(stack: &mut Stack) -> bool {
    if stack.len() < 2 {
        return false;
    }
    let a = stack.pop();
    let b = stack.pop();
    stack.push(encode_bool(a == b));
    true
}

pub(crate) fn op_equalverify(stack: &mut Stack) -> bool {
    op_equal(stack) && op_verify(stack)
}

// ============================================================================
// ARITHMETIC
// ============================================================================

fn pop_num(stack: &mut Stack) -> Option<i64> {
    decode_num(&stack.pop()?)
}

fn unary(stack: &mut Stack, f: impl Fn(i64) -> i64) -> bool {
    match pop_num(stack) {
        Some(a) => {
            stack.push(encode_num(f(a)));
            true
        }
        None => false,
    }
}

/// Pops `b` (top) then `a`, pushes `f(a, b)`
fn binary(stack: &mut Stack, f: impl Fn(i64, i64) -> i64) -> bool {
    if stack.len() < 2 {
        return false;
    }
    match (pop_num(stack), pop_num(stack)) {
        (Some(b), Some(a)) => {
            stack.push(encode_num(f(a, b)));
            true
        }
        _ => false,
    }
}

fn op_1add(stack: &mut Stack) -> bool {
    unary(stack, |a| a + 1)
}

fn op_1sub(stack: &mut Stack) -> bool {
    unary(stack, |a| a - 1)
}

fn op_negate(stack: &mut Stack) -> bool {
    unary(stack, |a| -a)
}

fn op_abs(stack: &mut Stack) -> bool {
    unary(stack, i64::abs)
}

fn op_not(stack: &mut Stack) -> bool {
    unary(stack, |a| (a == 0) as i64)
}

fn op_0notequal(stack: &mut Stack) -> bool {
    unary(stack, |a| (a != 0) as i64)
}

fn op_add(stack: &mut Stack) -> bool {
    binary(stack, |a, b| a + b)
}

fn op_sub(stack: &mut Stack) -> bool {
    binary(stack, |a, b| a - b)
}

fn op_booland(stack: &mut Stack) -> bool {
    binary(stack, |a, b| (a != 0 && b != 0) as i64)
}

fn op_boolor(stack: &mut Stack) -> bool {
    binary(stack, |a, b| (a != 0 || b != 0) as i64)
}

fn op_numequal(stack: &mut Stack) -> bool {
    binary(stack, |a, b| (a == b) as i64)
}

fn op_numequalverify(stack: &mut Stack) -> bool {
    op_numequal(stack) && op_verify(stack)
}

fn op_numnotequal(stack: &mut Stack) -> bool {
    binary(stack, |a, b| (a != b) as i64)
}

fn op_lessthan(stack: &mut Stack) -> bool {
    binary(stack, |a, b| (a < b) as i64)
}

fn op_greaterthan(stack: &mut Stack) -> bool {
    binary(stack, |a, b| (a > b) as i64)
}

fn op_lessthanorequal(stack: &mut Stack) -> bool {
    binary(stack, |a, b| (a <= b) as i64)
}

fn op_greaterthanorequal(stack: &mut Stack) -> bool {
    binary(stack, |a, b| (a >= b) as i64)
}

fn op_min(stack: &mut Stack) -> bool {
    binary(stack, i64::min)
}

fn op_max(stack: &mut Stack) -> bool {
    binary(stack, i64::max)
}

/// `min <= x < max`, with `max` on top
fn op_within(stack: &mut Stack) -> bool {
    if stack.len() < 3 {
        return false;
    }
    match (pop_num(stack), pop_num(stack), pop_num(stack)) {
        (Some(max), Some(min), Some(x)) => {
            stack.push(encode_bool(min <= x && x < max));
            true
        }
        _ => false,
    }
}

// ============================================================================
// CRYPTO
// ============================================================================

fn hash_top(stack: &mut Stack, f: impl Fn(&[u8]) -> Vec<u8>) -> bool {
    match stack.pop() {
        Some(item) => {
            stack.push(f(&item));
            true
        }
        None => false,
    }
}

fn op_ripemd160(stack: &mut Stack) -> bool {
    hash_top(stack, |d| ripemd160(d).to_vec())
}

fn op_sha1(stack: &mut Stack) -> bool {
    hash_top(stack, |d| sha1(d).to_vec())
}

fn op_sha256(stack: &mut Stack) -> bool {
    hash_top(stack, |d| sha256(d).to_vec())
}

pub(crate) fn op_hash160(stack: &mut Stack) -> bool {
    hash_top(stack, |d| hash160(d).to_vec())
}

fn op_hash256(stack: &mut Stack) -> bool {
    hash_top(stack, |d| hash256(d).to_vec())
}

/// Verify `sig_with_type` (DER plus one sighash byte) against a SEC key.
///
/// Undecodable material is a failed check, not an error.
fn check_signature(sig_with_type: &[u8], sec: &[u8], z: &BigUint) -> bool {
    let Some((_sighash_type, der)) = sig_with_type.split_last() else {
        debug!("checksig: empty signature");
        return false;
    };
    let point = match S256Point::parse(sec) {
        Ok(point) => point,
        Err(e) => {
            debug!("checksig: {e}");
            return false;
        }
    };
    let sig = match Signature::parse(der) {
        Ok(sig) => sig,
        Err(e) => {
            debug!("checksig: {e}");
            return false;
        }
    };
    match point.verify(z, &sig) {
        Ok(valid) => valid,
        Err(e) => {
            debug!("checksig: {e}");
            false
        }
    }
}

fn op_checksig(stack: &mut Stack, z: &BigUint) -> bool {
    if stack.len() < 2 {
        return false;
    }
    let (Some(sec), Some(sig)) = (stack.pop(), stack.pop()) else {
        return false;
    };
    stack.push(encode_bool(check_signature(&sig, &sec, z)));
    true
}

fn op_checksigverify(stack: &mut Stack, z: &BigUint) -> bool {
    op_checksig(stack, z) && op_verify(stack)
}

/// Pop a count followed by that many items, returned in script order
fn pop_counted(stack: &mut Stack, max: i64) -> Option<Vec<Vec<u8>>> {
    let count = pop_num(stack)?;
    if !(0..=max).contains(&count) {
        return None;
    }
    let count = count as usize;
    if stack.len() < count {
        return None;
    }
    Some(stack.split_off(stack.len() - count))
}

/// m-of-n check. Signatures must match keys in order; one extra item below
/// the signatures is consumed and ignored.
fn op_checkmultisig(stack: &mut Stack, z: &BigUint) -> bool {
    let Some(keys) = pop_counted(stack, MAX_PUBKEYS_PER_MULTISIG) else {
        return false;
    };
    let Some(sigs) = pop_counted(stack, keys.len() as i64) else {
        return false;
    };
    if stack.pop().is_none() {
        return false;
    }

    let mut remaining_keys = keys.iter();
    let valid = sigs
        .iter()
        .all(|sig| remaining_keys.any(|key| check_signature(sig, key, z)));
    stack.push(encode_bool(valid));
    true
}

fn op_checkmultisigverify(stack: &mut Stack, z: &BigUint) -> bool {
    op_checkmultisig(stack, z) && op_verify(stack)
}
