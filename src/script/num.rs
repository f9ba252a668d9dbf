//! Script number encoding: minimal little-endian sign-magnitude
//!
//! Zero is the empty byte string. The high bit of the last byte carries the
//! sign, so a magnitude whose top byte already has it set gets an extra
//! `0x00`/`0x80` byte.

use crate::constants::MAX_SCRIPT_NUM_SIZE;

pub fn encode_num(num: i64) -> Vec<u8> {
    if num == 0 {
        return Vec::new();
    }
    let negative = num < 0;
    let mut magnitude = num.unsigned_abs();
    let mut result = Vec::with_capacity(9);
    while magnitude > 0 {
        result.push((magnitude & 0xff) as u8);
        magnitude >>= 8;
    }
    let last = result.len() - 1;
    if result[last] & 0x80 != 0 {
        result.push(if negative { 0x80 } else { 0x00 });
    } else if negative {
        result[last] |= 0x80;
    }
    result
}

/// Decode a numeric operand; `None` when longer than four bytes
pub fn decode_num(bytes: &[u8]) -> Option<i64> {
    if bytes.len() > MAX_SCRIPT_NUM_SIZE {
        return None;
    }
    let Some((&last, _)) = bytes.split_last() else {
        return Some(0);
    };
    let mut result = 0i64;
    for (i, &byte) in bytes.iter().enumerate() {
        result |= (byte as i64) << (8 * i);
    }
    if last & 0x80 != 0 {
        result &= !(0x80i64 << (8 * (bytes.len() - 1)));
        result = -result;
    }
    Some(result)
}

/// Truthiness of a stack item: any non-zero byte, except a lone trailing sign bit
pub fn cast_to_bool(bytes: &[u8]) -> bool {
    for (i, &byte) in bytes.iter().enumerate() {
        if byte != 0 {
            return !(i == bytes.len() - 1 && byte == 0x80);
        }
    }
    false
}

#[inline]
pub fn encode_bool(value: bool) -> Vec<u8> {
    encode_num(value as i64)
}
