#![no_main]
use blvm_sigscript::s256::{S256Point, Signature};
use libfuzzer_sys::fuzz_target;
use num_bigint::BigUint;

fuzz_target!(|data: &[u8]| {
    // DER and SEC parsing, then verification of whatever parses

    if data.len() < 2 {
        return;
    }

    // First byte: SEC length selector (33 or 65)
    let sec_len = if data[0] & 0x01 != 0 { 65 } else { 33 };
    let rest = &data[1..];

    // Accepted signatures are canonical, so they re-encode byte for byte
    if let Ok(sig) = Signature::parse(rest) {
        assert_eq!(sig.der(), rest);
    }

    if rest.len() < sec_len {
        return;
    }
    let (sec, der) = rest.split_at(sec_len);

    let Ok(point) = S256Point::parse(sec) else {
        return;
    };
    // Accepted keys re-encode to the bytes they came from
    let encoded = point.sec(sec_len == 33).expect("parsed point is finite");
    assert_eq!(encoded, sec);

    if let Ok(sig) = Signature::parse(der) {
        let z = BigUint::from_bytes_be(&data[..data.len().min(32)]);
        let _result = point.verify(&z, &sig);
    }
});
