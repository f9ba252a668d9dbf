#![no_main]
use blvm_sigscript::script::Script;
use libfuzzer_sys::fuzz_target;
use num_bigint::BigUint;

fuzz_target!(|data: &[u8]| {
    // Script parsing and evaluation must never panic

    if data.len() < 2 {
        return;
    }

    // First byte picks where to split unlocking and locking scripts
    let body = &data[1..];
    let split = (data[0] as usize).min(body.len());
    let (sig_raw, pubkey_raw) = body.split_at(split);
    let z = BigUint::from_bytes_be(&body[..body.len().min(32)]);

    if let Ok(script) = Script::from_raw(body) {
        let _result = script.evaluate(&z);
        let _raw = script.raw_serialize();
        let _display = script.to_string();
    }

    // Unlocking ++ locking, including the P2SH tail
    if let (Ok(script_sig), Ok(script_pubkey)) =
        (Script::from_raw(sig_raw), Script::from_raw(pubkey_raw))
    {
        let _result = script_sig.concat(&script_pubkey).evaluate(&z);
    }
});
