#![no_main]
use blvm_sigscript::transaction::Tx;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Legacy transaction parsing must never panic

    for testnet in [false, true] {
        let Ok(tx) = Tx::parse(data, testnet) else {
            continue;
        };
        let _serialized = tx.serialize();
        let _id = tx.id();
        let _display = tx.to_string();
    }
});
