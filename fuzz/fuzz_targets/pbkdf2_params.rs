//! PBKDF2 parameter handling
//!
//! Run with: cargo fuzz run pbkdf2_params

#![no_main]

use kpio_crypto_fuzz::{kdf::Pbkdf2ParamsFuzzer, FuzzTarget};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut target = Pbkdf2ParamsFuzzer;
    let result = target.fuzz(data);
    assert!(!result.is_violation(), "{}: {:?}", target.name(), result);
});
