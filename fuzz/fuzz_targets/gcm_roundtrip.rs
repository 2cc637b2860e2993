//! Streamed AES-GCM seal/open round trip
//!
//! Run with: cargo fuzz run gcm_roundtrip

#![no_main]

use kpio_crypto_fuzz::{gcm::GcmRoundTripFuzzer, FuzzTarget};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut target = GcmRoundTripFuzzer;
    let result = target.fuzz(data);
    assert!(!result.is_violation(), "{}: {:?}", target.name(), result);
});
