//! Incremental vs one-shot hashing
//!
//! Run with: cargo fuzz run hash_split

#![no_main]

use kpio_crypto_fuzz::{hash::HashSplitFuzzer, FuzzTarget};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut target = HashSplitFuzzer;
    let result = target.fuzz(data);
    assert!(!result.is_violation(), "{}: {:?}", target.name(), result);
});
