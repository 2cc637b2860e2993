//! Incremental hashing must agree with the one-shot digest for any split.

use kpio_crypto::hash::{self, HashAlgorithm, HashContext, MAX_DIGEST_LEN};

use crate::{ByteReader, FuzzResult, FuzzTarget};

/// Input: algorithm selector, two split offsets, then the message.
pub struct HashSplitFuzzer;

impl FuzzTarget for HashSplitFuzzer {
    fn name(&self) -> &str {
        "hash_split"
    }

    fn fuzz(&mut self, input: &[u8]) -> FuzzResult {
        let mut r = ByteReader::new(input);
        let algorithm = HashAlgorithm::ALL[r.u8() as usize % HashAlgorithm::ALL.len()];
        let a = r.u16() as usize;
        let b = r.u16() as usize;
        let msg = r.rest();

        let mut first = a % (msg.len() + 1);
        let mut second = b % (msg.len() + 1);
        if first > second {
            core::mem::swap(&mut first, &mut second);
        }

        let len = algorithm.digest_len();
        let mut expected = [0u8; MAX_DIGEST_LEN];
        if let Err(e) = hash::hash(algorithm, msg, &mut expected) {
            return FuzzResult::Rejected(e);
        }

        let mut ctx = match HashContext::create(algorithm) {
            Ok(ctx) => ctx,
            Err(e) => return FuzzResult::Rejected(e),
        };
        for part in [&msg[..first], &msg[first..second], &msg[second..]] {
            if ctx.update(part).is_err() {
                return FuzzResult::Violation("update failed on a live context");
            }
        }
        if ctx.processed_len() != msg.len() as u128 {
            return FuzzResult::Violation("processed length mismatch");
        }

        let mut got = [0u8; MAX_DIGEST_LEN];
        if ctx.digest(&mut got).is_err() {
            return FuzzResult::Violation("digest failed on a live context");
        }
        if got[..len] != expected[..len] {
            return FuzzResult::Violation("split digest differs from one-shot");
        }
        if ctx.update(b"x").is_ok() {
            return FuzzResult::Violation("update accepted after digest");
        }
        FuzzResult::Ok
    }
}
