//! Streamed AES-GCM seal must open with the one-shot API, and a corrupted
//! tag must fail without releasing plaintext.

use kpio_crypto::gcm::{open, AesGcm, TAG_LEN};
use kpio_crypto::CryptoError;

use crate::{ByteReader, FuzzResult, FuzzTarget};

const KEY_LENS: [usize; 3] = [16, 24, 32];

/// Input: key-size selector, IV length, AAD length, chunk size, tag bit to
/// flip, then key, IV, AAD and plaintext bytes.
pub struct GcmRoundTripFuzzer;

impl FuzzTarget for GcmRoundTripFuzzer {
    fn name(&self) -> &str {
        "gcm_roundtrip"
    }

    fn fuzz(&mut self, input: &[u8]) -> FuzzResult {
        let mut r = ByteReader::new(input);
        let key_len = KEY_LENS[r.u8() as usize % KEY_LENS.len()];
        let iv_len = r.u8() as usize % 33;
        let aad_len = r.u8() as usize;
        let chunk = (r.u8() as usize % 64) + 1;
        let flip = r.u8() as usize % (TAG_LEN * 8);

        let mut key = [0u8; 32];
        let key_src = r.bytes(key_len);
        key[..key_src.len()].copy_from_slice(key_src);
        let key = &key[..key_len];
        let iv = r.bytes(iv_len);
        let aad = r.bytes(aad_len);
        let plaintext = r.rest();

        let mut gcm = match AesGcm::new(key, iv) {
            Ok(gcm) => gcm,
            Err(CryptoError::InvalidArgument) if iv.is_empty() => {
                return FuzzResult::Rejected(CryptoError::InvalidArgument)
            }
            Err(_) => return FuzzResult::Violation("valid key and IV rejected"),
        };

        for part in aad.chunks(chunk) {
            if gcm.update_aad(part).is_err() {
                return FuzzResult::Violation("update_aad failed");
            }
        }
        let mut ciphertext = vec![0u8; plaintext.len()];
        for (src, dst) in plaintext.chunks(chunk).zip(ciphertext.chunks_mut(chunk)) {
            if gcm.encrypt(src, dst).is_err() {
                return FuzzResult::Violation("encrypt failed");
            }
        }
        let mut tag = [0u8; TAG_LEN];
        if gcm.digest(&mut tag).is_err() {
            return FuzzResult::Violation("digest failed");
        }

        let mut recovered = vec![0u8; ciphertext.len()];
        if open(key, iv, aad, &ciphertext, &tag, &mut recovered).is_err() {
            return FuzzResult::Violation("authentic message rejected");
        }
        if recovered != plaintext {
            return FuzzResult::Violation("round trip changed plaintext");
        }

        let mut bad_tag = tag;
        bad_tag[flip / 8] ^= 1 << (flip % 8);
        let mut leaked = vec![0u8; ciphertext.len()];
        match open(key, iv, aad, &ciphertext, &bad_tag, &mut leaked) {
            Err(CryptoError::AuthenticationFailed) => {}
            _ => return FuzzResult::Violation("corrupted tag accepted"),
        }
        if leaked.iter().any(|&b| b != 0) {
            return FuzzResult::Violation("plaintext released on failed open");
        }

        FuzzResult::Ok
    }
}
