//! PBKDF2 must never panic, must reject zero iterations, and must be
//! deterministic with shorter outputs as prefixes of longer ones.

use kpio_crypto::hash::HashAlgorithm;
use kpio_crypto::{pbkdf2, CryptoError, Pbkdf2Params};

use crate::{ByteReader, FuzzResult, FuzzTarget};

/// Keeps each iteration fast enough for the fuzzer.
const MAX_ITERATIONS: u16 = 64;

/// Input: registry hash id, iteration count, output length, password
/// length, then password and salt bytes.
pub struct Pbkdf2ParamsFuzzer;

impl FuzzTarget for Pbkdf2ParamsFuzzer {
    fn name(&self) -> &str {
        "pbkdf2_params"
    }

    fn fuzz(&mut self, input: &[u8]) -> FuzzResult {
        let mut r = ByteReader::new(input);
        let id = r.u8();
        let iterations = u32::from(r.u16() % (MAX_ITERATIONS + 1));
        let out_len = r.u8() as usize;
        let password_len = r.u8() as usize;
        let password = r.bytes(password_len);
        let salt = r.rest();

        let algorithm = match HashAlgorithm::from_id(id) {
            Ok(algorithm) => algorithm,
            Err(CryptoError::UnsupportedAlgorithm) => {
                return FuzzResult::Rejected(CryptoError::UnsupportedAlgorithm)
            }
            Err(_) => return FuzzResult::Violation("unexpected error for unknown id"),
        };

        let mut out = vec![0u8; out_len];
        match pbkdf2(password, salt, &mut out, iterations, algorithm) {
            Err(CryptoError::InvalidArgument) if iterations == 0 => {
                return FuzzResult::Rejected(CryptoError::InvalidArgument)
            }
            Ok(()) if iterations > 0 => {}
            _ => return FuzzResult::Violation("iteration check inconsistent"),
        }

        let params = match Pbkdf2Params::new(algorithm, iterations) {
            Ok(params) => params,
            Err(_) => return FuzzResult::Violation("params rejected after derive succeeded"),
        };
        let mut again = vec![0u8; out_len / 2];
        if params.derive(password, salt, &mut again).is_err() {
            return FuzzResult::Violation("derive failed");
        }
        if again[..] != out[..again.len()] {
            return FuzzResult::Violation("shorter output is not a prefix");
        }

        FuzzResult::Ok
    }
}
