//! PBKDF2 (Password-Based Key Derivation Function 2) — RFC 8018 §5.2
//!
//! The PRF is HMAC over the selected hash. The password is absorbed once;
//! each of the `iterations` PRF calls per output block reuses the primed
//! HMAC templates through `Hmac::reset`, so the hot loop never allocates.

use zeroize::Zeroizing;

use crate::error::{CryptoError, Result};
use crate::hash::{HashAlgorithm, MAX_DIGEST_LEN};
use crate::hmac::Hmac;

/// Derive `out.len()` bytes from `password` and `salt`.
///
/// `iterations` must be at least 1 and the output may span at most
/// `2^32 - 1` PRF blocks. An empty `out` succeeds without doing any work.
pub fn pbkdf2(
    password: &[u8],
    salt: &[u8],
    out: &mut [u8],
    iterations: u32,
    algorithm: HashAlgorithm,
) -> Result<()> {
    if iterations == 0 {
        return Err(CryptoError::InvalidArgument);
    }
    if out.is_empty() {
        return Ok(());
    }

    let hlen = algorithm.digest_len();
    let blocks = (out.len() as u64 + hlen as u64 - 1) / hlen as u64;
    if blocks > u64::from(u32::MAX) {
        return Err(CryptoError::InvalidArgument);
    }

    log::debug!(
        "[KPIO Crypto] PBKDF2-HMAC-{}: {} iterations, {} byte salt, {} bytes out",
        algorithm.name(),
        iterations,
        salt.len(),
        out.len()
    );

    let mut prf = Hmac::new(password, algorithm)?;
    let mut u = Zeroizing::new([0u8; MAX_DIGEST_LEN]);
    let mut t = Zeroizing::new([0u8; MAX_DIGEST_LEN]);

    for (i, chunk) in out.chunks_mut(hlen).enumerate() {
        // Block indices are 1-based; the bound above keeps them in u32.
        let index = (i as u32).wrapping_add(1);

        // U_1 = PRF(P, S ‖ INT(i))
        prf.reset()?;
        prf.update(salt)?;
        prf.update(&index.to_be_bytes())?;
        prf.finalize(&mut u[..])?;
        t[..hlen].copy_from_slice(&u[..hlen]);

        // U_c = PRF(P, U_{c-1}); T_i = U_1 ^ ... ^ U_c
        for _ in 1..iterations {
            prf.reset()?;
            prf.update(&u[..hlen])?;
            prf.finalize(&mut u[..])?;
            for (acc, x) in t[..hlen].iter_mut().zip(u[..hlen].iter()) {
                *acc ^= x;
            }
        }

        chunk.copy_from_slice(&t[..chunk.len()]);
    }

    Ok(())
}

/// Stored KDF configuration, e.g. next to a password verifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pbkdf2Params {
    /// PRF hash.
    pub algorithm: HashAlgorithm,
    /// Iteration count (≥ 1).
    pub iterations: u32,
}

impl Default for Pbkdf2Params {
    fn default() -> Self {
        Self {
            algorithm: HashAlgorithm::Sha256,
            iterations: 10_000,
        }
    }
}

impl Pbkdf2Params {
    /// Validated constructor; zero iterations is rejected.
    pub fn new(algorithm: HashAlgorithm, iterations: u32) -> Result<Self> {
        if iterations == 0 {
            return Err(CryptoError::InvalidArgument);
        }
        Ok(Self { algorithm, iterations })
    }

    /// Run the KDF with these parameters.
    pub fn derive(&self, password: &[u8], salt: &[u8], out: &mut [u8]) -> Result<()> {
        pbkdf2(password, salt, out, self.iterations, self.algorithm)
    }
}
