//! HMAC (Hash-based Message Authentication Code) — RFC 2104
//!
//! Works over any `HashAlgorithm`. The key is absorbed once, at
//! construction, into two primed hash states (`key ^ ipad` and
//! `key ^ opad`). `reset` restores the running inner state from its
//! template, so a keyed `Hmac` can authenticate any number of messages
//! without touching the key again. PBKDF2 depends on this.

use subtle::ConstantTimeEq;
use zeroize::Zeroizing;

use crate::error::{CryptoError, Result};
use crate::hash::{HashAlgorithm, HashContext, MAX_DIGEST_LEN};
use crate::mem::try_zeroed_vec;

const IPAD: u8 = 0x36;
const OPAD: u8 = 0x5c;

/// Keyed MAC context.
pub struct Hmac {
    algorithm: HashAlgorithm,
    /// Hash state after absorbing `key ^ ipad`.
    inner_keyed: HashContext,
    /// Hash state after absorbing `key ^ opad`.
    outer_keyed: HashContext,
    /// Running inner hash for the current message.
    inner: HashContext,
    /// Scratch for the outer hash at finalization.
    outer: HashContext,
    finished: bool,
}

impl Hmac {
    /// Key a new MAC. Keys longer than the block length are hashed first.
    pub fn new(key: &[u8], algorithm: HashAlgorithm) -> Result<Self> {
        let block_len = algorithm.block_len();
        let digest_len = algorithm.digest_len();

        let mut block: Zeroizing<alloc::vec::Vec<u8>> = Zeroizing::new(try_zeroed_vec(block_len)?);
        if key.len() > block_len {
            let mut h = HashContext::create(algorithm)?;
            h.update(key)?;
            h.digest(&mut block[..digest_len])?;
        } else {
            block[..key.len()].copy_from_slice(key);
        }

        for b in block.iter_mut() {
            *b ^= IPAD;
        }
        let mut inner_keyed = HashContext::create(algorithm)?;
        inner_keyed.update(&block)?;

        for b in block.iter_mut() {
            *b ^= IPAD ^ OPAD;
        }
        let mut outer_keyed = HashContext::create(algorithm)?;
        outer_keyed.update(&block)?;

        let inner = inner_keyed.try_clone()?;
        let outer = outer_keyed.try_clone()?;

        log::trace!(
            "[KPIO Crypto] HMAC-{} keyed ({} byte key{})",
            algorithm.name(),
            key.len(),
            if key.len() > block_len { ", hashed" } else { "" }
        );

        Ok(Self { algorithm, inner_keyed, outer_keyed, inner, outer, finished: false })
    }

    /// Key a new MAC for a registry hash id.
    pub fn from_id(key: &[u8], id: u8) -> Result<Self> {
        Self::new(key, HashAlgorithm::from_id(id)?)
    }

    /// Underlying hash algorithm.
    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    /// MAC length in bytes.
    pub fn digest_len(&self) -> usize {
        self.algorithm.digest_len()
    }

    /// Absorb message bytes.
    pub fn update(&mut self, data: &[u8]) -> Result<()> {
        if self.finished {
            return Err(CryptoError::InvalidState);
        }
        self.inner.update(data)
    }

    /// Write `H(opad ‖ H(ipad ‖ message))` to `out[..digest_len]`.
    pub fn finalize(&mut self, out: &mut [u8]) -> Result<()> {
        if self.finished {
            return Err(CryptoError::InvalidState);
        }
        let digest_len = self.digest_len();
        if out.len() < digest_len {
            return Err(CryptoError::InvalidArgument);
        }

        let mut inner_digest = Zeroizing::new([0u8; MAX_DIGEST_LEN]);
        self.inner.digest(&mut inner_digest[..digest_len])?;

        self.outer.restore_from(&self.outer_keyed)?;
        self.outer.update(&inner_digest[..digest_len])?;
        self.outer.digest(&mut out[..digest_len])?;

        self.finished = true;
        Ok(())
    }

    /// Finalize and compare against `tag` in constant time.
    pub fn verify(&mut self, tag: &[u8]) -> Result<()> {
        let mut computed = Zeroizing::new([0u8; MAX_DIGEST_LEN]);
        let digest_len = self.digest_len();
        self.finalize(&mut computed[..])?;

        if tag.len() == digest_len && bool::from(computed[..digest_len].ct_eq(tag)) {
            Ok(())
        } else {
            Err(CryptoError::AuthenticationFailed)
        }
    }

    /// Start a new message under the same key.
    pub fn reset(&mut self) -> Result<()> {
        self.inner.restore_from(&self.inner_keyed)?;
        self.finished = false;
        Ok(())
    }
}

/// One-shot HMAC of `data` under `key` into `out[..digest_len]`.
pub fn hmac(algorithm: HashAlgorithm, key: &[u8], data: &[u8], out: &mut [u8]) -> Result<()> {
    let mut mac = Hmac::new(key, algorithm)?;
    mac.update(data)?;
    mac.finalize(out)
}
