//! SHA-2 family: SHA-224, SHA-256, SHA-384, SHA-512 (FIPS 180-4)
//!
//! `HashContext` is the incremental, algorithm-agnostic engine. The algorithm
//! is picked once at construction from a static descriptor table; the
//! context's heap state is the chosen core and nothing larger.

mod sha256;
mod sha512;

use alloc::boxed::Box;

use crate::error::{CryptoError, Result};
use crate::mem::try_box;
use sha256::Sha256Core;
use sha512::Sha512Core;

/// Largest digest produced by any supported algorithm.
pub const MAX_DIGEST_LEN: usize = 64;

/// Largest block consumed by any supported algorithm.
pub const MAX_BLOCK_LEN: usize = 128;

/// Supported hash algorithms.
///
/// Ids follow the TLS HashAlgorithm registry (RFC 5246 §7.4.1.4.1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HashAlgorithm {
    /// SHA-224.
    Sha224,
    /// SHA-256.
    Sha256,
    /// SHA-384.
    Sha384,
    /// SHA-512.
    Sha512,
}

/// Initial chaining value, in the word width of the algorithm's core.
#[derive(Debug, Clone, Copy)]
pub enum InitialState {
    /// 32-bit words (SHA-224 / SHA-256 core).
    Words32(&'static [u32; 8]),
    /// 64-bit words (SHA-384 / SHA-512 core).
    Words64(&'static [u64; 8]),
}

/// Static description of one hash algorithm.
#[derive(Debug, Clone, Copy)]
pub struct HashDescriptor {
    /// Algorithm this entry describes.
    pub algorithm: HashAlgorithm,
    /// TLS registry id.
    pub id: u8,
    /// Display name.
    pub name: &'static str,
    /// Compression block length in bytes.
    pub block_len: usize,
    /// Digest length in bytes.
    pub digest_len: usize,
    /// Width of the big-endian message bit-length appended by the padding.
    pub length_field_len: usize,
    /// FIPS 180-4 initial hash value.
    pub initial_state: InitialState,
}

static DESCRIPTORS: [HashDescriptor; 4] = [
    HashDescriptor {
        algorithm: HashAlgorithm::Sha224,
        id: 3,
        name: "SHA-224",
        block_len: sha256::BLOCK_LEN,
        digest_len: 28,
        length_field_len: 8,
        initial_state: InitialState::Words32(&sha256::SHA224_IV),
    },
    HashDescriptor {
        algorithm: HashAlgorithm::Sha256,
        id: 4,
        name: "SHA-256",
        block_len: sha256::BLOCK_LEN,
        digest_len: 32,
        length_field_len: 8,
        initial_state: InitialState::Words32(&sha256::SHA256_IV),
    },
    HashDescriptor {
        algorithm: HashAlgorithm::Sha384,
        id: 5,
        name: "SHA-384",
        block_len: sha512::BLOCK_LEN,
        digest_len: 48,
        length_field_len: 16,
        initial_state: InitialState::Words64(&sha512::SHA384_IV),
    },
    HashDescriptor {
        algorithm: HashAlgorithm::Sha512,
        id: 6,
        name: "SHA-512",
        block_len: sha512::BLOCK_LEN,
        digest_len: 64,
        length_field_len: 16,
        initial_state: InitialState::Words64(&sha512::SHA512_IV),
    },
];

impl HashAlgorithm {
    /// All supported algorithms.
    pub const ALL: [HashAlgorithm; 4] = [
        HashAlgorithm::Sha224,
        HashAlgorithm::Sha256,
        HashAlgorithm::Sha384,
        HashAlgorithm::Sha512,
    ];

    /// Descriptor table entry.
    pub fn descriptor(self) -> &'static HashDescriptor {
        &DESCRIPTORS[self as usize]
    }

    /// Get the registry id.
    pub fn to_id(self) -> u8 {
        self.descriptor().id
    }

    /// Parse from registry id.
    pub fn from_id(id: u8) -> Result<Self> {
        DESCRIPTORS
            .iter()
            .find(|d| d.id == id)
            .map(|d| d.algorithm)
            .ok_or(CryptoError::UnsupportedAlgorithm)
    }

    /// Digest length in bytes.
    pub fn digest_len(self) -> usize {
        self.descriptor().digest_len
    }

    /// Block length in bytes.
    pub fn block_len(self) -> usize {
        self.descriptor().block_len
    }

    /// Display name.
    pub fn name(self) -> &'static str {
        self.descriptor().name
    }
}

impl TryFrom<u8> for HashAlgorithm {
    type Error = CryptoError;

    fn try_from(id: u8) -> Result<Self> {
        HashAlgorithm::from_id(id)
    }
}

/// Algorithm-tagged compression state. Each variant owns a box holding
/// exactly its core.
enum Engine {
    Sha256(Box<Sha256Core>),
    Sha512(Box<Sha512Core>),
}

/// Incremental hash context.
///
/// Lifecycle: `create` → any number of `update` → one `digest`. After
/// `digest` every further `update`/`digest` returns `InvalidState`.
pub struct HashContext {
    algorithm: HashAlgorithm,
    engine: Engine,
    finished: bool,
}

impl HashContext {
    /// Allocate a context for `algorithm`.
    pub fn create(algorithm: HashAlgorithm) -> Result<Self> {
        let descriptor = algorithm.descriptor();
        let engine = match descriptor.initial_state {
            InitialState::Words32(iv) => Engine::Sha256(try_box(Sha256Core::with_state(*iv))?),
            InitialState::Words64(iv) => Engine::Sha512(try_box(Sha512Core::with_state(*iv))?),
        };
        log::trace!(
            "[KPIO Crypto] {} context created (block {} bytes, digest {} bytes)",
            descriptor.name,
            descriptor.block_len,
            descriptor.digest_len
        );
        Ok(Self { algorithm, engine, finished: false })
    }

    /// Allocate a context from a registry id.
    pub fn from_id(id: u8) -> Result<Self> {
        Self::create(HashAlgorithm::from_id(id)?)
    }

    /// Algorithm this context was created for.
    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    /// Digest length in bytes.
    pub fn digest_len(&self) -> usize {
        self.algorithm.digest_len()
    }

    /// Block length in bytes.
    pub fn block_len(&self) -> usize {
        self.algorithm.block_len()
    }

    /// Whether `digest` has already been called.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Bytes absorbed so far.
    pub fn processed_len(&self) -> u128 {
        match &self.engine {
            Engine::Sha256(core) => u128::from(core.processed_len()),
            Engine::Sha512(core) => core.processed_len(),
        }
    }

    /// Absorb `data`.
    pub fn update(&mut self, data: &[u8]) -> Result<()> {
        if self.finished {
            return Err(CryptoError::InvalidState);
        }
        match &mut self.engine {
            Engine::Sha256(core) => core.update(data),
            Engine::Sha512(core) => core.update(data),
        }
        Ok(())
    }

    /// Finish the hash and write `digest_len` bytes to the front of `out`.
    ///
    /// A too-short `out` is rejected before anything is consumed, so the
    /// context stays usable.
    pub fn digest(&mut self, out: &mut [u8]) -> Result<()> {
        if self.finished {
            return Err(CryptoError::InvalidState);
        }
        let digest_len = self.digest_len();
        if out.len() < digest_len {
            return Err(CryptoError::InvalidArgument);
        }
        let out = &mut out[..digest_len];
        match &mut self.engine {
            Engine::Sha256(core) => {
                core.finalize_into(out);
                zeroize::Zeroize::zeroize(&mut **core);
            }
            Engine::Sha512(core) => {
                core.finalize_into(out);
                zeroize::Zeroize::zeroize(&mut **core);
            }
        }
        self.finished = true;
        Ok(())
    }

    /// Deep copy, allocating a new state box.
    pub fn try_clone(&self) -> Result<Self> {
        let engine = match &self.engine {
            Engine::Sha256(core) => Engine::Sha256(try_box((**core).clone())?),
            Engine::Sha512(core) => Engine::Sha512(try_box((**core).clone())?),
        };
        Ok(Self { algorithm: self.algorithm, engine, finished: self.finished })
    }

    /// Overwrite this context's state with `other`'s, reusing the existing
    /// allocation. Both contexts must be for the same algorithm.
    pub(crate) fn restore_from(&mut self, other: &HashContext) -> Result<()> {
        if self.algorithm != other.algorithm {
            return Err(CryptoError::InvalidState);
        }
        match (&mut self.engine, &other.engine) {
            (Engine::Sha256(dst), Engine::Sha256(src)) => dst.as_mut().clone_from(src),
            (Engine::Sha512(dst), Engine::Sha512(src)) => dst.as_mut().clone_from(src),
            _ => return Err(CryptoError::InvalidState),
        }
        self.finished = other.finished;
        Ok(())
    }
}

/// One-shot hash of `data` into `out[..digest_len]`.
pub fn hash(algorithm: HashAlgorithm, data: &[u8], out: &mut [u8]) -> Result<()> {
    let mut ctx = HashContext::create(algorithm)?;
    ctx.update(data)?;
    ctx.digest(out)
}

/// SHA-224 hash → 28-byte digest.
pub fn sha224(data: &[u8]) -> [u8; 28] {
    let mut core = Sha256Core::with_state(sha256::SHA224_IV);
    core.update(data);
    let mut out = [0u8; 28];
    core.finalize_into(&mut out);
    out
}

/// SHA-256 hash → 32-byte digest.
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let mut core = Sha256Core::with_state(sha256::SHA256_IV);
    core.update(data);
    let mut out = [0u8; 32];
    core.finalize_into(&mut out);
    out
}

/// SHA-384 hash → 48-byte digest (SHA-512 with different IV, truncated).
pub fn sha384(data: &[u8]) -> [u8; 48] {
    let mut core = Sha512Core::with_state(sha512::SHA384_IV);
    core.update(data);
    let mut out = [0u8; 48];
    core.finalize_into(&mut out);
    out
}

/// SHA-512 hash → 64-byte digest.
pub fn sha512(data: &[u8]) -> [u8; 64] {
    let mut core = Sha512Core::with_state(sha512::SHA512_IV);
    core.update(data);
    let mut out = [0u8; 64];
    core.finalize_into(&mut out);
    out
}
