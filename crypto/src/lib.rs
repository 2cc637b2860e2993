//! KPIO Cryptographic Primitives
//!
//! Pure Rust, `no_std` + `alloc` primitives consumed by the KPIO TLS layer
//! and other protocol code that needs keyed hashing or authenticated
//! encryption.
//!
//! # Architecture
//!
//! - `hash`:   incremental SHA-224 / SHA-256 / SHA-384 / SHA-512 (FIPS 180-4)
//! - `hmac`:   HMAC over any supported hash (RFC 2104)
//! - `pbkdf2`: password-based key derivation with HMAC as PRF (RFC 8018)
//! - `hkdf`:   HKDF extract/expand plus the TLS 1.3 label helpers (RFC 5869, RFC 8446)
//! - `aes`:    AES-128 / AES-192 / AES-256 block encryption (FIPS 197)
//! - `ghash`:  streaming GHASH over GF(2^128)
//! - `gcm`:    streaming AES-GCM AEAD (NIST SP 800-38D)
//!
//! Call chain: `pbkdf2` → `hmac` → `hash`. `gcm` only depends on `aes` and
//! `ghash`.
//!
//! Every context is an owned value driven through `&mut self`; there is no
//! shared global state. Contexts allocate their state once, at construction,
//! sized for the selected algorithm, and wipe it on drop.

#![cfg_attr(not(any(test, feature = "std")), no_std)]

extern crate alloc;

pub mod error;
pub mod hash;
pub mod hmac;
pub mod pbkdf2;
pub mod hkdf;
pub mod aes;
pub mod ghash;
pub mod gcm;

mod mem;

// Convenience re-exports
pub use error::{CryptoError, Result};
pub use hash::{sha224, sha256, sha384, sha512, HashAlgorithm, HashContext, HashDescriptor};
pub use hmac::{hmac, Hmac};
pub use pbkdf2::{pbkdf2, Pbkdf2Params};
pub use aes::{AesKey, AesKeySize};
pub use gcm::{open, seal, AesGcm, GcmConfig, GcmPhase};
