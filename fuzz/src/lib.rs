//! KPIO Crypto Fuzzing Infrastructure
//!
//! Each target decodes raw fuzzer bytes into parameters for one primitive
//! and checks a property that must hold for every input. The
//! `fuzz_targets/` binaries drive these through libFuzzer; the unit tests
//! below replay a small seed corpus.

pub mod hash;
pub mod gcm;
pub mod kdf;

use kpio_crypto::CryptoError;

/// Fuzzing target trait
pub trait FuzzTarget {
    /// Name of the fuzz target
    fn name(&self) -> &str;

    /// Run one iteration with `input`
    fn fuzz(&mut self, input: &[u8]) -> FuzzResult;
}

/// Result of a fuzz iteration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FuzzResult {
    /// Property held
    Ok,
    /// Primitive rejected the decoded parameters with the expected error
    Rejected(CryptoError),
    /// Property violated
    Violation(&'static str),
}

impl FuzzResult {
    /// Whether this iteration found a bug.
    pub fn is_violation(&self) -> bool {
        matches!(self, FuzzResult::Violation(_))
    }
}

/// Sequential reader over fuzzer input. Reads past the end yield zeros so
/// every input decodes to some parameter set.
pub struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub fn u8(&mut self) -> u8 {
        let b = self.data.get(self.pos).copied().unwrap_or(0);
        self.pos = self.pos.saturating_add(1);
        b
    }

    pub fn u16(&mut self) -> u16 {
        u16::from_be_bytes([self.u8(), self.u8()])
    }

    /// Up to `len` bytes; shorter if the input runs out.
    pub fn bytes(&mut self, len: usize) -> &'a [u8] {
        let start = self.pos.min(self.data.len());
        let end = start.saturating_add(len).min(self.data.len());
        self.pos = self.pos.saturating_add(len);
        &self.data[start..end]
    }

    /// Everything not yet consumed.
    pub fn rest(&mut self) -> &'a [u8] {
        let start = self.pos.min(self.data.len());
        self.pos = self.data.len();
        &self.data[start..]
    }
}
