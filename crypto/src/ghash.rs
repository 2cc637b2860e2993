//! GHASH universal hash over GF(2^128) — NIST SP 800-38D §6.4
//!
//! Streaming: input of any length is buffered to 16-byte blocks across
//! calls. Field elements are held as big-endian `u128`, so bit 0 of the
//! block (MSB of byte 0) is the coefficient of x^0.

use zeroize::{Zeroize, ZeroizeOnDrop};

pub const BLOCK_LEN: usize = 16;

/// R = 11100001 ‖ 0^120
const R: u128 = 0xe1 << 120;

/// Multiply two field elements (SP 800-38D Algorithm 1).
///
/// Runs a fixed 128 iterations and selects with masks, so timing does not
/// depend on the operands.
fn gf128_mul(x: u128, y: u128) -> u128 {
    let mut z = 0u128;
    let mut v = y;
    for i in 0..128 {
        let bit = (x >> (127 - i)) & 1;
        z ^= v & 0u128.wrapping_sub(bit);
        let lsb = v & 1;
        v = (v >> 1) ^ (R & 0u128.wrapping_sub(lsb));
    }
    z
}

/// Running GHASH_H accumulator.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Ghash {
    h: u128,
    y: u128,
    buf: [u8; BLOCK_LEN],
    buf_len: usize,
}

impl Ghash {
    /// Accumulator for hash subkey `H = E_K(0^128)`.
    pub fn new(h: &[u8; BLOCK_LEN]) -> Self {
        Self { h: u128::from_be_bytes(*h), y: 0, buf: [0; BLOCK_LEN], buf_len: 0 }
    }

    fn absorb(&mut self, block: &[u8; BLOCK_LEN]) {
        self.y = gf128_mul(self.y ^ u128::from_be_bytes(*block), self.h);
    }

    /// Absorb `data`, keeping any trailing partial block for the next call.
    pub fn update(&mut self, data: &[u8]) {
        let mut off = 0;
        if self.buf_len > 0 {
            let take = (BLOCK_LEN - self.buf_len).min(data.len());
            self.buf[self.buf_len..self.buf_len + take].copy_from_slice(&data[..take]);
            self.buf_len += take;
            off = take;
            if self.buf_len == BLOCK_LEN {
                let block = self.buf;
                self.absorb(&block);
                self.buf_len = 0;
            }
        }
        while off + BLOCK_LEN <= data.len() {
            let mut block = [0u8; BLOCK_LEN];
            block.copy_from_slice(&data[off..off + BLOCK_LEN]);
            self.absorb(&block);
            off += BLOCK_LEN;
        }
        if off < data.len() {
            let rem = data.len() - off;
            self.buf[..rem].copy_from_slice(&data[off..]);
            self.buf_len = rem;
        }
    }

    /// Zero-pad and absorb a pending partial block. Closes the AAD section
    /// before ciphertext starts.
    pub fn pad(&mut self) {
        if self.buf_len > 0 {
            self.buf[self.buf_len..].fill(0);
            let block = self.buf;
            self.absorb(&block);
            self.buf_len = 0;
        }
    }

    /// Pad, absorb `BE64(aad_bits) ‖ BE64(text_bits)` and return the hash.
    pub fn finalize(&mut self, aad_bits: u64, text_bits: u64) -> [u8; BLOCK_LEN] {
        self.pad();
        let mut len_block = [0u8; BLOCK_LEN];
        len_block[..8].copy_from_slice(&aad_bits.to_be_bytes());
        len_block[8..].copy_from_slice(&text_bits.to_be_bytes());
        self.absorb(&len_block);
        self.y.to_be_bytes()
    }

    /// Clear the accumulator, keeping H.
    pub fn reset(&mut self) {
        self.y = 0;
        self.buf.zeroize();
        self.buf_len = 0;
    }
}
