//! AES block cipher (FIPS 197), encryption direction only.
//!
//! GCM runs AES in counter mode, so the inverse cipher is never needed.
//! The key schedule is allocated at exactly `4 * (rounds + 1)` words for the
//! key size in use and wiped on drop.

use alloc::vec::Vec;

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{CryptoError, Result};
use crate::mem::try_zeroed_vec;

/// AES block size in bytes.
pub const BLOCK_LEN: usize = 16;

/// Forward S-box (SubBytes).
const SBOX: [u8; 256] = [
    0x63, 0x7c, 0x77, 0x7b, 0xf2, 0x6b, 0x6f, 0xc5, 0x30, 0x01, 0x67, 0x2b, 0xfe, 0xd7, 0xab, 0x76,
    0xca, 0x82, 0xc9, 0x7d, 0xfa, 0x59, 0x47, 0xf0, 0xad, 0xd4, 0xa2, 0xaf, 0x9c, 0xa4, 0x72, 0xc0,
    0xb7, 0xfd, 0x93, 0x26, 0x36, 0x3f, 0xf7, 0xcc, 0x34, 0xa5, 0xe5, 0xf1, 0x71, 0xd8, 0x31, 0x15,
    0x04, 0xc7, 0x23, 0xc3, 0x18, 0x96, 0x05, 0x9a, 0x07, 0x12, 0x80, 0xe2, 0xeb, 0x27, 0xb2, 0x75,
    0x09, 0x83, 0x2c, 0x1a, 0x1b, 0x6e, 0x5a, 0xa0, 0x52, 0x3b, 0xd6, 0xb3, 0x29, 0xe3, 0x2f, 0x84,
    0x53, 0xd1, 0x00, 0xed, 0x20, 0xfc, 0xb1, 0x5b, 0x6a, 0xcb, 0xbe, 0x39, 0x4a, 0x4c, 0x58, 0xcf,
    0xd0, 0xef, 0xaa, 0xfb, 0x43, 0x4d, 0x33, 0x85, 0x45, 0xf9, 0x02, 0x7f, 0x50, 0x3c, 0x9f, 0xa8,
    0x51, 0xa3, 0x40, 0x8f, 0x92, 0x9d, 0x38, 0xf5, 0xbc, 0xb6, 0xda, 0x21, 0x10, 0xff, 0xf3, 0xd2,
    0xcd, 0x0c, 0x13, 0xec, 0x5f, 0x97, 0x44, 0x17, 0xc4, 0xa7, 0x7e, 0x3d, 0x64, 0x5d, 0x19, 0x73,
    0x60, 0x81, 0x4f, 0xdc, 0x22, 0x2a, 0x90, 0x88, 0x46, 0xee, 0xb8, 0x14, 0xde, 0x5e, 0x0b, 0xdb,
    0xe0, 0x32, 0x3a, 0x0a, 0x49, 0x06, 0x24, 0x5c, 0xc2, 0xd3, 0xac, 0x62, 0x91, 0x95, 0xe4, 0x79,
    0xe7, 0xc8, 0x37, 0x6d, 0x8d, 0xd5, 0x4e, 0xa9, 0x6c, 0x56, 0xf4, 0xea, 0x65, 0x7a, 0xae, 0x08,
    0xba, 0x78, 0x25, 0x2e, 0x1c, 0xa6, 0xb4, 0xc6, 0xe8, 0xdd, 0x74, 0x1f, 0x4b, 0xbd, 0x8b, 0x8a,
    0x70, 0x3e, 0xb5, 0x66, 0x48, 0x03, 0xf6, 0x0e, 0x61, 0x35, 0x57, 0xb9, 0x86, 0xc1, 0x1d, 0x9e,
    0xe1, 0xf8, 0x98, 0x11, 0x69, 0xd9, 0x8e, 0x94, 0x9b, 0x1e, 0x87, 0xe9, 0xce, 0x55, 0x28, 0xdf,
    0x8c, 0xa1, 0x89, 0x0d, 0xbf, 0xe6, 0x42, 0x68, 0x41, 0x99, 0x2d, 0x0f, 0xb0, 0x54, 0xbb, 0x16,
];

/// Key-expansion round constants; index 0 is unused.
const RCON: [u8; 11] = [0x00, 0x01, 0x02, 0x04, 0x08, 0x10, 0x20, 0x40, 0x80, 0x1b, 0x36];

/// Supported key sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AesKeySize {
    Aes128,
    Aes192,
    Aes256,
}

impl AesKeySize {
    /// Size for a raw key of `len` bytes.
    pub fn from_key_len(len: usize) -> Result<Self> {
        match len {
            16 => Ok(Self::Aes128),
            24 => Ok(Self::Aes192),
            32 => Ok(Self::Aes256),
            _ => Err(CryptoError::InvalidArgument),
        }
    }

    /// Key length in bytes.
    pub fn key_len(self) -> usize {
        match self {
            Self::Aes128 => 16,
            Self::Aes192 => 24,
            Self::Aes256 => 32,
        }
    }

    /// Number of cipher rounds (Nr).
    pub fn rounds(self) -> usize {
        match self {
            Self::Aes128 => 10,
            Self::Aes192 => 12,
            Self::Aes256 => 14,
        }
    }

    /// Words in the expanded key schedule.
    pub fn schedule_len(self) -> usize {
        4 * (self.rounds() + 1)
    }
}

/// Expanded AES encryption key.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct AesKey {
    #[zeroize(skip)]
    size: AesKeySize,
    round_keys: Vec<u32>,
}

impl AesKey {
    /// Expand a 16, 24 or 32 byte key. The key size follows the key length.
    pub fn new(key: &[u8]) -> Result<Self> {
        let size = AesKeySize::from_key_len(key.len())?;
        let nk = key.len() / 4;
        let total_words = size.schedule_len();

        let mut w: Vec<u32> = try_zeroed_vec(total_words)?;
        for (i, word) in key.chunks_exact(4).enumerate() {
            w[i] = u32::from_be_bytes([word[0], word[1], word[2], word[3]]);
        }

        for i in nk..total_words {
            let mut temp = w[i - 1];
            if i % nk == 0 {
                temp = sub_word(temp.rotate_left(8)) ^ (u32::from(RCON[i / nk]) << 24);
            } else if nk > 6 && i % nk == 4 {
                temp = sub_word(temp);
            }
            w[i] = w[i - nk] ^ temp;
        }

        log::debug!("[KPIO Crypto] AES-{} key schedule expanded ({} rounds)", key.len() * 8, size.rounds());

        Ok(Self { size, round_keys: w })
    }

    /// Key size of this schedule.
    pub fn size(&self) -> AesKeySize {
        self.size
    }

    /// Encrypt one 16-byte block in place.
    pub fn encrypt_block(&self, block: &mut [u8; BLOCK_LEN]) {
        let nr = self.size.rounds();
        let mut state = block_to_state(block);

        add_round_key(&mut state, &self.round_keys[..4]);
        for round in 1..nr {
            sub_bytes(&mut state);
            shift_rows(&mut state);
            mix_columns(&mut state);
            add_round_key(&mut state, &self.round_keys[round * 4..round * 4 + 4]);
        }
        sub_bytes(&mut state);
        shift_rows(&mut state);
        add_round_key(&mut state, &self.round_keys[nr * 4..nr * 4 + 4]);

        state_to_block(&state, block);
        state.zeroize();
    }
}

#[inline]
fn sub_word(w: u32) -> u32 {
    let [b0, b1, b2, b3] = w.to_be_bytes();
    u32::from_be_bytes([
        SBOX[b0 as usize],
        SBOX[b1 as usize],
        SBOX[b2 as usize],
        SBOX[b3 as usize],
    ])
}

/// Column-major state: `state[col]` packs rows 0..4 big-endian.
#[inline]
fn block_to_state(block: &[u8; BLOCK_LEN]) -> [u32; 4] {
    [
        u32::from_be_bytes([block[0], block[1], block[2], block[3]]),
        u32::from_be_bytes([block[4], block[5], block[6], block[7]]),
        u32::from_be_bytes([block[8], block[9], block[10], block[11]]),
        u32::from_be_bytes([block[12], block[13], block[14], block[15]]),
    ]
}

#[inline]
fn state_to_block(state: &[u32; 4], block: &mut [u8; BLOCK_LEN]) {
    for (chunk, col) in block.chunks_exact_mut(4).zip(state.iter()) {
        chunk.copy_from_slice(&col.to_be_bytes());
    }
}

#[inline]
fn add_round_key(state: &mut [u32; 4], rk: &[u32]) {
    for (col, k) in state.iter_mut().zip(rk.iter()) {
        *col ^= k;
    }
}

#[inline]
fn sub_bytes(state: &mut [u32; 4]) {
    for col in state.iter_mut() {
        *col = sub_word(*col);
    }
}

/// Row r moves left by r columns.
fn shift_rows(state: &mut [u32; 4]) {
    let s = *state;
    for (c, col) in state.iter_mut().enumerate() {
        *col = (s[c] & 0xff00_0000)
            | (s[(c + 1) % 4] & 0x00ff_0000)
            | (s[(c + 2) % 4] & 0x0000_ff00)
            | (s[(c + 3) % 4] & 0x0000_00ff);
    }
}

/// Multiply by {02} in GF(2^8), without branching on the top bit.
#[inline]
fn xtime(a: u8) -> u8 {
    (a << 1) ^ ((a >> 7) * 0x1b)
}

/// Multiply by the fixed polynomial {03}x³ + {01}x² + {01}x + {02}.
fn mix_columns(state: &mut [u32; 4]) {
    for col in state.iter_mut() {
        let [s0, s1, s2, s3] = col.to_be_bytes();
        let all = s0 ^ s1 ^ s2 ^ s3;
        // 2a ^ 3b ^ c ^ d == a ^ all ^ 2(a ^ b)
        let r0 = s0 ^ all ^ xtime(s0 ^ s1);
        let r1 = s1 ^ all ^ xtime(s1 ^ s2);
        let r2 = s2 ^ all ^ xtime(s2 ^ s3);
        let r3 = s3 ^ all ^ xtime(s3 ^ s0);
        *col = u32::from_be_bytes([r0, r1, r2, r3]);
    }
}
