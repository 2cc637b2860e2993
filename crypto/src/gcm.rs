//! AES-GCM Authenticated Encryption — NIST SP 800-38D
//!
//! Streaming AEAD over AES-128/192/256. A context moves through
//!
//! ```text
//! Aad ──update_aad──▶ Aad ──encrypt──▶ Encrypt ──digest──▶ Done
//!                          ──decrypt──▶ Decrypt ──verify──▶ Done
//! ```
//!
//! Data may arrive in chunks of any size; keystream and GHASH partial
//! blocks carry across calls. A new message under the same key starts with
//! `reinit` and a fresh IV. Never reuse an IV with the same key: GCM keeps
//! no nonce state, so uniqueness is the caller's responsibility.

use subtle::ConstantTimeEq;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::aes::{AesKey, AesKeySize, BLOCK_LEN};
use crate::error::{CryptoError, Result};
use crate::ghash::Ghash;

/// Standard tag length in bytes.
pub const TAG_LEN: usize = 16;

/// Maximum plaintext/ciphertext per message: (2^32 - 2) blocks.
pub const MAX_TEXT_LEN: u64 = ((1u64 << 32) - 2) * BLOCK_LEN as u64;

/// Maximum associated data per message: 2^64 - 1 bits, rounded down to bytes.
pub const MAX_AAD_LEN: u64 = (1u64 << 61) - 1;

/// Where a context is in its message lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GcmPhase {
    /// Accepting associated data.
    Aad,
    /// Encrypting; only `encrypt*` and `digest` are legal.
    Encrypt,
    /// Decrypting; only `decrypt*` and `verify` are legal.
    Decrypt,
    /// Tag produced or checked; only `reinit` is legal.
    Done,
}

/// Cipher configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GcmConfig {
    /// Tag length in bytes: 4, 8, or 12 through 16.
    pub tag_len: usize,
}

impl Default for GcmConfig {
    fn default() -> Self {
        Self { tag_len: TAG_LEN }
    }
}

impl GcmConfig {
    /// Check the tag length against SP 800-38D §5.2.1.2.
    pub fn validate(&self) -> Result<()> {
        match self.tag_len {
            4 | 8 | 12..=16 => Ok(()),
            _ => Err(CryptoError::InvalidArgument),
        }
    }
}

/// Increment the last 4 bytes of `ctr` as a big-endian 32-bit counter.
fn inc32(ctr: &mut [u8; BLOCK_LEN]) {
    let c = u32::from_be_bytes([ctr[12], ctr[13], ctr[14], ctr[15]]);
    ctr[12..16].copy_from_slice(&c.wrapping_add(1).to_be_bytes());
}

/// Streaming AES-GCM context.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct AesGcm {
    key: AesKey,
    ghash: Ghash,
    /// Pre-counter block J0; E_K(J0) masks the tag.
    j0: [u8; BLOCK_LEN],
    /// Next counter block to encrypt.
    counter: [u8; BLOCK_LEN],
    keystream: [u8; BLOCK_LEN],
    /// Bytes of `keystream` already used; `BLOCK_LEN` means none left.
    keystream_pos: usize,
    aad_len: u64,
    text_len: u64,
    tag_len: usize,
    #[zeroize(skip)]
    phase: GcmPhase,
}

impl AesGcm {
    /// Key a context with a 16-byte tag and start a message under `iv`.
    pub fn new(key: &[u8], iv: &[u8]) -> Result<Self> {
        Self::with_config(key, iv, GcmConfig::default())
    }

    /// Key a context with `config` and start a message under `iv`.
    pub fn with_config(key: &[u8], iv: &[u8], config: GcmConfig) -> Result<Self> {
        config.validate()?;
        check_iv(iv)?;

        let key = AesKey::new(key)?;
        let mut h = [0u8; BLOCK_LEN];
        key.encrypt_block(&mut h);
        let ghash = Ghash::new(&h);
        h.zeroize();

        log::trace!(
            "[KPIO Crypto] AES-{}-GCM context created ({} byte IV, {} byte tag)",
            key.size().key_len() * 8,
            iv.len(),
            config.tag_len
        );

        let mut gcm = Self {
            key,
            ghash,
            j0: [0; BLOCK_LEN],
            counter: [0; BLOCK_LEN],
            keystream: [0; BLOCK_LEN],
            keystream_pos: BLOCK_LEN,
            aad_len: 0,
            text_len: 0,
            tag_len: config.tag_len,
            phase: GcmPhase::Aad,
        };
        gcm.start(iv);
        Ok(gcm)
    }

    /// Start a new message under the same key with a fresh `iv`.
    ///
    /// Legal in any phase. On error the context is left unchanged.
    pub fn reinit(&mut self, iv: &[u8]) -> Result<()> {
        check_iv(iv)?;
        self.start(iv);
        Ok(())
    }

    fn start(&mut self, iv: &[u8]) {
        if iv.len() == 12 {
            self.j0[..12].copy_from_slice(iv);
            self.j0[12..].copy_from_slice(&1u32.to_be_bytes());
        } else {
            // J0 = GHASH_H(IV ‖ 0^(s+64) ‖ BE64(len(IV)))
            self.ghash.reset();
            self.ghash.update(iv);
            self.j0 = self.ghash.finalize(0, iv.len() as u64 * 8);
        }
        self.ghash.reset();

        self.counter = self.j0;
        inc32(&mut self.counter);
        self.keystream.zeroize();
        self.keystream_pos = BLOCK_LEN;
        self.aad_len = 0;
        self.text_len = 0;
        self.phase = GcmPhase::Aad;
    }

    /// Current phase.
    pub fn phase(&self) -> GcmPhase {
        self.phase
    }

    /// Configured tag length in bytes.
    pub fn tag_len(&self) -> usize {
        self.tag_len
    }

    /// AES key size in use.
    pub fn key_size(&self) -> AesKeySize {
        self.key.size()
    }

    /// Authenticate `data` without encrypting it. Only legal before the
    /// first `encrypt`/`decrypt`.
    pub fn update_aad(&mut self, data: &[u8]) -> Result<()> {
        if self.phase != GcmPhase::Aad {
            return Err(CryptoError::InvalidState);
        }
        let total = self
            .aad_len
            .checked_add(data.len() as u64)
            .filter(|&t| t <= MAX_AAD_LEN)
            .ok_or(CryptoError::InvalidArgument)?;
        self.ghash.update(data);
        self.aad_len = total;
        Ok(())
    }

    /// Encrypt `input` into `out[..input.len()]`.
    pub fn encrypt(&mut self, input: &[u8], out: &mut [u8]) -> Result<()> {
        self.check_direction(GcmPhase::Encrypt)?;
        if out.len() < input.len() {
            return Err(CryptoError::InvalidArgument);
        }
        let out = &mut out[..input.len()];
        self.begin_text(GcmPhase::Encrypt, input.len())?;
        out.copy_from_slice(input);
        self.apply_keystream(out);
        self.ghash.update(out);
        Ok(())
    }

    /// Decrypt `input` into `out[..input.len()]`. The plaintext must not be
    /// used until `verify` succeeds.
    pub fn decrypt(&mut self, input: &[u8], out: &mut [u8]) -> Result<()> {
        self.check_direction(GcmPhase::Decrypt)?;
        if out.len() < input.len() {
            return Err(CryptoError::InvalidArgument);
        }
        let out = &mut out[..input.len()];
        self.begin_text(GcmPhase::Decrypt, input.len())?;
        self.ghash.update(input);
        out.copy_from_slice(input);
        self.apply_keystream(out);
        Ok(())
    }

    /// Encrypt `buf` in place.
    pub fn encrypt_in_place(&mut self, buf: &mut [u8]) -> Result<()> {
        self.begin_text(GcmPhase::Encrypt, buf.len())?;
        self.apply_keystream(buf);
        self.ghash.update(buf);
        Ok(())
    }

    /// Decrypt `buf` in place.
    pub fn decrypt_in_place(&mut self, buf: &mut [u8]) -> Result<()> {
        self.begin_text(GcmPhase::Decrypt, buf.len())?;
        self.ghash.update(buf);
        self.apply_keystream(buf);
        Ok(())
    }

    /// Validate a text call of `len` bytes in direction `dir`, closing the
    /// AAD section on the first one. Nothing changes on error.
    fn begin_text(&mut self, dir: GcmPhase, len: usize) -> Result<()> {
        self.check_direction(dir)?;
        let total = self
            .text_len
            .checked_add(len as u64)
            .filter(|&t| t <= MAX_TEXT_LEN)
            .ok_or(CryptoError::InvalidArgument)?;

        if self.phase == GcmPhase::Aad {
            self.ghash.pad();
            self.phase = dir;
        }
        self.text_len = total;
        Ok(())
    }

    fn check_direction(&self, dir: GcmPhase) -> Result<()> {
        match self.phase {
            GcmPhase::Aad => Ok(()),
            p if p == dir => Ok(()),
            _ => Err(CryptoError::InvalidState),
        }
    }

    fn apply_keystream(&mut self, data: &mut [u8]) {
        for byte in data.iter_mut() {
            if self.keystream_pos == BLOCK_LEN {
                self.keystream = self.counter;
                self.key.encrypt_block(&mut self.keystream);
                inc32(&mut self.counter);
                self.keystream_pos = 0;
            }
            *byte ^= self.keystream[self.keystream_pos];
            self.keystream_pos += 1;
        }
    }

    /// Full 16-byte tag for the message so far.
    fn compute_tag(&mut self) -> [u8; BLOCK_LEN] {
        let mut tag = self.ghash.finalize(self.aad_len * 8, self.text_len * 8);
        let mut mask = self.j0;
        self.key.encrypt_block(&mut mask);
        for (t, m) in tag.iter_mut().zip(mask.iter()) {
            *t ^= m;
        }
        mask.zeroize();
        tag
    }

    /// Write the `tag_len`-byte tag to the front of `tag_out` and finish the
    /// message. Legal after AAD or encryption.
    pub fn digest(&mut self, tag_out: &mut [u8]) -> Result<()> {
        if !matches!(self.phase, GcmPhase::Aad | GcmPhase::Encrypt) {
            return Err(CryptoError::InvalidState);
        }
        if tag_out.len() < self.tag_len {
            return Err(CryptoError::InvalidArgument);
        }
        let tag = self.compute_tag();
        tag_out[..self.tag_len].copy_from_slice(&tag[..self.tag_len]);
        self.phase = GcmPhase::Done;
        Ok(())
    }

    /// Check `tag` in constant time and finish the message. Legal after
    /// AAD or decryption. A tag of the wrong length never authenticates.
    pub fn verify(&mut self, tag: &[u8]) -> Result<()> {
        if !matches!(self.phase, GcmPhase::Aad | GcmPhase::Decrypt) {
            return Err(CryptoError::InvalidState);
        }
        let computed = self.compute_tag();
        self.phase = GcmPhase::Done;

        let ok = tag.len() == self.tag_len && bool::from(computed[..self.tag_len].ct_eq(tag));
        if ok {
            Ok(())
        } else {
            log::warn!("[KPIO Crypto] AES-GCM tag verification failed");
            Err(CryptoError::AuthenticationFailed)
        }
    }
}

fn check_iv(iv: &[u8]) -> Result<()> {
    // len(IV) must be non-zero and fit a 64-bit bit count.
    if iv.is_empty() || iv.len() as u64 > u64::MAX / 8 {
        return Err(CryptoError::InvalidArgument);
    }
    Ok(())
}

/// One-shot encrypt: `out[..plaintext.len()]` gets the ciphertext and
/// `tag[..16]` the tag.
pub fn seal(
    key: &[u8],
    iv: &[u8],
    aad: &[u8],
    plaintext: &[u8],
    out: &mut [u8],
    tag: &mut [u8],
) -> Result<()> {
    let mut gcm = AesGcm::new(key, iv)?;
    gcm.update_aad(aad)?;
    gcm.encrypt(plaintext, out)?;
    gcm.digest(tag)
}

/// One-shot decrypt and verify. On `AuthenticationFailed` the plaintext
/// written to `out` is wiped before returning.
pub fn open(
    key: &[u8],
    iv: &[u8],
    aad: &[u8],
    ciphertext: &[u8],
    tag: &[u8],
    out: &mut [u8],
) -> Result<()> {
    let mut gcm = AesGcm::new(key, iv)?;
    gcm.update_aad(aad)?;
    gcm.decrypt(ciphertext, out)?;
    if let Err(e) = gcm.verify(tag) {
        out[..ciphertext.len()].zeroize();
        return Err(e);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    struct Vector {
        key: Vec<u8>,
        iv: Vec<u8>,
        aad: Vec<u8>,
        pt: Vec<u8>,
        ct: Vec<u8>,
        tag: [u8; 16],
    }

    const NIST_PT: &[u8] = &hex!(
        "d9313225f88406e5a55909c5aff5269a86a7a9531534f7da2e4c303d8a318a72"
        "1c3c0c95956809532fcf0e2449a6b525b16aedf5aa0de657ba637b39"
    );
    const NIST_AAD: &[u8] = &hex!("feedfacedeadbeeffeedfacedeadbeefabaddad2");

    fn vectors() -> Vec<Vector> {
        vec![
            // Bundled vector: 16-byte IV goes through GHASH
            Vector {
                key: hex!("ee8919c38d537ad604199e770be0e04c").to_vec(),
                iv: hex!("79a6dedff0a27c7fee0b8ef51263a48a").to_vec(),
                aad: b"Some random header".to_vec(),
                pt: b"The lazy fox jumped over the dog!".to_vec(),
                ct: hex!("687db188d1378442f8847619310d7cd19ae43a7820db7d54455a35bae03701560d").to_vec(),
                tag: hex!("23629b0dfed6018e4632868c07c3a83c"),
            },
            // Bundled vector: AES-256, 14-byte IV, no AAD
            Vector {
                key: hex!("5a99af848999e1a1769930bc9feaa2bdd2ec0a03aa45a5493666e699a7020157").to_vec(),
                iv: hex!("eafbb9acdd83fb66daa3ca93c72e").to_vec(),
                aad: b"".to_vec(),
                pt: b"Leading the way to the future!".to_vec(),
                ct: hex!("21eafb836d3de24cace6901f09a76832cd8da0c808f1b8440f4d36539101").to_vec(),
                tag: hex!("7382dc995bef0f270ef831f076a3f92b"),
            },
            // SP 800-38D test case 1
            Vector {
                key: [0u8; 16].to_vec(),
                iv: [0u8; 12].to_vec(),
                aad: b"".to_vec(),
                pt: b"".to_vec(),
                ct: b"".to_vec(),
                tag: hex!("58e2fccefa7e3061367f1d57a4e7455a"),
            },
            // test case 2
            Vector {
                key: [0u8; 16].to_vec(),
                iv: [0u8; 12].to_vec(),
                aad: b"".to_vec(),
                pt: [0u8; 16].to_vec(),
                ct: hex!("0388dace60b6a392f328c2b971b2fe78").to_vec(),
                tag: hex!("ab6e47d42cec13bdf53a67b21257bddf"),
            },
            // test case 4
            Vector {
                key: hex!("feffe9928665731c6d6a8f9467308308").to_vec(),
                iv: hex!("cafebabefacedbaddecaf888").to_vec(),
                aad: NIST_AAD.to_vec(),
                pt: NIST_PT.to_vec(),
                ct: hex!(
                    "42831ec2217774244b7221b784d0d49ce3aa212f2c02a4e035c17e2329aca12e"
                    "21d514b25466931c7d8f6a5aac84aa051ba30b396a0aac973d58e091"
                ).to_vec(),
                tag: hex!("5bc94fbc3221a5db94fae95ae7121a47"),
            },
            // test case 5: 8-byte IV
            Vector {
                key: hex!("feffe9928665731c6d6a8f9467308308").to_vec(),
                iv: hex!("cafebabefacedbad").to_vec(),
                aad: NIST_AAD.to_vec(),
                pt: NIST_PT.to_vec(),
                ct: hex!(
                    "61353b4c2806934a777ff51fa22a4755699b2a714fcdc6f83766e5f97b6c7423"
                    "73806900e49f24b22b097544d4896b424989b5e1ebac0f07c23f4598"
                ).to_vec(),
                tag: hex!("3612d2e79e3b0785561be14aaca2fccb"),
            },
            // AES-192, test case 10 inputs
            Vector {
                key: hex!("feffe9928665731c6d6a8f9467308308feffe9928665731c").to_vec(),
                iv: hex!("cafebabefacedbaddecaf888").to_vec(),
                aad: NIST_AAD.to_vec(),
                pt: NIST_PT.to_vec(),
                ct: hex!(
                    "3980ca0b3c00e841eb06fac4872a2757859e1ceaa6efd984628593b40ca1e19c"
                    "7d773d00c144c525ac619d18c84a3f4718e2448b2fe324d9ccda2710"
                ).to_vec(),
                tag: hex!("2519498e80f1478f37ba55bd6d27618c"),
            },
        ]
    }

    #[test]
    fn test_known_answer_seal() {
        for (i, v) in vectors().iter().enumerate() {
            let mut ct = vec![0u8; v.pt.len()];
            let mut tag = [0u8; 16];
            seal(&v.key, &v.iv, &v.aad, &v.pt, &mut ct, &mut tag).unwrap();
            assert_eq!(ct, v.ct, "vector {}", i);
            assert_eq!(tag, v.tag, "vector {}", i);
        }
    }

    #[test]
    fn test_known_answer_open() {
        for (i, v) in vectors().iter().enumerate() {
            let mut pt = vec![0u8; v.ct.len()];
            open(&v.key, &v.iv, &v.aad, &v.ct, &v.tag, &mut pt).unwrap();
            assert_eq!(pt, v.pt, "vector {}", i);
        }
    }

    #[test]
    fn test_gmac_aad_only() {
        let mut gcm = AesGcm::new(
            &hex!("feffe9928665731c6d6a8f9467308308"),
            &hex!("cafebabefacedbaddecaf888"),
        )
        .unwrap();
        gcm.update_aad(NIST_AAD).unwrap();
        let mut tag = [0u8; 16];
        gcm.digest(&mut tag).unwrap();
        assert_eq!(tag, hex!("346434fd51d5cd0c5887ec63e39b907a"));
        assert_eq!(gcm.phase(), GcmPhase::Done);
    }

    #[test]
    fn test_streaming_matches_one_shot() {
        let vectors = vectors();
        let v = &vectors[4];
        for chunk in [1usize, 3, 7, 15, 16, 17, 31, 60] {
            let mut gcm = AesGcm::new(&v.key, &v.iv).unwrap();
            for part in v.aad.chunks(chunk) {
                gcm.update_aad(part).unwrap();
            }
            let mut ct = vec![0u8; v.pt.len()];
            for (input, out) in v.pt.chunks(chunk).zip(ct.chunks_mut(chunk)) {
                gcm.encrypt(input, out).unwrap();
            }
            let mut tag = [0u8; 16];
            gcm.digest(&mut tag).unwrap();
            assert_eq!(ct, v.ct, "chunk {}", chunk);
            assert_eq!(tag, v.tag, "chunk {}", chunk);
        }
    }

    #[test]
    fn test_every_split_point() {
        let vectors = vectors();
        let v = &vectors[0];
        for split in 0..=v.pt.len() {
            let mut gcm = AesGcm::new(&v.key, &v.iv).unwrap();
            gcm.update_aad(&v.aad).unwrap();
            let mut buf = v.pt.to_vec();
            let (a, b) = buf.split_at_mut(split);
            gcm.encrypt_in_place(a).unwrap();
            gcm.encrypt_in_place(b).unwrap();
            let mut tag = [0u8; 16];
            gcm.digest(&mut tag).unwrap();
            assert_eq!(buf, v.ct, "split {}", split);
            assert_eq!(tag, v.tag, "split {}", split);

            let mut gcm = AesGcm::new(&v.key, &v.iv).unwrap();
            gcm.update_aad(&v.aad).unwrap();
            let (a, b) = buf.split_at_mut(split);
            gcm.decrypt_in_place(a).unwrap();
            gcm.decrypt_in_place(b).unwrap();
            gcm.verify(&tag).unwrap();
            assert_eq!(buf, v.pt, "split {}", split);
        }
    }

    #[test]
    fn test_round_trip_lengths() {
        let key = [0x42u8; 32];
        let iv = [0x24u8; 12];
        for len in [0usize, 1, 15, 16, 17, 64, 100, 255] {
            let pt: Vec<u8> = (0..len).map(|i| i as u8).collect();
            let mut ct = vec![0u8; len];
            let mut tag = [0u8; 16];
            seal(&key, &iv, b"header", &pt, &mut ct, &mut tag).unwrap();

            let mut back = vec![0u8; len];
            open(&key, &iv, b"header", &ct, &tag, &mut back).unwrap();
            assert_eq!(back, pt, "length {}", len);
        }
    }

    #[test]
    fn test_tamper_every_bit() {
        let vectors = vectors();
        let v = &vectors[0];

        for i in 0..v.ct.len() * 8 {
            let mut ct = v.ct.to_vec();
            ct[i / 8] ^= 1 << (i % 8);
            let mut out = vec![0u8; ct.len()];
            assert_eq!(
                open(&v.key, &v.iv, &v.aad, &ct, &v.tag, &mut out),
                Err(CryptoError::AuthenticationFailed)
            );
            assert!(out.iter().all(|&b| b == 0), "ciphertext bit {}", i);
        }

        for i in 0..128 {
            let mut tag = v.tag;
            tag[i / 8] ^= 1 << (i % 8);
            let mut out = vec![0u8; v.ct.len()];
            assert_eq!(
                open(&v.key, &v.iv, &v.aad, &v.ct, &tag, &mut out),
                Err(CryptoError::AuthenticationFailed),
                "tag bit {}",
                i
            );
        }

        for i in 0..v.aad.len() * 8 {
            let mut aad = v.aad.to_vec();
            aad[i / 8] ^= 1 << (i % 8);
            let mut out = vec![0u8; v.ct.len()];
            assert_eq!(
                open(&v.key, &v.iv, &aad, &v.ct, &v.tag, &mut out),
                Err(CryptoError::AuthenticationFailed),
                "aad bit {}",
                i
            );
        }
    }

    #[test]
    fn test_wrong_length_tag() {
        let vectors = vectors();
        let v = &vectors[0];
        let mut out = vec![0u8; v.ct.len()];
        assert_eq!(
            open(&v.key, &v.iv, &v.aad, &v.ct, &v.tag[..12], &mut out),
            Err(CryptoError::AuthenticationFailed)
        );
        let mut long = v.tag.to_vec();
        long.push(0);
        assert_eq!(
            open(&v.key, &v.iv, &v.aad, &v.ct, &long, &mut out),
            Err(CryptoError::AuthenticationFailed)
        );
    }

    #[test]
    fn test_phase_order() {
        let key = [0u8; 16];
        let iv = [0u8; 12];
        let mut buf = [0u8; 32];

        let mut gcm = AesGcm::new(&key, &iv).unwrap();
        assert_eq!(gcm.phase(), GcmPhase::Aad);
        gcm.encrypt(b"data", &mut buf).unwrap();
        assert_eq!(gcm.phase(), GcmPhase::Encrypt);
        assert_eq!(gcm.update_aad(b"late"), Err(CryptoError::InvalidState));
        assert_eq!(gcm.decrypt(b"data", &mut buf), Err(CryptoError::InvalidState));
        assert_eq!(gcm.verify(&[0u8; 16]), Err(CryptoError::InvalidState));

        let mut tag = [0u8; 16];
        gcm.digest(&mut tag).unwrap();
        assert_eq!(gcm.phase(), GcmPhase::Done);
        assert_eq!(gcm.digest(&mut tag), Err(CryptoError::InvalidState));
        assert_eq!(gcm.encrypt(b"more", &mut buf), Err(CryptoError::InvalidState));

        let mut gcm = AesGcm::new(&key, &iv).unwrap();
        gcm.decrypt(b"data", &mut buf).unwrap();
        assert_eq!(gcm.phase(), GcmPhase::Decrypt);
        assert_eq!(gcm.encrypt_in_place(&mut buf), Err(CryptoError::InvalidState));
        let mut tag = [0u8; 16];
        assert_eq!(gcm.digest(&mut tag), Err(CryptoError::InvalidState));
    }

    #[test]
    fn test_verify_failure_is_final() {
        let mut gcm = AesGcm::new(&[0u8; 16], &[0u8; 12]).unwrap();
        assert_eq!(gcm.verify(&[0u8; 16]), Err(CryptoError::AuthenticationFailed));
        assert_eq!(gcm.phase(), GcmPhase::Done);
        assert_eq!(
            gcm.verify(&hex!("58e2fccefa7e3061367f1d57a4e7455a")),
            Err(CryptoError::InvalidState)
        );
    }

    #[test]
    fn test_reinit() {
        let vectors = vectors();
        let v = &vectors[4];
        let mut gcm = AesGcm::new(&v.key, &[0u8; 12]).unwrap();
        gcm.update_aad(b"first message").unwrap();
        let mut tag = [0u8; 16];
        gcm.digest(&mut tag).unwrap();

        gcm.reinit(&v.iv).unwrap();
        assert_eq!(gcm.phase(), GcmPhase::Aad);
        gcm.update_aad(&v.aad).unwrap();
        let mut ct = vec![0u8; v.pt.len()];
        gcm.encrypt(&v.pt, &mut ct).unwrap();
        gcm.digest(&mut tag).unwrap();
        assert_eq!(ct, v.ct);
        assert_eq!(tag, v.tag);

        assert_eq!(gcm.reinit(&[]), Err(CryptoError::InvalidArgument));
        assert_eq!(gcm.phase(), GcmPhase::Done);
    }

    #[test]
    fn test_invalid_arguments() {
        assert!(matches!(AesGcm::new(&[0u8; 16], &[]), Err(CryptoError::InvalidArgument)));
        for len in [0usize, 8, 15, 17, 31, 33] {
            assert!(
                matches!(AesGcm::new(&vec![0u8; len], &[0u8; 12]), Err(CryptoError::InvalidArgument)),
                "key length {}",
                len
            );
        }

        let mut gcm = AesGcm::new(&[0u8; 16], &[0u8; 12]).unwrap();
        let mut short = [0u8; 3];
        assert_eq!(gcm.encrypt(b"four", &mut short), Err(CryptoError::InvalidArgument));
        // Rejected calls leave the phase alone.
        assert_eq!(gcm.phase(), GcmPhase::Aad);

        let mut tag = [0u8; 8];
        assert_eq!(gcm.digest(&mut tag), Err(CryptoError::InvalidArgument));
        assert_eq!(gcm.phase(), GcmPhase::Aad);
    }

    #[test]
    fn test_key_size_follows_key_length() {
        for (len, size) in [
            (16, AesKeySize::Aes128),
            (24, AesKeySize::Aes192),
            (32, AesKeySize::Aes256),
        ] {
            let gcm = AesGcm::new(&vec![7u8; len], &[0u8; 12]).unwrap();
            assert_eq!(gcm.key_size(), size);
        }
    }

    #[test]
    fn test_truncated_tag() {
        let vectors = vectors();
        let v = &vectors[4];
        let config = GcmConfig { tag_len: 12 };

        let mut gcm = AesGcm::with_config(&v.key, &v.iv, config).unwrap();
        gcm.update_aad(&v.aad).unwrap();
        let mut ct = vec![0u8; v.pt.len()];
        gcm.encrypt(&v.pt, &mut ct).unwrap();
        let mut tag = [0u8; 16];
        gcm.digest(&mut tag).unwrap();
        assert_eq!(&tag[..12], &v.tag[..12]);
        assert_eq!(&tag[12..], &[0u8; 4]);

        let mut gcm = AesGcm::with_config(&v.key, &v.iv, config).unwrap();
        gcm.update_aad(&v.aad).unwrap();
        let mut pt = vec![0u8; ct.len()];
        gcm.decrypt(&ct, &mut pt).unwrap();
        assert_eq!(gcm.verify(&v.tag[..12]), Ok(()));
    }

    #[test]
    fn test_config_tag_lengths() {
        assert_eq!(GcmConfig::default().tag_len, 16);
        for len in [4usize, 8, 12, 13, 14, 15, 16] {
            assert!(GcmConfig { tag_len: len }.validate().is_ok(), "tag length {}", len);
        }
        for len in [0usize, 1, 5, 9, 11, 17, 32] {
            assert_eq!(
                GcmConfig { tag_len: len }.validate(),
                Err(CryptoError::InvalidArgument),
                "tag length {}",
                len
            );
            assert!(matches!(
                AesGcm::with_config(&[0u8; 16], &[0u8; 12], GcmConfig { tag_len: len }),
                Err(CryptoError::InvalidArgument)
            ));
        }
    }

    #[test]
    fn test_inc32_wraps() {
        let mut ctr = [0xffu8; 16];
        inc32(&mut ctr);
        assert_eq!(&ctr[..12], &[0xffu8; 12]);
        assert_eq!(&ctr[12..], &[0u8; 4]);
    }
}
