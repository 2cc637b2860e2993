//! HKDF (HMAC-based Key Derivation Function) — RFC 5869
//!
//! Also provides TLS 1.3–specific `HKDF-Expand-Label` and `Derive-Secret`
//! as defined in RFC 8446 §7.1.

use zeroize::Zeroizing;

use crate::error::{CryptoError, Result};
use crate::hash::{HashAlgorithm, MAX_DIGEST_LEN};
use crate::hmac::Hmac;

const TLS13_LABEL_PREFIX: &[u8] = b"tls13 ";

/// Largest encoded `HkdfLabel`: u16 length, label<7..255>, context<0..255>.
const MAX_HKDF_LABEL_LEN: usize = 2 + 1 + 255 + 1 + 255;

/// HKDF-Extract(salt, IKM) → `digest_len` bytes of PRK in `prk_out`.
pub fn extract(algorithm: HashAlgorithm, salt: &[u8], ikm: &[u8], prk_out: &mut [u8]) -> Result<()> {
    let zeros = [0u8; MAX_DIGEST_LEN];
    let salt = if salt.is_empty() { &zeros[..algorithm.digest_len()] } else { salt };

    let mut mac = Hmac::new(salt, algorithm)?;
    mac.update(ikm)?;
    mac.finalize(prk_out)
}

/// HKDF-Expand(PRK, info, L) → `okm_out.len()` bytes of OKM.
pub fn expand(algorithm: HashAlgorithm, prk: &[u8], info: &[u8], okm_out: &mut [u8]) -> Result<()> {
    let hlen = algorithm.digest_len();
    if okm_out.len() > 255 * hlen {
        return Err(CryptoError::InvalidArgument);
    }

    let mut mac = Hmac::new(prk, algorithm)?;
    let mut t = Zeroizing::new([0u8; MAX_DIGEST_LEN]);

    for (i, chunk) in okm_out.chunks_mut(hlen).enumerate() {
        // T(i) = HMAC(PRK, T(i-1) ‖ info ‖ i), T(0) empty
        mac.reset()?;
        if i > 0 {
            mac.update(&t[..hlen])?;
        }
        mac.update(info)?;
        mac.update(&[(i + 1) as u8])?;
        mac.finalize(&mut t[..])?;
        chunk.copy_from_slice(&t[..chunk.len()]);
    }
    Ok(())
}

// ── TLS 1.3 helpers (RFC 8446 §7.1) ────────────────────────

/// HKDF-Expand-Label(Secret, Label, Context, Length)
///
/// ```text
/// struct {
///     uint16 length;
///     opaque label<7..255> = "tls13 " + Label;
///     opaque context<0..255>;
/// } HkdfLabel;
/// ```
///
/// `Length` is `out.len()`.
pub fn expand_label(
    algorithm: HashAlgorithm,
    secret: &[u8],
    label: &[u8],
    context: &[u8],
    out: &mut [u8],
) -> Result<()> {
    let full_label_len = TLS13_LABEL_PREFIX.len() + label.len();
    if full_label_len > 255 || context.len() > 255 {
        return Err(CryptoError::InvalidArgument);
    }
    let length = u16::try_from(out.len()).map_err(|_| CryptoError::InvalidArgument)?;

    let mut info = [0u8; MAX_HKDF_LABEL_LEN];
    let mut pos = 0;
    info[pos..pos + 2].copy_from_slice(&length.to_be_bytes());
    pos += 2;
    info[pos] = full_label_len as u8;
    pos += 1;
    info[pos..pos + TLS13_LABEL_PREFIX.len()].copy_from_slice(TLS13_LABEL_PREFIX);
    pos += TLS13_LABEL_PREFIX.len();
    info[pos..pos + label.len()].copy_from_slice(label);
    pos += label.len();
    info[pos] = context.len() as u8;
    pos += 1;
    info[pos..pos + context.len()].copy_from_slice(context);
    pos += context.len();

    expand(algorithm, secret, &info[..pos], out)
}

/// Derive-Secret(Secret, Label, Messages) =
///   HKDF-Expand-Label(Secret, Label, Hash(Messages), Hash.length)
///
/// `transcript_hash` is the already-computed hash of the transcript. Writes
/// `digest_len` bytes to the front of `out`.
pub fn derive_secret(
    algorithm: HashAlgorithm,
    secret: &[u8],
    label: &[u8],
    transcript_hash: &[u8],
    out: &mut [u8],
) -> Result<()> {
    let hlen = algorithm.digest_len();
    if out.len() < hlen {
        return Err(CryptoError::InvalidArgument);
    }
    expand_label(algorithm, secret, label, transcript_hash, &mut out[..hlen])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::sha256;
    use hex_literal::hex;

    // RFC 5869 Test Case 1
    #[test]
    fn test_rfc5869_case1() {
        let ikm = [0x0bu8; 22];
        let salt = hex!("000102030405060708090a0b0c");
        let info = hex!("f0f1f2f3f4f5f6f7f8f9");

        let mut prk = [0u8; 32];
        extract(HashAlgorithm::Sha256, &salt, &ikm, &mut prk).unwrap();
        assert_eq!(prk, hex!("077709362c2e32df0ddc3f0dc47bba6390b6c73bb50f9c3122ec844ad7c2b3e5"));

        let mut okm = [0u8; 42];
        expand(HashAlgorithm::Sha256, &prk, &info, &mut okm).unwrap();
        assert_eq!(
            okm,
            hex!("3cb25f25faacd57a90434f64d0362f2a2d2d0a90cf1a5a4c5db02d56ecc4c5bf34007208d5b887185865")
        );
    }

    #[test]
    fn test_empty_salt_is_zeros() {
        let ikm = [0x0bu8; 22];
        let mut a = [0u8; 32];
        let mut b = [0u8; 32];
        extract(HashAlgorithm::Sha256, &[], &ikm, &mut a).unwrap();
        extract(HashAlgorithm::Sha256, &[0u8; 32], &ikm, &mut b).unwrap();
        assert_eq!(a, b);
        assert_eq!(a, hex!("19ef24a32c717b167f33a91d6f648bdf96596776afdb6377ac434c1c293ccb04"));
    }

    #[test]
    fn test_expand_length_limit() {
        let prk = [0x11u8; 32];
        let mut ok = vec![0u8; 255 * 32];
        assert!(expand(HashAlgorithm::Sha256, &prk, b"", &mut ok).is_ok());
        let mut too_long = vec![0u8; 255 * 32 + 1];
        assert_eq!(
            expand(HashAlgorithm::Sha256, &prk, b"", &mut too_long),
            Err(CryptoError::InvalidArgument)
        );
    }

    // RFC 8448 §3: early secret and its "derived" secret
    #[test]
    fn test_tls13_key_schedule() {
        let mut early = [0u8; 32];
        extract(HashAlgorithm::Sha256, &[0u8; 32], &[0u8; 32], &mut early).unwrap();
        assert_eq!(early, hex!("33ad0a1c607ec03b09e6cd9893680ce210adf300aa1f2660e1b22e10f170f92a"));

        let mut derived = [0u8; 32];
        derive_secret(HashAlgorithm::Sha256, &early, b"derived", &sha256(b""), &mut derived).unwrap();
        assert_eq!(derived, hex!("6f2615a108c702c5678f54fc9dbab69716c076189c48250cebeac3576c3611ba"));
    }

    #[test]
    fn test_expand_label_bounds() {
        let secret = [0u8; 32];
        let mut out = [0u8; 16];
        let long_label = [b'a'; 250];
        assert_eq!(
            expand_label(HashAlgorithm::Sha256, &secret, &long_label, b"", &mut out),
            Err(CryptoError::InvalidArgument)
        );
        assert!(expand_label(HashAlgorithm::Sha256, &secret, &long_label[..249], b"", &mut out).is_ok());

        let long_context = [0u8; 256];
        assert_eq!(
            expand_label(HashAlgorithm::Sha256, &secret, b"key", &long_context, &mut out),
            Err(CryptoError::InvalidArgument)
        );
    }

    #[test]
    fn test_derive_secret_short_output() {
        let mut out = [0u8; 32];
        assert_eq!(
            derive_secret(HashAlgorithm::Sha384, &[0u8; 48], b"derived", &[0u8; 48], &mut out),
            Err(CryptoError::InvalidArgument)
        );
    }
}
