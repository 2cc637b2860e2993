//! Crypto error types

use core::fmt;

/// Error returned by every fallible primitive in this crate.
///
/// None of these are retried internally; retry policy belongs to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CryptoError {
    /// A context or scratch buffer could not be allocated.
    OutOfMemory,
    /// Bad length, zero iteration count, unsupported key size, ...
    InvalidArgument,
    /// Call made out of the required order, or after finalization.
    InvalidState,
    /// Unknown hash algorithm id.
    UnsupportedAlgorithm,
    /// AEAD tag or MAC mismatch. Associated plaintext must be discarded.
    AuthenticationFailed,
}

impl fmt::Display for CryptoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CryptoError::OutOfMemory => write!(f, "Out of memory"),
            CryptoError::InvalidArgument => write!(f, "Invalid argument"),
            CryptoError::InvalidState => write!(f, "Invalid state"),
            CryptoError::UnsupportedAlgorithm => write!(f, "Unsupported algorithm"),
            CryptoError::AuthenticationFailed => write!(f, "Authentication failed"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for CryptoError {}

/// Result type for crypto operations
pub type Result<T> = core::result::Result<T, CryptoError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(CryptoError::InvalidState.to_string(), "Invalid state");
        assert_eq!(
            CryptoError::AuthenticationFailed.to_string(),
            "Authentication failed"
        );
    }
}
