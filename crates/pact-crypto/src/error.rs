// Path: crates/pact-crypto/src/error.rs
//! Error types for key handling, signing, and verification.

use pact_codec::ErrorCode;
use thiserror::Error;

/// Errors from Ed25519 key handling, signing, and verification.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CryptoError {
    /// A signature failed cryptographic verification against the given key and message.
    #[error("signature verification failed")]
    VerificationFailed,

    /// A public or private key was malformed, wrong length, or not valid curve material.
    #[error("invalid key: {0}")]
    InvalidKey(String),

    /// A signature was malformed or the wrong length for the scheme.
    #[error("invalid signature: {0}")]
    InvalidSignature(String),

    /// A base58-encoded key string failed to decode.
    #[error("invalid base58 encoding: {0}")]
    InvalidEncoding(String),
}

impl ErrorCode for CryptoError {
    fn code(&self) -> &'static str {
        match self {
            CryptoError::VerificationFailed => "CRYPTO-VERIFICATION-FAILED",
            CryptoError::InvalidKey(_) => "CRYPTO-INVALID-KEY",
            CryptoError::InvalidSignature(_) => "CRYPTO-INVALID-SIGNATURE",
            CryptoError::InvalidEncoding(_) => "CRYPTO-INVALID-ENCODING",
        }
    }
}
