// Path: crates/pact-types/src/error.rs
//! Error types for message validation, envelope signing, and parsing.

use pact_codec::ErrorCode;
use thiserror::Error;

/// Errors raised while validating messages or signing/parsing envelopes.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TypesError {
    /// A message's `sent_at_ms` was after its own `expires_at_ms`.
    #[error("sent_at_ms ({sent_at_ms}) is after expires_at_ms ({expires_at_ms})")]
    MessageExpiryBeforeSend {
        sent_at_ms: u64,
        expires_at_ms: u64,
    },

    /// An envelope declared an `envelope_version` this crate does not understand.
    #[error("unsupported envelope_version: {0}")]
    EnvelopeVersion(String),

    /// The envelope's `message_hash` did not match the recomputed hash of its message.
    #[error("message_hash does not match recomputed hash of message")]
    MessageHashMismatch,

    /// Signature verification against the envelope's declared signer failed.
    #[error("signature is invalid")]
    SignatureInvalid,

    /// `signed_at_ms` fell outside the allowed clock skew window around `sent_at_ms`.
    #[error("signed_at_ms is outside the allowed clock skew window")]
    ClockSkewExceeded,

    /// Canonicalization or hashing of the message failed.
    #[error("codec error: {0}")]
    Codec(#[from] pact_codec::CodecError),

    /// A cryptographic key or signature was malformed, or verification failed outright.
    #[error("crypto error: {0}")]
    Crypto(#[from] pact_crypto::CryptoError),

    /// A `message_hash` field was not valid lowercase hex.
    #[error("invalid hex in message_hash: {0}")]
    InvalidHash(String),
}

impl ErrorCode for TypesError {
    fn code(&self) -> &'static str {
        match self {
            TypesError::MessageExpiryBeforeSend { .. } => "TYPES-EXPIRY-BEFORE-SEND",
            TypesError::EnvelopeVersion(_) => "ENVELOPE-VERSION",
            TypesError::MessageHashMismatch => "ENVELOPE-MESSAGE-HASH-MISMATCH",
            TypesError::SignatureInvalid => "ENVELOPE-SIGNATURE-INVALID",
            TypesError::ClockSkewExceeded => "ENVELOPE-CLOCK-SKEW-EXCEEDED",
            TypesError::Codec(_) => "TYPES-CODEC-ERROR",
            TypesError::Crypto(_) => "TYPES-CRYPTO-ERROR",
            TypesError::InvalidHash(_) => "TYPES-INVALID-HASH",
        }
    }
}
