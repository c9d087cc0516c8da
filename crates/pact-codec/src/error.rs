// Path: crates/pact-codec/src/error.rs
//! Error types for canonical serialization.

use thiserror::Error;

/// A trait for assigning a stable, machine-readable string code to an error.
///
/// Mirrors the teacher's `ErrorCode` convention: auditors and downstream
/// tooling key off this code, never off the `Display` message.
pub trait ErrorCode {
    /// Returns the unique, stable string identifier for this error variant.
    fn code(&self) -> &'static str;
}

/// Errors produced while canonicalizing a value or hashing its canonical bytes.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CodecError {
    /// A number was NaN or +/- infinity; canonical JSON has no representation for these.
    #[error("number is not finite (NaN or infinite)")]
    InvalidNumber,

    /// A mapping carried the same key twice; canonical mappings have unique keys.
    #[error("duplicate key in mapping: {0}")]
    DuplicateKey(String),

    /// The value contained something outside the JSON domain (null, bool, integer,
    /// finite number, string, sequence, mapping).
    #[error("unsupported type for canonicalization: {0}")]
    UnsupportedType(String),
}

impl ErrorCode for CodecError {
    fn code(&self) -> &'static str {
        match self {
            CodecError::InvalidNumber => "CODEC-INVALID-NUMBER",
            CodecError::DuplicateKey(_) => "CODEC-DUPLICATE-KEY",
            CodecError::UnsupportedType(_) => "CODEC-UNSUPPORTED-TYPE",
        }
    }
}
