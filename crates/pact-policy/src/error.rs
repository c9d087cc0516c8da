// Path: crates/pact-policy/src/error.rs
//! Error types for policy hashing, evaluation, and credit storage access.

use pact_codec::ErrorCode;
use thiserror::Error;

/// Errors raised while hashing a policy or evaluating credit against a
/// storage backend. Rule evaluation itself never errors — an unresolved
/// field or a type mismatch makes the rule *fail*, which is a normal
/// evaluation outcome, not an error (spec.md §4.5).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PolicyError {
    /// Canonicalization or hashing of the policy document failed.
    #[error("codec error: {0}")]
    Codec(#[from] pact_codec::CodecError),

    /// The injected credit storage backend returned an error.
    #[error("credit storage error: {0}")]
    Storage(String),
}

impl ErrorCode for PolicyError {
    fn code(&self) -> &'static str {
        match self {
            PolicyError::Codec(_) => "POLICY-CODEC-ERROR",
            PolicyError::Storage(_) => "POLICY-STORAGE-ERROR",
        }
    }
}
