// Path: crates/pact-transcript/src/error.rs
//! Error types for building and chaining a transcript.

use pact_codec::ErrorCode;
use thiserror::Error;

/// Errors raised while creating, appending to, or sealing a transcript.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TranscriptError {
    /// A round was appended after `seal` or `attach_failure_event` had
    /// already fixed `final_hash`. Rounds are append-only and a sealed
    /// transcript is immutable.
    #[error("cannot append a round to a transcript that is already sealed")]
    AlreadySealed,

    /// Canonicalization or hashing of a transcript or round failed.
    #[error("codec error: {0}")]
    Codec(#[from] pact_codec::CodecError),
}

impl ErrorCode for TranscriptError {
    fn code(&self) -> &'static str {
        match self {
            TranscriptError::AlreadySealed => "TRANSCRIPT-ALREADY-SEALED",
            TranscriptError::Codec(_) => "TRANSCRIPT-CODEC-ERROR",
        }
    }
}
