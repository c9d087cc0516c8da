// Path: crates/pact-replay/src/error.rs
//! Errors raised while building or verifying an auditor pack. Transcript
//! replay itself never returns `Err` — its failure modes
//! (`ROUND_SEQUENCE_INVALID`, `HASH_CHAIN_BROKEN`, ...) are data carried in
//! `ReplayResult::errors`, per spec.md §7's "returned as data, never
//! unwind" rule. This error type is only for the surrounding I/O:
//! zip construction, archive reading, and the JSON serialization a pack's
//! artifacts go through.

use pact_codec::ErrorCode;
use thiserror::Error;

/// Errors raised by [`crate::pack::build_pack`] and
/// [`crate::pack::verify_pack`].
#[derive(Error, Debug)]
pub enum ReplayError {
    /// Canonicalization or hashing of a derived artifact failed.
    #[error("codec error: {0}")]
    Codec(#[from] pact_codec::CodecError),

    /// Serializing an artifact to JSON failed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Reading or writing the zip archive itself failed.
    #[error("zip error: {0}")]
    Zip(String),

    /// An underlying I/O operation on the in-memory archive buffer failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ErrorCode for ReplayError {
    fn code(&self) -> &'static str {
        match self {
            ReplayError::Codec(_) => "REPLAY-CODEC-ERROR",
            ReplayError::Json(_) => "REPLAY-JSON-ERROR",
            ReplayError::Zip(_) => "REPLAY-ZIP-ERROR",
            ReplayError::Io(_) => "REPLAY-IO-ERROR",
        }
    }
}
