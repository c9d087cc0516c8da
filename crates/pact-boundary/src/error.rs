// Path: crates/pact-boundary/src/error.rs
//! `BoundaryAbort` is the sole control-flow surface for policy, velocity,
//! and credit violations (spec.md §4.6/§7): modeled here as an ordinary
//! `Result` short-circuit rather than a panic or unwind the caller could
//! observe escaping `run_in_pact_boundary`.

use pact_codec::ErrorCode;
use thiserror::Error;

/// A cooperative abort of the executing negotiation, carrying the fixed
/// `PACT-NNN` code that determines the attached `failure_event`'s stage and
/// fault domain.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("boundary aborted: {code} ({reason})")]
pub struct BoundaryAbort {
    pub code: &'static str,
    pub reason: String,
}

impl BoundaryAbort {
    pub fn new(code: &'static str, reason: impl Into<String>) -> Self {
        Self {
            code,
            reason: reason.into(),
        }
    }
}

/// Errors the boundary runtime itself can raise outside of an executor
/// abort: failures in the surrounding machinery (codec, transcript
/// chaining, storage access) that are not cooperative negotiation aborts.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BoundaryError {
    /// The executor (or a policy/velocity/credit gate) raised a cooperative abort.
    #[error(transparent)]
    Abort(#[from] BoundaryAbort),

    /// Canonicalization or hashing failed while building the transcript.
    #[error("codec error: {0}")]
    Codec(#[from] pact_codec::CodecError),

    /// Transcript construction or chaining failed.
    #[error("transcript error: {0}")]
    Transcript(#[from] pact_transcript::TranscriptError),

    /// A message or envelope failed validation.
    #[error("types error: {0}")]
    Types(#[from] pact_types::TypesError),

    /// The policy engine or one of its storage backends failed.
    #[error("policy error: {0}")]
    Policy(#[from] pact_policy::PolicyError),
}

impl ErrorCode for BoundaryError {
    fn code(&self) -> &'static str {
        match self {
            BoundaryError::Abort(abort) => abort.code,
            BoundaryError::Codec(_) => "BOUNDARY-CODEC-ERROR",
            BoundaryError::Transcript(_) => "BOUNDARY-TRANSCRIPT-ERROR",
            BoundaryError::Types(_) => "BOUNDARY-TYPES-ERROR",
            BoundaryError::Policy(_) => "BOUNDARY-POLICY-ERROR",
        }
    }
}
