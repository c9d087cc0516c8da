// Path: crates/pact-types/src/failure_event.rs
//! The terminal attachment recording why a transcript ended without (or
//! alongside) a clean `ACCEPT`.

use serde::{Deserialize, Serialize};

/// Whether the failure ends the transcript outright or leaves room for retry.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Terminality {
    Terminal,
    NonTerminal,
}

/// A terminal (or, for PACT-404, possibly retryable) failure attached to a
/// transcript. `evidence_refs` holds only hashes already present in the
/// transcript prefix plus opaque tagged strings (`"abort_reason:<text>"`,
/// `"policy_hash:<hex>"`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FailureEvent {
    pub code: String,
    pub stage: String,
    pub fault_domain: String,
    pub terminality: Terminality,
    pub evidence_refs: Vec<String>,
    pub timestamp: u64,
    pub transcript_hash: String,
}
