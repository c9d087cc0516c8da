// Path: crates/pact-types/src/transcript.rs
//! Transcript and round data shapes. The hash-chaining operations over
//! these types (`create_transcript`, `append_round`, `seal`,
//! `attach_failure_event`) live in `pact-transcript`, which depends on this
//! crate; this module only defines what the wire schema looks like.

use crate::failure_event::FailureEvent;
use serde::{Deserialize, Serialize};

/// The transcript schema version this crate produces and accepts.
pub const TRANSCRIPT_VERSION: &str = "pact-transcript/4.0";

/// One signed message appended to a transcript, hash-linked to the prior
/// round (or to the genesis hash, for round 0).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TranscriptRound {
    pub round_number: u64,
    pub round_type: String,
    pub message_hash: String,
    pub envelope_hash: String,
    pub signature: String,
    pub timestamp_ms: u64,
    pub previous_round_hash: String,
    pub agent_id: String,
    pub public_key_b58: String,
    pub content_summary: String,
    pub round_hash: String,
}

/// An append-only, hash-chained sequence of rounds for one negotiated
/// intent, terminating in `final_hash` and optionally a `failure_event`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transcript {
    pub transcript_version: String,
    pub transcript_id: String,
    pub intent_id: String,
    pub intent_type: String,
    pub created_at_ms: u64,
    pub policy_hash: String,
    pub strategy_hash: String,
    pub identity_snapshot_hash: String,
    pub rounds: Vec<TranscriptRound>,
    pub failure_event: Option<FailureEvent>,
    pub final_hash: Option<String>,
}

impl Transcript {
    /// The genesis hash this transcript's first round must chain from:
    /// `sha256_hex(intent_id + ":" + decimal(created_at_ms))`. This is a
    /// deliberate exception to canonical-JSON hashing — computed from the
    /// literal string concatenation, never from `canonicalize`.
    pub fn genesis_hash(&self) -> Result<String, pact_codec::CodecError> {
        genesis_hash(&self.intent_id, self.created_at_ms)
    }
}

/// Computes the genesis hash for an `(intent_id, created_at_ms)` pair.
pub fn genesis_hash(
    intent_id: &str,
    created_at_ms: u64,
) -> Result<String, pact_codec::CodecError> {
    let literal = format!("{intent_id}:{created_at_ms}");
    pact_codec::sha256_hex(literal.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn genesis_hash_is_not_canonical_json() {
        // If this were `hash({intent_id, created_at_ms})` it would differ
        // from the literal-concatenation form computed here.
        let literal_form = genesis_hash("intent-123", 1_000_000_000_000).unwrap();
        let json_form = pact_codec::hash(&serde_json::json!({
            "intent_id": "intent-123",
            "created_at_ms": 1_000_000_000_000i64,
        }))
        .unwrap();
        assert_ne!(literal_form, json_form);
    }

    #[test]
    fn genesis_hash_is_deterministic() {
        let a = genesis_hash("intent-123", 1_000_000_000_000).unwrap();
        let b = genesis_hash("intent-123", 1_000_000_000_000).unwrap();
        assert_eq!(a, b);
    }
}
