// Path: crates/pact-replay/src/replay.rs
//! The replay verifier (spec.md §4.7.1): reconstructs the genesis hash,
//! then walks the round sequence checking chain continuity, timestamp
//! monotonicity, and Ed25519 signatures, stopping the chain walk at the
//! first failing round. The longest prefix that passed is the
//! Last-Valid-Signed-Hash (LVSH) — the only surface Default Blame Logic
//! is allowed to consume.

use pact_crypto::{Ed25519PublicKey, Ed25519Signature};
use pact_types::{Transcript, TranscriptRound, TRANSCRIPT_VERSION};
use serde::{Deserialize, Serialize};

/// Whether a replayed transcript's cryptographic chain and signatures hold
/// up. `Tampered` is reserved for a broken hash chain or a bad signature;
/// a structurally malformed transcript (empty, wrong version, non-monotonic
/// timestamps) or a final-hash mismatch is `Invalid` instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IntegrityStatus {
    Valid,
    Invalid,
    Tampered,
}

/// The result of replaying a transcript. `lvsh` holds the verified prefix
/// of rounds (the Last-Valid-Signed-Hash chain); Default Blame Logic reads
/// nothing else from this result.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReplayResult {
    pub ok: bool,
    pub integrity_status: IntegrityStatus,
    pub rounds_verified: u64,
    pub signature_verifications: u64,
    pub hash_chain_verifications: u64,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub final_hash_mismatch: bool,
    pub lvsh: Vec<TranscriptRound>,
}

impl ReplayResult {
    fn invalid(errors: Vec<String>) -> Self {
        Self {
            ok: false,
            integrity_status: IntegrityStatus::Invalid,
            rounds_verified: 0,
            signature_verifications: 0,
            hash_chain_verifications: 0,
            errors,
            warnings: Vec::new(),
            final_hash_mismatch: false,
            lvsh: Vec::new(),
        }
    }
}

/// Replays `transcript` per spec.md §4.7.1's seven-step algorithm.
pub fn replay_transcript(transcript: &Transcript) -> ReplayResult {
    if transcript.transcript_version != TRANSCRIPT_VERSION {
        return ReplayResult::invalid(vec!["ROUND_SEQUENCE_INVALID".to_string()]);
    }
    if transcript.rounds.is_empty() {
        return ReplayResult::invalid(vec!["ROUND_SEQUENCE_INVALID".to_string()]);
    }
    for (i, round) in transcript.rounds.iter().enumerate() {
        if round.round_number != i as u64 {
            return ReplayResult::invalid(vec!["ROUND_SEQUENCE_INVALID".to_string()]);
        }
    }
    for i in 1..transcript.rounds.len() {
        if transcript.rounds[i].timestamp_ms < transcript.rounds[i - 1].timestamp_ms {
            return ReplayResult::invalid(vec!["TIMESTAMP_NON_MONOTONIC".to_string()]);
        }
    }

    let mut errors = Vec::new();
    let mut warnings = Vec::new();
    let mut lvsh = Vec::new();
    let mut hash_chain_verifications = 0u64;
    let mut signature_verifications = 0u64;

    let mut expected_previous = match transcript.genesis_hash() {
        Ok(h) => h,
        Err(e) => return ReplayResult::invalid(vec![format!("codec error: {e}")]),
    };

    for round in &transcript.rounds {
        if round.previous_round_hash != expected_previous {
            errors.push("HASH_CHAIN_BROKEN".to_string());
            break;
        }

        let recomputed = match pact_transcript::hash_excluding(round, &["round_hash"]) {
            Ok(h) => h,
            Err(e) => {
                errors.push(format!("codec error: {e}"));
                break;
            }
        };
        hash_chain_verifications += 1;
        if round.round_hash != recomputed {
            errors.push("HASH_CHAIN_BROKEN".to_string());
            break;
        }

        if verify_round_signature(round).is_err() {
            errors.push("SIGNATURE_INVALID".to_string());
            break;
        }
        signature_verifications += 1;

        lvsh.push(round.clone());
        expected_previous = round.round_hash.clone();
    }

    let rounds_verified = lvsh.len() as u64;
    let mut final_hash_mismatch = false;

    if let Some(final_hash) = &transcript.final_hash {
        match pact_transcript::hash_excluding(transcript, &["final_hash"]) {
            Ok(recomputed) => {
                if &recomputed != final_hash {
                    errors.push("FINAL_HASH_MISMATCH".to_string());
                    final_hash_mismatch = true;
                }
            }
            Err(e) => errors.push(format!("codec error: {e}")),
        }
    }

    if let Some(failure_event) = &transcript.failure_event {
        match pact_transcript::hash_excluding(transcript, &["failure_event", "final_hash"]) {
            Ok(recomputed) => {
                if recomputed != failure_event.transcript_hash {
                    warnings.push("failure_event.transcript_hash mismatch".to_string());
                }
            }
            Err(e) => warnings.push(format!("codec error checking failure_event hash: {e}")),
        }
    }

    let tampered = errors
        .iter()
        .any(|e| e == "HASH_CHAIN_BROKEN" || e == "SIGNATURE_INVALID");
    let integrity_status = if tampered {
        IntegrityStatus::Tampered
    } else if errors.is_empty() {
        IntegrityStatus::Valid
    } else {
        IntegrityStatus::Invalid
    };

    if !errors.is_empty() {
        tracing::warn!(?errors, rounds_verified, "transcript replay found errors");
    }

    ReplayResult {
        ok: errors.is_empty(),
        integrity_status,
        rounds_verified,
        signature_verifications,
        hash_chain_verifications,
        errors,
        warnings,
        final_hash_mismatch,
        lvsh,
    }
}

fn verify_round_signature(round: &TranscriptRound) -> Result<(), ()> {
    let public_key = Ed25519PublicKey::from_base58(&round.public_key_b58).map_err(|_| ())?;
    let signature = Ed25519Signature::from_base58(&round.signature).map_err(|_| ())?;
    let hash_bytes = hex::decode(&round.envelope_hash).map_err(|_| ())?;
    public_key.verify(&hash_bytes, &signature).map_err(|_| ())
}
