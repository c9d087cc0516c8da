// Path: crates/pact-transcript/src/log.rs
//! Append-only, hash-chained transcript construction: genesis seeding,
//! round projection from a signed envelope, chaining, sealing, and failure
//! attachment.

use crate::error::TranscriptError;
use crate::hashing::hash_excluding;
use pact_types::{genesis_hash, Envelope, FailureEvent, Message, Transcript, TranscriptRound};

/// Inputs needed to seed a fresh, empty transcript.
pub struct CreateTranscriptParams {
    pub intent_id: String,
    pub intent_type: String,
    pub created_at_ms: u64,
    pub policy_hash: String,
    pub strategy_hash: String,
    pub identity_snapshot_hash: String,
}

/// Creates an empty transcript: no rounds, no `failure_event`, no
/// `final_hash`. `transcript_id` is derived deterministically from
/// `intent_id` and `created_at_ms`, so invoking a boundary twice with the
/// same intent and creation time yields the same `transcript_id`.
pub fn create_transcript(params: CreateTranscriptParams) -> Result<Transcript, TranscriptError> {
    let transcript_id_seed = format!("{}{}", params.intent_id, params.created_at_ms);
    let transcript_id = format!(
        "transcript-{}",
        pact_codec::sha256_hex(transcript_id_seed.as_bytes())?
    );
    Ok(Transcript {
        transcript_version: pact_types::TRANSCRIPT_VERSION.to_string(),
        transcript_id,
        intent_id: params.intent_id,
        intent_type: params.intent_type,
        created_at_ms: params.created_at_ms,
        policy_hash: params.policy_hash,
        strategy_hash: params.strategy_hash,
        identity_snapshot_hash: params.identity_snapshot_hash,
        rounds: Vec::new(),
        failure_event: None,
        final_hash: None,
    })
}

/// A round projected from a verified envelope, missing the three fields
/// that only `append_round` can assign: `round_number`,
/// `previous_round_hash`, and `round_hash`.
#[derive(Debug, Clone)]
pub struct RoundDraft {
    pub round_type: String,
    pub message_hash: String,
    pub envelope_hash: String,
    pub signature: String,
    pub timestamp_ms: u64,
    pub agent_id: String,
    pub public_key_b58: String,
    pub content_summary: String,
}

/// Projects a verified envelope into a [`RoundDraft`]. The round's
/// `agent_id` and `public_key_b58` are taken from the envelope's declared
/// signer, so they match by construction per spec.md §4.4's edge case.
pub fn create_round_from_envelope(
    envelope: &Envelope,
    round_type: impl Into<String>,
    agent_id: impl Into<String>,
) -> RoundDraft {
    RoundDraft {
        round_type: round_type.into(),
        message_hash: envelope.message_hash.clone(),
        envelope_hash: envelope.envelope_hash().to_string(),
        signature: envelope.signature_b58.clone(),
        timestamp_ms: envelope.signed_at_ms,
        agent_id: agent_id.into(),
        public_key_b58: envelope.signer_public_key_b58.clone(),
        content_summary: summarize_message(&envelope.message),
    }
}

/// A short, human-readable summary of a message's type-specific payload,
/// stored in the round's `content_summary` for quick inspection without
/// decoding the full envelope.
pub fn summarize_message(message: &Message) -> String {
    match message {
        Message::Intent {
            intent_type,
            max_price,
            ..
        } => match max_price {
            Some(p) => format!("intent_type={intent_type} max_price={p}"),
            None => format!("intent_type={intent_type}"),
        },
        Message::Ask { price, .. } => format!("price={price}"),
        Message::Bid { price, .. } => format!("price={price}"),
        Message::Counter { price, .. } => format!("price={price}"),
        Message::Accept {
            agreed_price,
            settlement_mode,
            ..
        } => format!("agreed_price={agreed_price} settlement_mode={settlement_mode}"),
        Message::Reject { reason, .. } => match reason {
            Some(r) => format!("reason={r}"),
            None => "reason=none".to_string(),
        },
        Message::Abort { reason, .. } => match reason {
            Some(r) => format!("reason={r}"),
            None => "reason=none".to_string(),
        },
        Message::Commit { commit_hash, .. } => format!("commit_hash={commit_hash}"),
        Message::Reveal { .. } => "reveal".to_string(),
        Message::StreamChunk { sequence, .. } => format!("sequence={sequence}"),
        Message::Credential { credential_type, .. } => format!("credential_type={credential_type}"),
    }
}

/// Appends `draft` to `transcript`, assigning `round_number`,
/// `previous_round_hash` (genesis hash for the first round, else the prior
/// round's `round_hash`), and `round_hash`. Returns a new transcript; the
/// input is left unmodified other than being consumed.
pub fn append_round(
    transcript: Transcript,
    draft: RoundDraft,
) -> Result<Transcript, TranscriptError> {
    if transcript.final_hash.is_some() {
        return Err(TranscriptError::AlreadySealed);
    }

    let round_number = transcript.rounds.len() as u64;
    let previous_round_hash = match transcript.rounds.last() {
        Some(prior) => prior.round_hash.clone(),
        None => genesis_hash(&transcript.intent_id, transcript.created_at_ms)?,
    };

    let round_without_hash = TranscriptRound {
        round_number,
        round_type: draft.round_type,
        message_hash: draft.message_hash,
        envelope_hash: draft.envelope_hash,
        signature: draft.signature,
        timestamp_ms: draft.timestamp_ms,
        previous_round_hash,
        agent_id: draft.agent_id,
        public_key_b58: draft.public_key_b58,
        content_summary: draft.content_summary,
        round_hash: String::new(),
    };
    let round_hash = hash_excluding(&round_without_hash, &["round_hash"])?;

    let mut round = round_without_hash;
    round.round_hash = round_hash;

    tracing::debug!(
        round_number,
        round_type = %round.round_type,
        round_hash = %round.round_hash,
        "appended transcript round"
    );

    let mut transcript = transcript;
    transcript.rounds.push(round);
    Ok(transcript)
}

/// Fixes `final_hash` over the transcript as it stands (including any
/// attached `failure_event`), making it immutable.
pub fn seal(transcript: Transcript) -> Result<Transcript, TranscriptError> {
    let final_hash = hash_excluding(&transcript, &["final_hash"])?;
    let mut transcript = transcript;
    transcript.final_hash = Some(final_hash);
    Ok(transcript)
}

/// Attaches `failure_event` to `transcript`, computing
/// `failure_event.transcript_hash` over the transcript prefix (rounds plus
/// metadata, excluding the failure event and final hash themselves), then
/// seals the transcript.
pub fn attach_failure_event(
    transcript: Transcript,
    mut failure_event: FailureEvent,
) -> Result<Transcript, TranscriptError> {
    if transcript.final_hash.is_some() {
        return Err(TranscriptError::AlreadySealed);
    }
    let mut transcript = transcript;
    let transcript_hash =
        hash_excluding(&transcript, &["failure_event", "final_hash"])?;
    failure_event.transcript_hash = transcript_hash;
    transcript.failure_event = Some(failure_event);
    seal(transcript)
}
