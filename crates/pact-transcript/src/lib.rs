// Path: crates/pact-transcript/src/lib.rs
//! The append-only, hash-chained transcript log: seeding a transcript from
//! an intent, projecting signed envelopes into rounds, chaining each round
//! to its predecessor (or to the genesis hash for round 0), and sealing
//! the transcript on success or failure.

#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod error;
mod hashing;
mod log;

pub use error::TranscriptError;
pub use hashing::hash_excluding;
pub use log::{
    append_round, attach_failure_event, create_round_from_envelope, create_transcript,
    seal, summarize_message, CreateTranscriptParams, RoundDraft,
};
