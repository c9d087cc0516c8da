// Path: crates/pact-types/src/lib.rs
//! Message, envelope, policy, failure-event, and transcript data types.

#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod envelope;
mod error;
mod failure_event;
mod message;
mod policy;
mod transcript;

pub use envelope::{
    parse_envelope, parse_envelope_with_skew, sign_envelope, Envelope, DEFAULT_CLOCK_SKEW_MS,
    ENVELOPE_VERSION,
};
pub use error::TypesError;
pub use failure_event::{FailureEvent, Terminality};
pub use message::{Message, MessageCommon, PROTOCOL_VERSION};
pub use policy::{
    Comparison, Condition, ConditionValue, Field, Operator, Policy, Rule, VelocityLimits,
    POLICY_VERSION,
};
pub use transcript::{genesis_hash, Transcript, TranscriptRound, TRANSCRIPT_VERSION};
