// Path: crates/pact-types/src/message.rs
//! The negotiation message: a closed tagged-variant sum type, never a
//! stringly-typed envelope around an open JSON blob.

use crate::error::TypesError;
use serde::{Deserialize, Serialize};

/// The protocol version stamped on every message.
pub const PROTOCOL_VERSION: &str = "pact/1.0";

/// Fields shared by every message variant.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MessageCommon {
    pub protocol_version: String,
    pub intent_id: String,
    pub sent_at_ms: u64,
    pub expires_at_ms: u64,
}

impl MessageCommon {
    pub fn new(intent_id: impl Into<String>, sent_at_ms: u64, expires_at_ms: u64) -> Self {
        Self {
            protocol_version: PROTOCOL_VERSION.to_string(),
            intent_id: intent_id.into(),
            sent_at_ms,
            expires_at_ms,
        }
    }
}

/// A negotiation message, discriminated by `type`.
///
/// `INTENT → ASK/BID/COUNTER* → ACCEPT | REJECT | ABORT` is the negotiation
/// happy/unhappy path; `COMMIT`/`REVEAL`/`STREAM_CHUNK`/`CREDENTIAL` are
/// auxiliary variants used by settlement and admission flows.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum Message {
    #[serde(rename = "INTENT")]
    Intent {
        #[serde(flatten)]
        common: MessageCommon,
        intent_type: String,
        max_price: Option<f64>,
        constraints: Option<serde_json::Value>,
    },
    #[serde(rename = "ASK")]
    Ask {
        #[serde(flatten)]
        common: MessageCommon,
        price: f64,
    },
    #[serde(rename = "BID")]
    Bid {
        #[serde(flatten)]
        common: MessageCommon,
        price: f64,
    },
    #[serde(rename = "COUNTER")]
    Counter {
        #[serde(flatten)]
        common: MessageCommon,
        price: f64,
    },
    #[serde(rename = "ACCEPT")]
    Accept {
        #[serde(flatten)]
        common: MessageCommon,
        agreed_price: f64,
        settlement_mode: String,
    },
    #[serde(rename = "REJECT")]
    Reject {
        #[serde(flatten)]
        common: MessageCommon,
        reason: Option<String>,
    },
    #[serde(rename = "ABORT")]
    Abort {
        #[serde(flatten)]
        common: MessageCommon,
        reason: Option<String>,
    },
    #[serde(rename = "COMMIT")]
    Commit {
        #[serde(flatten)]
        common: MessageCommon,
        commit_hash: String,
    },
    #[serde(rename = "REVEAL")]
    Reveal {
        #[serde(flatten)]
        common: MessageCommon,
        reveal_value: String,
    },
    #[serde(rename = "STREAM_CHUNK")]
    StreamChunk {
        #[serde(flatten)]
        common: MessageCommon,
        sequence: u64,
        payload: String,
    },
    #[serde(rename = "CREDENTIAL")]
    Credential {
        #[serde(flatten)]
        common: MessageCommon,
        credential_type: String,
        payload: String,
    },
}

impl Message {
    /// The discriminant tag, matching the `type` field on the wire.
    pub fn type_tag(&self) -> &'static str {
        match self {
            Message::Intent { .. } => "INTENT",
            Message::Ask { .. } => "ASK",
            Message::Bid { .. } => "BID",
            Message::Counter { .. } => "COUNTER",
            Message::Accept { .. } => "ACCEPT",
            Message::Reject { .. } => "REJECT",
            Message::Abort { .. } => "ABORT",
            Message::Commit { .. } => "COMMIT",
            Message::Reveal { .. } => "REVEAL",
            Message::StreamChunk { .. } => "STREAM_CHUNK",
            Message::Credential { .. } => "CREDENTIAL",
        }
    }

    /// The fields shared by every variant.
    pub fn common(&self) -> &MessageCommon {
        match self {
            Message::Intent { common, .. }
            | Message::Ask { common, .. }
            | Message::Bid { common, .. }
            | Message::Counter { common, .. }
            | Message::Accept { common, .. }
            | Message::Reject { common, .. }
            | Message::Abort { common, .. }
            | Message::Commit { common, .. }
            | Message::Reveal { common, .. }
            | Message::StreamChunk { common, .. }
            | Message::Credential { common, .. } => common,
        }
    }

    /// Checks the one cross-field invariant on every message:
    /// `sent_at_ms <= expires_at_ms`.
    pub fn validate(&self) -> Result<(), TypesError> {
        let c = self.common();
        if c.sent_at_ms > c.expires_at_ms {
            return Err(TypesError::MessageExpiryBeforeSend {
                sent_at_ms: c.sent_at_ms,
                expires_at_ms: c.expires_at_ms,
            });
        }
        Ok(())
    }
}
