// Path: crates/pact-types/src/policy.rs
//! Policy-v4 data types: a closed set of context fields, a closed set of
//! comparison operators, and a recursive predicate tree. Kept as a real sum
//! type rather than stringly-typed branches, so an unrecognized shape fails
//! to deserialize instead of silently evaluating to an unexpected result.

use serde::{Deserialize, Serialize};

/// The policy schema version this crate produces and accepts.
pub const POLICY_VERSION: &str = "pact-policy/4.0";

/// A negotiation context field a `Comparison` condition may reference. The
/// set is closed: an unknown field name fails to deserialize rather than
/// falling through to a stringly-typed lookup.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    OfferPrice,
    BidPrice,
    CounterpartyPassportScore,
    CounterpartyPassportConfidence,
    CounterpartyRecentFailures,
    SettlementMode,
    IntentType,
    NegotiationRound,
    TranscriptCreatedAtMs,
}

/// A relational or membership operator.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Operator {
    #[serde(rename = "==")]
    Eq,
    #[serde(rename = "!=")]
    Ne,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = "<=")]
    Le,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = ">=")]
    Ge,
    #[serde(rename = "IN")]
    In,
    #[serde(rename = "NOT IN")]
    NotIn,
}

/// A literal or sequence-of-literals operand for a `Comparison`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ConditionValue {
    String(String),
    Number(f64),
    Bool(bool),
    Array(Vec<ConditionValue>),
}

/// A single `field operator value` predicate.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Comparison {
    pub field: Field,
    pub operator: Operator,
    pub value: ConditionValue,
}

/// The recursive predicate tree: a leaf `Comparison`, or a logical
/// combinator over child conditions. `Logical` is not a wrapper struct on
/// the wire — the key itself (`AND`/`OR`/`NOT`) carries the combinator, so
/// deserialization tries each shape in turn against the input object.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Condition {
    Comparison(Comparison),
    And {
        #[serde(rename = "AND")]
        and: Vec<Condition>,
    },
    Or {
        #[serde(rename = "OR")]
        or: Vec<Condition>,
    },
    Not {
        #[serde(rename = "NOT")]
        not: Box<Condition>,
    },
}

/// A named rule wrapping one condition tree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Rule {
    pub name: String,
    pub condition: Condition,
}

/// Rolling-window velocity caps, all optional; an absent cap is unenforced.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct VelocityLimits {
    pub max_tx_per_minute: Option<u32>,
    pub max_amount_per_minute: Option<f64>,
    pub max_unique_counterparties_per_minute: Option<u32>,
}

/// A full Policy-v4 document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Policy {
    pub policy_version: String,
    pub policy_id: String,
    pub rules: Vec<Rule>,
    pub velocity: Option<VelocityLimits>,
    /// Free-form audit metadata; not interpreted by the policy engine.
    pub audit: Option<serde_json::Value>,
}

impl Policy {
    pub fn new(policy_id: impl Into<String>, rules: Vec<Rule>) -> Self {
        Self {
            policy_version: POLICY_VERSION.to_string(),
            policy_id: policy_id.into(),
            rules,
            velocity: None,
            audit: None,
        }
    }
}
