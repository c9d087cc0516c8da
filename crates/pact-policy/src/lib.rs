// Path: crates/pact-policy/src/lib.rs
//! Policy-v4 predicate evaluation, rolling velocity limits, and credit
//! extension checks: the three gates a boundary run checks before
//! admitting a settlement.

#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod context;
mod credit;
mod error;
mod evaluate;
mod velocity;

pub use context::PolicyContext;
pub use credit::{
    evaluate_credit, terms, CreditContext, CreditDecision, CreditEvaluation, CreditStorage,
    CreditTerms, Tier, KILL_SWITCH_COOLDOWN_MS, KILL_SWITCH_FAILURE_THRESHOLD,
    KILL_SWITCH_LOOKBACK_MS,
};
pub use error::PolicyError;
pub use evaluate::{evaluate, policy_hash, EvaluationResult};
pub use velocity::{VelocityDecision, VelocityStore, WINDOW_MS};
