// Path: crates/pact-policy/src/credit.rs
//! Credit-tier derivation, extension checks, and the process-wide
//! kill switch, consulted by the boundary runtime before any settlement
//! it admits (spec.md §4.5).
//!
//! Tier thresholds and per-tier caps are not specified numerically in
//! spec.md; this module commits to one deterministic table (documented in
//! the workspace `DESIGN.md` as a resolved open question) rather than
//! leaving them ambiguous, since `evaluate_credit` must be reproducible by
//! a third-party auditor.

use crate::error::PolicyError;

/// A credit tier derived from a counterparty's passport score and
/// confidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Tier {
    A,
    B,
    C,
}

impl Tier {
    /// Fraction of the spend amount required as collateral at this tier,
    /// per spec.md §4.5: 20% at A, 50% at B, 100% at C.
    fn collateral_fraction(self) -> f64 {
        match self {
            Tier::A => 0.20,
            Tier::B => 0.50,
            Tier::C => 1.00,
        }
    }

    fn caps(self) -> TierCaps {
        match self {
            Tier::A => TierCaps {
                max_outstanding: 100_000.0,
                max_per_intent: 20_000.0,
                max_per_counterparty: 50_000.0,
            },
            Tier::B => TierCaps {
                max_outstanding: 20_000.0,
                max_per_intent: 5_000.0,
                max_per_counterparty: 10_000.0,
            },
            Tier::C => TierCaps {
                max_outstanding: 2_000.0,
                max_per_intent: 500.0,
                max_per_counterparty: 1_000.0,
            },
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct TierCaps {
    max_outstanding: f64,
    max_per_intent: f64,
    max_per_counterparty: f64,
}

/// The caps and kill-switch state attached to a derived tier.
#[derive(Debug, Clone)]
pub struct CreditTerms {
    pub tier: Tier,
    pub max_outstanding: f64,
    pub max_per_intent: f64,
    pub max_per_counterparty: f64,
    pub disabled_until: Option<u64>,
}

/// Derives a credit tier and its caps from a passport score and confidence,
/// both expected in `[0.0, 1.0]`.
pub fn terms(score: f64, confidence: f64, disabled_until: Option<u64>) -> CreditTerms {
    let tier = if score >= 0.8 && confidence >= 0.8 {
        Tier::A
    } else if score >= 0.5 && confidence >= 0.5 {
        Tier::B
    } else {
        Tier::C
    };
    let caps = tier.caps();
    CreditTerms {
        tier,
        max_outstanding: caps.max_outstanding,
        max_per_intent: caps.max_per_intent,
        max_per_counterparty: caps.max_per_counterparty,
        disabled_until,
    }
}

/// The number of recent PACT-1xx failures within the kill-switch lookback
/// window that triggers disabling credit for an agent.
pub const KILL_SWITCH_FAILURE_THRESHOLD: u32 = 3;
/// How long, in milliseconds, credit stays disabled once the kill switch
/// trips.
pub const KILL_SWITCH_COOLDOWN_MS: u64 = 300_000;
/// The lookback window, in milliseconds, over which recent failures are
/// counted for the kill-switch trigger.
pub const KILL_SWITCH_LOOKBACK_MS: u64 = 60_000;

/// A storage backend providing the credit exposure and failure history an
/// agent needs for `evaluate_credit`. Implemented by the concrete
/// passport-storage pluggable in `pact-boundary`; kept here as a trait so
/// the policy engine never depends on a concrete storage/network type.
pub trait CreditStorage {
    /// Returns the agent's currently outstanding (unsettled) exposure in USD.
    fn get_credit_exposure(&self, agent_id: &str) -> Result<f64, PolicyError>;

    /// Returns the count of PACT-1xx failures recorded for `agent_id`
    /// within the last `lookback_ms` milliseconds of `now_ms`.
    fn recent_failure_count(
        &self,
        agent_id: &str,
        now_ms: u64,
        lookback_ms: u64,
    ) -> Result<u32, PolicyError>;

    /// Returns the wall-clock timestamp until which credit is disabled for
    /// `agent_id`, if the kill switch has been tripped.
    fn kill_switch_until(&self, agent_id: &str) -> Result<Option<u64>, PolicyError>;

    /// Disables credit for `agent_id` until `until_ms`.
    fn set_kill_switch(&self, agent_id: &str, until_ms: u64) -> Result<(), PolicyError>;
}

/// Inputs to a single credit-extension decision.
pub struct CreditContext<'a> {
    pub agent_id: &'a str,
    pub counterparty_id: &'a str,
    pub amount: f64,
    pub score: f64,
    pub confidence: f64,
    pub now_ms: u64,
}

/// The decision half of [`CreditEvaluation`].
#[derive(Debug, Clone, PartialEq)]
pub struct CreditDecision {
    pub allowed: bool,
    pub reason_codes: Vec<String>,
}

/// Full result of evaluating whether credit can be extended for a spend.
#[derive(Debug, Clone)]
pub struct CreditEvaluation {
    pub decision: CreditDecision,
    pub tier: Tier,
    pub max_outstanding: f64,
    pub max_per_intent: f64,
    pub max_per_counterparty: f64,
    pub disabled_until: Option<u64>,
    pub required_collateral: f64,
    pub credit_exposure: f64,
    pub evidence_refs: Vec<String>,
}

/// Evaluates whether `storage`'s backing agent can extend credit for the
/// spend described by `ctx`. Checks the kill switch first; if tripped (or
/// newly tripped by this call's recent-failure count), every denial in
/// this call carries `KILL_SWITCH_DISABLED` regardless of what the
/// outstanding-exposure checks would otherwise have concluded.
pub fn evaluate_credit(
    storage: &dyn CreditStorage,
    ctx: &CreditContext,
) -> Result<CreditEvaluation, PolicyError> {
    let exposure = storage.get_credit_exposure(ctx.agent_id)?;

    let mut kill_switch_until = storage.kill_switch_until(ctx.agent_id)?;
    if kill_switch_until.is_none() {
        let recent_failures = storage.recent_failure_count(
            ctx.agent_id,
            ctx.now_ms,
            KILL_SWITCH_LOOKBACK_MS,
        )?;
        if recent_failures >= KILL_SWITCH_FAILURE_THRESHOLD {
            let until = ctx.now_ms + KILL_SWITCH_COOLDOWN_MS;
            storage.set_kill_switch(ctx.agent_id, until)?;
            kill_switch_until = Some(until);
            tracing::warn!(
                agent_id = ctx.agent_id,
                recent_failures,
                until,
                "credit kill switch tripped"
            );
        }
    }

    let disabled = kill_switch_until.map(|until| ctx.now_ms < until).unwrap_or(false);

    let credit_terms = terms(ctx.score, ctx.confidence, kill_switch_until);
    let required_collateral = ctx.amount * credit_terms.tier.collateral_fraction();

    let mut evidence_refs = vec![
        format!("credit_tier:{:?}", credit_terms.tier),
        format!("credit_exposure:{exposure}"),
        format!("required_collateral:{required_collateral}"),
    ];

    if disabled {
        evidence_refs.push("credit_reason:KILL_SWITCH_DISABLED".to_string());
        return Ok(CreditEvaluation {
            decision: CreditDecision {
                allowed: false,
                reason_codes: vec!["KILL_SWITCH_DISABLED".to_string()],
            },
            tier: credit_terms.tier,
            max_outstanding: credit_terms.max_outstanding,
            max_per_intent: credit_terms.max_per_intent,
            max_per_counterparty: credit_terms.max_per_counterparty,
            disabled_until: kill_switch_until,
            required_collateral,
            credit_exposure: exposure,
            evidence_refs,
        });
    }

    let mut reason_codes = Vec::new();
    if exposure + ctx.amount > credit_terms.max_outstanding {
        reason_codes.push("MAX_OUTSTANDING_EXCEEDED".to_string());
    }
    if ctx.amount > credit_terms.max_per_intent {
        reason_codes.push("MAX_PER_INTENT_EXCEEDED".to_string());
    }
    if ctx.amount > credit_terms.max_per_counterparty {
        reason_codes.push("MAX_PER_COUNTERPARTY_EXCEEDED".to_string());
    }
    let allowed = reason_codes.is_empty();
    if !allowed {
        evidence_refs.push(format!("credit_reason:{}", reason_codes.join(",")));
    }

    Ok(CreditEvaluation {
        decision: CreditDecision {
            allowed,
            reason_codes,
        },
        tier: credit_terms.tier,
        max_outstanding: credit_terms.max_outstanding,
        max_per_intent: credit_terms.max_per_intent,
        max_per_counterparty: credit_terms.max_per_counterparty,
        disabled_until: kill_switch_until,
        required_collateral,
        credit_exposure: exposure,
        evidence_refs,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::collections::HashMap;

    #[derive(Default)]
    struct FakeStorage {
        exposure: Mutex<HashMap<String, f64>>,
        failures: Mutex<HashMap<String, u32>>,
        kill_switch: Mutex<HashMap<String, u64>>,
    }

    impl CreditStorage for FakeStorage {
        fn get_credit_exposure(&self, agent_id: &str) -> Result<f64, PolicyError> {
            Ok(*self.exposure.lock().get(agent_id).unwrap_or(&0.0))
        }
        fn recent_failure_count(
            &self,
            agent_id: &str,
            _now_ms: u64,
            _lookback_ms: u64,
        ) -> Result<u32, PolicyError> {
            Ok(*self.failures.lock().get(agent_id).unwrap_or(&0))
        }
        fn kill_switch_until(&self, agent_id: &str) -> Result<Option<u64>, PolicyError> {
            Ok(self.kill_switch.lock().get(agent_id).copied())
        }
        fn set_kill_switch(&self, agent_id: &str, until_ms: u64) -> Result<(), PolicyError> {
            self.kill_switch
                .lock()
                .insert(agent_id.to_string(), until_ms);
            Ok(())
        }
    }

    #[test]
    fn tier_a_requires_twenty_percent_collateral() {
        let storage = FakeStorage::default();
        let ctx = CreditContext {
            agent_id: "buyer-1",
            counterparty_id: "seller-1",
            amount: 100.0,
            score: 0.9,
            confidence: 0.9,
            now_ms: 1_000,
        };
        let eval = evaluate_credit(&storage, &ctx).unwrap();
        assert_eq!(eval.tier, Tier::A);
        assert!((eval.required_collateral - 20.0).abs() < 1e-9);
        assert!(eval.decision.allowed);
    }

    #[test]
    fn tier_c_requires_full_collateral_and_has_tight_caps() {
        let storage = FakeStorage::default();
        let ctx = CreditContext {
            agent_id: "buyer-1",
            counterparty_id: "seller-1",
            amount: 100.0,
            score: 0.1,
            confidence: 0.1,
            now_ms: 1_000,
        };
        let eval = evaluate_credit(&storage, &ctx).unwrap();
        assert_eq!(eval.tier, Tier::C);
        assert!((eval.required_collateral - 100.0).abs() < 1e-9);
    }

    #[test]
    fn exceeding_max_outstanding_is_denied() {
        let storage = FakeStorage::default();
        storage
            .exposure
            .lock()
            .insert("buyer-1".to_string(), 99_950.0);
        let ctx = CreditContext {
            agent_id: "buyer-1",
            counterparty_id: "seller-1",
            amount: 100.0,
            score: 0.9,
            confidence: 0.9,
            now_ms: 1_000,
        };
        let eval = evaluate_credit(&storage, &ctx).unwrap();
        assert!(!eval.decision.allowed);
        assert!(eval
            .decision
            .reason_codes
            .contains(&"MAX_OUTSTANDING_EXCEEDED".to_string()));
    }

    #[test]
    fn kill_switch_trips_after_threshold_failures_and_denies_with_fixed_reason() {
        let storage = FakeStorage::default();
        storage
            .failures
            .lock()
            .insert("buyer-1".to_string(), KILL_SWITCH_FAILURE_THRESHOLD);
        let ctx = CreditContext {
            agent_id: "buyer-1",
            counterparty_id: "seller-1",
            amount: 10.0,
            score: 0.9,
            confidence: 0.9,
            now_ms: 1_000,
        };
        let eval = evaluate_credit(&storage, &ctx).unwrap();
        assert!(!eval.decision.allowed);
        assert_eq!(eval.decision.reason_codes, vec!["KILL_SWITCH_DISABLED".to_string()]);
        assert_eq!(
            storage.kill_switch_until("buyer-1").unwrap(),
            Some(1_000 + KILL_SWITCH_COOLDOWN_MS)
        );
    }

    #[test]
    fn kill_switch_denial_persists_until_cooldown_elapses() {
        let storage = FakeStorage::default();
        storage
            .kill_switch
            .lock()
            .insert("buyer-1".to_string(), 5_000);
        let ctx = CreditContext {
            agent_id: "buyer-1",
            counterparty_id: "seller-1",
            amount: 10.0,
            score: 0.9,
            confidence: 0.9,
            now_ms: 4_000,
        };
        let eval = evaluate_credit(&storage, &ctx).unwrap();
        assert!(!eval.decision.allowed);

        let ctx_after = CreditContext {
            now_ms: 5_001,
            ..ctx
        };
        let eval_after = evaluate_credit(&storage, &ctx_after).unwrap();
        assert!(eval_after.decision.allowed);
    }
}
