// Path: crates/pact-policy/src/velocity.rs
//! Rolling 60-second velocity accounting, explicit and process-scoped
//! rather than an ambient global: callers construct one [`VelocityStore`]
//! per process and pass it into every boundary run (spec.md §5, §9).

use pact_types::VelocityLimits;
use parking_lot::Mutex;
use std::collections::HashMap;

/// The rolling window length velocity limits are evaluated over.
pub const WINDOW_MS: u64 = 60_000;

/// One successfully recorded spend, kept for exactly [`WINDOW_MS`].
#[derive(Debug, Clone)]
struct Entry {
    ts_ms: u64,
    amount: f64,
    counterparty_id: String,
}

/// The outcome of a velocity check: either the spend is admissible, or it
/// is denied with a reason string suitable for direct inclusion in a
/// `failure_event`'s `evidence_refs`.
#[derive(Debug, Clone, PartialEq)]
pub enum VelocityDecision {
    Allow,
    Deny { reason: String },
}

impl VelocityDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, VelocityDecision::Allow)
    }
}

/// Process-wide rolling velocity windows, keyed by buyer agent id. Guarded
/// by a mutex so concurrent boundary runs serialize their check-then-record
/// critical section per buyer (spec.md §5 "Shared resources").
#[derive(Default)]
pub struct VelocityStore {
    windows: Mutex<HashMap<String, Vec<Entry>>>,
}

impl VelocityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Evaluates `limits` against the buyer's current rolling window plus
    /// the hypothetical addition of this spend, without recording
    /// anything. Returns the first limit breached, checked in the order
    /// the spec lists them: transaction count, total amount, unique
    /// counterparties.
    pub fn check(
        &self,
        buyer_id: &str,
        limits: &VelocityLimits,
        now_ms: u64,
        amount: f64,
        counterparty_id: &str,
    ) -> VelocityDecision {
        let mut windows = self.windows.lock();
        let window = windows.entry(buyer_id.to_string()).or_default();
        evict_expired(window, now_ms);

        let tx_count = window.len() as u32 + 1;
        let total_amount: f64 = window.iter().map(|e| e.amount).sum::<f64>() + amount;
        let mut counterparties: std::collections::HashSet<&str> =
            window.iter().map(|e| e.counterparty_id.as_str()).collect();
        counterparties.insert(counterparty_id);
        let unique_counterparties = counterparties.len() as u32;

        if let Some(max) = limits.max_tx_per_minute {
            if tx_count > max {
                return VelocityDecision::Deny {
                    reason: "velocity.max_tx_per_minute exceeded".to_string(),
                };
            }
        }
        if let Some(max) = limits.max_amount_per_minute {
            if total_amount > max {
                return VelocityDecision::Deny {
                    reason: "velocity.max_amount_per_minute exceeded".to_string(),
                };
            }
        }
        if let Some(max) = limits.max_unique_counterparties_per_minute {
            if unique_counterparties > max {
                return VelocityDecision::Deny {
                    reason: "velocity.max_unique_counterparties_per_minute exceeded".to_string(),
                };
            }
        }
        VelocityDecision::Allow
    }

    /// Records a successful spend into the rolling window. Callers must
    /// invoke this at most once per admitted spend, and only after every
    /// other check (policy, velocity, credit) has passed (spec.md I10).
    pub fn record_success(&self, buyer_id: &str, now_ms: u64, amount: f64, counterparty_id: &str) {
        let mut windows = self.windows.lock();
        let window = windows.entry(buyer_id.to_string()).or_default();
        evict_expired(window, now_ms);
        window.push(Entry {
            ts_ms: now_ms,
            amount,
            counterparty_id: counterparty_id.to_string(),
        });
        tracing::debug!(buyer_id, amount, counterparty_id, "recorded velocity success");
    }
}

fn evict_expired(window: &mut Vec<Entry>, now_ms: u64) {
    let cutoff = now_ms.saturating_sub(WINDOW_MS);
    window.retain(|e| e.ts_ms >= cutoff);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limits(max_tx: u32) -> VelocityLimits {
        VelocityLimits {
            max_tx_per_minute: Some(max_tx),
            max_amount_per_minute: None,
            max_unique_counterparties_per_minute: None,
        }
    }

    #[test]
    fn first_transaction_is_allowed() {
        let store = VelocityStore::new();
        let decision = store.check("buyer-1", &limits(1), 1_000, 0.01, "seller-1");
        assert!(decision.is_allowed());
    }

    #[test]
    fn second_transaction_within_window_exceeds_limit() {
        let store = VelocityStore::new();
        assert!(store
            .check("buyer-1", &limits(1), 1_000, 0.01, "seller-1")
            .is_allowed());
        store.record_success("buyer-1", 1_000, 0.01, "seller-1");

        let decision = store.check("buyer-1", &limits(1), 2_000, 0.01, "seller-1");
        assert_eq!(
            decision,
            VelocityDecision::Deny {
                reason: "velocity.max_tx_per_minute exceeded".to_string()
            }
        );
    }

    #[test]
    fn entries_expire_after_window() {
        let store = VelocityStore::new();
        store.record_success("buyer-1", 1_000, 0.01, "seller-1");
        let decision = store.check("buyer-1", &limits(1), 1_000 + WINDOW_MS + 1, 0.01, "seller-1");
        assert!(decision.is_allowed());
    }

    #[test]
    fn record_never_decreases_counts_within_window() {
        let store = VelocityStore::new();
        store.record_success("buyer-1", 1_000, 0.01, "seller-1");
        store.record_success("buyer-1", 2_000, 0.02, "seller-2");
        let mut windows = store.windows.lock();
        let window = windows.get_mut("buyer-1").unwrap();
        evict_expired(window, 2_000);
        assert_eq!(window.len(), 2);
    }

    #[test]
    fn amount_limit_is_checked_independently() {
        let limits = VelocityLimits {
            max_tx_per_minute: None,
            max_amount_per_minute: Some(0.015),
            max_unique_counterparties_per_minute: None,
        };
        let store = VelocityStore::new();
        let decision = store.check("buyer-1", &limits, 1_000, 0.02, "seller-1");
        assert_eq!(
            decision,
            VelocityDecision::Deny {
                reason: "velocity.max_amount_per_minute exceeded".to_string()
            }
        );
    }

    #[test]
    fn unique_counterparty_limit_counts_distinct_parties() {
        let limits = VelocityLimits {
            max_tx_per_minute: None,
            max_amount_per_minute: None,
            max_unique_counterparties_per_minute: Some(1),
        };
        let store = VelocityStore::new();
        store.record_success("buyer-1", 1_000, 0.01, "seller-1");
        let decision = store.check("buyer-1", &limits, 1_100, 0.01, "seller-2");
        assert_eq!(
            decision,
            VelocityDecision::Deny {
                reason: "velocity.max_unique_counterparties_per_minute exceeded".to_string()
            }
        );
    }
}
