// Path: crates/pact-boundary/src/runtime.rs
//! The Pact Boundary runtime: the mandatory wrapper around any spending
//! action (spec.md §4.6). Enters a transcript, hands the executor a mutable
//! `ExecutionContext`, then re-checks policy, velocity, and credit — in
//! that load-bearing order — before admitting success. Any failure at any
//! stage becomes a `failure_event` attached to a sealed transcript; nothing
//! ever panics or unwinds out of this function.

use crate::clock::{Clock, SystemClock};
use crate::error::{BoundaryAbort, BoundaryError};
use crate::failure_code;
use pact_policy::{CreditContext, CreditStorage, PolicyContext, VelocityDecision, VelocityStore};
use pact_transcript::{CreateTranscriptParams, RoundDraft};
use pact_types::{Envelope, FailureEvent, Field, Policy, Transcript};

static SYSTEM_CLOCK: SystemClock = SystemClock;

/// The intent a boundary run negotiates, seeding the transcript's identity
/// and the `intent_type`/`transcript_created_at_ms` policy context fields.
#[derive(Debug, Clone)]
pub struct BoundaryIntent {
    pub intent_id: String,
    pub intent_type: String,
    pub created_at_ms: u64,
}

/// What the executor must report back to the boundary on completion
/// (spec.md §4.6 step 3): whether it succeeded, and the price/mode terms
/// the pre-settlement policy re-evaluation and velocity/credit checks run
/// against.
#[derive(Debug, Clone, Default)]
pub struct ExecutorOutcome {
    pub success: bool,
    pub offer_price: Option<f64>,
    pub bid_price: Option<f64>,
    pub settlement_mode: Option<String>,
    pub agreed_price: Option<f64>,
}

/// Pluggables and tunables for one boundary run. `velocity_store` is
/// process-scoped and must be constructed once and reused across runs for
/// the same buyer — it is passed in, never created implicitly, per
/// spec.md §9's "replace the ambient in-memory mapping with an explicit
/// `VelocityStore`" redesign flag.
pub struct BoundaryOptions<'a> {
    pub buyer_agent_id: Option<&'a str>,
    pub counterparty_id: Option<&'a str>,
    pub counterparty_passport_score: Option<f64>,
    pub counterparty_passport_confidence: Option<f64>,
    pub counterparty_recent_failures: Option<f64>,
    pub velocity_store: Option<&'a VelocityStore>,
    pub credit_storage: Option<&'a dyn CreditStorage>,
    pub clock: &'a dyn Clock,
}

impl<'a> Default for BoundaryOptions<'a> {
    fn default() -> Self {
        Self {
            buyer_agent_id: None,
            counterparty_id: None,
            counterparty_passport_score: None,
            counterparty_passport_confidence: None,
            counterparty_recent_failures: None,
            velocity_store: None,
            credit_storage: None,
            clock: &SYSTEM_CLOCK,
        }
    }
}

/// The final outcome of a boundary run: a sealed transcript, either with a
/// `final_hash` over a clean acceptance or with an attached `failure_event`.
#[derive(Debug, Clone)]
pub struct BoundaryResult {
    pub transcript: Transcript,
    pub success: bool,
}

/// The mutable handle an executor receives. Exposes just enough surface to
/// append signed rounds, evaluate policy mid-negotiation, and raise a
/// cooperative abort — the executor never touches the transcript's
/// internals directly.
pub struct ExecutionContext<'a> {
    transcript: Transcript,
    policy_hash: String,
    round_counter: u64,
    evidence_refs: Vec<String>,
    clock: &'a dyn Clock,
}

impl<'a> ExecutionContext<'a> {
    /// The policy hash this transcript was seeded with.
    pub fn policy_hash(&self) -> &str {
        &self.policy_hash
    }

    /// The number of rounds appended so far.
    pub fn round_number(&self) -> u64 {
        self.round_counter
    }

    /// The current wall-clock time, per the injected `Clock`.
    pub fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }

    /// A read-only view of the transcript as it stands.
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Appends a round projected from a verified envelope.
    pub fn append_envelope(
        &mut self,
        envelope: &Envelope,
        round_type: impl Into<String>,
        agent_id: impl Into<String>,
    ) -> Result<(), BoundaryError> {
        let draft = pact_transcript::create_round_from_envelope(envelope, round_type, agent_id);
        self.append_round(draft)
    }

    /// Appends a pre-built round draft.
    pub fn append_round(&mut self, draft: RoundDraft) -> Result<(), BoundaryError> {
        let transcript = std::mem::replace(
            &mut self.transcript,
            placeholder_transcript(&self.transcript),
        );
        let transcript = pact_transcript::append_round(transcript, draft)?;
        self.transcript = transcript;
        self.round_counter += 1;
        Ok(())
    }

    /// Evaluates `policy` against `context` mid-negotiation. Violated-rule
    /// evidence is folded into the running evidence sequence so it survives
    /// into any later `failure_event`, per spec.md §5's "snapshotted at
    /// abort time" ordering guarantee.
    pub fn evaluate_policy(
        &mut self,
        policy: &Policy,
        context: &PolicyContext,
    ) -> pact_policy::EvaluationResult {
        let result = pact_policy::evaluate(policy, context);
        if !result.allowed {
            self.evidence_refs.extend(result.evidence_refs.clone());
        }
        result
    }

    /// Appends an arbitrary evidence string to the running sequence.
    pub fn push_evidence(&mut self, evidence: impl Into<String>) {
        self.evidence_refs.push(evidence.into());
    }

    /// Builds a cooperative abort. Callers return this as an `Err` from the
    /// executor closure; the boundary runtime is solely responsible for
    /// converting it into a `failure_event`.
    pub fn abort(&self, code: &'static str, reason: impl Into<String>) -> BoundaryAbort {
        BoundaryAbort::new(code, reason)
    }
}

/// `std::mem::replace` needs a value to leave behind; transcripts have no
/// meaningful "empty" sentinel so this clones the one being moved out
/// rather than fabricate one. Cheap: transcripts in a single boundary run
/// hold at most a handful of rounds.
fn placeholder_transcript(t: &Transcript) -> Transcript {
    t.clone()
}

/// Runs `execute_fn` inside the mandatory Pact Boundary envelope
/// (spec.md §4.6): seeds a transcript from `intent` and `policy`, lets the
/// executor negotiate, then re-evaluates policy, velocity, and credit in
/// that fixed order before admitting success. Any violation at any stage
/// becomes a sealed transcript carrying a `failure_event`; this function
/// itself never returns `Err` for a negotiation-level failure, only for
/// infrastructure errors (codec/transcript/policy-storage failures).
pub fn run_in_pact_boundary<F>(
    intent: BoundaryIntent,
    policy: Policy,
    options: BoundaryOptions,
    execute_fn: F,
) -> Result<BoundaryResult, BoundaryError>
where
    F: FnOnce(&mut ExecutionContext) -> Result<ExecutorOutcome, BoundaryAbort>,
{
    let policy_hash = pact_policy::policy_hash(&policy)?;
    let transcript = pact_transcript::create_transcript(CreateTranscriptParams {
        intent_id: intent.intent_id.clone(),
        intent_type: intent.intent_type.clone(),
        created_at_ms: intent.created_at_ms,
        policy_hash: policy_hash.clone(),
        strategy_hash: String::new(),
        identity_snapshot_hash: String::new(),
    })?;

    let mut ctx = ExecutionContext {
        transcript,
        policy_hash: policy_hash.clone(),
        round_counter: 0,
        evidence_refs: Vec::new(),
        clock: options.clock,
    };

    let outcome = match execute_fn(&mut ctx) {
        Ok(outcome) if outcome.success => outcome,
        Ok(_) => {
            let abort = BoundaryAbort::new(
                "PACT-303",
                "executor completed without success and without an explicit abort",
            );
            return finalize_abort(ctx, abort, options.clock.now_ms());
        }
        Err(abort) => return finalize_abort(ctx, abort, options.clock.now_ms()),
    };

    let mut policy_ctx = PolicyContext::new()
        .set_string(Field::IntentType, intent.intent_type.clone())
        .set_number(Field::TranscriptCreatedAtMs, intent.created_at_ms as f64)
        .set_number(Field::NegotiationRound, ctx.round_counter as f64);
    if let Some(p) = outcome.offer_price {
        policy_ctx = policy_ctx.set_number(Field::OfferPrice, p);
    }
    if let Some(p) = outcome.bid_price {
        policy_ctx = policy_ctx.set_number(Field::BidPrice, p);
    }
    if let Some(mode) = &outcome.settlement_mode {
        policy_ctx = policy_ctx.set_string(Field::SettlementMode, mode.clone());
    }
    if let Some(score) = options.counterparty_passport_score {
        policy_ctx = policy_ctx.set_number(Field::CounterpartyPassportScore, score);
    }
    if let Some(confidence) = options.counterparty_passport_confidence {
        policy_ctx = policy_ctx.set_number(Field::CounterpartyPassportConfidence, confidence);
    }
    if let Some(failures) = options.counterparty_recent_failures {
        policy_ctx = policy_ctx.set_number(Field::CounterpartyRecentFailures, failures);
    }

    let eval = pact_policy::evaluate(&policy, &policy_ctx);
    ctx.evidence_refs.extend(eval.evidence_refs.clone());
    if !eval.allowed {
        let abort = BoundaryAbort::new(
            "PACT-101",
            format!(
                "pre-settlement policy violated: {}",
                eval.violated_rules.join(",")
            ),
        );
        return finalize_abort(ctx, abort, options.clock.now_ms());
    }

    let amount = outcome.agreed_price.or(outcome.offer_price).unwrap_or(0.0);
    let now_ms = options.clock.now_ms();
    let counterparty_id = options.counterparty_id.unwrap_or("unknown-counterparty");

    // Velocity before credit; velocity is recorded at most once, only after
    // every check (including credit) has passed — spec.md §4.6 step 7, I10.
    if let (Some(limits), Some(store), Some(buyer_id)) =
        (&policy.velocity, options.velocity_store, options.buyer_agent_id)
    {
        let decision = store.check(buyer_id, limits, now_ms, amount, counterparty_id);
        if let VelocityDecision::Deny { reason } = decision {
            ctx.evidence_refs.push(reason.clone());
            let abort = BoundaryAbort::new("PACT-101", reason);
            return finalize_abort(ctx, abort, now_ms);
        }
    }

    if let (Some(storage), Some(buyer_id)) = (options.credit_storage, options.buyer_agent_id) {
        if amount > 0.0 {
            let credit_ctx = CreditContext {
                agent_id: buyer_id,
                counterparty_id,
                amount,
                score: options.counterparty_passport_score.unwrap_or(0.0),
                confidence: options.counterparty_passport_confidence.unwrap_or(0.0),
                now_ms,
            };
            let credit_eval = pact_policy::evaluate_credit(storage, &credit_ctx)?;
            // Evidence is appended before the abort is raised, so a denial
            // carries the credit terms even though the boundary short-circuits.
            ctx.evidence_refs.extend(credit_eval.evidence_refs.clone());
            if !credit_eval.decision.allowed {
                let abort = BoundaryAbort::new(
                    "PACT-101",
                    format!("credit denied: {}", credit_eval.decision.reason_codes.join(",")),
                );
                return finalize_abort(ctx, abort, now_ms);
            }
        }
    }

    if let (Some(store), Some(buyer_id)) = (options.velocity_store, options.buyer_agent_id) {
        store.record_success(buyer_id, now_ms, amount, counterparty_id);
    }

    let transcript = pact_transcript::seal(ctx.transcript)?;
    tracing::debug!(transcript_id = %transcript.transcript_id, "boundary run succeeded");
    Ok(BoundaryResult {
        transcript,
        success: true,
    })
}

fn finalize_abort(
    ctx: ExecutionContext,
    abort: BoundaryAbort,
    now_ms: u64,
) -> Result<BoundaryResult, BoundaryError> {
    let info = failure_code::lookup(abort.code);
    let mut evidence_refs = ctx.evidence_refs;
    evidence_refs.push(format!("abort_reason:{}", abort.reason));
    evidence_refs.push(format!("policy_hash:{}", ctx.policy_hash));

    let failure_event = FailureEvent {
        code: abort.code.to_string(),
        stage: info.stage.to_string(),
        fault_domain: info.fault_domain.to_string(),
        terminality: info.default_terminality,
        evidence_refs,
        timestamp: now_ms,
        transcript_hash: String::new(),
    };

    tracing::warn!(
        code = abort.code,
        stage = info.stage,
        fault_domain = info.fault_domain,
        reason = %abort.reason,
        "boundary aborted"
    );

    let transcript = pact_transcript::attach_failure_event(ctx.transcript, failure_event)?;
    Ok(BoundaryResult {
        transcript,
        success: false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use pact_crypto::Ed25519KeyPair;
    use pact_policy::VelocityStore;
    use pact_types::{sign_envelope, Comparison, Condition, ConditionValue, MessageCommon, Operator, Rule};
    use std::collections::HashMap;
    use std::sync::Mutex;

    fn max_price_policy(max_price: f64) -> Policy {
        Policy::new(
            "policy-1",
            vec![Rule {
                name: "max_price".to_string(),
                condition: Condition::Comparison(Comparison {
                    field: Field::OfferPrice,
                    operator: Operator::Le,
                    value: ConditionValue::Number(max_price),
                }),
            }],
        )
    }

    fn intent() -> BoundaryIntent {
        BoundaryIntent {
            intent_id: "intent-123".to_string(),
            intent_type: "purchase".to_string(),
            created_at_ms: 1_000_000_000_000,
        }
    }

    fn append_ask_and_accept(ctx: &mut ExecutionContext, price: f64) {
        let kp = Ed25519KeyPair::generate().unwrap();
        let sent_at = ctx.now_ms();
        let ask = pact_types::Message::Ask {
            common: MessageCommon::new("intent-123", sent_at, sent_at + 60_000),
            price,
        };
        let env = sign_envelope(ask, &kp, sent_at).unwrap();
        ctx.append_envelope(&env, "ASK", "seller").unwrap();

        let accept = pact_types::Message::Accept {
            common: MessageCommon::new("intent-123", sent_at + 10, sent_at + 60_000),
            agreed_price: price,
            settlement_mode: "boundary".to_string(),
        };
        let env2 = sign_envelope(accept, &kp, sent_at + 10).unwrap();
        ctx.append_envelope(&env2, "ACCEPT", "buyer").unwrap();
    }

    #[test]
    fn success_path_seals_transcript_with_final_hash() {
        let clock = FixedClock(1_000_000_000_100);
        let options = BoundaryOptions {
            clock: &clock,
            ..Default::default()
        };
        let result = run_in_pact_boundary(intent(), max_price_policy(0.05), options, |ctx| {
            append_ask_and_accept(ctx, 0.04);
            Ok(ExecutorOutcome {
                success: true,
                offer_price: Some(0.04),
                settlement_mode: Some("boundary".to_string()),
                agreed_price: Some(0.04),
                ..Default::default()
            })
        })
        .unwrap();

        assert!(result.success);
        assert!(result.transcript.final_hash.is_some());
        assert!(result.transcript.failure_event.is_none());
        assert_eq!(result.transcript.rounds.len(), 2);
    }

    #[test]
    fn over_budget_offer_aborts_with_pact_101() {
        let clock = FixedClock(1_000_000_000_100);
        let options = BoundaryOptions {
            clock: &clock,
            ..Default::default()
        };
        let result = run_in_pact_boundary(intent(), max_price_policy(0.05), options, |ctx| {
            append_ask_and_accept(ctx, 0.10);
            Ok(ExecutorOutcome {
                success: true,
                offer_price: Some(0.10),
                settlement_mode: Some("boundary".to_string()),
                agreed_price: Some(0.10),
                ..Default::default()
            })
        })
        .unwrap();

        assert!(!result.success);
        let fe = result.transcript.failure_event.as_ref().unwrap();
        assert_eq!(fe.code, "PACT-101");
        assert_eq!(fe.stage, "negotiation");
        assert_eq!(fe.fault_domain, "policy");
        assert_eq!(fe.terminality, pact_types::Terminality::Terminal);
        assert!(fe.evidence_refs.iter().any(|e| e.starts_with("policy_rule:max_price:")));
        assert!(fe.evidence_refs.iter().any(|e| e.starts_with("policy_hash:")));
        assert!(result.transcript.final_hash.is_some());
    }

    #[test]
    fn settlement_mode_rule_maps_to_pact_101_not_deadlock_code() {
        let policy = Policy::new(
            "policy-escrow",
            vec![Rule {
                name: "escrow_only".to_string(),
                condition: Condition::Comparison(Comparison {
                    field: Field::SettlementMode,
                    operator: Operator::Eq,
                    value: ConditionValue::String("escrow".to_string()),
                }),
            }],
        );
        let clock = FixedClock(1_000_000_000_100);
        let options = BoundaryOptions {
            clock: &clock,
            ..Default::default()
        };
        let result = run_in_pact_boundary(intent(), policy, options, |ctx| {
            append_ask_and_accept(ctx, 0.01);
            Ok(ExecutorOutcome {
                success: true,
                settlement_mode: Some("boundary".to_string()),
                agreed_price: Some(0.01),
                ..Default::default()
            })
        })
        .unwrap();

        assert_eq!(
            result.transcript.failure_event.as_ref().unwrap().code,
            "PACT-101"
        );
    }

    #[test]
    fn repeated_identical_intent_and_policy_yields_identical_ids() {
        let clock = FixedClock(1_000_000_000_100);
        let run = |clock: &FixedClock| {
            let options = BoundaryOptions {
                clock,
                ..Default::default()
            };
            run_in_pact_boundary(intent(), max_price_policy(0.05), options, |ctx| {
                append_ask_and_accept(ctx, 0.01);
                Ok(ExecutorOutcome {
                    success: true,
                    offer_price: Some(0.01),
                    agreed_price: Some(0.01),
                    settlement_mode: Some("boundary".to_string()),
                    ..Default::default()
                })
            })
            .unwrap()
        };
        let r1 = run(&clock);
        let r2 = run(&clock);
        assert_eq!(r1.transcript.transcript_id, r2.transcript.transcript_id);
        assert_eq!(r1.transcript.policy_hash, r2.transcript.policy_hash);
    }

    #[test]
    fn velocity_exceeded_on_second_run_denies_without_double_recording() {
        let store = VelocityStore::new();
        let policy = Policy {
            velocity: Some(pact_types::VelocityLimits {
                max_tx_per_minute: Some(1),
                max_amount_per_minute: None,
                max_unique_counterparties_per_minute: None,
            }),
            ..max_price_policy(1.0)
        };

        let run = |now_ms: u64| {
            let clock = FixedClock(now_ms);
            let options = BoundaryOptions {
                buyer_agent_id: Some("buyer-1"),
                counterparty_id: Some("seller-1"),
                velocity_store: Some(&store),
                clock: &clock,
                ..Default::default()
            };
            run_in_pact_boundary(intent(), policy.clone(), options, |ctx| {
                append_ask_and_accept(ctx, 0.01);
                Ok(ExecutorOutcome {
                    success: true,
                    offer_price: Some(0.01),
                    agreed_price: Some(0.01),
                    settlement_mode: Some("boundary".to_string()),
                    ..Default::default()
                })
            })
            .unwrap()
        };

        let first = run(1_000_000_000_000);
        assert!(first.success);

        let second = run(1_000_000_000_500);
        assert!(!second.success);
        let fe = second.transcript.failure_event.as_ref().unwrap();
        assert_eq!(fe.code, "PACT-101");
        assert!(fe
            .evidence_refs
            .iter()
            .any(|e| e == "velocity.max_tx_per_minute exceeded"));
    }

    #[derive(Default)]
    struct FakeCreditStorage {
        exposure: Mutex<HashMap<String, f64>>,
    }

    impl CreditStorage for FakeCreditStorage {
        fn get_credit_exposure(&self, agent_id: &str) -> Result<f64, pact_policy::PolicyError> {
            Ok(*self.exposure.lock().unwrap().get(agent_id).unwrap_or(&0.0))
        }
        fn recent_failure_count(
            &self,
            _agent_id: &str,
            _now_ms: u64,
            _lookback_ms: u64,
        ) -> Result<u32, pact_policy::PolicyError> {
            Ok(0)
        }
        fn kill_switch_until(&self, _agent_id: &str) -> Result<Option<u64>, pact_policy::PolicyError> {
            Ok(None)
        }
        fn set_kill_switch(&self, _agent_id: &str, _until_ms: u64) -> Result<(), pact_policy::PolicyError> {
            Ok(())
        }
    }

    #[test]
    fn credit_denial_aborts_with_pact_101_and_carries_evidence() {
        let storage = FakeCreditStorage::default();
        storage
            .exposure
            .lock()
            .unwrap()
            .insert("buyer-1".to_string(), 99_999.0);
        let clock = FixedClock(1_000_000_000_000);
        let options = BoundaryOptions {
            buyer_agent_id: Some("buyer-1"),
            counterparty_id: Some("seller-1"),
            counterparty_passport_score: Some(0.9),
            counterparty_passport_confidence: Some(0.9),
            credit_storage: Some(&storage),
            clock: &clock,
            ..Default::default()
        };
        let result = run_in_pact_boundary(intent(), max_price_policy(1000.0), options, |ctx| {
            append_ask_and_accept(ctx, 100.0);
            Ok(ExecutorOutcome {
                success: true,
                offer_price: Some(100.0),
                agreed_price: Some(100.0),
                settlement_mode: Some("boundary".to_string()),
                ..Default::default()
            })
        })
        .unwrap();

        assert!(!result.success);
        let fe = result.transcript.failure_event.as_ref().unwrap();
        assert_eq!(fe.code, "PACT-101");
        assert!(fe.evidence_refs.iter().any(|e| e.starts_with("credit_tier:")));
    }

    #[test]
    fn explicit_executor_abort_is_sealed_with_its_own_code() {
        let clock = FixedClock(1_000_000_000_000);
        let options = BoundaryOptions {
            clock: &clock,
            ..Default::default()
        };
        let result = run_in_pact_boundary(intent(), max_price_policy(1.0), options, |ctx| {
            Err(ctx.abort("PACT-420", "provider unreachable"))
        })
        .unwrap();

        assert!(!result.success);
        let fe = result.transcript.failure_event.as_ref().unwrap();
        assert_eq!(fe.code, "PACT-420");
        assert_eq!(fe.fault_domain, "provider");
        assert_eq!(result.transcript.rounds.len(), 0);
    }
}
