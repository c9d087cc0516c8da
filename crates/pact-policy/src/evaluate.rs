// Path: crates/pact-policy/src/evaluate.rs
//! Deterministic, side-effect-free evaluation of a Policy-v4 predicate
//! tree against a [`PolicyContext`], plus the fixed failure-code table
//! from spec.md §4.5/§4.6.

use crate::context::PolicyContext;
use crate::error::PolicyError;
use pact_types::{Comparison, Condition, ConditionValue, Operator, Policy};

/// The outcome of evaluating a policy against a context: which rules (if
/// any) failed, the code that a boundary abort would carry, and evidence
/// strings describing each violation.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationResult {
    pub allowed: bool,
    pub violated_rules: Vec<String>,
    pub mapped_failure_code: &'static str,
    pub evidence_refs: Vec<String>,
}

/// Hashes a policy document. Rule order is significant: reordering rules
/// changes the canonical bytes and therefore the hash (spec.md I5).
pub fn policy_hash(policy: &Policy) -> Result<String, PolicyError> {
    Ok(pact_codec::hash(policy)?)
}

/// Evaluates every rule in `policy` against `context`, in declaration
/// order. A rule "fails" (never errors) when its condition evaluates to
/// `false`; `allowed` is `true` iff no rule failed.
pub fn evaluate(policy: &Policy, context: &PolicyContext) -> EvaluationResult {
    let mut violated_rules = Vec::new();
    let mut evidence_refs = Vec::new();

    for rule in &policy.rules {
        if !eval_condition(&rule.condition, context) {
            tracing::warn!(rule = %rule.name, policy_id = %policy.policy_id, "policy rule violated");
            violated_rules.push(rule.name.clone());
            evidence_refs.push(format!(
                "policy_rule:{}:{}",
                rule.name,
                describe_condition(&rule.condition)
            ));
        }
    }

    let allowed = violated_rules.is_empty();
    EvaluationResult {
        allowed,
        violated_rules,
        // Every Policy-v4 failure maps to PACT-101 by default; more specific
        // codes (admission, settlement, provider) are assigned by the
        // boundary runtime for non-policy failure sources.
        mapped_failure_code: "PACT-101",
        evidence_refs,
    }
}

fn eval_condition(condition: &Condition, context: &PolicyContext) -> bool {
    match condition {
        Condition::Comparison(cmp) => eval_comparison(cmp, context),
        Condition::And { and } => and.iter().all(|c| eval_condition(c, context)),
        Condition::Or { or } => or.iter().any(|c| eval_condition(c, context)),
        Condition::Not { not } => !eval_condition(not, context),
    }
}

fn eval_comparison(cmp: &Comparison, context: &PolicyContext) -> bool {
    let actual = match context.get(cmp.field) {
        Some(v) => v,
        // Unresolved field: the rule fails, it does not error.
        None => return false,
    };

    match cmp.operator {
        Operator::Eq => values_equal(actual, &cmp.value),
        Operator::Ne => !values_equal(actual, &cmp.value),
        Operator::Lt => numeric_cmp(actual, &cmp.value, |a, b| a < b),
        Operator::Le => numeric_cmp(actual, &cmp.value, |a, b| a <= b),
        Operator::Gt => numeric_cmp(actual, &cmp.value, |a, b| a > b),
        Operator::Ge => numeric_cmp(actual, &cmp.value, |a, b| a >= b),
        Operator::In => membership(actual, &cmp.value),
        Operator::NotIn => !membership(actual, &cmp.value),
    }
}

fn values_equal(a: &ConditionValue, b: &ConditionValue) -> bool {
    match (a, b) {
        (ConditionValue::Number(x), ConditionValue::Number(y)) => x == y,
        other => other.0 == other.1,
    }
}

/// Relational comparison. A type mismatch (either operand not numeric)
/// makes the rule fail rather than error, per spec.md §4.5.
fn numeric_cmp(actual: &ConditionValue, expected: &ConditionValue, op: impl Fn(f64, f64) -> bool) -> bool {
    match (as_f64(actual), as_f64(expected)) {
        (Some(a), Some(b)) => op(a, b),
        _ => false,
    }
}

fn as_f64(v: &ConditionValue) -> Option<f64> {
    match v {
        ConditionValue::Number(n) => Some(*n),
        _ => None,
    }
}

/// `IN`/`NOT IN` accept the sequence on either side of the comparison: the
/// condition's literal `value` may be the list to test membership in, or
/// the resolved context field itself may be the list, with `value` the
/// single element being tested.
fn membership(actual: &ConditionValue, expected: &ConditionValue) -> bool {
    match (actual, expected) {
        (item, ConditionValue::Array(list)) => list.iter().any(|v| values_equal(item, v)),
        (ConditionValue::Array(list), item) => list.iter().any(|v| values_equal(v, item)),
        _ => false,
    }
}

fn describe_condition(condition: &Condition) -> String {
    match condition {
        Condition::Comparison(cmp) => {
            format!("{:?} {} {:?}", cmp.field, operator_str(cmp.operator), cmp.value)
        }
        Condition::And { and } => format!(
            "AND({})",
            and.iter().map(describe_condition).collect::<Vec<_>>().join(", ")
        ),
        Condition::Or { or } => format!(
            "OR({})",
            or.iter().map(describe_condition).collect::<Vec<_>>().join(", ")
        ),
        Condition::Not { not } => format!("NOT({})", describe_condition(not)),
    }
}

fn operator_str(op: Operator) -> &'static str {
    match op {
        Operator::Eq => "==",
        Operator::Ne => "!=",
        Operator::Lt => "<",
        Operator::Le => "<=",
        Operator::Gt => ">",
        Operator::Ge => ">=",
        Operator::In => "IN",
        Operator::NotIn => "NOT IN",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pact_types::{Field, Policy, Rule};

    fn max_price_policy() -> Policy {
        Policy::new(
            "policy-1",
            vec![Rule {
                name: "max_price".to_string(),
                condition: Condition::Comparison(Comparison {
                    field: Field::OfferPrice,
                    operator: Operator::Le,
                    value: ConditionValue::Number(0.05),
                }),
            }],
        )
    }

    #[test]
    fn offer_under_max_price_is_allowed() {
        let ctx = PolicyContext::new().set_number(Field::OfferPrice, 0.04);
        let result = evaluate(&max_price_policy(), &ctx);
        assert!(result.allowed);
        assert!(result.violated_rules.is_empty());
    }

    #[test]
    fn offer_over_max_price_is_denied_with_evidence() {
        let ctx = PolicyContext::new().set_number(Field::OfferPrice, 0.10);
        let result = evaluate(&max_price_policy(), &ctx);
        assert!(!result.allowed);
        assert_eq!(result.violated_rules, vec!["max_price".to_string()]);
        assert_eq!(result.mapped_failure_code, "PACT-101");
        assert!(result.evidence_refs[0].starts_with("policy_rule:max_price:"));
    }

    #[test]
    fn unresolved_field_fails_the_rule_not_errors() {
        let ctx = PolicyContext::new();
        let result = evaluate(&max_price_policy(), &ctx);
        assert!(!result.allowed);
    }

    #[test]
    fn settlement_mode_mismatch_maps_to_pact_101_not_deadlock_code() {
        let policy = Policy::new(
            "policy-2",
            vec![Rule {
                name: "escrow_only".to_string(),
                condition: Condition::Comparison(Comparison {
                    field: Field::SettlementMode,
                    operator: Operator::Eq,
                    value: ConditionValue::String("escrow".to_string()),
                }),
            }],
        );
        let ctx = PolicyContext::new().set_string(Field::SettlementMode, "boundary");
        let result = evaluate(&policy, &ctx);
        assert!(!result.allowed);
        assert_eq!(result.mapped_failure_code, "PACT-101");
    }

    #[test]
    fn and_requires_all_children() {
        let policy = Policy::new(
            "policy-3",
            vec![Rule {
                name: "price_and_mode".to_string(),
                condition: Condition::And {
                    and: vec![
                        Condition::Comparison(Comparison {
                            field: Field::OfferPrice,
                            operator: Operator::Le,
                            value: ConditionValue::Number(0.05),
                        }),
                        Condition::Comparison(Comparison {
                            field: Field::SettlementMode,
                            operator: Operator::Eq,
                            value: ConditionValue::String("boundary".to_string()),
                        }),
                    ],
                },
            }],
        );
        let ctx = PolicyContext::new()
            .set_number(Field::OfferPrice, 0.04)
            .set_string(Field::SettlementMode, "boundary");
        assert!(evaluate(&policy, &ctx).allowed);

        let ctx_fail = PolicyContext::new()
            .set_number(Field::OfferPrice, 0.04)
            .set_string(Field::SettlementMode, "escrow");
        assert!(!evaluate(&policy, &ctx_fail).allowed);
    }

    #[test]
    fn not_negates_child() {
        let policy = Policy::new(
            "policy-4",
            vec![Rule {
                name: "not_escrow".to_string(),
                condition: Condition::Not {
                    not: Box::new(Condition::Comparison(Comparison {
                        field: Field::SettlementMode,
                        operator: Operator::Eq,
                        value: ConditionValue::String("escrow".to_string()),
                    })),
                },
            }],
        );
        let ctx = PolicyContext::new().set_string(Field::SettlementMode, "boundary");
        assert!(evaluate(&policy, &ctx).allowed);
    }

    #[test]
    fn in_operator_checks_membership_when_value_is_array() {
        let policy = Policy::new(
            "policy-5",
            vec![Rule {
                name: "allowed_modes".to_string(),
                condition: Condition::Comparison(Comparison {
                    field: Field::SettlementMode,
                    operator: Operator::In,
                    value: ConditionValue::Array(vec![
                        ConditionValue::String("boundary".to_string()),
                        ConditionValue::String("escrow".to_string()),
                    ]),
                }),
            }],
        );
        let ctx = PolicyContext::new().set_string(Field::SettlementMode, "boundary");
        assert!(evaluate(&policy, &ctx).allowed);

        let ctx_fail = PolicyContext::new().set_string(Field::SettlementMode, "direct");
        assert!(!evaluate(&policy, &ctx_fail).allowed);
    }

    #[test]
    fn relational_operator_with_non_numeric_operand_fails_not_errors() {
        let policy = Policy::new(
            "policy-6",
            vec![Rule {
                name: "bad_type".to_string(),
                condition: Condition::Comparison(Comparison {
                    field: Field::SettlementMode,
                    operator: Operator::Lt,
                    value: ConditionValue::Number(5.0),
                }),
            }],
        );
        let ctx = PolicyContext::new().set_string(Field::SettlementMode, "boundary");
        assert!(!evaluate(&policy, &ctx).allowed);
    }

    #[test]
    fn rule_reordering_changes_policy_hash() {
        let rule_a = Rule {
            name: "a".to_string(),
            condition: Condition::Comparison(Comparison {
                field: Field::OfferPrice,
                operator: Operator::Le,
                value: ConditionValue::Number(0.05),
            }),
        };
        let rule_b = Rule {
            name: "b".to_string(),
            condition: Condition::Comparison(Comparison {
                field: Field::BidPrice,
                operator: Operator::Ge,
                value: ConditionValue::Number(0.01),
            }),
        };
        let p1 = Policy::new("p", vec![rule_a.clone(), rule_b.clone()]);
        let p2 = Policy::new("p", vec![rule_b, rule_a]);
        assert_ne!(policy_hash(&p1).unwrap(), policy_hash(&p2).unwrap());
    }
}
