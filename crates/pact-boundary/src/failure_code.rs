// Path: crates/pact-boundary/src/failure_code.rs
//! The fixed `PACT-NNN` code → `(stage, fault_domain, default terminality)`
//! table from spec.md §4.5/§4.6. Every boundary abort carries a code drawn
//! from this closed set; the table is the single source of truth both the
//! runtime (building a `failure_event`) and DBL (attributing fault) consult.

use pact_types::Terminality;

/// One entry of the fixed failure-code taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodeInfo {
    pub stage: &'static str,
    pub fault_domain: &'static str,
    pub default_terminality: Terminality,
}

/// Looks up the `(stage, fault_domain, terminality)` for a `PACT-NNN` code.
/// Unknown codes fall back to `(negotiation, policy, terminal)`, the same
/// default spec.md assigns to any unmapped Policy-v4 failure, so that a
/// caller supplying a code outside the closed set still produces a sealed,
/// well-formed `failure_event` rather than panicking.
pub fn lookup(code: &str) -> CodeInfo {
    match code {
        "PACT-101" => CodeInfo {
            stage: "negotiation",
            fault_domain: "policy",
            default_terminality: Terminality::Terminal,
        },
        "PACT-201" => CodeInfo {
            stage: "admission",
            fault_domain: "identity",
            default_terminality: Terminality::Terminal,
        },
        "PACT-303" => CodeInfo {
            stage: "negotiation",
            fault_domain: "negotiation",
            default_terminality: Terminality::Terminal,
        },
        "PACT-330" => CodeInfo {
            stage: "settlement",
            fault_domain: "provider",
            default_terminality: Terminality::Terminal,
        },
        "PACT-331" => CodeInfo {
            stage: "settlement",
            fault_domain: "buyer",
            default_terminality: Terminality::Terminal,
        },
        "PACT-404" => CodeInfo {
            stage: "settlement",
            fault_domain: "settlement",
            default_terminality: Terminality::NonTerminal,
        },
        "PACT-420" => CodeInfo {
            stage: "negotiation",
            fault_domain: "provider",
            default_terminality: Terminality::Terminal,
        },
        "PACT-421" => CodeInfo {
            stage: "negotiation",
            fault_domain: "provider",
            default_terminality: Terminality::Terminal,
        },
        "PACT-505" => CodeInfo {
            stage: "discovery",
            fault_domain: "recursive",
            default_terminality: Terminality::Terminal,
        },
        _ => CodeInfo {
            stage: "negotiation",
            fault_domain: "policy",
            default_terminality: Terminality::Terminal,
        },
    }
}
