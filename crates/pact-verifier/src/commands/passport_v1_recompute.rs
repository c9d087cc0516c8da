// Path: crates/pact-verifier/src/commands/passport_v1_recompute.rs
//! `pact-verifier passport-v1-recompute`: recomputes a buyer's passport
//! exposure summary (transaction count, total settled spend, unique
//! counterparties, recent policy failures) from a directory of sealed
//! transcripts, the same way the Boundary's velocity/credit checks read
//! rolling history, but over the full archive rather than a 60s window.
//!
//! This is an auditor-facing accessory report, not part of the live
//! Boundary path: an auditor reconstructing a buyer's standing after the
//! fact has no access to the process-scoped `VelocityStore`, only the
//! sealed transcripts themselves.

use crate::util::{list_transcript_files, read_transcript, write_json_output};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::PathBuf;

#[derive(clap::Parser, Debug)]
pub struct PassportV1RecomputeArgs {
    /// Directory of transcript JSON files to scan.
    #[clap(long = "transcripts-dir")]
    pub transcripts_dir: PathBuf,

    /// Restrict the recompute to rounds whose `agent_id` is this buyer.
    #[clap(long = "buyer-agent-id")]
    pub buyer_agent_id: String,

    /// Write the recompute JSON here instead of stdout.
    #[clap(long)]
    pub out: Option<PathBuf>,
}

/// The recomputed passport exposure summary for one buyer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PassportRecompute {
    pub version: String,
    pub buyer_agent_id: String,
    pub transcripts_scanned: u64,
    pub settled_tx_count: u64,
    pub total_settled_amount: f64,
    pub unique_counterparties: u64,
    pub recent_policy_failures: u64,
}

/// Pulls `agreed_price=<f64>` out of an ACCEPT round's `content_summary`
/// (see `pact_transcript::summarize_message`). Returns `None` if the
/// summary doesn't carry the expected prefix — a malformed or
/// hand-edited round is skipped rather than treated as a parse error,
/// since this report tolerates partial data by design.
fn parse_agreed_price(content_summary: &str) -> Option<f64> {
    content_summary
        .split_whitespace()
        .find_map(|tok| tok.strip_prefix("agreed_price="))
        .and_then(|v| v.parse::<f64>().ok())
}

/// Recomputes a [`PassportRecompute`] for `buyer_agent_id` from every
/// transcript in `transcripts`.
pub fn recompute(
    buyer_agent_id: &str,
    transcripts: &[pact_types::Transcript],
) -> PassportRecompute {
    let mut settled_tx_count = 0u64;
    let mut total_settled_amount = 0.0f64;
    let mut counterparties: BTreeSet<String> = BTreeSet::new();
    let mut recent_policy_failures = 0u64;

    for transcript in transcripts {
        let involves_buyer = transcript
            .rounds
            .iter()
            .any(|r| r.agent_id == buyer_agent_id);
        if !involves_buyer {
            continue;
        }

        for round in &transcript.rounds {
            if round.round_type == "ACCEPT" {
                if let Some(price) = parse_agreed_price(&round.content_summary) {
                    settled_tx_count += 1;
                    total_settled_amount += price;
                }
            }
            if round.agent_id != buyer_agent_id {
                counterparties.insert(round.agent_id.clone());
            }
        }

        if let Some(fe) = &transcript.failure_event {
            if fe.code.starts_with("PACT-1") {
                recent_policy_failures += 1;
            }
        }
    }

    PassportRecompute {
        version: "pact-passport-recompute/1.0".to_string(),
        buyer_agent_id: buyer_agent_id.to_string(),
        transcripts_scanned: transcripts.len() as u64,
        settled_tx_count,
        total_settled_amount,
        unique_counterparties: counterparties.len() as u64,
        recent_policy_failures,
    }
}

/// Reads every `.json` file in `dir` as a transcript, skipping files that
/// don't parse (reported via `tracing`, not fatal — a directory scan over
/// an archive should not abort on one corrupt file).
pub fn load_transcripts_in_dir(dir: &std::path::Path) -> Result<Vec<pact_types::Transcript>> {
    let files = list_transcript_files(dir)?;
    let mut transcripts = Vec::with_capacity(files.len());
    for path in files {
        match read_transcript(&path) {
            Ok(t) => transcripts.push(t),
            Err(e) => tracing::warn!(path = %path.display(), error = %e, "skipping unparseable transcript"),
        }
    }
    Ok(transcripts)
}

pub fn run(args: PassportV1RecomputeArgs) -> Result<bool> {
    let transcripts = load_transcripts_in_dir(&args.transcripts_dir)
        .with_context(|| format!("scanning transcripts directory {}", args.transcripts_dir.display()))?;
    let report = recompute(&args.buyer_agent_id, &transcripts);
    write_json_output(&report, args.out.as_ref())?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_agreed_price_from_content_summary() {
        assert_eq!(
            parse_agreed_price("agreed_price=0.04 settlement_mode=boundary"),
            Some(0.04)
        );
        assert_eq!(parse_agreed_price("price=0.04"), None);
    }

    #[test]
    fn recompute_counts_only_the_named_buyer() {
        let transcripts = vec![];
        let report = recompute("buyer-1", &transcripts);
        assert_eq!(report.transcripts_scanned, 0);
        assert_eq!(report.settled_tx_count, 0);
    }
}
