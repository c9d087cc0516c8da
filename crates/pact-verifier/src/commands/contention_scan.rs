// Path: crates/pact-verifier/src/commands/contention_scan.rs
//! `pact-verifier contention-scan`: scans a directory of sealed
//! transcripts for settlement contention — more than one transcript
//! sealing a successful `ACCEPT` for the same `intent_id`, or a
//! `PACT-330` (non-winner attempted settlement) failure event — and
//! reports the offending transcript ids grouped by intent.

use crate::commands::passport_v1_recompute::load_transcripts_in_dir;
use crate::util::write_json_output;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

#[derive(clap::Parser, Debug)]
pub struct ContentionScanArgs {
    /// Directory of transcript JSON files to scan.
    #[clap(long = "transcripts-dir")]
    pub transcripts_dir: PathBuf,

    /// Write the scan report JSON here instead of stdout.
    #[clap(long)]
    pub out: Option<PathBuf>,
}

/// One intent for which more than one transcript reached (or attempted)
/// settlement.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContentionEntry {
    pub intent_id: String,
    pub accepted_transcript_ids: Vec<String>,
    pub pact_330_transcript_ids: Vec<String>,
}

/// The full scan report.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContentionReport {
    pub version: String,
    pub transcripts_scanned: u64,
    pub contentions: Vec<ContentionEntry>,
}

/// Scans `transcripts` for settlement contention, grouped by `intent_id`.
pub fn scan(transcripts: &[pact_types::Transcript]) -> ContentionReport {
    let mut accepted_by_intent: BTreeMap<String, Vec<String>> = BTreeMap::new();
    let mut pact_330_by_intent: BTreeMap<String, Vec<String>> = BTreeMap::new();

    for transcript in transcripts {
        let sealed_with_accept = transcript.rounds.last().is_some_and(|r| r.round_type == "ACCEPT")
            && transcript.failure_event.is_none();
        if sealed_with_accept {
            accepted_by_intent
                .entry(transcript.intent_id.clone())
                .or_default()
                .push(transcript.transcript_id.clone());
        }
        if let Some(fe) = &transcript.failure_event {
            if fe.code == "PACT-330" {
                pact_330_by_intent
                    .entry(transcript.intent_id.clone())
                    .or_default()
                    .push(transcript.transcript_id.clone());
            }
        }
    }

    let mut intent_ids: std::collections::BTreeSet<String> =
        accepted_by_intent.keys().cloned().collect();
    intent_ids.extend(pact_330_by_intent.keys().cloned());

    let contentions: Vec<ContentionEntry> = intent_ids
        .into_iter()
        .filter_map(|intent_id| {
            let accepted = accepted_by_intent.get(&intent_id).cloned().unwrap_or_default();
            let contended = pact_330_by_intent.get(&intent_id).cloned().unwrap_or_default();
            if accepted.len() > 1 || !contended.is_empty() {
                Some(ContentionEntry {
                    intent_id,
                    accepted_transcript_ids: accepted,
                    pact_330_transcript_ids: contended,
                })
            } else {
                None
            }
        })
        .collect();

    ContentionReport {
        version: "pact-contention-scan/1.0".to_string(),
        transcripts_scanned: transcripts.len() as u64,
        contentions,
    }
}

pub fn run(args: ContentionScanArgs) -> Result<bool> {
    let transcripts = load_transcripts_in_dir(&args.transcripts_dir)
        .with_context(|| format!("scanning transcripts directory {}", args.transcripts_dir.display()))?;
    let report = scan(&transcripts);
    write_json_output(&report, args.out.as_ref())?;
    Ok(true)
}
