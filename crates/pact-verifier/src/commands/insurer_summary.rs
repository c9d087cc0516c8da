// Path: crates/pact-verifier/src/commands/insurer_summary.rs
//! `pact-verifier insurer-summary`: the insurer-facing derived artifact —
//! claim support, passport impact, and confidence — for a single
//! transcript.

use crate::util::{read_transcript, write_json_output};
use anyhow::Result;
use clap::Parser;
use pact_replay::compute_insurer_summary;
use std::path::PathBuf;

#[derive(Parser, Debug)]
pub struct InsurerSummaryArgs {
    /// Path to a transcript JSON file.
    #[clap(long)]
    pub transcript: PathBuf,

    /// Write the insurer summary JSON here instead of stdout.
    #[clap(long)]
    pub out: Option<PathBuf>,
}

pub fn run(args: InsurerSummaryArgs) -> Result<bool> {
    let transcript = read_transcript(&args.transcript)?;
    let summary = compute_insurer_summary(&transcript);
    write_json_output(&summary, args.out.as_ref())?;
    Ok(true)
}
