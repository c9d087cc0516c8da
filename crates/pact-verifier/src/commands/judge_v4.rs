// Path: crates/pact-verifier/src/commands/judge_v4.rs
//! `pact-verifier judge-v4`: emits the Default Blame Logic v2 judgment
//! for a single transcript.

use crate::util::{read_transcript, write_json_output};
use anyhow::Result;
use clap::Parser;
use pact_replay::resolve_blame;
use std::path::PathBuf;

#[derive(Parser, Debug)]
pub struct JudgeV4Args {
    /// Path to a transcript JSON file.
    #[clap(long)]
    pub transcript: PathBuf,

    /// Write the judgment JSON here instead of stdout.
    #[clap(long)]
    pub out: Option<PathBuf>,
}

pub fn run(args: JudgeV4Args) -> Result<bool> {
    let transcript = read_transcript(&args.transcript)?;
    let judgment = resolve_blame(&transcript);
    write_json_output(&judgment, args.out.as_ref())?;
    Ok(true)
}
