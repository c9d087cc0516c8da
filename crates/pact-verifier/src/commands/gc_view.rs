// Path: crates/pact-verifier/src/commands/gc_view.rs
//! `pact-verifier gc-view`: recomputes the general-counsel view — replay
//! integrity plus the Default Blame Logic responsibility summary — for a
//! single transcript file.

use crate::constitution::standard_constitution_hash;
use crate::util::{read_transcript, write_json_output};
use anyhow::Result;
use clap::Parser;
use pact_replay::compute_gc_view;
use std::path::PathBuf;

#[derive(Parser, Debug)]
pub struct GcViewArgs {
    /// Path to a transcript JSON file.
    #[clap(long)]
    pub transcript: PathBuf,

    /// Write the gc_view JSON here instead of stdout.
    #[clap(long)]
    pub out: Option<PathBuf>,
}

/// Returns `true` on a well-formed transcript (exit 0), `false` on
/// malformed input (exit 1). A *replay* failure is not malformed input —
/// it is a valid, informative `gc_view.integrity` result.
pub fn run(args: GcViewArgs) -> Result<bool> {
    let transcript = read_transcript(&args.transcript)?;
    let constitution_hash = standard_constitution_hash()?;
    let gc_view = compute_gc_view(&transcript, &constitution_hash);
    write_json_output(&gc_view, args.out.as_ref())?;
    Ok(true)
}
