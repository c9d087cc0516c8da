// Path: crates/pact-verifier/src/commands/auditor_pack.rs
//! `pact-verifier auditor-pack`: builds a self-verifying ZIP evidence
//! bundle for a single transcript (spec.md §4.7.3), optionally folding in
//! a passport recompute and/or a contention scan over a sibling
//! transcripts directory as extra pack artifacts.

use crate::commands::contention_scan::scan as scan_contention;
use crate::commands::passport_v1_recompute::{load_transcripts_in_dir, recompute};
use crate::constitution::load_constitution_bytes;
use crate::util::read_transcript;
use anyhow::{Context, Result};
use clap::Parser;
use pact_replay::{build_pack, PackOptions};
use std::path::PathBuf;

#[derive(Parser, Debug)]
pub struct AuditorPackArgs {
    /// Path to a transcript JSON file.
    #[clap(long)]
    pub transcript: PathBuf,

    /// Output path for the built ZIP file.
    #[clap(long)]
    pub out: PathBuf,

    /// Use a non-standard constitution file instead of the bundled one.
    #[clap(long)]
    pub constitution: Option<PathBuf>,

    /// Fold a passport-v1 recompute for this buyer into the pack as
    /// `derived/passport_recompute.json`. Requires `--transcripts-dir`.
    #[clap(long = "include-passport", requires = "transcripts_dir")]
    pub include_passport: bool,

    /// The buyer agent id the passport recompute is scoped to. Defaults
    /// to the transcript's own first-round `agent_id` when omitted.
    #[clap(long = "passport-buyer-agent-id")]
    pub passport_buyer_agent_id: Option<String>,

    /// Fold a contention scan into the pack as
    /// `derived/contention_scan.json`. Requires `--transcripts-dir`.
    #[clap(long = "include-contention", requires = "transcripts_dir")]
    pub include_contention: bool,

    /// Directory of sibling transcripts `--include-passport` /
    /// `--include-contention` scan.
    #[clap(long = "transcripts-dir")]
    pub transcripts_dir: Option<PathBuf>,

    /// `manifest.json`'s `generated_at_ms`. Defaults to 0 (deterministic
    /// builds); callers that want a wall-clock stamp pass it explicitly,
    /// since this crate never calls `SystemTime::now()` on the path that
    /// hashes or chains transcript data.
    #[clap(long, default_value_t = 0)]
    pub generated_at_ms: u64,
}

pub fn run(args: AuditorPackArgs) -> Result<bool> {
    let transcript = read_transcript(&args.transcript)?;
    let constitution_bytes = load_constitution_bytes(args.constitution.as_deref())?;

    let mut extra_files = Vec::new();
    if args.include_passport || args.include_contention {
        let dir = args
            .transcripts_dir
            .as_ref()
            .context("--include-passport/--include-contention require --transcripts-dir")?;
        let siblings = load_transcripts_in_dir(dir)?;

        if args.include_passport {
            let buyer_agent_id = args
                .passport_buyer_agent_id
                .clone()
                .or_else(|| transcript.rounds.first().map(|r| r.agent_id.clone()))
                .unwrap_or_default();
            let report = recompute(&buyer_agent_id, &siblings);
            extra_files.push((
                "derived/passport_recompute.json".to_string(),
                serde_json::to_vec_pretty(&report)?,
            ));
        }
        if args.include_contention {
            let report = scan_contention(&siblings);
            extra_files.push((
                "derived/contention_scan.json".to_string(),
                serde_json::to_vec_pretty(&report)?,
            ));
        }
    }

    let options = PackOptions {
        generated_at_ms: args.generated_at_ms,
        extra_files,
    };
    let zip_bytes = build_pack(&transcript, &constitution_bytes, &options)?;
    std::fs::write(&args.out, &zip_bytes)
        .with_context(|| format!("writing auditor pack to {}", args.out.display()))?;
    tracing::info!(path = %args.out.display(), bytes = zip_bytes.len(), "wrote auditor pack");
    Ok(true)
}
