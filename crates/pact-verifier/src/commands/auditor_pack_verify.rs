// Path: crates/pact-verifier/src/commands/auditor_pack_verify.rs
//! `pact-verifier auditor-pack-verify`: recomputes checksums and derived
//! artifacts for a ZIP built by `auditor-pack` and reports whether it is
//! self-consistent (spec.md §4.7.3's `verify_pack` algorithm).

use crate::constitution::{load_constitution_bytes, standard_constitution_hash};
use crate::util::write_json_output;
use anyhow::{Context, Result};
use clap::Parser;
use pact_replay::verify_pack;
use std::path::PathBuf;

#[derive(Parser, Debug)]
pub struct AuditorPackVerifyArgs {
    /// Path to the ZIP file built by `auditor-pack`.
    #[clap(long)]
    pub zip: PathBuf,

    /// Tolerate a constitution hash outside the accepted set and any
    /// files beyond the standard pack layout, instead of failing.
    #[clap(long = "allow-nonstandard")]
    pub allow_nonstandard: bool,

    /// Accept packs built against this constitution file in addition to
    /// (not instead of) the bundled standard constitution.
    #[clap(long)]
    pub constitution: Option<PathBuf>,

    /// Write the verify report JSON here instead of stdout.
    #[clap(long)]
    pub out: Option<PathBuf>,
}

pub fn run(args: AuditorPackVerifyArgs) -> Result<bool> {
    let zip_bytes =
        std::fs::read(&args.zip).with_context(|| format!("reading pack {}", args.zip.display()))?;

    let mut accepted_hashes = vec![standard_constitution_hash()?];
    if let Some(path) = &args.constitution {
        let bytes = load_constitution_bytes(Some(path))?;
        accepted_hashes.push(pact_codec::sha256_hex(&bytes)?);
    }

    let report = verify_pack(&zip_bytes, &accepted_hashes, args.allow_nonstandard)?;
    let ok = report.ok;
    write_json_output(&report, args.out.as_ref())?;
    Ok(ok)
}
