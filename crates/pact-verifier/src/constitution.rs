// Path: crates/pact-verifier/src/constitution.rs
//! The standard constitution bundled with every auditor pack this binary
//! builds, and the accepted-hash list `auditor-pack-verify` checks a
//! pack's embedded constitution against by default.

use anyhow::{Context, Result};
use std::path::Path;

/// The constitution text embedded in packs built by `pact-verifier
/// auditor-pack` unless `--constitution` points at a different file.
pub const STANDARD_CONSTITUTION: &[u8] = include_bytes!("../assets/CONSTITUTION_v1.md");

/// The hash `auditor-pack-verify` accepts by default: the standard
/// constitution shipped with this binary. Operators running a fork with a
/// locally amended constitution can still verify packs built against it
/// by passing `--constitution` to recompute the accepted hash, or
/// `--allow-nonstandard` to skip the check outright.
pub fn standard_constitution_hash() -> Result<String> {
    pact_codec::sha256_hex(STANDARD_CONSTITUTION).context("hashing the standard constitution")
}

/// Loads constitution bytes from `path` if given, else falls back to the
/// bundled standard text.
pub fn load_constitution_bytes(path: Option<&Path>) -> Result<Vec<u8>> {
    match path {
        Some(p) => std::fs::read(p)
            .with_context(|| format!("reading constitution file {}", p.display())),
        None => Ok(STANDARD_CONSTITUTION.to_vec()),
    }
}
