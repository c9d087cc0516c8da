// Path: crates/pact-verifier/src/util.rs

use anyhow::{Context, Result};
use pact_types::Transcript;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Reads and parses a transcript JSON file. Hashes are always checked
/// against the canonical form downstream; this just deserializes.
pub fn read_transcript(path: &Path) -> Result<Transcript> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading transcript file {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing transcript at {}", path.display()))
}

/// Writes `value` as pretty JSON either to `out` (if given) or to stdout.
/// A broken pipe on stdout (the reader closed early, e.g. `| head`) is
/// swallowed rather than reported as an error.
pub fn write_json_output(value: &impl serde::Serialize, out: Option<&PathBuf>) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value)?;
    match out {
        Some(path) => {
            std::fs::write(path, rendered.as_bytes())
                .with_context(|| format!("writing output to {}", path.display()))?;
        }
        None => {
            let stdout = std::io::stdout();
            let mut handle = stdout.lock();
            if let Err(e) = writeln!(handle, "{rendered}") {
                if e.kind() != std::io::ErrorKind::BrokenPipe {
                    return Err(e.into());
                }
            }
        }
    }
    Ok(())
}

/// Lists the `.json` transcript files directly under `dir`, in a stable
/// (lexicographic) order.
pub fn list_transcript_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut entries: Vec<PathBuf> = std::fs::read_dir(dir)
        .with_context(|| format!("reading transcripts directory {}", dir.display()))?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.extension().and_then(|e| e.to_str()) == Some("json"))
        .collect();
    entries.sort();
    Ok(entries)
}
