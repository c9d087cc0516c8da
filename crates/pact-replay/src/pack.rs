// Path: crates/pact-replay/src/pack.rs
//! The self-verifying auditor pack (spec.md §4.7.3): a ZIP bundle an
//! auditor or insurer can hand to any independent verifier without
//! re-running the protocol. Every derived artifact is recomputed from the
//! input transcript, never trusted as supplied.

use crate::dbl::{resolve_blame, DblDetermination, Judgment};
use crate::error::ReplayError;
use crate::replay::{replay_transcript, IntegrityStatus, ReplayResult};
use pact_transcript::hash_excluding;
use pact_types::Transcript;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::{Read, Write};

/// Files every auditor pack carries. `verify_pack` flags anything else as
/// non-standard unless `allow_nonstandard` is set.
pub const STANDARD_FILES: &[&str] = &[
    "manifest.json",
    "checksums.sha256",
    "constitution/CONSTITUTION_v1.md",
    "input/transcript.json",
    "derived/gc_view.json",
    "derived/judgment.json",
    "derived/insurer_summary.json",
    "README.txt",
];

/// A compact summary of the replay verifier's findings, suitable for a
/// governance committee that doesn't need the full round-by-round detail.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IntegritySummary {
    pub integrity_status: IntegrityStatus,
    pub rounds_verified: u64,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl From<&ReplayResult> for IntegritySummary {
    fn from(r: &ReplayResult) -> Self {
        Self {
            integrity_status: r.integrity_status,
            rounds_verified: r.rounds_verified,
            errors: r.errors.clone(),
            warnings: r.warnings.clone(),
        }
    }
}

/// Who the Default Blame Logic determination names, stripped of the full
/// `Judgment` detail.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResponsibilitySection {
    pub dbl_determination: String,
    pub confidence: f64,
    pub required_next_actor: String,
}

/// `derived/gc_view.json`: the "governance committee view" — per
/// spec.md §4.7.3, the constitution hash, integrity summary, executive
/// status, and responsibility section, without the raw rounds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GcView {
    pub intent_id: String,
    pub transcript_id: String,
    pub constitution_hash: String,
    pub executive_status: String,
    pub integrity: IntegritySummary,
    pub responsibility: ResponsibilitySection,
}

/// The one-line outcome spec.md §4.7.3 calls `executive_status` in
/// `gc_view.json` and `outcome` in `manifest.json`: `TAMPERED` when
/// replay found a broken chain or bad signature (the rail, not either
/// party, is suspect), else the failure code if one is attached, else
/// `SETTLED` for a clean terminal accept.
fn executive_status(replay: &ReplayResult, judgment: &Judgment) -> String {
    if matches!(judgment.dbl_determination, DblDetermination::IndeterminateTamper)
        || replay.integrity_status == IntegrityStatus::Tampered
    {
        "TAMPERED".to_string()
    } else if let Some(code) = &judgment.failure_code {
        format!("FAILED: {code}")
    } else {
        "SETTLED".to_string()
    }
}

/// `derived/insurer_summary.json`: the fields an insurer's claims process
/// consumes directly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InsurerSummary {
    pub intent_id: String,
    pub claim_supported: bool,
    pub dbl_determination: String,
    pub passport_impact: f64,
    pub confidence: f64,
    pub failure_code: Option<String>,
}

/// `manifest.json`: per spec.md §4.7.3, the constitution and transcript
/// identity, the integrity/outcome/responsibility summary, and the full
/// file listing, so a verifier can tell a missing standard file from an
/// added one without re-deriving anything.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Manifest {
    pub pack_version: String,
    pub constitution_version: String,
    pub constitution_hash: String,
    pub transcript_id: String,
    pub transcript_hash: String,
    pub integrity: IntegritySummary,
    pub outcome: String,
    pub responsibility: ResponsibilitySection,
    pub included_artifacts: Vec<String>,
    pub generated_at_ms: u64,
}

const PACK_VERSION: &str = "pact-auditor-pack/1.0";

/// The constitution schema version stamped into `manifest.json`. A future
/// amendment (spec.md §4.7.3 "Amendment") bumps this alongside the bundled
/// text; see `pact-verifier`'s `constitution` module for the accepted-hash
/// side of that.
pub const CONSTITUTION_VERSION: &str = "pact-constitution/1.0";

/// The hash a transcript commits to once sealed: its own `final_hash` if
/// present, else recomputed the same way `seal` would. A transcript handed
/// to `build_pack` before being sealed is unusual but not rejected — the
/// pack still needs a stable `transcript_hash` for its manifest.
fn transcript_commitment_hash(transcript: &Transcript) -> Result<String, ReplayError> {
    match &transcript.final_hash {
        Some(hash) => Ok(hash.clone()),
        None => Ok(hash_excluding(transcript, &["final_hash"])?),
    }
}

fn build_gc_view(
    transcript: &Transcript,
    constitution_hash: &str,
    replay: &ReplayResult,
    judgment: &Judgment,
) -> GcView {
    GcView {
        intent_id: transcript.intent_id.clone(),
        transcript_id: transcript.transcript_id.clone(),
        constitution_hash: constitution_hash.to_string(),
        executive_status: executive_status(replay, judgment),
        integrity: IntegritySummary::from(replay),
        responsibility: ResponsibilitySection {
            dbl_determination: format!("{:?}", judgment.dbl_determination),
            confidence: judgment.confidence,
            required_next_actor: format!("{:?}", judgment.required_next_actor),
        },
    }
}

fn build_insurer_summary(transcript: &Transcript, judgment: &Judgment) -> InsurerSummary {
    let claim_supported = matches!(
        judgment.dbl_determination,
        crate::dbl::DblDetermination::ProviderAtFault
    );
    InsurerSummary {
        intent_id: transcript.intent_id.clone(),
        claim_supported,
        dbl_determination: format!("{:?}", judgment.dbl_determination),
        passport_impact: judgment.passport_impact,
        confidence: judgment.confidence,
        failure_code: judgment.failure_code.clone(),
    }
}

/// The "general counsel view" derived artifact: replay integrity plus the
/// Default Blame Logic responsibility determination, with no raw rounds.
/// Exposed standalone (not just inside [`build_pack`]) so the
/// `gc-view` CLI surface and the pack's own recompute-and-compare step
/// share one implementation. `constitution_hash` is whatever constitution
/// this view is being computed against — the standard bundled one for a
/// bare `gc-view` call, or the hash of the constitution embedded in a pack
/// when recomputing during `verify_pack`.
pub fn compute_gc_view(transcript: &Transcript, constitution_hash: &str) -> GcView {
    let replay = replay_transcript(transcript);
    let judgment = resolve_blame(transcript);
    build_gc_view(transcript, constitution_hash, &replay, &judgment)
}

/// The insurer-facing derived artifact. See [`compute_gc_view`] for why
/// this is a standalone function rather than private to [`build_pack`].
pub fn compute_insurer_summary(transcript: &Transcript) -> InsurerSummary {
    let judgment = resolve_blame(transcript);
    build_insurer_summary(transcript, &judgment)
}

/// Options controlling which optional artifacts [`build_pack`] includes.
/// `extra_files` carries pre-rendered bytes for `--include-passport` /
/// `--include-contention` (the directory scan that produces them belongs
/// to the CLI, not to this crate, which stays filesystem-agnostic).
#[derive(Debug, Clone, Default)]
pub struct PackOptions {
    pub generated_at_ms: u64,
    pub extra_files: Vec<(String, Vec<u8>)>,
}

/// Builds a self-verifying auditor pack for `transcript`, embedding
/// `constitution_bytes` verbatim as `constitution/CONSTITUTION_v1.md`.
/// Returns the raw ZIP archive bytes.
pub fn build_pack(
    transcript: &Transcript,
    constitution_bytes: &[u8],
    options: &PackOptions,
) -> Result<Vec<u8>, ReplayError> {
    let replay = replay_transcript(transcript);
    let judgment = resolve_blame(transcript);
    let constitution_hash = pact_codec::sha256_hex(constitution_bytes)?;

    let transcript_json = serde_json::to_vec_pretty(transcript)?;
    let gc_view = build_gc_view(transcript, &constitution_hash, &replay, &judgment);
    let gc_view_json = serde_json::to_vec_pretty(&gc_view)?;
    let judgment_json = serde_json::to_vec_pretty(&judgment)?;
    let insurer_summary = build_insurer_summary(transcript, &judgment);
    let insurer_summary_json = serde_json::to_vec_pretty(&insurer_summary)?;
    let readme = format!(
        "PACT auditor pack for intent {}\n\
         Contains the original transcript, a recomputed replay integrity\n\
         summary, a Default Blame Logic v2 judgment, and an insurer summary.\n\
         Verify with `pact-verifier auditor-pack-verify --zip <this file>`.\n",
        transcript.intent_id
    )
    .into_bytes();

    let mut entries: Vec<(String, Vec<u8>)> = vec![
        (
            "constitution/CONSTITUTION_v1.md".to_string(),
            constitution_bytes.to_vec(),
        ),
        ("input/transcript.json".to_string(), transcript_json),
        ("derived/gc_view.json".to_string(), gc_view_json),
        ("derived/judgment.json".to_string(), judgment_json),
        (
            "derived/insurer_summary.json".to_string(),
            insurer_summary_json,
        ),
        ("README.txt".to_string(), readme),
    ];
    entries.extend(options.extra_files.iter().cloned());

    // checksums.sha256 lists every other file sorted by path (spec.md §4.7.3).
    let mut sorted_for_checksums = entries.clone();
    sorted_for_checksums.sort_by(|a, b| a.0.cmp(&b.0));
    let mut checksums = String::new();
    for (name, bytes) in &sorted_for_checksums {
        checksums.push_str(&format!("{}  {}\n", pact_codec::sha256_hex(bytes)?, name));
    }
    let included_artifacts: Vec<String> = sorted_for_checksums.iter().map(|(n, _)| n.clone()).collect();
    entries.push(("checksums.sha256".to_string(), checksums.into_bytes()));

    let manifest = Manifest {
        pack_version: PACK_VERSION.to_string(),
        constitution_version: CONSTITUTION_VERSION.to_string(),
        constitution_hash: constitution_hash.clone(),
        transcript_id: transcript.transcript_id.clone(),
        transcript_hash: transcript_commitment_hash(transcript)?,
        integrity: IntegritySummary::from(&replay),
        outcome: executive_status(&replay, &judgment),
        responsibility: ResponsibilitySection {
            dbl_determination: format!("{:?}", judgment.dbl_determination),
            confidence: judgment.confidence,
            required_next_actor: format!("{:?}", judgment.required_next_actor),
        },
        included_artifacts,
        generated_at_ms: options.generated_at_ms,
    };
    entries.push((
        "manifest.json".to_string(),
        serde_json::to_vec_pretty(&manifest)?,
    ));

    let buffer = Vec::new();
    let cursor = std::io::Cursor::new(buffer);
    let mut writer = zip::ZipWriter::new(cursor);
    let zip_options: zip::write::FileOptions =
        zip::write::FileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    for (name, bytes) in &entries {
        writer
            .start_file(name.clone(), zip_options)
            .map_err(|e| ReplayError::Zip(e.to_string()))?;
        writer.write_all(bytes)?;
    }

    let cursor = writer.finish().map_err(|e| ReplayError::Zip(e.to_string()))?;
    Ok(cursor.into_inner())
}

/// The result of [`verify_pack`]: whether every checksum matched, whether
/// the bundled constitution is one of the accepted hashes, and which
/// files (if any) fell outside [`STANDARD_FILES`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VerifyReport {
    pub ok: bool,
    pub checksums_ok: bool,
    pub recompute_ok: bool,
    pub constitution_accepted: bool,
    pub nonstandard_files: Vec<String>,
    pub mismatches: Vec<String>,
    pub errors: Vec<String>,
}

/// Verifies a pack produced by [`build_pack`] per spec.md §4.7.3's
/// five-step algorithm: every listed file exists and its checksum
/// matches, the constitution hash is one of `accepted_constitution_hashes`,
/// (unless `allow_nonstandard`) no file outside [`STANDARD_FILES`] is
/// present, and every derived artifact recomputes byte-identically from
/// the pack's own `input/transcript.json`.
pub fn verify_pack(
    zip_bytes: &[u8],
    accepted_constitution_hashes: &[String],
    allow_nonstandard: bool,
) -> Result<VerifyReport, ReplayError> {
    let cursor = std::io::Cursor::new(zip_bytes);
    let mut archive = zip::ZipArchive::new(cursor).map_err(|e| ReplayError::Zip(e.to_string()))?;

    let mut files: BTreeMap<String, Vec<u8>> = BTreeMap::new();
    for i in 0..archive.len() {
        let mut entry = archive
            .by_index(i)
            .map_err(|e| ReplayError::Zip(e.to_string()))?;
        let name = entry.name().to_string();
        let mut bytes = Vec::new();
        entry.read_to_end(&mut bytes)?;
        files.insert(name, bytes);
    }

    let mut errors = Vec::new();

    let nonstandard_files: Vec<String> = files
        .keys()
        .filter(|name| !STANDARD_FILES.contains(&name.as_str()))
        .cloned()
        .collect();
    if !nonstandard_files.is_empty() && !allow_nonstandard {
        errors.push(format!(
            "non-standard files present: {}",
            nonstandard_files.join(", ")
        ));
    }

    let checksums_ok = match files.get("checksums.sha256") {
        Some(raw) => {
            let text = String::from_utf8_lossy(raw);
            let mut ok = true;
            for line in text.lines() {
                let Some((expected_hash, name)) = line.split_once("  ") else {
                    ok = false;
                    errors.push(format!("malformed checksums line: {line}"));
                    continue;
                };
                match files.get(name) {
                    Some(bytes) => {
                        let actual = match pact_codec::sha256_hex(bytes) {
                            Ok(h) => h,
                            Err(e) => {
                                ok = false;
                                errors.push(format!("codec error hashing {name}: {e}"));
                                continue;
                            }
                        };
                        if actual != expected_hash {
                            ok = false;
                            errors.push(format!("checksum mismatch for {name}"));
                        }
                    }
                    None => {
                        ok = false;
                        errors.push(format!("checksums.sha256 lists missing file {name}"));
                    }
                }
            }
            ok
        }
        None => {
            errors.push("missing checksums.sha256".to_string());
            false
        }
    };

    let constitution_accepted = match files.get("constitution/CONSTITUTION_v1.md") {
        Some(bytes) => match pact_codec::sha256_hex(bytes) {
            Ok(hash) => accepted_constitution_hashes.iter().any(|h| h == &hash),
            Err(e) => {
                errors.push(format!("codec error hashing constitution: {e}"));
                false
            }
        },
        None => {
            errors.push("missing constitution/CONSTITUTION_v1.md".to_string());
            false
        }
    };
    if !constitution_accepted && !allow_nonstandard {
        errors.push("NON_STANDARD_RULES: constitution hash mismatch".to_string());
    }

    // Step 4 recomputes gc_view against the standard/accepted constitution
    // hash, not the pack's embedded (and tamperable) one. A byte flip in
    // the bundled constitution is caught by the checksum and
    // constitution-accept checks above, not by re-deriving gc_view from
    // whatever the tampered pack happens to contain.
    let standard_constitution_hash = accepted_constitution_hashes
        .first()
        .cloned()
        .unwrap_or_default();

    let mut mismatches: Vec<String> = Vec::new();
    let recompute_ok = match files.get("input/transcript.json") {
        Some(bytes) => match serde_json::from_slice::<Transcript>(bytes) {
            Ok(transcript) => {
                let mut recompute_ok = true;
                recompute_ok &= compare_derived_artifact(
                    "derived/gc_view.json",
                    &files,
                    &compute_gc_view(&transcript, &standard_constitution_hash),
                    &mut mismatches,
                )?;
                recompute_ok &= compare_derived_artifact(
                    "derived/judgment.json",
                    &files,
                    &resolve_blame(&transcript),
                    &mut mismatches,
                )?;
                recompute_ok &= compare_derived_artifact(
                    "derived/insurer_summary.json",
                    &files,
                    &compute_insurer_summary(&transcript),
                    &mut mismatches,
                )?;
                recompute_ok
            }
            Err(_) => {
                errors.push("input/transcript.json does not parse as a transcript".to_string());
                false
            }
        },
        None => {
            errors.push("missing input/transcript.json".to_string());
            false
        }
    };
    errors.extend(mismatches.iter().cloned());

    let ok = errors.is_empty();
    Ok(VerifyReport {
        ok,
        checksums_ok,
        recompute_ok,
        constitution_accepted,
        nonstandard_files,
        mismatches,
        errors,
    })
}

/// Recomputes `artifact` and canonically compares it against the bytes
/// stored at `path` inside the pack. A mismatch is recorded in
/// `mismatches` using the wording spec.md §4.7.3 step 4 expects:
/// `"<path> mismatch after canonicalization"`.
fn compare_derived_artifact(
    path: &str,
    files: &BTreeMap<String, Vec<u8>>,
    artifact: &impl Serialize,
    mismatches: &mut Vec<String>,
) -> Result<bool, ReplayError> {
    let Some(stored_bytes) = files.get(path) else {
        mismatches.push(format!("{path} missing, cannot recompute"));
        return Ok(false);
    };
    let stored_value: serde_json::Value = match serde_json::from_slice(stored_bytes) {
        Ok(v) => v,
        Err(_) => {
            mismatches.push(format!("{path} mismatch after canonicalization"));
            return Ok(false);
        }
    };
    let stored_canonical = pact_codec::canonicalize(&pact_codec::to_value(&stored_value)?)?;
    let recomputed_canonical = pact_codec::canonicalize(&pact_codec::to_value(artifact)?)?;
    if stored_canonical == recomputed_canonical {
        Ok(true)
    } else {
        mismatches.push(format!("{path} mismatch after canonicalization"));
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pact_crypto::Ed25519KeyPair;
    use pact_transcript::{create_round_from_envelope, create_transcript, CreateTranscriptParams};
    use pact_types::{sign_envelope, Message, MessageCommon};

    fn sample_transcript() -> Transcript {
        let kp = Ed25519KeyPair::generate().unwrap();
        let t = create_transcript(CreateTranscriptParams {
            intent_id: "intent-1".to_string(),
            intent_type: "purchase".to_string(),
            created_at_ms: 1_000,
            policy_hash: "a".repeat(64),
            strategy_hash: String::new(),
            identity_snapshot_hash: String::new(),
        })
        .unwrap();
        let intent_env = sign_envelope(
            Message::Intent {
                common: MessageCommon::new("intent-1", 1_000, 61_000),
                intent_type: "purchase".to_string(),
                max_price: Some(0.05),
                constraints: None,
            },
            &kp,
            1_000,
        )
        .unwrap();
        let t = pact_transcript::append_round(
            t,
            create_round_from_envelope(&intent_env, "INTENT", "buyer"),
        )
        .unwrap();
        let accept_env = sign_envelope(
            Message::Accept {
                common: MessageCommon::new("intent-1", 1_100, 61_000),
                agreed_price: 0.04,
                settlement_mode: "boundary".to_string(),
            },
            &kp,
            1_100,
        )
        .unwrap();
        let t = pact_transcript::append_round(
            t,
            create_round_from_envelope(&accept_env, "ACCEPT", "seller"),
        )
        .unwrap();
        pact_transcript::seal(t).unwrap()
    }

    #[test]
    fn build_then_verify_round_trips_clean() {
        let transcript = sample_transcript();
        let constitution = b"# Constitution v1\n\nRules go here.\n".to_vec();
        let options = PackOptions {
            generated_at_ms: 5_000,
            extra_files: vec![],
        };
        let zip_bytes = build_pack(&transcript, &constitution, &options).unwrap();
        let accepted = vec![pact_codec::sha256_hex(&constitution).unwrap()];
        let report = verify_pack(&zip_bytes, &accepted, false).unwrap();
        assert!(report.ok);
        assert!(report.checksums_ok);
        assert!(report.constitution_accepted);
        assert!(report.nonstandard_files.is_empty());
    }

    #[test]
    fn tampered_entry_fails_checksum_verification() {
        let transcript = sample_transcript();
        let constitution = b"# Constitution v1\n".to_vec();
        let options = PackOptions {
            generated_at_ms: 5_000,
            extra_files: vec![],
        };
        let zip_bytes = build_pack(&transcript, &constitution, &options).unwrap();

        let cursor = std::io::Cursor::new(zip_bytes);
        let mut archive = zip::ZipArchive::new(cursor).unwrap();
        let mut files: Vec<(String, Vec<u8>)> = Vec::new();
        for i in 0..archive.len() {
            let mut entry = archive.by_index(i).unwrap();
            let name = entry.name().to_string();
            let mut bytes = Vec::new();
            entry.read_to_end(&mut bytes).unwrap();
            if name == "derived/judgment.json" {
                bytes = b"{\"tampered\":true}".to_vec();
            }
            files.push((name, bytes));
        }
        let out_cursor = std::io::Cursor::new(Vec::new());
        let mut writer = zip::ZipWriter::new(out_cursor);
        let opts: zip::write::FileOptions =
            zip::write::FileOptions::default().compression_method(zip::CompressionMethod::Deflated);
        for (name, bytes) in &files {
            writer.start_file(name.clone(), opts).unwrap();
            writer.write_all(bytes).unwrap();
        }
        let out_cursor = writer.finish().unwrap();

        let accepted = vec![pact_codec::sha256_hex(&constitution).unwrap()];
        let report = verify_pack(&out_cursor.into_inner(), &accepted, false).unwrap();
        assert!(!report.ok);
        assert!(!report.checksums_ok);
        assert!(report
            .errors
            .iter()
            .any(|e| e.contains("derived/judgment.json")));
    }

    #[test]
    fn unrecognized_constitution_hash_is_rejected() {
        let transcript = sample_transcript();
        let constitution = b"# Some other constitution\n".to_vec();
        let options = PackOptions {
            generated_at_ms: 5_000,
            extra_files: vec![],
        };
        let zip_bytes = build_pack(&transcript, &constitution, &options).unwrap();
        let accepted = vec!["0".repeat(64)];
        let report = verify_pack(&zip_bytes, &accepted, false).unwrap();
        assert!(!report.ok);
        assert!(!report.constitution_accepted);
        assert!(report
            .errors
            .iter()
            .any(|e| e == "NON_STANDARD_RULES: constitution hash mismatch"));
    }

    #[test]
    fn tampering_constitution_byte_breaks_recompute_and_constitution_check() {
        let transcript = sample_transcript();
        let constitution = b"# Constitution v1\n\nRules go here.\n".to_vec();
        let options = PackOptions {
            generated_at_ms: 5_000,
            extra_files: vec![],
        };
        let zip_bytes = build_pack(&transcript, &constitution, &options).unwrap();
        let accepted = vec![pact_codec::sha256_hex(&constitution).unwrap()];

        let cursor = std::io::Cursor::new(zip_bytes);
        let mut archive = zip::ZipArchive::new(cursor).unwrap();
        let mut files: Vec<(String, Vec<u8>)> = Vec::new();
        for i in 0..archive.len() {
            let mut entry = archive.by_index(i).unwrap();
            let name = entry.name().to_string();
            let mut bytes = Vec::new();
            entry.read_to_end(&mut bytes).unwrap();
            if name == "constitution/CONSTITUTION_v1.md" {
                bytes[2] ^= 0xFF;
            }
            files.push((name, bytes));
        }
        let out_cursor = std::io::Cursor::new(Vec::new());
        let mut writer = zip::ZipWriter::new(out_cursor);
        let opts: zip::write::FileOptions =
            zip::write::FileOptions::default().compression_method(zip::CompressionMethod::Deflated);
        for (name, bytes) in &files {
            writer.start_file(name.clone(), opts).unwrap();
            writer.write_all(bytes).unwrap();
        }
        let out_cursor = writer.finish().unwrap();

        let report = verify_pack(&out_cursor.into_inner(), &accepted, false).unwrap();
        assert!(!report.ok);
        assert!(!report.constitution_accepted);
        assert!(report.recompute_ok);
        assert!(report
            .errors
            .iter()
            .any(|e| e == "NON_STANDARD_RULES: constitution hash mismatch"));
    }

    #[test]
    fn tampered_derived_artifact_fails_recompute_even_with_valid_checksum() {
        let transcript = sample_transcript();
        let constitution = b"# Constitution v1\n".to_vec();
        let options = PackOptions {
            generated_at_ms: 5_000,
            extra_files: vec![],
        };
        let zip_bytes = build_pack(&transcript, &constitution, &options).unwrap();

        let cursor = std::io::Cursor::new(zip_bytes);
        let mut archive = zip::ZipArchive::new(cursor).unwrap();
        let mut files: Vec<(String, Vec<u8>)> = Vec::new();
        let tampered_judgment = br#"{"version":"dbl/2.0","status":"OK"}"#.to_vec();
        for i in 0..archive.len() {
            let mut entry = archive.by_index(i).unwrap();
            let name = entry.name().to_string();
            let mut bytes = Vec::new();
            entry.read_to_end(&mut bytes).unwrap();
            if name == "derived/judgment.json" {
                bytes = tampered_judgment.clone();
            }
            files.push((name, bytes));
        }
        // Rewrite checksums.sha256 so the checksum check passes but the
        // recomputation check still catches the substituted content.
        let mut checksums = String::new();
        for (name, bytes) in &files {
            if name == "checksums.sha256" {
                continue;
            }
            checksums.push_str(&format!(
                "{}  {}\n",
                pact_codec::sha256_hex(bytes).unwrap(),
                name
            ));
        }
        for (name, bytes) in files.iter_mut() {
            if name == "checksums.sha256" {
                *bytes = checksums.clone().into_bytes();
            }
        }

        let out_cursor = std::io::Cursor::new(Vec::new());
        let mut writer = zip::ZipWriter::new(out_cursor);
        let opts: zip::write::FileOptions =
            zip::write::FileOptions::default().compression_method(zip::CompressionMethod::Deflated);
        for (name, bytes) in &files {
            writer.start_file(name.clone(), opts).unwrap();
            writer.write_all(bytes).unwrap();
        }
        let out_cursor = writer.finish().unwrap();

        let accepted = vec![pact_codec::sha256_hex(&constitution).unwrap()];
        let report = verify_pack(&out_cursor.into_inner(), &accepted, false).unwrap();
        assert!(report.checksums_ok);
        assert!(!report.recompute_ok);
        assert!(!report.ok);
        assert!(report
            .mismatches
            .iter()
            .any(|e| e == "derived/judgment.json mismatch after canonicalization"));
    }

    #[test]
    fn nonstandard_extra_file_is_flagged_unless_allowed() {
        let transcript = sample_transcript();
        let constitution = b"# Constitution v1\n".to_vec();
        let options = PackOptions {
            generated_at_ms: 5_000,
            extra_files: vec![("extra/passport.json".to_string(), b"{}".to_vec())],
        };
        let zip_bytes = build_pack(&transcript, &constitution, &options).unwrap();
        let accepted = vec![pact_codec::sha256_hex(&constitution).unwrap()];

        let report = verify_pack(&zip_bytes, &accepted, false).unwrap();
        assert!(!report.ok);
        assert_eq!(report.nonstandard_files, vec!["extra/passport.json"]);

        let report_allowed = verify_pack(&zip_bytes, &accepted, true).unwrap();
        assert!(report_allowed.ok);
    }
}
