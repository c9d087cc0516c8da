// Path: crates/pact-replay/src/lib.rs
//! Post-hoc transcript verification: replay the hash chain and signatures
//! (C7a), attribute fault with the Default Blame Logic (C7b), and bundle
//! both into a self-verifying auditor pack (C7c).

mod dbl;
mod error;
mod pack;
mod replay;

pub use dbl::{resolve_blame, DblDetermination, Judgment, JudgmentStatus, RequiredAction, RequiredActor};
pub use error::ReplayError;
pub use pack::{
    build_pack, compute_gc_view, compute_insurer_summary, verify_pack, GcView, InsurerSummary,
    IntegritySummary, Manifest, PackOptions, ResponsibilitySection, VerifyReport, STANDARD_FILES,
};
pub use replay::{replay_transcript, IntegrityStatus, ReplayResult};
