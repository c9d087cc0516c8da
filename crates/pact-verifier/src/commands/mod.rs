// Path: crates/pact-verifier/src/commands/mod.rs
pub mod auditor_pack;
pub mod auditor_pack_verify;
pub mod contention_scan;
pub mod gc_view;
pub mod insurer_summary;
pub mod judge_v4;
pub mod passport_v1_recompute;
