// Path: crates/pact-boundary/src/clock.rs
//! A `Clock` seam so the boundary runtime never reads the OS clock directly.
//!
//! Mirrors the teacher's `TxContext` pattern of passing `block_timestamp` in
//! rather than calling out to wall-clock time from inside core logic: tests
//! need fixed times to exercise timestamp-monotonicity and SLA (PACT-404)
//! behavior without depending on real elapsed time.

use std::time::{SystemTime, UNIX_EPOCH};

/// Supplies the current wall-clock time in milliseconds since the Unix epoch.
pub trait Clock: Send + Sync {
    fn now_ms(&self) -> u64;
}

/// The production clock, backed by [`SystemTime::now`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }
}

/// A clock that always returns a fixed instant, used in tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub u64);

impl Clock for FixedClock {
    fn now_ms(&self) -> u64 {
        self.0
    }
}
