// Path: crates/pact-boundary/src/lib.rs
//! The Pact Boundary: the mandatory execution envelope every spending
//! action runs inside. Seeds a transcript, hands the executor a mutable
//! context, then re-checks policy, velocity, and credit before admitting
//! success — failing any stage seals the transcript with a `failure_event`
//! instead of propagating an error to the caller.

#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod clock;
mod error;
mod failure_code;
mod pluggables;
mod runtime;

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{BoundaryAbort, BoundaryError};
pub use failure_code::{lookup as lookup_failure_code, CodeInfo};
pub use pluggables::{
    NullPassportStorage, NullProviderDirectory, NullSettlementProvider, NullWalletAdapter,
    PassportStorage, PluggableError, Provider, ProviderDirectory, SettlementHandle,
    SettlementPollResult, SettlementPrepareRequest, SettlementProvider, SettlementStatus,
    WalletAddress, WalletAdapter, WalletCapabilities, WalletSignature,
};
pub use runtime::{
    run_in_pact_boundary, BoundaryIntent, BoundaryOptions, BoundaryResult, ExecutionContext,
    ExecutorOutcome,
};
