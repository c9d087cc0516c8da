// Path: crates/pact-boundary/src/pluggables.rs
//! The four capabilities the boundary's executor composes (spec.md §6): a
//! provider directory, a settlement provider, a wallet adapter, and
//! passport (credit/identity) storage. Each is expressed as a trait the
//! core accepts, never a concrete implementation — HTTP clients, wallet
//! SDKs, and on-chain escrow adapters are external collaborators (spec.md
//! §1 Non-goals) that implement these traits outside this crate.
//!
//! Every capability also ships a null implementation returning
//! `NOT_IMPLEMENTED`, so `run_in_pact_boundary` can be exercised and tested
//! without any real network, wallet, or ledger integration, per the
//! system prompt's "optional dependencies... inject a null implementation"
//! guidance.

use thiserror::Error;

/// Errors a pluggable capability can raise. Distinct from `BoundaryError`:
/// these originate outside the core (network, wallet, ledger) and the
/// boundary runtime turns them into the appropriate `BoundaryAbort` rather
/// than propagating them verbatim.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PluggableError {
    /// The capability has no real implementation wired in (the null variant).
    #[error("NOT_IMPLEMENTED")]
    NotImplemented,

    /// The underlying transport, wallet, or storage call failed.
    #[error("pluggable call failed: {0}")]
    CallFailed(String),
}

/// A counterparty offered by the provider directory for a given intent type.
#[derive(Debug, Clone, PartialEq)]
pub struct Provider {
    pub provider_id: String,
    pub public_key_b58: String,
    pub endpoint: Option<String>,
    pub credentials: serde_json::Value,
    pub baseline_latency_ms: u64,
    pub intent_type: String,
}

/// Resolves candidate counterparties for a negotiation.
pub trait ProviderDirectory {
    fn list_providers(&self, intent_type: &str) -> Result<Vec<Provider>, PluggableError>;
}

/// A provider directory with no real backing source; always reports
/// `NOT_IMPLEMENTED`.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullProviderDirectory;

impl ProviderDirectory for NullProviderDirectory {
    fn list_providers(&self, _intent_type: &str) -> Result<Vec<Provider>, PluggableError> {
        Err(PluggableError::NotImplemented)
    }
}

/// Request to prepare a settlement between a buyer and seller for an amount.
#[derive(Debug, Clone, PartialEq)]
pub struct SettlementPrepareRequest {
    pub intent_id: String,
    pub buyer_id: String,
    pub seller_id: String,
    pub amount: f64,
}

/// An opaque handle returned by `prepare`, polled for settlement status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettlementHandle {
    pub handle_id: String,
}

/// The current state of a prepared settlement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettlementStatus {
    Pending,
    Committed,
    Failed,
}

/// The result of polling a settlement handle.
#[derive(Debug, Clone, PartialEq)]
pub struct SettlementPollResult {
    pub status: SettlementStatus,
    pub paid_amount: Option<f64>,
    pub failure_code: Option<String>,
    pub failure_reason: Option<String>,
}

/// Settles funds for an accepted negotiation; `refund` is optional since not
/// every settlement rail supports reversal.
pub trait SettlementProvider {
    fn prepare(
        &self,
        request: &SettlementPrepareRequest,
    ) -> Result<SettlementHandle, PluggableError>;

    fn poll(&self, handle: &SettlementHandle) -> Result<SettlementPollResult, PluggableError>;

    fn refund(&self, _handle: &SettlementHandle) -> Result<(), PluggableError> {
        Err(PluggableError::NotImplemented)
    }
}

/// A settlement provider with no real rail behind it; always reports
/// `NOT_IMPLEMENTED`.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSettlementProvider;

impl SettlementProvider for NullSettlementProvider {
    fn prepare(
        &self,
        _request: &SettlementPrepareRequest,
    ) -> Result<SettlementHandle, PluggableError> {
        Err(PluggableError::NotImplemented)
    }

    fn poll(&self, _handle: &SettlementHandle) -> Result<SettlementPollResult, PluggableError> {
        Err(PluggableError::NotImplemented)
    }
}

/// A chain-qualified address, e.g. `{chain: "solana", value: "..."}`.
#[derive(Debug, Clone, PartialEq)]
pub struct WalletAddress {
    pub chain: String,
    pub value: String,
}

/// What a wallet adapter can do: sign, and over which chains/assets.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WalletCapabilities {
    pub can_sign: bool,
    pub chains: Vec<String>,
    pub assets: Vec<String>,
}

/// A signature produced by a wallet over some settlement action.
#[derive(Debug, Clone, PartialEq)]
pub struct WalletSignature {
    pub chain: String,
    pub signer: String,
    pub signature: String,
    pub payload_hash: String,
    pub scheme: String,
}

/// Bridges the boundary to an external wallet (Ethers/Solana/MetaMask-style
/// adapters live outside this crate per spec.md §1 Non-goals).
pub trait WalletAdapter {
    fn get_address(&self) -> Result<WalletAddress, PluggableError>;
    fn capabilities(&self) -> Result<WalletCapabilities, PluggableError>;
    fn sign(&self, action: &serde_json::Value) -> Result<WalletSignature, PluggableError>;
}

/// A wallet adapter with no real wallet behind it; always reports
/// `NOT_IMPLEMENTED`.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullWalletAdapter;

impl WalletAdapter for NullWalletAdapter {
    fn get_address(&self) -> Result<WalletAddress, PluggableError> {
        Err(PluggableError::NotImplemented)
    }

    fn capabilities(&self) -> Result<WalletCapabilities, PluggableError> {
        Err(PluggableError::NotImplemented)
    }

    fn sign(&self, _action: &serde_json::Value) -> Result<WalletSignature, PluggableError> {
        Err(PluggableError::NotImplemented)
    }
}

/// Passport (credit/identity) storage. This is exactly the
/// [`pact_policy::CreditStorage`] contract spec.md §6 names separately —
/// exposure lookups and kill-switch event insert/query are the same
/// surface, so the boundary reuses the policy crate's trait rather than
/// duplicating it.
pub use pact_policy::CreditStorage as PassportStorage;

/// Passport storage with no real ledger behind it; every call fails with
/// `NOT_IMPLEMENTED`.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullPassportStorage;

impl PassportStorage for NullPassportStorage {
    fn get_credit_exposure(&self, _agent_id: &str) -> Result<f64, pact_policy::PolicyError> {
        Err(pact_policy::PolicyError::Storage("NOT_IMPLEMENTED".to_string()))
    }

    fn recent_failure_count(
        &self,
        _agent_id: &str,
        _now_ms: u64,
        _lookback_ms: u64,
    ) -> Result<u32, pact_policy::PolicyError> {
        Err(pact_policy::PolicyError::Storage("NOT_IMPLEMENTED".to_string()))
    }

    fn kill_switch_until(&self, _agent_id: &str) -> Result<Option<u64>, pact_policy::PolicyError> {
        Err(pact_policy::PolicyError::Storage("NOT_IMPLEMENTED".to_string()))
    }

    fn set_kill_switch(&self, _agent_id: &str, _until_ms: u64) -> Result<(), pact_policy::PolicyError> {
        Err(pact_policy::PolicyError::Storage("NOT_IMPLEMENTED".to_string()))
    }
}
