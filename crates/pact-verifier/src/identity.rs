// Path: crates/pact-verifier/src/identity.rs
//! Loads the provider's signing identity per the precedence chain
//! `PACT_PROVIDER_SECRET_KEY_B58` > `PACT_PROVIDER_KEYPAIR_FILE` >
//! `PACT_DEV_IDENTITY_SEED` > fresh random keypair.

use anyhow::{Context, Result};
use pact_crypto::Ed25519KeyPair;
use serde::Deserialize;
use std::path::Path;

#[derive(Deserialize)]
struct KeypairFile {
    #[serde(rename = "secretKeyB58")]
    secret_key_b58: String,
    #[serde(rename = "publicKeyB58")]
    #[allow(dead_code)]
    public_key_b58: Option<String>,
}

/// Loads (or generates) the provider keypair used to sign envelopes and
/// rounds. Falls back through each environment variable in turn, and as
/// a last resort mints a fresh, unrecoverable keypair.
pub fn load_identity() -> Result<Ed25519KeyPair> {
    if let Ok(secret_b58) = std::env::var("PACT_PROVIDER_SECRET_KEY_B58") {
        return Ed25519KeyPair::from_seed_base58(&secret_b58)
            .context("PACT_PROVIDER_SECRET_KEY_B58 is not a valid base58 seed");
    }

    if let Ok(path) = std::env::var("PACT_PROVIDER_KEYPAIR_FILE") {
        let raw = std::fs::read_to_string(Path::new(&path))
            .with_context(|| format!("reading PACT_PROVIDER_KEYPAIR_FILE at {path}"))?;
        let parsed: KeypairFile =
            serde_json::from_str(&raw).context("parsing PACT_PROVIDER_KEYPAIR_FILE as JSON")?;
        return Ed25519KeyPair::from_seed_base58(&parsed.secret_key_b58)
            .context("secretKeyB58 in PACT_PROVIDER_KEYPAIR_FILE is not a valid base58 seed");
    }

    if let Ok(seed_string) = std::env::var("PACT_DEV_IDENTITY_SEED") {
        tracing::warn!(
            "DEV-ONLY identity derived from PACT_DEV_IDENTITY_SEED. \
             Never use this in production; the seed is reproducible from the string alone."
        );
        let digest = pact_codec::sha256_hex(seed_string.as_bytes())
            .context("hashing PACT_DEV_IDENTITY_SEED")?;
        let seed_bytes = hex::decode(&digest).context("decoding dev identity seed digest")?;
        return Ed25519KeyPair::from_seed_bytes(&seed_bytes)
            .context("deriving dev identity keypair from seed");
    }

    Ed25519KeyPair::generate().context("generating a fresh keypair")
}
