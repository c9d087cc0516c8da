// Path: crates/pact-types/src/envelope.rs
//! Signed envelopes: a message plus the identity that sent it and a
//! signature over the message's hash.

use crate::error::TypesError;
use crate::message::Message;
use pact_crypto::{Ed25519KeyPair, Ed25519PublicKey, Ed25519Signature};
use serde::{Deserialize, Serialize};

/// The envelope schema version this crate produces and accepts.
pub const ENVELOPE_VERSION: &str = "pact-envelope/1.0";

/// Default allowed clock skew, in milliseconds, between a message's
/// `sent_at_ms` and its envelope's `signed_at_ms`.
pub const DEFAULT_CLOCK_SKEW_MS: u64 = 5_000;

/// A message, its signer's identity, and a signature over the message hash.
///
/// `envelope_hash` is not a separate field: it is defined to equal
/// `message_hash` by construction (kept distinct conceptually for forward
/// compatibility, per an open question on whether the two should ever
/// diverge), so `envelope_hash()` simply returns `message_hash`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Envelope {
    pub envelope_version: String,
    pub message: Message,
    pub message_hash: String,
    pub signer_public_key_b58: String,
    pub signature_b58: String,
    pub signed_at_ms: u64,
}

impl Envelope {
    /// Equal to `message_hash` by construction.
    pub fn envelope_hash(&self) -> &str {
        &self.message_hash
    }
}

/// Signs `message` with `keypair`, producing a `SignedEnvelope` equal to
/// `Envelope` (there is no distinct unsigned/signed type; signing is what
/// produces an `Envelope` at all).
pub fn sign_envelope(
    message: Message,
    keypair: &Ed25519KeyPair,
    signed_at_ms: u64,
) -> Result<Envelope, TypesError> {
    message.validate()?;
    let message_hash = pact_codec::hash(&message)?;
    let hash_bytes =
        hex::decode(&message_hash).map_err(|e| TypesError::InvalidHash(e.to_string()))?;
    let signature = keypair.sign(&hash_bytes)?;
    Ok(Envelope {
        envelope_version: ENVELOPE_VERSION.to_string(),
        message,
        message_hash,
        signer_public_key_b58: keypair.public_key().to_base58(),
        signature_b58: signature.to_base58(),
        signed_at_ms,
    })
}

/// Verifies an envelope: version, recomputed message hash, signature, and
/// clock skew, using [`DEFAULT_CLOCK_SKEW_MS`].
pub fn parse_envelope(envelope: &Envelope) -> Result<(), TypesError> {
    parse_envelope_with_skew(envelope, DEFAULT_CLOCK_SKEW_MS)
}

/// Verifies an envelope with an explicit allowed clock skew window.
pub fn parse_envelope_with_skew(envelope: &Envelope, skew_ms: u64) -> Result<(), TypesError> {
    if envelope.envelope_version != ENVELOPE_VERSION {
        return Err(TypesError::EnvelopeVersion(
            envelope.envelope_version.clone(),
        ));
    }

    let recomputed = pact_codec::hash(&envelope.message)?;
    if recomputed != envelope.message_hash {
        return Err(TypesError::MessageHashMismatch);
    }

    let public_key = Ed25519PublicKey::from_base58(&envelope.signer_public_key_b58)?;
    let signature = Ed25519Signature::from_base58(&envelope.signature_b58)?;
    let hash_bytes = hex::decode(&envelope.message_hash)
        .map_err(|e| TypesError::InvalidHash(e.to_string()))?;
    public_key
        .verify(&hash_bytes, &signature)
        .map_err(|_| TypesError::SignatureInvalid)?;

    let sent_at_ms = envelope.message.common().sent_at_ms;
    let lower = sent_at_ms.saturating_sub(skew_ms);
    let upper = sent_at_ms.saturating_add(skew_ms);
    if envelope.signed_at_ms < lower || envelope.signed_at_ms > upper {
        return Err(TypesError::ClockSkewExceeded);
    }

    Ok(())
}
