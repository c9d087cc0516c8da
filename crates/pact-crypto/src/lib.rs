// Path: crates/pact-crypto/src/lib.rs
//! Ed25519 signing, verification, and base58 identity encoding.
//!
//! Kept deliberately concrete rather than generic over signature schemes:
//! every party identity, envelope signature, and transcript seal in this
//! protocol is Ed25519, so a generic trait hierarchy would add indirection
//! with no second implementation to justify it.

#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod ed25519;
mod error;

pub use ed25519::{Ed25519KeyPair, Ed25519PublicKey, Ed25519Signature};
pub use error::CryptoError;
