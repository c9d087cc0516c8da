// Path: crates/pact-crypto/src/ed25519.rs
//! Ed25519 keypair generation, signing, and verification, with base58
//! encoding for the wire/human-facing key and signature representation.

use crate::error::CryptoError;
use dcrypt::sign::eddsa;
use rand::rngs::OsRng;
use zeroize::Zeroize;

/// An Ed25519 keypair capable of signing messages.
///
/// The secret key's seed bytes are zeroized on drop; nothing in this crate
/// ever logs or `Display`s private key material.
pub struct Ed25519KeyPair {
    public_key: eddsa::Ed25519PublicKey,
    secret_key: eddsa::Ed25519SecretKey,
}

/// An Ed25519 public key, used to verify signatures and to identify a party.
#[derive(Clone, PartialEq, Eq)]
pub struct Ed25519PublicKey(eddsa::Ed25519PublicKey);

/// An Ed25519 signature over some message.
#[derive(Clone, PartialEq, Eq)]
pub struct Ed25519Signature(eddsa::Ed25519Signature);

impl Ed25519KeyPair {
    /// Generates a fresh keypair from the OS random number generator.
    pub fn generate() -> Result<Self, CryptoError> {
        let mut rng = OsRng;
        let (public_key, secret_key) = eddsa::Ed25519::keypair(&mut rng)
            .map_err(|e| CryptoError::InvalidKey(format!("keypair generation failed: {e}")))?;
        Ok(Self {
            public_key,
            secret_key,
        })
    }

    /// Reconstructs a keypair from a 32-byte seed.
    pub fn from_seed_bytes(seed: &[u8]) -> Result<Self, CryptoError> {
        if seed.len() != 32 {
            return Err(CryptoError::InvalidKey(
                "seed must be exactly 32 bytes".to_string(),
            ));
        }
        let mut buf = [0u8; 32];
        buf.copy_from_slice(seed);
        let secret_key = eddsa::Ed25519SecretKey::from_seed(&buf).map_err(|e| {
            CryptoError::InvalidKey(format!("failed to derive key from seed: {e}"))
        })?;
        buf.zeroize();
        let public_key = secret_key
            .public_key()
            .map_err(|e| CryptoError::InvalidKey(format!("failed to derive public key: {e}")))?;
        Ok(Self {
            public_key,
            secret_key,
        })
    }

    /// Reconstructs a keypair from a base58-encoded 32-byte seed.
    pub fn from_seed_base58(seed_b58: &str) -> Result<Self, CryptoError> {
        let bytes = bs58::decode(seed_b58)
            .into_vec()
            .map_err(|e| CryptoError::InvalidEncoding(e.to_string()))?;
        Self::from_seed_bytes(&bytes)
    }

    /// This keypair's public key.
    pub fn public_key(&self) -> Ed25519PublicKey {
        Ed25519PublicKey(self.public_key.clone())
    }

    /// Signs a message, producing a detached signature.
    pub fn sign(&self, message: &[u8]) -> Result<Ed25519Signature, CryptoError> {
        let signature = eddsa::Ed25519::sign(message, &self.secret_key)
            .map_err(|e| CryptoError::InvalidSignature(format!("signing failed: {e}")))?;
        Ok(Ed25519Signature(signature))
    }
}

impl Ed25519PublicKey {
    /// Verifies a signature over a message against this public key.
    pub fn verify(&self, message: &[u8], signature: &Ed25519Signature) -> Result<(), CryptoError> {
        eddsa::Ed25519::verify(message, &signature.0, &self.0)
            .map_err(|_| CryptoError::VerificationFailed)
    }

    /// Returns the raw 32-byte public key.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.0.to_bytes().to_vec()
    }

    /// Parses a public key from raw bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        eddsa::Ed25519PublicKey::from_bytes(bytes)
            .map(Ed25519PublicKey)
            .map_err(|e| CryptoError::InvalidKey(format!("failed to parse public key: {e}")))
    }

    /// Encodes this public key as base58, the wire representation used in
    /// every party identifier and signature block.
    pub fn to_base58(&self) -> String {
        bs58::encode(self.to_bytes()).into_string()
    }

    /// Decodes a base58-encoded public key.
    pub fn from_base58(s: &str) -> Result<Self, CryptoError> {
        let bytes = bs58::decode(s)
            .into_vec()
            .map_err(|e| CryptoError::InvalidEncoding(e.to_string()))?;
        Self::from_bytes(&bytes)
    }
}

impl Ed25519Signature {
    /// Returns the raw signature bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.0.to_bytes().to_vec()
    }

    /// Parses a signature from raw bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        eddsa::Ed25519Signature::from_bytes(bytes)
            .map(Ed25519Signature)
            .map_err(|e| CryptoError::InvalidSignature(format!("failed to parse signature: {e}")))
    }

    /// Encodes this signature as base58, the representation carried in a
    /// signed envelope's signature block.
    pub fn to_base58(&self) -> String {
        bs58::encode(self.to_bytes()).into_string()
    }

    /// Decodes a base58-encoded signature.
    pub fn from_base58(s: &str) -> Result<Self, CryptoError> {
        let bytes = bs58::decode(s)
            .into_vec()
            .map_err(|e| CryptoError::InvalidEncoding(e.to_string()))?;
        Self::from_bytes(&bytes)
    }
}
