// Path: crates/pact-codec/src/hash.rs
//! SHA-256 hashing of canonical bytes, using `dcrypt`.

use crate::canonical::canonicalize;
use crate::error::CodecError;
use crate::value::to_value;
use dcrypt::algorithms::hash::sha2::Sha256 as DcryptSha256;
use dcrypt::algorithms::hash::HashFunction as DcryptHashFunction;
use dcrypt::algorithms::ByteSerializable;

/// Hashes raw bytes with SHA-256, returning the digest as lowercase hex.
pub fn sha256_hex(bytes: &[u8]) -> Result<String, CodecError> {
    let digest = DcryptSha256::digest(bytes)
        .map_err(|e| CodecError::UnsupportedType(format!("sha256: {e}")))?;
    Ok(hex::encode(digest.to_bytes()))
}

/// Canonicalizes a serializable value and returns the hex-encoded SHA-256
/// digest of its canonical byte image. This is the hash used throughout the
/// transcript, envelope, and policy layers: hashing always goes through
/// canonicalization first so two equivalent structures hash identically.
pub fn hash<T: serde::Serialize>(v: &T) -> Result<String, CodecError> {
    let value = to_value(v)?;
    let bytes = canonicalize(&value)?;
    sha256_hex(&bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha256_hex_matches_known_vector() {
        // sha256("") per NIST test vectors.
        assert_eq!(
            sha256_hex(b"").unwrap(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn hash_is_stable_across_field_order() {
        #[derive(serde::Serialize)]
        struct A {
            b: i64,
            a: i64,
        }
        #[derive(serde::Serialize)]
        struct B {
            a: i64,
            b: i64,
        }
        let h1 = hash(&A { b: 2, a: 1 }).unwrap();
        let h2 = hash(&B { a: 1, b: 2 }).unwrap();
        assert_eq!(h1, h2);
    }

    #[test]
    fn hash_changes_with_content() {
        let h1 = hash(&1i64).unwrap();
        let h2 = hash(&2i64).unwrap();
        assert_ne!(h1, h2);
    }
}
