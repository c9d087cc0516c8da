// Path: crates/pact-codec/src/lib.rs
//! Deterministic canonical byte serialization and SHA-256 hashing.
//!
//! This is the lowest layer of the workspace: every other crate hashes
//! envelopes, transcripts, and policies through [`hash`] so that two
//! structurally-equal values always produce bit-identical digests,
//! independent of field declaration order or serializer whitespace.

#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod canonical;
mod error;
mod hash;
mod value;

pub use canonical::canonicalize;
pub use error::{CodecError, ErrorCode};
pub use hash::{hash, sha256_hex};
pub use value::{to_value, Value};

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(serde::Serialize)]
    struct Example {
        zebra: i64,
        apple: String,
    }

    #[test]
    fn canonicalize_is_idempotent() {
        let v = to_value(&Example {
            zebra: 1,
            apple: "x".to_string(),
        })
        .unwrap();
        let once = canonicalize(&v).unwrap();
        let reparsed = value::parse(&once).unwrap();
        let twice = canonicalize(&reparsed).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn canonical_bytes_sort_keys_regardless_of_struct_field_order() {
        let v = to_value(&Example {
            zebra: 1,
            apple: "x".to_string(),
        })
        .unwrap();
        let bytes = canonicalize(&v).unwrap();
        assert_eq!(bytes, br#"{"apple":"x","zebra":1}"#);
    }
}
