// Path: crates/pact-transcript/src/hashing.rs
//! Helper for the "hash of X without field Y" computations spec.md names
//! throughout §3 and §4.4 (`round_hash`, `final_hash`,
//! `failure_event.transcript_hash`).
//!
//! These are not simply `hash` of the struct with the excluded field set to
//! `None`: canonicalization distinguishes an absent key from a key present
//! with a JSON `null` value, and the spec means "absent". So this serializes
//! through `serde_json` first, deletes the named keys from the resulting
//! object, and only then canonicalizes.

use pact_codec::{CodecError, Value};

/// Hashes `value` after removing `exclude` keys from its top-level JSON
/// object representation.
pub fn hash_excluding<T: serde::Serialize>(
    value: &T,
    exclude: &[&str],
) -> Result<String, CodecError> {
    let mut json = serde_json::to_value(value)
        .map_err(|e| CodecError::UnsupportedType(format!("serde_json: {e}")))?;
    if let serde_json::Value::Object(map) = &mut json {
        for key in exclude {
            map.remove(*key);
        }
    }
    let domain_value = Value::try_from(json)?;
    let bytes = pact_codec::canonicalize(&domain_value)?;
    pact_codec::sha256_hex(&bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(serde::Serialize)]
    struct Example {
        a: i64,
        b: Option<i64>,
    }

    #[test]
    fn excluded_key_is_absent_not_null() {
        let with_none = hash_excluding(&Example { a: 1, b: None }, &["b"]).unwrap();
        let without_b_field = pact_codec::hash(&serde_json::json!({"a": 1})).unwrap();
        assert_eq!(with_none, without_b_field);
    }

    #[test]
    fn excluding_a_present_value_drops_it_entirely() {
        let h = hash_excluding(&Example { a: 1, b: Some(9) }, &["b"]).unwrap();
        let expected = pact_codec::hash(&serde_json::json!({"a": 1})).unwrap();
        assert_eq!(h, expected);
    }
}
