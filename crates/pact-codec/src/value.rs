// Path: crates/pact-codec/src/value.rs
//! The JSON-domain value type that canonicalization operates over.
//!
//! `Value` is deliberately a plain recursive enum rather than a re-export of
//! `serde_json::Value`: canonicalization must reject duplicate mapping keys,
//! something `serde_json::Map` already collapses away before we would ever
//! see it. Keeping our own `Object` variant as an ordered list of pairs lets
//! `canonicalize` detect the violation instead of silently losing data.

use crate::error::CodecError;
use std::cmp::Ordering;

/// A value in the canonicalization domain: null, bool, integer, finite
/// number, string, ordered sequence, or mapping.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// JSON `null`.
    Null,
    /// JSON `true`/`false`.
    Bool(bool),
    /// An integer-valued number, emitted without a decimal point.
    Int(i64),
    /// A non-integer finite number.
    Float(f64),
    /// A UTF-8 string.
    String(String),
    /// An ordered sequence; order is preserved, never sorted.
    Array(Vec<Value>),
    /// A mapping from string keys to values. Stored as pairs in the order
    /// they were built; `canonicalize` sorts and rejects duplicates.
    Object(Vec<(String, Value)>),
}

impl Value {
    /// Builds an `Object` from pairs, intended for tests and call sites that
    /// construct a `Value` directly rather than via `Serialize`.
    pub fn object<I: IntoIterator<Item = (String, Value)>>(pairs: I) -> Value {
        Value::Object(pairs.into_iter().collect())
    }
}

/// Converts any `Serialize` value into the canonicalization domain by first
/// routing it through `serde_json`, matching the teacher's
/// `SemanticFirewall::canonicalize` pattern of parsing to `serde_json::Value`
/// before re-serializing canonically.
pub fn to_value<T: serde::Serialize>(v: &T) -> Result<Value, CodecError> {
    let json = serde_json::to_value(v)
        .map_err(|e| CodecError::UnsupportedType(format!("serde_json: {e}")))?;
    Value::try_from(json)
}

/// Parses canonical (or any valid) JSON bytes back into the canonicalization
/// domain. Canonical bytes are always valid JSON, so a standard JSON parser
/// round-trips them; this backs the idempotence property under test.
pub fn parse(bytes: &[u8]) -> Result<Value, CodecError> {
    let json: serde_json::Value = serde_json::from_slice(bytes)
        .map_err(|e| CodecError::UnsupportedType(format!("invalid json: {e}")))?;
    Value::try_from(json)
}

impl TryFrom<serde_json::Value> for Value {
    type Error = CodecError;

    fn try_from(v: serde_json::Value) -> Result<Self, Self::Error> {
        Ok(match v {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else if let Some(u) = n.as_u64() {
                    i64::try_from(u)
                        .map(Value::Int)
                        .map_err(|_| CodecError::UnsupportedType(format!("integer out of range: {u}")))?
                } else {
                    let f = n
                        .as_f64()
                        .ok_or_else(|| CodecError::UnsupportedType("unrepresentable number".into()))?;
                    if !f.is_finite() {
                        return Err(CodecError::InvalidNumber);
                    }
                    Value::Float(f)
                }
            }
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                let mut out = Vec::with_capacity(items.len());
                for item in items {
                    out.push(Value::try_from(item)?);
                }
                Value::Array(out)
            }
            serde_json::Value::Object(map) => {
                let mut out = Vec::with_capacity(map.len());
                for (k, v) in map {
                    out.push((k, Value::try_from(v)?));
                }
                Value::Object(out)
            }
        })
    }
}

/// Compares two strings by UTF-16 code unit, as required for canonical key
/// ordering. Rust's native `Ord` for `str` compares by Unicode
/// scalar value, which disagrees with UTF-16 code-unit order for characters
/// outside the Basic Multilingual Plane (supplementary-plane code points
/// encode as surrogate pairs in the D800-DFFF range, which sorts *before*
/// U+E000-U+FFFF in UTF-16 but *after* it as a scalar value).
pub(crate) fn utf16_key_cmp(a: &str, b: &str) -> Ordering {
    a.encode_utf16().cmp(b.encode_utf16())
}
