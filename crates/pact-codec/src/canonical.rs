// Path: crates/pact-codec/src/canonical.rs
//! The canonicalization algorithm itself.
//!
//! Every hash, signature, and replay in PACT depends on this function being
//! bit-identical across implementations, so the rules here are applied
//! literally rather than delegated to a general-purpose JSON serializer:
//! sorted keys, no insignificant whitespace, a single committed number
//! format, and hard rejection of non-finite numbers or duplicate keys.

use crate::error::CodecError;
use crate::value::{utf16_key_cmp, Value};

/// Serializes a `Value` to its canonical byte image.
pub fn canonicalize(v: &Value) -> Result<Vec<u8>, CodecError> {
    let mut out = String::new();
    write_value(v, &mut out)?;
    Ok(out.into_bytes())
}

fn write_value(v: &Value, out: &mut String) -> Result<(), CodecError> {
    match v {
        Value::Null => out.push_str("null"),
        Value::Bool(true) => out.push_str("true"),
        Value::Bool(false) => out.push_str("false"),
        Value::Int(i) => out.push_str(&i.to_string()),
        Value::Float(f) => {
            if !f.is_finite() {
                return Err(CodecError::InvalidNumber);
            }
            out.push_str(&format_float(*f));
        }
        Value::String(s) => write_escaped_string(s, out),
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_value(item, out)?;
            }
            out.push(']');
        }
        Value::Object(pairs) => write_object(pairs, out)?,
    }
    Ok(())
}

fn write_object(pairs: &[(String, Value)], out: &mut String) -> Result<(), CodecError> {
    let mut sorted: Vec<&(String, Value)> = pairs.iter().collect();
    sorted.sort_by(|a, b| utf16_key_cmp(&a.0, &b.0));
    for pair in sorted.windows(2) {
        if pair[0].0 == pair[1].0 {
            return Err(CodecError::DuplicateKey(pair[0].0.clone()));
        }
    }
    out.push('{');
    for (i, (k, val)) in sorted.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        write_escaped_string(k, out);
        out.push(':');
        write_value(val, out)?;
    }
    out.push('}');
    Ok(())
}

fn write_escaped_string(s: &str, out: &mut String) {
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\u{8}' => out.push_str("\\b"),
            '\u{c}' => out.push_str("\\f"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => {
                out.push_str(&format!("\\u{:04x}", c as u32));
            }
            c => out.push(c),
        }
    }
    out.push('"');
}

/// Formats a finite, non-integer `f64` in the shortest decimal form that
/// round-trips back to the same bit pattern.
///
/// Uses Rust's native `f64` `Display`, which — like ECMAScript's
/// `Number.prototype.toString` — always produces the shortest decimal
/// string that parses back to the identical value, and never emits
/// scientific notation. Any other implementation of this protocol must
/// match this exact algorithm or hashes will silently diverge.
fn format_float(f: f64) -> String {
    f.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obj(pairs: Vec<(&str, Value)>) -> Value {
        Value::object(pairs.into_iter().map(|(k, v)| (k.to_string(), v)))
    }

    #[test]
    fn sorts_object_keys() {
        let v = obj(vec![("b", Value::Int(1)), ("a", Value::Int(2))]);
        assert_eq!(canonicalize(&v).unwrap(), b"{\"a\":2,\"b\":1}");
    }

    #[test]
    fn rejects_duplicate_keys() {
        let v = obj(vec![("a", Value::Int(1)), ("a", Value::Int(2))]);
        assert!(matches!(canonicalize(&v), Err(CodecError::DuplicateKey(k)) if k == "a"));
    }

    #[test]
    fn rejects_non_finite_floats() {
        assert!(matches!(
            canonicalize(&Value::Float(f64::NAN)),
            Err(CodecError::InvalidNumber)
        ));
        assert!(matches!(
            canonicalize(&Value::Float(f64::INFINITY)),
            Err(CodecError::InvalidNumber)
        ));
    }

    #[test]
    fn integers_have_no_decimal_point() {
        assert_eq!(canonicalize(&Value::Int(5)).unwrap(), b"5");
        assert_eq!(canonicalize(&Value::Int(-5)).unwrap(), b"-5");
    }

    #[test]
    fn floats_use_shortest_round_trip_form() {
        assert_eq!(canonicalize(&Value::Float(0.04)).unwrap(), b"0.04");
        assert_eq!(canonicalize(&Value::Float(0.00008)).unwrap(), b"0.00008");
    }

    #[test]
    fn strings_are_escaped() {
        let v = Value::String("a\"b\\c\nd".to_string());
        assert_eq!(canonicalize(&v).unwrap(), b"\"a\\\"b\\\\c\\nd\"");
    }

    #[test]
    fn non_ascii_strings_stay_raw_utf8() {
        let v = Value::String("héllo".to_string());
        assert_eq!(canonicalize(&v).unwrap(), "\"héllo\"".as_bytes());
    }

    #[test]
    fn no_insignificant_whitespace() {
        let v = obj(vec![("x", Value::Array(vec![Value::Int(1), Value::Int(2)]))]);
        let bytes = canonicalize(&v).unwrap();
        assert!(!bytes.iter().any(|b| b.is_ascii_whitespace()));
    }

    #[test]
    fn key_order_uses_utf16_code_units() {
        // U+FFFF (BMP, encodes to a single UTF-16 unit 0xFFFF) must sort
        // before U+10000 (supplementary plane, encodes as the surrogate
        // pair 0xD800 0xDC00) under UTF-16 code-unit order, even though
        // U+10000 is the larger Unicode scalar value.
        let bmp_max = "\u{ffff}";
        let supplementary = "\u{10000}";
        assert_eq!(
            utf16_key_cmp(supplementary, bmp_max),
            std::cmp::Ordering::Less
        );
    }
}
