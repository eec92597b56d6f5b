//! # Lossless JSON Serialization
//!
//! Entries serialize as a JSON object keyed by name, each value an object
//! `{"type": <tag>, "value": <payload>}`:
//!
//! ```json
//! { "A": { "type": "int", "value": "123" },
//!   "s": { "type": "string", "value": "hello" } }
//! ```
//!
//! `int` and `cryptographic` payloads are emitted as decimal strings, never
//! as JSON numbers, so no value passes through a float. On input an exact
//! JSON integer is also accepted. `eddsa_pubkey` payloads are emitted as
//! unpadded Base64 and accepted as hex or Base64.
//!
//! Parsing runs every entry through [`check_value`], so anything that
//! deserializes is valid content.

use num_bigint::{BigInt, Sign};
use pod_crypto::field::parse_decimal;
use serde_json::{Map, Value};

use crate::error::PodError;
use crate::name::PodName;
use crate::value::{check_value, PodValue, PodValueType};
use crate::PodEntries;

/// Serialize entries to a compact JSON string with keys in name order.
pub fn serialize_entries<'a>(entries: impl IntoIterator<Item = (&'a PodName, &'a PodValue)>) -> String {
    entries_to_json(entries).to_string()
}

/// Parse entries from a JSON string.
pub fn deserialize_entries(json: &str) -> Result<PodEntries, PodError> {
    let doc: Value = serde_json::from_str(json)
        .map_err(|e| PodError::Type(format!("invalid JSON: {e}")))?;
    entries_from_json(&doc)
}

/// Build the JSON object for a set of entries.
pub fn entries_to_json<'a>(entries: impl IntoIterator<Item = (&'a PodName, &'a PodValue)>) -> Value {
    let map: Map<String, Value> = entries
        .into_iter()
        .map(|(name, value)| (name.to_string(), value_to_json(value)))
        .collect();
    Value::Object(map)
}

/// Parse and validate a JSON entries object.
pub fn entries_from_json(doc: &Value) -> Result<PodEntries, PodError> {
    let object = doc
        .as_object()
        .ok_or_else(|| PodError::Type(format!("entries must be a JSON object, got {}", kind_of(doc))))?;

    let mut entries = PodEntries::new();
    for (name, raw) in object {
        let name = PodName::new(name.as_str())?;
        let value = value_from_json(name.as_str(), raw)?;
        check_value(name.as_str(), &value)?;
        entries.insert(name, value);
    }
    Ok(entries)
}

/// The `{"type", "value"}` object for one value.
pub fn value_to_json(value: &PodValue) -> Value {
    let payload = match value {
        PodValue::String(s) => Value::String(s.clone()),
        PodValue::Int(n) => Value::String(n.to_string()),
        PodValue::Cryptographic(n) => Value::String(n.to_string()),
        PodValue::EdDsaPubkey(key) => Value::String(key.to_base64()),
    };
    let mut object = Map::new();
    object.insert("type".to_string(), Value::String(value.value_type().to_string()));
    object.insert("value".to_string(), payload);
    Value::Object(object)
}

/// Parse one `{"type", "value"}` object for the entry called `name`.
pub fn value_from_json(name: &str, raw: &Value) -> Result<PodValue, PodError> {
    let type_error = |msg: String| PodError::Type(format!("entry {name}: {msg}"));

    let object = raw
        .as_object()
        .ok_or_else(|| type_error(format!("value must be an object, got {}", kind_of(raw))))?;
    if let Some(extra) = object.keys().find(|k| *k != "type" && *k != "value") {
        return Err(type_error(format!("unexpected field {extra:?}")));
    }
    let tag = object
        .get("type")
        .and_then(Value::as_str)
        .ok_or_else(|| type_error("missing string field \"type\"".to_string()))?;
    let payload = object
        .get("value")
        .ok_or_else(|| type_error("missing field \"value\"".to_string()))?;

    let value_type: PodValueType = tag.parse().map_err(|e: PodError| match e {
        PodError::Type(msg) => type_error(msg),
        other => other,
    })?;

    match value_type {
        PodValueType::String => payload
            .as_str()
            .map(|s| PodValue::String(s.to_string()))
            .ok_or_else(|| type_error(format!("string value must be text, got {}", kind_of(payload)))),
        PodValueType::Int => {
            let n = parse_integer(payload).map_err(type_error)?;
            PodValue::int_from_bigint(&n).map_err(|e| in_entry(name, e))
        }
        PodValueType::Cryptographic => {
            let n = parse_integer(payload).map_err(type_error)?;
            PodValue::cryptographic_from_bigint(&n).map_err(|e| in_entry(name, e))
        }
        PodValueType::EdDsaPubkey => {
            let text = payload.as_str().ok_or_else(|| {
                type_error(format!("eddsa_pubkey value must be text, got {}", kind_of(payload)))
            })?;
            PodValue::eddsa_pubkey_from_text(text).map_err(|e| in_entry(name, e))
        }
    }
}

// Decimal string with optional leading '-', or an exact JSON integer.
fn parse_integer(payload: &Value) -> Result<BigInt, String> {
    match payload {
        Value::String(text) => {
            let (sign, digits) = match text.strip_prefix('-') {
                Some(rest) => (Sign::Minus, rest),
                None => (Sign::Plus, text.as_str()),
            };
            parse_decimal(digits)
                .map(|magnitude| BigInt::from_biguint(sign, magnitude))
                .ok_or_else(|| format!("{text:?} is not a decimal integer"))
        }
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(BigInt::from(i))
            } else if let Some(u) = n.as_u64() {
                Ok(BigInt::from(u))
            } else {
                Err(format!("{n} is not an exact integer"))
            }
        }
        other => Err(format!("numeric value must be a string or integer, got {}", kind_of(other))),
    }
}

fn in_entry(name: &str, err: PodError) -> PodError {
    match err {
        PodError::Type(msg) => PodError::Type(format!("entry {name}: {msg}")),
        PodError::Range(msg) => PodError::Range(format!("entry {name}: {msg}")),
        other => other,
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use num_bigint::BigUint;
    use pod_crypto::field::field_modulus;
    use pod_crypto::PrivateKey;
    use serde_json::json;

    fn parse(doc: Value) -> Result<PodEntries, PodError> {
        entries_from_json(&doc)
    }

    #[test]
    fn test_numbers_emitted_as_strings() {
        let mut entries = PodEntries::new();
        entries.insert(PodName::new("A").unwrap(), PodValue::Int(123));
        entries.insert(
            PodName::new("k").unwrap(),
            PodValue::Cryptographic(field_modulus() - 1u32),
        );
        let doc = entries_to_json(&entries);
        assert_eq!(doc["A"], json!({"type": "int", "value": "123"}));
        assert_eq!(doc["k"]["value"], (field_modulus() - 1u32).to_string());
    }

    #[test]
    fn test_extreme_values_roundtrip() {
        let mut entries = PodEntries::new();
        entries.insert(PodName::new("max").unwrap(), PodValue::Int(i64::MAX));
        entries.insert(PodName::new("min").unwrap(), PodValue::Int(i64::MIN));
        entries.insert(
            PodName::new("top").unwrap(),
            PodValue::Cryptographic(field_modulus() - 1u32),
        );
        entries.insert(PodName::new("empty").unwrap(), PodValue::from(""));
        let back = deserialize_entries(&serialize_entries(&entries)).unwrap();
        assert_eq!(back, entries);
    }

    #[test]
    fn test_keys_emitted_in_name_order() {
        let mut entries = PodEntries::new();
        for name in ["b", "A", "_z", "a"] {
            entries.insert(PodName::new(name).unwrap(), PodValue::Int(0));
        }
        let json = serialize_entries(&entries);
        let positions: Vec<usize> = ["\"A\"", "\"_z\"", "\"a\"", "\"b\""]
            .iter()
            .map(|k| json.find(k).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "{json}");
    }

    #[test]
    fn test_exact_json_integers_accepted() {
        let entries = parse(json!({
            "a": {"type": "int", "value": -5},
            "b": {"type": "cryptographic", "value": 18446744073709551615u64},
        }))
        .unwrap();
        assert_eq!(entries["a"], PodValue::Int(-5));
        assert_eq!(
            entries["b"],
            PodValue::Cryptographic(BigUint::from(u64::MAX))
        );
    }

    #[test]
    fn test_unknown_type_is_type_error() {
        let err = parse(json!({"a": {"type": "unknown", "value": "1"}})).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Type);
        assert!(err.to_string().contains("entry a"));
    }

    #[test]
    fn test_int_overflow_is_range_error() {
        let err = parse(json!({"a": {"type": "int", "value": "9223372036854775808"}})).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Range);
        let err = parse(json!({"a": {"type": "int", "value": "-9223372036854775809"}})).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Range);
    }

    #[test]
    fn test_cryptographic_out_of_range() {
        let p = field_modulus().to_string();
        let err = parse(json!({"a": {"type": "cryptographic", "value": p}})).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Range);
        let err = parse(json!({"a": {"type": "cryptographic", "value": "-1"}})).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Range);
    }

    #[test]
    fn test_malformed_shapes_are_type_errors() {
        let cases = [
            json!([]),
            json!("entries"),
            json!({"a": 5}),
            json!({"a": {"type": "int"}}),
            json!({"a": {"value": "1"}}),
            json!({"a": {"type": "int", "value": "1", "extra": true}}),
            json!({"a": {"type": "int", "value": 1.5}}),
            json!({"a": {"type": "int", "value": true}}),
            json!({"a": {"type": "int", "value": null}}),
            json!({"a": {"type": "int", "value": "12abc"}}),
            json!({"a": {"type": "string", "value": 12}}),
            json!({"a": {"type": "eddsa_pubkey", "value": "not a key"}}),
            json!({"bad name": {"type": "int", "value": "1"}}),
        ];
        for doc in cases {
            let err = parse(doc.clone()).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Type, "{doc}");
        }
    }

    #[test]
    fn test_invalid_json_is_type_error() {
        let err = deserialize_entries("{not json").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Type);
    }

    #[test]
    fn test_pubkey_accepts_hex_emits_base64() {
        let key = PrivateKey::from_bytes([3; 32]).public_key();
        let entries = parse(json!({
            "owner": {"type": "eddsa_pubkey", "value": hex::encode(key.as_bytes())}
        }))
        .unwrap();
        let doc = entries_to_json(&entries);
        assert_eq!(doc["owner"]["value"], key.to_base64());
    }

    #[test]
    fn test_pubkey_with_signed_zero_x_is_rejected() {
        // The identity point (y = 1) has x = 0, so only the clear sign bit is canonical.
        let canonical = format!("01{}", "00".repeat(31));
        let signed = format!("01{}80", "00".repeat(30));
        assert!(parse(json!({"k": {"type": "eddsa_pubkey", "value": canonical}})).is_ok());
        let err = parse(json!({"k": {"type": "eddsa_pubkey", "value": signed}})).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Type);
    }
}
