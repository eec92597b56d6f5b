//! # BN254 Scalar Field Helpers
//!
//! Every hash and signature in a POD lives in the scalar field of the BN254
//! curve. Public APIs carry field elements as [`BigUint`] (the natural
//! big-integer representation for JSON and circuit inputs); arithmetic is
//! done on [`Fr`] from `ark-bn254`.
//!
//! ## Security Invariant
//!
//! [`fr_from_biguint`] refuses values `>= p` rather than reducing them, so a
//! caller-supplied integer can never silently alias another field element.

use std::sync::OnceLock;

use ark_ff::PrimeField;
use num_bigint::BigUint;

use crate::error::CryptoError;

pub use ark_bn254::Fr;

/// The BN254 scalar field modulus `p`.
pub fn field_modulus() -> &'static BigUint {
    static MODULUS: OnceLock<BigUint> = OnceLock::new();
    MODULUS.get_or_init(|| BigUint::from(Fr::MODULUS))
}

/// Returns true if `value` is a canonical field element (`value < p`).
pub fn is_field_element(value: &BigUint) -> bool {
    value < field_modulus()
}

/// Convert a canonical integer into a field element.
pub fn fr_from_biguint(value: &BigUint) -> Result<Fr, CryptoError> {
    if !is_field_element(value) {
        return Err(CryptoError::FieldOverflow(format!(
            "{value} is not less than the BN254 scalar field modulus"
        )));
    }
    Ok(Fr::from(value.clone()))
}

/// Convert a field element to its canonical integer.
pub fn fr_to_biguint(value: Fr) -> BigUint {
    BigUint::from(value)
}

/// Field encoding of a signed 64-bit integer: `n` for `n >= 0`, `p + n`
/// otherwise.
pub fn field_encode_i64(value: i64) -> BigUint {
    fr_to_biguint(Fr::from(value))
}

/// Parse a strict decimal string (ASCII digits only, no sign, no separators).
pub fn parse_decimal(text: &str) -> Option<BigUint> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    BigUint::parse_bytes(text.as_bytes(), 10)
}

/// Serde adapter: a field element as a decimal string.
pub mod decimal {
    use num_bigint::BigUint;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &BigUint, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<BigUint, D::Error> {
        let text = String::deserialize(deserializer)?;
        super::parse_decimal(&text)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid decimal integer {text:?}")))
    }
}

/// Serde adapter: an optional field element as a decimal string.
///
/// Pair with `#[serde(default, skip_serializing_if = "Option::is_none")]`.
pub mod decimal_option {
    use num_bigint::BigUint;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        value: &Option<BigUint>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(value) => super::decimal::serialize(value, serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<BigUint>, D::Error> {
        Option::<String>::deserialize(deserializer)?
            .map(|text| {
                super::parse_decimal(&text).ok_or_else(|| {
                    serde::de::Error::custom(format!("invalid decimal integer {text:?}"))
                })
            })
            .transpose()
    }
}

/// Serde adapter: a list of field elements as decimal strings.
pub mod decimal_vec {
    use num_bigint::BigUint;
    use serde::ser::SerializeSeq;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(values: &[BigUint], serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(values.len()))?;
        for value in values {
            seq.serialize_element(&value.to_string())?;
        }
        seq.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<BigUint>, D::Error> {
        let texts = Vec::<String>::deserialize(deserializer)?;
        texts
            .iter()
            .map(|text| {
                super::parse_decimal(text).ok_or_else(|| {
                    serde::de::Error::custom(format!("invalid decimal integer {text:?}"))
                })
            })
            .collect()
    }
}
