//! # Typed Values
//!
//! A POD entry holds exactly one of four value types. The type tag travels
//! with the value through hashing, serialization and proofs; there is no
//! implicit coercion between types, so `string "123"` and `int 123` hash
//! differently.
//!
//! | Tag | Rust payload | Constraint |
//! |---|---|---|
//! | `string` | `String` | any UTF-8 |
//! | `int` | `i64` | the signed 64-bit range |
//! | `cryptographic` | `BigUint` | `0 <= v < p` |
//! | `eddsa_pubkey` | `PublicKey` | a packed Baby Jubjub point |

use num_bigint::{BigInt, BigUint};
use pod_crypto::field::{field_encode_i64, is_field_element};
use pod_crypto::PublicKey;
use serde::{Serialize, Serializer};

use crate::error::PodError;
use crate::name::PodName;

/// A typed POD value.
///
/// Equality is tag equality plus the natural equality of the payload:
/// numeric for `int`/`cryptographic`, byte equality for keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PodValue {
    /// Arbitrary UTF-8 text.
    String(String),
    /// A signed 64-bit integer.
    Int(i64),
    /// A BN254 scalar field element.
    Cryptographic(BigUint),
    /// A packed EdDSA-Poseidon public key.
    EdDsaPubkey(PublicKey),
}

/// The type tag of a [`PodValue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PodValueType {
    /// `"string"`
    String,
    /// `"int"`
    Int,
    /// `"cryptographic"`
    Cryptographic,
    /// `"eddsa_pubkey"`
    EdDsaPubkey,
}

/// A value with its type tag stripped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PodRawValue {
    /// `string` values and keys (canonical Base64).
    Text(String),
    /// `int` and `cryptographic` values.
    Number(BigInt),
}

// ---------------------------------------------------------------------------
// PodValueType
// ---------------------------------------------------------------------------

impl PodValueType {
    /// The wire tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Int => "int",
            Self::Cryptographic => "cryptographic",
            Self::EdDsaPubkey => "eddsa_pubkey",
        }
    }
}

impl std::str::FromStr for PodValueType {
    type Err = PodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "string" => Ok(Self::String),
            "int" => Ok(Self::Int),
            "cryptographic" => Ok(Self::Cryptographic),
            "eddsa_pubkey" => Ok(Self::EdDsaPubkey),
            other => Err(PodError::Type(format!("unknown value type {other:?}"))),
        }
    }
}

impl std::fmt::Display for PodValueType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// PodValue
// ---------------------------------------------------------------------------

impl PodValue {
    /// The value's type tag.
    pub fn value_type(&self) -> PodValueType {
        match self {
            Self::String(_) => PodValueType::String,
            Self::Int(_) => PodValueType::Int,
            Self::Cryptographic(_) => PodValueType::Cryptographic,
            Self::EdDsaPubkey(_) => PodValueType::EdDsaPubkey,
        }
    }

    /// An `int` value from an arbitrary-precision integer.
    pub fn int_from_bigint(value: &BigInt) -> Result<Self, PodError> {
        i64::try_from(value)
            .map(Self::Int)
            .map_err(|_| PodError::Range(format!("int value {value} is outside the 64-bit range")))
    }

    /// A `cryptographic` value from an arbitrary-precision integer.
    pub fn cryptographic_from_bigint(value: &BigInt) -> Result<Self, PodError> {
        let magnitude = value.to_biguint().ok_or_else(|| {
            PodError::Range(format!("cryptographic value {value} is negative"))
        })?;
        if !is_field_element(&magnitude) {
            return Err(PodError::Range(format!(
                "cryptographic value {value} is not less than the field modulus"
            )));
        }
        Ok(Self::Cryptographic(magnitude))
    }

    /// An `eddsa_pubkey` value from hex or Base64 text.
    pub fn eddsa_pubkey_from_text(text: &str) -> Result<Self, PodError> {
        Ok(Self::EdDsaPubkey(PublicKey::from_text(text)?))
    }

    /// The payload without its type tag.
    pub fn raw_value(&self) -> PodRawValue {
        match self {
            Self::String(s) => PodRawValue::Text(s.clone()),
            Self::Int(n) => PodRawValue::Number(BigInt::from(*n)),
            Self::Cryptographic(n) => PodRawValue::Number(BigInt::from(n.clone())),
            Self::EdDsaPubkey(key) => PodRawValue::Text(key.to_base64()),
        }
    }

    /// The value as a numeric circuit signal, if it has one.
    ///
    /// `int` yields its field encoding (`p + n` for negatives),
    /// `cryptographic` yields itself. Text-like types have none.
    pub fn circuit_signal(&self) -> Option<BigUint> {
        match self {
            Self::Int(n) => Some(field_encode_i64(*n)),
            Self::Cryptographic(n) => Some(n.clone()),
            Self::String(_) | Self::EdDsaPubkey(_) => None,
        }
    }
}

impl From<String> for PodValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<&str> for PodValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<i64> for PodValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<PublicKey> for PodValue {
    fn from(value: PublicKey) -> Self {
        Self::EdDsaPubkey(value)
    }
}

impl std::fmt::Display for PodValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::String(s) => write!(f, "{s:?}"),
            Self::Int(n) => write!(f, "{n}"),
            Self::Cryptographic(n) => write!(f, "{n}"),
            Self::EdDsaPubkey(key) => write!(f, "{key}"),
        }
    }
}

// ---------------------------------------------------------------------------
// PodRawValue
// ---------------------------------------------------------------------------

impl std::fmt::Display for PodRawValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Number(n) => write!(f, "{n}"),
        }
    }
}

/// Numbers serialize as decimal strings.
impl Serialize for PodRawValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Text(s) => serializer.serialize_str(s),
            Self::Number(n) => serializer.serialize_str(&n.to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate an entry before it enters a `PodContent`.
///
/// Checks the name charset and the value's range. `int` and `eddsa_pubkey`
/// payloads are valid by construction of their Rust types.
pub fn check_value(name: &str, value: &PodValue) -> Result<(), PodError> {
    PodName::validate(name)?;
    if let PodValue::Cryptographic(n) = value {
        if !is_field_element(n) {
            return Err(PodError::Range(format!(
                "entry {name}: cryptographic value is not less than the field modulus"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pod_crypto::field_modulus;
    use pod_crypto::PrivateKey;

    #[test]
    fn test_tags_roundtrip_through_text() {
        for t in [
            PodValueType::String,
            PodValueType::Int,
            PodValueType::Cryptographic,
            PodValueType::EdDsaPubkey,
        ] {
            assert_eq!(t.as_str().parse::<PodValueType>().unwrap(), t);
        }
        let err = "unknown".parse::<PodValueType>().unwrap_err();
        assert!(matches!(err, PodError::Type(_)));
    }

    #[test]
    fn test_int_range() {
        let max = BigInt::from(i64::MAX);
        let min = BigInt::from(i64::MIN);
        assert_eq!(PodValue::int_from_bigint(&max).unwrap(), PodValue::Int(i64::MAX));
        assert_eq!(PodValue::int_from_bigint(&min).unwrap(), PodValue::Int(i64::MIN));
        let err = PodValue::int_from_bigint(&(max + 1)).unwrap_err();
        assert!(matches!(err, PodError::Range(_)));
        let err = PodValue::int_from_bigint(&(min - 1)).unwrap_err();
        assert!(matches!(err, PodError::Range(_)));
    }

    #[test]
    fn test_cryptographic_range() {
        let p = BigInt::from(field_modulus().clone());
        assert!(PodValue::cryptographic_from_bigint(&(p.clone() - 1)).is_ok());
        assert!(PodValue::cryptographic_from_bigint(&BigInt::from(0)).is_ok());
        assert!(matches!(
            PodValue::cryptographic_from_bigint(&p),
            Err(PodError::Range(_))
        ));
        assert!(matches!(
            PodValue::cryptographic_from_bigint(&BigInt::from(-1)),
            Err(PodError::Range(_))
        ));
    }

    #[test]
    fn test_check_value_rejects_bad_name_and_range() {
        assert!(check_value("ok", &PodValue::Int(1)).is_ok());
        assert!(matches!(
            check_value("1bad", &PodValue::Int(1)),
            Err(PodError::InvalidName { .. })
        ));
        let too_big = PodValue::Cryptographic(field_modulus().clone());
        assert!(matches!(
            check_value("k", &too_big),
            Err(PodError::Range(_))
        ));
    }

    #[test]
    fn test_equality_requires_same_tag() {
        assert_ne!(PodValue::from("123"), PodValue::Int(123));
        assert_ne!(
            PodValue::Int(5),
            PodValue::Cryptographic(BigUint::from(5u32))
        );
        assert_eq!(PodValue::Int(5), PodValue::Int(5));
    }

    #[test]
    fn test_raw_values() {
        assert_eq!(
            PodValue::from("hi").raw_value(),
            PodRawValue::Text("hi".into())
        );
        assert_eq!(
            PodValue::Int(-3).raw_value(),
            PodRawValue::Number(BigInt::from(-3))
        );
        let key = PrivateKey::from_bytes([1; 32]).public_key();
        assert_eq!(
            PodValue::from(key).raw_value(),
            PodRawValue::Text(key.to_base64())
        );
    }

    #[test]
    fn test_circuit_signals() {
        assert_eq!(
            PodValue::Int(-1).circuit_signal(),
            Some(field_modulus() - 1u32)
        );
        assert_eq!(
            PodValue::Cryptographic(BigUint::from(9u32)).circuit_signal(),
            Some(BigUint::from(9u32))
        );
        assert_eq!(PodValue::from("9").circuit_signal(), None);
    }

    #[test]
    fn test_clone_is_independent() {
        let original = PodValue::String("abc".into());
        let mut copy = original.clone();
        if let PodValue::String(s) = &mut copy {
            s.push('d');
        }
        assert_eq!(original, PodValue::String("abc".into()));
        assert_ne!(original, copy);
    }
}
