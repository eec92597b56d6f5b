//! # Error Types
//!
//! Every failure in the POD content model falls into one of three classes,
//! exposed through [`PodError::kind`]:
//!
//! - **Type**: malformed input shape. Wrong JSON structure, unknown type
//!   tag, bad key or signature encoding, invalid entry name.
//! - **Range**: a numeric value outside its type's range.
//! - **NotFound**: a lookup for an entry the record does not contain.
//!
//! Validation is eager. Once a `PodContent` exists, its read-only queries
//! can only fail with `NotFound`.

use pod_crypto::CryptoError;
use thiserror::Error;

/// Errors from building, querying, signing or parsing PODs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PodError {
    /// Malformed input shape.
    #[error("type error: {0}")]
    Type(String),

    /// Numeric value out of range for its type.
    #[error("range error: {0}")]
    Range(String),

    /// The requested entry is not in the record.
    #[error("entry not found: {0}")]
    EntryNotFound(String),

    /// An entry name outside the identifier charset.
    #[error("invalid entry name {name:?}: {reason}")]
    InvalidName {
        /// The rejected name.
        name: String,
        /// Why it was rejected.
        reason: String,
    },
}

/// Error class of a [`PodError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed input shape.
    Type,
    /// Value out of range.
    Range,
    /// Missing entry.
    NotFound,
}

impl PodError {
    /// The error class this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Type(_) | Self::InvalidName { .. } => ErrorKind::Type,
            Self::Range(_) => ErrorKind::Range,
            Self::EntryNotFound(_) => ErrorKind::NotFound,
        }
    }
}

impl From<CryptoError> for PodError {
    fn from(err: CryptoError) -> Self {
        match err {
            CryptoError::FieldOverflow(_) => Self::Range(err.to_string()),
            _ => Self::Type(err.to_string()),
        }
    }
}
