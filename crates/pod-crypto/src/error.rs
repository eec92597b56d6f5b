//! # Cryptographic Error Types
//!
//! Structured errors for all primitives in `pod-crypto`. Uses `thiserror`
//! for derive-based `Display` and `Error` implementations.

use thiserror::Error;

/// Errors from cryptographic operations on POD data.
#[derive(Error, Debug, PartialEq)]
pub enum CryptoError {
    /// Text is neither hex nor Base64 of the expected size.
    #[error("invalid {type_name} encoding: {reason}")]
    InvalidEncoding {
        /// What was being decoded (e.g. "public key").
        type_name: String,
        /// Why the text was rejected.
        reason: String,
    },

    /// Decoded bytes have the wrong length.
    #[error("invalid {type_name} length: expected {expected} bytes, got {actual}")]
    InvalidLength {
        /// What was being decoded.
        type_name: String,
        /// Required byte length.
        expected: usize,
        /// Byte length actually decoded.
        actual: usize,
    },

    /// Packed bytes do not describe a point on Baby Jubjub.
    #[error("invalid curve point: {0}")]
    InvalidPoint(String),

    /// An integer is not a canonical element of the BN254 scalar field.
    #[error("value is not a field element: {0}")]
    FieldOverflow(String),

    /// A Merkle proof was requested for a leaf that does not exist.
    #[error("leaf index {index} out of range for tree of size {size}")]
    LeafOutOfRange {
        /// Requested leaf index.
        index: usize,
        /// Number of leaves in the tree.
        size: usize,
    },

    /// A Merkle tree needs at least one leaf.
    #[error("cannot build a Merkle tree with no leaves")]
    EmptyTree,

    /// The Poseidon backend rejected its input.
    #[error("poseidon error: {0}")]
    Poseidon(#[from] light_poseidon::PoseidonError),
}
