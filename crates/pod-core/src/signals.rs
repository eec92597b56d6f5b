//! # Entry Circuit Signals
//!
//! The inputs a proving circuit needs to reveal or constrain one entry: the
//! Merkle proof for the entry's name leaf, the name and value hashes, and,
//! for numeric types only, the raw value as a field element so the circuit
//! can apply range checks or comparisons directly.

use num_bigint::BigUint;
use pod_crypto::{verify_proof, MerkleProof};
use serde::{Deserialize, Serialize};

use crate::hashing::hash_cryptographic;

/// Circuit inputs for a single entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryCircuitSignals {
    /// Proof for the name leaf. `siblings[0]` is the value hash.
    pub proof: MerkleProof,
    /// `hash_name(name)`, equal to `proof.leaf`.
    #[serde(with = "pod_crypto::field::decimal")]
    pub name_hash: BigUint,
    /// `hash_value(value)`, equal to `proof.siblings[0]`.
    #[serde(with = "pod_crypto::field::decimal")]
    pub value_hash: BigUint,
    /// Field encoding of an `int` or `cryptographic` value.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "pod_crypto::field::decimal_option"
    )]
    pub value: Option<BigUint>,
}

impl EntryCircuitSignals {
    /// Check the signals are internally consistent.
    ///
    /// The proof must verify, its leaf must be the name hash, its first
    /// sibling the value hash, and a raw value (if present) must hash to the
    /// value hash. This says nothing about which plaintext name the hashes
    /// belong to.
    pub fn is_consistent(&self) -> bool {
        if !verify_proof(&self.proof) || self.proof.leaf != self.name_hash {
            return false;
        }
        if self.proof.siblings.first() != Some(&self.value_hash) {
            return false;
        }
        match &self.value {
            Some(raw) => hash_cryptographic(raw).is_ok_and(|h| h == self.value_hash),
            None => true,
        }
    }
}
