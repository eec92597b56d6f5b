//! # pod-core: Provable Object Datastructures
//!
//! A POD is a typed key-value record committed to a Merkle root so that any
//! single entry can be proven (or revealed inside a zero-knowledge circuit)
//! without disclosing the rest, and signed so the root is bound to an
//! issuer key.
//!
//! ## Data Flow
//!
//! ```text
//! PodEntries --check_value--> PodContent --lazy--> LeanIMT root (content id)
//!                                   |                    |
//!                         entry proofs / signals     Pod::sign
//! ```
//!
//! ## Modules
//!
//! - [`name`], [`value`]: entry names and the four value types.
//! - [`hashing`]: type-dispatched canonical hashes and depth formulas.
//! - [`content`]: sorted entries, the lazy Merkle tree, entry proofs.
//! - [`signals`]: per-entry circuit inputs.
//! - [`signing`], [`pod`]: root signatures and the signed record.
//! - [`serialize`]: the lossless JSON entries format.

#![forbid(unsafe_code)]

use std::collections::BTreeMap;

pub mod content;
pub mod error;
pub mod hashing;
pub mod name;
pub mod pod;
pub mod serialize;
pub mod signals;
pub mod signing;
pub mod value;

/// Entries keyed by name, in name order.
pub type PodEntries = BTreeMap<PodName, PodValue>;

pub use content::PodContent;
pub use error::{ErrorKind, PodError};
pub use hashing::{
    hash_int, hash_name, hash_pubkey, hash_string, hash_value, max_entries_for_depth,
    merkle_node_hash, min_merkle_depth,
};
pub use name::PodName;
pub use pod::Pod;
pub use signals::EntryCircuitSignals;
pub use signing::{sign_root, verify_root, verify_root_text};
pub use value::{check_value, PodRawValue, PodValue, PodValueType};

pub use pod_crypto::{MerkleProof, PrivateKey, PublicKey, Signature};
