//! # pod-crypto: Cryptographic Primitives for PODs
//!
//! Provides the building blocks the POD content model is made of:
//!
//! - **BN254 field** helpers: canonical conversion between integers and
//!   field elements, decimal serde adapters.
//! - **Poseidon** (circom parameters) for value and Merkle node hashes.
//! - **SHA-256 field folding** for names and string values.
//! - **Baby Jubjub** point arithmetic and 32-byte point packing.
//! - **EdDSA-Poseidon** keys and signatures over a single field element.
//! - **LeanIMT**, the unpadded incremental Merkle tree, with inclusion proofs.
//! - Hex/Base64 auto-detecting decoding of fixed-length byte strings.
//!
//! ## Crate Policy
//!
//! - Leaf crate: no internal dependencies.
//! - No mocking of cryptographic operations in tests. Known-answer vectors
//!   come from circomlib-compatible implementations.
//! - `unsafe` prohibited.

#![forbid(unsafe_code)]

pub mod babyjub;
pub mod eddsa;
pub mod encoding;
pub mod error;
pub mod field;
pub mod lean_imt;
pub mod poseidon;
pub mod sha256;

pub use babyjub::Point;
pub use eddsa::{verify, PrivateKey, PublicKey, Signature};
pub use error::CryptoError;
pub use field::{field_modulus, Fr};
pub use lean_imt::{verify_proof, LeanImt, MerkleProof};
pub use poseidon::{poseidon1, poseidon2, poseidon_hash};
pub use sha256::sha256_string_hash;
