//! # SHA-256 Field Folding
//!
//! Strings (entry names and `string` values) are hashed with SHA-256 rather
//! than Poseidon: arbitrary-length byte input is cheap to commit to outside a
//! circuit, and circuits only ever see the folded result.
//!
//! ## Security Invariant
//!
//! The 256-bit digest is shifted right by [`STRING_HASH_SHIFT`] bits so the
//! result is below `2^248`, strictly inside the BN254 scalar field. The shift
//! is part of the cross-implementation format and must not change.

use num_bigint::BigUint;
use sha2::{Digest, Sha256};

/// Bits dropped from the SHA-256 digest when folding into the field.
pub const STRING_HASH_SHIFT: usize = 8;

/// Hash raw bytes into a field element: `SHA256(bytes) >> 8`.
pub fn sha256_field_hash(bytes: &[u8]) -> BigUint {
    let digest = Sha256::digest(bytes);
    BigUint::from_bytes_be(&digest[..digest.len() - STRING_HASH_SHIFT / 8])
}

/// Hash a UTF-8 string into a field element.
pub fn sha256_string_hash(text: &str) -> BigUint {
    sha256_field_hash(text.as_bytes())
}
