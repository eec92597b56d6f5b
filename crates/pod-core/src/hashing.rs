//! # Canonical Hashing
//!
//! Maps entry names and typed values to BN254 field elements. The hash
//! routine is chosen by the value's type tag:
//!
//! | Input | Hash |
//! |---|---|
//! | name, `string` | `SHA256(utf8) >> 8` |
//! | `int`, `cryptographic` | `Poseidon1(field encoding)` |
//! | `eddsa_pubkey` | `Poseidon2(x, y)` of the unpacked point |
//! | Merkle node | `Poseidon2(left, right)` |
//!
//! Names and `string` values share a hash domain. Integers and strings do
//! not, so `string "123"` and `int 123` never collide.
//!
//! These constants are part of the cross-implementation format: changing
//! any of them changes every content root.

use num_bigint::BigUint;
use pod_crypto::field::{fr_from_biguint, fr_to_biguint, Fr};
use pod_crypto::sha256::sha256_string_hash;
use pod_crypto::{poseidon1, poseidon2, PublicKey};

use crate::error::PodError;
use crate::value::{check_value, PodValue};

/// Hash a string value.
pub fn hash_string(value: &str) -> BigUint {
    sha256_string_hash(value)
}

/// Hash an entry name. Same algorithm as [`hash_string`].
pub fn hash_name(name: &str) -> BigUint {
    sha256_string_hash(name)
}

/// Hash an `int` value over its field encoding.
pub fn hash_int(value: i64) -> BigUint {
    fr_to_biguint(poseidon1(Fr::from(value)))
}

/// Hash a `cryptographic` value. Fails with a range error at or above `p`.
pub fn hash_cryptographic(value: &BigUint) -> Result<BigUint, PodError> {
    Ok(fr_to_biguint(poseidon1(fr_from_biguint(value)?)))
}

/// Hash a public key over its affine coordinates.
pub fn hash_pubkey(key: &PublicKey) -> BigUint {
    fr_to_biguint(pubkey_leaf(key))
}

/// Hash any value, dispatching on its type tag.
pub fn hash_value(value: &PodValue) -> Result<BigUint, PodError> {
    match value {
        PodValue::String(s) => Ok(hash_string(s)),
        PodValue::Int(n) => Ok(hash_int(*n)),
        PodValue::Cryptographic(n) => hash_cryptographic(n),
        PodValue::EdDsaPubkey(key) => Ok(hash_pubkey(key)),
    }
}

/// Combine two child hashes into their parent.
pub fn merkle_node_hash(left: &BigUint, right: &BigUint) -> Result<BigUint, PodError> {
    let hash = poseidon2(fr_from_biguint(left)?, fr_from_biguint(right)?);
    Ok(fr_to_biguint(hash))
}

/// Smallest tree depth holding `n_entries` entries (two leaves each).
///
/// Defined for every `n_entries`: one level for the name/value pair plus
/// `ceil(log2(n_entries))` above it.
pub fn min_merkle_depth(n_entries: usize) -> usize {
    match n_entries {
        0 => 0,
        n => 1 + (usize::BITS - (n - 1).leading_zeros()) as usize,
    }
}

/// Largest entry count a tree of `depth` can hold, saturating at
/// `usize::MAX` once the capacity no longer fits.
pub fn max_entries_for_depth(depth: usize) -> usize {
    match depth {
        0 => 0,
        d => u32::try_from(d - 1)
            .ok()
            .and_then(|shift| 1usize.checked_shl(shift))
            .unwrap_or(usize::MAX),
    }
}

// ---------------------------------------------------------------------------
// Leaf hashes for tree construction
// ---------------------------------------------------------------------------

pub(crate) fn name_leaf(name: &str) -> Fr {
    Fr::from(hash_name(name))
}

/// Leaf hash of a value that already passed [`check_value`].
pub(crate) fn value_leaf(name: &str, value: &PodValue) -> Fr {
    debug_assert!(check_value(name, value).is_ok());
    match value {
        PodValue::String(s) => Fr::from(hash_string(s)),
        PodValue::Int(n) => poseidon1(Fr::from(*n)),
        PodValue::Cryptographic(n) => poseidon1(Fr::from(n.clone())),
        PodValue::EdDsaPubkey(key) => pubkey_leaf(key),
    }
}

fn pubkey_leaf(key: &PublicKey) -> Fr {
    let point = key.point();
    poseidon2(point.x(), point.y())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pod_crypto::field::field_modulus;

    #[test]
    fn test_depth_formulas() {
        assert_eq!(min_merkle_depth(1), 1);
        assert_eq!(min_merkle_depth(2), 2);
        assert_eq!(min_merkle_depth(4), 3);
        assert_eq!(min_merkle_depth(5), 4);
        assert_eq!(min_merkle_depth(8), 4);
        assert_eq!(min_merkle_depth(9), 5);
        assert_eq!(max_entries_for_depth(0), 0);
        assert_eq!(max_entries_for_depth(1), 1);
        assert_eq!(max_entries_for_depth(4), 8);
    }

    #[test]
    fn test_depth_formulas_agree() {
        for depth in 1..12 {
            let capacity = max_entries_for_depth(depth);
            assert_eq!(min_merkle_depth(capacity), depth);
            assert_eq!(min_merkle_depth(capacity + 1), depth + 1);
        }
    }

    #[test]
    fn test_depth_formulas_at_usize_limits() {
        let bits = usize::BITS as usize;
        assert_eq!(max_entries_for_depth(bits), 1 << (bits - 1));
        assert_eq!(max_entries_for_depth(bits + 1), usize::MAX);
        assert_eq!(max_entries_for_depth(usize::MAX), usize::MAX);

        assert_eq!(min_merkle_depth(1 << (bits - 1)), bits);
        assert_eq!(min_merkle_depth((1 << (bits - 1)) + 1), bits + 1);
        assert_eq!(min_merkle_depth(usize::MAX), bits + 1);
    }

    #[test]
    fn test_type_domain_separation() {
        let as_string = hash_value(&PodValue::from("123")).unwrap();
        let as_int = hash_value(&PodValue::Int(123)).unwrap();
        assert_ne!(as_string, as_int);
    }

    #[test]
    fn test_int_and_cryptographic_share_encoding() {
        assert_eq!(
            hash_int(7),
            hash_cryptographic(&BigUint::from(7u32)).unwrap()
        );
        assert_eq!(
            hash_int(-1),
            hash_cryptographic(&(field_modulus() - 1u32)).unwrap()
        );
    }

    #[test]
    fn test_names_and_strings_share_a_domain() {
        assert_eq!(hash_name("ticketId"), hash_string("ticketId"));
    }

    #[test]
    fn test_out_of_range_cryptographic_is_range_error() {
        let err = hash_value(&PodValue::Cryptographic(field_modulus().clone())).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Range);
    }

    #[test]
    fn test_node_hash_rejects_non_field_input() {
        let zero = BigUint::from(0u32);
        assert!(merkle_node_hash(&zero, &zero).is_ok());
        assert!(merkle_node_hash(field_modulus(), &zero).is_err());
    }

    #[test]
    fn test_leaf_helpers_match_public_hashes() {
        let value = PodValue::Int(-42);
        assert_eq!(
            fr_to_biguint(value_leaf("n", &value)),
            hash_value(&value).unwrap()
        );
        assert_eq!(fr_to_biguint(name_leaf("n")), hash_name("n"));
    }
}
