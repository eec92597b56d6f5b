//! # Poseidon: ZK-Friendly Hash over BN254
//!
//! Circom-parameter Poseidon (x^5 S-box, 8 full rounds, arity-dependent
//! partial rounds) as implemented by `light-poseidon`. These are the same
//! constants circomlib and `poseidon-lite` use, so hashes produced here match
//! what a Circom circuit recomputes in-constraint.
//!
//! ## Caching
//!
//! Building a hasher expands the round constants and MDS matrix for its
//! width. Hashers are cached per thread and per arity; each hash call resets
//! the sponge state, so reuse is observationally pure.

use std::cell::RefCell;
use std::collections::HashMap;

use light_poseidon::{Poseidon, PoseidonHasher};

use crate::error::CryptoError;
use crate::field::Fr;

/// Largest input count supported by the circom parameter table.
pub const MAX_INPUTS: usize = 12;

thread_local! {
    static HASHERS: RefCell<HashMap<usize, Poseidon<Fr>>> = RefCell::new(HashMap::new());
}

/// Hash `inputs` (1..=12 field elements) with circom Poseidon.
pub fn poseidon_hash(inputs: &[Fr]) -> Result<Fr, CryptoError> {
    HASHERS.with(|cell| {
        let mut hashers = cell.borrow_mut();
        let hasher = match hashers.entry(inputs.len()) {
            std::collections::hash_map::Entry::Occupied(slot) => slot.into_mut(),
            std::collections::hash_map::Entry::Vacant(slot) => {
                slot.insert(Poseidon::<Fr>::new_circom(inputs.len())?)
            }
        };
        Ok(hasher.hash(inputs)?)
    })
}

/// Single-input Poseidon.
pub fn poseidon1(a: Fr) -> Fr {
    fixed_arity(&[a])
}

/// Two-input Poseidon.
pub fn poseidon2(a: Fr, b: Fr) -> Fr {
    fixed_arity(&[a, b])
}

/// Five-input Poseidon (EdDSA challenge hash).
pub fn poseidon5(inputs: [Fr; 5]) -> Fr {
    fixed_arity(&inputs)
}

// Arities 1, 2 and 5 are inside the circom table and the input length always
// matches the hasher width, so the backend cannot fail here.
fn fixed_arity(inputs: &[Fr]) -> Fr {
    match poseidon_hash(inputs) {
        Ok(hash) => hash,
        Err(e) => unreachable!("poseidon arity {} is supported: {e}", inputs.len()),
    }
}
