//! # Lean Incremental Merkle Tree (LeanIMT)
//!
//! A binary Merkle tree that grows one leaf at a time without padding. A
//! node with no right sibling is promoted to the next level unchanged
//! instead of being hashed with a zero value, so the depth is
//! `ceil(log2(size))` and proofs carry only the siblings that exist.
//!
//! ## Algorithm
//!
//! Node hash: `Poseidon2(left, right)`.
//!
//! Insertion of leaf `i` walks levels `0..depth`, writing the running node
//! at position `i >> level`. At a right-child position the running node
//! becomes `H(left_sibling, node)`; at a left-child position it is carried
//! up as-is.
//!
//! ## Proof Format
//!
//! `siblings` lists only the siblings that exist, bottom-up. Bit `k` of
//! `index` is set when the proven node was the right child at the `k`th
//! emitted step. This matches the zk-kit LeanIMT proof layout consumed by
//! the Circom verifier.

use num_bigint::BigUint;
use serde::{Deserialize, Serialize};

use crate::error::CryptoError;
use crate::field::{fr_from_biguint, fr_to_biguint, Fr};
use crate::poseidon::poseidon2;

/// A Lean incremental Merkle tree over BN254 field elements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeanImt {
    // nodes[0] are leaves; nodes[depth] holds the root.
    nodes: Vec<Vec<Fr>>,
}

/// An inclusion proof for one leaf.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerkleProof {
    /// Root the proof commits to.
    #[serde(with = "crate::field::decimal")]
    pub root: BigUint,
    /// The proven leaf.
    #[serde(with = "crate::field::decimal")]
    pub leaf: BigUint,
    /// Path bits of the emitted steps.
    pub index: usize,
    /// Existing siblings, bottom-up.
    #[serde(with = "crate::field::decimal_vec")]
    pub siblings: Vec<BigUint>,
}

// ---------------------------------------------------------------------------
// Construction
// ---------------------------------------------------------------------------

impl LeanImt {
    /// Build a tree by inserting `leaves` in order.
    ///
    /// Returns [`CryptoError::EmptyTree`] when there are no leaves.
    pub fn from_leaves(leaves: impl IntoIterator<Item = Fr>) -> Result<Self, CryptoError> {
        let mut tree = Self {
            nodes: vec![Vec::new()],
        };
        for leaf in leaves {
            tree.insert(leaf);
        }
        if tree.size() == 0 {
            return Err(CryptoError::EmptyTree);
        }
        Ok(tree)
    }

    /// Append a leaf, updating the path to the root.
    pub fn insert(&mut self, leaf: Fr) {
        let index = self.size();
        let mut depth = self.depth();
        if (1usize << depth) < index + 1 {
            depth += 1;
        }
        while self.nodes.len() < depth + 1 {
            self.nodes.push(Vec::new());
        }

        let mut node = leaf;
        for level in 0..depth {
            let row = &mut self.nodes[level];
            let position = index >> level;
            if position < row.len() {
                row[position] = node;
            } else {
                row.push(node);
            }
            if position & 1 == 1 {
                node = poseidon2(row[position - 1], node);
            }
        }
        self.nodes[depth] = vec![node];
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    /// Number of leaves.
    pub fn size(&self) -> usize {
        self.nodes[0].len()
    }

    /// Number of levels above the leaves (`0` for a single leaf).
    pub fn depth(&self) -> usize {
        self.nodes.len() - 1
    }

    /// The root hash.
    pub fn root(&self) -> Fr {
        self.nodes[self.depth()].first().copied().unwrap_or_default()
    }

    /// The leaves in insertion order.
    pub fn leaves(&self) -> &[Fr] {
        &self.nodes[0]
    }

    // -----------------------------------------------------------------------
    // Proofs
    // -----------------------------------------------------------------------

    /// Build an inclusion proof for the leaf at `leaf_index`.
    pub fn generate_proof(&self, leaf_index: usize) -> Result<MerkleProof, CryptoError> {
        if leaf_index >= self.size() {
            return Err(CryptoError::LeafOutOfRange {
                index: leaf_index,
                size: self.size(),
            });
        }

        let mut siblings = Vec::new();
        let mut path = 0usize;
        let mut index = leaf_index;
        for row in &self.nodes[..self.depth()] {
            let is_right = index & 1 == 1;
            let sibling = if is_right { index - 1 } else { index + 1 };
            if let Some(node) = row.get(sibling) {
                if is_right {
                    path |= 1 << siblings.len();
                }
                siblings.push(fr_to_biguint(*node));
            }
            index >>= 1;
        }

        Ok(MerkleProof {
            root: fr_to_biguint(self.root()),
            leaf: fr_to_biguint(self.nodes[0][leaf_index]),
            index: path,
            siblings,
        })
    }
}

// ---------------------------------------------------------------------------
// Verification
// ---------------------------------------------------------------------------

/// Verify an inclusion proof by folding its siblings up to the root.
///
/// Returns `false` (never panics) for any malformed or mismatched proof,
/// including field elements at or above the modulus.
pub fn verify_proof(proof: &MerkleProof) -> bool {
    let Ok(mut node) = fr_from_biguint(&proof.leaf) else {
        return false;
    };
    for (step, sibling) in proof.siblings.iter().enumerate() {
        let Ok(sibling) = fr_from_biguint(sibling) else {
            return false;
        };
        let is_right = u32::try_from(step)
            .ok()
            .and_then(|shift| proof.index.checked_shr(shift))
            .is_some_and(|bits| bits & 1 == 1);
        node = if is_right {
            poseidon2(sibling, node)
        } else {
            poseidon2(node, sibling)
        };
    }
    fr_from_biguint(&proof.root).is_ok_and(|root| root == node)
}
