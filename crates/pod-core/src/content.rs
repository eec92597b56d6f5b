//! # POD Content
//!
//! [`PodContent`] is the canonical, hash-committed form of a set of entries.
//! Entries are sorted by name and each gets a stable index. The Merkle tree
//! holds two leaves per entry, `hash_name(name)` then `hash_value(value)`,
//! inserted in index order into a [`LeanImt`]. Its root is the content id.
//!
//! ## Lifecycle
//!
//! Construction validates and sorts but does not hash. The tree is built on
//! the first structural query (`content_id`, `merkle_tree_depth`, proofs)
//! and cached for the lifetime of the value. `PodContent` is never mutated
//! after construction; a different record is a new `PodContent`.
//!
//! ## Security Invariant
//!
//! - The content id depends only on the set of entries, never on the order
//!   they were supplied in.
//! - Name and value are always separate leaves. An entry proof is for the
//!   name leaf at `2 * index`; the value leaf is its right sibling, so
//!   `proof.siblings[0]` is the value hash.
//! - The lazy tree sits in a `OnceLock`: concurrent first access from
//!   several threads blocks on one build and never observes a partial tree.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use num_bigint::BigUint;
use pod_crypto::field::fr_to_biguint;
use pod_crypto::{verify_proof, LeanImt, MerkleProof};

use crate::error::PodError;
use crate::hashing::{name_leaf, value_leaf};
use crate::name::PodName;
use crate::serialize::{deserialize_entries, serialize_entries};
use crate::signals::EntryCircuitSignals;
use crate::value::{check_value, PodRawValue, PodValue};
use crate::PodEntries;

/// Validated, sorted entries with a lazily built Merkle tree.
#[derive(Debug, Clone)]
pub struct PodContent {
    // Sorted by name; position is the entry index.
    entries: Vec<(PodName, PodValue)>,
    index: BTreeMap<PodName, usize>,
    tree: OnceLock<LeanImt>,
}

impl PartialEq for PodContent {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl Eq for PodContent {}

// ---------------------------------------------------------------------------
// Construction
// ---------------------------------------------------------------------------

impl PodContent {
    /// Validate, sort and index a set of entries.
    ///
    /// Fails with a type error for duplicate names or an empty set, and with
    /// the [`check_value`] error for any invalid entry.
    pub fn from_entries(
        entries: impl IntoIterator<Item = (PodName, PodValue)>,
    ) -> Result<Self, PodError> {
        let mut sorted: Vec<(PodName, PodValue)> = entries.into_iter().collect();
        if sorted.is_empty() {
            return Err(PodError::Type("a POD must have at least one entry".to_string()));
        }
        for (name, value) in &sorted {
            check_value(name.as_str(), value)?;
        }

        sorted.sort_by(|(a, _), (b, _)| a.cmp(b));
        if let Some(pair) = sorted.windows(2).find(|pair| pair[0].0 == pair[1].0) {
            return Err(PodError::Type(format!("duplicate entry name {}", pair[0].0)));
        }

        let index = sorted
            .iter()
            .enumerate()
            .map(|(i, (name, _))| (name.clone(), i))
            .collect();
        Ok(Self {
            entries: sorted,
            index,
            tree: OnceLock::new(),
        })
    }

    /// Parse content from its JSON entries form.
    pub fn deserialize(json: &str) -> Result<Self, PodError> {
        Self::from_entries(deserialize_entries(json)?)
    }

    /// The JSON entries form, keys in name order.
    pub fn serialize(&self) -> String {
        serialize_entries(self.entries.iter().map(|(name, value)| (name, value)))
    }

    // -----------------------------------------------------------------------
    // Merkle tree
    // -----------------------------------------------------------------------

    fn tree(&self) -> &LeanImt {
        self.tree.get_or_init(|| self.build_tree())
    }

    fn build_tree(&self) -> LeanImt {
        let leaves = self.entries.iter().flat_map(|(name, value)| {
            [name_leaf(name.as_str()), value_leaf(name.as_str(), value)]
        });
        let tree = match LeanImt::from_leaves(leaves) {
            Ok(tree) => tree,
            Err(e) => unreachable!("content always has at least one entry: {e}"),
        };
        assert_eq!(
            tree.size(),
            2 * self.entries.len(),
            "POD tree must hold exactly two leaves per entry"
        );
        tracing::debug!(
            entries = self.entries.len(),
            depth = tree.depth(),
            "built POD content tree"
        );
        tree
    }

    /// The Merkle root committing to every entry.
    pub fn content_id(&self) -> BigUint {
        fr_to_biguint(self.tree().root())
    }

    /// Depth of the Merkle tree.
    pub fn merkle_tree_depth(&self) -> usize {
        self.tree().depth()
    }

    /// Number of entries.
    pub fn size(&self) -> usize {
        self.entries.len()
    }

    /// Membership proof for the name leaf of entry `name`.
    pub fn generate_entry_proof(&self, name: &str) -> Result<MerkleProof, PodError> {
        let index = self.entry_index(name)?;
        Ok(self.tree().generate_proof(2 * index)?)
    }

    /// Check a proof's internal hash consistency.
    ///
    /// This does not check which name or value the leaf belongs to; compare
    /// `proof.leaf` and `proof.siblings[0]` against recomputed hashes for that.
    pub fn verify_entry_proof(proof: &MerkleProof) -> bool {
        verify_proof(proof)
    }

    /// Proof plus name hash, value hash and (for numeric types) raw value.
    pub fn generate_entry_circuit_signals(
        &self,
        name: &str,
    ) -> Result<EntryCircuitSignals, PodError> {
        let index = self.entry_index(name)?;
        let proof = self.tree().generate_proof(2 * index)?;
        let value_hash = proof.siblings.first().cloned().ok_or_else(|| {
            PodError::Type(format!("entry {name}: proof has no value sibling"))
        })?;
        Ok(EntryCircuitSignals {
            name_hash: proof.leaf.clone(),
            value_hash,
            value: self.entries[index].1.circuit_signal(),
            proof,
        })
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// All entries as a fresh map.
    pub fn as_entries(&self) -> PodEntries {
        self.entries.iter().cloned().collect()
    }

    /// Entry names in sorted order.
    pub fn list_names(&self) -> Vec<PodName> {
        self.entries.iter().map(|(name, _)| name.clone()).collect()
    }

    /// Entries in sorted order.
    pub fn list_entries(&self) -> Vec<(PodName, PodValue)> {
        self.entries.clone()
    }

    /// Iterate over entries in sorted order without copying.
    pub fn iter(&self) -> impl Iterator<Item = (&PodName, &PodValue)> {
        self.entries.iter().map(|(name, value)| (name, value))
    }

    /// The value of entry `name`, if present.
    pub fn get_value(&self, name: &str) -> Option<&PodValue> {
        self.index.get(name).map(|&i| &self.entries[i].1)
    }

    /// The untagged value of entry `name`, if present.
    pub fn get_raw_value(&self, name: &str) -> Option<PodRawValue> {
        self.get_value(name).map(PodValue::raw_value)
    }

    fn entry_index(&self, name: &str) -> Result<usize, PodError> {
        self.index
            .get(name)
            .copied()
            .ok_or_else(|| PodError::EntryNotFound(name.to_string()))
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::hashing::{hash_name, hash_value};
    use proptest::prelude::*;

    fn arb_value() -> impl Strategy<Value = PodValue> {
        prop_oneof![
            ".{0,12}".prop_map(PodValue::String),
            any::<i64>().prop_map(PodValue::Int),
            any::<[u8; 31]>().prop_map(|b| PodValue::Cryptographic(BigUint::from_bytes_be(&b))),
        ]
    }

    fn arb_entries() -> impl Strategy<Value = Vec<(PodName, PodValue)>> {
        prop::collection::btree_map("[A-Za-z_][A-Za-z0-9_]{0,6}", arb_value(), 1..10).prop_map(
            |map| {
                map.into_iter()
                    .map(|(name, value)| (PodName::new(name).unwrap(), value))
                    .collect()
            },
        )
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(48))]

        #[test]
        fn root_is_independent_of_insertion_order(
            entries in arb_entries(),
            seed in any::<u64>(),
        ) {
            let mut shuffled = entries.clone();
            // Deterministic Fisher-Yates driven by the seed.
            let mut state = seed;
            for i in (1..shuffled.len()).rev() {
                state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
                let j = (state >> 33) as usize % (i + 1);
                shuffled.swap(i, j);
            }
            let a = PodContent::from_entries(entries).unwrap();
            let b = PodContent::from_entries(shuffled).unwrap();
            prop_assert_eq!(a.content_id(), b.content_id());
            prop_assert_eq!(a.merkle_tree_depth(), b.merkle_tree_depth());
        }

        #[test]
        fn every_entry_proof_verifies(entries in arb_entries()) {
            let content = PodContent::from_entries(entries).unwrap();
            let root = content.content_id();
            for (name, value) in content.list_entries() {
                let proof = content.generate_entry_proof(name.as_str()).unwrap();
                prop_assert!(PodContent::verify_entry_proof(&proof));
                prop_assert_eq!(&proof.root, &root);
                prop_assert_eq!(&proof.leaf, &hash_name(name.as_str()));
                prop_assert_eq!(&proof.siblings[0], &hash_value(&value).unwrap());
            }
        }

        #[test]
        fn mutated_sibling_fails_verification(
            entries in arb_entries(),
            which in any::<prop::sample::Index>(),
        ) {
            let content = PodContent::from_entries(entries).unwrap();
            let names = content.list_names();
            let proof = content.generate_entry_proof(which.get(&names).as_str()).unwrap();
            for i in 0..proof.siblings.len() {
                let mut bad = proof.clone();
                bad.siblings[i] += 1u32;
                prop_assert!(!PodContent::verify_entry_proof(&bad));
            }
        }

        #[test]
        fn serialization_roundtrips(entries in arb_entries()) {
            let content = PodContent::from_entries(entries).unwrap();
            let back = PodContent::deserialize(&content.serialize()).unwrap();
            prop_assert_eq!(back.as_entries(), content.as_entries());
        }
    }
}
