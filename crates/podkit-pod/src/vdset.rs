//! The verifier-data set a MainPod's proof may reference.

use std::collections::BTreeSet;

use podkit_core::{Hash, Params, EMPTY_HASH};
use podkit_merkle::{verify_inclusion, MerkleProof, MerkleTree, TreeError};
use podkit_value::ContainerError;
use serde::{Deserialize, Serialize};

/// A fixed-depth Merkle set of verifier-data hashes.
///
/// The embedded recursive proof of a MainPod may only reference verifier
/// data whose hash is in this set, so the set's root is part of what the
/// proof commits to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "VDSetWire", into = "VDSetWire")]
pub struct VDSet {
    elements: BTreeSet<Hash>,
    max_depth: usize,
    tree: MerkleTree,
}

#[derive(Serialize, Deserialize)]
struct VDSetWire {
    max_depth: usize,
    set: Vec<Hash>,
}

impl VDSet {
    /// Build a set of the given depth. Duplicate hashes collapse.
    pub fn new(
        max_depth: usize,
        hashes: impl IntoIterator<Item = Hash>,
    ) -> Result<Self, ContainerError> {
        let elements: BTreeSet<Hash> = hashes.into_iter().collect();
        let leaves = elements.iter().map(|h| (*h, EMPTY_HASH));
        let tree = MerkleTree::new(max_depth, leaves).map_err(|err| match err {
            TreeError::CapacityExceeded { len, max_depth } => {
                ContainerError::CapacityExceeded { len, max_depth }
            }
            other => ContainerError::Tree(other),
        })?;
        Ok(Self {
            elements,
            max_depth,
            tree,
        })
    }

    /// The set's Merkle root.
    pub fn root(&self) -> Hash {
        self.tree.root()
    }

    /// The depth this set was built with.
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Number of verifier-data hashes.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// True if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// True if `hash` is in the set.
    pub fn contains(&self, hash: &Hash) -> bool {
        self.elements.contains(hash)
    }

    /// The hashes in canonical order.
    pub fn elements(&self) -> impl Iterator<Item = &Hash> {
        self.elements.iter()
    }

    /// Prove that `hash` is in the set.
    pub fn prove(&self, hash: &Hash) -> Result<MerkleProof, ContainerError> {
        let (_, proof) = self.tree.prove(hash)?;
        Ok(proof)
    }

    /// Verify membership of `hash` under `root`.
    pub fn verify(root: &Hash, hash: &Hash, proof: &MerkleProof) -> bool {
        verify_inclusion(root, hash, &EMPTY_HASH, proof)
    }

    /// Require this set's depth to match the circuit parameter.
    pub fn check_depth(&self, params: &Params) -> Result<(), ContainerError> {
        if self.max_depth != params.max_depth_mt_vd_set {
            return Err(ContainerError::DepthMismatch {
                found: self.max_depth,
                expected: params.max_depth_mt_vd_set,
            });
        }
        Ok(())
    }
}

impl TryFrom<VDSetWire> for VDSet {
    type Error = ContainerError;

    fn try_from(wire: VDSetWire) -> Result<Self, Self::Error> {
        VDSet::new(wire.max_depth, wire.set)
    }
}

impl From<VDSet> for VDSetWire {
    fn from(v: VDSet) -> Self {
        VDSetWire {
            max_depth: v.max_depth,
            set: v.elements.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEPTH: usize = 6;

    fn hashes(ns: impl IntoIterator<Item = u64>) -> Vec<Hash> {
        ns.into_iter().map(Hash::from_index).collect()
    }

    #[test]
    fn test_root_order_independent() {
        let a = VDSet::new(DEPTH, hashes([1, 2, 3])).unwrap();
        let b = VDSet::new(DEPTH, hashes([3, 2, 1, 1])).unwrap();
        assert_eq!(a.root(), b.root());
        assert_eq!(b.len(), 3);
    }

    #[test]
    fn test_membership_proof() {
        let v = VDSet::new(DEPTH, hashes([4, 5])).unwrap();
        let target = Hash::from_index(4);
        let proof = v.prove(&target).unwrap();
        assert!(VDSet::verify(&v.root(), &target, &proof));
        assert!(!VDSet::verify(&v.root(), &Hash::from_index(6), &proof));
    }

    #[test]
    fn test_capacity_bound() {
        let err = VDSet::new(1, hashes(0..3)).unwrap_err();
        assert!(matches!(err, ContainerError::CapacityExceeded { len: 3, .. }));
    }

    #[test]
    fn test_depth_check() {
        let params = Params::default();
        let ok = VDSet::new(params.max_depth_mt_vd_set, hashes([1])).unwrap();
        assert!(ok.check_depth(&params).is_ok());

        let bad = VDSet::new(params.max_depth_mt_vd_set + 1, hashes([1])).unwrap();
        assert!(matches!(
            bad.check_depth(&params),
            Err(ContainerError::DepthMismatch { .. })
        ));
    }

    #[test]
    fn test_serde_round_trip() {
        let v = VDSet::new(DEPTH, hashes([9, 10, 11])).unwrap();
        let text = serde_json::to_string(&v).unwrap();
        let back: VDSet = serde_json::from_str(&text).unwrap();
        assert_eq!(back, v);
    }
}
