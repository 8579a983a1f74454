//! Merkle proofs and their verifiers.
//!
//! A proof is the sibling chain from the terminal node up to the root,
//! top-down, compressed: levels whose sibling subtree is empty still appear
//! (as the all-zero hash), but the proven leaf itself needs no padding to
//! the full tree depth because single-leaf subtrees collapse.

use podkit_core::{leaf_digest, node_digest, Hash, EMPTY_HASH};
use serde::{Deserialize, Serialize};

/// A proof of leaf inclusion or exclusion.
///
/// For exclusion, `other_leaf` carries the conflicting leaf when the
/// queried key's path resolves to a leaf with a different key; it is
/// `None` when the path ends at an empty slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerkleProof {
    /// Whether this proof witnesses presence or absence.
    pub existence: bool,
    /// Sibling hashes from the root down to the terminal node.
    pub siblings: Vec<Hash>,
    /// The leaf actually found on the queried path, for exclusion proofs.
    pub other_leaf: Option<(Hash, Hash)>,
}

impl MerkleProof {
    /// Fold the sibling chain over a terminal hash, using `key` to pick
    /// sides. The terminal is the leaf digest when a leaf is claimed and
    /// the empty hash when the path is claimed to end in an empty slot.
    fn fold(&self, key: &Hash, terminal: Hash) -> Hash {
        let mut h = terminal;
        for (lvl, sibling) in self.siblings.iter().enumerate().rev() {
            h = if key.path_bit(lvl) {
                node_digest(sibling, &h)
            } else {
                node_digest(&h, sibling)
            };
        }
        h
    }
}

/// Verify that `(key, value)` is a leaf of the tree rooted at `root`.
pub fn verify_inclusion(root: &Hash, key: &Hash, value: &Hash, proof: &MerkleProof) -> bool {
    if !proof.existence {
        return false;
    }
    proof.fold(key, leaf_digest(key, value)) == *root
}

/// Verify that `key` has no leaf in the tree rooted at `root`.
///
/// Accepts either witness form: an empty terminal slot, or a leaf whose
/// key differs from the queried one. The conflicting leaf shares the
/// queried key's path bits down to its depth, so folding with either key
/// reaches the same root.
pub fn verify_exclusion(root: &Hash, key: &Hash, proof: &MerkleProof) -> bool {
    if proof.existence {
        return false;
    }
    match &proof.other_leaf {
        Some((other_key, _)) if other_key == key => false,
        Some((other_key, other_value)) => {
            proof.fold(other_key, leaf_digest(other_key, other_value)) == *root
        }
        None => proof.fold(key, EMPTY_HASH) == *root,
    }
}
