//! Sparse Merkle tree construction and proof generation.
//!
//! Leaves are addressed by the first `max_depth` bits of their key. When two
//! keys share a path prefix, interior nodes are inserted until their paths
//! diverge; diverging later than `max_depth` is an error because the circuit
//! cannot represent such a tree.

use std::collections::HashMap;

use podkit_core::{leaf_digest, node_digest, Hash, EMPTY_HASH};
use thiserror::Error;

use crate::proof::MerkleProof;

/// Error during tree construction or proof generation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    /// Inclusion proof requested for a key with no leaf.
    #[error("leaf not found for key {0}")]
    LeafNotFound(Hash),

    /// Two leaves with the same key cannot coexist.
    #[error("duplicate leaf for key {0}")]
    DuplicateLeaf(Hash),

    /// Two keys share a path prefix longer than the tree depth.
    #[error("key paths do not diverge within depth {0}")]
    DepthExceeded(usize),

    /// More leaves than the fixed depth can address.
    #[error("{len} leaves exceed capacity 2^{max_depth}")]
    CapacityExceeded {
        /// Number of leaves requested.
        len: usize,
        /// The tree's fixed depth.
        max_depth: usize,
    },

    /// A node hash referenced by the tree has no stored node.
    #[error("missing node for hash {0}")]
    MissingNode(Hash),
}

#[derive(Debug, Clone)]
enum Node {
    Leaf { key: Hash, value: Hash },
    Interior { left: Hash, right: Hash },
}

/// An immutable fixed-depth sparse Merkle tree.
///
/// Built once from a set of key/value leaves; afterwards only queried for
/// its root and for proofs. Equality is root equality.
#[derive(Debug, Clone)]
pub struct MerkleTree {
    max_depth: usize,
    root: Hash,
    nodes: HashMap<Hash, Node>,
}

impl PartialEq for MerkleTree {
    fn eq(&self, other: &Self) -> bool {
        self.root == other.root
    }
}
impl Eq for MerkleTree {}

impl MerkleTree {
    /// Build a tree of the given depth from key/value leaves.
    ///
    /// # Errors
    ///
    /// [`TreeError::CapacityExceeded`] if more leaves are supplied than
    /// `2^max_depth` can address, [`TreeError::DuplicateLeaf`] on repeated
    /// keys, and [`TreeError::DepthExceeded`] if two keys share a
    /// `max_depth`-bit path prefix.
    pub fn new<I>(max_depth: usize, leaves: I) -> Result<Self, TreeError>
    where
        I: IntoIterator<Item = (Hash, Hash)>,
    {
        let leaves: Vec<(Hash, Hash)> = leaves.into_iter().collect();
        if max_depth < usize::BITS as usize - 1 && leaves.len() > (1usize << max_depth) {
            return Err(TreeError::CapacityExceeded {
                len: leaves.len(),
                max_depth,
            });
        }
        let mut tree = Self {
            max_depth,
            root: EMPTY_HASH,
            nodes: HashMap::new(),
        };
        for (k, v) in leaves {
            tree.insert(k, v)?;
        }
        Ok(tree)
    }

    /// The tree's root hash. The empty tree roots to the all-zero constant.
    pub fn root(&self) -> Hash {
        self.root
    }

    /// The fixed depth this tree was built with.
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// The value stored under `key`, if present.
    pub fn get(&self, key: &Hash) -> Option<Hash> {
        match self.descend(key, None) {
            Ok((Some((k, v)), _)) if k == *key => Some(v),
            _ => None,
        }
    }

    /// True if `key` has a leaf in the tree.
    pub fn contains(&self, key: &Hash) -> bool {
        self.get(key).is_some()
    }

    /// Prove that `key` is present, returning its value and the proof.
    ///
    /// # Errors
    ///
    /// [`TreeError::LeafNotFound`] if the key has no leaf.
    pub fn prove(&self, key: &Hash) -> Result<(Hash, MerkleProof), TreeError> {
        let mut siblings = Vec::new();
        match self.descend(key, Some(&mut siblings))? {
            (Some((k, v)), _) if k == *key => Ok((
                v,
                MerkleProof {
                    existence: true,
                    siblings,
                    other_leaf: None,
                },
            )),
            _ => Err(TreeError::LeafNotFound(*key)),
        }
    }

    /// Prove that `key` is absent.
    ///
    /// Absence has two witnesses: the path ends at an empty slot, or it
    /// ends at a leaf carrying a different key (recorded as `other_leaf`).
    ///
    /// # Errors
    ///
    /// [`TreeError::DuplicateLeaf`] if the key is in fact present.
    pub fn prove_exclusion(&self, key: &Hash) -> Result<MerkleProof, TreeError> {
        let mut siblings = Vec::new();
        match self.descend(key, Some(&mut siblings))? {
            (None, _) => Ok(MerkleProof {
                existence: false,
                siblings,
                other_leaf: None,
            }),
            (Some((k, v)), _) if k != *key => Ok(MerkleProof {
                existence: false,
                siblings,
                other_leaf: Some((k, v)),
            }),
            _ => Err(TreeError::DuplicateLeaf(*key)),
        }
    }

    /// Iterate over all leaves in path order.
    pub fn leaves(&self) -> Vec<(Hash, Hash)> {
        let mut out = Vec::new();
        self.collect_leaves(self.root, &mut out);
        out
    }

    fn insert(&mut self, key: Hash, value: Hash) -> Result<(), TreeError> {
        let mut siblings = Vec::new();
        let (terminal, lvl) = self.descend(&key, Some(&mut siblings))?;
        let replacement = match terminal {
            None => self.store_leaf(key, value),
            Some((k, _)) if k == key => return Err(TreeError::DuplicateLeaf(key)),
            Some((k, v)) => self.split_collision(k, v, key, value, lvl)?,
        };
        self.root = self.ascend(&key, &siblings, replacement);
        Ok(())
    }

    /// Build the interior chain separating two colliding leaves, starting
    /// at level `lvl` and descending until their key bits diverge.
    fn split_collision(
        &mut self,
        old_key: Hash,
        old_value: Hash,
        new_key: Hash,
        new_value: Hash,
        lvl: usize,
    ) -> Result<Hash, TreeError> {
        if lvl >= self.max_depth {
            return Err(TreeError::DepthExceeded(self.max_depth));
        }
        if old_key.path_bit(lvl) != new_key.path_bit(lvl) {
            let old_leaf = self.store_leaf(old_key, old_value);
            let new_leaf = self.store_leaf(new_key, new_value);
            let (left, right) = if new_key.path_bit(lvl) {
                (old_leaf, new_leaf)
            } else {
                (new_leaf, old_leaf)
            };
            Ok(self.store_interior(left, right))
        } else {
            let inner = self.split_collision(old_key, old_value, new_key, new_value, lvl + 1)?;
            let (left, right) = if new_key.path_bit(lvl) {
                (EMPTY_HASH, inner)
            } else {
                (inner, EMPTY_HASH)
            };
            Ok(self.store_interior(left, right))
        }
    }

    /// Rehash from a replaced child back to the root using the recorded
    /// sibling chain (top-down order, as produced by `descend`).
    fn ascend(&mut self, key: &Hash, siblings: &[Hash], mut child: Hash) -> Hash {
        for (lvl, sibling) in siblings.iter().enumerate().rev() {
            let (left, right) = if key.path_bit(lvl) {
                (*sibling, child)
            } else {
                (child, *sibling)
            };
            child = self.store_interior(left, right);
        }
        child
    }

    /// Walk from the root toward `key`, optionally recording sibling
    /// hashes. Returns the terminal leaf (which may carry a different key)
    /// and the level at which traversal stopped.
    fn descend(
        &self,
        key: &Hash,
        mut siblings: Option<&mut Vec<Hash>>,
    ) -> Result<(Option<(Hash, Hash)>, usize), TreeError> {
        if self.root == EMPTY_HASH {
            return Ok((None, 0));
        }
        let mut cur = self.root;
        let mut lvl = 0;
        loop {
            match self.nodes.get(&cur) {
                Some(Node::Leaf { key: k, value: v }) => return Ok((Some((*k, *v)), lvl)),
                Some(Node::Interior { left, right }) => {
                    let (next, sibling) = if key.path_bit(lvl) {
                        (*right, *left)
                    } else {
                        (*left, *right)
                    };
                    if let Some(s) = siblings.as_mut() {
                        s.push(sibling);
                    }
                    if next == EMPTY_HASH {
                        return Ok((None, lvl + 1));
                    }
                    cur = next;
                    lvl += 1;
                    if lvl > self.max_depth {
                        return Err(TreeError::DepthExceeded(self.max_depth));
                    }
                }
                None => return Err(TreeError::MissingNode(cur)),
            }
        }
    }

    fn store_leaf(&mut self, key: Hash, value: Hash) -> Hash {
        let h = leaf_digest(&key, &value);
        self.nodes.insert(h, Node::Leaf { key, value });
        h
    }

    fn store_interior(&mut self, left: Hash, right: Hash) -> Hash {
        let h = node_digest(&left, &right);
        self.nodes.insert(h, Node::Interior { left, right });
        h
    }

    fn collect_leaves(&self, node: Hash, out: &mut Vec<(Hash, Hash)>) {
        if node == EMPTY_HASH {
            return;
        }
        match self.nodes.get(&node) {
            Some(Node::Leaf { key, value }) => out.push((*key, *value)),
            Some(Node::Interior { left, right }) => {
                self.collect_leaves(*left, out);
                self.collect_leaves(*right, out);
            }
            None => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proof::{verify_exclusion, verify_inclusion};

    fn kv(i: u64) -> (Hash, Hash) {
        (Hash::from_index(i), Hash::from_index(1000 + i))
    }

    #[test]
    fn test_empty_tree_root_is_constant() {
        let t1 = MerkleTree::new(32, []).unwrap();
        let t2 = MerkleTree::new(32, []).unwrap();
        assert_eq!(t1.root(), EMPTY_HASH);
        assert_eq!(t1.root(), t2.root());
    }

    #[test]
    fn test_root_independent_of_insertion_order() {
        let forward: Vec<_> = (0..8).map(kv).collect();
        let mut reversed = forward.clone();
        reversed.reverse();
        let t1 = MerkleTree::new(32, forward).unwrap();
        let t2 = MerkleTree::new(32, reversed).unwrap();
        assert_eq!(t1.root(), t2.root());
    }

    #[test]
    fn test_get_and_contains() {
        let tree = MerkleTree::new(32, (0..8).map(kv)).unwrap();
        assert_eq!(tree.get(&Hash::from_index(3)), Some(Hash::from_index(1003)));
        assert!(tree.contains(&Hash::from_index(7)));
        assert!(!tree.contains(&Hash::from_index(8)));
    }

    #[test]
    fn test_inclusion_proofs_all_keys() {
        for n in [1usize, 2, 3, 5, 8, 13, 33] {
            let tree = MerkleTree::new(32, (0..n as u64).map(kv)).unwrap();
            for i in 0..n as u64 {
                let key = Hash::from_index(i);
                let (value, proof) = tree.prove(&key).unwrap();
                assert_eq!(value, Hash::from_index(1000 + i));
                assert!(
                    verify_inclusion(&tree.root(), &key, &value, &proof),
                    "inclusion failed for n={n}, i={i}"
                );
            }
        }
    }

    #[test]
    fn test_prove_absent_key_is_leaf_not_found() {
        let tree = MerkleTree::new(32, (0..8).map(kv)).unwrap();
        let missing = Hash::from_index(99);
        assert_eq!(tree.prove(&missing), Err(TreeError::LeafNotFound(missing)));
    }

    #[test]
    fn test_inclusion_proof_rejects_wrong_value() {
        let tree = MerkleTree::new(32, (0..8).map(kv)).unwrap();
        let key = Hash::from_index(2);
        let (_, proof) = tree.prove(&key).unwrap();
        assert!(!verify_inclusion(
            &tree.root(),
            &key,
            &Hash::from_index(555),
            &proof
        ));
    }

    #[test]
    fn test_inclusion_proof_rejects_wrong_root() {
        let tree = MerkleTree::new(32, (0..8).map(kv)).unwrap();
        let other = MerkleTree::new(32, (0..9).map(kv)).unwrap();
        let key = Hash::from_index(2);
        let (value, proof) = tree.prove(&key).unwrap();
        assert!(!verify_inclusion(&other.root(), &key, &value, &proof));
    }

    #[test]
    fn test_tampered_sibling_fails() {
        let tree = MerkleTree::new(32, (0..8).map(kv)).unwrap();
        let key = Hash::from_index(4);
        let (value, mut proof) = tree.prove(&key).unwrap();
        if let Some(first) = proof.siblings.first_mut() {
            *first = Hash::from_index(424242);
        }
        assert!(!verify_inclusion(&tree.root(), &key, &value, &proof));
    }

    #[test]
    fn test_exclusion_empty_slot() {
        // Key 1 is withheld; its path ends at an empty slot or a stranger
        // leaf, both of which verify as exclusion.
        let tree =
            MerkleTree::new(32, (0..8).filter(|i| *i != 1).map(kv)).unwrap();
        let key = Hash::from_index(1);
        let proof = tree.prove_exclusion(&key).unwrap();
        assert!(verify_exclusion(&tree.root(), &key, &proof));
    }

    #[test]
    fn test_exclusion_other_leaf() {
        let tree = MerkleTree::new(32, (0..8).map(kv)).unwrap();
        // 12 = 0b1100 shares low bits with 4 = 0b100.
        let key = Hash::from_index(12);
        let proof = tree.prove_exclusion(&key).unwrap();
        assert!(proof.other_leaf.is_some());
        assert!(verify_exclusion(&tree.root(), &key, &proof));
    }

    #[test]
    fn test_exclusion_of_present_key_rejected() {
        let tree = MerkleTree::new(32, (0..8).map(kv)).unwrap();
        let key = Hash::from_index(3);
        assert_eq!(
            tree.prove_exclusion(&key),
            Err(TreeError::DuplicateLeaf(key))
        );
    }

    #[test]
    fn test_exclusion_proof_does_not_verify_as_inclusion() {
        let tree = MerkleTree::new(32, (0..8).map(kv)).unwrap();
        let key = Hash::from_index(12);
        let proof = tree.prove_exclusion(&key).unwrap();
        assert!(!verify_exclusion(&tree.root(), &Hash::from_index(4), &proof));
    }

    #[test]
    fn test_capacity_exceeded() {
        let err = MerkleTree::new(2, (0..5).map(kv)).unwrap_err();
        assert_eq!(
            err,
            TreeError::CapacityExceeded {
                len: 5,
                max_depth: 2
            }
        );
    }

    #[test]
    fn test_duplicate_key_rejected() {
        let leaves = vec![kv(1), (Hash::from_index(1), Hash::from_index(9))];
        assert_eq!(
            MerkleTree::new(32, leaves),
            Err(TreeError::DuplicateLeaf(Hash::from_index(1)))
        );
    }

    #[test]
    fn test_depth_exceeded_on_shared_prefix() {
        // 0 and 8 share their low 3 bits; a depth-3 tree cannot split them.
        let leaves = vec![kv(0), kv(8)];
        assert_eq!(
            MerkleTree::new(3, leaves),
            Err(TreeError::DepthExceeded(3))
        );
    }

    #[test]
    fn test_leaves_round_trip() {
        let tree = MerkleTree::new(32, (0..8).map(kv)).unwrap();
        let mut got = tree.leaves();
        got.sort();
        let mut want: Vec<_> = (0..8).map(kv).collect();
        want.sort();
        assert_eq!(got, want);
    }

    #[test]
    fn test_single_leaf_collapses_to_leaf_root() {
        let (k, v) = kv(0);
        let tree = MerkleTree::new(32, [(k, v)]).unwrap();
        assert_eq!(tree.root(), podkit_core::leaf_digest(&k, &v));
        let (_, proof) = tree.prove(&k).unwrap();
        assert!(proof.siblings.is_empty());
    }
}
