//! Merkle-backed containers: `Array`, `Set`, `Dictionary`.
//!
//! Each container owns its elements by value, carries the fixed `max_depth`
//! it was built with, and precomputes its Merkle tree at construction —
//! containers are immutable afterwards, so the root is a plain field read.
//!
//! Leaf derivation per container:
//!
//! - `Array`: leaf key = element index (little-endian in a 32-byte key),
//!   leaf value = hash(element).
//! - `Set`: leaf key = hash(element), leaf value = the zero sentinel —
//!   presence is what is encoded, not payload.
//! - `Dictionary`: leaf key = hash(key string), leaf value = hash(value).

use std::collections::{BTreeMap, BTreeSet};

use podkit_core::{container_digest, hash_canonical, CanonicalizationError, Hash, Key, EMPTY_HASH};
use podkit_merkle::{verify_exclusion, verify_inclusion, MerkleProof, MerkleTree, TreeError};
use thiserror::Error;

use crate::value::Value;

/// Error constructing or querying a container.
#[derive(Error, Debug)]
pub enum ContainerError {
    /// More elements than the fixed depth can address.
    #[error("{len} elements exceed capacity 2^{max_depth}")]
    CapacityExceeded {
        /// Number of elements supplied.
        len: usize,
        /// The container's fixed depth.
        max_depth: usize,
    },

    /// The container's depth does not match the POD-wide parameter.
    #[error("container depth {found} does not match required depth {expected}")]
    DepthMismatch {
        /// Depth the container was built with.
        found: usize,
        /// Depth required by the circuit parameters.
        expected: usize,
    },

    /// Underlying Merkle tree failure.
    #[error(transparent)]
    Tree(#[from] TreeError),

    /// Canonical encoding of an element failed.
    #[error(transparent)]
    Canonicalization(#[from] CanonicalizationError),
}

fn lift_capacity(err: TreeError) -> ContainerError {
    match err {
        TreeError::CapacityExceeded { len, max_depth } => {
            ContainerError::CapacityExceeded { len, max_depth }
        }
        other => ContainerError::Tree(other),
    }
}

/// Merkle leaf key of a dictionary key: the hash of its string form.
pub fn key_hash(key: &Key) -> Result<Hash, CanonicalizationError> {
    hash_canonical(&key.0)
}

/// An ordered sequence of values.
#[derive(Debug, Clone)]
pub struct Array {
    elements: Vec<Value>,
    max_depth: usize,
    tree: MerkleTree,
}

impl Array {
    pub(crate) const KIND: u8 = 0x00;

    /// Build an array of the given depth.
    ///
    /// # Errors
    ///
    /// [`ContainerError::CapacityExceeded`] if `elements.len() > 2^max_depth`.
    pub fn new(max_depth: usize, elements: Vec<Value>) -> Result<Self, ContainerError> {
        let mut leaves = Vec::with_capacity(elements.len());
        for (i, e) in elements.iter().enumerate() {
            leaves.push((Hash::from_index(i as u64), e.hash()?));
        }
        let tree = MerkleTree::new(max_depth, leaves).map_err(lift_capacity)?;
        Ok(Self {
            elements,
            max_depth,
            tree,
        })
    }

    /// The array's Merkle root.
    pub fn root(&self) -> Hash {
        self.tree.root()
    }

    /// The array's content hash: the root digested under the array kind
    /// byte, so it cannot collide with another container kind whose root
    /// happens to match (all empty containers share the zero root).
    pub fn content_hash(&self) -> Hash {
        container_digest(Self::KIND, &self.root())
    }

    /// The depth this array was built with.
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// True if the array has no elements.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Element at `index`, if in range.
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.elements.get(index)
    }

    /// All elements, in order.
    pub fn elements(&self) -> &[Value] {
        &self.elements
    }

    /// Prove that the element at `index` is included.
    ///
    /// # Errors
    ///
    /// [`TreeError::LeafNotFound`] (as [`ContainerError::Tree`]) when
    /// `index` is out of range.
    pub fn prove(&self, index: usize) -> Result<MerkleProof, ContainerError> {
        let (_, proof) = self.tree.prove(&Hash::from_index(index as u64))?;
        Ok(proof)
    }

    /// Verify that `element` sits at `index` under `root`.
    ///
    /// Returns `false` (rather than an error) on malformed input.
    pub fn verify(root: &Hash, index: usize, element: &Value, proof: &MerkleProof) -> bool {
        match element.hash() {
            Ok(h) => verify_inclusion(root, &Hash::from_index(index as u64), &h, proof),
            Err(_) => false,
        }
    }
}

impl PartialEq for Array {
    fn eq(&self, other: &Self) -> bool {
        self.root() == other.root()
    }
}
impl Eq for Array {}

impl PartialOrd for Array {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for Array {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.root().cmp(&other.root())
    }
}
impl std::hash::Hash for Array {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.root().hash(state);
    }
}

/// An unordered collection of unique values.
///
/// Uniqueness is semantic: two structurally equal values are one element,
/// however the input was ordered or duplicated.
#[derive(Debug, Clone)]
pub struct Set {
    elements: BTreeSet<Value>,
    max_depth: usize,
    tree: MerkleTree,
}

impl Set {
    pub(crate) const KIND: u8 = 0x01;

    /// Build a set of the given depth. Duplicate inputs collapse.
    pub fn new(
        max_depth: usize,
        elements: impl IntoIterator<Item = Value>,
    ) -> Result<Self, ContainerError> {
        let elements: BTreeSet<Value> = elements.into_iter().collect();
        let mut leaves = Vec::with_capacity(elements.len());
        for e in &elements {
            leaves.push((e.hash()?, EMPTY_HASH));
        }
        let tree = MerkleTree::new(max_depth, leaves).map_err(lift_capacity)?;
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

    /// The set's content hash, digested under the set kind byte.
    pub fn content_hash(&self) -> Hash {
        container_digest(Self::KIND, &self.root())
    }

    /// The depth this set was built with.
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Number of distinct elements.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// True if the set has no elements.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// True if `value` is an element.
    pub fn contains(&self, value: &Value) -> bool {
        self.elements.contains(value)
    }

    /// The elements in canonical order.
    pub fn elements(&self) -> impl Iterator<Item = &Value> {
        self.elements.iter()
    }

    /// Prove that `value` is an element.
    pub fn prove(&self, value: &Value) -> Result<MerkleProof, ContainerError> {
        let (_, proof) = self.tree.prove(&value.hash()?)?;
        Ok(proof)
    }

    /// Prove that `value` is not an element.
    pub fn prove_exclusion(&self, value: &Value) -> Result<MerkleProof, ContainerError> {
        Ok(self.tree.prove_exclusion(&value.hash()?)?)
    }

    /// Verify membership of `value` under `root`.
    pub fn verify(root: &Hash, value: &Value, proof: &MerkleProof) -> bool {
        match value.hash() {
            Ok(h) => verify_inclusion(root, &h, &EMPTY_HASH, proof),
            Err(_) => false,
        }
    }

    /// Verify non-membership of `value` under `root`.
    pub fn verify_exclusion(root: &Hash, value: &Value, proof: &MerkleProof) -> bool {
        match value.hash() {
            Ok(h) => verify_exclusion(root, &h, proof),
            Err(_) => false,
        }
    }
}

impl PartialEq for Set {
    fn eq(&self, other: &Self) -> bool {
        self.root() == other.root()
    }
}
impl Eq for Set {}

impl PartialOrd for Set {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for Set {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.root().cmp(&other.root())
    }
}
impl std::hash::Hash for Set {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.root().hash(state);
    }
}

/// A string-keyed map of values.
#[derive(Debug, Clone)]
pub struct Dictionary {
    kvs: BTreeMap<Key, Value>,
    max_depth: usize,
    tree: MerkleTree,
}

impl Dictionary {
    pub(crate) const KIND: u8 = 0x02;

    /// Build a dictionary of the given depth. Map semantics: a repeated
    /// key keeps the last value; insertion order never reaches the tree.
    pub fn new(
        max_depth: usize,
        kvs: impl IntoIterator<Item = (Key, Value)>,
    ) -> Result<Self, ContainerError> {
        let kvs: BTreeMap<Key, Value> = kvs.into_iter().collect();
        let mut leaves = Vec::with_capacity(kvs.len());
        for (k, v) in &kvs {
            leaves.push((key_hash(k)?, v.hash()?));
        }
        let tree = MerkleTree::new(max_depth, leaves).map_err(lift_capacity)?;
        Ok(Self {
            kvs,
            max_depth,
            tree,
        })
    }

    /// The dictionary's Merkle root.
    pub fn root(&self) -> Hash {
        self.tree.root()
    }

    /// The dictionary's content hash, digested under the dictionary kind
    /// byte.
    pub fn content_hash(&self) -> Hash {
        container_digest(Self::KIND, &self.root())
    }

    /// The depth this dictionary was built with.
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.kvs.len()
    }

    /// True if the dictionary has no entries.
    pub fn is_empty(&self) -> bool {
        self.kvs.is_empty()
    }

    /// Value under `key`, if present.
    pub fn get(&self, key: &Key) -> Option<&Value> {
        self.kvs.get(key)
    }

    /// All entries in key order.
    pub fn kvs(&self) -> &BTreeMap<Key, Value> {
        &self.kvs
    }

    /// Prove that `key` maps to its stored value.
    pub fn prove(&self, key: &Key) -> Result<MerkleProof, ContainerError> {
        let (_, proof) = self.tree.prove(&key_hash(key)?)?;
        Ok(proof)
    }

    /// Prove that `key` has no entry.
    pub fn prove_exclusion(&self, key: &Key) -> Result<MerkleProof, ContainerError> {
        Ok(self.tree.prove_exclusion(&key_hash(key)?)?)
    }

    /// Verify that `key` maps to `value` under `root`.
    pub fn verify(root: &Hash, key: &Key, value: &Value, proof: &MerkleProof) -> bool {
        match (key_hash(key), value.hash()) {
            (Ok(k), Ok(v)) => verify_inclusion(root, &k, &v, proof),
            _ => false,
        }
    }

    /// Verify that `key` has no entry under `root`.
    pub fn verify_exclusion(root: &Hash, key: &Key, proof: &MerkleProof) -> bool {
        match key_hash(key) {
            Ok(k) => verify_exclusion(root, &k, proof),
            Err(_) => false,
        }
    }
}

impl PartialEq for Dictionary {
    fn eq(&self, other: &Self) -> bool {
        self.root() == other.root()
    }
}
impl Eq for Dictionary {}

impl PartialOrd for Dictionary {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for Dictionary {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.root().cmp(&other.root())
    }
}
impl std::hash::Hash for Dictionary {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.root().hash(state);
    }
}

/// Recursively require every container reachable from `value` to have the
/// expected depth. The depth is a circuit parameter shared POD-wide;
/// a mismatched container is a construction-time error at the POD layer.
pub fn check_value_depth(value: &Value, expected: usize) -> Result<(), ContainerError> {
    match value {
        Value::Array(a) => {
            if a.max_depth() != expected {
                return Err(ContainerError::DepthMismatch {
                    found: a.max_depth(),
                    expected,
                });
            }
            a.elements().iter().try_for_each(|e| check_value_depth(e, expected))
        }
        Value::Set(s) => {
            if s.max_depth() != expected {
                return Err(ContainerError::DepthMismatch {
                    found: s.max_depth(),
                    expected,
                });
            }
            s.elements().try_for_each(|e| check_value_depth(e, expected))
        }
        Value::Dictionary(d) => {
            if d.max_depth() != expected {
                return Err(ContainerError::DepthMismatch {
                    found: d.max_depth(),
                    expected,
                });
            }
            d.kvs().values().try_for_each(|v| check_value_depth(v, expected))
        }
        _ => Ok(()),
    }
}
