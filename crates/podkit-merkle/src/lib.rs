//! # podkit-merkle — Fixed-Depth Sparse Merkle Tree
//!
//! The authenticated structure behind every POD container. A tree maps
//! 32-byte keys to 32-byte values; a leaf's position is the prefix of its
//! key's bits, up to the fixed `max_depth` shared by all containers in a
//! POD. Subtrees holding a single leaf collapse to that leaf, so sibling
//! paths are compressed and the empty tree is the all-zero root constant.
//!
//! Hashing is domain-separated SHA-256 from `podkit-core`: leaves and
//! interior nodes live in different domains, so neither can impersonate
//! the other inside a proof.
//!
//! ## Crate Policy
//!
//! - Depends only on `podkit-core` internally.
//! - Trees are immutable once built; proofs are plain data.
//! - No `unsafe`, no panics outside tests.

pub mod proof;
pub mod tree;

pub use proof::{verify_exclusion, verify_inclusion, MerkleProof};
pub use tree::{MerkleTree, TreeError};
