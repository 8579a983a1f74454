//! # Domain-Separated SHA-256 Digests
//!
//! Every hash in podkit is SHA-256 over a one-byte domain tag followed by
//! the payload. Three domains exist:
//!
//! - [`DOMAIN_LEAF`] (`0x00`) — Merkle leaf over `key || value`.
//! - [`DOMAIN_NODE`] (`0x01`) — Merkle interior node over `left || right`.
//! - [`DOMAIN_VALUE`] (`0x02`) — a primitive value's canonical encoding.
//! - [`DOMAIN_CONTAINER`] (`0x03`) — a container's kind byte and root.
//!
//! Separation means a leaf digest can never be replayed as an interior node
//! (or vice versa) to forge a proof, and a primitive's hash can never
//! collide with a container root by construction.
//!
//! The value domain accepts only [`CanonicalBytes`], so every content hash
//! in the system is pinned to the JCS pipeline.

use sha2::{Digest, Sha256};

use crate::canonical::CanonicalBytes;
use crate::hash::Hash;

/// Domain byte for Merkle leaves.
pub const DOMAIN_LEAF: u8 = 0x00;
/// Domain byte for Merkle interior nodes.
pub const DOMAIN_NODE: u8 = 0x01;
/// Domain byte for primitive value encodings.
pub const DOMAIN_VALUE: u8 = 0x02;
/// Domain byte for container content hashes.
pub const DOMAIN_CONTAINER: u8 = 0x03;

fn sha256_tagged(domain: u8, parts: &[&[u8]]) -> Hash {
    let mut hasher = Sha256::new();
    hasher.update([domain]);
    for p in parts {
        hasher.update(p);
    }
    let mut out = [0u8; 32];
    out.copy_from_slice(&hasher.finalize());
    Hash(out)
}

/// Merkle leaf digest: `SHA256(0x00 || key || value)`.
pub fn leaf_digest(key: &Hash, value: &Hash) -> Hash {
    sha256_tagged(DOMAIN_LEAF, &[key.as_bytes(), value.as_bytes()])
}

/// Merkle interior-node digest: `SHA256(0x01 || left || right)`.
pub fn node_digest(left: &Hash, right: &Hash) -> Hash {
    sha256_tagged(DOMAIN_NODE, &[left.as_bytes(), right.as_bytes()])
}

/// Primitive-value digest: `SHA256(0x02 || canonical_bytes)`.
pub fn value_digest(data: &CanonicalBytes) -> Hash {
    sha256_tagged(DOMAIN_VALUE, &[data.as_bytes()])
}

/// Container content digest: `SHA256(0x03 || kind || root)`.
///
/// The kind byte keeps container kinds apart even when their Merkle
/// roots coincide. All empty containers share the all-zero root, so a
/// raw-root content hash would make an empty array, set, and dictionary
/// one value.
pub fn container_digest(kind: u8, root: &Hash) -> Hash {
    sha256_tagged(DOMAIN_CONTAINER, &[&[kind], root.as_bytes()])
}

/// Canonicalize a serializable value and digest it in the value domain.
///
/// Convenience for the common encode-then-hash path.
pub fn hash_canonical(
    obj: &impl serde::Serialize,
) -> Result<Hash, crate::error::CanonicalizationError> {
    Ok(value_digest(&CanonicalBytes::new(obj)?))
}
