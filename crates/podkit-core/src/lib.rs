//! # podkit-core — Foundational Types for the POD Value Model
//!
//! This crate is the leaf of the podkit dependency DAG. It defines the
//! primitives every other crate builds on:
//!
//! 1. **`Hash` / `PodId` / `Key` newtypes.** 32-byte content hashes with a
//!    fixed 64-hex wire encoding, and typed dictionary keys. No bare strings
//!    or byte slices for identifiers.
//!
//! 2. **`CanonicalBytes`.** ALL digest computation flows through
//!    `CanonicalBytes::new()`, which produces RFC 8785 (JCS) canonical JSON
//!    bytes. A digest computed over non-canonical bytes is unrepresentable
//!    by construction.
//!
//! 3. **Domain-separated SHA-256 digests.** Leaf, interior-node, and
//!    primitive-value hashing each get their own domain byte, so a forged
//!    leaf can never collide with an interior node.
//!
//! 4. **`Params`.** The circuit-level bounds shared by every POD entity,
//!    passed explicitly — never global state.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `podkit-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.
//! - All public types derive `Debug`, `Clone`, and implement
//!   `Serialize`/`Deserialize` (with `Debug` redacted where sensitive).

pub mod canonical;
pub mod digest;
pub mod error;
pub mod hash;
pub mod params;

pub use canonical::CanonicalBytes;
pub use digest::{
    container_digest, hash_canonical, leaf_digest, node_digest, value_digest, DOMAIN_CONTAINER,
    DOMAIN_LEAF, DOMAIN_NODE, DOMAIN_VALUE,
};
pub use error::{CanonicalizationError, HexError};
pub use hash::{Hash, Key, PodId, EMPTY_HASH};
pub use params::Params;
