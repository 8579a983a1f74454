//! # podkit-value — The POD Value Model
//!
//! Defines `Value`, the tagged union every POD entry is made of, together
//! with its canonical JSON codec and the three Merkle-backed containers.
//!
//! ## Wire encoding
//!
//! `String` and `Bool` serialize untagged (bare JSON string/bool). The
//! remaining primitives serialize as single-key objects whose key is the
//! variant tag (`Int`, `Raw`, `PublicKey`, `SecretKey`, `PodId`), and
//! containers serialize structurally (`array`/`set`/`kvs` plus
//! `max_depth`). Decoding therefore has to sniff shapes: JSON type first,
//! then the recognized container fields, then a single recognized tag key.
//! Nothing else is a `Value`.
//!
//! ## Hashing
//!
//! A primitive hashes as the domain-tagged digest of its canonical (JCS)
//! encoding; a container hashes as its Merkle root digested under a
//! per-kind tag (empty containers of different kinds share the zero root
//! but must remain distinct values). Hashes are therefore independent of
//! insertion order for `Dictionary` and `Set` — a correctness
//! requirement, not an optimization.

pub mod codec;
pub mod containers;
pub mod value;

pub use codec::DecodeError;
pub use containers::{Array, ContainerError, Dictionary, Set};
pub use value::{SecretKey, Value};
