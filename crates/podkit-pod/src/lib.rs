//! # podkit-pod — Statements and POD Wrappers
//!
//! The claim layer on top of the value model: typed statements over
//! anchored keys, user-defined predicate batches, and the two POD
//! wrappers (`SignedPod`, `MainPod`) that carry opaque signature/proof
//! payloads produced by an external backend.
//!
//! Everything here is pure data plus validation. Whether a statement is
//! actually *true* of some POD's entries is the proving backend's
//! business; this crate only enforces that the shapes are well formed
//! (arity, wildcard references, parameter bounds, id/root agreement).

pub mod backend;
pub mod custom;
pub mod error;
pub mod main_pod;
pub mod signed;
pub mod statement;
pub mod vdset;

pub use backend::{BackendError, PodProver, PodSigner, PodVerifier};
pub use custom::{
    CustomPredicate, CustomPredicateBatch, CustomPredicateRef, PredicateError, StatementTemplate,
    StatementTmplArg, Wildcard,
};
pub use error::PodError;
pub use main_pod::MainPod;
pub use signed::SignedPod;
pub use statement::{AnchoredKey, ArityError, NativePredicate, Predicate, Statement, ValueRef};
pub use vdset::VDSet;
