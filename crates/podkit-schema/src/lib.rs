//! # podkit-schema — The POD Trust Boundary
//!
//! Validates untrusted JSON documents against the embedded POD wire
//! schema (Draft 2019-09) and decodes them into typed structs. This is
//! the only sanctioned path from raw JSON to a `SignedPod`, `MainPod`,
//! `Value`, or `CustomPredicateBatch`.
//!
//! ## Crate Policy
//!
//! - The schema lives in `schemas/pod.schema.json` and is embedded at
//!   build time; it must track the serde representations in
//!   `podkit-value` and `podkit-pod` exactly.
//! - Validation collects every violation with its JSON-pointer path, so
//!   callers can report a complete diagnostic list in one pass.

pub mod validate;

pub use validate::{
    validate_custom_predicate_batch, validate_main_pod, validate_signed_pod, validate_value,
    SchemaError, ValidationViolations, Violation,
};
