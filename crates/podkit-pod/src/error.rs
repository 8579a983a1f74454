//! The pod-layer error type.

use podkit_core::{Hash, PodId};
use podkit_value::ContainerError;
use thiserror::Error;

use crate::custom::PredicateError;
use crate::statement::ArityError;

/// Integrity-check failure on a POD wrapper.
#[derive(Error, Debug)]
pub enum PodError {
    /// The declared id is not the content hash of the entries.
    #[error("pod id {declared} does not match entries root {computed}")]
    IdMismatch {
        /// Id the POD claims.
        declared: PodId,
        /// Root actually computed from the entries.
        computed: Hash,
    },

    /// More public statements than the parameters allow.
    #[error("{count} public statements exceed the limit {max}")]
    TooManyPublicStatements { count: usize, max: usize },

    /// Container depth or capacity violation.
    #[error(transparent)]
    Container(#[from] ContainerError),

    /// A public statement has the wrong argument count.
    #[error(transparent)]
    Arity(#[from] ArityError),

    /// A custom predicate referenced by a statement is malformed.
    #[error(transparent)]
    Predicate(#[from] PredicateError),
}
