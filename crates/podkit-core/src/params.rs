//! # Circuit Parameter Bounds
//!
//! `Params` collects the circuit-level limits that constrain every POD
//! entity: statement counts, argument counts, custom-predicate shapes, and
//! the fixed Merkle depth shared by all containers in a POD. A `Params`
//! is immutable after construction and is threaded explicitly through
//! constructors and integrity checks — never read from global state.

use serde::{Deserialize, Serialize};

/// Circuit-level bounds shared across a MainPod.
///
/// Checked at validation time; never mutated after POD creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Params {
    /// Maximum number of input SignedPods a MainPod may consume.
    pub max_input_signed_pods: usize,
    /// Maximum number of input MainPods a MainPod may consume.
    pub max_input_main_pods: usize,
    /// Total statement slots (public + private).
    pub max_statements: usize,
    /// Statement slots exposed in `public_statements`.
    pub max_public_statements: usize,
    /// Maximum operands per statement.
    pub max_statement_args: usize,
    /// Maximum formal parameters of a custom predicate.
    pub max_custom_predicate_arity: usize,
    /// Maximum wildcards (formal + private) in a custom predicate.
    pub max_custom_predicate_wildcards: usize,
    /// Maximum predicates per custom-predicate batch.
    pub max_custom_batch_size: usize,
    /// Fixed Merkle depth for Array/Set/Dictionary containers.
    /// Container cardinality is bounded by `2^max_depth_mt_containers`.
    pub max_depth_mt_containers: usize,
    /// Fixed Merkle depth for the verifier-data set.
    pub max_depth_mt_vd_set: usize,
}

impl Params {
    /// Capacity of a single container under these bounds.
    pub fn max_container_len(&self) -> usize {
        1usize << self.max_depth_mt_containers.min(usize::BITS as usize - 1)
    }

    /// Statement slots reserved for private statements.
    ///
    /// Zero when `max_public_statements` meets or exceeds `max_statements`.
    pub fn max_priv_statements(&self) -> usize {
        self.max_statements.saturating_sub(self.max_public_statements)
    }
}

impl Default for Params {
    fn default() -> Self {
        Self {
            max_input_signed_pods: 3,
            max_input_main_pods: 3,
            max_statements: 24,
            max_public_statements: 8,
            max_statement_args: 5,
            max_custom_predicate_arity: 5,
            max_custom_predicate_wildcards: 12,
            max_custom_batch_size: 8,
            max_depth_mt_containers: 32,
            max_depth_mt_vd_set: 6,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priv_statement_slots() {
        let p = Params::default();
        assert_eq!(p.max_priv_statements(), p.max_statements - p.max_public_statements);

        let lopsided = Params {
            max_statements: 4,
            max_public_statements: 10,
            ..Params::default()
        };
        assert_eq!(lopsided.max_priv_statements(), 0);
    }

    #[test]
    fn test_container_capacity() {
        let p = Params {
            max_depth_mt_containers: 4,
            ..Params::default()
        };
        assert_eq!(p.max_container_len(), 16);
    }

    #[test]
    fn test_serde_rejects_unknown_fields() {
        let json = serde_json::json!({
            "max_input_signed_pods": 3,
            "max_input_main_pods": 3,
            "max_statements": 24,
            "max_public_statements": 8,
            "max_statement_args": 5,
            "max_custom_predicate_arity": 5,
            "max_custom_predicate_wildcards": 12,
            "max_custom_batch_size": 8,
            "max_depth_mt_containers": 32,
            "max_depth_mt_vd_set": 6,
            "bogus": 1
        });
        assert!(serde_json::from_value::<Params>(json).is_err());
    }

    #[test]
    fn test_round_trip() {
        let p = Params::default();
        let json = serde_json::to_value(p).unwrap();
        let back: Params = serde_json::from_value(json).unwrap();
        assert_eq!(back, p);
    }
}
