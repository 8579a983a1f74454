//! # Schema Validation
//!
//! Runtime validation of untrusted JSON against the POD wire schema
//! (Draft 2019-09), followed by typed decoding.
//!
//! ## Security Invariant
//!
//! Schema validation is a trust boundary. Nothing downstream may treat a
//! deserialized object as a well-formed POD until it has passed one of
//! the `validate_*` functions here; cryptographic verification is a
//! separate, later step and must not run on structurally invalid input.
//!
//! ## Validator Cache
//!
//! The schema is embedded in the binary and static for the process
//! lifetime, so each target's validator is compiled once, lazily, behind
//! a `OnceLock`. Concurrent first calls converge on the same compiled
//! instance. Validation deliberately collects *every* violation rather
//! than failing fast, so a caller can surface the full diagnostic list
//! in one round trip.

use std::fmt;
use std::sync::OnceLock;

use jsonschema::{Draft, Validator};
use podkit_pod::{CustomPredicateBatch, MainPod, SignedPod};
use podkit_value::Value;
use thiserror::Error;

/// The POD wire schema, embedded at build time.
const SCHEMA_SRC: &str = include_str!("../schemas/pod.schema.json");

/// Error at the schema trust boundary.
#[derive(Error, Debug)]
pub enum SchemaError {
    /// The document did not conform to the schema. Carries every
    /// violation, not just the first.
    #[error("validation failed against '{schema_name}':\n{violations}")]
    ValidationFailed {
        /// The schema definition validated against.
        schema_name: String,
        /// Structured list of individual violations.
        violations: ValidationViolations,
    },

    /// The embedded schema itself is malformed. Fatal: the process
    /// cannot validate anything.
    #[error("schema compilation failed: {reason}")]
    CompilationFailure {
        /// Compiler diagnostic.
        reason: String,
    },

    /// A schema-conformant document still failed typed decoding, e.g. a
    /// container exceeding its declared depth's capacity.
    #[error("typed decoding failed after schema validation: {reason}")]
    DecodeFailed {
        /// Decoder diagnostic.
        reason: String,
    },
}

/// A single validation violation with structured context.
#[derive(Debug, Clone)]
pub struct Violation {
    /// JSON Pointer path to the violating field in the instance.
    pub instance_path: String,
    /// JSON Pointer path within the schema that triggered the error.
    pub schema_path: String,
    /// Human-readable description of the violation.
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.instance_path.is_empty() {
            write!(f, "  (root): {}", self.message)
        } else {
            write!(f, "  {}: {}", self.instance_path, self.message)
        }
    }
}

/// Collection of validation violations.
#[derive(Debug, Clone)]
pub struct ValidationViolations {
    violations: Vec<Violation>,
}

impl ValidationViolations {
    /// Returns the number of violations.
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    /// Returns true if there are no violations.
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Returns a slice of all violations.
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Consumes self and returns the inner Vec.
    pub fn into_inner(self) -> Vec<Violation> {
        self.violations
    }
}

impl fmt::Display for ValidationViolations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, v) in self.violations.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{v}")?;
        }
        Ok(())
    }
}

/// The schema definitions a document can be validated against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    Value,
    SignedPod,
    MainPod,
    CustomPredicateBatch,
}

impl Target {
    fn def_name(self) -> &'static str {
        match self {
            Target::Value => "value",
            Target::SignedPod => "signedPod",
            Target::MainPod => "mainPod",
            Target::CustomPredicateBatch => "customPredicateBatch",
        }
    }

    fn index(self) -> usize {
        match self {
            Target::Value => 0,
            Target::SignedPod => 1,
            Target::MainPod => 2,
            Target::CustomPredicateBatch => 3,
        }
    }
}

/// Compile a validator rooted at one `$defs` entry of the embedded
/// schema. The error is stringly typed so the cells below can hold it.
fn compile(target: Target) -> Result<Validator, String> {
    let mut doc: serde_json::Value =
        serde_json::from_str(SCHEMA_SRC).map_err(|e| format!("embedded schema is not JSON: {e}"))?;
    doc["$ref"] = serde_json::json!(format!("#/$defs/{}", target.def_name()));
    jsonschema::options()
        .with_draft(Draft::Draft201909)
        .build(&doc)
        .map_err(|e| e.to_string())
}

fn validator_for(target: Target) -> Result<&'static Validator, SchemaError> {
    static CELLS: [OnceLock<Result<Validator, String>>; 4] =
        [OnceLock::new(), OnceLock::new(), OnceLock::new(), OnceLock::new()];
    match CELLS[target.index()].get_or_init(|| compile(target)) {
        Ok(v) => Ok(v),
        Err(reason) => Err(SchemaError::CompilationFailure {
            reason: reason.clone(),
        }),
    }
}

/// Run a document against one target, collecting all violations.
fn check(target: Target, instance: &serde_json::Value) -> Result<(), SchemaError> {
    let validator = validator_for(target)?;
    let violations: Vec<Violation> = validator
        .iter_errors(instance)
        .map(|e| Violation {
            instance_path: e.instance_path.to_string(),
            schema_path: e.schema_path.to_string(),
            message: e.to_string(),
        })
        .collect();
    if violations.is_empty() {
        Ok(())
    } else {
        Err(SchemaError::ValidationFailed {
            schema_name: target.def_name().to_string(),
            violations: ValidationViolations { violations },
        })
    }
}

fn decode<T: serde::de::DeserializeOwned>(instance: &serde_json::Value) -> Result<T, SchemaError> {
    serde_json::from_value(instance.clone()).map_err(|e| SchemaError::DecodeFailed {
        reason: e.to_string(),
    })
}

/// Validate untrusted JSON as a [`Value`] and decode it.
pub fn validate_value(instance: &serde_json::Value) -> Result<Value, SchemaError> {
    check(Target::Value, instance)?;
    decode(instance)
}

/// Validate untrusted JSON as a [`SignedPod`] and decode it.
pub fn validate_signed_pod(instance: &serde_json::Value) -> Result<SignedPod, SchemaError> {
    check(Target::SignedPod, instance)?;
    decode(instance)
}

/// Validate untrusted JSON as a [`MainPod`] and decode it.
pub fn validate_main_pod(instance: &serde_json::Value) -> Result<MainPod, SchemaError> {
    check(Target::MainPod, instance)?;
    decode(instance)
}

/// Validate untrusted JSON as a [`CustomPredicateBatch`] and decode it.
pub fn validate_custom_predicate_batch(
    instance: &serde_json::Value,
) -> Result<CustomPredicateBatch, SchemaError> {
    check(Target::CustomPredicateBatch, instance)?;
    decode(instance)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_targets_compile() {
        for t in [
            Target::Value,
            Target::SignedPod,
            Target::MainPod,
            Target::CustomPredicateBatch,
        ] {
            assert!(validator_for(t).is_ok(), "{t:?}");
        }
    }

    #[test]
    fn test_validator_is_cached() {
        let a = validator_for(Target::Value).unwrap() as *const Validator;
        let b = validator_for(Target::Value).unwrap() as *const Validator;
        assert_eq!(a, b);
    }

    #[test]
    fn test_collects_multiple_violations() {
        // Missing every required field: one violation per missing field
        // at least.
        let err = validate_main_pod(&serde_json::json!({})).unwrap_err();
        match err {
            SchemaError::ValidationFailed { violations, .. } => {
                assert!(violations.len() >= 1);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
