//! User-defined predicates, grouped into content-addressed batches.
//!
//! A custom predicate is a conjunction or disjunction of statement
//! templates over wildcard variables. The first `args_len` wildcards are
//! the predicate's formal parameters; the rest are existentially bound.
//! Predicates are scoped to a batch, and statements reference them as
//! (batch, index) pairs.

use std::fmt;
use std::sync::Arc;

use podkit_core::{hash_canonical, CanonicalizationError, Hash, Key, Params};
use podkit_value::Value;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::statement::Predicate;

/// Error constructing a custom predicate or batch.
#[derive(Error, Debug)]
pub enum PredicateError {
    /// A template references a wildcard index the predicate never
    /// declared.
    #[error("wildcard index {index} out of range: predicate declares {wildcard_count} wildcards")]
    InvalidWildcardReference {
        /// Index the template references.
        index: usize,
        /// Wildcards the predicate declares.
        wildcard_count: usize,
    },

    /// More formal parameters than declared wildcards.
    #[error("args_len {args_len} exceeds the {wildcard_count} declared wildcards")]
    ArgsExceedWildcards { args_len: usize, wildcard_count: usize },

    /// A circuit-parameter bound was exceeded.
    #[error("{what}: {found} exceeds the limit {max}")]
    LimitExceeded {
        what: &'static str,
        found: usize,
        max: usize,
    },

    /// Canonical encoding failed while deriving the batch id.
    #[error(transparent)]
    Canonicalization(#[from] CanonicalizationError),
}

/// A named variable slot inside a predicate definition.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Wildcard {
    pub name: String,
    pub index: usize,
}

impl Wildcard {
    pub fn new(name: impl Into<String>, index: usize) -> Self {
        Self {
            name: name.into(),
            index,
        }
    }
}

impl fmt::Display for Wildcard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "?{}", self.name)
    }
}

/// A template operand: a constant, an anchored key whose POD is a
/// wildcard, or a bare wildcard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StatementTmplArg {
    Literal(Value),
    AnchoredKey(Wildcard, Key),
    Wildcard(Wildcard),
}

impl StatementTmplArg {
    fn wildcard_index(&self) -> Option<usize> {
        match self {
            StatementTmplArg::Literal(_) => None,
            StatementTmplArg::AnchoredKey(w, _) => Some(w.index),
            StatementTmplArg::Wildcard(w) => Some(w.index),
        }
    }
}

/// One statement shape inside a custom predicate's body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatementTemplate {
    pub predicate: Predicate,
    pub args: Vec<StatementTmplArg>,
}

/// A user-defined predicate: a conjunction (`conjunction: true`) or
/// disjunction of statement templates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomPredicate {
    pub name: String,
    pub conjunction: bool,
    pub statements: Vec<StatementTemplate>,
    /// How many of the wildcards are formal parameters.
    pub args_len: usize,
    /// Every wildcard, formal parameters first.
    pub wildcard_names: Vec<String>,
}

impl CustomPredicate {
    /// Check internal consistency and the parameter bounds.
    pub fn validate(&self, params: &Params) -> Result<(), PredicateError> {
        let wildcard_count = self.wildcard_names.len();
        if self.args_len > wildcard_count {
            return Err(PredicateError::ArgsExceedWildcards {
                args_len: self.args_len,
                wildcard_count,
            });
        }
        if self.args_len > params.max_custom_predicate_arity {
            return Err(PredicateError::LimitExceeded {
                what: "custom predicate arity",
                found: self.args_len,
                max: params.max_custom_predicate_arity,
            });
        }
        if wildcard_count > params.max_custom_predicate_wildcards {
            return Err(PredicateError::LimitExceeded {
                what: "custom predicate wildcards",
                found: wildcard_count,
                max: params.max_custom_predicate_wildcards,
            });
        }
        for tmpl in &self.statements {
            if tmpl.args.len() > params.max_statement_args {
                return Err(PredicateError::LimitExceeded {
                    what: "statement template arguments",
                    found: tmpl.args.len(),
                    max: params.max_statement_args,
                });
            }
            for arg in &tmpl.args {
                if let Some(index) = arg.wildcard_index() {
                    if index >= wildcard_count {
                        return Err(PredicateError::InvalidWildcardReference {
                            index,
                            wildcard_count,
                        });
                    }
                }
            }
        }
        Ok(())
    }
}

/// A validated group of custom predicates, addressed by content hash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomPredicateBatch {
    pub name: String,
    pub predicates: Vec<CustomPredicate>,
}

impl CustomPredicateBatch {
    /// Validate every predicate and the batch size against `params`.
    pub fn new(
        name: impl Into<String>,
        predicates: Vec<CustomPredicate>,
        params: &Params,
    ) -> Result<Self, PredicateError> {
        let batch = Self {
            name: name.into(),
            predicates,
        };
        batch.validate(params)?;
        Ok(batch)
    }

    /// Check the batch size bound and every predicate against `params`.
    ///
    /// Deserialized batches bypass [`CustomPredicateBatch::new`], so they
    /// must pass through here before being trusted.
    pub fn validate(&self, params: &Params) -> Result<(), PredicateError> {
        if self.predicates.len() > params.max_custom_batch_size {
            return Err(PredicateError::LimitExceeded {
                what: "custom batch size",
                found: self.predicates.len(),
                max: params.max_custom_batch_size,
            });
        }
        for p in &self.predicates {
            p.validate(params)?;
        }
        Ok(())
    }

    /// Content hash identifying this batch.
    pub fn id(&self) -> Result<Hash, CanonicalizationError> {
        hash_canonical(self)
    }

    /// Reference a predicate in this batch by name.
    pub fn predicate_ref_by_name(self: &Arc<Self>, name: &str) -> Option<CustomPredicateRef> {
        let index = self.predicates.iter().position(|p| p.name == name)?;
        Some(CustomPredicateRef {
            batch: Arc::clone(self),
            index,
        })
    }
}

/// A (batch, index) reference to a custom predicate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomPredicateRef {
    pub batch: Arc<CustomPredicateBatch>,
    pub index: usize,
}

impl CustomPredicateRef {
    /// The referenced predicate, if the index is in range.
    pub fn predicate(&self) -> Option<&CustomPredicate> {
        self.batch.predicates.get(self.index)
    }
}

impl fmt::Display for CustomPredicateRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.predicate() {
            Some(p) => write!(f, "{}.{}", self.batch.name, p.name),
            None => write!(f, "{}.#{}", self.batch.name, self.index),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statement::{NativePredicate, Statement, ValueRef};

    fn params() -> Params {
        Params::default()
    }

    fn age_over(threshold: i64, wildcard_count: usize) -> CustomPredicate {
        CustomPredicate {
            name: "age_over".to_string(),
            conjunction: true,
            statements: vec![StatementTemplate {
                predicate: Predicate::Native(NativePredicate::Gt),
                args: vec![
                    StatementTmplArg::AnchoredKey(Wildcard::new("pod", 0), Key::from("age")),
                    StatementTmplArg::Literal(Value::from(threshold)),
                ],
            }],
            args_len: 1,
            wildcard_names: (0..wildcard_count).map(|i| format!("w{i}")).collect(),
        }
    }

    #[test]
    fn test_valid_predicate_passes() {
        assert!(age_over(18, 1).validate(&params()).is_ok());
    }

    #[test]
    fn test_out_of_range_wildcard_rejected() {
        let mut p = age_over(18, 1);
        p.statements[0].args[0] =
            StatementTmplArg::AnchoredKey(Wildcard::new("pod", 3), Key::from("age"));
        assert!(matches!(
            p.validate(&params()),
            Err(PredicateError::InvalidWildcardReference {
                index: 3,
                wildcard_count: 1,
            })
        ));
    }

    #[test]
    fn test_args_len_beyond_wildcards_rejected() {
        let mut p = age_over(18, 1);
        p.args_len = 2;
        assert!(matches!(
            p.validate(&params()),
            Err(PredicateError::ArgsExceedWildcards { .. })
        ));
    }

    #[test]
    fn test_batch_size_bound() {
        let p = params();
        let too_many = vec![age_over(18, 1); p.max_custom_batch_size + 1];
        assert!(matches!(
            CustomPredicateBatch::new("big", too_many, &p),
            Err(PredicateError::LimitExceeded { what: "custom batch size", .. })
        ));
    }

    #[test]
    fn test_deserialized_oversized_batch_fails_validate() {
        let p = params();
        let oversized = CustomPredicateBatch {
            name: "big".to_string(),
            predicates: vec![age_over(18, 1); p.max_custom_batch_size + 1],
        };
        let json = serde_json::to_string(&oversized).unwrap();
        let decoded: CustomPredicateBatch = serde_json::from_str(&json).unwrap();
        assert!(matches!(
            decoded.validate(&p),
            Err(PredicateError::LimitExceeded { what: "custom batch size", .. })
        ));
    }

    #[test]
    fn test_batch_id_depends_on_content() {
        let p = params();
        let a = CustomPredicateBatch::new("b", vec![age_over(18, 1)], &p).unwrap();
        let b = CustomPredicateBatch::new("b", vec![age_over(21, 1)], &p).unwrap();
        assert_ne!(a.id().unwrap(), b.id().unwrap());
        assert_eq!(a.id().unwrap(), a.clone().id().unwrap());
    }

    #[test]
    fn test_predicate_ref_by_name_and_custom_statement_arity() {
        let batch = Arc::new(
            CustomPredicateBatch::new("auth", vec![age_over(18, 1)], &params()).unwrap(),
        );
        let r = batch.predicate_ref_by_name("age_over").unwrap();
        assert_eq!(r.index, 0);
        assert!(batch.predicate_ref_by_name("nope").is_none());

        let good = Statement::new(
            Predicate::Custom(r.clone()),
            vec![ValueRef::Literal(Value::from(1))],
        );
        assert!(good.validate().is_ok());

        let bad = Statement::new(Predicate::Custom(r), vec![]);
        assert!(bad.validate().is_err());
    }
}
