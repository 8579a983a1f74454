//! Statements: typed claims over POD data.

use std::fmt;

use podkit_core::{Key, PodId};
use podkit_value::Value;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::custom::CustomPredicateRef;

/// Argument-count violation when validating a statement.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ArityError {
    /// The statement carries the wrong number of arguments for its
    /// predicate.
    #[error("{predicate} takes {expected} arguments, got {found}")]
    Mismatch {
        /// Name of the offending predicate.
        predicate: String,
        /// Arity the predicate requires.
        expected: usize,
        /// Arguments actually supplied.
        found: usize,
    },

    /// A custom-predicate reference points past the end of its batch.
    #[error("custom predicate index {index} out of range for batch of {batch_size}")]
    UnknownCustomPredicate {
        /// Index the reference names.
        index: usize,
        /// Number of predicates the batch actually holds.
        batch_size: usize,
    },
}

/// The closed set of built-in predicates.
///
/// Arity is fixed per variant; see [`NativePredicate::arity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NativePredicate {
    None,
    False,
    Equal,
    NotEqual,
    Lt,
    LtEq,
    Gt,
    GtEq,
    Contains,
    NotContains,
    DictContains,
    DictNotContains,
    SetContains,
    SetNotContains,
    ArrayContains,
    SumOf,
    ProductOf,
    MaxOf,
    HashOf,
    PublicKeyOf,
}

impl NativePredicate {
    /// The exact number of arguments this predicate takes.
    ///
    /// Three-argument predicates are the keyed lookups (root, key, value)
    /// and the arithmetic relations (result, left, right); two-argument
    /// ones are comparisons and membership; `None`/`False` take nothing.
    pub fn arity(self) -> usize {
        use NativePredicate::*;
        match self {
            None | False => 0,
            Equal | NotEqual | Lt | LtEq | Gt | GtEq | PublicKeyOf => 2,
            NotContains | DictNotContains | SetContains | SetNotContains => 2,
            Contains | DictContains | ArrayContains => 3,
            SumOf | ProductOf | MaxOf | HashOf => 3,
        }
    }

    /// The predicate's wire name.
    pub fn name(self) -> &'static str {
        use NativePredicate::*;
        match self {
            None => "None",
            False => "False",
            Equal => "Equal",
            NotEqual => "NotEqual",
            Lt => "Lt",
            LtEq => "LtEq",
            Gt => "Gt",
            GtEq => "GtEq",
            Contains => "Contains",
            NotContains => "NotContains",
            DictContains => "DictContains",
            DictNotContains => "DictNotContains",
            SetContains => "SetContains",
            SetNotContains => "SetNotContains",
            ArrayContains => "ArrayContains",
            SumOf => "SumOf",
            ProductOf => "ProductOf",
            MaxOf => "MaxOf",
            HashOf => "HashOf",
            PublicKeyOf => "PublicKeyOf",
        }
    }
}

impl fmt::Display for NativePredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A pointer to one entry inside one POD.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnchoredKey {
    /// The POD holding the entry.
    pub pod_id: PodId,
    /// The entry's key.
    pub key: Key,
}

impl AnchoredKey {
    pub fn new(pod_id: PodId, key: impl Into<Key>) -> Self {
        Self {
            pod_id,
            key: key.into(),
        }
    }
}

impl fmt::Display for AnchoredKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.pod_id, self.key)
    }
}

/// A statement operand: an inline constant or a reference into a POD.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum ValueRef {
    /// An inline value.
    Literal(Value),
    /// A reference to a POD entry.
    Key(AnchoredKey),
}

impl fmt::Display for ValueRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueRef::Literal(v) => write!(f, "{v}"),
            ValueRef::Key(ak) => write!(f, "{ak}"),
        }
    }
}

impl From<Value> for ValueRef {
    fn from(v: Value) -> Self {
        ValueRef::Literal(v)
    }
}

impl From<AnchoredKey> for ValueRef {
    fn from(ak: AnchoredKey) -> Self {
        ValueRef::Key(ak)
    }
}

/// The relation a statement claims: one of the closed native set, or a
/// predicate from a user-defined batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Predicate {
    Native(NativePredicate),
    Custom(CustomPredicateRef),
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::Native(p) => write!(f, "{p}"),
            Predicate::Custom(r) => write!(f, "{r}"),
        }
    }
}

/// A typed claim: a predicate applied to operands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statement {
    pub predicate: Predicate,
    pub args: Vec<ValueRef>,
}

impl Statement {
    pub fn new(predicate: Predicate, args: Vec<ValueRef>) -> Self {
        Self { predicate, args }
    }

    /// Check that the argument count matches the predicate's arity.
    ///
    /// For custom predicates the expected count comes from the referenced
    /// predicate's declared `args_len`.
    pub fn validate(&self) -> Result<(), ArityError> {
        let (name, expected) = match &self.predicate {
            Predicate::Native(p) => (p.name().to_string(), p.arity()),
            Predicate::Custom(r) => {
                let pred = r.predicate().ok_or(ArityError::UnknownCustomPredicate {
                    index: r.index,
                    batch_size: r.batch.predicates.len(),
                })?;
                (pred.name.clone(), pred.args_len)
            }
        };
        if self.args.len() != expected {
            return Err(ArityError::Mismatch {
                predicate: name,
                expected,
                found: self.args.len(),
            });
        }
        Ok(())
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.predicate)?;
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{arg}")?;
        }
        f.write_str(")")
    }
}
