//! The `Value` tagged union and its content hashing.

use std::fmt;

use podkit_core::{hash_canonical, CanonicalizationError, Hash, PodId};

use crate::containers::{Array, Dictionary, Set};

/// A secret-key string. Functionally a plain string on the wire, but its
/// `Debug` output is redacted so key material does not leak into logs.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SecretKey(String);

impl SecretKey {
    /// Wrap secret-key material.
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Access the underlying string. Call sites own the decision to
    /// surface key material.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretKey(<redacted>)")
    }
}

/// A POD value: exactly one tag active.
///
/// `Int` is an `i64` in memory but travels as a decimal string so bindings
/// without 64-bit integers do not lose precision. `Raw` and `PodId` are
/// 32-byte quantities with a fixed 64-hex wire form.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Value {
    /// Bare JSON string.
    String(String),
    /// Bare JSON bool.
    Bool(bool),
    /// 64-bit signed integer, wire-encoded as a decimal string.
    Int(i64),
    /// Uninterpreted 32 bytes.
    Raw(Hash),
    /// Public-key string.
    PublicKey(String),
    /// Secret-key string; Debug-redacted.
    SecretKey(SecretKey),
    /// Reference to a POD by content hash.
    PodId(PodId),
    /// Ordered Merkle-backed sequence.
    Array(Array),
    /// Unordered Merkle-backed collection of unique values.
    Set(Set),
    /// Merkle-backed string-keyed map.
    Dictionary(Dictionary),
}

impl Value {
    /// The content hash of this value.
    ///
    /// Primitives hash their canonical encoding in the value domain;
    /// containers hash their (precomputed) Merkle root under a per-kind
    /// domain tag. Root-derived hashing makes semantically equal
    /// containers hash identically regardless of how they were
    /// assembled; the kind tag keeps an empty array, set, and dictionary
    /// apart even though all three share the zero root.
    pub fn hash(&self) -> Result<Hash, CanonicalizationError> {
        match self {
            Value::Array(a) => Ok(a.content_hash()),
            Value::Set(s) => Ok(s.content_hash()),
            Value::Dictionary(d) => Ok(d.content_hash()),
            primitive => hash_canonical(&crate::codec::to_json(primitive)),
        }
    }

    /// Variant tag name, for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::String(_) => "String",
            Value::Bool(_) => "Bool",
            Value::Int(_) => "Int",
            Value::Raw(_) => "Raw",
            Value::PublicKey(_) => "PublicKey",
            Value::SecretKey(_) => "SecretKey",
            Value::PodId(_) => "PodId",
            Value::Array(_) => "Array",
            Value::Set(_) => "Set",
            Value::Dictionary(_) => "Dictionary",
        }
    }

    /// The string payload, if this is a `String`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// The integer payload, if this is an `Int`.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// The bool payload, if this is a `Bool`.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => write!(f, "{s:?}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Raw(h) => write!(f, "0x{h}"),
            Value::PublicKey(pk) => write!(f, "pk:{pk}"),
            Value::SecretKey(_) => f.write_str("sk:<redacted>"),
            Value::PodId(id) => write!(f, "pod:{id}"),
            Value::Array(a) => write!(f, "array({}, root={})", a.len(), a.root()),
            Value::Set(s) => write!(f, "set({}, root={})", s.len(), s.root()),
            Value::Dictionary(d) => write!(f, "dict({}, root={})", d.len(), d.root()),
        }
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<Array> for Value {
    fn from(a: Array) -> Self {
        Value::Array(a)
    }
}

impl From<Set> for Value {
    fn from(s: Set) -> Self {
        Value::Set(s)
    }
}

impl From<Dictionary> for Value {
    fn from(d: Dictionary) -> Self {
        Value::Dictionary(d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secret_key_debug_redacted() {
        let v = Value::SecretKey(SecretKey::new("hunter2"));
        let dbg = format!("{v:?}");
        assert!(!dbg.contains("hunter2"));
        assert!(dbg.contains("redacted"));
    }

    #[test]
    fn test_secret_key_display_redacted() {
        let v = Value::SecretKey(SecretKey::new("hunter2"));
        assert!(!format!("{v}").contains("hunter2"));
    }

    #[test]
    fn test_primitive_hashes_differ_by_tag() {
        // "5" the string and 5 the int must not collide.
        let s = Value::String("5".to_string()).hash().unwrap();
        let i = Value::Int(5).hash().unwrap();
        assert_ne!(s, i);
    }

    #[test]
    fn test_hash_deterministic() {
        let v = Value::PublicKey("pk-abc".to_string());
        assert_eq!(v.hash().unwrap(), v.hash().unwrap());
    }

    #[test]
    fn test_int_and_raw_do_not_collide() {
        let r = Value::Raw(Hash::from_index(5)).hash().unwrap();
        let i = Value::Int(5).hash().unwrap();
        assert_ne!(r, i);
    }

    #[test]
    fn test_accessors() {
        assert_eq!(Value::from(7).as_int(), Some(7));
        assert_eq!(Value::from("x").as_str(), Some("x"));
        assert_eq!(Value::from(true).as_bool(), Some(true));
        assert_eq!(Value::from(7).as_str(), None);
    }
}
