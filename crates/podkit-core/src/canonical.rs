//! # Canonical Serialization — JCS Byte Production
//!
//! `CanonicalBytes` is the sole construction path for bytes that feed digest
//! computation anywhere in podkit. The inner buffer is private; the only
//! constructor serializes through RFC 8785 (JSON Canonicalization Scheme):
//! sorted keys, compact separators, deterministic UTF-8 output.
//!
//! Two rules beyond plain JCS:
//!
//! - **Floats are rejected.** POD integers travel as i64 or decimal strings;
//!   a float in a value tree is a bug, not data, and its canonical number
//!   form differs between bindings.
//! - **Object key order is irrelevant.** JCS sorting makes the bytes (and
//!   hence every digest) independent of insertion order. Order independence
//!   for Dictionary and Set hashing starts here.

use serde::Serialize;
use serde_json::Value;

use crate::error::CanonicalizationError;

/// Canonical JCS bytes of a serializable value.
///
/// The only constructor is [`CanonicalBytes::new`]. Functions that hash
/// accept `&CanonicalBytes`, never raw `&[u8]`, so a digest over
/// non-canonical bytes cannot be expressed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalBytes(Vec<u8>);

impl CanonicalBytes {
    /// Canonicalize any serializable value.
    ///
    /// # Errors
    ///
    /// Returns [`CanonicalizationError::FloatRejected`] if the value tree
    /// contains a non-integer number, or
    /// [`CanonicalizationError::SerializationFailed`] if JSON serialization
    /// fails.
    pub fn new(obj: &impl Serialize) -> Result<Self, CanonicalizationError> {
        let value = serde_json::to_value(obj)?;
        reject_floats(&value)?;
        let s = serde_jcs::to_string(&value)?;
        Ok(Self(s.into_bytes()))
    }

    /// The canonical bytes, for digest computation.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Length of the canonical byte sequence.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if the canonical byte sequence is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<[u8]> for CanonicalBytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Walk the value tree and reject any number not representable as i64/u64.
fn reject_floats(value: &Value) -> Result<(), CanonicalizationError> {
    match value {
        Value::Null | Value::Bool(_) | Value::String(_) => Ok(()),
        Value::Number(n) => {
            if n.is_f64() && !n.is_i64() && !n.is_u64() {
                if let Some(f) = n.as_f64() {
                    return Err(CanonicalizationError::FloatRejected(f));
                }
            }
            Ok(())
        }
        Value::Object(map) => map.values().try_for_each(reject_floats),
        Value::Array(arr) => arr.iter().try_for_each(reject_floats),
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    /// JSON values over the float-free domain PODs live in.
    fn pod_json_value() -> impl Strategy<Value = Value> {
        let leaf = prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            any::<i64>().prop_map(|n| serde_json::json!(n)),
            "[a-zA-Z0-9_ ]{0,40}".prop_map(Value::String),
        ];
        leaf.prop_recursive(4, 64, 8, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..8).prop_map(Value::Array),
                prop::collection::btree_map("[a-z_]{1,10}", inner, 0..8).prop_map(|m| {
                    Value::Object(m.into_iter().collect())
                }),
            ]
        })
    }

    proptest! {
        /// Canonicalization is total over the float-free domain.
        #[test]
        fn never_fails_without_floats(value in pod_json_value()) {
            prop_assert!(CanonicalBytes::new(&value).is_ok());
        }

        /// Same input, same bytes.
        #[test]
        fn deterministic(value in pod_json_value()) {
            let a = CanonicalBytes::new(&value).unwrap();
            let b = CanonicalBytes::new(&value).unwrap();
            prop_assert_eq!(a.as_bytes(), b.as_bytes());
        }

        /// Canonical output re-parses to the same value tree.
        #[test]
        fn round_trips_as_json(value in pod_json_value()) {
            let cb = CanonicalBytes::new(&value).unwrap();
            let parsed: Value = serde_json::from_slice(cb.as_bytes()).unwrap();
            prop_assert_eq!(parsed, value);
        }

        /// Keys come out sorted no matter how they went in.
        #[test]
        fn keys_sorted(keys in prop::collection::btree_set("[a-z]{1,8}", 2..6)) {
            let map: serde_json::Map<String, Value> = keys
                .iter()
                .enumerate()
                .map(|(i, k)| (k.clone(), serde_json::json!(i)))
                .collect();
            let cb = CanonicalBytes::new(&Value::Object(map)).unwrap();
            let parsed: serde_json::Map<String, Value> =
                serde_json::from_slice(cb.as_bytes()).unwrap();
            let out: Vec<&String> = parsed.keys().collect();
            let mut sorted = out.clone();
            sorted.sort();
            prop_assert_eq!(out, sorted);
        }
    }
}
