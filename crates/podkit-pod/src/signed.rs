//! SignedPod: a dictionary of entries plus an opaque signature payload.

use podkit_core::{Key, Params, PodId};
use podkit_value::{containers::check_value_depth, Dictionary, Value};
use serde::{Deserialize, Serialize};

use crate::error::PodError;

/// A POD whose trust comes from a signature over its entries.
///
/// The `data` payload is the signer backend's business and passes through
/// this crate unchanged; everything checkable without cryptography lives
/// in [`SignedPod::check_integrity`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedPod {
    /// Content hash of `entries`.
    pub id: PodId,
    /// The signed entries.
    pub entries: Dictionary,
    /// Backend type code and name, e.g. `(1, "Signed")`.
    pub pod_type: (i64, String),
    /// Opaque signature payload.
    pub data: serde_json::Value,
}

impl SignedPod {
    /// Entry under `key`, if present.
    pub fn get(&self, key: &Key) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Check everything that does not require the signer backend:
    /// the id must equal the entries root, and every container reachable
    /// from the entries must carry the POD-wide depth.
    pub fn check_integrity(&self, params: &Params) -> Result<(), PodError> {
        if self.entries.max_depth() != params.max_depth_mt_containers {
            return Err(PodError::Container(
                podkit_value::ContainerError::DepthMismatch {
                    found: self.entries.max_depth(),
                    expected: params.max_depth_mt_containers,
                },
            ));
        }
        for value in self.entries.kvs().values() {
            check_value_depth(value, params.max_depth_mt_containers)?;
        }
        let computed = self.entries.root();
        if self.id.0 != computed {
            return Err(PodError::IdMismatch {
                declared: self.id,
                computed,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use podkit_core::Hash;
    use podkit_value::Array;

    fn entries(depth: usize) -> Dictionary {
        Dictionary::new(
            depth,
            [
                (Key::from("name"), Value::from("ada")),
                (Key::from("age"), Value::from(36)),
            ],
        )
        .unwrap()
    }

    fn pod(entries: Dictionary) -> SignedPod {
        SignedPod {
            id: PodId(entries.root()),
            entries,
            pod_type: (1, "Signed".to_string()),
            data: serde_json::json!({ "signature": "stub" }),
        }
    }

    #[test]
    fn test_consistent_pod_passes() {
        let params = Params::default();
        let p = pod(entries(params.max_depth_mt_containers));
        assert!(p.check_integrity(&params).is_ok());
        assert_eq!(p.get(&Key::from("age")), Some(&Value::from(36)));
    }

    #[test]
    fn test_id_mismatch_detected() {
        let params = Params::default();
        let mut p = pod(entries(params.max_depth_mt_containers));
        p.id = PodId(Hash::from_index(999));
        assert!(matches!(
            p.check_integrity(&params),
            Err(PodError::IdMismatch { .. })
        ));
    }

    #[test]
    fn test_wrong_depth_detected() {
        let params = Params::default();
        let p = pod(entries(16));
        assert!(matches!(
            p.check_integrity(&params),
            Err(PodError::Container(
                podkit_value::ContainerError::DepthMismatch { found: 16, .. }
            ))
        ));
    }

    #[test]
    fn test_nested_container_depth_checked() {
        let params = Params::default();
        let depth = params.max_depth_mt_containers;
        let inner = Array::new(depth / 2, vec![Value::from(1)]).unwrap();
        let entries =
            Dictionary::new(depth, [(Key::from("xs"), Value::Array(inner))]).unwrap();
        let p = pod(entries);
        assert!(matches!(
            p.check_integrity(&params),
            Err(PodError::Container(_))
        ));
    }

    #[test]
    fn test_serde_round_trip_preserves_opaque_data() {
        let params = Params::default();
        let p = pod(entries(params.max_depth_mt_containers));
        let text = serde_json::to_string(&p).unwrap();
        assert!(text.contains("\"podType\""));
        let back: SignedPod = serde_json::from_str(&text).unwrap();
        assert_eq!(back, p);
        assert_eq!(back.data, serde_json::json!({ "signature": "stub" }));
    }
}
