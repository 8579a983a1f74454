//! End-to-end checks of the schema trust boundary: documents produced by
//! the typed layer must pass, and malformed documents must fail with
//! violations pointing at the offending path.

use podkit_core::{Hash, Key, Params, PodId};
use podkit_pod::{MainPod, NativePredicate, Predicate, SignedPod, Statement, VDSet, ValueRef};
use podkit_schema::{validate_main_pod, validate_signed_pod, validate_value, SchemaError};
use podkit_value::{Dictionary, Value};

fn sample_signed_pod() -> SignedPod {
    let params = Params::default();
    let entries = Dictionary::new(
        params.max_depth_mt_containers,
        [
            (Key::from("name"), Value::from("ada")),
            (Key::from("age"), Value::from(36)),
            (Key::from("admin"), Value::from(false)),
        ],
    )
    .unwrap();
    SignedPod {
        id: PodId(entries.root()),
        entries,
        pod_type: (1, "Signed".to_string()),
        data: serde_json::json!({ "signature": "c2lnbmF0dXJl" }),
    }
}

fn sample_main_pod() -> MainPod {
    let params = Params::default();
    MainPod {
        id: PodId(Hash::from_index(77)),
        vd_set: VDSet::new(
            params.max_depth_mt_vd_set,
            [Hash::from_index(1), Hash::from_index(2)],
        )
        .unwrap(),
        params,
        pod_type: (2, "Main".to_string()),
        public_statements: vec![Statement::new(
            Predicate::Native(NativePredicate::Gt),
            vec![
                ValueRef::Key(podkit_pod::AnchoredKey::new(
                    PodId(Hash::from_index(3)),
                    "age",
                )),
                ValueRef::Literal(Value::from(18)),
            ],
        )],
        data: serde_json::json!({ "proof": "cHJvb2Y=" }),
    }
}

fn violations_of(err: SchemaError) -> Vec<podkit_schema::Violation> {
    match err {
        SchemaError::ValidationFailed { violations, .. } => violations.into_inner(),
        other => panic!("expected validation failure, got: {other}"),
    }
}

#[test]
fn conformant_signed_pod_passes_and_decodes() {
    let pod = sample_signed_pod();
    let json = serde_json::to_value(&pod).unwrap();
    let decoded = validate_signed_pod(&json).unwrap();
    assert_eq!(decoded, pod);
    assert!(decoded.check_integrity(&Params::default()).is_ok());
}

#[test]
fn conformant_main_pod_passes_and_decodes() {
    let pod = sample_main_pod();
    let json = serde_json::to_value(&pod).unwrap();
    let decoded = validate_main_pod(&json).unwrap();
    assert_eq!(decoded, pod);
    assert!(decoded.check_integrity().is_ok());
}

#[test]
fn main_pod_missing_vd_set_names_the_path() {
    let mut json = serde_json::to_value(sample_main_pod()).unwrap();
    json.as_object_mut().unwrap().remove("vdSet");
    let violations = violations_of(validate_main_pod(&json).unwrap_err());
    assert!(!violations.is_empty());
    assert!(
        violations.iter().any(|v| v.message.contains("vdSet")),
        "no violation mentions vdSet: {violations:?}"
    );
}

#[test]
fn short_hex_id_rejected() {
    let mut json = serde_json::to_value(sample_signed_pod()).unwrap();
    // 63 characters instead of 64.
    json["id"] = serde_json::json!("a".repeat(63));
    let violations = violations_of(validate_signed_pod(&json).unwrap_err());
    assert!(violations.iter().any(|v| v.instance_path == "/id"));
}

#[test]
fn non_hex_character_rejected() {
    let mut json = serde_json::to_value(sample_signed_pod()).unwrap();
    let mut id = "a".repeat(63);
    id.push('g');
    json["id"] = serde_json::json!(id);
    assert!(validate_signed_pod(&json).is_err());
}

#[test]
fn uppercase_hex_accepted() {
    let pod = sample_signed_pod();
    let mut json = serde_json::to_value(&pod).unwrap();
    let upper = json["id"].as_str().unwrap().to_uppercase();
    json["id"] = serde_json::json!(upper);
    // Schema-level pass; typed decode also accepts both cases.
    assert!(validate_signed_pod(&json).is_ok());
}

#[test]
fn bare_json_number_is_not_a_value() {
    assert!(validate_value(&serde_json::json!(5)).is_err());
    assert!(validate_value(&serde_json::json!({ "Int": "5" })).is_ok());
}

#[test]
fn int_payload_must_be_decimal_string() {
    assert!(validate_value(&serde_json::json!({ "Int": "-12" })).is_ok());
    assert!(validate_value(&serde_json::json!({ "Int": "1.5" })).is_err());
    assert!(validate_value(&serde_json::json!({ "Int": 5 })).is_err());
}

#[test]
fn container_shapes_validate_recursively() {
    let json = serde_json::json!({
        "max_depth": 32,
        "kvs": {
            "xs": { "max_depth": 32, "array": ["a", true, { "Int": "1" }] },
            "ys": { "max_depth": 32, "set": [] }
        }
    });
    let value = validate_value(&json).unwrap();
    assert_eq!(value.kind(), "Dictionary");
}

#[test]
fn unknown_extra_field_rejected() {
    let mut json = serde_json::to_value(sample_signed_pod()).unwrap();
    json["extra"] = serde_json::json!(1);
    assert!(validate_signed_pod(&json).is_err());
}

#[test]
fn schema_pass_but_decode_failure_is_reported() {
    // Structurally valid, but five elements cannot fit a depth-1 tree.
    let json = serde_json::json!({
        "max_depth": 1,
        "array": ["a", "b", "c", "d", "e"]
    });
    assert!(matches!(
        validate_value(&json).unwrap_err(),
        SchemaError::DecodeFailed { .. }
    ));
}
