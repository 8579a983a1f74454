//! JSON wire codec for [`Value`] and the containers.
//!
//! Encoding is total; decoding sniffs shapes in a fixed order (JSON type,
//! then container fields, then a single recognized tag key) and rejects
//! anything else with a [`DecodeError`].

use std::collections::BTreeMap;

use podkit_core::{Hash, HexError, Key, PodId};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{json, Map};
use thiserror::Error;

use crate::containers::{Array, ContainerError, Dictionary, Set};
use crate::value::{SecretKey, Value};

/// Error decoding a JSON document into a [`Value`] or container.
#[derive(Error, Debug)]
pub enum DecodeError {
    /// The JSON does not match any value shape: not a string, not a bool,
    /// not a container object, not a single-tag object.
    #[error("JSON does not match any value shape")]
    UnrecognizedValueShape,

    /// An `Int` payload was not a decimal string in `i64` range.
    #[error("invalid integer literal {0:?}")]
    BadInt(String),

    /// A hash-valued field was not 64 hex characters.
    #[error(transparent)]
    Hex(#[from] HexError),

    /// A required field is absent.
    #[error("missing field {0:?}")]
    MissingField(&'static str),

    /// A field is present with the wrong JSON type.
    #[error("field {0:?} has the wrong type")]
    BadFieldType(&'static str),

    /// The decoded elements do not form a valid container.
    #[error(transparent)]
    Container(#[from] ContainerError),
}

/// Encode a value into its wire JSON.
pub fn to_json(value: &Value) -> serde_json::Value {
    match value {
        Value::String(s) => json!(s),
        Value::Bool(b) => json!(b),
        Value::Int(i) => json!({ "Int": i.to_string() }),
        Value::Raw(h) => json!({ "Raw": h.to_hex() }),
        Value::PublicKey(pk) => json!({ "PublicKey": pk }),
        Value::SecretKey(sk) => json!({ "SecretKey": sk.expose() }),
        Value::PodId(id) => json!({ "PodId": id.0.to_hex() }),
        Value::Array(a) => array_to_json(a),
        Value::Set(s) => set_to_json(s),
        Value::Dictionary(d) => dict_to_json(d),
    }
}

fn array_to_json(a: &Array) -> serde_json::Value {
    json!({
        "max_depth": a.max_depth(),
        "array": a.elements().iter().map(to_json).collect::<Vec<_>>(),
    })
}

fn set_to_json(s: &Set) -> serde_json::Value {
    json!({
        "max_depth": s.max_depth(),
        "set": s.elements().map(to_json).collect::<Vec<_>>(),
    })
}

fn dict_to_json(d: &Dictionary) -> serde_json::Value {
    let kvs: Map<String, serde_json::Value> = d
        .kvs()
        .iter()
        .map(|(k, v)| (k.0.clone(), to_json(v)))
        .collect();
    json!({ "max_depth": d.max_depth(), "kvs": kvs })
}

/// Decode wire JSON into a value.
pub fn from_json(json: &serde_json::Value) -> Result<Value, DecodeError> {
    match json {
        serde_json::Value::String(s) => Ok(Value::String(s.clone())),
        serde_json::Value::Bool(b) => Ok(Value::Bool(*b)),
        serde_json::Value::Object(obj) => from_object(obj),
        _ => Err(DecodeError::UnrecognizedValueShape),
    }
}

fn from_object(obj: &Map<String, serde_json::Value>) -> Result<Value, DecodeError> {
    // Container shapes carry a structural field plus max_depth.
    if obj.contains_key("array") {
        return array_from_object(obj).map(Value::Array);
    }
    if obj.contains_key("set") {
        return set_from_object(obj).map(Value::Set);
    }
    if obj.contains_key("kvs") {
        return dict_from_object(obj).map(Value::Dictionary);
    }

    // Primitive tags are single-key objects.
    if obj.len() != 1 {
        return Err(DecodeError::UnrecognizedValueShape);
    }
    let (tag, payload) = obj.iter().next().ok_or(DecodeError::UnrecognizedValueShape)?;
    match tag.as_str() {
        "Int" => {
            let s = payload.as_str().ok_or(DecodeError::BadFieldType("Int"))?;
            let i: i64 = s.parse().map_err(|_| DecodeError::BadInt(s.to_string()))?;
            Ok(Value::Int(i))
        }
        "Raw" => {
            let s = payload.as_str().ok_or(DecodeError::BadFieldType("Raw"))?;
            Ok(Value::Raw(Hash::from_hex(s)?))
        }
        "PodId" => {
            let s = payload.as_str().ok_or(DecodeError::BadFieldType("PodId"))?;
            Ok(Value::PodId(PodId(Hash::from_hex(s)?)))
        }
        "PublicKey" => {
            let s = payload
                .as_str()
                .ok_or(DecodeError::BadFieldType("PublicKey"))?;
            Ok(Value::PublicKey(s.to_string()))
        }
        "SecretKey" => {
            let s = payload
                .as_str()
                .ok_or(DecodeError::BadFieldType("SecretKey"))?;
            Ok(Value::SecretKey(SecretKey::new(s)))
        }
        _ => Err(DecodeError::UnrecognizedValueShape),
    }
}

/// Container objects carry exactly `max_depth` plus their structural field.
fn reject_stray_keys(
    obj: &Map<String, serde_json::Value>,
    field: &str,
) -> Result<(), DecodeError> {
    if obj.keys().any(|k| k != "max_depth" && k != field) {
        return Err(DecodeError::UnrecognizedValueShape);
    }
    Ok(())
}

fn depth_field(obj: &Map<String, serde_json::Value>) -> Result<usize, DecodeError> {
    let raw = obj
        .get("max_depth")
        .ok_or(DecodeError::MissingField("max_depth"))?;
    let d = raw.as_u64().ok_or(DecodeError::BadFieldType("max_depth"))?;
    usize::try_from(d).map_err(|_| DecodeError::BadFieldType("max_depth"))
}

fn array_from_object(obj: &Map<String, serde_json::Value>) -> Result<Array, DecodeError> {
    reject_stray_keys(obj, "array")?;
    let max_depth = depth_field(obj)?;
    let items = obj
        .get("array")
        .and_then(serde_json::Value::as_array)
        .ok_or(DecodeError::BadFieldType("array"))?;
    let elements = items.iter().map(from_json).collect::<Result<Vec<_>, _>>()?;
    Ok(Array::new(max_depth, elements)?)
}

fn set_from_object(obj: &Map<String, serde_json::Value>) -> Result<Set, DecodeError> {
    reject_stray_keys(obj, "set")?;
    let max_depth = depth_field(obj)?;
    let items = obj
        .get("set")
        .and_then(serde_json::Value::as_array)
        .ok_or(DecodeError::BadFieldType("set"))?;
    let elements = items.iter().map(from_json).collect::<Result<Vec<_>, _>>()?;
    Ok(Set::new(max_depth, elements)?)
}

fn dict_from_object(obj: &Map<String, serde_json::Value>) -> Result<Dictionary, DecodeError> {
    reject_stray_keys(obj, "kvs")?;
    let max_depth = depth_field(obj)?;
    let entries = obj
        .get("kvs")
        .and_then(serde_json::Value::as_object)
        .ok_or(DecodeError::BadFieldType("kvs"))?;
    let kvs = entries
        .iter()
        .map(|(k, v)| Ok((Key::from(k.as_str()), from_json(v)?)))
        .collect::<Result<BTreeMap<_, _>, DecodeError>>()?;
    Ok(Dictionary::new(max_depth, kvs)?)
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        to_json(self).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let json = serde_json::Value::deserialize(deserializer)?;
        from_json(&json).map_err(D::Error::custom)
    }
}

impl Serialize for Array {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        array_to_json(self).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Array {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let json = serde_json::Value::deserialize(deserializer)?;
        let obj = json
            .as_object()
            .ok_or_else(|| D::Error::custom(DecodeError::UnrecognizedValueShape))?;
        array_from_object(obj).map_err(D::Error::custom)
    }
}

impl Serialize for Set {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        set_to_json(self).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Set {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let json = serde_json::Value::deserialize(deserializer)?;
        let obj = json
            .as_object()
            .ok_or_else(|| D::Error::custom(DecodeError::UnrecognizedValueShape))?;
        set_from_object(obj).map_err(D::Error::custom)
    }
}

impl Serialize for Dictionary {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        dict_to_json(self).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Dictionary {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let json = serde_json::Value::deserialize(deserializer)?;
        let obj = json
            .as_object()
            .ok_or_else(|| D::Error::custom(DecodeError::UnrecognizedValueShape))?;
        dict_from_object(obj).map_err(D::Error::custom)
    }
}
