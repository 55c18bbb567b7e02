//! Values whose shape is only known at runtime.
//!
//! A dynamic field accepts any JSON tree, typically a heterogeneous change-set
//! in a request body. Decoding classifies each node by its runtime kind and
//! keeps the whole tree without validation; encoding strips the wrapper at
//! every level so the outgoing JSON is identical to what a fully-typed field
//! would have produced.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

use crate::error::ConvertError;
use crate::path::FieldPath;

/// A JSON tree held by a dynamic field.
///
/// Object keys are kept in key order; the order of keys in the original
/// document is not significant.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Dynamic {
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    List(Vec<Dynamic>),
    Object(BTreeMap<String, Dynamic>),
}

impl Dynamic {
    /// Classify a decoded JSON value and wrap it, recursively.
    pub fn resolve(value: &Value, path: &FieldPath) -> Result<Self, ConvertError> {
        Ok(match value {
            Value::Null => Dynamic::Null,
            Value::Bool(b) => Dynamic::Bool(*b),
            Value::Number(n) => {
                if !(n.is_i64() || n.is_u64() || n.is_f64()) {
                    return Err(ConvertError::UnsupportedDynamicShape {
                        path: path.to_string(),
                        detail: format!("number {n} has no int or float representation"),
                    });
                }
                Dynamic::Number(n.clone())
            }
            Value::String(s) => Dynamic::String(s.clone()),
            Value::Array(items) => Dynamic::List(
                items
                    .iter()
                    .enumerate()
                    .map(|(i, item)| Dynamic::resolve(item, &path.index(i)))
                    .collect::<Result<_, _>>()?,
            ),
            Value::Object(entries) => Dynamic::Object(
                entries
                    .iter()
                    .map(|(k, v)| Ok((k.clone(), Dynamic::resolve(v, &path.key(k))?)))
                    .collect::<Result<_, ConvertError>>()?,
            ),
        })
    }

    /// Flatten back to plain JSON.
    pub fn to_value(&self) -> Value {
        match self {
            Dynamic::Null => Value::Null,
            Dynamic::Bool(b) => Value::Bool(*b),
            Dynamic::Number(n) => Value::Number(n.clone()),
            Dynamic::String(s) => Value::String(s.clone()),
            Dynamic::List(items) => Value::Array(items.iter().map(Dynamic::to_value).collect()),
            Dynamic::Object(entries) => Value::Object(
                entries
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_value()))
                    .collect::<Map<String, Value>>(),
            ),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Dynamic::Null => "null",
            Dynamic::Bool(_) => "bool",
            Dynamic::Number(_) => "number",
            Dynamic::String(_) => "string",
            Dynamic::List(_) => "list",
            Dynamic::Object(_) => "object",
        }
    }

    pub fn get(&self, key: &str) -> Option<&Dynamic> {
        match self {
            Dynamic::Object(entries) => entries.get(key),
            _ => None,
        }
    }
}
