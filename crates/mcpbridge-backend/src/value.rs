//! The structured value model used by backend messages.
//!
//! A [`Value`] is one of six kinds. Numbers are always doubles; there is no
//! integer kind. On the wire each value is an object with a single key naming
//! its kind, e.g. `{"string_value": "hi"}`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A dynamically typed structured value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// The null value.
    #[serde(rename = "null_value")]
    Null,
    /// A double-precision number.
    #[serde(rename = "number_value")]
    Number(f64),
    /// A UTF-8 string.
    #[serde(rename = "string_value")]
    String(String),
    /// A boolean.
    #[serde(rename = "bool_value")]
    Bool(bool),
    /// A nested struct.
    #[serde(rename = "struct_value")]
    Struct(Struct),
    /// An ordered list.
    #[serde(rename = "list_value")]
    List(ListValue),
}

impl Value {
    /// Returns the string payload if this is a string.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Struct> for Value {
    fn from(s: Struct) -> Self {
        Value::Struct(s)
    }
}

impl From<ListValue> for Value {
    fn from(l: ListValue) -> Self {
        Value::List(l)
    }
}

/// A string-keyed map of values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Struct {
    /// Fields, ordered by key.
    #[serde(default)]
    pub fields: BTreeMap<String, Value>,
}

impl Struct {
    /// Creates an empty struct.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a field, replacing any previous value under the same key.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Looks up a field.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }
}

/// An ordered list of values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListValue {
    /// Elements in order.
    #[serde(default)]
    pub values: Vec<Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn wire_representation_names_the_kind() {
        assert_eq!(serde_json::to_value(Value::Null).unwrap(), json!("null_value"));
        assert_eq!(
            serde_json::to_value(Value::from("hi")).unwrap(),
            json!({"string_value": "hi"})
        );
        assert_eq!(
            serde_json::to_value(Value::from(2.5)).unwrap(),
            json!({"number_value": 2.5})
        );
    }

    #[test]
    fn nested_struct_decodes() {
        let raw = json!({
            "struct_value": {
                "fields": {
                    "items": {"list_value": {"values": [{"bool_value": true}, "null_value"]}}
                }
            }
        });
        let value: Value = serde_json::from_value(raw).unwrap();
        let Value::Struct(s) = value else {
            panic!("expected struct");
        };
        let Some(Value::List(list)) = s.get("items") else {
            panic!("expected list");
        };
        assert_eq!(list.values, vec![Value::Bool(true), Value::Null]);
    }

    #[test]
    fn struct_builder_replaces_keys() {
        let s = Struct::new().with("a", 1.0).with("a", "two");
        assert_eq!(s.get("a").and_then(Value::as_str), Some("two"));
        assert_eq!(s.fields.len(), 1);
    }
}
