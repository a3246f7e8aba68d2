//! Conversion between structured backend values and JSON.
//!
//! Structured to JSON never fails: non-finite numbers have no JSON form and
//! become `null`. JSON to structured fails only for integers that a double
//! cannot hold exactly; the error names the offending path.

use std::fmt;

use mcpbridge_backend::{ListValue, Struct, Value};
use serde_json::{Map, Number, Value as Json};

/// Largest integer magnitude a double represents exactly (2^53).
pub const MAX_EXACT_INTEGER: u64 = 1 << 53;

/// A JSON value with no structured equivalent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionError {
    /// Location of the value, e.g. `items[2].count`. Empty for the root.
    pub path: String,
    /// What was wrong with it.
    pub reason: String,
}

impl fmt::Display for ConversionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "value: {}", self.reason)
        } else {
            write!(f, "{}: {}", self.path, self.reason)
        }
    }
}

impl std::error::Error for ConversionError {}

// ============================================================================
// Structured -> JSON
// ============================================================================

/// Converts a structured value to JSON.
#[must_use]
pub fn value_to_json(value: &Value) -> Json {
    match value {
        Value::Null => Json::Null,
        Value::Number(n) => number_to_json(*n),
        Value::String(s) => Json::String(s.clone()),
        Value::Bool(b) => Json::Bool(*b),
        Value::Struct(s) => struct_to_json(s),
        Value::List(l) => Json::Array(l.values.iter().map(value_to_json).collect()),
    }
}

/// Converts a struct to a JSON object.
#[must_use]
pub fn struct_to_json(s: &Struct) -> Json {
    Json::Object(
        s.fields
            .iter()
            .map(|(k, v)| (k.clone(), value_to_json(v)))
            .collect(),
    )
}

/// Converts an optional struct; absent becomes `null`, never `{}`.
#[must_use]
pub fn optional_struct_to_json(s: Option<&Struct>) -> Json {
    s.map_or(Json::Null, struct_to_json)
}

fn number_to_json(n: f64) -> Json {
    // Integral doubles render without a fractional part; -0.0 keeps its sign.
    if n.is_finite()
        && n.fract() == 0.0
        && n.abs() <= MAX_EXACT_INTEGER as f64
        && (n != 0.0 || n.is_sign_positive())
    {
        return Json::Number(Number::from(n as i64));
    }
    Number::from_f64(n).map_or(Json::Null, Json::Number)
}

// ============================================================================
// JSON -> Structured
// ============================================================================

/// Converts JSON to a structured value.
///
/// # Errors
///
/// Returns a [`ConversionError`] if an integer's magnitude exceeds 2^53.
pub fn json_to_value(json: &Json) -> Result<Value, ConversionError> {
    let mut path = String::new();
    convert(json, &mut path)
}

/// Converts a JSON object to a struct.
///
/// # Errors
///
/// Returns a [`ConversionError`] naming the first field that cannot be
/// represented.
pub fn json_map_to_struct(map: &Map<String, Json>) -> Result<Struct, ConversionError> {
    let mut path = String::new();
    convert_map(map, &mut path)
}

fn convert(json: &Json, path: &mut String) -> Result<Value, ConversionError> {
    Ok(match json {
        Json::Null => Value::Null,
        Json::Bool(b) => Value::Bool(*b),
        Json::Number(n) => Value::Number(convert_number(n, path)?),
        Json::String(s) => Value::String(s.clone()),
        Json::Array(items) => {
            let mut list = ListValue::default();
            for (index, item) in items.iter().enumerate() {
                let mark = path.len();
                path.push_str(&format!("[{index}]"));
                list.values.push(convert(item, path)?);
                path.truncate(mark);
            }
            Value::List(list)
        }
        Json::Object(map) => Value::Struct(convert_map(map, path)?),
    })
}

fn convert_map(map: &Map<String, Json>, path: &mut String) -> Result<Struct, ConversionError> {
    let mut out = Struct::new();
    for (key, item) in map {
        let mark = path.len();
        if !path.is_empty() {
            path.push('.');
        }
        path.push_str(key);
        let value = convert(item, path)?;
        path.truncate(mark);
        out.fields.insert(key.clone(), value);
    }
    Ok(out)
}

fn convert_number(n: &Number, path: &str) -> Result<f64, ConversionError> {
    let inexact = match (n.as_i64(), n.as_u64()) {
        (Some(i), _) => i.unsigned_abs() > MAX_EXACT_INTEGER,
        (None, Some(u)) => u > MAX_EXACT_INTEGER,
        (None, None) => false,
    };
    if inexact {
        return Err(ConversionError {
            path: path.to_owned(),
            reason: format!("integer {n} cannot be represented exactly as a number"),
        });
    }
    n.as_f64().ok_or_else(|| ConversionError {
        path: path.to_owned(),
        reason: format!("number {n} is out of range"),
    })
}
