//! Value model helpers over decoded JSON (`serde_json::Value`).
//!
//! Data is decoded once with `preserve_order`, so mapping keys keep their
//! insertion order. Nothing here mutates a value.
use std::fmt;
use std::str::FromStr;

use serde_json::{Number, Value};

use crate::options::BigintMode;

// ------------------------------- Kinds ----------------------------------- //

/// Primitive kinds nameable by the `type` keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum JsonType {
    Object,
    Array,
    Boolean,
    Null,
    Number,
    Integer,
    String,
}

impl JsonType {
    pub fn name(self) -> &'static str {
        match self {
            JsonType::Object => "object",
            JsonType::Array => "array",
            JsonType::Boolean => "boolean",
            JsonType::Null => "null",
            JsonType::Number => "number",
            JsonType::Integer => "integer",
            JsonType::String => "string",
        }
    }

    /// Does `value` belong to this kind?
    ///
    /// A string holding an integer literal that overflowed `i64` is counted as
    /// a number (and not a string) unless `mode` says to keep it a string.
    pub fn matches(self, value: &Value, mode: BigintMode) -> bool {
        let bigint = match value {
            Value::String(s) => mode == BigintMode::TreatAsInvalidString && is_bigint_string(s),
            _ => false,
        };
        match self {
            JsonType::Object => value.is_object(),
            JsonType::Array => value.is_array(),
            JsonType::Boolean => value.is_boolean(),
            JsonType::Null => value.is_null(),
            JsonType::Number => value.is_number() || bigint,
            JsonType::Integer => is_integer(value) || bigint,
            JsonType::String => value.is_string() && !bigint,
        }
    }
}

impl fmt::Display for JsonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownType(pub String);

impl FromStr for JsonType {
    type Err = UnknownType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "object" => Ok(JsonType::Object),
            "array" => Ok(JsonType::Array),
            "boolean" => Ok(JsonType::Boolean),
            "null" => Ok(JsonType::Null),
            "number" => Ok(JsonType::Number),
            "integer" => Ok(JsonType::Integer),
            "string" => Ok(JsonType::String),
            other => Err(UnknownType(other.to_string())),
        }
    }
}

/// Kind name of a decoded value, for messages.
pub fn type_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if number_is_integer(n) => "integer",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// ------------------------------ Numbers ---------------------------------- //

pub fn is_integer(v: &Value) -> bool {
    match v {
        Value::Number(n) => number_is_integer(n),
        _ => false,
    }
}

fn number_is_integer(n: &Number) -> bool {
    n.is_i64() || n.is_u64() || n.as_f64().is_some_and(|f| f.is_finite() && f.fract() == 0.0)
}

/// `-?[0-9]+` that does not fit an `i64`: what a decoder leaves behind when it
/// keeps oversized integers as strings.
pub fn is_bigint_string(s: &str) -> bool {
    let digits = s.strip_prefix('-').unwrap_or(s);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) && s.parse::<i64>().is_err()
}

fn numbers_equal(a: &Number, b: &Number) -> bool {
    if let (Some(x), Some(y)) = (a.as_i64(), b.as_i64()) {
        return x == y;
    }
    if let (Some(x), Some(y)) = (a.as_u64(), b.as_u64()) {
        return x == y;
    }
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => x == y,
        _ => false,
    }
}

// ------------------------------ Equality --------------------------------- //

/// Structural equality: numbers by value (`1 == 1.0`), mappings ignoring key
/// order, sequences position by position.
pub fn json_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => numbers_equal(x, y),
        (Value::Array(xs), Value::Array(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| json_equal(x, y))
        }
        (Value::Object(xm), Value::Object(ym)) => {
            xm.len() == ym.len()
                && xm.iter().all(|(k, x)| ym.get(k).is_some_and(|y| json_equal(x, y)))
        }
        _ => a == b,
    }
}

// ------------------------------- Tests ----------------------------------- //
