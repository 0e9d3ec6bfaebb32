//! Error records.
//!
//! Two classes:
//! - [`ValidationError`]: a failed constraint. Expected, accumulated, never
//!   aborts sibling keywords.
//! - [`StructuralError`]: misuse or a pathological schema (depth exceeded,
//!   malformed schema, bad option). Aborts the whole evaluation.
use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::pointer::Pointer;

/// Constraint-failure codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    MissingRequired,
    TypeMismatch,
    NotAllowedProperty,
    AnyOfFailed,
    OneOfFailed,
    NotFailed,
    PatternMismatch,
    RangeViolation,
    LengthViolation,
    CountViolation,
    DuplicateItems,
    EnumMismatch,
    FormatMismatch,
    ConstMismatch,
    NotMultipleOf,
    MissingDependency,
    ContainsFailed,
    FalseSchema,
}

impl ErrorKind {
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::MissingRequired => "missing_required",
            ErrorKind::TypeMismatch => "type_mismatch",
            ErrorKind::NotAllowedProperty => "not_allowed_property",
            ErrorKind::AnyOfFailed => "any_of_failed",
            ErrorKind::OneOfFailed => "one_of_failed",
            ErrorKind::NotFailed => "not_failed",
            ErrorKind::PatternMismatch => "pattern_mismatch",
            ErrorKind::RangeViolation => "range_violation",
            ErrorKind::LengthViolation => "length_violation",
            ErrorKind::CountViolation => "count_violation",
            ErrorKind::DuplicateItems => "duplicate_items",
            ErrorKind::EnumMismatch => "enum_mismatch",
            ErrorKind::FormatMismatch => "format_mismatch",
            ErrorKind::ConstMismatch => "const_mismatch",
            ErrorKind::NotMultipleOf => "not_multiple_of",
            ErrorKind::MissingDependency => "missing_dependency",
            ErrorKind::ContainsFailed => "contains_failed",
            ErrorKind::FalseSchema => "false_schema",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// One failed constraint, located by `pointer`.
///
/// `context` always carries `keyword` and the violated `parameter`; handlers
/// add their own entries (`expected`, `missing`, ...).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationError {
    pub pointer: Pointer,
    pub kind: ErrorKind,
    pub message: String,
    pub value: Value,
    pub context: Map<String, Value>,
}

impl ValidationError {
    pub fn new(kind: ErrorKind, message: impl Into<String>, value: &Value, pointer: &Pointer) -> Self {
        Self {
            pointer: pointer.clone(),
            kind,
            message: message.into(),
            value: value.clone(),
            context: Map::new(),
        }
    }

    /// Attach a contextual parameter.
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.context.insert(key.to_string(), value.into());
        self
    }

    pub fn keyword(&self) -> Option<&str> {
        self.context.get("keyword").and_then(Value::as_str)
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.pointer.is_root() {
            write!(f, "(root): {}", self.message)
        } else {
            write!(f, "{}: {}", self.pointer, self.message)
        }
    }
}

/// Fatal, engine-level failures. Surfaced through `Err`, never mixed into the
/// list of [`ValidationError`]s.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StructuralError {
    #[error("maximum depth of {max_depth} exceeded at `{pointer}` (cyclic schema?)")]
    MaxDepthExceeded { max_depth: usize, pointer: String },

    #[error("invalid schema at `{pointer}`: expected an object or a boolean, found {found}")]
    InvalidSchema { pointer: String, found: &'static str },

    #[error("unresolvable reference `{reference}` at `{pointer}`")]
    UnresolvedReference { reference: String, pointer: String },

    #[error("invalid `{keyword}` parameter at `{pointer}`: {reason}")]
    InvalidParameter { keyword: String, pointer: String, reason: String },

    #[error("invalid option: {0}")]
    InvalidOption(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serializes_as_flat_record() {
        let err = ValidationError::new(
            ErrorKind::MissingRequired,
            "Required properties missing: a",
            &json!({}),
            &Pointer::root().key("user"),
        )
        .with("keyword", "required")
        .with("missing", json!(["a"]));
        let record = serde_json::to_value(&err).unwrap();
        assert_eq!(record["pointer"], "/user");
        assert_eq!(record["kind"], "missing_required");
        assert_eq!(record["context"]["missing"], json!(["a"]));
        assert_eq!(err.keyword(), Some("required"));
    }

    #[test]
    fn display_marks_root() {
        let err = ValidationError::new(ErrorKind::NotFailed, "nope", &json!(1), &Pointer::root());
        assert_eq!(err.to_string(), "(root): nope");
        assert_eq!(ErrorKind::OneOfFailed.to_string(), "one_of_failed");
    }
}
