//! `allOf`, `anyOf`, `oneOf`, `not`.
//!
//! The value stays where it is, so children share the parent's pointer.
//! `anyOf`/`oneOf`/`not` only look at pass/fail of each branch; a structural
//! failure inside a branch propagates instead of counting as "fails".
use serde_json::Value;

use super::{schema_list, KeywordValidator, Outcome};
use crate::engine::Engine;
use crate::error::ErrorKind;

/// Every branch's errors are merged, not only the first failing branch's.
pub struct AllOf;

impl KeywordValidator for AllOf {
    fn apply<'a>(&self, engine: &Engine<'a>, parameter: &'a Value) -> Outcome {
        let branches = schema_list(engine, "allOf", parameter)?;
        let mut errors = Vec::new();
        for branch in branches {
            errors.extend(engine.validate_child(engine.value(), branch, engine.pointer().clone())?);
        }
        Ok(errors)
    }
}

pub struct AnyOf;

impl KeywordValidator for AnyOf {
    fn apply<'a>(&self, engine: &Engine<'a>, parameter: &'a Value) -> Outcome {
        let branches = schema_list(engine, "anyOf", parameter)?;
        for branch in branches {
            if engine.probe(branch)? {
                return Ok(vec![]);
            }
        }
        Ok(vec![engine.violation(
            "anyOf",
            ErrorKind::AnyOfFailed,
            format!("Value does not match any of the {} schemas in `anyOf`.", branches.len()),
        )])
    }
}

pub struct OneOf;

impl KeywordValidator for OneOf {
    fn apply<'a>(&self, engine: &Engine<'a>, parameter: &'a Value) -> Outcome {
        let branches = schema_list(engine, "oneOf", parameter)?;
        let mut matched = Vec::new();
        for (i, branch) in branches.iter().enumerate() {
            if engine.probe(branch)? {
                matched.push(i);
            }
        }
        if matched.len() == 1 {
            return Ok(vec![]);
        }
        let message = if matched.is_empty() {
            "Value does not match any schema in `oneOf`.".to_string()
        } else {
            format!("Value matches {} schemas in `oneOf`, exactly one is allowed.", matched.len())
        };
        Ok(vec![engine.violation("oneOf", ErrorKind::OneOfFailed, message).with("matched", matched)])
    }
}

pub struct Not;

impl KeywordValidator for Not {
    fn apply<'a>(&self, engine: &Engine<'a>, parameter: &'a Value) -> Outcome {
        if !matches!(parameter, Value::Object(_) | Value::Bool(_)) {
            return Err(engine.invalid_parameter("not", "expected a schema"));
        }
        if !engine.probe(parameter)? {
            return Ok(vec![]);
        }
        Ok(vec![engine.violation("not", ErrorKind::NotFailed, "Value must not match the `not` schema.")])
    }
}
