use serde_json::Value;

use super::{count_param, regex_param, KeywordValidator, Outcome};
use crate::engine::Engine;
use crate::error::ErrorKind;

// Length is counted in Unicode scalar values, not bytes.

pub struct MinLength;

impl KeywordValidator for MinLength {
    fn apply<'a>(&self, engine: &Engine<'a>, parameter: &'a Value) -> Outcome {
        let min = count_param(engine, "minLength", parameter)?;
        let Some(s) = engine.value().as_str() else { return Ok(vec![]) };
        let len = s.chars().count();
        if len >= min {
            return Ok(vec![]);
        }
        Ok(vec![engine
            .violation("minLength", ErrorKind::LengthViolation, format!("String is {len} characters long, minimum is {min}."))
            .with("length", len)])
    }
}

pub struct MaxLength;

impl KeywordValidator for MaxLength {
    fn apply<'a>(&self, engine: &Engine<'a>, parameter: &'a Value) -> Outcome {
        let max = count_param(engine, "maxLength", parameter)?;
        let Some(s) = engine.value().as_str() else { return Ok(vec![]) };
        let len = s.chars().count();
        if len <= max {
            return Ok(vec![]);
        }
        Ok(vec![engine
            .violation("maxLength", ErrorKind::LengthViolation, format!("String is {len} characters long, maximum is {max}."))
            .with("length", len)])
    }
}

/// Unanchored search, as JSON Schema regexes are.
pub struct Pattern;

impl KeywordValidator for Pattern {
    fn apply<'a>(&self, engine: &Engine<'a>, parameter: &'a Value) -> Outcome {
        let Some(pattern) = parameter.as_str() else {
            return Err(engine.invalid_parameter("pattern", "expected a regular expression string"));
        };
        let re = regex_param(engine, "pattern", pattern)?;
        let Some(s) = engine.value().as_str() else { return Ok(vec![]) };
        if re.is_match(s) {
            return Ok(vec![]);
        }
        Ok(vec![engine.violation(
            "pattern",
            ErrorKind::PatternMismatch,
            format!("String {:?} does not match the pattern {pattern:?}.", s),
        )])
    }
}

pub struct Format;

impl KeywordValidator for Format {
    fn apply<'a>(&self, engine: &Engine<'a>, parameter: &'a Value) -> Outcome {
        let Some(format) = parameter.as_str() else {
            return Err(engine.invalid_parameter("format", "expected a format name"));
        };
        let Some(s) = engine.value().as_str() else { return Ok(vec![]) };
        if engine.formats().check(s, format) {
            return Ok(vec![]);
        }
        Ok(vec![engine.violation(
            "format",
            ErrorKind::FormatMismatch,
            format!("String {s:?} is not a valid {format}."),
        )])
    }
}
