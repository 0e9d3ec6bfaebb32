use serde_json::Value;

use super::{number_param, KeywordValidator, Outcome};
use crate::engine::Engine;
use crate::error::ErrorKind;

// Bounds only apply to numbers; anything else passes.

pub struct Minimum;

impl KeywordValidator for Minimum {
    fn apply<'a>(&self, engine: &Engine<'a>, parameter: &'a Value) -> Outcome {
        let bound = number_param(engine, "minimum", parameter)?;
        let Some(n) = engine.value().as_f64() else { return Ok(vec![]) };
        // draft-4 boolean modifier on the same node
        let exclusive = engine.schema().flag("exclusiveMinimum");
        let (ok, message) = if exclusive {
            (n > bound, format!("Number {n} must be greater than {bound}."))
        } else {
            (n >= bound, format!("Number {n} is below the minimum of {bound}."))
        };
        if ok {
            return Ok(vec![]);
        }
        Ok(vec![engine.violation("minimum", ErrorKind::RangeViolation, message).with("exclusive", exclusive)])
    }
}

pub struct Maximum;

impl KeywordValidator for Maximum {
    fn apply<'a>(&self, engine: &Engine<'a>, parameter: &'a Value) -> Outcome {
        let bound = number_param(engine, "maximum", parameter)?;
        let Some(n) = engine.value().as_f64() else { return Ok(vec![]) };
        let exclusive = engine.schema().flag("exclusiveMaximum");
        let (ok, message) = if exclusive {
            (n < bound, format!("Number {n} must be less than {bound}."))
        } else {
            (n <= bound, format!("Number {n} is above the maximum of {bound}."))
        };
        if ok {
            return Ok(vec![]);
        }
        Ok(vec![engine.violation("maximum", ErrorKind::RangeViolation, message).with("exclusive", exclusive)])
    }
}

/// `true`/`false` only modify `minimum`; a number is a strict bound of its own.
pub struct ExclusiveMinimum;

impl KeywordValidator for ExclusiveMinimum {
    fn apply<'a>(&self, engine: &Engine<'a>, parameter: &'a Value) -> Outcome {
        if parameter.is_boolean() {
            return Ok(vec![]);
        }
        let bound = number_param(engine, "exclusiveMinimum", parameter)?;
        match engine.value().as_f64() {
            Some(n) if n <= bound => Ok(vec![engine.violation(
                "exclusiveMinimum",
                ErrorKind::RangeViolation,
                format!("Number {n} must be greater than {bound}."),
            )]),
            _ => Ok(vec![]),
        }
    }
}

pub struct ExclusiveMaximum;

impl KeywordValidator for ExclusiveMaximum {
    fn apply<'a>(&self, engine: &Engine<'a>, parameter: &'a Value) -> Outcome {
        if parameter.is_boolean() {
            return Ok(vec![]);
        }
        let bound = number_param(engine, "exclusiveMaximum", parameter)?;
        match engine.value().as_f64() {
            Some(n) if n >= bound => Ok(vec![engine.violation(
                "exclusiveMaximum",
                ErrorKind::RangeViolation,
                format!("Number {n} must be less than {bound}."),
            )]),
            _ => Ok(vec![]),
        }
    }
}

pub struct MultipleOf;

impl KeywordValidator for MultipleOf {
    fn apply<'a>(&self, engine: &Engine<'a>, parameter: &'a Value) -> Outcome {
        let divisor = number_param(engine, "multipleOf", parameter)?;
        if divisor <= 0.0 {
            return Err(engine.invalid_parameter("multipleOf", "expected a number greater than 0"));
        }
        let value = engine.value();
        if !value.is_number() {
            return Ok(vec![]);
        }
        if is_multiple(value, parameter, divisor) {
            return Ok(vec![]);
        }
        Ok(vec![engine.violation(
            "multipleOf",
            ErrorKind::NotMultipleOf,
            format!("Number {value} is not a multiple of {divisor}."),
        )])
    }
}

fn is_multiple(value: &Value, divisor_raw: &Value, divisor: f64) -> bool {
    if let (Some(n), Some(d)) = (value.as_i64(), divisor_raw.as_i64()) {
        return n % d == 0;
    }
    let Some(n) = value.as_f64() else { return false };
    let quotient = n / divisor;
    if !quotient.is_finite() {
        return false;
    }
    (quotient - quotient.round()).abs() <= f64::EPSILON * quotient.abs().max(1.0)
}
