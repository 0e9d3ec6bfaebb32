//! `type`, `enum`, `const`: checks on the value itself, no recursion.
use serde_json::Value;

use super::{KeywordValidator, Outcome};
use crate::engine::Engine;
use crate::error::ErrorKind;
use crate::value::{json_equal, type_name, JsonType};

pub struct Type;

impl KeywordValidator for Type {
    fn apply<'a>(&self, engine: &Engine<'a>, parameter: &'a Value) -> Outcome {
        let names: Vec<&str> = match parameter {
            Value::String(name) => vec![name.as_str()],
            Value::Array(list) => list
                .iter()
                .map(|v| v.as_str().ok_or_else(|| engine.invalid_parameter("type", "type names must be strings")))
                .collect::<Result<_, _>>()?,
            _ => return Err(engine.invalid_parameter("type", "expected a type name or a list of type names")),
        };

        let mode = engine.options().bigint_mode;
        let mut matched = false;
        for name in &names {
            let ty = name
                .parse::<JsonType>()
                .map_err(|_| engine.invalid_parameter("type", format!("unknown type `{name}`")))?;
            matched |= ty.matches(engine.value(), mode);
        }
        if matched {
            return Ok(vec![]);
        }

        let message = format!(
            "Value of type {} is not {}.",
            type_name(engine.value()),
            names.iter().map(|n| format!("a(n) {n}")).collect::<Vec<_>>().join(" or "),
        );
        Ok(vec![engine.violation("type", ErrorKind::TypeMismatch, message).with("expected", parameter.clone())])
    }
}

pub struct Enum;

impl KeywordValidator for Enum {
    fn apply<'a>(&self, engine: &Engine<'a>, parameter: &'a Value) -> Outcome {
        let Some(allowed) = parameter.as_array() else {
            return Err(engine.invalid_parameter("enum", "expected a list of values"));
        };
        if allowed.iter().any(|candidate| json_equal(candidate, engine.value())) {
            return Ok(vec![]);
        }
        Ok(vec![engine.violation(
            "enum",
            ErrorKind::EnumMismatch,
            format!("Value {} is not one of {}.", engine.value(), parameter),
        )])
    }
}

pub struct Const;

impl KeywordValidator for Const {
    fn apply<'a>(&self, engine: &Engine<'a>, parameter: &'a Value) -> Outcome {
        if json_equal(parameter, engine.value()) {
            return Ok(vec![]);
        }
        Ok(vec![engine.violation(
            "const",
            ErrorKind::ConstMismatch,
            format!("Value {} is not equal to {}.", engine.value(), parameter),
        )])
    }
}
