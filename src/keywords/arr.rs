//! Array keywords. `items` and `contains` fan out into the elements.
use serde_json::Value;

use super::{count_param, KeywordValidator, Outcome};
use crate::engine::Engine;
use crate::error::ErrorKind;
use crate::value::json_equal;

/// A single schema validates every element (list mode); a list of schemas
/// validates elements position by position (tuple mode).
pub struct Items;

impl KeywordValidator for Items {
    fn apply<'a>(&self, engine: &Engine<'a>, parameter: &'a Value) -> Outcome {
        let Some(elements) = engine.value().as_array() else { return Ok(vec![]) };
        let mut errors = Vec::new();
        match parameter {
            Value::Object(_) | Value::Bool(_) => {
                for (i, element) in elements.iter().enumerate() {
                    errors.extend(engine.validate_child(element, parameter, engine.pointer().index(i))?);
                }
            }
            Value::Array(tuple) => {
                for (i, (element, schema)) in elements.iter().zip(tuple).enumerate() {
                    errors.extend(engine.validate_child(element, schema, engine.pointer().index(i))?);
                }
            }
            _ => return Err(engine.invalid_parameter("items", "expected a schema or a list of schemas")),
        }
        Ok(errors)
    }
}

/// Elements past a tuple-mode `items`. Ignored unless `items` is a list.
pub struct AdditionalItems;

impl KeywordValidator for AdditionalItems {
    fn apply<'a>(&self, engine: &Engine<'a>, parameter: &'a Value) -> Outcome {
        if !matches!(parameter, Value::Bool(_) | Value::Object(_)) {
            return Err(engine.invalid_parameter("additionalItems", "expected a boolean or a schema"));
        }
        let Some(Value::Array(tuple)) = engine.schema().get("items") else { return Ok(vec![]) };
        let Some(elements) = engine.value().as_array() else { return Ok(vec![]) };
        if elements.len() <= tuple.len() {
            return Ok(vec![]);
        }
        match parameter {
            Value::Bool(true) => Ok(vec![]),
            Value::Bool(false) => Ok(vec![engine
                .violation(
                    "additionalItems",
                    ErrorKind::CountViolation,
                    format!("Array has {} items, at most {} are allowed.", elements.len(), tuple.len()),
                )
                .with("expected", tuple.len())
                .with("actual", elements.len())]),
            _ => {
                let mut errors = Vec::new();
                for (i, element) in elements.iter().enumerate().skip(tuple.len()) {
                    errors.extend(engine.validate_child(element, parameter, engine.pointer().index(i))?);
                }
                Ok(errors)
            }
        }
    }
}

pub struct MinItems;

impl KeywordValidator for MinItems {
    fn apply<'a>(&self, engine: &Engine<'a>, parameter: &'a Value) -> Outcome {
        let min = count_param(engine, "minItems", parameter)?;
        match engine.value().as_array() {
            Some(elements) if elements.len() < min => Ok(vec![engine
                .violation(
                    "minItems",
                    ErrorKind::CountViolation,
                    format!("Array has {} items, at least {min} are required.", elements.len()),
                )
                .with("expected", min)
                .with("actual", elements.len())]),
            _ => Ok(vec![]),
        }
    }
}

pub struct MaxItems;

impl KeywordValidator for MaxItems {
    fn apply<'a>(&self, engine: &Engine<'a>, parameter: &'a Value) -> Outcome {
        let max = count_param(engine, "maxItems", parameter)?;
        match engine.value().as_array() {
            Some(elements) if elements.len() > max => Ok(vec![engine
                .violation(
                    "maxItems",
                    ErrorKind::CountViolation,
                    format!("Array has {} items, at most {max} are allowed.", elements.len()),
                )
                .with("expected", max)
                .with("actual", elements.len())]),
            _ => Ok(vec![]),
        }
    }
}

pub struct UniqueItems;

impl KeywordValidator for UniqueItems {
    fn apply<'a>(&self, engine: &Engine<'a>, parameter: &'a Value) -> Outcome {
        let Some(unique) = parameter.as_bool() else {
            return Err(engine.invalid_parameter("uniqueItems", "expected a boolean"));
        };
        let Some(elements) = engine.value().as_array() else { return Ok(vec![]) };
        if !unique {
            return Ok(vec![]);
        }
        // quadratic, but equality has to be structural (`1 == 1.0`)
        for (i, a) in elements.iter().enumerate() {
            if let Some(j) = elements[i + 1..].iter().position(|b| json_equal(a, b)) {
                let j = i + 1 + j;
                return Ok(vec![engine
                    .violation(
                        "uniqueItems",
                        ErrorKind::DuplicateItems,
                        format!("Array items {i} and {j} are equal."),
                    )
                    .with("duplicates", vec![i, j])]);
            }
        }
        Ok(vec![])
    }
}

pub struct Contains;

impl KeywordValidator for Contains {
    fn apply<'a>(&self, engine: &Engine<'a>, parameter: &'a Value) -> Outcome {
        let Some(elements) = engine.value().as_array() else { return Ok(vec![]) };
        for (i, element) in elements.iter().enumerate() {
            if engine.descend(element, parameter, engine.pointer().index(i))?.passes()? {
                return Ok(vec![]);
            }
        }
        Ok(vec![engine.violation(
            "contains",
            ErrorKind::ContainsFailed,
            "No array item matches the `contains` schema.",
        )])
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::{errors, kinds, pointers, try_errors};
    use crate::error::ErrorKind;
    use serde_json::json;

    #[test]
    fn list_mode_checks_every_element() {
        let schema = json!({"items": {"type": "integer"}});
        assert_eq!(pointers(&json!([1, "a", 2, null]), &schema), vec!["/1", "/3"]);
    }

    #[test]
    fn tuple_mode_is_positional() {
        let schema = json!({"items": [{"type": "integer"}, {"type": "string"}]});
        assert!(errors(&json!([1, "a", {"anything": true}]), &schema).is_empty());
        assert_eq!(pointers(&json!(["a", 1]), &schema), vec!["/0", "/1"]);
        assert!(errors(&json!([1]), &schema).is_empty());
    }

    #[test]
    fn closed_tuple_reports_one_count_violation() {
        let schema = json!({"items": [{"type": "number"}], "additionalItems": false});
        let errs = errors(&json!([1, "x"]), &schema);
        assert_eq!(errs.len(), 1);
        assert_eq!(errs[0].kind, ErrorKind::CountViolation);
        assert_eq!(errs[0].context["expected"], json!(1));
        assert_eq!(errs[0].context["actual"], json!(2));
        assert_eq!(errs[0].pointer.to_string(), "");
    }

    #[test]
    fn additional_items_schema_covers_the_tail() {
        let schema = json!({"items": [{}], "additionalItems": {"type": "boolean"}});
        assert!(errors(&json!(["x", true, false]), &schema).is_empty());
        assert_eq!(pointers(&json!(["x", true, 3]), &schema), vec!["/2"]);
    }

    #[test]
    fn additional_items_is_ignored_in_list_mode() {
        let schema = json!({"items": {"type": "integer"}, "additionalItems": false});
        assert!(errors(&json!([1, 2, 3]), &schema).is_empty());
        assert!(errors(&json!([1, 2, 3]), &json!({"additionalItems": false})).is_empty());
    }

    #[test]
    fn malformed_additional_items_is_structural_whatever_the_data() {
        let closed = json!({"items": [{}], "additionalItems": 5});
        assert!(try_errors(&json!([1]), &closed).is_err());
        assert!(try_errors(&json!([1, 2]), &closed).is_err());
        assert!(try_errors(&json!("not an array"), &closed).is_err());
        assert!(try_errors(&json!([1]), &json!({"additionalItems": "no"})).is_err());
    }

    #[test]
    fn item_counts() {
        let schema = json!({"minItems": 1, "maxItems": 2});
        assert_eq!(kinds(&json!([]), &schema), vec![ErrorKind::CountViolation]);
        assert_eq!(kinds(&json!([1, 2, 3]), &schema), vec![ErrorKind::CountViolation]);
        assert!(errors(&json!("not an array"), &schema).is_empty());
    }

    #[test]
    fn unique_items_uses_structural_equality() {
        let schema = json!({"uniqueItems": true});
        assert!(errors(&json!([1, 2, {"a": 1}]), &schema).is_empty());
        let errs = errors(&json!([{"a": 1, "b": 2}, 3, {"b": 2, "a": 1.0}]), &schema);
        assert_eq!(errs.len(), 1);
        assert_eq!(errs[0].kind, ErrorKind::DuplicateItems);
        assert_eq!(errs[0].context["duplicates"], json!([0, 2]));
        assert!(errors(&json!([1, 1]), &json!({"uniqueItems": false})).is_empty());
    }

    #[test]
    fn contains_needs_one_match() {
        let schema = json!({"contains": {"minimum": 5}});
        assert!(errors(&json!([1, 7]), &schema).is_empty());
        assert_eq!(kinds(&json!([1, 2]), &schema), vec![ErrorKind::ContainsFailed]);
        assert_eq!(kinds(&json!([]), &schema), vec![ErrorKind::ContainsFailed]);
    }
}
