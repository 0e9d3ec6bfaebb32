//! Object keywords. `properties`, `patternProperties`, `additionalProperties`
//! and schema-form `dependencies` fan out into the members.
use indexmap::IndexMap;
use serde_json::{Map, Value};

use super::{count_param, regex_param, KeywordValidator, Outcome};
use crate::engine::Engine;
use crate::error::{ErrorKind, StructuralError, ValidationError};

/// Declared properties present on the value. Absent ones are `required`'s job.
pub struct Properties;

impl KeywordValidator for Properties {
    fn apply<'a>(&self, engine: &Engine<'a>, parameter: &'a Value) -> Outcome {
        let Some(declared) = parameter.as_object() else {
            return Err(engine.invalid_parameter("properties", "expected an object of schemas"));
        };
        let Some(object) = engine.value().as_object() else { return Ok(vec![]) };
        let mut errors = Vec::new();
        for (name, schema) in declared {
            if let Some(member) = object.get(name) {
                errors.extend(engine.validate_child(member, schema, engine.pointer().key(name))?);
            }
        }
        Ok(errors)
    }
}

pub struct PatternProperties;

impl KeywordValidator for PatternProperties {
    fn apply<'a>(&self, engine: &Engine<'a>, parameter: &'a Value) -> Outcome {
        let Some(patterns) = parameter.as_object() else {
            return Err(engine.invalid_parameter("patternProperties", "expected an object of schemas"));
        };
        let Some(object) = engine.value().as_object() else { return Ok(vec![]) };
        let mut errors = Vec::new();
        for (pattern, schema) in patterns {
            let re = regex_param(engine, "patternProperties", pattern)?;
            for (name, member) in object.iter().filter(|(name, _)| re.is_match(name)) {
                errors.extend(engine.validate_child(member, schema, engine.pointer().key(name))?);
            }
        }
        Ok(errors)
    }
}

/// Members not covered by `properties` nor by any `patternProperties` pattern.
pub struct AdditionalProperties;

impl KeywordValidator for AdditionalProperties {
    fn apply<'a>(&self, engine: &Engine<'a>, parameter: &'a Value) -> Outcome {
        if !matches!(parameter, Value::Bool(_) | Value::Object(_)) {
            return Err(engine.invalid_parameter("additionalProperties", "expected a boolean or a schema"));
        }
        let Some(object) = engine.value().as_object() else { return Ok(vec![]) };
        let extras = additional_members(engine, object)?;
        if extras.is_empty() {
            return Ok(vec![]);
        }
        match parameter {
            Value::Bool(true) => Ok(vec![]),
            Value::Bool(false) => {
                let names: Vec<&str> = extras.keys().copied().collect();
                Ok(vec![engine
                    .violation(
                        "additionalProperties",
                        ErrorKind::NotAllowedProperty,
                        format!("Additional properties are not allowed: {}.", names.join(", ")),
                    )
                    .with("properties", names)])
            }
            _ => {
                let mut errors = Vec::new();
                for (name, member) in extras {
                    errors.extend(engine.validate_child(member, parameter, engine.pointer().key(name))?);
                }
                Ok(errors)
            }
        }
    }
}

/// value keys − (`properties` keys ∪ keys matched by `patternProperties`), in
/// the value's key order.
fn additional_members<'v>(
    engine: &Engine<'_>,
    object: &'v Map<String, Value>,
) -> Result<IndexMap<&'v str, &'v Value>, StructuralError> {
    let schema = engine.schema();
    let declared = schema.get("properties").and_then(Value::as_object);
    let patterns = match schema.get("patternProperties").and_then(Value::as_object) {
        Some(patterns) => patterns
            .keys()
            .map(|p| regex_param(engine, "patternProperties", p))
            .collect::<Result<Vec<_>, _>>()?,
        None => Vec::new(),
    };
    Ok(object
        .iter()
        .filter(|(name, _)| !declared.is_some_and(|d| d.contains_key(name.as_str())))
        .filter(|(name, _)| !patterns.iter().any(|re| re.is_match(name)))
        .map(|(name, member)| (name.as_str(), member))
        .collect())
}

/// One error naming every missing property, not one per name.
pub struct Required;

impl KeywordValidator for Required {
    fn apply<'a>(&self, engine: &Engine<'a>, parameter: &'a Value) -> Outcome {
        let names = string_list(engine, "required", parameter)?;
        let Some(object) = engine.value().as_object() else { return Ok(vec![]) };
        let missing: Vec<&str> = names.into_iter().filter(|n| !object.contains_key(*n)).collect();
        if missing.is_empty() {
            return Ok(vec![]);
        }
        Ok(vec![engine
            .violation(
                "required",
                ErrorKind::MissingRequired,
                format!("Required properties missing: {}.", missing.join(", ")),
            )
            .with("missing", missing)])
    }
}

/// `name → [names]`: co-required properties. `name → schema`: the whole value
/// must also satisfy the schema.
pub struct Dependencies;

impl KeywordValidator for Dependencies {
    fn apply<'a>(&self, engine: &Engine<'a>, parameter: &'a Value) -> Outcome {
        let Some(dependencies) = parameter.as_object() else {
            return Err(engine.invalid_parameter("dependencies", "expected an object"));
        };
        let Some(object) = engine.value().as_object() else { return Ok(vec![]) };
        let mut errors = Vec::new();
        for (property, dependency) in dependencies {
            if !object.contains_key(property) {
                continue;
            }
            match dependency {
                Value::Array(_) => {
                    let names = string_list(engine, "dependencies", dependency)?;
                    let missing: Vec<&str> = names.into_iter().filter(|n| !object.contains_key(*n)).collect();
                    if !missing.is_empty() {
                        errors.push(missing_dependency(engine, property, missing));
                    }
                }
                Value::Object(_) | Value::Bool(_) => {
                    errors.extend(engine.validate_child(engine.value(), dependency, engine.pointer().clone())?);
                }
                _ => return Err(engine.invalid_parameter("dependencies", "expected a list of names or a schema")),
            }
        }
        Ok(errors)
    }
}

fn missing_dependency(engine: &Engine<'_>, property: &str, missing: Vec<&str>) -> ValidationError {
    engine
        .violation(
            "dependencies",
            ErrorKind::MissingDependency,
            format!("Property {property:?} requires {}.", missing.join(", ")),
        )
        .with("property", property)
        .with("missing", missing)
}

pub struct MinProperties;

impl KeywordValidator for MinProperties {
    fn apply<'a>(&self, engine: &Engine<'a>, parameter: &'a Value) -> Outcome {
        let min = count_param(engine, "minProperties", parameter)?;
        match engine.value().as_object() {
            Some(object) if object.len() < min => Ok(vec![engine
                .violation(
                    "minProperties",
                    ErrorKind::CountViolation,
                    format!("Object has {} properties, at least {min} are required.", object.len()),
                )
                .with("expected", min)
                .with("actual", object.len())]),
            _ => Ok(vec![]),
        }
    }
}

pub struct MaxProperties;

impl KeywordValidator for MaxProperties {
    fn apply<'a>(&self, engine: &Engine<'a>, parameter: &'a Value) -> Outcome {
        let max = count_param(engine, "maxProperties", parameter)?;
        match engine.value().as_object() {
            Some(object) if object.len() > max => Ok(vec![engine
                .violation(
                    "maxProperties",
                    ErrorKind::CountViolation,
                    format!("Object has {} properties, at most {max} are allowed.", object.len()),
                )
                .with("expected", max)
                .with("actual", object.len())]),
            _ => Ok(vec![]),
        }
    }
}

/// Every key, as a string value, must satisfy the schema. Errors point at the
/// object itself.
pub struct PropertyNames;

impl KeywordValidator for PropertyNames {
    fn apply<'a>(&self, engine: &Engine<'a>, parameter: &'a Value) -> Outcome {
        let Some(object) = engine.value().as_object() else { return Ok(vec![]) };
        let mut errors = Vec::new();
        for name in object.keys() {
            let key = Value::String(name.clone());
            errors.extend(engine.validate_child(&key, parameter, engine.pointer().clone())?);
        }
        Ok(errors)
    }
}

fn string_list<'p>(engine: &Engine<'_>, keyword: &str, parameter: &'p Value) -> Result<Vec<&'p str>, StructuralError> {
    parameter
        .as_array()
        .and_then(|list| list.iter().map(Value::as_str).collect::<Option<Vec<_>>>())
        .ok_or_else(|| engine.invalid_parameter(keyword, "expected a list of property names"))
}

#[cfg(test)]
mod tests {
    use super::super::testing::{errors, kinds, pointers, try_errors};
    use crate::error::ErrorKind;
    use serde_json::json;

    #[test]
    fn properties_skip_absent_members() {
        let schema = json!({"properties": {"a": {"type": "string"}, "b": {"type": "integer"}}});
        assert!(errors(&json!({}), &schema).is_empty());
        assert_eq!(pointers(&json!({"a": 1, "b": "x"}), &schema), vec!["/a", "/b"]);
        assert!(errors(&json!([1, 2]), &schema).is_empty());
    }

    #[test]
    fn closed_object_reports_type_and_extra() {
        let schema = json!({"properties": {"x": {"type": "string"}}, "additionalProperties": false});
        let errs = errors(&json!({"x": 1, "y": 2}), &schema);
        assert_eq!(errs.len(), 2);
        assert_eq!(errs[0].kind, ErrorKind::TypeMismatch);
        assert_eq!(errs[0].pointer.to_string(), "/x");
        assert_eq!(errs[1].kind, ErrorKind::NotAllowedProperty);
        assert_eq!(errs[1].pointer.to_string(), "");
        assert!(errs[1].message.contains('y'));
        assert_eq!(errs[1].context["properties"], json!(["y"]));
    }

    #[test]
    fn pattern_properties_match_by_search() {
        let schema = json!({
            "patternProperties": {"^x-": {"type": "string"}, "id$": {"type": "integer"}},
            "additionalProperties": false
        });
        assert!(errors(&json!({"x-a": "s", "userid": 3}), &schema).is_empty());
        let errs = errors(&json!({"x-a": 1, "x-id": "s", "other": null}), &schema);
        let got: Vec<(String, ErrorKind)> = errs.iter().map(|e| (e.pointer.to_string(), e.kind)).collect();
        assert_eq!(
            got,
            vec![
                ("/x-a".to_string(), ErrorKind::TypeMismatch),
                ("/x-id".to_string(), ErrorKind::TypeMismatch),
                (String::new(), ErrorKind::NotAllowedProperty),
            ]
        );

        // a declared key that also matches a pattern answers to both schemas
        let both = json!({
            "properties": {"x-id": {"type": "string"}},
            "patternProperties": {"^x-": {"minimum": 10}},
            "additionalProperties": false
        });
        assert!(errors(&json!({"x-id": "abc"}), &both).is_empty());
        let errs = errors(&json!({"x-id": 5}), &both);
        let got: Vec<(String, ErrorKind)> = errs.iter().map(|e| (e.pointer.to_string(), e.kind)).collect();
        assert_eq!(
            got,
            vec![("/x-id".to_string(), ErrorKind::TypeMismatch), ("/x-id".to_string(), ErrorKind::RangeViolation)]
        );
    }

    #[test]
    fn malformed_additional_properties_is_structural_whatever_the_data() {
        let schema = json!({"properties": {"a": {}}, "additionalProperties": 5});
        assert!(try_errors(&json!({"a": 1}), &schema).is_err());
        assert!(try_errors(&json!({"a": 1, "b": 2}), &schema).is_err());
        assert!(try_errors(&json!([]), &schema).is_err());
    }

    #[test]
    fn additional_properties_schema_sees_only_extras() {
        let schema = json!({"properties": {"a": {}}, "additionalProperties": {"type": "number"}});
        assert!(errors(&json!({"a": "text", "b": 1}), &schema).is_empty());
        assert_eq!(pointers(&json!({"a": "text", "b": "no", "c": 2}), &schema), vec!["/b"]);
    }

    #[test]
    fn required_reports_once() {
        let errs = errors(&json!({}), &json!({"required": ["a"]}));
        assert_eq!(errs.len(), 1);
        assert_eq!(errs[0].kind, ErrorKind::MissingRequired);

        let errs = errors(&json!({"b": 1}), &json!({"required": ["a", "b", "c"]}));
        assert_eq!(errs.len(), 1);
        assert_eq!(errs[0].context["missing"], json!(["a", "c"]));
    }

    #[test]
    fn dependencies_by_list_and_by_schema() {
        let schema = json!({
            "dependencies": {
                "card": ["billing", "cvv"],
                "coupon": {"required": ["code"], "properties": {"code": {"type": "string"}}}
            }
        });
        assert!(errors(&json!({"name": "x"}), &schema).is_empty());
        let errs = errors(&json!({"card": 1, "billing": "a"}), &schema);
        assert_eq!(errs.len(), 1);
        assert_eq!(errs[0].kind, ErrorKind::MissingDependency);
        assert_eq!(errs[0].context["missing"], json!(["cvv"]));
        assert_eq!(kinds(&json!({"coupon": true}), &schema), vec![ErrorKind::MissingRequired]);
        assert_eq!(pointers(&json!({"coupon": true, "code": 5}), &schema), vec!["/code"]);

        // boolean schemas as dependencies
        let schema = json!({"dependencies": {"legacy": false, "modern": true}});
        assert!(errors(&json!({"modern": 1, "other": 2}), &schema).is_empty());
        let errs = errors(&json!({"legacy": 1}), &schema);
        assert_eq!(errs.len(), 1);
        assert_eq!(errs[0].kind, ErrorKind::FalseSchema);
        assert_eq!(errs[0].pointer.to_string(), "");
    }

    #[test]
    fn property_counts_and_names() {
        let schema = json!({"minProperties": 1, "maxProperties": 2, "propertyNames": {"maxLength": 3}});
        assert_eq!(kinds(&json!({}), &schema), vec![ErrorKind::CountViolation]);
        assert_eq!(
            kinds(&json!({"a": 1, "b": 2, "long": 3}), &schema),
            vec![ErrorKind::CountViolation, ErrorKind::LengthViolation]
        );
    }
}
