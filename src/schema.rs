//! Typed view over a schema node.
//!
//! A node is a mapping of keyword → parameter, a boolean (`true` accepts
//! everything, `false` nothing), or a reference (a mapping carrying `$ref`)
//! that has to be resolved before dispatch.
use serde_json::{Map, Value};

use crate::error::StructuralError;
use crate::pointer::Pointer;
use crate::value::type_name;

pub const REF: &str = "$ref";

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SchemaNode<'a> {
    Bool(bool),
    Object(&'a Map<String, Value>),
}

impl<'a> SchemaNode<'a> {
    pub fn from_value(v: &'a Value, pointer: &Pointer) -> Result<Self, StructuralError> {
        match v {
            Value::Bool(b) => Ok(SchemaNode::Bool(*b)),
            Value::Object(map) => Ok(SchemaNode::Object(map)),
            other => Err(StructuralError::InvalidSchema {
                pointer: pointer.to_string(),
                found: type_name(other),
            }),
        }
    }

    pub fn get(self, keyword: &str) -> Option<&'a Value> {
        match self {
            SchemaNode::Object(map) => map.get(keyword),
            SchemaNode::Bool(_) => None,
        }
    }

    /// Keyword/parameter pairs in schema order.
    pub fn keywords(self) -> impl Iterator<Item = (&'a str, &'a Value)> {
        let map = match self {
            SchemaNode::Object(map) => Some(map),
            SchemaNode::Bool(_) => None,
        };
        map.into_iter().flatten().map(|(k, v)| (k.as_str(), v))
    }

    /// True for boolean modifiers such as `exclusiveMinimum: true`.
    pub fn flag(self, keyword: &str) -> bool {
        matches!(self.get(keyword), Some(Value::Bool(true)))
    }
}

/// The `$ref` target of `v`, if `v` is a reference node.
pub fn reference_of<'a>(v: &'a Value, pointer: &Pointer) -> Result<Option<&'a str>, StructuralError> {
    let Some(raw) = v.as_object().and_then(|map| map.get(REF)) else {
        return Ok(None);
    };
    match raw {
        Value::String(s) => Ok(Some(s)),
        other => Err(StructuralError::InvalidParameter {
            keyword: REF.to_string(),
            pointer: pointer.to_string(),
            reason: format!("expected a string, found {}", type_name(other)),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn objects_and_booleans_are_schemas() {
        let obj = json!({"type": "string", "minLength": 1});
        let node = SchemaNode::from_value(&obj, &Pointer::root()).unwrap();
        let names: Vec<&str> = node.keywords().map(|(k, _)| k).collect();
        assert_eq!(names, ["type", "minLength"]);
        assert_eq!(node.get("type"), Some(&json!("string")));

        let yes = json!(true);
        let node = SchemaNode::from_value(&yes, &Pointer::root()).unwrap();
        assert_eq!(node, SchemaNode::Bool(true));
        assert_eq!(node.keywords().count(), 0);
    }

    #[test]
    fn strings_are_not_schemas() {
        let s = json!("string");
        let err = SchemaNode::from_value(&s, &Pointer::root().key("a")).unwrap_err();
        assert_eq!(err, StructuralError::InvalidSchema { pointer: "/a".into(), found: "string" });
    }

    #[test]
    fn references_are_recognised() {
        let p = Pointer::root();
        assert_eq!(reference_of(&json!({"$ref": "#/definitions/a"}), &p).unwrap(), Some("#/definitions/a"));
        assert_eq!(reference_of(&json!({"type": "null"}), &p).unwrap(), None);
        assert!(reference_of(&json!({"$ref": 3}), &p).is_err());
    }

    #[test]
    fn sibling_flags() {
        let obj = json!({"minimum": 1, "exclusiveMinimum": true});
        let node = SchemaNode::from_value(&obj, &Pointer::root()).unwrap();
        assert!(node.flag("exclusiveMinimum"));
        assert!(!node.flag("exclusiveMaximum"));
    }
}
