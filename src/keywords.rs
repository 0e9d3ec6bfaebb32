//! Constraint dispatcher: a static keyword → handler table.
//!
//! Keywords without an entry (annotations, vendor extensions, later drafts)
//! have no handler and are skipped by the engine.
pub mod arr;
pub mod combinators;
pub mod num;
pub mod obj;
pub mod str;
pub mod types;

use serde_json::Value;

use crate::engine::Engine;
use crate::error::{StructuralError, ValidationError};

pub type Outcome = Result<Vec<ValidationError>, StructuralError>;

/// One keyword's check. `parameter` is the keyword's value in the schema;
/// sibling keywords are read through `engine.schema()`.
pub trait KeywordValidator: Sync {
    fn apply<'a>(&self, engine: &Engine<'a>, parameter: &'a Value) -> Outcome;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    Type,
    Enum,
    Const,
    Minimum,
    Maximum,
    ExclusiveMinimum,
    ExclusiveMaximum,
    MultipleOf,
    MinLength,
    MaxLength,
    Pattern,
    Format,
    Items,
    AdditionalItems,
    MinItems,
    MaxItems,
    UniqueItems,
    Contains,
    Properties,
    PatternProperties,
    AdditionalProperties,
    Required,
    Dependencies,
    MinProperties,
    MaxProperties,
    PropertyNames,
    AllOf,
    AnyOf,
    OneOf,
    Not,
}

impl Keyword {
    pub const ALL: [Keyword; 30] = [
        Keyword::Type,
        Keyword::Enum,
        Keyword::Const,
        Keyword::Minimum,
        Keyword::Maximum,
        Keyword::ExclusiveMinimum,
        Keyword::ExclusiveMaximum,
        Keyword::MultipleOf,
        Keyword::MinLength,
        Keyword::MaxLength,
        Keyword::Pattern,
        Keyword::Format,
        Keyword::Items,
        Keyword::AdditionalItems,
        Keyword::MinItems,
        Keyword::MaxItems,
        Keyword::UniqueItems,
        Keyword::Contains,
        Keyword::Properties,
        Keyword::PatternProperties,
        Keyword::AdditionalProperties,
        Keyword::Required,
        Keyword::Dependencies,
        Keyword::MinProperties,
        Keyword::MaxProperties,
        Keyword::PropertyNames,
        Keyword::AllOf,
        Keyword::AnyOf,
        Keyword::OneOf,
        Keyword::Not,
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.name() == name)
    }

    pub fn name(self) -> &'static str {
        match self {
            Keyword::Type => "type",
            Keyword::Enum => "enum",
            Keyword::Const => "const",
            Keyword::Minimum => "minimum",
            Keyword::Maximum => "maximum",
            Keyword::ExclusiveMinimum => "exclusiveMinimum",
            Keyword::ExclusiveMaximum => "exclusiveMaximum",
            Keyword::MultipleOf => "multipleOf",
            Keyword::MinLength => "minLength",
            Keyword::MaxLength => "maxLength",
            Keyword::Pattern => "pattern",
            Keyword::Format => "format",
            Keyword::Items => "items",
            Keyword::AdditionalItems => "additionalItems",
            Keyword::MinItems => "minItems",
            Keyword::MaxItems => "maxItems",
            Keyword::UniqueItems => "uniqueItems",
            Keyword::Contains => "contains",
            Keyword::Properties => "properties",
            Keyword::PatternProperties => "patternProperties",
            Keyword::AdditionalProperties => "additionalProperties",
            Keyword::Required => "required",
            Keyword::Dependencies => "dependencies",
            Keyword::MinProperties => "minProperties",
            Keyword::MaxProperties => "maxProperties",
            Keyword::PropertyNames => "propertyNames",
            Keyword::AllOf => "allOf",
            Keyword::AnyOf => "anyOf",
            Keyword::OneOf => "oneOf",
            Keyword::Not => "not",
        }
    }

    pub fn handler(self) -> &'static dyn KeywordValidator {
        match self {
            Keyword::Type => &types::Type,
            Keyword::Enum => &types::Enum,
            Keyword::Const => &types::Const,
            Keyword::Minimum => &num::Minimum,
            Keyword::Maximum => &num::Maximum,
            Keyword::ExclusiveMinimum => &num::ExclusiveMinimum,
            Keyword::ExclusiveMaximum => &num::ExclusiveMaximum,
            Keyword::MultipleOf => &num::MultipleOf,
            Keyword::MinLength => &str::MinLength,
            Keyword::MaxLength => &str::MaxLength,
            Keyword::Pattern => &str::Pattern,
            Keyword::Format => &str::Format,
            Keyword::Items => &arr::Items,
            Keyword::AdditionalItems => &arr::AdditionalItems,
            Keyword::MinItems => &arr::MinItems,
            Keyword::MaxItems => &arr::MaxItems,
            Keyword::UniqueItems => &arr::UniqueItems,
            Keyword::Contains => &arr::Contains,
            Keyword::Properties => &obj::Properties,
            Keyword::PatternProperties => &obj::PatternProperties,
            Keyword::AdditionalProperties => &obj::AdditionalProperties,
            Keyword::Required => &obj::Required,
            Keyword::Dependencies => &obj::Dependencies,
            Keyword::MinProperties => &obj::MinProperties,
            Keyword::MaxProperties => &obj::MaxProperties,
            Keyword::PropertyNames => &obj::PropertyNames,
            Keyword::AllOf => &combinators::AllOf,
            Keyword::AnyOf => &combinators::AnyOf,
            Keyword::OneOf => &combinators::OneOf,
            Keyword::Not => &combinators::Not,
        }
    }
}

/// Run the handler registered for `name`, if any.
pub fn dispatch<'a>(engine: &Engine<'a>, name: &str, parameter: &'a Value) -> Option<Outcome> {
    let keyword = Keyword::from_name(name)?;
    Some(keyword.handler().apply(engine, parameter))
}

// ------------------------- shared parameter reads ------------------------- //

/// Non-negative integer parameter (`minLength`, `maxItems`, ...).
pub(crate) fn count_param(engine: &Engine<'_>, keyword: &str, parameter: &Value) -> Result<usize, StructuralError> {
    parameter
        .as_u64()
        .or_else(|| parameter.as_f64().filter(|f| *f >= 0.0 && f.fract() == 0.0).map(|f| f as u64))
        .map(|n| n as usize)
        .ok_or_else(|| engine.invalid_parameter(keyword, "expected a non-negative integer"))
}

pub(crate) fn number_param(engine: &Engine<'_>, keyword: &str, parameter: &Value) -> Result<f64, StructuralError> {
    parameter
        .as_f64()
        .ok_or_else(|| engine.invalid_parameter(keyword, "expected a number"))
}

pub(crate) fn schema_list<'a>(
    engine: &Engine<'_>,
    keyword: &str,
    parameter: &'a Value,
) -> Result<&'a Vec<Value>, StructuralError> {
    match parameter.as_array() {
        Some(list) if !list.is_empty() => Ok(list),
        _ => Err(engine.invalid_parameter(keyword, "expected a non-empty list of schemas")),
    }
}

pub(crate) fn regex_param(engine: &Engine<'_>, keyword: &str, pattern: &str) -> Result<regex::Regex, StructuralError> {
    regex::Regex::new(pattern).map_err(|e| engine.invalid_parameter(keyword, format!("invalid regex `{pattern}`: {e}")))
}
