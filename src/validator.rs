//! Front API.
//!
//! ```
//! use serde_json::json;
//! use json_assay::{evaluate, ErrorKind, Options};
//!
//! let schema = json!({"required": ["name"], "properties": {"age": {"type": "integer"}}});
//! let errors = evaluate(&json!({"age": 4.5}), &schema, &Options::default()).unwrap();
//! let kinds: Vec<ErrorKind> = errors.iter().map(|e| e.kind).collect();
//! assert_eq!(kinds, [ErrorKind::MissingRequired, ErrorKind::TypeMismatch]);
//! ```
use serde_json::Value;

use crate::engine::{Context, Engine};
use crate::error::{StructuralError, ValidationError};
use crate::format::{FormatCheck, Formats};
use crate::options::Options;
use crate::resolver::{LocalResolver, Resolve};

/// Options plus the external collaborators an evaluation may need.
///
/// Without an explicit resolver, references resolve inside the schema being
/// evaluated.
#[derive(Clone, Copy)]
pub struct Validator<'a> {
    options: Options,
    resolver: Option<&'a dyn Resolve>,
    formats: &'a dyn FormatCheck,
}

impl Default for Validator<'_> {
    fn default() -> Self {
        Self::new(Options::default())
    }
}

impl<'a> Validator<'a> {
    pub fn new(options: Options) -> Self {
        Self { options, resolver: None, formats: &Formats }
    }

    pub fn with_resolver(mut self, resolver: &'a dyn Resolve) -> Self {
        self.resolver = Some(resolver);
        self
    }

    pub fn with_formats(mut self, formats: &'a dyn FormatCheck) -> Self {
        self.formats = formats;
        self
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Every violation of `schema` by `value`; `Err` only for structural
    /// failures.
    pub fn evaluate(&self, value: &Value, schema: &Value) -> Result<Vec<ValidationError>, StructuralError> {
        let local;
        let resolver: &dyn Resolve = match self.resolver {
            Some(resolver) => resolver,
            None => {
                local = LocalResolver::new(schema);
                &local
            }
        };
        let ctx = Context { options: &self.options, resolver, formats: self.formats };
        let errors = Engine::new(value, schema, ctx)?.evaluate()?;
        tracing::debug!(errors = errors.len(), "evaluated document");
        Ok(errors)
    }

    pub fn passes(&self, value: &Value, schema: &Value) -> Result<bool, StructuralError> {
        Ok(self.evaluate(value, schema)?.is_empty())
    }

    pub fn fails(&self, value: &Value, schema: &Value) -> Result<bool, StructuralError> {
        Ok(!self.passes(value, schema)?)
    }
}

pub fn evaluate(value: &Value, schema: &Value, options: &Options) -> Result<Vec<ValidationError>, StructuralError> {
    Validator::new(*options).evaluate(value, schema)
}

pub fn passes(value: &Value, schema: &Value, options: &Options) -> Result<bool, StructuralError> {
    Validator::new(*options).passes(value, schema)
}

pub fn fails(value: &Value, schema: &Value, options: &Options) -> Result<bool, StructuralError> {
    Validator::new(*options).fails(value, schema)
}
