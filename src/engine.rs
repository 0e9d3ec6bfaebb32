//! Validation engine: one (value, schema) pair at one point of the tree.
//!
//! - `evaluate` guards depth, then dispatches every keyword of the node and
//!   collects every error; it never stops at the first failure.
//! - `descend` is the only recursion primitive: keyword handlers build child
//!   engines with it and splice the child's errors into their own list.
//! - Evaluation is pure: no accumulator lives on the engine, so evaluating
//!   twice recomputes from scratch.
use serde_json::Value;

use crate::error::{ErrorKind, StructuralError, ValidationError};
use crate::format::FormatCheck;
use crate::keywords;
use crate::options::Options;
use crate::pointer::Pointer;
use crate::resolver::Resolve;
use crate::schema::{reference_of, SchemaNode};

/// Collaborators shared, read-only, by every engine of one evaluation.
#[derive(Clone, Copy)]
pub struct Context<'a> {
    pub options: &'a Options,
    pub resolver: &'a dyn Resolve,
    pub formats: &'a dyn FormatCheck,
}

pub struct Engine<'a> {
    value: &'a Value,
    schema: SchemaNode<'a>,
    base: &'a str,
    pointer: Pointer,
    depth: usize,
    ctx: Context<'a>,
}

impl<'a> Engine<'a> {
    /// Root engine: depth 0, empty pointer, references resolved against the
    /// root document.
    pub fn new(value: &'a Value, schema: &'a Value, ctx: Context<'a>) -> Result<Self, StructuralError> {
        Self::bind(value, schema, "", Pointer::root(), 0, ctx)
    }

    fn bind(
        value: &'a Value,
        schema: &'a Value,
        base: &'a str,
        pointer: Pointer,
        depth: usize,
        ctx: Context<'a>,
    ) -> Result<Self, StructuralError> {
        let mut node = schema;
        let mut base = base;
        // hops are bounded separately so `{"$ref": "#"}` cannot spin forever;
        // they do not add to the depth of the bound engine
        let mut hops = 0;
        while let Some(reference) = reference_of(node, &pointer)? {
            hops += 1;
            if hops > ctx.options.max_depth {
                return Err(depth_exceeded(ctx.options, &pointer));
            }
            tracing::trace!(reference, hops, pointer = %pointer, "following reference");
            let resolved = ctx.resolver.resolve(base, reference).ok_or_else(|| {
                StructuralError::UnresolvedReference {
                    reference: reference.to_string(),
                    pointer: pointer.to_string(),
                }
            })?;
            node = resolved.node;
            base = resolved.base;
        }
        let schema = SchemaNode::from_value(node, &pointer)?;
        Ok(Self { value, schema, base, pointer, depth, ctx })
    }

    // ---------------------------- accessors ------------------------------ //

    pub fn value(&self) -> &'a Value {
        self.value
    }

    pub fn schema(&self) -> SchemaNode<'a> {
        self.schema
    }

    pub fn pointer(&self) -> &Pointer {
        &self.pointer
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn options(&self) -> &'a Options {
        self.ctx.options
    }

    pub fn formats(&self) -> &'a dyn FormatCheck {
        self.ctx.formats
    }

    // ---------------------------- evaluation ----------------------------- //

    pub fn evaluate(&self) -> Result<Vec<ValidationError>, StructuralError> {
        if self.depth > self.ctx.options.max_depth {
            return Err(depth_exceeded(self.ctx.options, &self.pointer));
        }
        let mut errors = Vec::new();
        match self.schema {
            SchemaNode::Bool(true) => {}
            SchemaNode::Bool(false) => errors.push(
                ValidationError::new(
                    ErrorKind::FalseSchema,
                    "No value is allowed here (schema is `false`).",
                    self.value,
                    &self.pointer,
                )
                .with("keyword", Value::Null)
                .with("parameter", false),
            ),
            SchemaNode::Object(_) => {
                for (name, parameter) in self.schema.keywords() {
                    match keywords::dispatch(self, name, parameter) {
                        Some(outcome) => errors.extend(outcome?),
                        None => tracing::trace!(keyword = name, pointer = %self.pointer, "skipping unknown keyword"),
                    }
                }
            }
        }
        Ok(errors)
    }

    pub fn passes(&self) -> Result<bool, StructuralError> {
        Ok(self.evaluate()?.is_empty())
    }

    /// Child engine one level down, bound to `value` at `pointer`.
    pub fn descend<'b>(
        &self,
        value: &'b Value,
        schema: &'b Value,
        pointer: Pointer,
    ) -> Result<Engine<'b>, StructuralError>
    where
        'a: 'b,
    {
        Engine::bind(value, schema, self.base, pointer, self.depth + 1, self.ctx)
    }

    /// Errors of `value` against `schema`, already located under `pointer`.
    pub fn validate_child<'b>(
        &self,
        value: &'b Value,
        schema: &'b Value,
        pointer: Pointer,
    ) -> Result<Vec<ValidationError>, StructuralError>
    where
        'a: 'b,
    {
        self.descend(value, schema, pointer)?.evaluate()
    }

    /// Does this engine's own value pass `schema`? Structural failures are
    /// propagated, not counted as a failed probe.
    pub fn probe(&self, schema: &'a Value) -> Result<bool, StructuralError> {
        self.descend(self.value, schema, self.pointer.clone())?.passes()
    }

    // ----------------------------- errors -------------------------------- //

    /// Error record for this engine's value failing `keyword`.
    pub fn violation(&self, keyword: &str, kind: ErrorKind, message: impl Into<String>) -> ValidationError {
        let parameter = self.schema.get(keyword).cloned().unwrap_or(Value::Null);
        ValidationError::new(kind, message, self.value, &self.pointer)
            .with("keyword", keyword)
            .with("parameter", parameter)
    }

    pub fn invalid_parameter(&self, keyword: &str, reason: impl Into<String>) -> StructuralError {
        let err = StructuralError::InvalidParameter {
            keyword: keyword.to_string(),
            pointer: self.pointer.to_string(),
            reason: reason.into(),
        };
        tracing::debug!(error = %err, "malformed keyword parameter");
        err
    }
}

fn depth_exceeded(options: &Options, pointer: &Pointer) -> StructuralError {
    let err = StructuralError::MaxDepthExceeded {
        max_depth: options.max_depth,
        pointer: pointer.to_string(),
    };
    tracing::debug!(error = %err, "aborting evaluation");
    err
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::Formats;
    use crate::resolver::LocalResolver;
    use serde_json::json;

    fn run(value: &Value, schema: &Value, options: &Options) -> Result<Vec<ValidationError>, StructuralError> {
        let resolver = LocalResolver::new(schema);
        let ctx = Context { options, resolver: &resolver, formats: &Formats };
        Engine::new(value, schema, ctx)?.evaluate()
    }

    #[test]
    fn empty_schema_accepts_everything() {
        let o = Options::default();
        for v in [json!(null), json!(1), json!("s"), json!([1, {}]), json!({"a": [true]})] {
            assert_eq!(run(&v, &json!({}), &o).unwrap(), vec![]);
            assert_eq!(run(&v, &json!(true), &o).unwrap(), vec![]);
        }
    }

    #[test]
    fn false_schema_rejects_everything() {
        let errors = run(&json!(1), &json!(false), &Options::default()).unwrap();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ErrorKind::FalseSchema);
    }

    #[test]
    fn unknown_keywords_are_ignored() {
        let schema = json!({"x-vendor": {"anything": 1}, "description": "d", "type": "string"});
        let errors = run(&json!(1), &schema, &Options::default()).unwrap();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ErrorKind::TypeMismatch);
    }

    #[test]
    fn plain_string_schema_is_structural() {
        let err = run(&json!(1), &json!("string"), &Options::default()).unwrap_err();
        assert!(matches!(err, StructuralError::InvalidSchema { found: "string", .. }));
    }

    #[test]
    fn self_reference_hits_the_depth_guard() {
        let schema = json!({"$ref": "#"});
        let err = run(&json!(1), &schema, &Options::default()).unwrap_err();
        assert_eq!(err, StructuralError::MaxDepthExceeded { max_depth: 10, pointer: String::new() });
    }

    #[test]
    fn recursive_schema_is_bounded_by_data_depth() {
        let schema = json!({"type": "object", "properties": {"child": {"$ref": "#"}}});
        let shallow = json!({"child": {"child": {}}});
        assert_eq!(run(&shallow, &schema, &Options::default()).unwrap(), vec![]);

        let mut deep = json!({});
        for _ in 0..12 {
            deep = json!({ "child": deep });
        }
        let err = run(&deep, &schema, &Options::default()).unwrap_err();
        assert!(matches!(err, StructuralError::MaxDepthExceeded { max_depth: 10, .. }));
        // a larger budget lets the same document through
        assert!(run(&deep, &schema, &Options::default().with_max_depth(40)).unwrap().is_empty());
    }

    #[test]
    fn references_do_not_consume_depth() {
        let mut data = json!({});
        let mut inline = json!({});
        for _ in 0..6 {
            data = json!({ "next": data });
            inline = json!({ "properties": { "next": inline } });
        }
        let linked = json!({
            "definitions": {"node": {"properties": {"next": {"$ref": "#/definitions/node"}}}},
            "$ref": "#/definitions/node"
        });
        let o = Options::default();
        assert_eq!(run(&data, &inline, &o).unwrap(), vec![]);
        assert_eq!(run(&data, &linked, &o).unwrap(), vec![]);

        // data deeper than the budget still trips the guard
        data = json!({ "next": data });
        for _ in 0..5 {
            data = json!({ "next": data });
        }
        let err = run(&data, &linked, &o).unwrap_err();
        assert!(matches!(err, StructuralError::MaxDepthExceeded { max_depth: 10, .. }));
    }

    #[test]
    fn reference_chains_are_bounded() {
        let schema = json!({
            "definitions": {"a": {"$ref": "#/definitions/b"}, "b": {"$ref": "#/definitions/a"}},
            "$ref": "#/definitions/a"
        });
        let err = run(&json!(1), &schema, &Options::default()).unwrap_err();
        assert_eq!(err, StructuralError::MaxDepthExceeded { max_depth: 10, pointer: String::new() });
    }

    #[test]
    fn unresolvable_reference_is_structural() {
        let err = run(&json!(1), &json!({"$ref": "#/definitions/missing"}), &Options::default()).unwrap_err();
        assert!(matches!(err, StructuralError::UnresolvedReference { .. }));
    }

    #[test]
    fn evaluate_is_repeatable() {
        let schema = json!({"required": ["a"], "minProperties": 2});
        let value = json!({});
        let o = Options::default();
        let resolver = LocalResolver::new(&schema);
        let ctx = Context { options: &o, resolver: &resolver, formats: &Formats };
        let engine = Engine::new(&value, &schema, ctx).unwrap();
        let first = engine.evaluate().unwrap();
        assert_eq!(first.len(), 2);
        assert_eq!(engine.evaluate().unwrap(), first);
    }

    #[test]
    fn descend_extends_pointer_and_depth() {
        let schema = json!({});
        let value = json!({"a": [1]});
        let o = Options::default();
        let resolver = LocalResolver::new(&schema);
        let ctx = Context { options: &o, resolver: &resolver, formats: &Formats };
        let root = Engine::new(&value, &schema, ctx).unwrap();
        let child = root.descend(&value["a"], &schema, root.pointer().key("a")).unwrap();
        let grandchild = child.descend(&value["a"][0], &schema, child.pointer().index(0)).unwrap();
        assert_eq!(grandchild.pointer().to_string(), "/a/0");
        assert_eq!(grandchild.depth(), 2);
        assert_eq!(root.pointer().to_string(), "");
    }
}
