//! Reference resolution.
//!
//! The engine never loads or fetches anything: it hands `$ref` strings to a
//! [`Resolve`] implementation and gets back an already-loaded node.
use indexmap::IndexMap;
use serde_json::Value;

/// A dereferenced node and the id of the document it lives in. Fragment-only
/// references found inside `node` resolve against `base`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolved<'r> {
    pub base: &'r str,
    pub node: &'r Value,
}

/// Turns a reference into a concrete node.
///
/// Must terminate and be idempotent: the same `(base, reference)` always yields
/// the same node. Cycles are fine; the engine's depth guard handles them.
pub trait Resolve: Sync {
    fn resolve<'r>(&'r self, base: &str, reference: &str) -> Option<Resolved<'r>>;
}

/// In-memory resolver over a root schema plus documents registered by id.
///
/// `"#/definitions/a"` resolves inside the current base document,
/// `"other.json#/a"` inside the document registered as `other.json`.
/// No URI joining: document ids are matched verbatim.
#[derive(Debug, Clone)]
pub struct LocalResolver<'s> {
    root: &'s Value,
    documents: IndexMap<&'s str, &'s Value>,
}

impl<'s> LocalResolver<'s> {
    pub fn new(root: &'s Value) -> Self {
        let mut documents = IndexMap::new();
        if let Some(id) = document_id(root) {
            documents.insert(id, root);
        }
        Self { root, documents }
    }

    pub fn with_document(mut self, id: &'s str, document: &'s Value) -> Self {
        self.documents.insert(id.trim_end_matches('#'), document);
        self
    }

    pub fn document_ids(&self) -> impl Iterator<Item = &'s str> + '_ {
        self.documents.keys().copied()
    }

    fn document<'r>(&'r self, id: &str) -> Option<(&'r str, &'r Value)> {
        if id.is_empty() {
            return Some(("", self.root));
        }
        self.documents.get_key_value(id).map(|(k, v)| (*k, *v))
    }
}

impl Resolve for LocalResolver<'_> {
    fn resolve<'r>(&'r self, base: &str, reference: &str) -> Option<Resolved<'r>> {
        let (doc, fragment) = match reference.split_once('#') {
            Some((doc, fragment)) => (doc, fragment),
            None => (reference, ""),
        };
        let doc = if doc.is_empty() { base } else { doc };
        let (base, document) = self.document(doc)?;
        let node = if fragment.is_empty() {
            document
        } else if fragment.starts_with('/') {
            document.pointer(fragment)?
        } else {
            // plain-name fragments (`#foo`) are not supported
            return None;
        };
        tracing::trace!(reference, base, "resolved reference");
        Some(Resolved { base, node })
    }
}

fn document_id(v: &Value) -> Option<&str> {
    let map = v.as_object()?;
    map.get("$id")
        .or_else(|| map.get("id"))
        .and_then(Value::as_str)
        .map(|id| id.trim_end_matches('#'))
        .filter(|id| !id.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn fragment_pointers_resolve_in_root() {
        let root = json!({"definitions": {"a/b": {"type": "integer"}, "list": [{"type": "null"}]}});
        let r = LocalResolver::new(&root);
        let hit = r.resolve("", "#/definitions/a~1b").unwrap();
        assert_eq!(hit.node, &json!({"type": "integer"}));
        assert_eq!(hit.base, "");
        assert_eq!(r.resolve("", "#/definitions/list/0").unwrap().node, &json!({"type": "null"}));
        assert_eq!(r.resolve("", "#").unwrap().node, &root);
    }

    #[test]
    fn registered_documents_become_the_new_base() {
        let root = json!({"$ref": "other.json#/positive"});
        let other = json!({"positive": {"minimum": 0}, "alias": {"$ref": "#/positive"}});
        let r = LocalResolver::new(&root).with_document("other.json", &other);
        let hit = r.resolve("", "other.json#/alias").unwrap();
        assert_eq!(hit.base, "other.json");
        // fragment-only refs inside `other.json` stay inside it
        let inner = r.resolve(hit.base, "#/positive").unwrap();
        assert_eq!(inner.node, &json!({"minimum": 0}));
        assert_eq!(r.resolve("", "other.json").unwrap().node, &other);
    }

    #[test]
    fn root_is_registered_under_its_id() {
        let root = json!({"id": "http://example.com/root.json#", "definitions": {"x": true}});
        let r = LocalResolver::new(&root);
        assert_eq!(r.document_ids().collect::<Vec<_>>(), ["http://example.com/root.json"]);
        assert_eq!(r.resolve("", "http://example.com/root.json#/definitions/x").unwrap().node, &json!(true));
    }

    #[test]
    fn misses_are_none() {
        let root = json!({});
        let r = LocalResolver::new(&root);
        assert!(r.resolve("", "#/nope").is_none());
        assert!(r.resolve("", "missing.json#").is_none());
        assert!(r.resolve("", "#anchor").is_none());
    }
}
