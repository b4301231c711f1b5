//! Schema model: an immutable, reference-resolved view of a JSON Schema
//! document that drives widget selection.

pub(crate) mod builder;
mod error;
mod loader;
pub(crate) mod metadata;
mod model;
mod resolver;

use indexmap::IndexMap;
use serde_json::Value;

use crate::form::{Path, PathSegment};

pub use builder::parse_form_schema;
pub use error::SchemaError;
pub use metadata::UI_SCHEMA_KEY;
pub use model::{
    ArraySchema, BooleanSchema, ChoiceOption, NodeKind, NodeType, NumberSchema, ObjectSchema,
    SchemaNode, StringSchema, UiHint,
};

#[derive(Debug, Clone)]
pub struct FormSchema {
    pub title: Option<String>,
    pub description: Option<String>,
    pub root: SchemaNode,
    /// Keyed by the `$ref` string that names them.
    pub definitions: IndexMap<String, SchemaNode>,
    raw: Value,
}

impl FormSchema {
    /// The document this schema was parsed from, annotations included.
    pub fn raw(&self) -> &Value {
        &self.raw
    }

    /// Follows references until a concrete node is reached.
    pub fn resolve<'a>(&'a self, node: &'a SchemaNode) -> Result<&'a SchemaNode, SchemaError> {
        let mut current = node;
        let mut hops = 0usize;
        while let NodeKind::Ref(reference) = &current.kind {
            if hops > self.definitions.len() {
                return Err(SchemaError::CyclicReference {
                    reference: reference.clone(),
                });
            }
            current = self
                .definitions
                .get(reference)
                .ok_or_else(|| SchemaError::UnresolvedReference {
                    reference: reference.clone(),
                })?;
            hops += 1;
        }
        Ok(current)
    }

    /// Resolved schema node governing the value at `path`, if the schema
    /// describes that location.
    pub fn node_at(&self, path: &Path) -> Result<Option<&SchemaNode>, SchemaError> {
        let mut current = self.resolve(&self.root)?;
        for segment in path.segments() {
            let next = match (&current.kind, segment) {
                (NodeKind::Object(object), PathSegment::Key(key)) => object.properties.get(key),
                (NodeKind::Array(array), PathSegment::Index(_)) => Some(array.items.as_ref()),
                _ => None,
            };
            let Some(next) = next else {
                return Ok(None);
            };
            current = self.resolve(next)?;
        }
        Ok(Some(current))
    }
}
