use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::form::Path;
use crate::schema::{NodeType, SchemaError, SchemaNode};

use super::{RenderedField, Renderer};

/// Override renderer for one declared schema type.
///
/// Receives the resolved node; composite overrides recurse through
/// [`Renderer::render_field`] like the built-in widgets do.
pub trait FieldRenderer: Send + Sync {
    fn render(
        &self,
        renderer: &Renderer<'_>,
        node: &SchemaNode,
        path: &Path,
    ) -> Result<RenderedField, SchemaError>;
}

struct FnRenderer<F>(F);

impl<F> FieldRenderer for FnRenderer<F>
where
    F: Fn(&Renderer<'_>, &SchemaNode, &Path) -> Result<RenderedField, SchemaError> + Send + Sync,
{
    fn render(
        &self,
        renderer: &Renderer<'_>,
        node: &SchemaNode,
        path: &Path,
    ) -> Result<RenderedField, SchemaError> {
        (self.0)(renderer, node, path)
    }
}

/// Custom widgets keyed by schema type, consulted before the built-in
/// variant selection.
#[derive(Clone, Default)]
pub struct WidgetRegistry {
    overrides: HashMap<NodeType, Arc<dyn FieldRenderer>>,
}

impl WidgetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, node_type: NodeType, renderer: impl FieldRenderer + 'static) -> Self {
        self.insert(node_type, renderer);
        self
    }

    pub fn with_fn<F>(mut self, node_type: NodeType, render: F) -> Self
    where
        F: Fn(&Renderer<'_>, &SchemaNode, &Path) -> Result<RenderedField, SchemaError>
            + Send
            + Sync
            + 'static,
    {
        self.insert(node_type, FnRenderer(render));
        self
    }

    pub fn insert(&mut self, node_type: NodeType, renderer: impl FieldRenderer + 'static) {
        self.overrides.insert(node_type, Arc::new(renderer));
    }

    /// Registers an override by schema type name (`"string"`, `"integer"`, ...).
    pub fn insert_named(
        &mut self,
        type_name: &str,
        renderer: impl FieldRenderer + 'static,
    ) -> Result<(), SchemaError> {
        let node_type = type_name
            .parse::<NodeType>()
            .map_err(|detail| SchemaError::UnsupportedType {
                pointer: String::new(),
                detail,
            })?;
        self.insert(node_type, renderer);
        Ok(())
    }

    pub fn get(&self, node_type: NodeType) -> Option<&dyn FieldRenderer> {
        self.overrides.get(&node_type).map(|renderer| renderer.as_ref())
    }

    pub fn is_empty(&self) -> bool {
        self.overrides.is_empty()
    }
}

impl fmt::Debug for WidgetRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set()
            .entries(self.overrides.keys().map(|ty| ty.as_str()))
            .finish()
    }
}
