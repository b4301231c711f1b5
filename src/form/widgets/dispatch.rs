use std::borrow::Cow;

use crate::form::{FormStore, Path, PathSegment};
use crate::schema::{FormSchema, NodeKind, SchemaError, SchemaNode, metadata::prettify_label};

use super::{
    RenderedField, RenderedForm, Widget, WidgetRegistry, array, boolean, number, object, string,
};

/// The single polymorphic entry point of the schema walk.
///
/// Holds shared borrows of the schema, the store and the custom widget
/// registry; composite widgets recurse back into [`Renderer::render_field`]
/// for every child, so the whole form is one depth-first, pre-order pass.
#[derive(Debug, Clone, Copy)]
pub struct Renderer<'a> {
    schema: &'a FormSchema,
    store: &'a FormStore,
    registry: &'a WidgetRegistry,
}

impl<'a> Renderer<'a> {
    pub fn new(schema: &'a FormSchema, store: &'a FormStore, registry: &'a WidgetRegistry) -> Self {
        Self {
            schema,
            store,
            registry,
        }
    }

    pub fn schema(&self) -> &'a FormSchema {
        self.schema
    }

    pub fn store(&self) -> &'a FormStore {
        self.store
    }

    pub fn render_form(&self) -> Result<RenderedForm, SchemaError> {
        let root = self.render_field(&self.schema.root, &Path::root())?;
        Ok(RenderedForm {
            title: self.schema.title.clone(),
            description: self.schema.description.clone(),
            root,
            error_count: self.store.errors().len(),
        })
    }

    /// Dereferences `node`, then hands it to a custom widget registered for
    /// its type or to the built-in variant selection.
    pub fn render_field(
        &self,
        node: &SchemaNode,
        path: &Path,
    ) -> Result<RenderedField, SchemaError> {
        let node = self.dereference(node)?;
        if let Some(node_type) = node.node_type()
            && let Some(custom) = self.registry.get(node_type)
        {
            return custom.render(self, &node, path);
        }
        self.render_builtin(&node, path)
    }

    /// Built-in variant selection only; lets custom widgets delegate back.
    pub fn render_builtin(
        &self,
        node: &SchemaNode,
        path: &Path,
    ) -> Result<RenderedField, SchemaError> {
        let node = self.dereference(node)?;
        let widget = match &node.kind {
            NodeKind::String(schema) => string::render(self, &node, schema, path),
            NodeKind::Number(schema) => number::render(self, schema, path),
            NodeKind::Boolean(schema) => boolean::render(self, &node, schema, path),
            NodeKind::Array(schema) => array::render(self, schema, path)?,
            NodeKind::Object(schema) => object::render(self, schema, path)?,
            NodeKind::Ref(reference) => {
                return Err(SchemaError::UnresolvedReference {
                    reference: reference.clone(),
                });
            }
        };
        Ok(self.field(&node, path, widget))
    }

    /// Wraps a widget with the title, description and exact-path errors of
    /// `node` at `path`.
    pub fn field(&self, node: &SchemaNode, path: &Path, widget: Widget) -> RenderedField {
        let title = node.title.clone().or_else(|| match path.last() {
            Some(PathSegment::Key(key)) => Some(prettify_label(key)),
            _ => None,
        });
        RenderedField {
            path: path.clone(),
            title,
            description: node.description.clone(),
            required: false,
            errors: self
                .store
                .errors_at(path)
                .into_iter()
                .map(|error| error.message.clone())
                .collect(),
            widget,
        }
    }

    /// Resolves references. Annotations written at the referencing site
    /// (title, description, default, UI hint) win over the definition's.
    fn dereference<'n>(&self, node: &'n SchemaNode) -> Result<Cow<'n, SchemaNode>, SchemaError>
    where
        'a: 'n,
    {
        if !matches!(node.kind, NodeKind::Ref(_)) {
            return Ok(Cow::Borrowed(node));
        }
        let target = self.schema.resolve(node)?;
        if node.title.is_none()
            && node.description.is_none()
            && node.default.is_none()
            && node.ui_hint.is_none()
        {
            return Ok(Cow::Borrowed(target));
        }
        let mut merged = target.clone();
        merged.title = node.title.clone().or(merged.title);
        merged.description = node.description.clone().or(merged.description);
        merged.default = node.default.clone().or(merged.default);
        merged.ui_hint = node.ui_hint.clone().or(merged.ui_hint);
        Ok(Cow::Owned(merged))
    }
}
