use crate::form::Path;
use crate::schema::{ObjectSchema, SchemaError};

use super::{Renderer, Widget};

/// Renders every property in declared order under `path/<key>`.
pub(super) fn render(
    renderer: &Renderer<'_>,
    schema: &ObjectSchema,
    path: &Path,
) -> Result<Widget, SchemaError> {
    let mut properties = Vec::with_capacity(schema.properties.len());
    for (key, child) in &schema.properties {
        let mut field = renderer.render_field(child, &path.child(key.as_str()))?;
        field.required = schema.is_required(key);
        properties.push((key.clone(), field));
    }
    Ok(Widget::Object { properties })
}
