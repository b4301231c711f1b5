use serde_json::{Number, Value};

use crate::form::{FieldCoercionError, FormStore, Path};
use crate::schema::NumberSchema;

use super::{Renderer, Widget};

pub(super) fn render(renderer: &Renderer<'_>, schema: &NumberSchema, path: &Path) -> Widget {
    Widget::Number {
        value: renderer.store().get(path).and_then(Value::as_number).cloned(),
        integer: schema.integer,
    }
}

/// Empty input commits `null`; anything else must parse as a (finite)
/// number, or an integer for `integer` schemas.
pub fn commit_text(
    schema: &NumberSchema,
    store: &mut FormStore,
    path: &Path,
    text: &str,
) -> Result<(), FieldCoercionError> {
    let value = parse(schema, path, text)?;
    store.set(path, value);
    Ok(())
}

fn parse(schema: &NumberSchema, path: &Path, text: &str) -> Result<Value, FieldCoercionError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(Value::Null);
    }
    if schema.integer {
        return trimmed
            .parse::<i64>()
            .map(Value::from)
            .map_err(|_| FieldCoercionError::new(path, "expected integer"));
    }
    if let Ok(whole) = trimmed.parse::<i64>() {
        return Ok(Value::from(whole));
    }
    trimmed
        .parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(Value::Number)
        .ok_or_else(|| FieldCoercionError::new(path, "expected number"))
}
