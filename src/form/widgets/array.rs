use std::fmt;
use std::str::FromStr;

use serde_json::{Map, Value};
use tracing::debug;

use crate::form::{FormStore, Path};
use crate::schema::{ArraySchema, FormSchema, NodeKind, SchemaError, SchemaNode};

use super::{ArrayItem, Renderer, Widget};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    Up,
    Down,
}

impl FromStr for MoveDirection {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.to_ascii_lowercase().as_str() {
            "up" => Ok(MoveDirection::Up),
            "down" => Ok(MoveDirection::Down),
            other => Err(format!("unknown direction {other}, expected up or down")),
        }
    }
}

impl fmt::Display for MoveDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveDirection::Up => f.write_str("up"),
            MoveDirection::Down => f.write_str("down"),
        }
    }
}

pub(super) fn render(
    renderer: &Renderer<'_>,
    schema: &ArraySchema,
    path: &Path,
) -> Result<Widget, SchemaError> {
    let len = entries(renderer.store(), path).len();
    let mut items = Vec::with_capacity(len);
    for index in 0..len {
        let field = renderer.render_field(&schema.items, &path.child(index))?;
        items.push(ArrayItem {
            index,
            field,
            can_move_up: index > 0,
            can_move_down: index + 1 < len,
        });
    }
    Ok(Widget::Array { items })
}

/// Current elements, or an empty list when nothing (or a non-array) is
/// stored at `path`.
pub fn entries(store: &FormStore, path: &Path) -> Vec<Value> {
    store
        .get(path)
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default()
}

/// Edit operations of one array field. Every operation writes the whole
/// array back, so item paths stay zero-based and contiguous.
#[derive(Debug, Clone, Copy)]
pub struct ArrayWidget<'a> {
    schema: &'a FormSchema,
    items: &'a SchemaNode,
    path: &'a Path,
}

impl<'a> ArrayWidget<'a> {
    pub fn new(schema: &'a FormSchema, array: &'a ArraySchema, path: &'a Path) -> Self {
        Self {
            schema,
            items: &array.items,
            path,
        }
    }

    /// Appends a default-shaped element and returns its index.
    pub fn add_item(&self, store: &mut FormStore) -> Result<usize, SchemaError> {
        let mut values = entries(store, self.path);
        values.push(default_item(self.schema, self.items)?);
        let index = values.len() - 1;
        store.set(self.path, Value::Array(values));
        debug!(path = %self.path, index, "array item added");
        Ok(index)
    }

    /// Deletes the element at `index`; later elements shift down by one.
    pub fn remove_item(&self, store: &mut FormStore, index: usize) -> bool {
        let mut values = entries(store, self.path);
        if index >= values.len() {
            return false;
        }
        values.remove(index);
        store.set(self.path, Value::Array(values));
        debug!(path = %self.path, index, "array item removed");
        true
    }

    /// Swaps with the neighbour in `direction`; a no-op at either boundary.
    pub fn move_item(&self, store: &mut FormStore, index: usize, direction: MoveDirection) -> bool {
        let mut values = entries(store, self.path);
        if index >= values.len() {
            return false;
        }
        let target = match direction {
            MoveDirection::Up => index.checked_sub(1),
            MoveDirection::Down => index.checked_add(1),
        };
        let Some(target) = target.filter(|target| *target < values.len()) else {
            return false;
        };
        values.swap(index, target);
        store.set(self.path, Value::Array(values));
        debug!(path = %self.path, index, %direction, "array item moved");
        true
    }
}

/// The item schema's `default`, else an empty container for composites,
/// `""` for strings, `false` for booleans and `null` for numbers.
pub fn default_item(schema: &FormSchema, items: &SchemaNode) -> Result<Value, SchemaError> {
    if let Some(default) = &items.default {
        return Ok(default.clone());
    }
    let resolved = schema.resolve(items)?;
    if let Some(default) = &resolved.default {
        return Ok(default.clone());
    }
    Ok(match &resolved.kind {
        NodeKind::Object(_) => Value::Object(Map::new()),
        NodeKind::Array(_) => Value::Array(Vec::new()),
        NodeKind::String(_) => Value::String(String::new()),
        NodeKind::Boolean(_) => Value::Bool(false),
        NodeKind::Number(_) | NodeKind::Ref(_) => Value::Null,
    })
}
