use thiserror::Error;
use tracing::debug;

use crate::schema::{FormSchema, NodeKind, SchemaError};

use super::{
    FieldCoercionError, FormStore, Path, PathSegment,
    actions::FormCommand,
    widgets::{array::ArrayWidget, boolean, number, string},
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error(transparent)]
    Coercion(#[from] FieldCoercionError),
    #[error(transparent)]
    Schema(#[from] SchemaError),
}

/// Routes a command to the widget family owning its path.
///
/// Returns `false` when the command was valid but changed nothing (moving
/// the first item up, removing past the end).
pub fn apply_command(
    schema: &FormSchema,
    store: &mut FormStore,
    command: FormCommand,
) -> Result<bool, CommandError> {
    debug!(path = %command.path(), ?command, "dispatching form command");

    if let FormCommand::SetValue { path, value } = command {
        store.set(&path, value);
        return Ok(true);
    }

    let path = command.path().clone();
    ensure_items_exist(store, &path)?;
    let node = schema
        .node_at(&path)?
        .ok_or_else(|| FieldCoercionError::new(&path, "no field is defined at this path"))?;

    let changed = match (&node.kind, command) {
        (NodeKind::String(string_schema), FormCommand::Input { text, .. }) => {
            string::commit_text(node, string_schema, store, &path, &text)?;
            true
        }
        (NodeKind::String(string_schema), FormCommand::Choose { option, .. }) => {
            string::choose(string_schema, store, &path, option)?;
            true
        }
        (NodeKind::Number(number_schema), FormCommand::Input { text, .. }) => {
            number::commit_text(number_schema, store, &path, &text)?;
            true
        }
        (NodeKind::Boolean(bool_schema), FormCommand::Input { text, .. }) => {
            boolean::commit_text(bool_schema, store, &path, &text)?;
            true
        }
        (NodeKind::Boolean(_), FormCommand::SetBool { value, .. }) => {
            boolean::set(store, &path, value);
            true
        }
        (NodeKind::Boolean(_), FormCommand::Toggle { .. }) => {
            boolean::toggle(store, &path);
            true
        }
        (NodeKind::Boolean(bool_schema), FormCommand::Choose { option, .. })
            if bool_schema.one_of.is_some() =>
        {
            let index = option
                .ok_or_else(|| FieldCoercionError::new(&path, "a boolean choice cannot be empty"))?;
            boolean::choose(bool_schema, store, &path, index)?;
            true
        }
        (NodeKind::Array(array), FormCommand::AddItem { .. }) => {
            ArrayWidget::new(schema, array, &path).add_item(store)?;
            true
        }
        (NodeKind::Array(array), FormCommand::RemoveItem { index, .. }) => {
            ArrayWidget::new(schema, array, &path).remove_item(store, index)
        }
        (
            NodeKind::Array(array),
            FormCommand::MoveItem {
                index, direction, ..
            },
        ) => ArrayWidget::new(schema, array, &path).move_item(store, index, direction),
        (kind, command) => {
            return Err(FieldCoercionError::unsupported(
                &path,
                &format!("{} on a {} field", command_name(&command), kind_name(kind)),
            )
            .into());
        }
    };
    Ok(changed)
}

/// Widget commands only address array items that already exist. Arrays
/// grow through `AddItem` alone.
fn ensure_items_exist(store: &FormStore, path: &Path) -> Result<(), FieldCoercionError> {
    let mut prefix = Path::root();
    for segment in path.segments() {
        if let PathSegment::Index(index) = segment {
            let len = store
                .get(&prefix)
                .and_then(|value| value.as_array())
                .map_or(0, Vec::len);
            if *index >= len {
                return Err(FieldCoercionError::new(
                    path,
                    format!("item {index} does not exist ({len} items)"),
                ));
            }
        }
        prefix = prefix.child(segment.clone());
    }
    Ok(())
}

fn command_name(command: &FormCommand) -> &'static str {
    match command {
        FormCommand::Input { .. } => "text input",
        FormCommand::SetBool { .. } => "setting a flag",
        FormCommand::Toggle { .. } => "toggling",
        FormCommand::Choose { .. } => "choosing an option",
        FormCommand::AddItem { .. } => "adding an item",
        FormCommand::RemoveItem { .. } => "removing an item",
        FormCommand::MoveItem { .. } => "moving an item",
        FormCommand::SetValue { .. } => "raw writes",
    }
}

fn kind_name(kind: &NodeKind) -> &'static str {
    match kind {
        NodeKind::String(_) => "string",
        NodeKind::Number(_) => "number",
        NodeKind::Boolean(_) => "boolean",
        NodeKind::Array(_) => "array",
        NodeKind::Object(_) => "object",
        NodeKind::Ref(_) => "reference",
    }
}
