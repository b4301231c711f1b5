use serde_json::Value;

use crate::form::{FieldCoercionError, FormStore, Path};
use crate::schema::{BooleanSchema, SchemaNode, UiHint};

use super::{Renderer, SelectOption, Widget};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BooleanVariant {
    Checkbox,
    Radio,
    Switch,
}

/// Radio and switch need a `oneOf` option list; everything else is a
/// checkbox.
pub fn select_variant(node: &SchemaNode, schema: &BooleanSchema) -> BooleanVariant {
    if schema.one_of.is_none() {
        return BooleanVariant::Checkbox;
    }
    match node.ui_hint {
        Some(UiHint::Radio) => BooleanVariant::Radio,
        Some(UiHint::Switch) => BooleanVariant::Switch,
        _ => BooleanVariant::Checkbox,
    }
}

pub(super) fn render(
    renderer: &Renderer<'_>,
    node: &SchemaNode,
    schema: &BooleanSchema,
    path: &Path,
) -> Widget {
    let checked = current(renderer.store(), path);
    match select_variant(node, schema) {
        BooleanVariant::Checkbox => Widget::Checkbox { checked },
        BooleanVariant::Radio => {
            let options = options(schema);
            let selected = options
                .iter()
                .position(|option| option.value == Value::Bool(checked));
            Widget::Radio { options, selected }
        }
        BooleanVariant::Switch => Widget::Switch {
            checked,
            off_label: label_for(schema, false),
            on_label: label_for(schema, true),
        },
    }
}

/// Unset booleans read as `false`.
pub fn current(store: &FormStore, path: &Path) -> bool {
    store.get(path).and_then(Value::as_bool).unwrap_or(false)
}

pub fn options(schema: &BooleanSchema) -> Vec<SelectOption> {
    schema
        .one_of
        .iter()
        .flatten()
        .map(|option| SelectOption {
            label: option.title.clone(),
            value: option.value.clone(),
        })
        .collect()
}

fn label_for(schema: &BooleanSchema, flag: bool) -> Option<String> {
    schema
        .one_of
        .iter()
        .flatten()
        .find(|option| option.value == Value::Bool(flag))
        .map(|option| option.title.clone())
}

pub fn set(store: &mut FormStore, path: &Path, value: bool) {
    store.set(path, Value::Bool(value));
}

pub fn toggle(store: &mut FormStore, path: &Path) -> bool {
    let next = !current(store, path);
    set(store, path, next);
    next
}

/// Radio selection by option index.
pub fn choose(
    schema: &BooleanSchema,
    store: &mut FormStore,
    path: &Path,
    index: usize,
) -> Result<(), FieldCoercionError> {
    let flag = options(schema)
        .get(index)
        .and_then(|option| option.value.as_bool())
        .ok_or_else(|| FieldCoercionError::new(path, format!("no boolean option #{index}")))?;
    set(store, path, flag);
    Ok(())
}

/// Accepts `true`/`false`, `yes`/`no`, `on`/`off`, `1`/`0` or an option
/// title.
pub fn commit_text(
    schema: &BooleanSchema,
    store: &mut FormStore,
    path: &Path,
    text: &str,
) -> Result<(), FieldCoercionError> {
    let trimmed = text.trim();
    let flag = match trimmed.to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => options(schema)
            .into_iter()
            .find(|option| option.label == trimmed)
            .and_then(|option| option.value.as_bool()),
    }
    .ok_or_else(|| FieldCoercionError::new(path, "expected true or false"))?;
    set(store, path, flag);
    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::schema::{ChoiceOption, NodeKind};

    fn yes_no() -> BooleanSchema {
        BooleanSchema {
            one_of: Some(vec![
                ChoiceOption {
                    value: json!(false),
                    title: "No".into(),
                },
                ChoiceOption {
                    value: json!(true),
                    title: "Yes".into(),
                },
            ]),
        }
    }

    fn node(schema: BooleanSchema, hint: Option<UiHint>) -> SchemaNode {
        let mut node = SchemaNode::new(NodeKind::Boolean(schema));
        node.ui_hint = hint;
        node
    }

    #[test]
    fn hint_without_options_falls_back_to_checkbox() {
        let schema = BooleanSchema::default();
        let switch = node(schema.clone(), Some(UiHint::Switch));
        assert_eq!(select_variant(&switch, &schema), BooleanVariant::Checkbox);
    }

    #[test]
    fn options_select_radio_and_switch() {
        let schema = yes_no();
        assert_eq!(
            select_variant(&node(schema.clone(), Some(UiHint::Radio)), &schema),
            BooleanVariant::Radio
        );
        assert_eq!(
            select_variant(&node(schema.clone(), Some(UiHint::Switch)), &schema),
            BooleanVariant::Switch
        );
        assert_eq!(
            select_variant(&node(schema.clone(), Some(UiHint::Textarea)), &schema),
            BooleanVariant::Checkbox
        );
    }

    #[test]
    fn radio_choice_and_text_commit() {
        let schema = yes_no();
        let mut store = FormStore::default();
        let path = Path::root().child("is_active");
        choose(&schema, &mut store, &path, 1).expect("yes");
        assert_eq!(store.get(&path), Some(&json!(true)));
        commit_text(&schema, &mut store, &path, "No").expect("title");
        assert_eq!(store.get(&path), Some(&json!(false)));
        assert!(choose(&schema, &mut store, &path, 2).is_err());
        assert!(toggle(&mut store, &path));
    }
}
