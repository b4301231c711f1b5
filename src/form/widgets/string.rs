use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::form::{FieldCoercionError, FormStore, Path};
use crate::schema::{SchemaNode, StringSchema, UiHint, metadata::display_value};

use super::{InputType, Renderer, SelectOption, Widget};

static DATE: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r"^\d{4}-(0[1-9]|1[0-2])-(0[1-9]|[12]\d|3[01])$"));

static DATE_TIME: LazyLock<Result<Regex, regex::Error>> = LazyLock::new(|| {
    Regex::new(
        r"^\d{4}-(0[1-9]|1[0-2])-(0[1-9]|[12]\d|3[01])T([01]\d|2[0-3]):[0-5]\d:[0-5]\d(\.\d+)?(Z|[+-]([01]\d|2[0-3]):[0-5]\d)$",
    )
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringVariant {
    Select,
    Date { with_time: bool },
    Textarea,
    Input(InputType),
}

/// Choice lists win over formats, formats over the textarea hint.
pub fn select_variant(node: &SchemaNode, schema: &StringSchema) -> StringVariant {
    if schema.enum_values.is_some() || schema.one_of.is_some() {
        return StringVariant::Select;
    }
    match schema.format.as_deref() {
        Some("date") => return StringVariant::Date { with_time: false },
        Some("datetime" | "date-time") => return StringVariant::Date { with_time: true },
        _ => {}
    }
    if node.ui_hint_is(&UiHint::Textarea) {
        return StringVariant::Textarea;
    }
    StringVariant::Input(input_type(node, schema))
}

fn input_type(node: &SchemaNode, schema: &StringSchema) -> InputType {
    match schema.format.as_deref() {
        Some("password") => InputType::Password,
        Some("email") => InputType::Email,
        Some("url") => InputType::Url,
        _ if node.ui_hint_is(&UiHint::Tel) => InputType::Tel,
        _ => InputType::Text,
    }
}

pub fn options(schema: &StringSchema) -> Vec<SelectOption> {
    if let Some(values) = &schema.enum_values {
        return values
            .iter()
            .map(|value| SelectOption {
                label: display_value(value),
                value: value.clone(),
            })
            .collect();
    }
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

pub(super) fn render(
    renderer: &Renderer<'_>,
    node: &SchemaNode,
    schema: &StringSchema,
    path: &Path,
) -> Widget {
    let stored = renderer.store().get(path);
    match select_variant(node, schema) {
        StringVariant::Select => {
            let options = options(schema);
            let selected = stored.and_then(|value| options.iter().position(|o| &o.value == value));
            Widget::Select { options, selected }
        }
        StringVariant::Date { with_time } => Widget::Date {
            value: stored
                .and_then(Value::as_str)
                .filter(|text| !text.is_empty())
                .map(str::to_string),
            with_time,
        },
        StringVariant::Textarea => Widget::Textarea {
            value: text_of(stored),
        },
        StringVariant::Input(input_type) => Widget::Input {
            input_type,
            value: text_of(stored),
        },
    }
}

fn text_of(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(text)) => text.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

/// Commits typed text. Select fields accept an option label or value and
/// treat empty text as the "None" choice.
pub fn commit_text(
    node: &SchemaNode,
    schema: &StringSchema,
    store: &mut FormStore,
    path: &Path,
    text: &str,
) -> Result<(), FieldCoercionError> {
    match select_variant(node, schema) {
        StringVariant::Select => {
            if text.is_empty() {
                return choose(schema, store, path, None);
            }
            let options = options(schema);
            let index = options
                .iter()
                .position(|option| option.label == text || display_value(&option.value) == text)
                .ok_or_else(|| {
                    FieldCoercionError::new(path, format!("'{text}' is not one of the options"))
                })?;
            choose(schema, store, path, Some(index))
        }
        StringVariant::Date { with_time } => {
            match normalize_date(text.trim(), with_time) {
                Some(None) => {
                    store.remove(path);
                }
                Some(Some(value)) => store.set(path, Value::String(value)),
                None => {
                    let expected = if with_time {
                        "expected YYYY-MM-DD or an RFC 3339 timestamp"
                    } else {
                        "expected YYYY-MM-DD"
                    };
                    return Err(FieldCoercionError::new(path, expected));
                }
            }
            Ok(())
        }
        StringVariant::Textarea | StringVariant::Input(_) => {
            store.set(path, Value::String(text.to_string()));
            Ok(())
        }
    }
}

/// Picks an option by index; `None` is the empty choice and commits `""`.
pub fn choose(
    schema: &StringSchema,
    store: &mut FormStore,
    path: &Path,
    option: Option<usize>,
) -> Result<(), FieldCoercionError> {
    let value = match option {
        None => Value::String(String::new()),
        Some(index) => options(schema)
            .into_iter()
            .nth(index)
            .map(|option| option.value)
            .ok_or_else(|| FieldCoercionError::new(path, format!("no option #{index}")))?,
    };
    store.set(path, value);
    Ok(())
}

/// `Some(None)` clears the field, `None` rejects the input.
fn normalize_date(text: &str, with_time: bool) -> Option<Option<String>> {
    if text.is_empty() {
        return Some(None);
    }
    if is_match(&DATE, text) {
        return Some(Some(if with_time {
            format!("{text}T00:00:00Z")
        } else {
            text.to_string()
        }));
    }
    if with_time && is_match(&DATE_TIME, text) {
        return Some(Some(text.to_string()));
    }
    None
}

fn is_match(pattern: &LazyLock<Result<Regex, regex::Error>>, text: &str) -> bool {
    match &**pattern {
        Ok(regex) => regex.is_match(text),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::schema::{ChoiceOption, NodeKind};

    fn string_node(schema: StringSchema, hint: Option<UiHint>) -> SchemaNode {
        let mut node = SchemaNode::new(NodeKind::String(schema));
        node.ui_hint = hint;
        node
    }

    fn formatted(format: &str) -> StringSchema {
        StringSchema {
            format: Some(format.to_string()),
            ..StringSchema::default()
        }
    }

    #[test]
    fn variant_precedence() {
        let choices = StringSchema {
            enum_values: Some(vec![json!("a")]),
            format: Some("date".into()),
            ..StringSchema::default()
        };
        let node = string_node(choices.clone(), Some(UiHint::Textarea));
        assert_eq!(select_variant(&node, &choices), StringVariant::Select);

        let date = formatted("date-time");
        let node = string_node(date.clone(), Some(UiHint::Textarea));
        assert_eq!(
            select_variant(&node, &date),
            StringVariant::Date { with_time: true }
        );

        let plain = StringSchema::default();
        let node = string_node(plain.clone(), Some(UiHint::Textarea));
        assert_eq!(select_variant(&node, &plain), StringVariant::Textarea);
    }

    #[test]
    fn input_subtype_prefers_format_over_tel_hint() {
        let email = formatted("email");
        let node = string_node(email.clone(), Some(UiHint::Tel));
        assert_eq!(
            select_variant(&node, &email),
            StringVariant::Input(InputType::Email)
        );
        let plain = StringSchema::default();
        let node = string_node(plain.clone(), Some(UiHint::Tel));
        assert_eq!(
            select_variant(&node, &plain),
            StringVariant::Input(InputType::Tel)
        );
    }

    #[test]
    fn date_input_is_normalized() {
        let date = formatted("date");
        let node = string_node(date.clone(), None);
        let mut store = FormStore::default();
        let path = Path::root().child("birthday");
        commit_text(&node, &date, &mut store, &path, "1990-01-01").expect("valid date");
        assert_eq!(store.get(&path), Some(&json!("1990-01-01")));
        let err = commit_text(&node, &date, &mut store, &path, "1990-13-01").expect_err("month");
        assert_eq!(err.pointer, "/birthday");
        assert_eq!(store.get(&path), Some(&json!("1990-01-01")));
        commit_text(&node, &date, &mut store, &path, "").expect("clears");
        assert!(store.get(&path).is_none());
    }

    #[test]
    fn date_time_accepts_bare_dates() {
        let stamp = formatted("date-time");
        let node = string_node(stamp.clone(), None);
        let mut store = FormStore::default();
        let path = Path::root().child("at");
        commit_text(&node, &stamp, &mut store, &path, "2024-02-29").expect("date");
        assert_eq!(store.get(&path), Some(&json!("2024-02-29T00:00:00Z")));
        commit_text(&node, &stamp, &mut store, &path, "2024-02-29T10:15:00+02:00")
            .expect("timestamp");
        assert_eq!(store.get(&path), Some(&json!("2024-02-29T10:15:00+02:00")));
    }

    #[test]
    fn select_accepts_labels_and_the_none_choice() {
        let schema = StringSchema {
            one_of: Some(vec![
                ChoiceOption {
                    value: json!("ca"),
                    title: "California".into(),
                },
                ChoiceOption {
                    value: json!("ny"),
                    title: "New York".into(),
                },
            ]),
            ..StringSchema::default()
        };
        let node = string_node(schema.clone(), None);
        let mut store = FormStore::default();
        let path = Path::root().child("state");
        commit_text(&node, &schema, &mut store, &path, "New York").expect("label");
        assert_eq!(store.get(&path), Some(&json!("ny")));
        commit_text(&node, &schema, &mut store, &path, "ca").expect("value");
        assert_eq!(store.get(&path), Some(&json!("ca")));
        commit_text(&node, &schema, &mut store, &path, "").expect("none");
        assert_eq!(store.get(&path), Some(&json!("")));
        assert!(commit_text(&node, &schema, &mut store, &path, "Texas").is_err());
    }
}
