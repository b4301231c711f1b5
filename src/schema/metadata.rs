use schemars::schema::SchemaObject;
use serde_json::Value;

use super::model::{ChoiceOption, UiHint};

/// Annotation key holding widget hints; stripped before validation.
pub const UI_SCHEMA_KEY: &str = "uiSchema";

pub fn title(schema: &SchemaObject) -> Option<String> {
    schema.metadata.as_ref().and_then(|m| m.title.clone())
}

pub fn description(schema: &SchemaObject) -> Option<String> {
    schema.metadata.as_ref().and_then(|m| m.description.clone())
}

pub fn default_value(schema: &SchemaObject) -> Option<Value> {
    schema.metadata.as_ref().and_then(|m| m.default.clone())
}

pub fn ui_hint(schema: &SchemaObject) -> Option<UiHint> {
    schema
        .extensions
        .get(UI_SCHEMA_KEY)
        .and_then(|ui| ui.get("component"))
        .and_then(Value::as_str)
        .map(UiHint::parse)
}

/// Reads `{const, title}` pairs from a `oneOf` list, skipping entries
/// without a `const`.
pub fn choice_options(schema: &SchemaObject) -> Option<Vec<ChoiceOption>> {
    let variants = schema.subschemas.as_ref()?.one_of.as_ref()?;
    let options = variants
        .iter()
        .filter_map(|variant| {
            let object = variant.clone().into_object();
            let value = object.const_value.clone()?;
            let title = title(&object).unwrap_or_else(|| display_value(&value));
            Some(ChoiceOption { value, title })
        })
        .collect::<Vec<_>>();
    Some(options)
}

pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Turns a property key into a label: `street_address`, `is-active` and
/// `firstName` become `Street Address`, `Is Active` and `First Name`.
pub fn prettify_label(raw: &str) -> String {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut after_lower = false;
    for ch in raw.chars() {
        if ch == '_' || ch == '-' || ch.is_whitespace() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            after_lower = false;
            continue;
        }
        if ch.is_uppercase() && after_lower {
            words.push(std::mem::take(&mut current));
        }
        after_lower = ch.is_lowercase() || ch.is_ascii_digit();
        current.push(ch);
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
        .iter()
        .map(|word| capitalize(word))
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
