use serde_json::{Map, Value};

use crate::schema::{FormSchema, NodeKind, SchemaError, SchemaNode};

/// Fills in schema `default` values the seed data does not provide.
///
/// Walks object properties only; array items are left to the seed because
/// their count comes from the data.
pub fn apply_schema_defaults(schema: &FormSchema, data: &mut Value) -> Result<(), SchemaError> {
    let root = schema.resolve(&schema.root)?;
    if let Some(default) = &root.default
        && data.is_null()
    {
        *data = default.clone();
    }
    apply_node(schema, root, data)
}

fn apply_node(schema: &FormSchema, node: &SchemaNode, data: &mut Value) -> Result<(), SchemaError> {
    let NodeKind::Object(object) = &node.kind else {
        return Ok(());
    };
    let Value::Object(map) = data else {
        return Ok(());
    };

    for (name, child) in &object.properties {
        let resolved = schema.resolve(child)?;
        let default = child.default.as_ref().or(resolved.default.as_ref());
        match map.get_mut(name) {
            Some(existing) => apply_node(schema, resolved, existing)?,
            None => {
                if let Some(default) = default {
                    let mut seeded = default.clone();
                    apply_node(schema, resolved, &mut seeded)?;
                    map.insert(name.clone(), seeded);
                } else if matches!(resolved.kind, NodeKind::Object(_)) {
                    let mut nested = Value::Object(Map::new());
                    apply_node(schema, resolved, &mut nested)?;
                    if nested.as_object().is_some_and(|inner| !inner.is_empty()) {
                        map.insert(name.clone(), nested);
                    }
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::schema::parse_form_schema;

    #[test]
    fn seeds_missing_defaults_without_overwriting() {
        let schema = parse_form_schema(&json!({
            "type": "object",
            "properties": {
                "name": {"type": "string", "default": "anon"},
                "age": {"type": "integer", "default": 18},
                "prefs": {
                    "type": "object",
                    "properties": {
                        "theme": {"type": "string", "default": "dark"},
                        "font": {"type": "string"}
                    }
                },
                "misc": {
                    "type": "object",
                    "properties": {"note": {"type": "string"}}
                }
            }
        }))
        .expect("schema parsed");
        let mut data = json!({"age": 30});
        apply_schema_defaults(&schema, &mut data).expect("defaults applied");
        assert_eq!(
            data,
            json!({"age": 30, "name": "anon", "prefs": {"theme": "dark"}})
        );
    }
}
