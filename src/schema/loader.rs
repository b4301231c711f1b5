use schemars::schema::RootSchema;
use serde_json::Value;

use super::SchemaError;

/// Deserialize a JSON value into a `RootSchema`.
pub fn load_root_schema(value: &Value) -> Result<RootSchema, SchemaError> {
    if !value.is_object() {
        return Err(SchemaError::Malformed(
            "schema must be a JSON object".to_string(),
        ));
    }
    serde_json::from_value(value.clone()).map_err(|err| SchemaError::Malformed(err.to_string()))
}
