use percent_encoding::percent_decode_str;
use schemars::schema::{RootSchema, Schema, SchemaObject};
use serde_json::Value;

use super::SchemaError;

/// Looks up local `$ref` targets in the raw document and the parsed root.
#[derive(Debug)]
pub struct SchemaResolver<'a> {
    raw: &'a Value,
    root: &'a RootSchema,
}

impl<'a> SchemaResolver<'a> {
    pub fn new(raw: &'a Value, root: &'a RootSchema) -> Self {
        Self { raw, root }
    }

    pub fn root_object(&self) -> &SchemaObject {
        &self.root.schema
    }

    /// Returns the schema a reference points at together with its JSON
    /// pointer inside the document. Chained references are left for the
    /// caller to follow.
    pub fn follow_reference(&self, reference: &str) -> Result<(String, SchemaObject), SchemaError> {
        if let Some(key) = reference.strip_prefix("#/definitions/")
            && let Some(target) = self.root.definitions.get(&decode(reference, key)?)
        {
            return Ok((format!("/definitions/{key}"), into_object(target)));
        }

        if let Some(fragment) = reference.strip_prefix('#') {
            let decoded = decode(reference, fragment)?;
            let pointer = if decoded.is_empty() || decoded.starts_with('/') {
                decoded
            } else {
                format!("/{decoded}")
            };
            let target =
                self.raw
                    .pointer(&pointer)
                    .ok_or_else(|| SchemaError::UnresolvedReference {
                        reference: reference.to_string(),
                    })?;
            let schema: Schema = serde_json::from_value(target.clone()).map_err(|err| {
                SchemaError::Malformed(format!(
                    "reference '{reference}' is not a valid schema: {err}"
                ))
            })?;
            return Ok((pointer, into_object(&schema)));
        }

        Err(SchemaError::UnsupportedReference {
            reference: reference.to_string(),
        })
    }
}

fn decode(reference: &str, fragment: &str) -> Result<String, SchemaError> {
    percent_decode_str(fragment)
        .decode_utf8()
        .map(|decoded| decoded.into_owned())
        .map_err(|_| {
            SchemaError::Malformed(format!("invalid percent-encoding in $ref {reference}"))
        })
}

fn into_object(schema: &Schema) -> SchemaObject {
    match schema {
        Schema::Bool(value) => Schema::Bool(*value).into_object(),
        Schema::Object(object) => object.clone(),
    }
}
