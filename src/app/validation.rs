use std::collections::HashMap;
use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use jsonschema::{Validator, error::ValidationErrorKind, validator_for};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

use crate::form::{ErrorKind, ErrorList, FieldError, Path};

/// Keywords whose object value maps names to subschemas.
const SCHEMA_MAPS: &[&str] = &["properties", "patternProperties", "definitions", "$defs"];
/// Keywords holding instance data rather than schemas.
const DATA_KEYWORDS: &[&str] = &["enum", "const", "default", "examples"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidatorError {
    #[error("failed to compile JSON schema: {0}")]
    Compile(String),
}

/// Outcome of validating form data against the schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: ErrorList,
}

/// Removes annotation keys from every schema object in the document.
///
/// Property names and instance data (`enum`, `const`, `default`, ...) are
/// left alone, so a property that happens to be called like an annotation
/// key survives.
pub fn strip_annotations(schema: &Value, keys: &[String]) -> Value {
    match schema {
        Value::Object(map) => {
            let mut stripped = Map::with_capacity(map.len());
            for (key, value) in map {
                if keys.iter().any(|candidate| candidate == key) {
                    continue;
                }
                let next = if DATA_KEYWORDS.contains(&key.as_str()) {
                    value.clone()
                } else if SCHEMA_MAPS.contains(&key.as_str()) {
                    strip_schema_map(value, keys)
                } else {
                    strip_annotations(value, keys)
                };
                stripped.insert(key.clone(), next);
            }
            Value::Object(stripped)
        }
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|item| strip_annotations(item, keys))
                .collect(),
        ),
        other => other.clone(),
    }
}

fn strip_schema_map(value: &Value, keys: &[String]) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(name, schema)| (name.clone(), strip_annotations(schema, keys)))
                .collect(),
        ),
        other => strip_annotations(other, keys),
    }
}

/// A compiled, annotation-free validator for one schema.
pub struct SchemaValidator {
    validator: Validator,
    schema: Value,
    fingerprint: u64,
}

impl SchemaValidator {
    pub fn compile(schema: &Value, annotation_keys: &[String]) -> Result<Self, ValidatorError> {
        Self::compile_stripped(strip_annotations(schema, annotation_keys))
    }

    fn compile_stripped(schema: Value) -> Result<Self, ValidatorError> {
        let fingerprint = fingerprint(&schema);
        let validator =
            validator_for(&schema).map_err(|err| ValidatorError::Compile(err.to_string()))?;
        debug!(fingerprint, "compiled schema validator");
        Ok(Self {
            validator,
            schema,
            fingerprint,
        })
    }

    pub fn fingerprint(&self) -> u64 {
        self.fingerprint
    }

    /// The schema the validator was compiled from, annotations removed.
    pub fn schema(&self) -> &Value {
        &self.schema
    }

    /// Collects every violation; never stops at the first one.
    pub fn validate(&self, data: &Value) -> ValidationReport {
        let mut errors = Vec::new();
        for error in self.validator.iter_errors(data) {
            let pointer = error.instance_path.to_string();
            let mut path = Path::from_pointer_in(&pointer, data);
            if let ValidationErrorKind::Required { property } = &error.kind
                && let Some(name) = property.as_str()
            {
                path = path.child(name);
            }
            let schema_path = error.schema_path.to_string();
            let keyword = schema_path.rsplit('/').next().unwrap_or_default();
            errors.push(FieldError {
                path,
                message: error.to_string(),
                kind: ErrorKind::from_keyword(keyword),
            });
        }
        ValidationReport {
            valid: errors.is_empty(),
            errors,
        }
    }
}

impl fmt::Debug for SchemaValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaValidator")
            .field("fingerprint", &self.fingerprint)
            .finish_non_exhaustive()
    }
}

/// Validate once without keeping the compiled validator around.
pub fn validate(
    schema: &Value,
    data: &Value,
    annotation_keys: &[String],
) -> Result<ValidationReport, ValidatorError> {
    Ok(SchemaValidator::compile(schema, annotation_keys)?.validate(data))
}

/// Shares compiled validators between sessions built from the same schema.
///
/// Entries are bucketed by fingerprint and matched on the stripped schema,
/// so two schemas sharing a fingerprint never share a validator.
#[derive(Debug, Default)]
pub struct ValidatorCache {
    entries: HashMap<u64, Vec<Arc<SchemaValidator>>>,
}

impl ValidatorCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_compile(
        &mut self,
        schema: &Value,
        annotation_keys: &[String],
    ) -> Result<Arc<SchemaValidator>, ValidatorError> {
        let stripped = strip_annotations(schema, annotation_keys);
        let key = fingerprint(&stripped);
        let bucket = self.entries.entry(key).or_default();
        if let Some(hit) = bucket.iter().find(|entry| entry.schema == stripped) {
            return Ok(Arc::clone(hit));
        }
        let compiled = Arc::new(SchemaValidator::compile_stripped(stripped)?);
        bucket.push(Arc::clone(&compiled));
        Ok(compiled)
    }

    pub fn len(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn fingerprint(schema: &Value) -> u64 {
    let mut hasher = DefaultHasher::new();
    schema.to_string().hash(&mut hasher);
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn ui_keys() -> Vec<String> {
        vec!["uiSchema".to_string()]
    }

    #[test]
    fn strips_annotations_but_keeps_property_names() {
        let schema = json!({
            "type": "object",
            "uiSchema": {"component": "card"},
            "properties": {
                "uiSchema": {"type": "string", "uiSchema": {"component": "textarea"}},
                "flag": {
                    "type": "boolean",
                    "oneOf": [{"const": true, "title": "Yes", "uiSchema": {}}],
                    "default": {"uiSchema": "data"}
                }
            }
        });
        let stripped = strip_annotations(&schema, &ui_keys());
        assert_eq!(
            stripped,
            json!({
                "type": "object",
                "properties": {
                    "uiSchema": {"type": "string"},
                    "flag": {
                        "type": "boolean",
                        "oneOf": [{"const": true, "title": "Yes"}],
                        "default": {"uiSchema": "data"}
                    }
                }
            })
        );
    }

    #[test]
    fn required_errors_point_at_the_missing_field() {
        let schema = json!({
            "type": "object",
            "required": ["name"],
            "properties": {"name": {"type": "string"}}
        });
        let report = validate(&schema, &json!({}), &ui_keys()).expect("compiles");
        assert!(!report.valid);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].path, Path::root().child("name"));
        assert_eq!(report.errors[0].kind, ErrorKind::Required);
    }

    #[test]
    fn collects_all_violations() {
        let schema = json!({
            "type": "object",
            "properties": {
                "age": {"type": "integer", "minimum": 0},
                "tags": {"type": "array", "items": {"type": "string"}}
            }
        });
        let report = validate(&schema, &json!({"age": -1, "tags": ["ok", 3]}), &ui_keys())
            .expect("compiles");
        assert_eq!(report.errors.len(), 2);
        assert!(
            report
                .errors
                .iter()
                .any(|error| error.path == Path::root().child("tags").child(1usize))
        );
    }

    #[test]
    fn cache_reuses_validators_for_identical_schemas() {
        let mut cache = ValidatorCache::new();
        let schema = json!({"type": "object", "properties": {"a": {"type": "string"}}});
        let annotated = json!({
            "type": "object",
            "uiSchema": {"component": "x"},
            "properties": {"a": {"type": "string"}}
        });
        let first = cache.get_or_compile(&schema, &ui_keys()).expect("compiles");
        let second = cache.get_or_compile(&annotated, &ui_keys()).expect("compiles");
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn cache_hits_require_an_equal_schema() {
        let mut cache = ValidatorCache::new();
        let strings = json!({"type": "string"});
        let numbers = json!({"type": "number"});
        let compiled = SchemaValidator::compile(&numbers, &ui_keys()).expect("compiles");
        cache.entries.insert(fingerprint(&strings), vec![Arc::new(compiled)]);

        let validator = cache.get_or_compile(&strings, &ui_keys()).expect("compiles");
        assert_eq!(validator.schema(), &strings);
        assert!(validator.validate(&json!("text")).valid);
        assert_eq!(cache.len(), 2);
    }
}
