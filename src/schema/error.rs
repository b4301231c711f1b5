use thiserror::Error;

/// Failures raised while turning a JSON Schema document into a [`FormSchema`].
///
/// All of these are fatal at load time: a schema that produces one is never
/// partially rendered.
///
/// [`FormSchema`]: super::FormSchema
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("schema is not a valid JSON Schema document: {0}")]
    Malformed(String),

    #[error("reference '{reference}' not found")]
    UnresolvedReference { reference: String },

    #[error("unsupported reference {reference}")]
    UnsupportedReference { reference: String },

    #[error("reference '{reference}' forms a cycle that never reaches an array")]
    CyclicReference { reference: String },

    #[error("unsupported schema at '{pointer}': {detail}")]
    UnsupportedType { pointer: String, detail: String },

    #[error("array schema at '{pointer}' must define a single `items` schema")]
    UnsupportedArray { pointer: String },
}
