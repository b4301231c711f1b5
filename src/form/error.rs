use std::fmt;

use serde::{Serialize, Serializer};

use super::Path;

/// Raised when widget input cannot be turned into a value for its path.
/// The store is left untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldCoercionError {
    pub pointer: String,
    pub message: String,
}

impl FieldCoercionError {
    pub fn new(path: &Path, message: impl Into<String>) -> Self {
        Self {
            pointer: path.to_string(),
            message: message.into(),
        }
    }

    pub fn unsupported(path: &Path, what: &str) -> Self {
        Self::new(path, format!("{what} is not supported here"))
    }
}

impl fmt::Display for FieldCoercionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.pointer, self.message)
    }
}

impl std::error::Error for FieldCoercionError {}

/// Validation keyword that produced a [`FieldError`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    Required,
    Type,
    Enum,
    Const,
    Format,
    Pattern,
    Length,
    Range,
    Items,
    Other(String),
}

impl ErrorKind {
    pub fn from_keyword(keyword: &str) -> Self {
        match keyword {
            "required" => ErrorKind::Required,
            "type" => ErrorKind::Type,
            "enum" => ErrorKind::Enum,
            "const" => ErrorKind::Const,
            "format" => ErrorKind::Format,
            "pattern" => ErrorKind::Pattern,
            "minLength" | "maxLength" => ErrorKind::Length,
            "minimum" | "maximum" | "exclusiveMinimum" | "exclusiveMaximum" | "multipleOf" => {
                ErrorKind::Range
            }
            "minItems" | "maxItems" | "uniqueItems" | "contains" => ErrorKind::Items,
            other => ErrorKind::Other(other.to_string()),
        }
    }
}

impl ErrorKind {
    pub fn as_str(&self) -> &str {
        match self {
            ErrorKind::Required => "required",
            ErrorKind::Type => "type",
            ErrorKind::Enum => "enum",
            ErrorKind::Const => "const",
            ErrorKind::Format => "format",
            ErrorKind::Pattern => "pattern",
            ErrorKind::Length => "length",
            ErrorKind::Range => "range",
            ErrorKind::Items => "items",
            ErrorKind::Other(keyword) => keyword,
        }
    }
}

impl Serialize for ErrorKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// One violated constraint, addressed by data path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub path: Path,
    pub message: String,
    pub kind: ErrorKind,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_root() {
            write!(f, "<root>: {}", self.message)
        } else {
            write!(f, "{}: {}", self.path, self.message)
        }
    }
}

pub type ErrorList = Vec<FieldError>;
