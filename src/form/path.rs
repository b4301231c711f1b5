use std::fmt;

use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::schema::builder::escape_pointer_segment;

/// One step into the data tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

impl From<&str> for PathSegment {
    fn from(key: &str) -> Self {
        PathSegment::Key(key.to_string())
    }
}

impl From<String> for PathSegment {
    fn from(key: String) -> Self {
        PathSegment::Key(key)
    }
}

impl From<usize> for PathSegment {
    fn from(index: usize) -> Self {
        PathSegment::Index(index)
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Key(key) => f.write_str(&escape_pointer_segment(key)),
            PathSegment::Index(index) => write!(f, "{index}"),
        }
    }
}

/// Location of a value inside the form data. The empty path is the form root.
///
/// Displays as a JSON pointer (`/address/city`, `/tags/0`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Path(Vec<PathSegment>);

impl Path {
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn new(segments: Vec<PathSegment>) -> Self {
        Self(segments)
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Parent path plus exactly one segment.
    pub fn child(&self, segment: impl Into<PathSegment>) -> Self {
        let mut segments = self.0.clone();
        segments.push(segment.into());
        Self(segments)
    }

    pub fn parent(&self) -> Option<Self> {
        let (_, rest) = self.0.split_last()?;
        Some(Self(rest.to_vec()))
    }

    pub fn last(&self) -> Option<&PathSegment> {
        self.0.last()
    }

    /// `true` when `self` equals `other` or lies above it.
    pub fn is_ancestor_or_self(&self, other: &Path) -> bool {
        other.0.starts_with(&self.0)
    }

    /// Parses a JSON pointer, deciding between keys and indices by walking
    /// `data`: segments that land on an array become indices, everything
    /// else a key. Past the end of `data`, numeric segments become indices.
    pub fn from_pointer_in(pointer: &str, data: &Value) -> Self {
        let mut current = Some(data);
        let mut segments = Vec::new();
        for raw in split_pointer(pointer) {
            let segment = match current {
                Some(Value::Array(_)) => match raw.parse::<usize>() {
                    Ok(index) => PathSegment::Index(index),
                    Err(_) => PathSegment::Key(raw),
                },
                Some(Value::Object(_)) => PathSegment::Key(raw),
                _ => numeric_or_key(raw),
            };
            current = match (&segment, current) {
                (PathSegment::Index(index), Some(Value::Array(items))) => items.get(*index),
                (PathSegment::Key(key), Some(Value::Object(map))) => map.get(key),
                _ => None,
            };
            segments.push(segment);
        }
        Self(segments)
    }

    /// Parses a JSON pointer without data; numeric segments become indices.
    pub fn from_pointer(pointer: &str) -> Self {
        Self(split_pointer(pointer).map(numeric_or_key).collect())
    }
}

fn split_pointer(pointer: &str) -> impl Iterator<Item = String> + '_ {
    pointer
        .strip_prefix('/')
        .into_iter()
        .flat_map(|rest| rest.split('/'))
        .map(|segment| segment.replace("~1", "/").replace("~0", "~"))
}

fn numeric_or_key(raw: String) -> PathSegment {
    match raw.parse::<usize>() {
        Ok(index) if !raw.starts_with('+') => PathSegment::Index(index),
        _ => PathSegment::Key(raw),
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.0 {
            write!(f, "/{segment}")?;
        }
        Ok(())
    }
}

/// Serializes as its JSON pointer.
impl Serialize for Path {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<S: Into<PathSegment>> FromIterator<S> for Path {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}
