use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde_json::Value;

/// One typed unit of the schema tree.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaNode {
    pub title: Option<String>,
    pub description: Option<String>,
    pub default: Option<Value>,
    pub ui_hint: Option<UiHint>,
    pub kind: NodeKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    String(StringSchema),
    Number(NumberSchema),
    Boolean(BooleanSchema),
    Array(ArraySchema),
    Object(ObjectSchema),
    /// Pointer into the definitions table, dereferenced by the dispatcher.
    Ref(String),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StringSchema {
    pub enum_values: Option<Vec<Value>>,
    pub one_of: Option<Vec<ChoiceOption>>,
    pub format: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NumberSchema {
    pub integer: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BooleanSchema {
    pub one_of: Option<Vec<ChoiceOption>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArraySchema {
    pub items: Box<SchemaNode>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectSchema {
    pub properties: IndexMap<String, SchemaNode>,
    pub required: Vec<String>,
}

impl ObjectSchema {
    pub fn is_required(&self, name: &str) -> bool {
        self.required.iter().any(|entry| entry == name)
    }
}

/// A `{const, title}` pair taken from a `oneOf` list.
#[derive(Debug, Clone, PartialEq)]
pub struct ChoiceOption {
    pub value: Value,
    pub title: String,
}

/// Widget selection annotation carried next to the schema keywords.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum UiHint {
    Radio,
    Switch,
    Textarea,
    Tel,
    Custom(String),
}

impl UiHint {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "radio" => UiHint::Radio,
            "switch" => UiHint::Switch,
            "textarea" => UiHint::Textarea,
            "tel" => UiHint::Tel,
            other => UiHint::Custom(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            UiHint::Radio => "radio",
            UiHint::Switch => "switch",
            UiHint::Textarea => "textarea",
            UiHint::Tel => "tel",
            UiHint::Custom(name) => name,
        }
    }
}

/// Declared type of a concrete node, used as the custom widget registry key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeType {
    String,
    Number,
    Boolean,
    Array,
    Object,
}

impl NodeType {
    pub fn as_str(self) -> &'static str {
        match self {
            NodeType::String => "string",
            NodeType::Number => "number",
            NodeType::Boolean => "boolean",
            NodeType::Array => "array",
            NodeType::Object => "object",
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NodeType {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.to_ascii_lowercase().as_str() {
            "string" => Ok(NodeType::String),
            "number" | "integer" => Ok(NodeType::Number),
            "boolean" => Ok(NodeType::Boolean),
            "array" => Ok(NodeType::Array),
            "object" => Ok(NodeType::Object),
            other => Err(format!("unknown schema type {other}")),
        }
    }
}

impl SchemaNode {
    pub fn new(kind: NodeKind) -> Self {
        Self {
            title: None,
            description: None,
            default: None,
            ui_hint: None,
            kind,
        }
    }

    /// `None` for unresolved references.
    pub fn node_type(&self) -> Option<NodeType> {
        match &self.kind {
            NodeKind::String(_) => Some(NodeType::String),
            NodeKind::Number(_) => Some(NodeType::Number),
            NodeKind::Boolean(_) => Some(NodeType::Boolean),
            NodeKind::Array(_) => Some(NodeType::Array),
            NodeKind::Object(_) => Some(NodeType::Object),
            NodeKind::Ref(_) => None,
        }
    }

    pub fn ui_hint_is(&self, hint: &UiHint) -> bool {
        self.ui_hint.as_ref() == Some(hint)
    }
}
