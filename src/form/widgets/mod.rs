//! Widget view model and the dispatcher that builds it from a schema walk.

pub mod array;
pub mod boolean;
mod dispatch;
pub mod number;
pub mod object;
mod registry;
pub mod string;

use serde_json::{Number, Value};

use super::Path;

pub use dispatch::Renderer;
pub use registry::{FieldRenderer, WidgetRegistry};

/// Output of rendering one schema node at one path.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedField {
    pub path: Path,
    pub title: Option<String>,
    pub description: Option<String>,
    pub required: bool,
    /// Messages attached exactly to `path`.
    pub errors: Vec<String>,
    pub widget: Widget,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Widget {
    Input {
        input_type: InputType,
        value: String,
    },
    Textarea {
        value: String,
    },
    Select {
        options: Vec<SelectOption>,
        selected: Option<usize>,
    },
    Date {
        value: Option<String>,
        with_time: bool,
    },
    Number {
        value: Option<Number>,
        integer: bool,
    },
    Checkbox {
        checked: bool,
    },
    Radio {
        options: Vec<SelectOption>,
        selected: Option<usize>,
    },
    Switch {
        checked: bool,
        off_label: Option<String>,
        on_label: Option<String>,
    },
    Array {
        items: Vec<ArrayItem>,
    },
    Object {
        properties: Vec<(String, RenderedField)>,
    },
    Custom {
        name: String,
        payload: Value,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WidgetKind {
    Input,
    Textarea,
    Select,
    Date,
    Number,
    Checkbox,
    Radio,
    Switch,
    Array,
    Object,
    Custom,
}

impl Widget {
    pub fn kind(&self) -> WidgetKind {
        match self {
            Widget::Input { .. } => WidgetKind::Input,
            Widget::Textarea { .. } => WidgetKind::Textarea,
            Widget::Select { .. } => WidgetKind::Select,
            Widget::Date { .. } => WidgetKind::Date,
            Widget::Number { .. } => WidgetKind::Number,
            Widget::Checkbox { .. } => WidgetKind::Checkbox,
            Widget::Radio { .. } => WidgetKind::Radio,
            Widget::Switch { .. } => WidgetKind::Switch,
            Widget::Array { .. } => WidgetKind::Array,
            Widget::Object { .. } => WidgetKind::Object,
            Widget::Custom { .. } => WidgetKind::Custom,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputType {
    Text,
    Password,
    Email,
    Url,
    Tel,
}

impl InputType {
    pub fn as_str(self) -> &'static str {
        match self {
            InputType::Text => "text",
            InputType::Password => "password",
            InputType::Email => "email",
            InputType::Url => "url",
            InputType::Tel => "tel",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SelectOption {
    pub label: String,
    pub value: Value,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArrayItem {
    pub index: usize,
    pub field: RenderedField,
    pub can_move_up: bool,
    pub can_move_down: bool,
}

/// The whole form: the root field plus the error count of the last submit.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedForm {
    pub title: Option<String>,
    pub description: Option<String>,
    pub root: RenderedField,
    pub error_count: usize,
}

impl RenderedField {
    /// Depth-first, pre-order lookup by path.
    pub fn find(&self, path: &Path) -> Option<&RenderedField> {
        if &self.path == path {
            return Some(self);
        }
        if !self.path.is_ancestor_or_self(path) {
            return None;
        }
        match &self.widget {
            Widget::Object { properties } => properties
                .iter()
                .find_map(|(_, field)| field.find(path)),
            Widget::Array { items } => items.iter().find_map(|item| item.field.find(path)),
            _ => None,
        }
    }
}
