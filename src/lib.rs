#![deny(rust_2018_idioms)]
//! Schema-driven forms: parse a JSON Schema into a resolved node tree,
//! render it as a tree of widgets bound to path-addressed form data, apply
//! edit commands, and validate on submit.

mod app;
mod form;
mod io;
mod presentation;
mod schema;

pub use app::{
    FormOptions, FormSession, SessionError, SubmitOutcome,
    validation::{
        SchemaValidator, ValidationReport, ValidatorCache, ValidatorError, strip_annotations,
        validate,
    },
};
pub use form::{
    CommandError, ErrorKind, ErrorList, FieldCoercionError, FieldError, FormCommand, FormStore,
    Path, PathSegment, SubscriptionId, apply_command, apply_schema_defaults,
    widgets::{
        ArrayItem, FieldRenderer, InputType, RenderedField, RenderedForm, Renderer, SelectOption,
        Widget, WidgetKind, WidgetRegistry, array::MoveDirection,
    },
};
pub use io::{
    DocumentFormat, OutputDestination, OutputOptions, emit, emit_to, parse_document_str,
    serialize_value,
};
pub use presentation::{ViewOptions, form_text, text_to_plain};
pub use schema::{
    ArraySchema, BooleanSchema, ChoiceOption, FormSchema, NodeKind, NodeType, NumberSchema,
    ObjectSchema, SchemaError, SchemaNode, StringSchema, UI_SCHEMA_KEY, UiHint, parse_form_schema,
};

pub mod prelude {
    pub use super::{
        FormCommand, FormOptions, FormSession, Path, SubmitOutcome, Widget, WidgetRegistry,
    };
}
