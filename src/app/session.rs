use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::form::{
    CommandError, ErrorList, FormCommand, FormStore, apply_command, apply_schema_defaults,
    widgets::{RenderedForm, Renderer, WidgetRegistry},
};
use crate::schema::{FormSchema, NodeKind, SchemaError, parse_form_schema};

use super::{
    options::FormOptions,
    validation::{SchemaValidator, ValidationReport, ValidatorCache, ValidatorError},
};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Schema(#[from] SchemaError),
    #[error(transparent)]
    Validator(#[from] ValidatorError),
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Submitted(Value),
    Rejected(ErrorList),
}

impl SubmitOutcome {
    pub fn is_submitted(&self) -> bool {
        matches!(self, SubmitOutcome::Submitted(_))
    }
}

type SubmitCallback = Box<dyn FnMut(&Value)>;
type ErrorCallback = Box<dyn FnMut(&ErrorList, &Value)>;

/// One form session: an immutable schema, the store it drives, and the
/// host's submit collaborators.
///
/// All state is reached through this handle; widgets and commands receive
/// the store explicitly.
pub struct FormSession {
    schema: Arc<FormSchema>,
    store: FormStore,
    validator: Arc<SchemaValidator>,
    widgets: WidgetRegistry,
    options: FormOptions,
    on_submit: Option<SubmitCallback>,
    on_error: Option<ErrorCallback>,
}

impl FormSession {
    pub fn new(schema: &Value, initial_data: Value) -> Result<Self, SessionError> {
        Self::with_options(schema, initial_data, FormOptions::default())
    }

    pub fn with_options(
        schema: &Value,
        initial_data: Value,
        options: FormOptions,
    ) -> Result<Self, SessionError> {
        let validator = Arc::new(SchemaValidator::compile(schema, &options.annotation_keys)?);
        Self::assemble(schema, initial_data, options, validator)
    }

    /// Like [`FormSession::with_options`], reusing a validator compiled for
    /// an identical schema.
    pub fn with_cache(
        schema: &Value,
        initial_data: Value,
        options: FormOptions,
        cache: &mut ValidatorCache,
    ) -> Result<Self, SessionError> {
        let validator = cache.get_or_compile(schema, &options.annotation_keys)?;
        Self::assemble(schema, initial_data, options, validator)
    }

    fn assemble(
        schema: &Value,
        initial_data: Value,
        options: FormOptions,
        validator: Arc<SchemaValidator>,
    ) -> Result<Self, SessionError> {
        let form_schema = parse_form_schema(schema)?;
        let mut data = initial_data;
        if data.is_null()
            && matches!(
                form_schema.resolve(&form_schema.root)?.kind,
                NodeKind::Object(_)
            )
        {
            data = Value::Object(Map::new());
        }
        if options.apply_defaults {
            apply_schema_defaults(&form_schema, &mut data)?;
        }
        debug!(title = ?form_schema.title, "form session started");
        Ok(Self {
            schema: Arc::new(form_schema),
            store: FormStore::new(data),
            validator,
            widgets: WidgetRegistry::default(),
            options,
            on_submit: None,
            on_error: None,
        })
    }

    pub fn with_widgets(mut self, widgets: WidgetRegistry) -> Self {
        self.widgets = widgets;
        self
    }

    /// Called with the form data after a valid submit.
    pub fn on_submit(mut self, callback: impl FnMut(&Value) + 'static) -> Self {
        self.on_submit = Some(Box::new(callback));
        self
    }

    /// Called with the error list and the form data after an invalid submit.
    pub fn on_error(mut self, callback: impl FnMut(&ErrorList, &Value) + 'static) -> Self {
        self.on_error = Some(Box::new(callback));
        self
    }

    pub fn schema(&self) -> &FormSchema {
        &self.schema
    }

    pub fn options(&self) -> &FormOptions {
        &self.options
    }

    pub fn form_data(&self) -> &Value {
        self.store.data()
    }

    pub fn errors(&self) -> &ErrorList {
        self.store.errors()
    }

    pub fn store(&self) -> &FormStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut FormStore {
        &mut self.store
    }

    pub fn dispatch(&mut self, command: FormCommand) -> Result<bool, CommandError> {
        apply_command(&self.schema, &mut self.store, command)
    }

    pub fn render(&self) -> Result<RenderedForm, SchemaError> {
        let mut form = Renderer::new(&self.schema, &self.store, &self.widgets).render_form()?;
        if let Some(title) = &self.options.title {
            form.title = Some(title.clone());
        }
        Ok(form)
    }

    /// Validates without touching the stored errors.
    pub fn validate(&self) -> ValidationReport {
        self.validator.validate(self.store.data())
    }

    /// Validates the current data and hands it to the success collaborator,
    /// or stores the errors and hands them to the failure collaborator.
    /// Entered data is never modified.
    pub fn submit(&mut self) -> SubmitOutcome {
        let report = self.validate();
        if report.valid {
            self.store.clear_errors();
            info!("form submitted");
            let data = self.store.data().clone();
            if let Some(callback) = self.on_submit.as_mut() {
                callback(&data);
            }
            return SubmitOutcome::Submitted(data);
        }

        for error in &report.errors {
            if !matches!(self.schema.node_at(&error.path), Ok(Some(_))) {
                warn!(
                    path = %error.path,
                    message = %error.message,
                    "validation error has no matching field"
                );
            }
        }
        info!(issues = report.errors.len(), "form submission rejected");
        self.store.replace_errors(report.errors.clone());
        if let Some(callback) = self.on_error.as_mut() {
            callback(&report.errors, self.store.data());
        }
        SubmitOutcome::Rejected(report.errors)
    }
}

impl fmt::Debug for FormSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormSession")
            .field("schema", &self.schema.title)
            .field("store", &self.store)
            .field("validator", &self.validator)
            .field("widgets", &self.widgets)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn profile() -> Value {
        json!({
            "title": "Profile",
            "type": "object",
            "properties": {
                "name": {"type": "string", "default": "anon"},
                "age": {"type": "integer"}
            }
        })
    }

    #[test]
    fn null_seed_becomes_an_object_with_defaults() {
        let session = FormSession::new(&profile(), Value::Null).expect("session starts");
        assert_eq!(session.form_data(), &json!({"name": "anon"}));

        let bare = FormSession::with_options(
            &profile(),
            Value::Null,
            FormOptions::default().with_defaults(false),
        )
        .expect("session starts");
        assert_eq!(bare.form_data(), &json!({}));
    }

    #[test]
    fn title_option_overrides_schema_title() {
        let session = FormSession::with_options(
            &profile(),
            json!({}),
            FormOptions::default().with_title("Edit profile"),
        )
        .expect("session starts");
        let form = session.render().expect("form renders");
        assert_eq!(form.title.as_deref(), Some("Edit profile"));
    }

    #[test]
    fn sessions_share_cached_validators() {
        let mut cache = ValidatorCache::new();
        let first =
            FormSession::with_cache(&profile(), json!({}), FormOptions::default(), &mut cache)
                .expect("session starts");
        let second = FormSession::with_cache(
            &profile(),
            json!({"age": 3}),
            FormOptions::default(),
            &mut cache,
        )
        .expect("session starts");
        assert_eq!(cache.len(), 1);
        assert!(Arc::ptr_eq(&first.validator, &second.validator));
    }

    #[test]
    fn broken_references_fail_session_start() {
        let schema = json!({
            "type": "object",
            "properties": {"x": {"$ref": "#/definitions/nope"}}
        });
        let err = FormSession::new(&schema, json!({})).expect_err("dangling ref");
        assert!(matches!(
            err,
            SessionError::Schema(SchemaError::UnresolvedReference { .. })
        ));
    }

    #[test]
    fn invalid_submit_keeps_data_and_stores_errors() {
        let mut session =
            FormSession::new(&profile(), json!({"age": "old"})).expect("session starts");
        let before = session.form_data().clone();
        let outcome = session.submit();
        assert!(matches!(outcome, SubmitOutcome::Rejected(ref errors) if errors.len() == 1));
        assert_eq!(session.form_data(), &before);
        assert_eq!(session.errors().len(), 1);
        assert_eq!(session.errors()[0].path, crate::form::Path::root().child("age"));
    }
}
