//! Form state: path-addressed data and errors, edit commands, and the
//! widget set that renders and mutates them.

pub mod actions;
mod defaults;
mod error;
mod path;
pub mod reducers;
mod store;
pub mod widgets;

pub use actions::FormCommand;
pub use defaults::apply_schema_defaults;
pub use error::{ErrorKind, ErrorList, FieldCoercionError, FieldError};
pub use path::{Path, PathSegment};
pub use reducers::{CommandError, apply_command};
pub use store::{FormStore, SubscriptionId};
