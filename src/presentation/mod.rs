//! Terminal rendering of a [`RenderedForm`](crate::form::widgets::RenderedForm)
//! as styled ratatui text.

mod fields;
mod view;

pub use view::{ViewOptions, form_text, text_to_plain};
