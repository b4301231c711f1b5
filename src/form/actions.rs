use serde_json::Value;

use super::{Path, widgets::array::MoveDirection};

/// One UI event, addressed by path. Commands run to completion one at a
/// time against the store.
#[derive(Debug, Clone, PartialEq)]
pub enum FormCommand {
    /// Typed text for a string, number, date or boolean field.
    Input { path: Path, text: String },
    SetBool { path: Path, value: bool },
    Toggle { path: Path },
    /// Option index for select and radio widgets; `None` is the empty choice.
    Choose { path: Path, option: Option<usize> },
    AddItem { path: Path },
    RemoveItem { path: Path, index: usize },
    MoveItem {
        path: Path,
        index: usize,
        direction: MoveDirection,
    },
    /// Raw write that bypasses widget coercion.
    SetValue { path: Path, value: Value },
}

impl FormCommand {
    pub fn path(&self) -> &Path {
        match self {
            FormCommand::Input { path, .. }
            | FormCommand::SetBool { path, .. }
            | FormCommand::Toggle { path }
            | FormCommand::Choose { path, .. }
            | FormCommand::AddItem { path }
            | FormCommand::RemoveItem { path, .. }
            | FormCommand::MoveItem { path, .. }
            | FormCommand::SetValue { path, .. } => path,
        }
    }
}
