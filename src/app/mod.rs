mod options;
mod session;
pub mod validation;

pub use options::FormOptions;
pub use session::{FormSession, SessionError, SubmitOutcome};
