pub mod controller;
pub mod draft;
pub mod error_mapping;
pub mod render;

pub use controller::{Failure, Intent, Outcome, TodoController};
pub use draft::{EditSession, TodoDraft};
pub use error_mapping::app_error;
pub use render::{render, FailureLine, TodoRow, ViewState};
