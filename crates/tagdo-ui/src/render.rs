//! Plain-text rendering of the controller's view.

use std::fmt::Write;

use tagdo_services::{Label, LabelId, Operation, TodoId};

/// Snapshot of what the screen shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    pub labels: Vec<Label>,
    pub filter: Option<LabelId>,
    pub visible: Vec<TodoRow>,
    pub failure: Option<FailureLine>,
}

/// A visible todo with its labels resolved against the current label set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoRow {
    pub id: TodoId,
    pub text: String,
    pub completed: bool,
    pub labels: Vec<Label>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureLine {
    pub operation: Operation,
    pub message: &'static str,
    pub retryable: bool,
}

pub fn render(view: &ViewState) -> String {
    let mut out = String::new();

    out.push_str("Labels:");
    if view.labels.is_empty() {
        out.push_str(" (none)");
    }
    for label in &view.labels {
        if view.filter == Some(label.id) {
            let _ = write!(out, " [*{}]", label.name);
        } else {
            let _ = write!(out, " [{}]", label.name);
        }
    }
    out.push('\n');

    if view.visible.is_empty() {
        out.push_str("No todos\n");
    }
    for row in &view.visible {
        let mark = if row.completed { "x" } else { " " };
        let _ = write!(out, "[{}] {} (#{})", mark, row.text, row.id);
        if !row.labels.is_empty() {
            let names: Vec<&str> = row.labels.iter().map(|l| l.name.as_str()).collect();
            let _ = write!(out, " {{{}}}", names.join(", "));
        }
        out.push('\n');
    }

    if let Some(failure) = &view.failure {
        let _ = write!(out, "! {} failed: {}", failure.operation, failure.message);
        if failure.retryable {
            out.push_str(" (retry available)");
        }
        out.push('\n');
    }

    out
}
