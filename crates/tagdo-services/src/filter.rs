//! Visible-list projection and label filter selection.

use crate::types::{Label, LabelId, Todo};

/// Todos visible under `filter`, in collection order.
///
/// `None` shows everything; `Some(id)` shows exactly the todos carrying that label id.
pub fn project(todos: &[Todo], filter: Option<LabelId>) -> Vec<&Todo> {
    match filter {
        None => todos.iter().collect(),
        Some(id) => todos.iter().filter(|todo| todo.has_label(id)).collect(),
    }
}

/// New filter after the user clicks `clicked`.
///
/// Clicking the active filter clears it; clicking any other label selects that label.
pub fn select_label(current: Option<LabelId>, clicked: &Label) -> Option<LabelId> {
    if current == Some(clicked.id) {
        None
    } else {
        Some(clicked.id)
    }
}

/// The todo's labels that still exist in `known`, in the todo's order.
///
/// Embedded labels can outlive a label deleted since the last todo reload; joining against the
/// current label set hides those at display time.
pub fn resolve_labels<'a>(todo: &Todo, known: &'a [Label]) -> Vec<&'a Label> {
    todo.labels
        .iter()
        .filter_map(|embedded| known.iter().find(|label| label.id == embedded.id))
        .collect()
}
