//! In-progress edits: the new-todo form and the edit form for an existing todo.

use tagdo_services::{toggle, Label, NewTodoPayload, Todo, TodoId, UpdateTodoPayload};

/// Contents of the new-todo form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoDraft {
    pub text: String,
    pub labels: Vec<Label>,
}

impl TodoDraft {
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn toggle_label(&mut self, label: &Label) {
        self.labels = toggle(&self.labels, label);
    }

    /// Payload to submit, or `None` when there is no text to submit.
    pub fn payload(&self) -> Option<NewTodoPayload> {
        if self.text.trim().is_empty() {
            return None;
        }
        Some(NewTodoPayload {
            text: self.text.clone(),
            labels: self.labels.iter().map(|label| label.id).collect(),
        })
    }

    /// Reset after a successful submit. The label selection is kept for the next todo.
    pub fn clear_text(&mut self) {
        self.text.clear();
    }
}

/// Edit form opened on an existing todo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSession {
    todo_id: TodoId,
    completed: bool,
    pub text: String,
    pub labels: Vec<Label>,
}

impl EditSession {
    pub fn open(todo: &Todo) -> Self {
        Self {
            todo_id: todo.id,
            completed: todo.completed,
            text: todo.text.clone(),
            labels: todo.labels.clone(),
        }
    }

    pub fn todo_id(&self) -> TodoId {
        self.todo_id
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn toggle_label(&mut self, label: &Label) {
        self.labels = toggle(&self.labels, label);
    }

    /// Full update carrying every field the form knows.
    pub fn payload(&self) -> UpdateTodoPayload {
        UpdateTodoPayload {
            id: self.todo_id,
            text: Some(self.text.clone()),
            completed: Some(self.completed),
            labels: Some(self.labels.iter().map(|label| label.id).collect()),
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;

    fn label(id: i32, name: &str) -> Label {
        Label {
            id,
            name: name.to_string(),
        }
    }

    #[test]
    fn blank_draft_has_no_payload() {
        let mut draft = TodoDraft::default();
        assert!(draft.payload().is_none());
        draft.set_text("   ");
        assert!(draft.payload().is_none());
    }

    #[test]
    fn draft_payload_carries_label_ids_in_selection_order() {
        let mut draft = TodoDraft::default();
        draft.set_text("buy milk");
        draft.toggle_label(&label(2, "home"));
        draft.toggle_label(&label(1, "work"));

        let payload = draft.payload().unwrap();
        assert_eq!(payload.text, "buy milk");
        assert_eq!(payload.labels, vec![2, 1]);
    }

    #[test]
    fn clear_text_keeps_labels() {
        let mut draft = TodoDraft::default();
        draft.set_text("x");
        draft.toggle_label(&label(1, "work"));
        draft.clear_text();
        assert!(draft.text.is_empty());
        assert_eq!(draft.labels, vec![label(1, "work")]);
    }

    #[test]
    fn edit_session_sends_every_field() {
        let todo = Todo {
            id: 3,
            text: "report".to_string(),
            completed: true,
            labels: vec![label(1, "work")],
        };
        let mut session = EditSession::open(&todo);
        session.set_text("final report");
        session.toggle_label(&label(1, "work"));
        session.toggle_label(&label(2, "urgent"));

        let payload = session.payload();
        assert_eq!(payload.id, 3);
        assert_eq!(payload.text.as_deref(), Some("final report"));
        assert_eq!(payload.completed, Some(true));
        assert_eq!(payload.labels, Some(vec![2]));
    }
}
