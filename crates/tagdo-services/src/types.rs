//! Wire and read-model types for todos and labels.

use serde::{Deserialize, Serialize};

pub type TodoId = i32;
pub type LabelId = i32;

/// A label as the server returns it. Identity is `id`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Label {
    pub id: LabelId,
    pub name: String,
}

/// A todo item with its labels embedded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: TodoId,
    pub text: String,
    pub completed: bool,
    #[serde(default)]
    pub labels: Vec<Label>,
}

impl Todo {
    /// Ids of the embedded labels, in order.
    pub fn label_ids(&self) -> Vec<LabelId> {
        self.labels.iter().map(|label| label.id).collect()
    }

    pub fn has_label(&self, id: LabelId) -> bool {
        self.labels.iter().any(|label| label.id == id)
    }

    /// Update that flips `completed` and resends every other field unchanged.
    pub fn toggle_completed_payload(&self) -> UpdateTodoPayload {
        UpdateTodoPayload {
            id: self.id,
            text: Some(self.text.clone()),
            completed: Some(!self.completed),
            labels: Some(self.label_ids()),
        }
    }
}

/// Request body for `POST /todos`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTodoPayload {
    pub text: String,
    pub labels: Vec<LabelId>,
}

/// Partial update for `PATCH /todos/{id}`.
///
/// `id` selects the path and is never part of the body.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UpdateTodoPayload {
    #[serde(skip_serializing, default)]
    pub id: TodoId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<LabelId>>,
}

/// Request body for `POST /labels`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewLabelPayload {
    pub name: String,
}

impl NewLabelPayload {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}
