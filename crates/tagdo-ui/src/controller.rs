//! View controller: turns user intents into model calls and owns the failure surface.
//!
//! Models are never touched after a failed call, so whatever was displayed before stays
//! displayed. The failure is kept with the intent that caused it so the user can retry.

use std::sync::Arc;

use tagdo_core::AppError;
use tagdo_services::{
    project, resolve_labels, select_label, Label, LabelId, LabelSet, NewLabelPayload,
    NewTodoPayload, Operation, SyncGateway, SyncResult, Todo, TodoCollection, TodoId,
    UpdateTodoPayload,
};

use crate::draft::{EditSession, TodoDraft};
use crate::error_mapping::app_error;
use crate::render::{FailureLine, TodoRow, ViewState};

/// Something the user asked for that needs the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Initial load: todos, then labels
    Mount,
    CreateTodo(NewTodoPayload),
    UpdateTodo(UpdateTodoPayload),
    DeleteTodo(TodoId),
    CreateLabel(NewLabelPayload),
    DeleteLabel(LabelId),
}

/// A failed intent, kept until the next successful one.
#[derive(Debug)]
pub struct Failure {
    pub operation: Operation,
    pub error: AppError,
    pub intent: Intent,
}

impl Failure {
    pub fn message(&self) -> &'static str {
        self.error.user_message()
    }

    pub fn is_retryable(&self) -> bool {
        self.error.is_retryable()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The intent reached the server and the models were refreshed.
    Applied,
    /// Nothing to send (blank text, unknown todo, label name taken, no failure to retry).
    Skipped,
    /// The server call failed; models are unchanged.
    Failed,
}

pub struct TodoController {
    gateway: Arc<dyn SyncGateway>,
    labels: LabelSet,
    todos: TodoCollection,
    filter: Option<LabelId>,
    draft: TodoDraft,
    editing: Option<EditSession>,
    last_failure: Option<Failure>,
}

impl TodoController {
    pub fn new(gateway: Arc<dyn SyncGateway>) -> Self {
        Self {
            labels: LabelSet::new(gateway.clone()),
            todos: TodoCollection::new(gateway.clone()),
            gateway,
            filter: None,
            draft: TodoDraft::default(),
            editing: None,
            last_failure: None,
        }
    }

    pub async fn mount(&mut self) -> Outcome {
        self.dispatch(Intent::Mount).await
    }

    /// Run `intent` and record the result at this boundary.
    pub async fn dispatch(&mut self, intent: Intent) -> Outcome {
        match self.run(&intent).await {
            Ok(()) => {
                tracing::debug!("Intent applied: {:?}", intent);
                self.last_failure = None;
                Outcome::Applied
            }
            Err(e) => {
                tracing::error!("{}", e);
                self.last_failure = Some(Failure {
                    operation: e.operation(),
                    error: app_error(&e),
                    intent,
                });
                Outcome::Failed
            }
        }
    }

    async fn run(&mut self, intent: &Intent) -> SyncResult<()> {
        match intent {
            Intent::Mount => {
                let todos = self.todos.load().await?;
                let labels = self.labels.load().await?;
                tracing::info!("Loaded {} todos and {} labels", todos.len(), labels.len());
            }
            Intent::CreateTodo(payload) => self.todos.create(payload.clone()).await?,
            Intent::UpdateTodo(payload) => self.todos.update(payload.clone()).await?,
            Intent::DeleteTodo(id) => self.todos.delete(*id).await?,
            Intent::CreateLabel(payload) => {
                self.labels.add(payload.clone()).await?;
            }
            Intent::DeleteLabel(id) => {
                self.labels.remove(*id).await?;
                if self.filter == Some(*id) {
                    self.filter = None;
                }
            }
        }
        Ok(())
    }

    /// Re-issue the intent that last failed.
    pub async fn retry(&mut self) -> Outcome {
        match self.last_failure.take() {
            Some(failure) => {
                tracing::info!("Retrying {}", failure.operation);
                self.dispatch(failure.intent).await
            }
            None => Outcome::Skipped,
        }
    }

    /// Drop ids of labels deleted since the todo list was last loaded. The server rejects them.
    fn retain_known(&self, ids: &mut Vec<LabelId>) {
        ids.retain(|id| self.labels.contains(*id));
    }

    fn with_known_labels(&self, mut todo: Todo) -> Todo {
        todo.labels.retain(|label| self.labels.contains(label.id));
        todo
    }

    /// Submit the new-todo form. Blank text is ignored without a request.
    pub async fn submit_draft(&mut self) -> Outcome {
        let Some(mut payload) = self.draft.payload() else {
            return Outcome::Skipped;
        };
        self.retain_known(&mut payload.labels);
        let outcome = self.dispatch(Intent::CreateTodo(payload)).await;
        if outcome == Outcome::Applied {
            self.draft.clear_text();
        }
        outcome
    }

    pub async fn toggle_completed(&mut self, id: TodoId) -> Outcome {
        match self.todos.get(id) {
            Some(todo) => {
                let payload = self.with_known_labels(todo).toggle_completed_payload();
                self.dispatch(Intent::UpdateTodo(payload)).await
            }
            None => {
                tracing::warn!("No todo {} to toggle", id);
                Outcome::Skipped
            }
        }
    }

    pub async fn delete_todo(&mut self, id: TodoId) -> Outcome {
        self.dispatch(Intent::DeleteTodo(id)).await
    }

    /// Open the edit form on a todo. Returns false if the todo isn't in the list.
    pub fn begin_edit(&mut self, id: TodoId) -> bool {
        self.editing = self
            .todos
            .get(id)
            .map(|todo| EditSession::open(&self.with_known_labels(todo)));
        self.editing.is_some()
    }

    pub fn edit_mut(&mut self) -> Option<&mut EditSession> {
        self.editing.as_mut()
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    /// Send the edit form. The form stays open if the update fails.
    pub async fn commit_edit(&mut self) -> Outcome {
        let Some(mut payload) = self.editing.as_ref().map(EditSession::payload) else {
            return Outcome::Skipped;
        };
        if let Some(ids) = payload.labels.as_mut() {
            self.retain_known(ids);
        }
        let outcome = self.dispatch(Intent::UpdateTodo(payload)).await;
        if outcome == Outcome::Applied {
            self.editing = None;
        }
        outcome
    }

    /// Create a label unless the name is blank or already taken locally.
    pub async fn add_label(&mut self, name: &str) -> Outcome {
        let name = name.trim();
        if name.is_empty() || self.labels.find_by_name(name).is_some() {
            return Outcome::Skipped;
        }
        self.dispatch(Intent::CreateLabel(NewLabelPayload::new(name)))
            .await
    }

    pub async fn delete_label(&mut self, id: LabelId) -> Outcome {
        self.dispatch(Intent::DeleteLabel(id)).await
    }

    /// Filter by `label`, or clear the filter if it is already active.
    pub fn click_label(&mut self, label: &Label) {
        self.filter = select_label(self.filter, label);
    }

    /// Fetch one todo straight from the server without touching the list.
    pub async fn fetch_todo(&self, id: TodoId) -> Result<Todo, AppError> {
        self.gateway.get_todo(id).await.map_err(|e| {
            tracing::error!("{}", e);
            app_error(&e)
        })
    }

    pub fn labels(&self) -> Vec<Label> {
        self.labels.labels()
    }

    pub fn find_label(&self, name: &str) -> Option<Label> {
        self.labels.find_by_name(name)
    }

    pub fn todos(&self) -> Vec<Todo> {
        self.todos.todos()
    }

    pub fn filter(&self) -> Option<LabelId> {
        self.filter
    }

    pub fn draft(&self) -> &TodoDraft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut TodoDraft {
        &mut self.draft
    }

    pub fn editing(&self) -> Option<&EditSession> {
        self.editing.as_ref()
    }

    pub fn last_failure(&self) -> Option<&Failure> {
        self.last_failure.as_ref()
    }

    /// Everything needed to draw the screen, with the filter applied.
    pub fn view(&self) -> ViewState {
        let labels = self.labels.labels();
        let todos = self.todos.todos();
        let visible = project(&todos, self.filter)
            .into_iter()
            .map(|todo| TodoRow {
                id: todo.id,
                text: todo.text.clone(),
                completed: todo.completed,
                labels: resolve_labels(todo, &labels).into_iter().cloned().collect(),
            })
            .collect();

        ViewState {
            filter: self.filter,
            visible,
            failure: self.last_failure.as_ref().map(|failure| FailureLine {
                operation: failure.operation,
                message: failure.message(),
                retryable: failure.is_retryable(),
            }),
            labels,
        }
    }
}
