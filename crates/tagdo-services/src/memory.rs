//! In-memory stand-in for the todo server.
//!
//! Behaves like the real API for the operations the client uses: ids are assigned
//! sequentially, todos are listed in id order with their labels joined from the label table,
//! and unknown ids fail with 404. Failures can be injected per operation and every call is
//! counted, successful or not.

use std::collections::{BTreeMap, HashMap, HashSet};

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::error::{FailureCause, Operation, SyncError, SyncResult};
use crate::gateway::SyncGateway;
use crate::types::{Label, LabelId, NewLabelPayload, NewTodoPayload, Todo, TodoId, UpdateTodoPayload};

#[derive(Debug, Clone)]
struct StoredTodo {
    text: String,
    completed: bool,
    labels: Vec<LabelId>,
}

#[derive(Debug, Default)]
struct Store {
    todos: BTreeMap<TodoId, StoredTodo>,
    labels: BTreeMap<LabelId, String>,
    next_todo_id: TodoId,
    next_label_id: LabelId,
    fail_next: HashSet<Operation>,
    fail_always: HashSet<Operation>,
    calls: HashMap<Operation, usize>,
}

impl Store {
    fn todo(&self, id: TodoId, stored: &StoredTodo) -> Todo {
        Todo {
            id,
            text: stored.text.clone(),
            completed: stored.completed,
            labels: stored
                .labels
                .iter()
                .filter_map(|label_id| {
                    self.labels.get(label_id).map(|name| Label {
                        id: *label_id,
                        name: name.clone(),
                    })
                })
                .collect(),
        }
    }

    fn check_labels(&self, op: Operation, ids: &[LabelId]) -> SyncResult<()> {
        match ids.iter().find(|id| !self.labels.contains_key(id)) {
            Some(missing) => Err(status(op, 422, format!("unknown label {}", missing))),
            None => Ok(()),
        }
    }

    fn insert_label(&mut self, name: &str) -> Label {
        self.next_label_id += 1;
        self.labels.insert(self.next_label_id, name.to_string());
        Label {
            id: self.next_label_id,
            name: name.to_string(),
        }
    }
}

fn status(operation: Operation, status: u16, body: impl Into<String>) -> SyncError {
    SyncError::request_failed(
        operation,
        FailureCause::Status {
            status,
            body: body.into(),
        },
    )
}

#[derive(Debug, Default)]
pub struct MemoryGateway {
    store: Mutex<Store>,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a label directly, bypassing call counting.
    pub fn seed_label(&self, name: &str) -> Label {
        self.store.lock().insert_label(name)
    }

    /// Make the next call of `operation` fail with a 500.
    pub fn fail_next(&self, operation: Operation) {
        self.store.lock().fail_next.insert(operation);
    }

    /// Make every call of `operation` fail with a 500 until [`MemoryGateway::recover`].
    pub fn fail_always(&self, operation: Operation) {
        self.store.lock().fail_always.insert(operation);
    }

    pub fn recover(&self, operation: Operation) {
        let mut store = self.store.lock();
        store.fail_next.remove(&operation);
        store.fail_always.remove(&operation);
    }

    /// Number of times `operation` was attempted.
    pub fn calls(&self, operation: Operation) -> usize {
        self.store
            .lock()
            .calls
            .get(&operation)
            .copied()
            .unwrap_or_default()
    }

    /// Count the call and apply any injected failure.
    fn begin(&self, operation: Operation) -> SyncResult<parking_lot::MutexGuard<'_, Store>> {
        let mut store = self.store.lock();
        *store.calls.entry(operation).or_default() += 1;
        if store.fail_next.remove(&operation) || store.fail_always.contains(&operation) {
            return Err(status(operation, 500, "injected failure"));
        }
        Ok(store)
    }
}

#[async_trait]
impl SyncGateway for MemoryGateway {
    async fn list_todos(&self) -> SyncResult<Vec<Todo>> {
        let store = self.begin(Operation::ListTodos)?;
        Ok(store
            .todos
            .iter()
            .map(|(id, stored)| store.todo(*id, stored))
            .collect())
    }

    async fn get_todo(&self, id: TodoId) -> SyncResult<Todo> {
        let op = Operation::GetTodo;
        let store = self.begin(op)?;
        store
            .todos
            .get(&id)
            .map(|stored| store.todo(id, stored))
            .ok_or_else(|| status(op, 404, format!("todo {} not found", id)))
    }

    async fn create_todo(&self, payload: &NewTodoPayload) -> SyncResult<Todo> {
        let op = Operation::CreateTodo;
        let mut store = self.begin(op)?;
        if payload.text.is_empty() {
            return Err(status(op, 422, "text: Can not be empty"));
        }
        store.check_labels(op, &payload.labels)?;

        store.next_todo_id += 1;
        let id = store.next_todo_id;
        let stored = StoredTodo {
            text: payload.text.clone(),
            completed: false,
            labels: payload.labels.clone(),
        };
        let todo = store.todo(id, &stored);
        store.todos.insert(id, stored);
        Ok(todo)
    }

    async fn update_todo(&self, payload: &UpdateTodoPayload) -> SyncResult<Todo> {
        let op = Operation::UpdateTodo;
        let mut store = self.begin(op)?;
        if let Some(labels) = &payload.labels {
            store.check_labels(op, labels)?;
        }

        let mut stored = store
            .todos
            .get(&payload.id)
            .cloned()
            .ok_or_else(|| status(op, 404, format!("todo {} not found", payload.id)))?;
        if let Some(text) = &payload.text {
            stored.text = text.clone();
        }
        if let Some(completed) = payload.completed {
            stored.completed = completed;
        }
        if let Some(labels) = &payload.labels {
            stored.labels = labels.clone();
        }

        let todo = store.todo(payload.id, &stored);
        store.todos.insert(payload.id, stored);
        Ok(todo)
    }

    async fn delete_todo(&self, id: TodoId) -> SyncResult<()> {
        let op = Operation::DeleteTodo;
        let mut store = self.begin(op)?;
        store
            .todos
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| status(op, 404, format!("todo {} not found", id)))
    }

    async fn list_labels(&self) -> SyncResult<Vec<Label>> {
        let store = self.begin(Operation::ListLabels)?;
        Ok(store
            .labels
            .iter()
            .map(|(id, name)| Label {
                id: *id,
                name: name.clone(),
            })
            .collect())
    }

    async fn create_label(&self, payload: &NewLabelPayload) -> SyncResult<Label> {
        let mut store = self.begin(Operation::CreateLabel)?;
        Ok(store.insert_label(&payload.name))
    }

    async fn delete_label(&self, id: LabelId) -> SyncResult<()> {
        let op = Operation::DeleteLabel;
        let mut store = self.begin(op)?;
        store
            .labels
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| status(op, 404, format!("label {} not found", id)))
    }
}
