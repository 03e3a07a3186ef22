//! Local todo list with refetch-after-write.
//!
//! Mutations never patch the local list. Each one is sent to the server, its direct result is
//! dropped, and the whole list is fetched again. The local list is therefore never ahead of or
//! behind the server by more than one round trip.

use std::sync::Arc;

use crate::error::SyncResult;
use crate::gateway::SyncGateway;
use crate::sequence::SequencedState;
use crate::types::{NewTodoPayload, Todo, TodoId, UpdateTodoPayload};

pub struct TodoCollection {
    gateway: Arc<dyn SyncGateway>,
    state: SequencedState<Vec<Todo>>,
}

impl TodoCollection {
    pub fn new(gateway: Arc<dyn SyncGateway>) -> Self {
        Self {
            gateway,
            state: SequencedState::default(),
        }
    }

    /// Fetch the full list and replace the local one.
    ///
    /// If a reload issued later has already been applied, this response is discarded and the
    /// newer list is returned instead.
    pub async fn load(&self) -> SyncResult<Vec<Todo>> {
        let ticket = self.state.issue();
        let todos = self.gateway.list_todos().await?;
        if self.state.replace(ticket, todos) {
            tracing::debug!("Applied todo reload {:?}", ticket);
        }
        Ok(self.state.snapshot())
    }

    pub async fn create(&self, payload: NewTodoPayload) -> SyncResult<()> {
        self.gateway.create_todo(&payload).await?;
        self.load().await?;
        Ok(())
    }

    pub async fn update(&self, payload: UpdateTodoPayload) -> SyncResult<()> {
        self.gateway.update_todo(&payload).await?;
        self.load().await?;
        Ok(())
    }

    pub async fn delete(&self, id: TodoId) -> SyncResult<()> {
        self.gateway.delete_todo(id).await?;
        self.load().await?;
        Ok(())
    }

    pub fn todos(&self) -> Vec<Todo> {
        self.state.snapshot()
    }

    pub fn get(&self, id: TodoId) -> Option<Todo> {
        self.state
            .read(|todos| todos.iter().find(|todo| todo.id == id).cloned())
    }

    pub fn len(&self) -> usize {
        self.state.read(Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
