//! The seam between the collection models and the remote store.

use async_trait::async_trait;

use crate::error::SyncResult;
use crate::types::{Label, LabelId, NewLabelPayload, NewTodoPayload, Todo, TodoId, UpdateTodoPayload};

/// One function per remote operation.
///
/// Implementations perform exactly one request per call: no retries, no caching, no batching.
/// Any non-success outcome is reported as [`crate::SyncError::RequestFailed`] naming the
/// operation.
#[async_trait]
pub trait SyncGateway: Send + Sync {
    async fn list_todos(&self) -> SyncResult<Vec<Todo>>;

    async fn get_todo(&self, id: TodoId) -> SyncResult<Todo>;

    async fn create_todo(&self, payload: &NewTodoPayload) -> SyncResult<Todo>;

    async fn update_todo(&self, payload: &UpdateTodoPayload) -> SyncResult<Todo>;

    async fn delete_todo(&self, id: TodoId) -> SyncResult<()>;

    async fn list_labels(&self) -> SyncResult<Vec<Label>>;

    async fn create_label(&self, payload: &NewLabelPayload) -> SyncResult<Label>;

    async fn delete_label(&self, id: LabelId) -> SyncResult<()>;
}
