// crates/tagdo-services/src/client.rs

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::instrument;
use url::Url;

use crate::error::{FailureCause, Operation, SyncError, SyncResult};
use crate::gateway::SyncGateway;
use crate::types::{Label, LabelId, NewLabelPayload, NewTodoPayload, Todo, TodoId, UpdateTodoPayload};

/// HTTP client for the todo API.
#[derive(Debug, Clone)]
pub struct TodoApiClient {
    base_url: Url,
    client: Arc<Client>,
}

impl TodoApiClient {
    /// Create a client rooted at `base_url`.
    ///
    /// `timeout` is a transport-level cap; `None` leaves requests unbounded.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self> {
        let mut base_url =
            Url::parse(base_url).with_context(|| format!("Invalid API URL: {}", base_url))?;

        // Url::join replaces the last path segment unless the base ends with '/'
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().context("Failed to create HTTP client")?;

        Ok(Self {
            base_url,
            client: Arc::new(client),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url(&self, operation: Operation, path: &str) -> SyncResult<Url> {
        self.base_url.join(path).map_err(|e| {
            SyncError::request_failed(operation, FailureCause::Transport(e.to_string()))
        })
    }

    /// Send the request once and turn anything but 2xx into `RequestFailed`.
    async fn send(&self, operation: Operation, request: RequestBuilder) -> SyncResult<Response> {
        let response = request.send().await.map_err(|e| {
            tracing::warn!("{} failed before a response arrived: {}", operation, e);
            SyncError::request_failed(operation, FailureCause::from_reqwest(&e))
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!("{} returned {}", operation, status);
            return Err(SyncError::request_failed(
                operation,
                FailureCause::Status {
                    status: status.as_u16(),
                    body,
                },
            ));
        }

        Ok(response)
    }

    async fn decode<T: DeserializeOwned>(operation: Operation, response: Response) -> SyncResult<T> {
        response.json::<T>().await.map_err(|e| {
            tracing::warn!("{} returned a body that did not parse: {}", operation, e);
            SyncError::request_failed(operation, FailureCause::Decode(e.to_string()))
        })
    }
}

#[async_trait]
impl SyncGateway for TodoApiClient {
    #[instrument(skip(self), level = "debug")]
    async fn list_todos(&self) -> SyncResult<Vec<Todo>> {
        let op = Operation::ListTodos;
        let url = self.url(op, "todos")?;

        let response = self.send(op, self.client.get(url)).await?;
        let todos: Vec<Todo> = Self::decode(op, response).await?;

        tracing::debug!("Fetched {} todos", todos.len());
        Ok(todos)
    }

    #[instrument(skip(self), level = "debug")]
    async fn get_todo(&self, id: TodoId) -> SyncResult<Todo> {
        let op = Operation::GetTodo;
        let url = self.url(op, &format!("todos/{}", id))?;

        let response = self.send(op, self.client.get(url)).await?;
        Self::decode(op, response).await
    }

    #[instrument(skip(self, payload), level = "debug")]
    async fn create_todo(&self, payload: &NewTodoPayload) -> SyncResult<Todo> {
        let op = Operation::CreateTodo;
        let url = self.url(op, "todos")?;

        let response = self.send(op, self.client.post(url).json(payload)).await?;
        let todo: Todo = Self::decode(op, response).await?;

        tracing::info!("Created todo {}", todo.id);
        Ok(todo)
    }

    #[instrument(skip(self, payload), fields(id = payload.id), level = "debug")]
    async fn update_todo(&self, payload: &UpdateTodoPayload) -> SyncResult<Todo> {
        let op = Operation::UpdateTodo;
        let url = self.url(op, &format!("todos/{}", payload.id))?;

        let response = self.send(op, self.client.patch(url).json(payload)).await?;
        let todo: Todo = Self::decode(op, response).await?;

        tracing::info!("Updated todo {}", todo.id);
        Ok(todo)
    }

    #[instrument(skip(self), level = "debug")]
    async fn delete_todo(&self, id: TodoId) -> SyncResult<()> {
        let op = Operation::DeleteTodo;
        let url = self.url(op, &format!("todos/{}", id))?;

        // 204 No Content on success; the body is never read
        self.send(op, self.client.delete(url)).await?;

        tracing::info!("Deleted todo {}", id);
        Ok(())
    }

    #[instrument(skip(self), level = "debug")]
    async fn list_labels(&self) -> SyncResult<Vec<Label>> {
        let op = Operation::ListLabels;
        let url = self.url(op, "labels")?;

        let response = self.send(op, self.client.get(url)).await?;
        let labels: Vec<Label> = Self::decode(op, response).await?;

        tracing::debug!("Fetched {} labels", labels.len());
        Ok(labels)
    }

    #[instrument(skip(self, payload), fields(name = %payload.name), level = "debug")]
    async fn create_label(&self, payload: &NewLabelPayload) -> SyncResult<Label> {
        let op = Operation::CreateLabel;
        let url = self.url(op, "labels")?;

        let response = self.send(op, self.client.post(url).json(payload)).await?;
        let label: Label = Self::decode(op, response).await?;

        tracing::info!("Created label {} ({})", label.name, label.id);
        Ok(label)
    }

    #[instrument(skip(self), level = "debug")]
    async fn delete_label(&self, id: LabelId) -> SyncResult<()> {
        let op = Operation::DeleteLabel;
        let url = self.url(op, &format!("labels/{}", id))?;

        self.send(op, self.client.delete(url)).await?;

        tracing::info!("Deleted label {}", id);
        Ok(())
    }
}
