//! Integration tests for TodoApiClient using wiremock.
//!
//! These tests verify the HTTP contract of every gateway operation against a mock server.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::sync::Arc;

use tagdo_services::{
    FailureCause, LabelSet, NewLabelPayload, NewTodoPayload, Operation, SyncGateway,
    TodoApiClient, TodoCollection, UpdateTodoPayload,
};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Helper to create a test todo
fn test_todo(id: i32, text: &str, completed: bool, labels: serde_json::Value) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "text": text,
        "completed": completed,
        "labels": labels,
    })
}

fn work_label() -> serde_json::Value {
    serde_json::json!({ "id": 1, "name": "work" })
}

#[tokio::test]
async fn test_list_todos_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/todos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            test_todo(2, "second", true, serde_json::json!([])),
            test_todo(1, "buy milk", false, serde_json::json!([work_label()])),
        ])))
        .mount(&mock_server)
        .await;

    let client = TodoApiClient::new(&mock_server.uri(), None).unwrap();
    let todos = client.list_todos().await.unwrap();

    assert_eq!(todos.len(), 2);
    assert_eq!(todos[0].id, 2);
    assert!(todos[0].completed);
    assert_eq!(todos[1].text, "buy milk");
    assert_eq!(todos[1].labels[0].name, "work");
}

#[tokio::test]
async fn test_get_todo_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/todos/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(test_todo(
            7,
            "call mom",
            false,
            serde_json::json!([]),
        )))
        .mount(&mock_server)
        .await;

    let client = TodoApiClient::new(&mock_server.uri(), None).unwrap();
    let todo = client.get_todo(7).await.unwrap();

    assert_eq!(todo.id, 7);
    assert_eq!(todo.text, "call mom");
}

#[tokio::test]
async fn test_get_todo_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/todos/99"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Todo not found"))
        .mount(&mock_server)
        .await;

    let client = TodoApiClient::new(&mock_server.uri(), None).unwrap();
    let err = client.get_todo(99).await.unwrap_err();

    assert_eq!(err.operation(), Operation::GetTodo);
    assert_eq!(err.status(), Some(404));
    assert!(err.to_string().contains("404"), "Error should mention 404 status: {}", err);
}

#[tokio::test]
async fn test_create_todo_sends_label_ids() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/todos"))
        .and(body_json(serde_json::json!({ "text": "buy milk", "labels": [1] })))
        .respond_with(ResponseTemplate::new(201).set_body_json(test_todo(
            1,
            "buy milk",
            false,
            serde_json::json!([work_label()]),
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = TodoApiClient::new(&mock_server.uri(), None).unwrap();
    let todo = client
        .create_todo(&NewTodoPayload {
            text: "buy milk".to_string(),
            labels: vec![1],
        })
        .await
        .unwrap();

    assert_eq!(todo.id, 1);
    assert_eq!(todo.label_ids(), vec![1]);
}

#[tokio::test]
async fn test_update_todo_patches_without_id_in_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/todos/1"))
        .and(body_json(serde_json::json!({
            "text": "buy oat milk",
            "completed": true,
            "labels": []
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(test_todo(
            1,
            "buy oat milk",
            true,
            serde_json::json!([]),
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = TodoApiClient::new(&mock_server.uri(), None).unwrap();
    let todo = client
        .update_todo(&UpdateTodoPayload {
            id: 1,
            text: Some("buy oat milk".to_string()),
            completed: Some(true),
            labels: Some(vec![]),
        })
        .await
        .unwrap();

    assert_eq!(todo.text, "buy oat milk");
    assert!(todo.completed);
}

#[tokio::test]
async fn test_delete_todo_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/todos/3"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&mock_server)
        .await;

    let client = TodoApiClient::new(&mock_server.uri(), None).unwrap();
    assert!(client.delete_todo(3).await.is_ok());
}

#[tokio::test]
async fn test_label_operations() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/labels"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([work_label()])))
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/labels"))
        .and(body_json(serde_json::json!({ "name": "home" })))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(serde_json::json!({ "id": 2, "name": "home" })),
        )
        .mount(&mock_server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/labels/2"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&mock_server)
        .await;

    let client = TodoApiClient::new(&mock_server.uri(), None).unwrap();

    let labels = client.list_labels().await.unwrap();
    assert_eq!(labels.len(), 1);
    assert_eq!(labels[0].name, "work");

    let created = client.create_label(&NewLabelPayload::new("home")).await.unwrap();
    assert_eq!(created.id, 2);

    assert!(client.delete_label(2).await.is_ok());
}

#[tokio::test]
async fn test_any_non_success_status_fails_once() {
    for status in [400u16, 401, 404, 409, 500, 503] {
        let mock_server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/labels/1"))
            .respond_with(ResponseTemplate::new(status))
            .expect(1) // single attempt, no retries
            .mount(&mock_server)
            .await;

        let client = TodoApiClient::new(&mock_server.uri(), None).unwrap();
        let err = client.delete_label(1).await.unwrap_err();

        assert_eq!(err.operation(), Operation::DeleteLabel);
        assert_eq!(err.status(), Some(status));
    }
}

#[tokio::test]
async fn test_malformed_success_body_is_request_failure() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/labels"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&mock_server)
        .await;

    let client = TodoApiClient::new(&mock_server.uri(), None).unwrap();
    let err = client.list_labels().await.unwrap_err();

    assert_eq!(err.operation(), Operation::ListLabels);
    assert!(matches!(err.cause(), FailureCause::Decode(_)));
}

#[tokio::test]
async fn test_connection_refused_is_transport_failure() {
    // Nothing listens on port 1
    let client = TodoApiClient::new("http://127.0.0.1:1", None).unwrap();
    let err = client.list_todos().await.unwrap_err();

    assert_eq!(err.operation(), Operation::ListTodos);
    assert_eq!(err.status(), None);
    assert!(matches!(err.cause(), FailureCause::Transport(_)));
}

#[tokio::test]
async fn test_collection_reloads_after_create() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/todos"))
        .respond_with(ResponseTemplate::new(201).set_body_json(test_todo(
            5,
            "direct result is ignored",
            false,
            serde_json::json!([]),
        )))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/todos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([test_todo(
            5,
            "as the server stores it",
            false,
            serde_json::json!([])
        )])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = Arc::new(TodoApiClient::new(&mock_server.uri(), None).unwrap());
    let todos = TodoCollection::new(client);

    todos
        .create(NewTodoPayload {
            text: "as typed".to_string(),
            labels: vec![],
        })
        .await
        .unwrap();

    assert_eq!(todos.len(), 1);
    assert_eq!(todos.get(5).unwrap().text, "as the server stores it");
}

#[tokio::test]
async fn test_failed_create_does_not_reload() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/todos"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/todos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = Arc::new(TodoApiClient::new(&mock_server.uri(), None).unwrap());
    let todos = TodoCollection::new(client);

    let err = todos
        .create(NewTodoPayload {
            text: "x".to_string(),
            labels: vec![],
        })
        .await
        .unwrap_err();

    assert_eq!(err.operation(), Operation::CreateTodo);
    assert!(todos.is_empty());
}

#[tokio::test]
async fn test_label_dedup_skips_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/labels"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([work_label()])))
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/labels"))
        .respond_with(ResponseTemplate::new(201).set_body_json(work_label()))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = Arc::new(TodoApiClient::new(&mock_server.uri(), None).unwrap());
    let labels = LabelSet::new(client);
    labels.load().await.unwrap();

    let existing = labels.add(NewLabelPayload::new("work")).await.unwrap();

    assert_eq!(existing.id, 1);
    assert_eq!(labels.labels().len(), 1);
}
