use axum::body::Body;
use axum::http::{Request, StatusCode};
use sea_orm::{DatabaseBackend, DbErr, MockDatabase};
use std::sync::Arc;
use todo_list::todo::api::create_api_router;
use todo_list::todo::{TaskPatch, TodoService, TodoServiceError, TodoState};
use tower::ServiceExt;

const DIAGNOSTIC: &str = "disk I/O error";

fn failing_service() -> TodoService {
    let db = MockDatabase::new(DatabaseBackend::Sqlite)
        .append_query_errors([DbErr::Custom(DIAGNOSTIC.to_string())])
        .append_exec_errors([DbErr::Custom(DIAGNOSTIC.to_string())])
        .into_connection();
    TodoService::new(Arc::new(db))
}

#[tokio::test]
async fn can_propagate_query_failure_from_list() {
    let service = failing_service();

    let err = service.list_all().await.unwrap_err();

    assert!(matches!(err, TodoServiceError::Storage(_)));
    assert!(err.to_string().contains(DIAGNOSTIC));
}

#[tokio::test]
async fn can_propagate_exec_failure_from_update() {
    let service = failing_service();
    let patch = TaskPatch {
        completed: Some(true),
        ..Default::default()
    };

    let err = service.update(1, patch).await.unwrap_err();

    assert!(matches!(err, TodoServiceError::Storage(_)));
    assert!(err.to_string().contains(DIAGNOSTIC));
}

#[tokio::test]
async fn can_propagate_exec_failure_from_bulk_delete() {
    let service = failing_service();

    let err = service.delete_completed().await.unwrap_err();

    assert!(matches!(err, TodoServiceError::Storage(_)));
    assert!(err.to_string().contains(DIAGNOSTIC));
}

#[tokio::test]
async fn can_answer_internal_server_error_with_storage_diagnostic() {
    let app = create_api_router(TodoState::new(failing_service()));
    let request = Request::builder()
        .uri("/api/todos")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert!(body["error"].as_str().unwrap().contains(DIAGNOSTIC));
}
