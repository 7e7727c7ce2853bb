use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use todo_list::web::create_app;
use tower::ServiceExt;

mod common;

const STATIC_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/public");

async fn create_test_router() -> Router {
    let state = common::setup().await.expect("Failed to setup test context");
    create_app(state.state(), STATIC_DIR)
}

async fn get(app: Router, uri: &str) -> (StatusCode, header::HeaderMap, String) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let response = app.oneshot(request).await.unwrap();

    let status = response.status();
    let headers = response.headers().clone();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, headers, String::from_utf8(body.to_vec()).unwrap())
}

#[tokio::test]
async fn can_check_health_endpoint() {
    let app = create_test_router().await;

    let (status, _, body) = get(app, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "OK");
}

#[tokio::test]
async fn can_serve_frontend_index_at_root() {
    let app = create_test_router().await;

    let (status, headers, body) = get(app, "/").await;

    assert_eq!(status, StatusCode::OK);
    assert!(
        headers[header::CONTENT_TYPE]
            .to_str()
            .unwrap()
            .starts_with("text/html")
    );
    assert!(body.contains("id=\"todoList\""));
    assert!(body.contains("script.js"));
}

#[tokio::test]
async fn can_serve_frontend_script() {
    let app = create_test_router().await;

    let (status, _, body) = get(app, "/script.js").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("/api/todos"));
}

#[tokio::test]
async fn can_answer_not_found_for_unknown_static_file() {
    let app = create_test_router().await;

    let (status, _, _) = get(app, "/missing.css").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn can_serve_openapi_document() {
    let app = create_test_router().await;

    let (status, _, body) = get(app, "/api-docs/openapi.json").await;

    assert_eq!(status, StatusCode::OK);
    let document: serde_json::Value = serde_json::from_str(&body).unwrap();
    let paths = document["paths"].as_object().expect("Expected paths");
    assert!(paths.contains_key("/api/todos"));
    assert!(paths.contains_key("/api/todos/{id}"));
    assert!(paths.contains_key("/api/todos/completed/all"));
}
