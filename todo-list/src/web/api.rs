use crate::todo::{self, TodoState};

use axum::{Json, Router, routing::get};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;

/// OpenAPI description of the JSON API.
#[derive(OpenApi)]
#[openapi(
    paths(
        todo::api::list_todos_handler,
        todo::api::get_todo_handler,
        todo::api::create_todo_handler,
        todo::api::update_todo_handler,
        todo::api::delete_todo_handler,
        todo::api::delete_completed_todos_handler,
    ),
    components(schemas(
        todo::api::TodoJson,
        todo::api::CreateTodoRequest,
        todo::api::UpdateTodoRequest,
        todo::api::DeleteTodoResponse,
        todo::api::DeleteCompletedResponse,
        todo::api::ErrorResponse,
    )),
    tags((name = "Todos", description = "Single-user task list"))
)]
pub struct ApiDoc;

#[tracing::instrument]
pub async fn openapi_handler() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Creates the API routes for JSON API endpoints.
pub fn create_api_router(todo_state: TodoState) -> Router {
    todo::api::create_api_router(todo_state)
        .route("/api-docs/openapi.json", get(openapi_handler))
        .layer(ServiceBuilder::new().layer(CorsLayer::permissive()))
}
