use crate::todo::{Task, TaskPatch, TodoServiceError, TodoState};
use axum::{
    Router,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{delete, get},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// JSON representation of a task for API responses.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TodoJson {
    /// Identifier assigned by the store
    pub id: i32,
    /// Task text, trimmed
    pub text: String,
    /// Whether the task is done
    pub completed: bool,
    /// Creation time (RFC 3339)
    pub created_at: DateTime<Utc>,
    /// Time of the last successful update (RFC 3339)
    pub updated_at: DateTime<Utc>,
}

impl From<Task> for TodoJson {
    fn from(task: Task) -> Self {
        Self {
            id: task.id(),
            text: task.text().to_string(),
            completed: task.completed(),
            created_at: task.created_at(),
            updated_at: task.updated_at(),
        }
    }
}

/// Request body for POST /api/todos.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateTodoRequest {
    /// Task text; must not be blank
    #[serde(default)]
    pub text: Option<String>,
}

/// Request body for PUT /api/todos/{id}. Omitted fields are left unchanged.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateTodoRequest {
    /// New task text; must not be blank when present
    #[serde(default)]
    pub text: Option<String>,
    /// New completion flag; must be a JSON boolean when present
    #[serde(default)]
    pub completed: Option<bool>,
}

impl From<UpdateTodoRequest> for TaskPatch {
    fn from(request: UpdateTodoRequest) -> Self {
        Self {
            text: request.text,
            completed: request.completed,
        }
    }
}

/// JSON body of every error response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: String) -> Self {
        Self { error }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DeleteTodoResponse {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteCompletedResponse {
    pub message: String,
    /// Number of completed tasks removed
    pub deleted_count: u64,
}

/// Error type for the todo JSON handlers.
#[derive(Debug, thiserror::Error)]
pub enum TodoApiError {
    #[error("Todo not found")]
    NotFound,
    /// The body could not be read as the expected JSON payload.
    #[error("{0}")]
    MalformedBody(String),
    #[error(transparent)]
    Service(#[from] TodoServiceError),
}

impl From<JsonRejection> for TodoApiError {
    fn from(rejection: JsonRejection) -> Self {
        TodoApiError::MalformedBody(rejection.body_text())
    }
}

impl IntoResponse for TodoApiError {
    fn into_response(self) -> Response {
        let status_code = match &self {
            TodoApiError::NotFound => {
                tracing::debug!("Todo not found");
                StatusCode::NOT_FOUND
            }
            TodoApiError::MalformedBody(_) => StatusCode::BAD_REQUEST,
            TodoApiError::Service(TodoServiceError::Validation(_)) => StatusCode::BAD_REQUEST,
            TodoApiError::Service(TodoServiceError::Storage(err)) => {
                tracing::error!("Storage failure: {}", err);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (status_code, Json(ErrorResponse::new(self.to_string()))).into_response()
    }
}

/// An id segment that is not an integer cannot name any stored task.
fn task_id(id: Result<Path<i32>, PathRejection>) -> Result<i32, TodoApiError> {
    match id {
        Ok(Path(id)) => Ok(id),
        Err(rejection) => {
            tracing::debug!("Unusable task id: {}", rejection.body_text());
            Err(TodoApiError::NotFound)
        }
    }
}

/// Handler for GET /api/todos - Returns all tasks, newest first.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    get,
    path = "/api/todos",
    responses(
        (status = 200, description = "All tasks, newest first", body = [TodoJson]),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    ),
    tag = "Todos"
)]
pub async fn list_todos_handler(
    State(state): State<TodoState>,
) -> Result<Json<Vec<TodoJson>>, TodoApiError> {
    let tasks = state.service.list_all().await?;
    Ok(Json(tasks.into_iter().map(TodoJson::from).collect()))
}

/// Handler for GET /api/todos/{id} - Returns a single task.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    get,
    path = "/api/todos/{id}",
    params(("id" = i32, Path, description = "Task ID")),
    responses(
        (status = 200, description = "The task", body = TodoJson),
        (status = 404, description = "No task with this ID", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    ),
    tag = "Todos"
)]
pub async fn get_todo_handler(
    State(state): State<TodoState>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Json<TodoJson>, TodoApiError> {
    let id = task_id(id)?;
    let task = state
        .service
        .get_by_id(id)
        .await?
        .ok_or(TodoApiError::NotFound)?;
    Ok(Json(TodoJson::from(task)))
}

/// Handler for POST /api/todos - Creates a task and returns the stored row.
#[tracing::instrument(skip(state, payload))]
#[utoipa::path(
    post,
    path = "/api/todos",
    request_body = CreateTodoRequest,
    responses(
        (status = 201, description = "Task created", body = TodoJson),
        (status = 400, description = "Text missing or blank", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    ),
    tag = "Todos"
)]
pub async fn create_todo_handler(
    State(state): State<TodoState>,
    payload: Result<Json<CreateTodoRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<TodoJson>), TodoApiError> {
    let Json(request) = payload?;
    let id = state.service.create(request.text.as_deref()).await?;

    // The row can disappear between the insert and this read.
    let task = state
        .service
        .get_by_id(id)
        .await?
        .ok_or(TodoApiError::NotFound)?;
    Ok((StatusCode::CREATED, Json(TodoJson::from(task))))
}

/// Handler for PUT /api/todos/{id} - Applies a partial update and returns the stored row.
#[tracing::instrument(skip(state, payload))]
#[utoipa::path(
    put,
    path = "/api/todos/{id}",
    params(("id" = i32, Path, description = "Task ID")),
    request_body = UpdateTodoRequest,
    responses(
        (status = 200, description = "Task updated", body = TodoJson),
        (status = 400, description = "No fields supplied, blank text or malformed body", body = ErrorResponse),
        (status = 404, description = "No task with this ID", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    ),
    tag = "Todos"
)]
pub async fn update_todo_handler(
    State(state): State<TodoState>,
    id: Result<Path<i32>, PathRejection>,
    payload: Result<Json<UpdateTodoRequest>, JsonRejection>,
) -> Result<Json<TodoJson>, TodoApiError> {
    let Json(request) = payload?;
    let patch: TaskPatch = request.into();
    patch.validate().map_err(TodoServiceError::from)?;
    let id = task_id(id)?;

    let changes = state.service.update(id, patch).await?;
    if changes == 0 {
        return Err(TodoApiError::NotFound);
    }

    let task = state
        .service
        .get_by_id(id)
        .await?
        .ok_or(TodoApiError::NotFound)?;
    Ok(Json(TodoJson::from(task)))
}

/// Handler for DELETE /api/todos/{id} - Deletes a single task.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    delete,
    path = "/api/todos/{id}",
    params(("id" = i32, Path, description = "Task ID")),
    responses(
        (status = 200, description = "Task deleted", body = DeleteTodoResponse),
        (status = 404, description = "No task with this ID", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    ),
    tag = "Todos"
)]
pub async fn delete_todo_handler(
    State(state): State<TodoState>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Json<DeleteTodoResponse>, TodoApiError> {
    let id = task_id(id)?;
    if state.service.delete(id).await? == 0 {
        return Err(TodoApiError::NotFound);
    }

    Ok(Json(DeleteTodoResponse {
        message: "Todo deleted successfully".to_string(),
    }))
}

/// Handler for DELETE /api/todos/completed/all - Deletes every completed task.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    delete,
    path = "/api/todos/completed/all",
    responses(
        (status = 200, description = "Completed tasks deleted", body = DeleteCompletedResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    ),
    tag = "Todos"
)]
pub async fn delete_completed_todos_handler(
    State(state): State<TodoState>,
) -> Result<Json<DeleteCompletedResponse>, TodoApiError> {
    let deleted_count = state.service.delete_completed().await?;

    Ok(Json(DeleteCompletedResponse {
        message: format!("{} completed todos deleted successfully", deleted_count),
        deleted_count,
    }))
}

/// Creates and returns the todos API router.
pub fn create_api_router(state: TodoState) -> Router {
    Router::new()
        .route(
            "/api/todos",
            get(list_todos_handler).post(create_todo_handler),
        )
        .route(
            "/api/todos/completed/all",
            delete(delete_completed_todos_handler),
        )
        .route(
            "/api/todos/{id}",
            get(get_todo_handler)
                .put(update_todo_handler)
                .delete(delete_todo_handler),
        )
        .with_state(state)
}
