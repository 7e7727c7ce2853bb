use crate::entities::*;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::*;
use std::sync::Arc;

pub mod api;

#[derive(Debug, PartialEq, Clone, Eq)]
pub struct Task {
    id: i32,
    text: String,
    completed: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Task {
    pub fn new(
        id: i32,
        text: String,
        completed: bool,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            text,
            completed,
            created_at,
            updated_at,
        }
    }

    /// Returns the ID assigned by the store.
    pub fn id(&self) -> i32 {
        self.id
    }

    /// Returns the trimmed task text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns whether the task is done.
    pub fn completed(&self) -> bool {
        self.completed
    }

    /// Returns when the task was created.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns when the task was last successfully updated.
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

impl From<todo::Model> for Task {
    fn from(model: todo::Model) -> Self {
        Task::new(
            model.id,
            model.text,
            model.completed,
            model.created_at,
            model.updated_at,
        )
    }
}

/// Partial update for a task. A field left as `None` keeps its stored value.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TaskPatch {
    pub text: Option<String>,
    pub completed: Option<bool>,
}

impl TaskPatch {
    pub fn is_empty(&self) -> bool {
        self.text.is_none() && self.completed.is_none()
    }

    /// Checks the patch without looking at any stored task.
    ///
    /// An empty patch fails with [`ValidationError::NoFieldsToUpdate`]; text
    /// that is blank after trimming fails with [`ValidationError::TextEmpty`].
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.is_empty() {
            return Err(ValidationError::NoFieldsToUpdate);
        }
        if let Some(text) = self.text.as_deref() {
            normalize_text(text).ok_or(ValidationError::TextEmpty)?;
        }
        Ok(())
    }
}

/// Input rejected before it reaches the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Text is required")]
    TextRequired,
    #[error("Text cannot be empty")]
    TextEmpty,
    #[error("No fields to update")]
    NoFieldsToUpdate,
}

/// Error type for TodoService operations.
#[derive(Debug, thiserror::Error)]
pub enum TodoServiceError {
    /// The caller supplied invalid input.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// The store failed; carries its diagnostic unchanged.
    #[error("{0}")]
    Storage(#[from] sea_orm::DbErr),
}

/// Trims `text` and returns it, or `None` when nothing is left.
fn normalize_text(text: &str) -> Option<&str> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

/// Validates and applies every mutation on the `todos` table.
///
/// Built once per process around the shared store handle and handed to the
/// HTTP layer through [`TodoState`].
#[derive(Debug, Clone)]
pub struct TodoService {
    db: Arc<DatabaseConnection>,
}

impl TodoService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Retrieves every task, newest first.
    ///
    /// # Returns
    ///
    /// A `Result` containing the tasks ordered by creation time (descending), or a storage error.
    #[tracing::instrument(skip(self))]
    pub async fn list_all(&self) -> Result<Vec<Task>, TodoServiceError> {
        let tasks = todo::Entity::find()
            .order_by_desc(todo::Column::CreatedAt)
            .order_by_desc(todo::Column::Id)
            .all(self.db.as_ref())
            .await?
            .into_iter()
            .map(Task::from)
            .collect();
        Ok(tasks)
    }

    /// Retrieves a task by its ID.
    ///
    /// # Returns
    ///
    /// `Ok(None)` when no task has the given ID.
    #[tracing::instrument(skip(self))]
    pub async fn get_by_id(&self, id: i32) -> Result<Option<Task>, TodoServiceError> {
        let model = todo::Entity::find_by_id(id).one(self.db.as_ref()).await?;
        Ok(model.map(Task::from))
    }

    /// Creates a new, incomplete task.
    ///
    /// # Arguments
    ///
    /// * `text` - The task text. Surrounding whitespace is stripped before storing.
    ///
    /// # Returns
    ///
    /// A `Result` containing the ID assigned by the store.
    #[tracing::instrument(skip(self))]
    pub async fn create(&self, text: Option<&str>) -> Result<i32, TodoServiceError> {
        let text = text
            .and_then(normalize_text)
            .ok_or(ValidationError::TextRequired)?;

        let now = Utc::now();
        let active_model = todo::ActiveModel {
            text: ActiveValue::Set(text.to_owned()),
            completed: ActiveValue::Set(false),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        };
        let result = todo::Entity::insert(active_model)
            .exec(self.db.as_ref())
            .await?;
        tracing::info!("Created task {}", result.last_insert_id);
        Ok(result.last_insert_id)
    }

    /// Applies the fields present in `patch` to the task with the given ID.
    ///
    /// Fields absent from the patch are never written. `updated_at` is
    /// refreshed whenever the update goes through.
    ///
    /// # Returns
    ///
    /// The number of rows changed: `0` when no task has the given ID, `1` otherwise.
    #[tracing::instrument(skip(self))]
    pub async fn update(&self, id: i32, patch: TaskPatch) -> Result<u64, TodoServiceError> {
        patch.validate()?;

        let mut statement = todo::Entity::update_many();
        if let Some(text) = patch.text.as_deref().and_then(normalize_text) {
            statement = statement.col_expr(todo::Column::Text, Expr::value(text.to_owned()));
        }
        if let Some(completed) = patch.completed {
            statement = statement.col_expr(todo::Column::Completed, Expr::value(completed));
        }

        let result = statement
            .col_expr(todo::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(todo::Column::Id.eq(id))
            .exec(self.db.as_ref())
            .await?;
        Ok(result.rows_affected)
    }

    /// Deletes a task by its ID.
    ///
    /// # Returns
    ///
    /// The number of rows removed: `0` when no task has the given ID.
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<u64, TodoServiceError> {
        let result = todo::Entity::delete_by_id(id)
            .exec(self.db.as_ref())
            .await?;
        Ok(result.rows_affected)
    }

    /// Deletes every completed task in one statement.
    ///
    /// # Returns
    ///
    /// The number of rows removed.
    #[tracing::instrument(skip(self))]
    pub async fn delete_completed(&self) -> Result<u64, TodoServiceError> {
        let result = todo::Entity::delete_many()
            .filter(todo::Column::Completed.eq(true))
            .exec(self.db.as_ref())
            .await?;
        if result.rows_affected > 0 {
            tracing::info!("Deleted {} completed tasks", result.rows_affected);
        }
        Ok(result.rows_affected)
    }
}

#[derive(Clone, Debug)]
pub struct TodoState {
    pub service: Arc<TodoService>,
}

impl TodoState {
    pub fn new(service: TodoService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }
}
