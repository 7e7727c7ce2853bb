#![allow(dead_code)]

use chrono::{DateTime, Duration, Utc};
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection};
use std::sync::Arc;
use todo_list::entities::todo;
use todo_list::todo::{TodoService, TodoState};

pub async fn setup_db() -> anyhow::Result<DatabaseConnection> {
    // Allow multiple calls to init for tests.
    let _ = tracing_subscriber::fmt().try_init();
    let db = todo_list::storage::connect("sqlite::memory:").await?;
    Ok(db)
}

pub struct TestContext {
    pub db: Arc<DatabaseConnection>,
    pub service: TodoService,
}

impl TestContext {
    pub fn state(&self) -> TodoState {
        TodoState::new(self.service.clone())
    }
}

pub async fn setup() -> anyhow::Result<TestContext> {
    let db = Arc::new(setup_db().await?);
    let service = TodoService::new(db.clone());
    Ok(TestContext { db, service })
}

/// Inserts a row directly, bypassing the service.
pub async fn insert_todo(
    db: &DatabaseConnection,
    text: &str,
    completed: bool,
    created_at: DateTime<Utc>,
) -> todo::Model {
    let active_model = todo::ActiveModel {
        text: ActiveValue::Set(text.to_string()),
        completed: ActiveValue::Set(completed),
        created_at: ActiveValue::Set(created_at),
        updated_at: ActiveValue::Set(created_at),
        ..Default::default()
    };
    active_model.insert(db).await.expect("Failed to insert todo")
}

/// Inserts `(text, completed)` rows one second apart, oldest first.
pub async fn insert_todos(db: &DatabaseConnection, todos: &[(&str, bool)]) -> Vec<todo::Model> {
    let start = Utc::now() - Duration::seconds(todos.len() as i64);
    let mut models = Vec::with_capacity(todos.len());
    for (offset, (text, completed)) in todos.iter().enumerate() {
        let created_at = start + Duration::seconds(offset as i64);
        models.push(insert_todo(db, text, *completed, created_at).await);
    }
    models
}
