use migration::MigratorTrait;
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};

/// Opens the SQLite store behind `db_url` and brings its schema up to date.
///
/// Every pooled connection to `sqlite::memory:` would see its own empty
/// database, so in-memory stores are pinned to exactly one connection.
#[tracing::instrument]
pub async fn connect(db_url: &str) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(db_url.to_owned());
    if db_url.contains(":memory:") {
        options.max_connections(1).min_connections(1);
    }
    options.sqlx_logging(false);

    let db = Database::connect(options).await?;
    migration::Migrator::up(&db, None).await?;
    tracing::info!("Database migrations applied successfully");
    Ok(db)
}

/// Closes the store. Called once, when the server has stopped.
#[tracing::instrument(skip(db))]
pub async fn close(db: DatabaseConnection) -> Result<(), DbErr> {
    db.close().await?;
    tracing::info!("Database connection closed");
    Ok(())
}
