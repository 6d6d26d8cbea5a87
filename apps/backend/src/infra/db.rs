use migration::{migrate, MigrationCommand};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tracing::info;

use crate::config::db::{db_url, DbKind};
use crate::error::AppError;

/// Opens a pool for `kind`. Does not run migrations.
pub async fn connect_db(kind: DbKind) -> Result<DatabaseConnection, AppError> {
    let url = db_url(kind)?;
    let mut options = ConnectOptions::new(url);
    options.sqlx_logging(false);

    if kind == DbKind::SqliteMemory {
        // Each SQLite memory connection is its own database; keep exactly one.
        options.max_connections(1).min_connections(1);
    }

    let conn = Database::connect(options).await?;
    info!(engine = kind.engine(), "Database connected");
    Ok(conn)
}

/// Connects and brings the schema up to date.
pub async fn bootstrap_db(kind: DbKind) -> Result<DatabaseConnection, AppError> {
    let conn = connect_db(kind).await?;
    migrate(&conn, MigrationCommand::Up)
        .await
        .map_err(|e| AppError::config(format!("migration failed: {e}")))?;
    Ok(conn)
}
