//! Database setup and initialization.
//!
//! Entry points call [`setup_database`] with the resolved database path.

use anyhow::Result;
use sqlx::SqlitePool;
use sqlx::sqlite::SqliteConnectOptions;
use std::path::Path;

/// Open (creating if needed) the database file and ensure the schema exists.
///
/// # Example
///
/// ```rust,no_run
/// use toolgate_db::setup_database;
/// use std::path::Path;
///
/// # async fn example() -> anyhow::Result<()> {
/// let pool = setup_database(Path::new("/path/to/toolgate.db")).await?;
/// # Ok(())
/// # }
/// ```
pub async fn setup_database(db_path: &Path) -> Result<SqlitePool> {
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let pool = SqlitePool::connect_with(
        SqliteConnectOptions::new()
            .filename(db_path)
            .create_if_missing(true),
    )
    .await?;

    create_schema(&pool).await?;
    tracing::debug!(path = %db_path.display(), "Database ready");

    Ok(pool)
}

/// Fresh in-memory database with the production schema.
///
/// Limited to one connection: every `sqlite::memory:` connection is its own
/// database.
#[cfg(any(test, feature = "test-utils"))]
pub async fn setup_test_database() -> Result<SqlitePool> {
    let pool = sqlx::sqlite::SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await?;
    create_schema(&pool).await?;
    Ok(pool)
}

/// Safe to call repeatedly; everything is `IF NOT EXISTS`.
async fn create_schema(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r"
        CREATE TABLE IF NOT EXISTS settings_kv (
            key TEXT PRIMARY KEY NOT NULL,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        ",
    )
    .execute(pool)
    .await?;

    Ok(())
}
