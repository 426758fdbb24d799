//! `SQLite` implementation of the `SettingsRepository` trait.

use async_trait::async_trait;
use sqlx::{Row, SqlitePool};

use toolgate_core::{RepositoryError, SettingsRepository};

/// Key of the single settings record.
pub const SETTINGS_KEY: &str = "tool_settings";

/// Stores the settings record as JSON text in the `settings_kv` table.
pub struct SqliteSettingsRepository {
    pool: SqlitePool,
}

impl SqliteSettingsRepository {
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SettingsRepository for SqliteSettingsRepository {
    async fn load_record(&self) -> Result<Option<String>, RepositoryError> {
        let row = sqlx::query("SELECT value FROM settings_kv WHERE key = ?")
            .bind(SETTINGS_KEY)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepositoryError::Storage(e.to_string()))?;

        row.map(|r| r.try_get::<String, _>("value"))
            .transpose()
            .map_err(|e| RepositoryError::Storage(e.to_string()))
    }

    async fn save_record(&self, record: &str) -> Result<(), RepositoryError> {
        let updated_at = chrono::Utc::now().format("%Y-%m-%d %H:%M:%S").to_string();

        sqlx::query("INSERT OR REPLACE INTO settings_kv (key, value, updated_at) VALUES (?, ?, ?)")
            .bind(SETTINGS_KEY)
            .bind(record)
            .bind(&updated_at)
            .execute(&self.pool)
            .await
            .map_err(|e| RepositoryError::Storage(e.to_string()))?;

        tracing::debug!(bytes = record.len(), "Saved settings record");
        Ok(())
    }
}
