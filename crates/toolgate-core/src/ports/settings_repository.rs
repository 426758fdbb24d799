//! Settings repository trait definition.
//!
//! This port stores the single serialized settings record. It deals in raw
//! records so that callers can tell "absent" from "present but corrupt".

use async_trait::async_trait;

use super::RepositoryError;

/// Repository for the persisted settings record.
///
/// # Design Rules
///
/// - No `sqlx` types in signatures
/// - Exactly one record; saving overwrites, nothing deletes
/// - Parsing is the caller's job (see `Settings::from_record`)
#[async_trait]
pub trait SettingsRepository: Send + Sync {
    /// Load the raw record, or `None` if nothing has been stored yet.
    async fn load_record(&self) -> Result<Option<String>, RepositoryError>;

    /// Overwrite the stored record.
    async fn save_record(&self, record: &str) -> Result<(), RepositoryError>;
}
