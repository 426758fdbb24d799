//! Repository implementations backed by `SQLite`.

mod sqlite_settings_repository;

pub use sqlite_settings_repository::{SETTINGS_KEY, SqliteSettingsRepository};
