//! `SQLite` persistence for toolgate.
//!
//! Holds exactly one record: the serialized settings, stored under a fixed
//! key in the `settings_kv` table.
#![deny(unsafe_code)]

pub mod repositories;
pub mod setup;

pub use repositories::SqliteSettingsRepository;

pub use setup::setup_database;
#[cfg(any(test, feature = "test-utils"))]
pub use setup::setup_test_database;
