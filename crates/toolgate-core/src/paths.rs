//! Data directory resolution.
//!
//! Resolution order for the data root:
//! 1. `TOOLGATE_DATA_DIR` environment variable
//! 2. System data directory (e.g., `~/.local/share/toolgate`)

use std::path::PathBuf;
use thiserror::Error;

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "TOOLGATE_DATA_DIR";

/// File name of the settings database inside the data root.
pub const DATABASE_FILE: &str = "toolgate.db";

/// Errors that can occur while resolving paths.
#[derive(Debug, Error)]
pub enum PathError {
    #[error("Cannot determine a data directory for this system; set {DATA_DIR_ENV}")]
    NoDataDir,
}

/// Get the root directory for application data.
pub fn data_root() -> Result<PathBuf, PathError> {
    if let Some(dir) = std::env::var_os(DATA_DIR_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(dir));
    }

    dirs::data_dir()
        .map(|dir| dir.join("toolgate"))
        .ok_or(PathError::NoDataDir)
}

/// Get the path to the settings database.
///
/// An explicit directory (e.g. from a CLI flag) wins over [`data_root`].
pub fn database_path(explicit_dir: Option<&std::path::Path>) -> Result<PathBuf, PathError> {
    let root = match explicit_dir {
        Some(dir) => dir.to_path_buf(),
        None => data_root()?,
    };
    Ok(root.join(DATABASE_FILE))
}
