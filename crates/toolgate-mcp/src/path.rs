//! Path checks and PATH construction for tool-server executables.

use std::collections::HashSet;
use std::env;
use std::ffi::OsString;
use std::path::Path;

#[cfg(unix)]
const PATH_SEPARATOR: &str = ":";
#[cfg(windows)]
const PATH_SEPARATOR: &str = ";";

/// Locations a GUI-launched process on macOS often lacks.
#[cfg(target_os = "macos")]
const MACOS_DEFAULT_PATHS: &str = "/opt/homebrew/bin:/usr/local/bin:/usr/bin:/bin:/usr/sbin:/sbin";

/// Check an explicit executable path.
///
/// Bare program names (`npx`) are left to the OS PATH lookup and always pass.
pub fn validate_exe_path(exe_path: &str) -> Result<(), String> {
    let path = Path::new(exe_path);
    if !path.is_absolute() {
        return Ok(());
    }

    if !path.exists() {
        return Err(format!("Executable not found: {exe_path}"));
    }

    if !path.is_file() {
        return Err(format!("Executable path is not a file: {exe_path}"));
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let metadata =
            std::fs::metadata(path).map_err(|e| format!("Failed to check permissions: {e}"))?;
        if metadata.permissions().mode() & 0o111 == 0 {
            return Err(format!("File is not executable: {exe_path}"));
        }
    }

    Ok(())
}

pub fn validate_working_dir(cwd: &str) -> Result<(), String> {
    let path = Path::new(cwd);
    if !path.is_dir() {
        return Err(format!("Working directory does not exist: {cwd}"));
    }
    Ok(())
}

/// PATH for the child: the executable's directory, then the ambient PATH
/// (plus Homebrew locations on macOS), deduplicated in order.
pub fn build_effective_path(exe_path: &str) -> OsString {
    let mut entries = Vec::new();

    if let Some(dir) = Path::new(exe_path).parent().and_then(Path::to_str) {
        entries.push(dir.to_string());
    }

    if let Some(current) = env::var_os("PATH") {
        if let Some(current) = current.to_str() {
            entries.extend(current.split(PATH_SEPARATOR).map(str::to_string));
        }
    }

    #[cfg(target_os = "macos")]
    entries.extend(MACOS_DEFAULT_PATHS.split(':').map(str::to_string));

    let mut seen = HashSet::new();
    let deduped: Vec<String> = entries
        .into_iter()
        .filter(|entry| !entry.is_empty() && seen.insert(entry.clone()))
        .collect();

    OsString::from(deduped.join(PATH_SEPARATOR))
}
