//! Host-supplied directory configuration.
//!
//! The host app owns platform path discovery (documents dir, caches dir) and
//! passes plain strings in. Core only normalizes and checks them.

use std::path::{Path, PathBuf};

/// Normalizes a host-supplied directory string.
///
/// `label` names the argument in error messages (`log_dir`, `data_dir`).
///
/// # Errors
/// - Returns an error when the trimmed value is empty.
/// - Returns an error when the path is not absolute.
pub fn resolve_dir(raw: &str, label: &str) -> Result<PathBuf, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(format!("{label} cannot be empty"));
    }
    let path = Path::new(trimmed);
    if !path.is_absolute() {
        return Err(format!("{label} must be an absolute path, got `{trimmed}`"));
    }
    Ok(path.to_path_buf())
}
