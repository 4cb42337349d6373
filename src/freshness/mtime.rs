//! Mtime-based freshness checks.

use std::path::Path;
use std::time::SystemTime;

/// Get the modification time of a file
///
/// Returns `None` if the file doesn't exist or mtime cannot be read
pub fn get_mtime(path: &Path) -> Option<SystemTime> {
    path.metadata().and_then(|m| m.modified()).ok()
}

/// Whether `path` changed since `recorded`.
///
/// Never recorded counts as changed; a missing file does not.
pub fn has_advanced(path: &Path, recorded: Option<SystemTime>) -> bool {
    match (get_mtime(path), recorded) {
        (None, _) => false,
        (Some(_), None) => true,
        (Some(current), Some(recorded)) => current > recorded,
    }
}
