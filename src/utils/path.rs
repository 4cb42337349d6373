//! Path normalization utilities.

use std::path::{Path, PathBuf};

/// Normalize a file system path to absolute form.
///
/// Tries `canonicalize()` first (resolves symlinks, `.`, `..`).
/// Falls back to:
/// - Return as-is if already absolute
/// - Join with current directory if relative
///
/// Paths that no longer exist keep their spelling, so a removed file still
/// compares equal to the normalized path recorded before removal when its
/// parent directory is unchanged.
#[inline]
pub fn normalize_path(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| {
        if let (Some(parent), Some(name)) = (path.parent(), path.file_name())
            && let Ok(parent) = parent.canonicalize()
        {
            return parent.join(name);
        }
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir().map_or_else(|_| path.to_path_buf(), |cwd| cwd.join(path))
        }
    })
}

/// `path` relative to `base` for display, or `path` itself.
pub fn display_relative(path: &Path, base: &Path) -> String {
    path.strip_prefix(base)
        .unwrap_or(path)
        .display()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_normalize_path_relative() {
        let normalized = normalize_path(Path::new("relative/path/file.txt"));
        assert!(normalized.is_absolute());
    }

    #[test]
    fn test_normalize_removed_file_matches() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("Widget.html");
        std::fs::write(&file, "").unwrap();
        let before = normalize_path(&file);
        std::fs::remove_file(&file).unwrap();
        assert_eq!(normalize_path(&file), before);
    }

    #[test]
    fn test_display_relative() {
        assert_eq!(
            display_relative(Path::new("/p/styles/a.scss"), Path::new("/p")),
            "styles/a.scss"
        );
        assert_eq!(display_relative(Path::new("/x/a"), Path::new("/p")), "/x/a");
    }
}
