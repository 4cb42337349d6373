use std::path::{Path, PathBuf};

use notify::RecursiveMode;

use crate::config::PreviewConfig;

/// Roots to watch: the document's directory (flat), the plugin directory
/// and sass load paths (recursive), and the directories of catalog entries
/// outside those.
pub(super) fn collect_watch_roots(config: &PreviewConfig) -> Vec<(PathBuf, RecursiveMode)> {
    let mut recursive: Vec<PathBuf> = Vec::new();
    recursive.extend(config.paths.plugin.iter().cloned());
    recursive.extend(config.paths.styles_dir.iter().cloned());
    recursive.extend(config.paths.load_paths.iter().cloned());

    let mut flat: Vec<PathBuf> = Vec::new();
    flat.extend(config.paths.document.parent().map(Path::to_path_buf));
    for entry in config
        .styles
        .global
        .iter()
        .chain(&config.styles.atoms)
        .chain(&config.styles.wrappers)
    {
        flat.extend(entry.path.parent().map(Path::to_path_buf));
    }

    dedupe_nested(recursive, flat)
}

/// Drop roots already covered by a recursive root.
fn dedupe_nested(recursive: Vec<PathBuf>, flat: Vec<PathBuf>) -> Vec<(PathBuf, RecursiveMode)> {
    let mut roots: Vec<(PathBuf, RecursiveMode)> = Vec::new();
    let covered = |roots: &[(PathBuf, RecursiveMode)], path: &Path| {
        roots.iter().any(|(root, mode)| {
            root == path || (*mode == RecursiveMode::Recursive && path.starts_with(root))
        })
    };

    let mut recursive = recursive;
    // Shorter paths first, so ancestors claim their descendants
    recursive.sort_by_key(|p| p.components().count());
    for path in recursive {
        if !covered(&roots, &path) {
            roots.push((path, RecursiveMode::Recursive));
        }
    }
    for path in flat {
        if !covered(&roots, &path) {
            roots.push((path, RecursiveMode::NonRecursive));
        }
    }
    roots
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_nested_roots_collapse() {
        let mut config = test_parse_config(
            r#"
[paths]
document = "htmlStore/Widget.html"
plugin = "plugin"
styles_dir = "styles"
load_paths = ["styles/vendor"]

[[styles.atoms]]
name = "Button"
path = "styles/atoms/Button.scss"

[[styles.wrappers]]
name = "XButton"
path = "wrappers/XButton.scss"
"#,
        );
        config.finalize(Path::new("/project"));

        let roots = collect_watch_roots(&config);
        let expected = [
            ("/project/plugin", RecursiveMode::Recursive),
            ("/project/styles", RecursiveMode::Recursive),
            ("/project/htmlStore", RecursiveMode::NonRecursive),
            ("/project/wrappers", RecursiveMode::NonRecursive),
        ];
        assert_eq!(roots.len(), expected.len());
        for (path, mode) in expected {
            assert!(roots.contains(&(PathBuf::from(path), mode)), "{path}");
        }
    }
}
