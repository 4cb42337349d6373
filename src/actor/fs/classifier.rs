use std::path::{Path, PathBuf};

use rustc_hash::FxHashMap;

use super::types::{ChangeKind, DebouncedEvents, FileCategory};
use crate::config::PreviewConfig;

/// Extensions the sass compiler resolves through load paths.
const STYLE_EXTENSIONS: &[&str] = &["scss", "sass", "css"];

/// Classifies raw debounced events into final DebouncedEvents.
///
/// Pipeline: correct_by_existence → filter_actionable
pub(super) struct EventClassifier;

impl EventClassifier {
    pub(super) fn classify(
        raw: FxHashMap<PathBuf, ChangeKind>,
        config: &PreviewConfig,
    ) -> Option<DebouncedEvents> {
        let mut changes = raw;

        Self::correct_by_existence(&mut changes);
        Self::filter_actionable(&mut changes, config);

        if changes.is_empty() {
            return None;
        }
        Some(DebouncedEvents(changes.into_iter().collect()))
    }

    /// Reconcile event kinds with actual filesystem state.
    ///
    /// Atomic saves report Removed for a file that exists again by the time
    /// the batch is handled.
    pub(super) fn correct_by_existence(changes: &mut FxHashMap<PathBuf, ChangeKind>) {
        let paths: Vec<_> = changes.keys().cloned().collect();
        for path in paths {
            let kind = changes[&path];
            let exists = path.exists();
            match kind {
                ChangeKind::Created if !exists => {
                    crate::debug!("watch"; "discard created (gone): {}", path.display());
                    changes.remove(&path);
                }
                ChangeKind::Modified if !exists => {
                    crate::debug!("watch"; "upgrade modified->removed: {}", path.display());
                    changes.insert(path, ChangeKind::Removed);
                }
                ChangeKind::Removed if exists => {
                    crate::debug!("watch"; "downgrade removed->modified: {}", path.display());
                    changes.insert(path, ChangeKind::Modified);
                }
                _ => {}
            }
        }
    }

    /// Keep events for preview inputs only; created and modified paths must
    /// be files.
    pub(super) fn filter_actionable(
        changes: &mut FxHashMap<PathBuf, ChangeKind>,
        config: &PreviewConfig,
    ) {
        changes.retain(|path, kind| {
            if categorize_path(path, config) == FileCategory::Other {
                return false;
            }
            match kind {
                ChangeKind::Created | ChangeKind::Modified => path.is_file(),
                ChangeKind::Removed => true,
            }
        });
    }
}

/// Map a path onto the preview input it feeds.
pub(super) fn categorize_path(path: &Path, config: &PreviewConfig) -> FileCategory {
    let paths = &config.paths;
    if path == paths.document {
        return FileCategory::Document;
    }
    if paths.plugin.as_ref().is_some_and(|dir| path.starts_with(dir)) {
        return FileCategory::Plugin;
    }

    let styles = &config.styles;
    let cataloged = styles
        .global
        .iter()
        .chain(&styles.atoms)
        .chain(&styles.wrappers)
        .any(|entry| entry.path == path);
    if cataloged {
        return FileCategory::Style;
    }

    let is_style = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| STYLE_EXTENSIONS.contains(&ext));
    let on_load_path = paths
        .styles_dir
        .iter()
        .chain(&paths.load_paths)
        .any(|dir| path.starts_with(dir));
    if is_style && on_load_path {
        return FileCategory::Partial;
    }

    FileCategory::Other
}
