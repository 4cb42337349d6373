use std::path::PathBuf;

/// What happened to a file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum ChangeKind {
    Created,
    Modified,
    Removed,
}

impl ChangeKind {
    pub(super) fn label(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Modified => "modified",
            Self::Removed => "removed",
        }
    }
}

/// Which preview input a path belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum FileCategory {
    /// The previewed document
    Document,
    /// Anything under the plugin directory
    Plugin,
    /// A style catalog source
    Style,
    /// Stylesheet under a load path that the catalog does not list
    Partial,
    Other,
}

/// Debounced file events, after existence correction
pub(super) struct DebouncedEvents(pub(super) Vec<(PathBuf, ChangeKind)>);
