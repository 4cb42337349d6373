//! `[paths]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [paths]
//! document = "htmlStore/Widget.html"   # Previewed document
//! plugin = "plugin"                    # Behavior source directory (optional)
//! styles_dir = "styles"                # Sass load path (optional)
//! load_paths = ["node_modules"]        # Extra sass load paths
//! ```
//!
//! Relative paths resolve against the directory holding `rodix.toml`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::util::resolve_in;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub document: PathBuf,
    pub plugin: Option<PathBuf>,
    pub styles_dir: Option<PathBuf>,
    pub load_paths: Vec<PathBuf>,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            document: PathBuf::from("htmlStore/Widget.html"),
            plugin: None,
            styles_dir: None,
            load_paths: Vec::new(),
        }
    }
}

impl PathsConfig {
    pub(crate) fn normalize(&mut self, root: &Path) {
        self.document = resolve_in(root, &self.document);
        self.plugin = self.plugin.take().map(|p| resolve_in(root, &p));
        self.styles_dir = self.styles_dir.take().map(|p| resolve_in(root, &p));
        self.load_paths = self.load_paths.iter().map(|p| resolve_in(root, p)).collect();
    }

    /// Document file name for titles and messages.
    pub fn document_name(&self) -> String {
        self.document
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.document.display().to_string())
    }
}
