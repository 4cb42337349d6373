//! `[styles]` section configuration.
//!
//! Three ordered catalogs feed the component stylesheet bundle.
//!
//! # Example
//!
//! ```toml
//! [styles]
//! command = ["sass"]                          # Compiler invocation
//! minify = false                              # Minify the bundle
//! variables = { "$primary-color" = "#59d5ef" } # Fallback variable overrides
//!
//! [[styles.global]]
//! name = "reset"
//! path = "styles/base/reset.scss"
//!
//! [[styles.wrappers]]
//! name = "XButton"
//! path = "styles/wrappers/XButton.scss"
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::util::resolve_in;
use crate::style::{Category, StyleSource};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleEntry {
    pub name: String,
    pub path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StylesConfig {
    pub command: Vec<String>,
    pub minify: bool,
    pub variables: BTreeMap<String, String>,
    pub global: Vec<StyleEntry>,
    pub atoms: Vec<StyleEntry>,
    pub wrappers: Vec<StyleEntry>,
}

impl Default for StylesConfig {
    fn default() -> Self {
        Self {
            command: vec!["sass".to_string()],
            minify: false,
            variables: BTreeMap::new(),
            global: Vec::new(),
            atoms: Vec::new(),
            wrappers: Vec::new(),
        }
    }
}

impl StylesConfig {
    pub(crate) fn normalize(&mut self, root: &Path) {
        for entry in self
            .global
            .iter_mut()
            .chain(&mut self.atoms)
            .chain(&mut self.wrappers)
        {
            entry.path = resolve_in(root, &entry.path);
        }
    }

    /// Catalog in load order: global, atoms, wrappers.
    pub fn sources(&self) -> Vec<StyleSource> {
        let tagged = [
            (&self.global, Category::Global),
            (&self.atoms, Category::Atoms),
            (&self.wrappers, Category::Wrapper),
        ];
        tagged
            .into_iter()
            .flat_map(|(entries, category)| {
                entries
                    .iter()
                    .map(move |e| StyleSource::new(&e.name, &e.path, category))
            })
            .collect()
    }

    pub fn entry_count(&self) -> usize {
        self.global.len() + self.atoms.len() + self.wrappers.len()
    }
}
