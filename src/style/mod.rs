//! Component stylesheet resolution.
//!
//! Three ordered catalogs (global resets, atom components, wrapper
//! components) are compiled, fixed up and concatenated into the bundle that
//! is inlined into the preview page.
//!
//! ```text
//! catalog entry ──compile──▶ css ──fixup (wrappers)──▶ cache ──▶ bundle
//!                   │ fails
//!                   └──▶ textual fallback
//! ```
//!
//! Compiled text is cached per entry and refreshed only when the source
//! file's mtime advances. A failing entry never aborts the load.

mod compile;
pub mod fallback;
mod fixup;
mod minify;

pub use compile::{SassCli, StyleCompiler};
pub use minify::minify_css;

use crate::freshness::{get_mtime, has_advanced};
use crate::{debug, log};
use rustc_hash::FxHashMap;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StyleError {
    #[error("style source not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("cannot read {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot compile {}: {message}", .path.display())]
    Compile { path: PathBuf, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Global,
    Atoms,
    Wrapper,
}

/// A named style source as configured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleSource {
    pub name: String,
    pub path: PathBuf,
    pub category: Category,
}

impl StyleSource {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>, category: Category) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            category,
        }
    }
}

#[derive(Debug, Clone)]
pub struct StyleCatalogEntry {
    pub name: String,
    pub source_path: PathBuf,
    pub category: Category,
    pub last_compiled_at: Option<SystemTime>,
    pub compiled_text: Option<String>,
    pub used_fallback: bool,
}

impl StyleCatalogEntry {
    fn new(source: StyleSource) -> Self {
        Self {
            name: source.name,
            source_path: source.path,
            category: source.category,
            last_compiled_at: None,
            compiled_text: None,
            used_fallback: false,
        }
    }

    fn file_name(&self) -> String {
        self.source_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StyleCounts {
    pub global: usize,
    pub atoms: usize,
    pub wrapper: usize,
}

impl StyleCounts {
    pub fn total(&self) -> usize {
        self.global + self.atoms + self.wrapper
    }

    fn bump(&mut self, category: Category) {
        match category {
            Category::Global => self.global += 1,
            Category::Atoms => self.atoms += 1,
            Category::Wrapper => self.wrapper += 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StyleLoadError {
    pub name: String,
    pub message: String,
}

/// Result of [`StyleResolver::load_all`].
#[derive(Debug, Clone, Default, Serialize)]
pub struct StyleBundle {
    pub text: String,
    pub counts: StyleCounts,
    pub errors: Vec<StyleLoadError>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleStats {
    pub total_global: usize,
    pub total_atoms: usize,
    pub total_wrapper: usize,
    pub total_components: usize,
    pub loaded_components: usize,
    pub components: Vec<String>,
    pub fallbacks: Vec<String>,
}

pub struct StyleResolver {
    entries: Vec<StyleCatalogEntry>,
    compiler: Box<dyn StyleCompiler>,
    variables: FxHashMap<String, String>,
    minify: bool,
}

impl StyleResolver {
    /// Entries keep the order given; callers pass global, atoms, wrappers.
    pub fn new(sources: Vec<StyleSource>, compiler: Box<dyn StyleCompiler>) -> Self {
        Self {
            entries: sources.into_iter().map(StyleCatalogEntry::new).collect(),
            compiler,
            variables: fallback::variable_table(std::iter::empty()),
            minify: false,
        }
    }

    /// Fallback variable overrides on top of the built-in table.
    pub fn with_variables<'a>(
        mut self,
        overrides: impl IntoIterator<Item = (&'a String, &'a String)>,
    ) -> Self {
        self.variables = fallback::variable_table(overrides);
        self
    }

    pub fn with_minify(mut self, minify: bool) -> Self {
        self.minify = minify;
        self
    }

    pub fn entries(&self) -> &[StyleCatalogEntry] {
        &self.entries
    }

    /// Compile (or reuse) every entry and concatenate the results.
    pub fn load_all(&mut self) -> StyleBundle {
        let mut parts = Vec::with_capacity(self.entries.len());
        let mut counts = StyleCounts::default();
        let mut errors = Vec::new();

        for index in 0..self.entries.len() {
            match self.refresh(index) {
                Ok(_) => {
                    let entry = &self.entries[index];
                    let css = entry.compiled_text.as_deref().unwrap_or_default();
                    parts.push(format!("/* {} - {} */\n{css}", entry.name, entry.file_name()));
                    counts.bump(entry.category);
                    debug!("styles"; "loaded {}", entry.name);
                }
                Err(err) => {
                    let name = self.entries[index].name.clone();
                    log!("styles"; "{name}: {err}");
                    errors.push(StyleLoadError {
                        name,
                        message: err.to_string(),
                    });
                }
            }
        }

        let mut text = parts.join("\n\n");
        if self.minify {
            match minify_css(&text) {
                Some(min) => text = min,
                None => debug!("styles"; "bundle not minified: css did not parse"),
            }
        }

        if !errors.is_empty() {
            log!("styles"; "{} of {} entries failed to load", errors.len(), self.entries.len());
        }

        StyleBundle {
            text,
            counts,
            errors,
        }
    }

    /// Recompile entries whose source changed; returns their names.
    pub fn reload_changed(&mut self) -> Vec<String> {
        let mut reloaded = Vec::new();
        for index in 0..self.entries.len() {
            let entry = &self.entries[index];
            if !has_advanced(&entry.source_path, entry.last_compiled_at) {
                continue;
            }
            match self.refresh(index) {
                Ok(_) => reloaded.push(self.entries[index].name.clone()),
                Err(err) => log!("styles"; "reload {}: {err}", self.entries[index].name),
            }
        }
        reloaded
    }

    /// Mark every entry stale, e.g. after a shared partial changed.
    pub fn invalidate(&mut self) {
        for entry in &mut self.entries {
            entry.last_compiled_at = None;
        }
    }

    pub fn stats(&self) -> StyleStats {
        let count = |c: Category| self.entries.iter().filter(|e| e.category == c).count();
        let loaded = self.entries.iter().filter(|e| e.compiled_text.is_some());
        StyleStats {
            total_global: count(Category::Global),
            total_atoms: count(Category::Atoms),
            total_wrapper: count(Category::Wrapper),
            total_components: self.entries.len(),
            loaded_components: loaded.clone().count(),
            components: loaded.map(|e| e.name.clone()).collect(),
            fallbacks: self
                .entries
                .iter()
                .filter(|e| e.used_fallback)
                .map(|e| e.name.clone())
                .collect(),
        }
    }

    /// Whether `path` is one of the catalog sources.
    pub fn owns(&self, path: &Path) -> bool {
        self.entries.iter().any(|e| same_file(&e.source_path, path))
    }

    /// Compile entry `index` if it is stale. Returns whether it was rebuilt.
    fn refresh(&mut self, index: usize) -> Result<bool, StyleError> {
        let entry = &self.entries[index];
        let path = entry.source_path.clone();
        let Some(mtime) = get_mtime(&path) else {
            return Err(StyleError::NotFound(path));
        };
        if entry.compiled_text.is_some() && !has_advanced(&path, entry.last_compiled_at) {
            return Ok(false);
        }

        let (css, used_fallback) = match self.compiler.compile(&path) {
            Ok(css) => (css, false),
            Err(err) => {
                log!("styles"; "{}: {err}, using fallback conversion", entry.name);
                let source = fs::read_to_string(&path).map_err(|source| StyleError::Read {
                    path: path.clone(),
                    source,
                })?;
                (fallback::convert(&source, &self.variables), true)
            }
        };

        let css = match entry.category {
            Category::Wrapper => fixup::apply(&entry.name, &css),
            _ => css,
        };

        let entry = &mut self.entries[index];
        entry.compiled_text = Some(css);
        entry.last_compiled_at = Some(mtime);
        entry.used_fallback = used_fallback;
        Ok(true)
    }
}

fn same_file(a: &Path, b: &Path) -> bool {
    if a == b {
        return true;
    }
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
