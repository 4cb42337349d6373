//! Plugin behavior extraction.
//!
//! A plugin directory holds a behavior-description file (`*Contribution.js`)
//! whose class binds component ids to handler methods through
//! `this.uiHandler.on(..)`. [`PluginLoader`] extracts those bindings and
//! methods, first from the oxc syntax tree and, when the source does not
//! parse, lexically. [`synthesize`] turns the result into a browser script
//! driving the previewed page.

mod extract;
mod lexical;
mod rewrite;
mod synth;

pub use rewrite::rewrite_body;
pub use synth::synthesize;

use crate::log;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PluginError {
    #[error("cannot read `{}`", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid manifest `{}`", path.display())]
    Manifest {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

// ============================================================================
// Extraction model
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HandlerKind {
    /// `handle*` / `on*`
    Event,
    /// `_*`
    Init,
    Helper,
}

impl HandlerKind {
    pub fn classify(name: &str) -> Self {
        let event = ["handle", "on"]
            .iter()
            .any(|prefix| name.len() > prefix.len() && name.starts_with(prefix));
        if event {
            Self::Event
        } else if name.starts_with('_') {
            Self::Init
        } else {
            Self::Helper
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum EventKind {
    UiHandlerOn,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginBinding {
    pub component_id: String,
    pub handler_name: String,
    pub event_kind: EventKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerDescriptor {
    pub name: String,
    /// Parameter list without parentheses.
    pub params: String,
    /// Function body including its braces, exactly as written.
    pub body: String,
    /// Byte offset of the method name in the source.
    pub offset: usize,
    pub kind: HandlerKind,
    pub is_async: bool,
    pub is_generator: bool,
}

impl HandlerDescriptor {
    /// Keywords written before the method name when it is emitted again.
    pub fn modifiers(&self) -> &'static str {
        match (self.is_async, self.is_generator) {
            (true, true) => "async *",
            (true, false) => "async ",
            (false, true) => "*",
            (false, false) => "",
        }
    }
}

/// Add `handler`, replacing an earlier method of the same name. A class
/// keeps only its last definition of a name.
pub(super) fn push_method(handlers: &mut Vec<HandlerDescriptor>, handler: HandlerDescriptor) {
    match handlers.iter_mut().find(|h| h.name == handler.name) {
        Some(existing) => *existing = handler,
        None => handlers.push(handler),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    Ast,
    Lexical,
}

/// Methods in declaration order and bindings in call order.
#[derive(Debug, Clone)]
pub struct Extraction {
    pub bindings: Vec<PluginBinding>,
    pub handlers: Vec<HandlerDescriptor>,
    pub strategy: Strategy,
}

impl Extraction {
    pub fn handler(&self, name: &str) -> Option<&HandlerDescriptor> {
        self.handlers.iter().find(|h| h.name == name)
    }
}

/// Bindings resolved to indices into [`Extraction::handlers`].
#[derive(Debug, Clone, Default)]
pub struct BindingTable {
    entries: Vec<(PluginBinding, Option<usize>)>,
}

impl BindingTable {
    pub fn resolve(extraction: &Extraction) -> Self {
        let entries = extraction
            .bindings
            .iter()
            .map(|binding| {
                let index = extraction
                    .handlers
                    .iter()
                    .position(|h| h.name == binding.handler_name);
                (binding.clone(), index)
            })
            .collect();
        Self { entries }
    }

    pub fn resolved(&self) -> impl Iterator<Item = (&PluginBinding, usize)> {
        self.entries
            .iter()
            .filter_map(|(binding, index)| Some((binding, (*index)?)))
    }

    pub fn unresolved(&self) -> impl Iterator<Item = &PluginBinding> {
        self.entries
            .iter()
            .filter(|(_, index)| index.is_none())
            .map(|(binding, _)| binding)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// `package.json` fields shown in the plugin summary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginInfo {
    pub name: Option<String>,
    pub version: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone)]
pub struct PluginSource {
    pub contribution_file: PathBuf,
    pub service_file: Option<PathBuf>,
    pub raw: String,
    pub extraction: Extraction,
    pub bindings: BindingTable,
}

impl PluginSource {
    pub fn file_name(&self) -> String {
        self.contribution_file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    pub fn summary(&self) -> PluginSummary {
        let names = |kind| {
            self.extraction
                .handlers
                .iter()
                .filter(|h| h.kind == kind)
                .map(|h| h.name.clone())
                .collect()
        };
        PluginSummary {
            contribution_file: self.contribution_file.display().to_string(),
            service_file: self.service_file.as_ref().map(|p| p.display().to_string()),
            strategy: self.extraction.strategy,
            bindings: self.extraction.bindings.clone(),
            handlers: names(HandlerKind::Event),
            init_functions: names(HandlerKind::Init),
            unresolved: self
                .bindings
                .unresolved()
                .map(|b| b.component_id.clone())
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginSummary {
    pub contribution_file: String,
    pub service_file: Option<String>,
    pub strategy: Strategy,
    pub bindings: Vec<PluginBinding>,
    pub handlers: Vec<String>,
    pub init_functions: Vec<String>,
    /// Component ids whose handler method was not found.
    pub unresolved: Vec<String>,
}

// ============================================================================
// Loader
// ============================================================================

pub struct PluginLoader {
    dir: PathBuf,
}

impl PluginLoader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Locate and extract the behavior file. `Ok(None)` when the directory
    /// has none.
    pub fn load(&self) -> Result<Option<PluginSource>, PluginError> {
        let files = self.list_files()?;
        let find = |markers: [&str; 2]| {
            files
                .iter()
                .find(|(name, _)| markers.iter().any(|m| name.contains(m)))
                .map(|(_, path)| path.clone())
        };

        let Some(contribution_file) = find(["Contribution.js", "contribution.js"]) else {
            log!("warn"; "no behavior file in {}", self.dir.display());
            return Ok(None);
        };
        let service_file = find(["Service.js", "service.js"]);

        let raw = fs::read_to_string(&contribution_file).map_err(|source| PluginError::Io {
            path: contribution_file.clone(),
            source,
        })?;

        let extraction = Self::extract(&raw);
        let bindings = BindingTable::resolve(&extraction);
        for binding in bindings.unresolved() {
            log!(
                "warn";
                "`{}` is bound to missing method `{}`",
                binding.component_id, binding.handler_name
            );
        }

        let source = PluginSource {
            contribution_file,
            service_file,
            raw,
            extraction,
            bindings,
        };
        log!(
            "plugin";
            "{}: {} bindings, {} methods ({:?})",
            source.file_name(),
            source.bindings.len(),
            source.extraction.handlers.len(),
            source.extraction.strategy
        );
        Ok(Some(source))
    }

    /// `package.json` next to the behavior file, when present.
    pub fn plugin_info(&self) -> Result<Option<PluginInfo>, PluginError> {
        let path = self.dir.join("package.json");
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(PluginError::Io { path, source }),
        };
        serde_json::from_str(&text)
            .map(Some)
            .map_err(|source| PluginError::Manifest { path, source })
    }

    /// Syntax-tree extraction, falling back to the lexical scan.
    pub fn extract(source: &str) -> Extraction {
        extract::extract(source).unwrap_or_else(|| {
            crate::debug!("plugin"; "source does not parse, scanning lexically");
            lexical::extract(source)
        })
    }

    /// File names and paths in the plugin directory, sorted by name.
    fn list_files(&self) -> Result<Vec<(String, PathBuf)>, PluginError> {
        let io_err = |source| PluginError::Io {
            path: self.dir.clone(),
            source,
        };
        let mut files = Vec::new();
        for entry in fs::read_dir(&self.dir).map_err(io_err)? {
            let entry = entry.map_err(io_err)?;
            if entry.file_type().map_err(io_err)?.is_file() {
                files.push((entry.file_name().to_string_lossy().into_owned(), entry.path()));
            }
        }
        files.sort();
        Ok(files)
    }
}
