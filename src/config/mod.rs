//! Preview configuration management for `rodix.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Configuration section definitions
//! │   ├── paths      # [paths]
//! │   ├── styles     # [styles] and its catalogs
//! │   ├── serve      # [serve]
//! │   └── watch      # [watch]
//! ├── types/         # Utility types
//! │   └── error      # ConfigError, ConfigDiagnostics
//! └── mod.rs         # PreviewConfig (this file)
//! ```
//!
//! # Sections
//!
//! | Section              | Purpose                                        |
//! |----------------------|------------------------------------------------|
//! | `[paths]`            | Previewed document, plugin dir, sass paths     |
//! | `[styles]`           | Compiler command, minify, fallback variables   |
//! | `[[styles.global]]`  | Global style catalog (also `atoms`, `wrappers`)|
//! | `[serve]`            | Preview server (interface, port, watch)        |
//! | `[watch]`            | Debounce window                                |

pub mod section;
pub mod types;
mod util;

use util::find_config_file;

pub use section::{
    DEFAULT_WS_PORT, PathsConfig, ServeConfig, StyleEntry, StylesConfig, WatchConfig,
};
pub use types::{ConfigDiagnostic, ConfigDiagnostics, ConfigError};

use crate::cli::{Cli, Commands};
use crate::plugin::PluginLoader;
use crate::style::{SassCli, StyleResolver};
use crate::utils::path::normalize_path;
use crate::{debug, log};
use anyhow::{Context, Result, bail};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Config file name looked up when `--config` is not given.
pub const DEFAULT_CONFIG_NAME: &str = "rodix.toml";

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing rodix.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PreviewConfig {
    /// Absolute path to the config file (internal use only)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Project root directory - parent of config file (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    #[serde(default)]
    pub paths: PathsConfig,

    #[serde(default)]
    pub styles: StylesConfig,

    #[serde(default)]
    pub serve: ServeConfig,

    #[serde(default)]
    pub watch: WatchConfig,
}

impl PreviewConfig {
    /// Load configuration for a CLI invocation.
    ///
    /// Searches upward from cwd for the config file. Without one, defaults
    /// apply with the cwd as root; an explicitly named config that does not
    /// exist is an error.
    pub fn load(cli: &Cli) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current working directory")?;

        let mut config = match find_config_file(&cli.config) {
            Some(path) => {
                let mut config = Self::from_path(&path)?;
                config.config_path = normalize_path(&path);
                config
            }
            None if cli.config != Path::new(DEFAULT_CONFIG_NAME) => {
                bail!(ConfigError::Io(
                    cli.config.clone(),
                    std::io::Error::from(std::io::ErrorKind::NotFound)
                ));
            }
            None => {
                debug!("config"; "no {} found, using defaults", DEFAULT_CONFIG_NAME);
                Self {
                    config_path: cwd.join(DEFAULT_CONFIG_NAME),
                    ..Self::default()
                }
            }
        };

        let root = config
            .config_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or(cwd);
        config.finalize(&root);
        config.apply_command_options(&cli.command);
        config.validate()?;

        Ok(config)
    }

    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warn"; "unknown fields in {}, ignoring:", display_path);
        for field in fields {
            eprintln!("- {}", field);
        }
    }

    /// Resolve every configured path against `root`.
    pub fn finalize(&mut self, root: &Path) {
        self.root = normalize_path(root);
        let root = self.root.clone();
        self.paths.normalize(&root);
        self.styles.normalize(&root);
    }

    /// Get the root directory path
    pub fn get_root(&self) -> &Path {
        &self.root
    }

    // ========================================================================
    // cli configuration updates
    // ========================================================================

    fn apply_command_options(&mut self, command: &Commands) {
        if let Commands::Serve {
            interface,
            port,
            watch,
        } = command
        {
            Self::update_option(&mut self.serve.interface, interface.as_ref());
            Self::update_option(&mut self.serve.port, port.as_ref());
            Self::update_option(&mut self.serve.watch, watch.as_ref());
        }
    }

    /// Update config option if CLI value is provided.
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    // ========================================================================
    // collaborators
    // ========================================================================

    /// Style resolver over the configured catalogs.
    pub fn style_resolver(&self) -> StyleResolver {
        let mut load_paths = Vec::new();
        load_paths.extend(self.paths.styles_dir.iter().cloned());
        load_paths.extend(self.paths.load_paths.iter().cloned());
        let compiler = SassCli::new(self.styles.command.clone()).with_load_paths(load_paths);
        StyleResolver::new(self.styles.sources(), Box::new(compiler))
            .with_variables(&self.styles.variables)
            .with_minify(self.styles.minify)
    }

    /// Loader for the plugin directory, when one is configured.
    pub fn plugin_loader(&self) -> Option<PluginLoader> {
        self.paths.plugin.as_ref().map(PluginLoader::new)
    }

    // ========================================================================
    // validation
    // ========================================================================

    /// Structural checks that make the configuration unusable.
    pub fn validate(&self) -> Result<()> {
        let mut diag = ConfigDiagnostics::new();

        if self.styles.command.first().is_none_or(|c| c.trim().is_empty()) {
            diag.error_with_hint(
                "styles.command",
                "compiler command is empty",
                "use command = [\"sass\"] or the path to a sass binary",
            );
        }

        let catalogs = [
            ("styles.global", &self.styles.global),
            ("styles.atoms", &self.styles.atoms),
            ("styles.wrappers", &self.styles.wrappers),
        ];
        for (field, entries) in catalogs {
            let mut seen = FxHashSet::default();
            for entry in entries {
                if entry.name.trim().is_empty() {
                    diag.error(field, format!("entry for {} has no name", entry.path.display()));
                } else if !seen.insert(entry.name.as_str()) {
                    diag.error(field, format!("duplicate entry name `{}`", entry.name));
                }
            }
        }

        diag.into_result()
            .map_err(|e| ConfigError::Diagnostics(e).into())
    }

    /// Existence checks for the `check` command.
    ///
    /// A missing document or plugin directory is an error; missing style
    /// sources and load paths only degrade the preview and are warnings.
    pub fn check(&self) -> ConfigDiagnostics {
        let mut diag = ConfigDiagnostics::new();

        if !self.paths.document.is_file() {
            diag.error_with_hint(
                "paths.document",
                format!("document not found: {}", self.paths.document.display()),
                "set [paths] document to the previewed HTML file",
            );
        }
        if let Some(plugin) = &self.paths.plugin
            && !plugin.is_dir()
        {
            diag.error("paths.plugin", format!("directory not found: {}", plugin.display()));
        }
        for dir in self.paths.styles_dir.iter().chain(&self.paths.load_paths) {
            if !dir.is_dir() {
                diag.warn("paths", format!("load path not found: {}", dir.display()));
            }
        }

        let catalogs = [
            ("styles.global", &self.styles.global),
            ("styles.atoms", &self.styles.atoms),
            ("styles.wrappers", &self.styles.wrappers),
        ];
        for (field, entries) in catalogs {
            for entry in entries.iter().filter(|e| !e.path.is_file()) {
                diag.warn(
                    field,
                    format!("{}: source not found: {}", entry.name, entry.path.display()),
                );
            }
        }

        diag
    }
}

// ============================================================================
// Test Helpers (available to all modules via `use crate::config::test_*`)
// ============================================================================

/// Parse config, panicking on unknown fields (catches typos in tests).
#[cfg(test)]
pub fn test_parse_config(content: &str) -> PreviewConfig {
    let (parsed, ignored) = PreviewConfig::parse_with_ignored(content).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

// ============================================================================
// tests
// ============================================================================
