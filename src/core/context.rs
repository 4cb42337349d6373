//! Preview state shared by the request loop and the watcher.
//!
//! One [`PreviewContext`] per process holds the converter statistics, the
//! style cache and the extracted plugin. The HTTP loop and the fs actor share
//! it as a [`SharedContext`]; every reload runs with the lock held, so a
//! request never sees half-refreshed state.

use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use crate::config::PreviewConfig;
use crate::convert::Converter;
use crate::plugin::{PluginLoader, PluginSource, synthesize};
use crate::style::{StyleBundle, StyleResolver, StyleStats};
use crate::{debug, log};

pub type SharedContext = Arc<Mutex<PreviewContext>>;

/// Extracted plugin with its browser script.
#[derive(Debug, Clone)]
pub struct LoadedPlugin {
    pub source: PluginSource,
    pub script: String,
}

pub struct PreviewContext {
    pub config: Arc<PreviewConfig>,
    pub converter: Converter,
    styles: StyleResolver,
    bundle: StyleBundle,
    loader: Option<PluginLoader>,
    plugin: Option<LoadedPlugin>,
    started: Instant,
}

impl PreviewContext {
    /// Build the context and run the initial style and plugin loads.
    pub fn new(config: Arc<PreviewConfig>) -> Self {
        let styles = config.style_resolver();
        let loader = config.plugin_loader();
        let mut context = Self {
            config,
            converter: Converter::new(),
            styles,
            bundle: StyleBundle::default(),
            loader,
            plugin: None,
            started: Instant::now(),
        };
        context.bundle = context.styles.load_all();
        context.reload_plugin();
        context
    }

    pub fn shared(self) -> SharedContext {
        Arc::new(Mutex::new(self))
    }

    pub fn document_path(&self) -> &Path {
        &self.config.paths.document
    }

    pub fn uptime(&self) -> Duration {
        self.started.elapsed()
    }

    // ========================================================================
    // styles
    // ========================================================================

    pub fn style_bundle(&self) -> &StyleBundle {
        &self.bundle
    }

    pub fn style_stats(&self) -> StyleStats {
        self.styles.stats()
    }

    pub fn owns_style(&self, path: &Path) -> bool {
        self.styles.owns(path)
    }

    /// Recompile changed catalog sources. Returns the new bundle text when
    /// anything was rebuilt.
    pub fn reload_styles(&mut self) -> Option<&str> {
        let reloaded = self.styles.reload_changed();
        if reloaded.is_empty() {
            return None;
        }
        debug!("styles"; "recompiled {}", reloaded.join(", "));
        self.bundle = self.styles.load_all();
        Some(&self.bundle.text)
    }

    /// Recompile every catalog entry, for changes to shared partials the
    /// catalog does not list.
    pub fn rebuild_styles(&mut self) -> &str {
        self.styles.invalidate();
        self.bundle = self.styles.load_all();
        &self.bundle.text
    }

    // ========================================================================
    // plugin
    // ========================================================================

    pub fn plugin(&self) -> Option<&LoadedPlugin> {
        self.plugin.as_ref()
    }

    pub fn plugin_loader(&self) -> Option<&PluginLoader> {
        self.loader.as_ref()
    }

    /// Re-run extraction. A read failure keeps the previous extraction.
    ///
    /// Returns whether a behavior file is loaded afterwards.
    pub fn reload_plugin(&mut self) -> bool {
        let Some(loader) = &self.loader else {
            return false;
        };
        match loader.load() {
            Ok(source) => {
                self.plugin = source.map(|source| LoadedPlugin {
                    script: synthesize(&source),
                    source,
                });
            }
            Err(err) => log!("plugin"; "{err}"),
        }
        self.plugin.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;
    use std::fs;
    use tempfile::TempDir;

    const CONTRIBUTION: &str = r#"
export default class WidgetContribution {
  constructor() {
    this.uiHandler.on('btnSave', this.handleSave);
  }
  handleSave(type, data) {
    console.log('save');
  }
}
"#;

    fn context_in(temp: &TempDir, toml: &str) -> PreviewContext {
        let mut config = test_parse_config(toml);
        config.finalize(temp.path());
        PreviewContext::new(Arc::new(config))
    }

    #[test]
    fn test_without_plugin_or_styles() {
        let temp = TempDir::new().unwrap();
        let mut context = context_in(&temp, "");
        assert!(context.plugin().is_none());
        assert!(!context.reload_plugin());
        assert!(context.style_bundle().text.is_empty());
        assert!(context.reload_styles().is_none());
    }

    #[test]
    fn test_plugin_loaded_and_reloaded() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("plugin");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("WidgetContribution.js"), CONTRIBUTION).unwrap();

        let mut context = context_in(&temp, "[paths]\nplugin = \"plugin\"");
        let plugin = context.plugin().unwrap();
        assert_eq!(plugin.source.bindings.len(), 1);
        assert!(plugin.script.contains("PluginEmulator"));

        fs::remove_file(dir.join("WidgetContribution.js")).unwrap();
        assert!(!context.reload_plugin());
    }

    #[test]
    fn test_rebuild_styles() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.css"), ".a { color: red; }").unwrap();
        let mut context = context_in(
            &temp,
            "[styles]\ncommand = [\"rodix-preview-no-such-sass\"]\n\n[[styles.atoms]]\nname = \"a\"\npath = \"a.css\"",
        );
        assert_eq!(context.style_stats().loaded_components, 1);
        assert!(context.rebuild_styles().contains(".a"));
    }
}
