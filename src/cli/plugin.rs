//! `plugin`: extract behavior bindings and emit the emulation script.

use std::path::Path;

use anyhow::{Result, bail};
use serde::Serialize;

use super::common::write_output;
use crate::config::PreviewConfig;
use crate::plugin::{PluginInfo, PluginLoader, PluginSummary, synthesize};

#[derive(Serialize)]
struct Report {
    #[serde(flatten)]
    summary: PluginSummary,
    info: Option<PluginInfo>,
}

/// `dir` overrides `[paths] plugin`.
pub fn run(
    config: &PreviewConfig,
    dir: Option<&Path>,
    output: Option<&Path>,
    json: bool,
) -> Result<()> {
    let loader = match dir {
        Some(dir) => PluginLoader::new(dir),
        None => match config.plugin_loader() {
            Some(loader) => loader,
            None => bail!("no plugin directory: pass DIR or set [paths] plugin in rodix.toml"),
        },
    };

    let Some(source) = loader.load()? else {
        bail!("no *Contribution.js in {}", loader.dir().display());
    };

    let content = if json {
        let report = Report {
            summary: source.summary(),
            info: loader.plugin_info()?,
        };
        serde_json::to_string_pretty(&report)?
    } else {
        synthesize(&source)
    };

    write_output("plugin", output, &content)
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

    #[test]
    fn test_json_summary() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("plugin");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("WidgetContribution.js"), CONTRIBUTION).unwrap();
        fs::write(dir.join("package.json"), r#"{"name":"widget","version":"1.2.0"}"#).unwrap();

        let out = temp.path().join("plugin.json");
        run(&test_parse_config(""), Some(&dir), Some(&out), true).unwrap();

        let report: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
        assert_eq!(report["handlers"][0], "handleSave");
        assert_eq!(report["info"]["version"], "1.2.0");
    }

    #[test]
    fn test_script_output() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("WidgetContribution.js"), CONTRIBUTION).unwrap();

        let out = temp.path().join("emulator.js");
        run(&test_parse_config(""), Some(temp.path()), Some(&out), false).unwrap();
        assert!(fs::read_to_string(&out).unwrap().contains("PluginEmulator"));
    }

    #[test]
    fn test_missing_dir_and_file() {
        let temp = TempDir::new().unwrap();
        assert!(run(&test_parse_config(""), None, None, false).is_err());
        assert!(run(&test_parse_config(""), Some(temp.path()), None, false).is_err());
    }
}
