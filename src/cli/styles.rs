//! `styles`: compile the catalog once and report what loaded.

use std::path::Path;

use anyhow::{Result, bail};
use owo_colors::OwoColorize;

use super::common::write_output;
use crate::config::PreviewConfig;
use crate::log;
use crate::utils::plural::plural_count;

pub fn run(config: &PreviewConfig, output: Option<&Path>) -> Result<()> {
    let mut resolver = config.style_resolver();
    if resolver.entries().is_empty() {
        bail!("no style entries: add [[styles.global]], [[styles.atoms]] or [[styles.wrappers]] to rodix.toml");
    }

    let bundle = resolver.load_all();
    let stats = resolver.stats();

    log!(
        "styles";
        "{} global, {} atoms, {} wrappers ({} of {} loaded)",
        bundle.counts.global,
        bundle.counts.atoms,
        bundle.counts.wrapper,
        stats.loaded_components,
        stats.total_components
    );
    if !stats.fallbacks.is_empty() {
        log!("warn"; "textual fallback used for {}", stats.fallbacks.join(", "));
    }
    for error in &bundle.errors {
        eprintln!("{} {} {}", "→".red(), error.name.cyan(), error.message);
    }

    if let Some(output) = output {
        write_output("styles", Some(output), &bundle.text)?;
    }

    if bundle.errors.is_empty() {
        Ok(())
    } else {
        bail!("{} failed to load", plural_count(bundle.errors.len(), "style entry"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;
    use std::fs;
    use tempfile::TempDir;

    fn config_in(temp: &TempDir, entries: &str) -> PreviewConfig {
        let toml = format!("[styles]\ncommand = [\"rodix-preview-no-such-sass\"]\n{entries}");
        let mut config = test_parse_config(&toml);
        config.finalize(temp.path());
        config
    }

    #[test]
    fn test_bundle_written() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("button.css"), ".btn { color: red; }").unwrap();
        let config = config_in(&temp, "[[styles.atoms]]\nname = \"button\"\npath = \"button.css\"");

        let out = temp.path().join("dist/bundle.css");
        run(&config, Some(&out)).unwrap();
        assert!(fs::read_to_string(&out).unwrap().contains(".btn"));
    }

    #[test]
    fn test_missing_entry_fails() {
        let temp = TempDir::new().unwrap();
        let config = config_in(&temp, "[[styles.atoms]]\nname = \"gone\"\npath = \"gone.css\"");
        let err = run(&config, None).unwrap_err();
        assert!(err.to_string().contains("1 style entry"));
    }

    #[test]
    fn test_empty_catalog() {
        let temp = TempDir::new().unwrap();
        assert!(run(&config_in(&temp, ""), None).is_err());
    }
}
