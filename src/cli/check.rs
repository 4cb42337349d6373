//! `check`: report missing inputs before starting a preview.

use anyhow::Result;
use owo_colors::OwoColorize;

use crate::config::PreviewConfig;
use crate::log;
use crate::utils::exec::Cmd;
use crate::utils::path::display_relative;
use crate::utils::plural::plural_count;

pub fn run(config: &PreviewConfig) -> Result<()> {
    let diag = config.check();
    diag.print_warnings();

    if diag.has_errors() {
        return Err(diag.into());
    }

    let root = config.get_root();
    let styles = config.styles.entry_count();
    let plugin = match &config.paths.plugin {
        Some(dir) => display_relative(dir, root),
        None => "none".to_string(),
    };
    log!("check"; "document {}", display_relative(&config.paths.document, root));
    log!("check"; "plugin {}", plugin);
    log!("check"; "{}", plural_count(styles, "style entry"));

    let compiler = Cmd::from_slice(&config.styles.command);
    if styles > 0 && !compiler.is_available() {
        log!(
            "warn";
            "`{}` not found, styles will use the textual fallback",
            compiler.program_name()
        );
    }
    if diag.warnings().is_empty() {
        log!("check"; "{}", "all checks passed".green());
    } else {
        log!("check"; "passed with {}", plural_count(diag.warnings().len(), "warning"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_missing_document_fails() {
        let temp = TempDir::new().unwrap();
        let mut config = test_parse_config("");
        config.finalize(temp.path());
        let err = run(&config).unwrap_err();
        assert!(err.to_string().contains("config validation failed"));
    }

    #[test]
    fn test_missing_style_only_warns() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("htmlStore")).unwrap();
        fs::write(temp.path().join("htmlStore/Widget.html"), "<XDiv></XDiv>").unwrap();
        let mut config =
            test_parse_config("[[styles.atoms]]\nname = \"gone\"\npath = \"gone.css\"");
        config.finalize(temp.path());
        assert!(run(&config).is_ok());
    }
}
