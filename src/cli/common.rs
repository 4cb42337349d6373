//! Input and output helpers shared by the one-shot commands.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};

use crate::log;

/// Read `path`, or all of stdin when no path is given.
pub fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => {
            fs::read_to_string(path).with_context(|| format!("cannot read {}", path.display()))
        }
        None => io::read_to_string(io::stdin()).context("cannot read stdin"),
    }
}

/// Write `content` to `path`, or to stdout when no path is given.
///
/// Only a file write is logged, so stdout stays clean for piping.
pub fn write_output(module: &str, path: Option<&Path>, content: &str) -> Result<()> {
    let Some(path) = path else {
        let mut stdout = io::stdout().lock();
        stdout.write_all(content.as_bytes())?;
        if !content.ends_with('\n') {
            writeln!(stdout)?;
        }
        return Ok(());
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content).with_context(|| format!("cannot write {}", path.display()))?;
    log!(module; "wrote {}", path.display());
    Ok(())
}
