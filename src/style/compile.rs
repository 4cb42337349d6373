//! Stylesheet compilation through an external compiler.

use super::StyleError;
use crate::utils::exec::Cmd;
use std::path::{Path, PathBuf};

/// Turns one style source into plain CSS.
pub trait StyleCompiler: Send {
    fn compile(&self, path: &Path) -> Result<String, StyleError>;
}

/// Runs the `sass` command line compiler.
#[derive(Debug, Clone)]
pub struct SassCli {
    command: Vec<String>,
    load_paths: Vec<PathBuf>,
}

impl SassCli {
    /// `command` is the program plus leading arguments, e.g. `["npx", "sass"]`.
    pub fn new(command: Vec<String>) -> Self {
        Self {
            command,
            load_paths: Vec::new(),
        }
    }

    pub fn with_load_paths(mut self, paths: impl IntoIterator<Item = PathBuf>) -> Self {
        self.load_paths.extend(paths);
        self
    }

    fn cmd(&self, path: &Path) -> Cmd {
        let load_paths = self.load_paths.iter().map(PathBuf::as_path).chain(path.parent());
        load_paths
            .fold(
                Cmd::from_slice(&self.command).args(["--no-source-map", "--style=expanded"]),
                |cmd, dir| cmd.arg(format!("--load-path={}", dir.display())),
            )
            .arg(path)
    }
}

impl StyleCompiler for SassCli {
    fn compile(&self, path: &Path) -> Result<String, StyleError> {
        let compile_error = |message: String| StyleError::Compile {
            path: path.to_path_buf(),
            message,
        };

        if self.command.is_empty() {
            return Err(compile_error("no compiler command configured".into()));
        }

        let output = self
            .cmd(path)
            .run()
            .map_err(|e| compile_error(format!("{e:#}")))?;
        String::from_utf8(output.stdout).map_err(|e| compile_error(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_command_is_error() {
        let err = SassCli::new(Vec::new())
            .compile(Path::new("a.scss"))
            .unwrap_err();
        assert!(matches!(err, StyleError::Compile { .. }));
    }

    #[test]
    fn test_missing_binary_is_error() {
        let sass = SassCli::new(vec!["rodix-preview-no-such-sass".into()]);
        assert!(sass.compile(Path::new("a.scss")).is_err());
    }
}
