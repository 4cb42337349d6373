//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// RodiX live preview server
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path, searched upward from the current directory
    #[arg(short = 'C', long, global = true, default_value = "rodix.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Enable verbose output for debugging
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Serve the configured document with live reload
    #[command(visible_alias = "s")]
    Serve {
        /// Network interface to bind (e.g., 127.0.0.1, 0.0.0.0)
        #[arg(short, long)]
        interface: Option<std::net::IpAddr>,

        /// Port number to listen on
        #[arg(short, long)]
        port: Option<u16>,

        /// Watch inputs and push reloads to the browser
        #[arg(short, long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
        watch: Option<bool>,
    },

    /// Convert a document once (reads stdin when INPUT is omitted)
    #[command(visible_alias = "c")]
    Convert {
        /// Document to convert; defaults to stdin
        #[arg(value_hint = clap::ValueHint::FilePath)]
        input: Option<PathBuf>,

        /// Write the result here instead of stdout
        #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
        output: Option<PathBuf>,
    },

    /// Extract plugin behavior and print the emulation script
    Plugin {
        /// Plugin directory; defaults to [paths] plugin
        #[arg(value_hint = clap::ValueHint::DirPath)]
        dir: Option<PathBuf>,

        /// Write the script (or JSON) here instead of stdout
        #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
        output: Option<PathBuf>,

        /// Print the extraction summary as JSON instead of the script
        #[arg(long)]
        json: bool,
    },

    /// Compile the style catalog and print a summary
    Styles {
        /// Also write the bundled stylesheet here
        #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
        output: Option<PathBuf>,
    },

    /// Check that the configured document, plugin and styles exist
    Check,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serve_args() {
        let cli = Cli::parse_from(["rodix-preview", "s", "-p", "4000", "-w", "false", "-v"]);
        assert!(cli.verbose);
        let Commands::Serve { port, watch, interface } = cli.command else {
            panic!("expected serve");
        };
        assert_eq!(port, Some(4000));
        assert_eq!(watch, Some(false));
        assert_eq!(interface, None);
    }

    #[test]
    fn test_plugin_args_and_default_config() {
        let cli = Cli::parse_from(["rodix-preview", "plugin", "vendor/plugin", "--json"]);
        assert_eq!(cli.config, PathBuf::from("rodix.toml"));
        let Commands::Plugin { dir, output, json } = cli.command else {
            panic!("expected plugin");
        };
        assert_eq!(dir, Some(PathBuf::from("vendor/plugin")));
        assert!(output.is_none());
        assert!(json);
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
