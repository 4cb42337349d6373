//! RodiX preview - live preview server for RodiX widget documents.

mod actor;
mod cli;
mod config;
mod convert;
mod core;
mod embed;
mod emulator;
mod freshness;
mod logger;
mod markup;
mod plugin;
mod reload;
mod style;
mod utils;

use std::sync::Arc;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::PreviewConfig;

fn main() -> Result<()> {
    // Setup global Ctrl+C handler (before any blocking operations)
    core::setup_shutdown_handler()?;

    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    let config = PreviewConfig::load(&cli)?;

    match &cli.command {
        Commands::Serve { .. } => cli::serve::bind_server(Arc::new(config))?.run(),
        Commands::Convert { input, output } => {
            cli::convert::run(input.as_deref(), output.as_deref())
        }
        Commands::Plugin { dir, output, json } => {
            cli::plugin::run(&config, dir.as_deref(), output.as_deref(), *json)
        }
        Commands::Styles { output } => cli::styles::run(&config, output.as_deref()),
        Commands::Check => cli::check::run(&config),
    }
}
