//! Command-line interface module.

mod args;
pub mod check;
mod common;
pub mod convert;
pub mod plugin;
pub mod serve;
pub mod styles;

pub use args::{Cli, Commands};
