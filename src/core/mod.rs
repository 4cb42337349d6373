//! Process-wide preview state.

mod context;
mod state;

pub use context::{LoadedPlugin, PreviewContext, SharedContext};
pub use state::{is_shutdown, register_server, setup_shutdown_handler};
