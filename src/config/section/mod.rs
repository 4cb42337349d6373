//! Configuration section definitions.
//!
//! Each module corresponds to a section in `rodix.toml`:
//!
//! | Module   | TOML Section | Purpose                                   |
//! |----------|--------------|-------------------------------------------|
//! | `paths`  | `[paths]`    | Document, plugin and style locations      |
//! | `styles` | `[styles]`   | Style catalogs and compiler invocation    |
//! | `serve`  | `[serve]`    | Preview server                            |
//! | `watch`  | `[watch]`    | File watcher timing                       |

mod paths;
mod serve;
mod styles;
mod watch;

pub use paths::PathsConfig;
pub use serve::{DEFAULT_WS_PORT, ServeConfig};
pub use styles::{StyleEntry, StylesConfig};
pub use watch::WatchConfig;
