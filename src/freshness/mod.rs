//! Freshness detection by modification time.
//!
//! Stylesheet fragments and the previewed document are small, so an mtime
//! comparison is enough to decide whether cached output is stale.

pub mod mtime;

pub use mtime::{get_mtime, has_advanced};
