//! Utility modules shared across the preview server.

pub mod date;
pub mod exec;
pub mod html;
pub mod mime;
pub mod path;
pub mod plural;
