//! `[watch]` section configuration.
//!
//! ```toml
//! [watch]
//! stability_ms = 200   # Quiet period before a batch of changes is handled
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchConfig {
    pub stability_ms: u64,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self { stability_ms: 200 }
    }
}

impl WatchConfig {
    pub fn stability(&self) -> Duration {
        Duration::from_millis(self.stability_ms)
    }
}
