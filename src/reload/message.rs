//! Live Reload Message Protocol
//!
//! JSON messages pushed over WebSocket from the preview server to browser
//! clients, tagged by `type`:
//!
//! - `connected`: sent once per client on connect
//! - `reload`: previewed document changed, full reload
//! - `css`: component styles recompiled, replace the style block in place
//! - `behavior`: plugin re-extracted, full reload
//! - `deleted`: previewed document removed
//! - `ping`/`pong`: keep connection alive

use serde::{Deserialize, Serialize};

/// Id of the `<style>` element a `css` message replaces.
pub const COMPONENT_STYLES_ID: &str = "rodix-component-styles";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ReloadMessage {
    Connected {
        /// Server version for compatibility check
        version: String,
    },

    Reload {
        #[serde(skip_serializing_if = "Option::is_none")]
        reason: Option<String>,
    },

    Css {
        /// Id of the style element to replace
        target: String,
        content: String,
    },

    Behavior {
        #[serde(skip_serializing_if = "Option::is_none")]
        reason: Option<String>,
    },

    Deleted {
        file: String,
    },

    Ping {
        ts: u64,
    },

    Pong {
        ts: u64,
    },
}

impl ReloadMessage {
    pub fn connected() -> Self {
        Self::Connected {
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    pub fn reload(reason: impl Into<String>) -> Self {
        Self::Reload {
            reason: Some(reason.into()),
        }
    }

    pub fn css(content: impl Into<String>) -> Self {
        Self::Css {
            target: COMPONENT_STYLES_ID.to_string(),
            content: content.into(),
        }
    }

    pub fn behavior(reason: impl Into<String>) -> Self {
        Self::Behavior {
            reason: Some(reason.into()),
        }
    }

    pub fn deleted(file: impl Into<String>) -> Self {
        Self::Deleted { file: file.into() }
    }

    pub fn ping() -> Self {
        use std::time::{SystemTime, UNIX_EPOCH};
        let ts = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64;
        Self::Ping { ts }
    }

    /// Short name for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Connected { .. } => "connected",
            Self::Reload { .. } => "reload",
            Self::Css { .. } => "css",
            Self::Behavior { .. } => "behavior",
            Self::Deleted { .. } => "deleted",
            Self::Ping { .. } => "ping",
            Self::Pong { .. } => "pong",
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| r#"{"type":"reload"}"#.to_string())
    }

    pub fn from_json(s: &str) -> Option<Self> {
        serde_json::from_str(s).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reload_message() {
        let json = ReloadMessage::reload("Widget.html changed").to_json();
        assert_eq!(json, r#"{"type":"reload","reason":"Widget.html changed"}"#);
    }

    #[test]
    fn test_css_targets_component_styles() {
        let json = ReloadMessage::css(".a{}").to_json();
        assert_eq!(
            json,
            r#"{"type":"css","target":"rodix-component-styles","content":".a{}"}"#
        );
    }

    #[test]
    fn test_behavior_and_deleted() {
        assert_eq!(
            ReloadMessage::behavior("plugin changed").to_json(),
            r#"{"type":"behavior","reason":"plugin changed"}"#
        );
        assert_eq!(
            ReloadMessage::deleted("Widget.html").to_json(),
            r#"{"type":"deleted","file":"Widget.html"}"#
        );
    }

    #[test]
    fn test_reason_omitted_when_absent() {
        let json = ReloadMessage::Reload { reason: None }.to_json();
        assert_eq!(json, r#"{"type":"reload"}"#);
    }

    #[test]
    fn test_pong_from_client() {
        let msg = ReloadMessage::from_json(r#"{"type":"pong","ts":42}"#);
        assert_eq!(msg, Some(ReloadMessage::Pong { ts: 42 }));
        assert_eq!(ReloadMessage::from_json("not json"), None);
    }

    #[test]
    fn test_connected_carries_version() {
        let msg = ReloadMessage::connected();
        assert_eq!(msg.kind(), "connected");
        assert!(msg.to_json().contains(env!("CARGO_PKG_VERSION")));
    }
}
