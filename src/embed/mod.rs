//! Embedded static resources for the preview server.
//!
//! # Module Structure
//!
//! - `template` - Template types for typed variable injection
//! - `runtime` - Browser runtime emulator (rodix.js, rodix.css)
//! - `serve` - Preview page, status pages, hotreload.js and the debug toolbar
//!
//! Scripts and stylesheets are minified by `build.rs` into `OUT_DIR`.
//! The layout stylesheet injected into converted documents lives in
//! `css/layout.css` and is included by the converter directly.
//!
//! # Usage
//!
//! ```ignore
//! use embed::serve::{HOTRELOAD_JS, HotreloadVars};
//!
//! let js = HOTRELOAD_JS.render(&HotreloadVars { ws_port: 35729 });
//! ```

mod template;

pub use template::{Template, TemplateVars, substitute};

pub mod runtime {
    use super::{Template, TemplateVars};

    /// Variables for rodix.js.
    pub struct RuntimeVars {
        /// JSON object with the emulator rule tables.
        pub rules: String,
    }

    impl TemplateVars for RuntimeVars {
        fn apply(&self, content: &str) -> String {
            content.replace("__RODIX_RULES__", self.rules.as_str())
        }
    }

    /// Widget behavior emulation, configured with the rule tables.
    pub const RODIX_JS: Template<RuntimeVars> =
        Template::new(include_str!(concat!(env!("OUT_DIR"), "/rodix.min.js")));

    /// Styles for the elements the runtime builds (dropdowns, sliders).
    pub const RODIX_CSS: &str = include_str!(concat!(env!("OUT_DIR"), "/rodix.min.css"));
}

pub mod serve {
    use super::{Template, TemplateVars, substitute};

    /// Styles of the preview chrome (toolbar, panels, status pages).
    pub const CHROME_CSS: &str = include_str!(concat!(env!("OUT_DIR"), "/chrome.min.css"));

    /// Debug toolbar behavior.
    pub const TOOLBAR_JS: &str = include_str!(concat!(env!("OUT_DIR"), "/toolbar.min.js"));

    /// Variables for hotreload.js.
    pub struct HotreloadVars {
        pub ws_port: u16,
    }

    impl TemplateVars for HotreloadVars {
        fn apply(&self, content: &str) -> String {
            content.replace("__RODIX_WS_PORT__", &self.ws_port.to_string())
        }
    }

    /// Hot reload JavaScript with WebSocket port injection.
    pub const HOTRELOAD_JS: Template<HotreloadVars> =
        Template::new(include_str!(concat!(env!("OUT_DIR"), "/hotreload.min.js")));

    /// Variables for preview.html. Every field is inserted verbatim, callers
    /// escape.
    #[derive(Debug, Default)]
    pub struct PreviewVars {
        pub title: String,
        pub summary: String,
        pub conversions: u64,
        pub component_styles: String,
        pub content: String,
        pub runtime_js: String,
        pub plugin_js: String,
        /// Empty when watching is off.
        pub hotreload_js: String,
    }

    impl TemplateVars for PreviewVars {
        fn apply(&self, content: &str) -> String {
            let conversions = self.conversions.to_string();
            let (live_state, live_label) = if self.hotreload_js.is_empty() {
                ("off", "watch off")
            } else {
                ("closed", "offline")
            };
            substitute(
                content,
                &[
                    ("__TITLE__", self.title.as_str()),
                    ("__SUMMARY__", self.summary.as_str()),
                    ("__CONVERSIONS__", conversions.as_str()),
                    ("__LIVE_STATE__", live_state),
                    ("__LIVE_LABEL__", live_label),
                    ("__CHROME_CSS__", CHROME_CSS),
                    ("__RUNTIME_CSS__", super::runtime::RODIX_CSS),
                    ("__COMPONENT_STYLES__", self.component_styles.as_str()),
                    ("__CONTENT__", self.content.as_str()),
                    ("__TOOLBAR_JS__", TOOLBAR_JS),
                    ("__RUNTIME_JS__", self.runtime_js.as_str()),
                    ("__PLUGIN_JS__", self.plugin_js.as_str()),
                    ("__HOTRELOAD_JS__", self.hotreload_js.as_str()),
                ],
            )
        }
    }

    /// The assembled preview page.
    pub const PREVIEW_HTML: Template<PreviewVars> =
        Template::new(include_str!("serve/preview.html"));

    /// Variables for status.html (404 and 500 pages).
    #[derive(Debug, Default)]
    pub struct StatusVars {
        pub status: u16,
        pub heading: String,
        /// Already escaped.
        pub message: String,
        pub hotreload_js: String,
    }

    impl TemplateVars for StatusVars {
        fn apply(&self, content: &str) -> String {
            let status = self.status.to_string();
            substitute(
                content,
                &[
                    ("__STATUS__", status.as_str()),
                    ("__HEADING__", self.heading.as_str()),
                    ("__CHROME_CSS__", CHROME_CSS),
                    ("__MESSAGE__", self.message.as_str()),
                    ("__VERSION__", env!("CARGO_PKG_VERSION")),
                    ("__HOTRELOAD_JS__", self.hotreload_js.as_str()),
                ],
            )
        }
    }

    /// Error page shown instead of the preview.
    pub const STATUS_HTML: Template<StatusVars> =
        Template::new(include_str!("serve/status.html"));
}
