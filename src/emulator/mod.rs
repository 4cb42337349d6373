//! Runtime event emulator.
//!
//! The browser runtime (`embed/runtime/rodix.js`) reproduces the host
//! framework's widget behavior on the converted page. It is configured with
//! the rule tables here and the bindings scanned from the page:
//!
//! - [`button`]: ordered click classification rules and target ids
//! - [`toggle`]: checkbox/radio load state and icon classes
//! - [`dropdown`]: single-choice selects the runtime replaces
//! - [`slider`]: range parsing and the step grid
//! - [`plan`]: scan of a converted document into the bindings the runtime
//!   will create

pub mod button;
pub mod dropdown;
pub mod plan;
pub mod slider;
pub mod toggle;

pub use plan::{EmulatorPlan, scan};

use crate::convert::rules::ToggleKind;
use crate::embed::runtime::{RODIX_JS, RuntimeVars};
use rustc_hash::FxHashMap;
use serde::Serialize;

/// Suffixes of the per-component visibility class pair.
pub const VISIBLE_SHOW_SUFFIX: &str = "-visible-show";
pub const VISIBLE_HIDE_SUFFIX: &str = "-visible-hide";

/// Configuration object handed to the browser runtime.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RuntimeRules<'a> {
    pub buttons: &'static [button::ButtonRule],
    pub revert_min_rows: usize,
    pub tab_group_class: &'static str,
    pub tab_group_attr: &'static str,
    pub tab_prefix: &'static str,
    pub panel_prefix: &'static str,
    pub visible_show_suffix: &'static str,
    pub visible_hide_suffix: &'static str,
    /// Selector of bound toggle inputs.
    pub toggle_inputs: String,
    /// Input type to icon span class.
    pub toggle_icons: FxHashMap<&'static str, &'static str>,
    pub plan: &'a EmulatorPlan,
}

impl<'a> RuntimeRules<'a> {
    pub fn new(plan: &'a EmulatorPlan) -> Self {
        let toggle_inputs = ToggleKind::ALL
            .iter()
            .map(|kind| format!("label.{} > input", kind.label_class()))
            .collect::<Vec<_>>()
            .join(", ");
        Self {
            buttons: button::BUTTON_RULES,
            revert_min_rows: button::REVERT_MIN_ROWS,
            tab_group_class: button::TAB_GROUP_CLASS,
            tab_group_attr: button::TAB_GROUP_ATTR,
            tab_prefix: button::TAB_PREFIX,
            panel_prefix: button::PANEL_PREFIX,
            visible_show_suffix: VISIBLE_SHOW_SUFFIX,
            visible_hide_suffix: VISIBLE_HIDE_SUFFIX,
            toggle_inputs,
            toggle_icons: ToggleKind::ALL
                .iter()
                .map(|kind| (kind.as_str(), kind.icon_class()))
                .collect(),
            plan,
        }
    }
}

/// The browser runtime with the rule tables and the page's bindings
/// injected.
pub fn runtime_script(plan: &EmulatorPlan) -> String {
    let rules = serde_json::to_string(&RuntimeRules::new(plan)).unwrap_or_else(|_| "{}".into());
    RODIX_JS.render(&RuntimeVars { rules })
}
