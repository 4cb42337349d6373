use std::path::PathBuf;

use super::classifier::categorize_path;
use super::types::{ChangeKind, DebouncedEvents, FileCategory};
use crate::config::PreviewConfig;
use crate::core::PreviewContext;
use crate::logger::{status_error, status_success, status_unchanged, status_warning};
use crate::reload::message::ReloadMessage;

pub(super) fn log_events(events: &DebouncedEvents) {
    for (path, kind) in &events.0 {
        crate::debug!("watch"; "{}: {}", kind.label(), path.display());
    }
}

/// What one batch of changes asks for.
#[derive(Debug, Default, PartialEq, Eq)]
pub(super) struct ReloadPlan {
    pub(super) document_removed: bool,
    pub(super) document_changed: bool,
    pub(super) plugin_changed: bool,
    /// Catalog sources changed
    pub(super) styles_changed: bool,
    /// Uncataloged partials changed; every entry may depend on them
    pub(super) partials_changed: bool,
    pub(super) paths: Vec<PathBuf>,
}

impl ReloadPlan {
    pub(super) fn from_events(events: DebouncedEvents, config: &PreviewConfig) -> Self {
        let mut plan = Self::default();
        for (path, kind) in events.0 {
            match (categorize_path(&path, config), kind) {
                (FileCategory::Document, ChangeKind::Removed) => plan.document_removed = true,
                (FileCategory::Document, _) => plan.document_changed = true,
                (FileCategory::Plugin, _) => plan.plugin_changed = true,
                (FileCategory::Style, _) => plan.styles_changed = true,
                (FileCategory::Partial, _) => plan.partials_changed = true,
                (FileCategory::Other, _) => continue,
            }
            plan.paths.push(path);
        }
        plan
    }
}

/// Refresh the context for `plan` and return the messages for browsers.
///
/// A removed document only notifies. Otherwise a full reload, when one is
/// due, supersedes the in-place stylesheet update.
pub(super) fn apply_plan(plan: &ReloadPlan, context: &mut PreviewContext) -> Vec<ReloadMessage> {
    let file = context.config.paths.document_name();

    if plan.document_removed {
        status_warning(&format!("{file} was removed"));
        return vec![ReloadMessage::deleted(file)];
    }

    let mut messages = Vec::new();

    if plan.plugin_changed {
        let loaded = context.reload_plugin();
        let reason = if loaded {
            "plugin re-extracted"
        } else {
            "plugin removed"
        };
        status_success(reason);
        messages.push(ReloadMessage::behavior(reason));
    }

    if plan.document_changed {
        status_success(&format!("{file} changed"));
        messages.push(ReloadMessage::reload(format!("{file} changed")));
    }

    let css = if plan.partials_changed {
        Some(context.rebuild_styles().to_string())
    } else if plan.styles_changed {
        let css = context.reload_styles().map(str::to_string);
        if css.is_none() && messages.is_empty() {
            status_unchanged("styles unchanged");
        }
        css
    } else {
        None
    };

    if let Some(css) = css {
        if messages.is_empty() {
            let errors = &context.style_bundle().errors;
            if errors.is_empty() {
                status_success("styles recompiled");
            } else {
                let detail: Vec<_> = errors
                    .iter()
                    .map(|e| format!("{}: {}", e.name, e.message))
                    .collect();
                status_error("style errors", &detail.join("\n"));
            }
            messages.push(ReloadMessage::css(css));
        } else {
            crate::debug!("watch"; "styles recompiled, full reload pending");
        }
    }

    messages
}
