//! Preview page assembly.
//!
//! ```text
//! document ──convert──▶ content ─┐
//! style bundle ──────────────────┤
//! runtime (rodix.js + plan) ─────┼──▶ PREVIEW_HTML
//! plugin emulation script ───────┤
//! hotreload.js (watch only) ─────┘
//! ```

use std::fs;
use std::io::ErrorKind;

use super::response::Reply;
use crate::core::PreviewContext;
use crate::embed::serve::{PREVIEW_HTML, PreviewVars, STATUS_HTML, StatusVars};
use crate::emulator::{self, EmulatorPlan};
use crate::markup::{Document, Node};
use crate::utils::html::{escape, inline_script, inline_style};
use crate::utils::plural::plural_count;

/// `GET /`: the assembled page, or a 404/500 status page.
pub fn preview(context: &mut PreviewContext, hotreload_js: &str) -> Reply {
    let path = context.document_path().to_path_buf();
    let source = match fs::read_to_string(&path) {
        Ok(source) => source,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            return status_page(
                404,
                "Document not found",
                &format!(
                    "{}\n\nCheck [paths] document in rodix.toml.",
                    path.display()
                ),
                hotreload_js,
            );
        }
        Err(err) => {
            return status_page(
                500,
                "Cannot read document",
                &format!("{}: {err}", path.display()),
                hotreload_js,
            );
        }
    };

    let converted = match context.converter.convert(&source) {
        Ok(result) => result.output,
        Err(err) => {
            let detail = context
                .converter
                .stats()
                .errors
                .last()
                .map(|failure| failure.context.clone())
                .unwrap_or_else(|| err.to_string());
            return status_page(500, "Conversion failed", &detail, hotreload_js);
        }
    };

    let plan = Document::parse(&converted)
        .map(|doc| emulator::scan(&doc))
        .unwrap_or_default();

    let bundle = context.style_bundle();
    let plugin = context.plugin();
    let vars = PreviewVars {
        title: escape(&context.config.paths.document_name()).into_owned(),
        summary: summary(&plan, bundle.counts.total(), plugin.map(|p| p.source.bindings.len())),
        conversions: context.converter.stats().total_conversions,
        component_styles: inline_style(&bundle.text).into_owned(),
        content: page_content(&converted),
        runtime_js: inline_script(&emulator::runtime_script(&plan)).into_owned(),
        plugin_js: plugin
            .map(|p| inline_script(&p.script).into_owned())
            .unwrap_or_default(),
        hotreload_js: hotreload_js.to_string(),
    };
    Reply::html(200, PREVIEW_HTML.render(&vars))
}

/// Status page for errors. `message` is escaped here.
pub fn status_page(status: u16, heading: &str, message: &str, hotreload_js: &str) -> Reply {
    let vars = StatusVars {
        status,
        heading: heading.to_string(),
        message: escape(message).into_owned(),
        hotreload_js: hotreload_js.to_string(),
    };
    Reply::html(status, STATUS_HTML.render(&vars))
}

/// Markup placed inside the preview's `<main>`.
///
/// A full document contributes its head styles and its body children; a
/// fragment is used as is.
fn page_content(converted: &str) -> String {
    let Ok(doc) = Document::parse(converted) else {
        return converted.to_string();
    };
    let Some(body) = doc.find(|el| el.is("body")) else {
        return converted.to_string();
    };

    let head_styles = doc
        .find(|el| el.is("head"))
        .into_iter()
        .flat_map(|head| head.children.iter())
        .filter(|node| {
            node.as_element()
                .is_some_and(|el| el.is("style") || el.is("link"))
        });
    let children: Vec<Node> = head_styles.chain(&body.children).cloned().collect();

    Document {
        children,
        ..Document::default()
    }
    .to_html()
}

fn summary(plan: &EmulatorPlan, styles: usize, plugin_bindings: Option<usize>) -> String {
    let mut parts = vec![
        plural_count(plan.binding_count(), "binding"),
        plural_count(styles, "stylesheet"),
    ];
    if let Some(bindings) = plugin_bindings {
        parts.push(plural_count(bindings, "plugin handler"));
    }
    parts.join(" · ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_content_of_full_document() {
        let html = "<!DOCTYPE html><html><head><title>x</title><style>.a{}</style></head>\
                    <body><div id=\"root\"></div></body></html>";
        assert_eq!(page_content(html), "<style>.a{}</style><div id=\"root\"></div>");
    }

    #[test]
    fn test_page_content_of_fragment() {
        assert_eq!(page_content("<div>hi</div>"), "<div>hi</div>");
    }

    #[test]
    fn test_status_page_escapes_message() {
        let reply = status_page(500, "Conversion failed", "<XDiv> unclosed", "");
        assert_eq!(reply.status, 500);
        assert!(reply.body_str().contains("&lt;XDiv&gt; unclosed"));
    }
}
