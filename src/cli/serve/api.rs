//! Debug endpoints under `/api`.

use std::fs;
use std::io::ErrorKind;

use serde::Serialize;
use serde_json::json;

use super::response::Reply;
use crate::convert::{ConversionStats, transform};
use crate::core::PreviewContext;
use crate::emulator;
use crate::markup::Document;
use crate::plugin::{PluginInfo, PluginSummary};
use crate::style::{StyleCounts, StyleLoadError, StyleStats};
use crate::utils::date::DateTimeUtc;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Status<'a> {
    watch_directory: String,
    current_html_file: String,
    is_watching: bool,
    connected_clients: usize,
    converter_stats: &'a ConversionStats,
    uptime: f64,
    server_time: String,
}

/// `GET /api/status`
pub fn status(context: &PreviewContext, watching: bool, clients: usize) -> Reply {
    let document = context.document_path();
    let watch_directory = document
        .parent()
        .map(|dir| dir.display().to_string())
        .unwrap_or_default();
    Reply::json(
        200,
        &Status {
            watch_directory,
            current_html_file: document.display().to_string(),
            is_watching: watching,
            connected_clients: clients,
            converter_stats: context.converter.stats(),
            uptime: context.uptime().as_secs_f64(),
            server_time: DateTimeUtc::now().to_rfc3339(),
        },
    )
}

/// `GET /api/converter/stats`
pub fn converter_stats(context: &PreviewContext) -> Reply {
    Reply::json(200, context.converter.stats())
}

/// `POST /api/converter/reset`
pub fn converter_reset(context: &mut PreviewContext) -> Reply {
    context.converter.reset();
    Reply::json(
        200,
        &json!({ "success": true, "message": "Stats reset successfully" }),
    )
}

/// Document text, or the reply to send when it cannot be read.
fn read_document(context: &PreviewContext) -> Result<String, Reply> {
    fs::read_to_string(context.document_path()).map_err(|err| match err.kind() {
        ErrorKind::NotFound => Reply::json_error(404, "File not found"),
        _ => Reply::json_error(500, err.to_string()),
    })
}

/// `GET /api/source`
pub fn source(context: &PreviewContext) -> Reply {
    let content = match read_document(context) {
        Ok(content) => content,
        Err(reply) => return reply,
    };
    let last_modified = crate::freshness::get_mtime(context.document_path())
        .map(|t| DateTimeUtc::from_system_time(t).to_rfc3339());
    Reply::json(
        200,
        &json!({
            "file": context.document_path().display().to_string(),
            "size": content.len(),
            "lastModified": last_modified,
            "content": content,
        }),
    )
}

/// `GET /api/converted`
pub fn converted(context: &mut PreviewContext) -> Reply {
    let source = match read_document(context) {
        Ok(source) => source,
        Err(reply) => return reply,
    };
    match context.converter.convert(&source) {
        Ok(result) => Reply::json(
            200,
            &json!({
                "file": context.document_path().display().to_string(),
                "size": result.output.len(),
                "content": result.output,
                "substitutions": result.substitutions,
                "stats": context.converter.stats(),
            }),
        ),
        Err(err) => {
            let failure = context.converter.stats().errors.last();
            Reply::json(
                500,
                &json!({
                    "error": err.to_string(),
                    "context": failure.map(|f| f.context.as_str()),
                }),
            )
        }
    }
}

#[derive(Serialize)]
struct Styles<'a> {
    #[serde(flatten)]
    stats: StyleStats,
    counts: StyleCounts,
    errors: &'a [StyleLoadError],
    size: usize,
}

/// `GET /api/styles`
pub fn styles(context: &PreviewContext) -> Reply {
    let bundle = context.style_bundle();
    Reply::json(
        200,
        &Styles {
            stats: context.style_stats(),
            counts: bundle.counts,
            errors: &bundle.errors,
            size: bundle.text.len(),
        },
    )
}

#[derive(Serialize)]
struct Plugin {
    #[serde(flatten)]
    summary: PluginSummary,
    info: Option<PluginInfo>,
}

/// `GET /api/plugin`
pub fn plugin(context: &PreviewContext) -> Reply {
    let Some(loader) = context.plugin_loader() else {
        return Reply::json_error(404, "No plugin directory configured");
    };
    let Some(plugin) = context.plugin() else {
        return Reply::json_error(
            404,
            format!("No behavior file in {}", loader.dir().display()),
        );
    };
    let info = loader.plugin_info().unwrap_or_else(|err| {
        crate::log!("plugin"; "{err}");
        None
    });
    Reply::json(
        200,
        &Plugin {
            summary: plugin.source.summary(),
            info,
        },
    )
}

/// `GET /api/emulator`: bindings the runtime will create on the page.
///
/// Converts statelessly, so the converter statistics are unaffected.
pub fn emulator_plan(context: &PreviewContext) -> Reply {
    let source = match read_document(context) {
        Ok(source) => source,
        Err(reply) => return reply,
    };
    let plan = transform(&source)
        .map_err(|e| e.to_string())
        .and_then(|result| Document::parse(&result.output).map_err(|e| e.to_string()))
        .map(|doc| emulator::scan(&doc));
    match plan {
        Ok(plan) => Reply::json(200, &plan),
        Err(message) => Reply::json_error(500, message),
    }
}
