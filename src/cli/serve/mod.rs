//! Preview server with live reload support.
//!
//! One blocking request loop serves the assembled page and the debug API.
//! With watching enabled, a separate thread runs the actor system that
//! refreshes the shared [`PreviewContext`] and notifies browsers.
//!
//! | Route                        | Response                               |
//! |------------------------------|----------------------------------------|
//! | `GET /`                      | assembled preview page                 |
//! | `GET /api/status`            | watch state, clients, stats, uptime    |
//! | `GET /api/converter/stats`   | conversion statistics                  |
//! | `POST /api/converter/reset`  | clear conversion statistics            |
//! | `GET /api/source`            | document as written                    |
//! | `GET /api/converted`         | converted document                     |
//! | `GET /api/styles`            | style catalog statistics               |
//! | `GET /api/plugin`            | plugin extraction summary              |
//! | `GET /api/emulator`          | runtime bindings for the document      |

mod api;
mod lifecycle;
mod page;
mod response;

use crate::{
    actor::ClientCount,
    config::PreviewConfig,
    core::{PreviewContext, SharedContext, is_shutdown},
    debug,
    embed::serve::{HOTRELOAD_JS, HotreloadVars},
    log,
    reload::server::WsListener,
};
use anyhow::Result;
use crossbeam::channel;
use response::Reply;
use std::net::SocketAddr;
use std::sync::Arc;
use tiny_http::{Method, Request, Server};

/// State the request loop reads for every request.
pub struct ServeState {
    context: SharedContext,
    clients: ClientCount,
    /// Rendered live reload client, empty when not watching
    hotreload_js: String,
    watching: bool,
}

impl ServeState {
    fn new(context: SharedContext, ws_port: Option<u16>) -> Self {
        let hotreload_js = ws_port
            .map(|ws_port| HOTRELOAD_JS.render(&HotreloadVars { ws_port }))
            .unwrap_or_default();
        Self {
            context,
            clients: ClientCount::default(),
            hotreload_js,
            watching: ws_port.is_some(),
        }
    }
}

/// Bound server ready to accept requests
pub struct BoundServer {
    server: Arc<Server>,
    addr: SocketAddr,
    state: ServeState,
    listener: Option<WsListener>,
    shutdown_rx: channel::Receiver<()>,
}

/// Bind the HTTP server (and the live reload listener when watching)
/// without starting the request loop.
pub fn bind_server(config: Arc<PreviewConfig>) -> Result<BoundServer> {
    let (server, addr) = lifecycle::bind_with_retry(config.serve.interface, config.serve.port)?;
    let server = Arc::new(server);

    let listener = if config.serve.watch {
        match WsListener::bind(config.serve.interface, config.serve.ws_port) {
            Ok(listener) => {
                debug!("hotreload"; "ws://{}:{}", config.serve.interface, listener.port());
                Some(listener)
            }
            Err(e) => {
                log!("warn"; "live reload disabled: {:#}", e);
                None
            }
        }
    } else {
        None
    };

    let context = PreviewContext::new(Arc::clone(&config)).shared();
    let state = ServeState::new(context, listener.as_ref().map(WsListener::port));

    let (shutdown_tx, shutdown_rx) = channel::unbounded::<()>();
    lifecycle::register_server_for_shutdown(Arc::clone(&server), shutdown_tx);

    Ok(BoundServer {
        server,
        addr,
        state,
        listener,
        shutdown_rx,
    })
}

impl BoundServer {
    /// Get the bound address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Start the request loop (blocking).
    pub fn run(self) -> Result<()> {
        let Self {
            server,
            addr,
            state,
            listener,
            shutdown_rx,
        } = self;

        let actor_handle = state.watching.then(|| {
            lifecycle::spawn_actors(
                Arc::clone(&state.context),
                state.clients.clone(),
                listener,
                shutdown_rx,
            )
        });

        log!("serve"; "http://{}", addr);
        run_request_loop(&server, &state);
        lifecycle::wait_for_shutdown(actor_handle);
        Ok(())
    }
}

fn run_request_loop(server: &Server, state: &ServeState) {
    for request in server.incoming_requests() {
        if let Err(e) = handle_request(request, state) {
            log!("serve"; "request error: {e}");
        }
        if is_shutdown() {
            break;
        }
    }
}

/// Handle a single HTTP request
fn handle_request(request: Request, state: &ServeState) -> Result<()> {
    if is_shutdown() {
        return response::send(request, Reply::unavailable());
    }

    let reply = route(request.method(), request.url(), state);
    debug!("serve"; "{} {} -> {}", request.method(), request.url(), reply.status);
    response::send(request, reply)
}

/// Dispatch by method and path. The query string is ignored.
fn route(method: &Method, url: &str, state: &ServeState) -> Reply {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let readable = matches!(method, Method::Get | Method::Head);

    let mut context = state.context.lock();
    match (path, readable) {
        ("/" | "/index.html", true) => page::preview(&mut context, &state.hotreload_js),
        ("/api/status", true) => api::status(&context, state.watching, state.clients.get()),
        ("/api/converter/stats", true) => api::converter_stats(&context),
        ("/api/converter/reset", _) if *method == Method::Post => {
            api::converter_reset(&mut context)
        }
        ("/api/source", true) => api::source(&context),
        ("/api/converted", true) => api::converted(&mut context),
        ("/api/styles", true) => api::styles(&context),
        ("/api/plugin", true) => api::plugin(&context),
        ("/api/emulator", true) => api::emulator_plan(&context),
        (
            "/" | "/index.html" | "/api/status" | "/api/converter/stats" | "/api/converter/reset"
            | "/api/source" | "/api/converted" | "/api/styles" | "/api/plugin" | "/api/emulator",
            _,
        ) => Reply::method_not_allowed(),
        _ => Reply::not_found(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;
    use std::fs;
    use tempfile::TempDir;

    fn state_in(temp: &TempDir, document: Option<&str>) -> ServeState {
        if let Some(document) = document {
            fs::create_dir_all(temp.path().join("htmlStore")).unwrap();
            fs::write(temp.path().join("htmlStore/Widget.html"), document).unwrap();
        }
        let mut config = test_parse_config("");
        config.finalize(temp.path());
        let context = PreviewContext::new(Arc::new(config)).shared();
        ServeState::new(context, None)
    }

    fn json(reply: &Reply) -> serde_json::Value {
        serde_json::from_slice(&reply.body).unwrap()
    }

    #[test]
    fn test_missing_document() {
        let temp = TempDir::new().unwrap();
        let state = state_in(&temp, None);

        let page = route(&Method::Get, "/", &state);
        assert_eq!(page.status, 404);
        assert!(page.body_str().contains("Document not found"));

        let source = route(&Method::Get, "/api/source", &state);
        assert_eq!(source.status, 404);
        assert_eq!(json(&source)["error"], "File not found");
    }

    #[test]
    fn test_preview_page_and_stats() {
        let temp = TempDir::new().unwrap();
        let state = state_in(&temp, Some("<XDiv id=\"root\"><XButton id=\"btnSave\">Save</XButton></XDiv>"));

        let page = route(&Method::Get, "/?t=1", &state);
        assert_eq!(page.status, 200);
        let body = page.body_str();
        assert!(body.contains("id=\"btnSave\""));
        assert!(!body.contains("<XButton"));
        assert!(body.contains("watch off"));

        route(&Method::Get, "/api/converted", &state);
        let stats = json(&route(&Method::Get, "/api/converter/stats", &state));
        assert_eq!(stats["totalConversions"], 2);

        let reset = route(&Method::Post, "/api/converter/reset", &state);
        assert_eq!(json(&reset)["success"], true);
        let status = json(&route(&Method::Get, "/api/status", &state));
        assert_eq!(status["converterStats"]["totalConversions"], 0);
        assert_eq!(status["isWatching"], false);
        assert_eq!(status["connectedClients"], 0);
    }

    #[test]
    fn test_converted_and_source_payloads() {
        let temp = TempDir::new().unwrap();
        let state = state_in(&temp, Some("<XSpan>hi</XSpan>"));

        let source = json(&route(&Method::Get, "/api/source", &state));
        assert_eq!(source["content"], "<XSpan>hi</XSpan>");
        assert_eq!(source["size"], 17);
        assert!(source["lastModified"].is_string());

        let converted = json(&route(&Method::Get, "/api/converted", &state));
        assert!(converted["content"].as_str().unwrap().contains("<span"));
        assert_eq!(converted["stats"]["totalConversions"], 1);
    }

    #[test]
    fn test_emulator_and_plugin_endpoints() {
        let temp = TempDir::new().unwrap();
        let state = state_in(&temp, Some("<XDiv></XDiv>"));

        let plan = route(&Method::Get, "/api/emulator", &state);
        assert_eq!(plan.status, 200);
        assert!(json(&plan)["buttons"].is_array());

        let plugin = route(&Method::Get, "/api/plugin", &state);
        assert_eq!(plugin.status, 404);

        let styles = json(&route(&Method::Get, "/api/styles", &state));
        assert_eq!(styles["totalComponents"], 0);
    }

    #[test]
    fn test_unknown_route_and_method() {
        let temp = TempDir::new().unwrap();
        let state = state_in(&temp, Some(""));
        assert_eq!(route(&Method::Get, "/nope", &state).status, 404);
        assert_eq!(route(&Method::Get, "/api/converter/reset", &state).status, 405);
        assert_eq!(route(&Method::Delete, "/", &state).status, 405);
    }
}
