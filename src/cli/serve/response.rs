//! HTTP responses.
//!
//! Handlers produce a [`Reply`]; only [`send`] touches the socket, so routing
//! is testable without a server.

use anyhow::Result;
use serde::Serialize;
use tiny_http::{Header, Method, Request, Response, StatusCode};

use crate::utils::mime::types::{HTML, JSON, PLAIN};

/// A complete response, ready to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub status: u16,
    pub content_type: &'static str,
    pub body: Vec<u8>,
}

impl Reply {
    pub fn html(status: u16, body: String) -> Self {
        Self {
            status,
            content_type: HTML,
            body: body.into_bytes(),
        }
    }

    pub fn json(status: u16, value: &impl Serialize) -> Self {
        let body = serde_json::to_vec(value).unwrap_or_else(|e| {
            format!(r#"{{"error":"cannot serialize response: {e}"}}"#).into_bytes()
        });
        Self {
            status,
            content_type: JSON,
            body,
        }
    }

    /// `{"error": message}` with `status`.
    pub fn json_error(status: u16, message: impl Into<String>) -> Self {
        Self::json(status, &serde_json::json!({ "error": message.into() }))
    }

    pub fn plain(status: u16, body: &str) -> Self {
        Self {
            status,
            content_type: PLAIN,
            body: body.as_bytes().to_vec(),
        }
    }

    pub fn not_found() -> Self {
        Self::plain(404, "404 Not Found")
    }

    pub fn method_not_allowed() -> Self {
        Self::plain(405, "405 Method Not Allowed")
    }

    /// 503 Service Unavailable (server shutting down).
    pub fn unavailable() -> Self {
        Self::plain(503, "503 Service Unavailable")
    }

    pub fn body_str(&self) -> &str {
        std::str::from_utf8(&self.body).unwrap_or_default()
    }
}

/// Write `reply` to the client. HEAD requests get the headers only.
pub fn send(request: Request, reply: Reply) -> Result<()> {
    if is_head_request(&request) {
        return send_head(request, reply.status, reply.content_type);
    }
    send_body(request, reply.status, reply.content_type, reply.body)
}

fn is_head_request(request: &Request) -> bool {
    request.method() == &Method::Head
}

fn send_head(request: Request, status: u16, content_type: &'static str) -> Result<()> {
    let response = Response::empty(StatusCode(status))
        .with_header(make_header("Content-Type", content_type))
        .with_header(make_header("Cache-Control", "no-store"));
    request.respond(response)?;
    Ok(())
}

fn send_body(
    request: Request,
    status: u16,
    content_type: &'static str,
    body: Vec<u8>,
) -> Result<()> {
    let response = Response::from_data(body)
        .with_status_code(StatusCode(status))
        .with_header(make_header("Content-Type", content_type))
        .with_header(make_header("Cache-Control", "no-store"));
    request.respond(response)?;
    Ok(())
}

fn make_header(key: &'static str, value: &'static str) -> Header {
    Header::from_bytes(key, value).expect("static ASCII header")
}
