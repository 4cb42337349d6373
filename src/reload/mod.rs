//! Live reload transport.
//!
//! ```text
//! FsActor ──ReloadMessage──▶ WsActor ──json──▶ browser (hotreload.js)
//!                               ▲
//!        acceptor thread ───────┘ AddClient(TcpStream)
//! ```
//!
//! - `message` - messages pushed to the browser
//! - `server` - listener handing new connections to the ws actor

pub mod message;
pub mod server;
