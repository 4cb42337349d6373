//! Actor Message Definitions
//!
//! ```text
//! FsActor --Send(ReloadMessage)--> WsActor --json--> browser
//! ```

use std::net::TcpStream;

use crate::reload::message::ReloadMessage;

/// Messages to WebSocket Actor
#[derive(Debug)]
pub enum WsMsg {
    /// Broadcast to every connected client
    Send(ReloadMessage),
    /// Raw connection from the acceptor thread, handshake pending
    AddClient(TcpStream),
    /// Close all clients and stop
    Shutdown,
}
