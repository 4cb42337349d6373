use std::io::ErrorKind;
use std::net::TcpStream;
use std::sync::Weak;
use std::time::Duration;

use parking_lot::Mutex;
use tungstenite::WebSocket;
use tungstenite::protocol::Message;

use crate::reload::message::ReloadMessage;

use super::{ClientCount, WsActor};

const READ_POLL: Duration = Duration::from_millis(100);

impl WsActor {
    /// Handshake a new connection and register it.
    pub(super) fn add_client(&self, stream: TcpStream) {
        // Handshake blocking, then poll reads non-blocking
        match tungstenite::accept(stream) {
            Ok(mut ws) => {
                let _ = ws.get_ref().set_nonblocking(true);

                let connected = ReloadMessage::connected();
                if let Err(e) = ws.send(Message::Text(connected.to_json().into())) {
                    crate::log!("ws"; "failed to send connected message: {}", e);
                    return;
                }

                let mut clients = self.clients.lock();
                clients.push(ws);
                self.count.set(clients.len());
                crate::debug!("ws"; "client connected (total: {})", clients.len());
            }
            Err(e) => crate::log!("ws"; "handshake failed: {}", e),
        }
    }

    /// Background thread to read client messages (non-blocking poll)
    pub(super) fn client_reader_loop(
        clients: Weak<Mutex<Vec<WebSocket<TcpStream>>>>,
        count: ClientCount,
    ) {
        loop {
            std::thread::sleep(READ_POLL);
            let Some(clients) = clients.upgrade() else {
                break;
            };

            let mut clients = clients.lock();
            clients.retain_mut(|ws| {
                // Finish writes a full socket buffer interrupted
                let _ = ws.flush();
                read_pending(ws)
            });
            count.set(clients.len());
        }
    }
}

/// Drain readable frames. Returns whether the client is still connected.
fn read_pending(ws: &mut WebSocket<TcpStream>) -> bool {
    loop {
        match ws.read() {
            Ok(Message::Text(text)) => {
                if let Some(ReloadMessage::Pong { ts }) = ReloadMessage::from_json(&text) {
                    crate::debug!("ws"; "pong {}", ts);
                }
            }
            Ok(Message::Close(_)) => {
                crate::debug!("ws"; "client closed");
                return false;
            }
            Ok(_) => {}
            Err(tungstenite::Error::Io(ref e)) if e.kind() == ErrorKind::WouldBlock => {
                return true;
            }
            Err(_) => return false,
        }
    }
}
