//! WebSocket Actor - live reload fan-out
//!
//! Owns the browser connections: performs the handshake for streams handed
//! over by the acceptor, broadcasts reload messages, answers keepalive pongs
//! and drops clients whose socket fails.
//!
//! ```text
//! FsActor --[Send]--> WsActor --[broadcast]--> Clients
//!                        ^                        |
//!                        +--------[pong]----------+
//! ```

mod client_io;
mod delivery;

use std::net::TcpStream;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tungstenite::WebSocket;

use super::messages::WsMsg;
use crate::reload::message::ReloadMessage;

/// Interval between keepalive pings.
const PING_INTERVAL: Duration = Duration::from_secs(30);

/// Number of connected browsers, readable from the request loop.
#[derive(Debug, Clone, Default)]
pub struct ClientCount(Arc<AtomicUsize>);

impl ClientCount {
    pub fn get(&self) -> usize {
        self.0.load(Ordering::Relaxed)
    }

    fn set(&self, n: usize) {
        self.0.store(n, Ordering::Relaxed);
    }
}

type Clients = Arc<Mutex<Vec<WebSocket<TcpStream>>>>;

/// WebSocket Actor - manages client connections and broadcasts
pub struct WsActor {
    rx: mpsc::Receiver<WsMsg>,
    /// Shared with the reader thread
    clients: Clients,
    count: ClientCount,
}

impl WsActor {
    pub fn new(rx: mpsc::Receiver<WsMsg>, count: ClientCount) -> Self {
        Self {
            rx,
            clients: Arc::new(Mutex::new(Vec::new())),
            count,
        }
    }

    /// Run the actor event loop
    pub async fn run(mut self) {
        // The reader stops once this actor (and its Arc) is dropped
        let reader_clients = Arc::downgrade(&self.clients);
        let reader_count = self.count.clone();
        std::thread::spawn(move || Self::client_reader_loop(reader_clients, reader_count));

        let mut keepalive = tokio::time::interval(PING_INTERVAL);
        keepalive.tick().await;

        loop {
            let msg = tokio::select! {
                msg = self.rx.recv() => msg,
                _ = keepalive.tick() => Some(WsMsg::Send(ReloadMessage::ping())),
            };

            match msg {
                Some(WsMsg::Send(message)) => {
                    crate::debug!("ws"; "sending {}", message.kind());
                    self.broadcast(&message);
                }
                Some(WsMsg::AddClient(stream)) => self.add_client(stream),
                Some(WsMsg::Shutdown) | None => {
                    crate::debug!("ws"; "shutting down");
                    let mut clients = self.clients.lock();
                    for mut ws in clients.drain(..) {
                        let _ = ws.close(None);
                        let _ = ws.flush();
                    }
                    self.count.set(0);
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::TcpListener;
    use tungstenite::Message;

    fn read_text(ws: &mut WebSocket<tungstenite::stream::MaybeTlsStream<TcpStream>>) -> String {
        loop {
            match ws.read().unwrap() {
                Message::Text(text) => return text.to_string(),
                _ => continue,
            }
        }
    }

    #[test]
    fn test_client_receives_connected_and_broadcast() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        let (tx, rx) = mpsc::channel(8);
        let count = ClientCount::default();
        let actor = WsActor::new(rx, count.clone());
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        let actor_thread = std::thread::spawn(move || runtime.block_on(actor.run()));

        let client = std::thread::spawn(move || tungstenite::connect(format!("ws://{addr}")));
        let (stream, _) = listener.accept().unwrap();
        tx.blocking_send(WsMsg::AddClient(stream)).unwrap();
        let (mut ws, _) = client.join().unwrap().unwrap();

        assert!(read_text(&mut ws).contains(r#""type":"connected""#));
        assert_eq!(count.get(), 1);

        tx.blocking_send(WsMsg::Send(ReloadMessage::reload("Widget.html changed")))
            .unwrap();
        assert_eq!(
            read_text(&mut ws),
            r#"{"type":"reload","reason":"Widget.html changed"}"#
        );

        tx.blocking_send(WsMsg::Shutdown).unwrap();
        actor_thread.join().unwrap();
        assert_eq!(count.get(), 0);
    }
}
