//! WebSocket listener for live reload.
//!
//! Accepts connections on a background thread and hands each raw stream to
//! the ws actor, which performs the handshake.

use std::io::ErrorKind;
use std::net::{IpAddr, SocketAddr, TcpListener};
use std::thread::JoinHandle;
use std::time::Duration;

use anyhow::Result;

use crate::actor::messages::WsMsg;
use crate::core::is_shutdown;

/// Maximum port retry attempts
const MAX_PORT_RETRIES: u16 = 10;

const ACCEPT_POLL: Duration = Duration::from_millis(100);

/// Listener bound for live reload, not yet accepting.
pub struct WsListener {
    listener: TcpListener,
    port: u16,
}

impl WsListener {
    /// Bind `interface:base_port`, trying the next ports when taken.
    ///
    /// Port 0 asks the OS for any free port.
    pub fn bind(interface: IpAddr, base_port: u16) -> Result<Self> {
        let (listener, port) = try_bind_port(interface, base_port, MAX_PORT_RETRIES)?;
        listener.set_nonblocking(true)?;
        Ok(Self { listener, port })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Spawn the acceptor thread. It stops on shutdown or once the actor
    /// channel closes.
    pub fn spawn(self, ws_tx: tokio::sync::mpsc::Sender<WsMsg>) -> JoinHandle<()> {
        std::thread::spawn(move || accept_loop(self.listener, ws_tx))
    }
}

fn accept_loop(listener: TcpListener, ws_tx: tokio::sync::mpsc::Sender<WsMsg>) {
    while !is_shutdown() {
        match listener.accept() {
            Ok((stream, addr)) => {
                crate::debug!("reload"; "client connected: {}", addr);

                // Handshake runs blocking in the actor
                let _ = stream.set_nonblocking(false);

                if ws_tx.blocking_send(WsMsg::AddClient(stream)).is_err() {
                    crate::debug!("reload"; "ws actor gone, acceptor stopping");
                    break;
                }
            }
            Err(ref e) if e.kind() == ErrorKind::WouldBlock => {
                std::thread::sleep(ACCEPT_POLL);
            }
            Err(e) => {
                crate::log!("reload"; "accept error: {}", e);
                std::thread::sleep(ACCEPT_POLL);
            }
        }
    }
}

/// Try binding to port, retry with incremented port if in use
fn try_bind_port(
    interface: IpAddr,
    base_port: u16,
    max_retries: u16,
) -> Result<(TcpListener, u16)> {
    let mut last_error = None;

    for offset in 0..max_retries {
        let port = base_port.saturating_add(offset);
        match TcpListener::bind(SocketAddr::new(interface, port)) {
            Ok(listener) => {
                let actual_port = listener.local_addr()?.port();
                return Ok((listener, actual_port));
            }
            Err(e) => last_error = Some(e),
        }
    }

    Err(anyhow::anyhow!(
        "Failed to bind WebSocket server after {} attempts: {}",
        max_retries,
        last_error.map(|e| e.to_string()).unwrap_or_default()
    ))
}
