//! Actor Coordinator - wires up the live reload actors
//!
//! The Coordinator is a thin orchestrator that:
//! - Creates communication channels
//! - Starts the WebSocket acceptor
//! - Runs the actors until shutdown

mod runtime;
mod watch_paths;

use anyhow::Result;
use crossbeam::channel::Receiver;
use tokio::sync::mpsc;

use super::fs::FsActor;
use super::messages::WsMsg;
use super::ws::{ClientCount, WsActor};
use crate::core::SharedContext;
use crate::reload::server::WsListener;

const CHANNEL_BUFFER: usize = 32;

/// Coordinator - wires up and runs the actor system.
pub struct Coordinator {
    context: SharedContext,
    clients: ClientCount,
    listener: Option<WsListener>,
    shutdown_rx: Option<Receiver<()>>,
}

impl Coordinator {
    pub fn new(context: SharedContext, clients: ClientCount) -> Self {
        Self {
            context,
            clients,
            listener: None,
            shutdown_rx: None,
        }
    }

    /// Accept live reload clients on an already bound listener.
    pub fn with_ws_listener(mut self, listener: WsListener) -> Self {
        self.listener = Some(listener);
        self
    }

    /// Set shutdown signal receiver.
    pub fn with_shutdown_signal(mut self, rx: Receiver<()>) -> Self {
        self.shutdown_rx = Some(rx);
        self
    }

    /// Run the actor system.
    pub async fn run(mut self) -> Result<()> {
        let (ws_tx, ws_rx) = mpsc::channel::<WsMsg>(CHANNEL_BUFFER);

        if let Some(listener) = self.listener.take() {
            listener.spawn(ws_tx.clone());
        }

        let roots = {
            let context = self.context.lock();
            watch_paths::collect_watch_roots(&context.config)
        };
        crate::debug_do! {
            for (path, mode) in &roots {
                crate::debug!("watch"; "root {} ({:?})", path.display(), mode);
            }
        }
        let fs_actor = FsActor::new(roots, ws_tx.clone(), self.context.clone())
            .map_err(|e| anyhow::anyhow!("watcher failed: {}", e))?;
        let ws_actor = WsActor::new(ws_rx, self.clients.clone());

        crate::debug!("actor"; "start");
        runtime::run_actors(fs_actor, ws_actor, ws_tx, self.shutdown_rx.take()).await;
        crate::debug!("actor"; "stopped");
        Ok(())
    }
}
