use std::time::Duration;

use crossbeam::channel::Receiver;
use tokio::sync::mpsc;

use crate::actor::fs::FsActor;
use crate::actor::messages::WsMsg;
use crate::actor::ws::WsActor;

const SHUTDOWN_POLL: Duration = Duration::from_millis(100);

/// Run both actors until shutdown or until one of them stops.
pub(super) async fn run_actors(
    fs: FsActor,
    ws: WsActor,
    ws_tx: mpsc::Sender<WsMsg>,
    shutdown_rx: Option<Receiver<()>>,
) {
    let mut fs_handle = tokio::spawn(fs.run());
    let mut ws_handle = tokio::spawn(ws.run());

    let shutdown = async move {
        match shutdown_rx {
            Some(rx) => loop {
                if rx.try_recv().is_ok() {
                    crate::debug!("actor"; "shutdown signal received");
                    break;
                }
                tokio::time::sleep(SHUTDOWN_POLL).await;
            },
            None => std::future::pending().await,
        }
    };

    tokio::select! {
        _ = shutdown => {}
        _ = &mut fs_handle => {}
        _ = &mut ws_handle => {}
    }

    crate::debug!("actor"; "sending shutdown to ws");
    let _ = ws_tx.send(WsMsg::Shutdown).await;
    let _ = tokio::time::timeout(Duration::from_millis(500), ws_handle).await;
    fs_handle.abort();
}
