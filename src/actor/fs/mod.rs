//! FileSystem Actor
//!
//! Watches the preview inputs and turns debounced changes into reload
//! messages for the WsActor. The watcher starts before the actor runs, so
//! nothing changed during startup is lost.
//!
//! ```text
//! Watcher → Debouncer (timing) → Classifier (existence, relevance)
//!         → ReloadPlan → PreviewContext refresh → WsMsg::Send
//! ```

use std::path::PathBuf;

use notify::{RecommendedWatcher, RecursiveMode};
use tokio::sync::mpsc;

use super::messages::WsMsg;
use crate::core::SharedContext;

// Existence correction and relevance filtering.
mod classifier;
// Pure timing and deduplication.
mod debouncer;
// Events -> reload plan -> messages.
mod router;
// Shared fs event types.
mod types;
// Watch root attach/re-attach lifecycle.
mod watch_roots;

#[cfg(test)]
mod tests;

use classifier::EventClassifier;
use debouncer::Debouncer;
use router::{ReloadPlan, apply_plan, log_events};
use watch_roots::WatchRoots;

/// FileSystem Actor - watches for file changes
pub struct FsActor {
    /// Channel to receive notify events (sync -> async bridge)
    notify_rx: std::sync::mpsc::Receiver<notify::Result<notify::Event>>,
    /// Watcher handle (must be kept alive)
    watcher: RecommendedWatcher,
    watch_roots: WatchRoots,
    ws_tx: mpsc::Sender<WsMsg>,
    debouncer: Debouncer,
    context: SharedContext,
}

impl FsActor {
    /// Create the watcher and attach every existing root.
    pub fn new(
        roots: Vec<(PathBuf, RecursiveMode)>,
        ws_tx: mpsc::Sender<WsMsg>,
        context: SharedContext,
    ) -> notify::Result<Self> {
        let (notify_tx, notify_rx) = std::sync::mpsc::channel();

        let mut watcher = notify::recommended_watcher(move |res| {
            let _ = notify_tx.send(res);
        })?;

        let mut watch_roots = WatchRoots::new(roots);
        watch_roots.attach_existing(&mut watcher)?;

        let window = context.lock().config.watch.stability();
        Ok(Self {
            notify_rx,
            watcher,
            watch_roots,
            ws_tx,
            debouncer: Debouncer::new(window),
            context,
        })
    }

    /// Run the actor event loop
    pub async fn run(self) {
        let Self {
            notify_rx,
            mut watcher,
            mut watch_roots,
            ws_tx,
            mut debouncer,
            context,
        } = self;

        let (async_tx, mut async_rx) = tokio::sync::mpsc::channel::<notify::Event>(64);

        std::thread::spawn(move || {
            while let Ok(result) = notify_rx.recv() {
                match result {
                    Ok(event) => {
                        if async_tx.blocking_send(event).is_err() {
                            break;
                        }
                    }
                    Err(e) => crate::log!("watch"; "notify error: {}", e),
                }
            }
        });

        loop {
            tokio::select! {
                biased;
                Some(event) = async_rx.recv() => debouncer.add_event(&event),
                _ = tokio::time::sleep(debouncer.sleep_duration()) => {
                    watch_roots.maintain(&mut watcher);
                    if process_changes(&mut debouncer, &ws_tx, &context).await.is_err() {
                        break;
                    }
                }
            }
        }
    }
}

/// Process debounced file changes
///
/// Returns `Err(())` once the WsActor has shut down
async fn process_changes(
    debouncer: &mut Debouncer,
    ws_tx: &mpsc::Sender<WsMsg>,
    context: &SharedContext,
) -> Result<(), ()> {
    let Some(raw_events) = debouncer.take_if_ready() else {
        return Ok(());
    };

    let messages = {
        let mut context = context.lock();
        let Some(events) = EventClassifier::classify(raw_events, &context.config) else {
            return Ok(());
        };
        log_events(&events);

        let plan = ReloadPlan::from_events(events, &context.config);
        apply_plan(&plan, &mut context)
    };

    for message in messages {
        ws_tx.send(WsMsg::Send(message)).await.map_err(|_| ())?;
    }

    Ok(())
}
