//! Background persistence worker
//!
//! Runs in a tokio task, receiving StoreCommands via channel. Disk writes are
//! strictly ordered; queued snapshots are coalesced so only the newest one
//! is written.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use super::error::StorageError;
use super::json_store::{KillMap, KillStore};
use crate::notify::{Notification, NotificationSink};

#[derive(Debug)]
pub enum StoreCommand {
    /// Replace the on-disk log with this snapshot
    Save(KillMap),
    AppendUnknown { npc: String, animation_id: i32 },
    /// Acknowledged once every earlier command has been handled
    Flush(oneshot::Sender<()>),
}

/// Cheap, cloneable submission side of the worker
#[derive(Debug, Clone)]
pub struct PersistenceHandle {
    tx: mpsc::UnboundedSender<StoreCommand>,
}

impl PersistenceHandle {
    pub fn save(&self, records: KillMap) -> Result<(), StorageError> {
        self.send(StoreCommand::Save(records))
    }

    pub fn append_unknown(&self, npc: &str, animation_id: i32) -> Result<(), StorageError> {
        self.send(StoreCommand::AppendUnknown {
            npc: npc.to_string(),
            animation_id,
        })
    }

    /// Wait until everything queued so far is on disk (or has failed)
    pub async fn flush(&self) -> Result<(), StorageError> {
        let (ack_tx, ack_rx) = oneshot::channel();
        self.send(StoreCommand::Flush(ack_tx))?;
        ack_rx.await.map_err(|_| StorageError::WorkerStopped)
    }

    fn send(&self, command: StoreCommand) -> Result<(), StorageError> {
        self.tx
            .send(command)
            .map_err(|_| StorageError::WorkerStopped)
    }
}

pub struct PersistenceWorker {
    rx: mpsc::UnboundedReceiver<StoreCommand>,
    store: Arc<dyn KillStore>,
    sink: Arc<dyn NotificationSink>,
}

impl PersistenceWorker {
    pub fn new(
        store: Arc<dyn KillStore>,
        sink: Arc<dyn NotificationSink>,
    ) -> (Self, PersistenceHandle) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { rx, store, sink }, PersistenceHandle { tx })
    }

    /// Create the worker and run it on the current tokio runtime
    pub fn spawn(
        store: Arc<dyn KillStore>,
        sink: Arc<dyn NotificationSink>,
    ) -> (PersistenceHandle, JoinHandle<()>) {
        let (worker, handle) = Self::new(store, sink);
        (handle, tokio::spawn(worker.run()))
    }

    /// Run until every handle is dropped
    pub async fn run(mut self) {
        while let Some(first) = self.rx.recv().await {
            let mut batch = vec![first];
            while let Ok(next) = self.rx.try_recv() {
                batch.push(next);
            }

            let mut pending: Option<KillMap> = None;
            for command in batch {
                match command {
                    StoreCommand::Save(records) => pending = Some(records),
                    StoreCommand::AppendUnknown { npc, animation_id } => {
                        self.write_pending(&mut pending).await;
                        let store = Arc::clone(&self.store);
                        let result = tokio::task::spawn_blocking(move || {
                            store.append_unknown_animation(&npc, animation_id)
                        })
                        .await;
                        self.report(flatten(result));
                    }
                    StoreCommand::Flush(ack) => {
                        self.write_pending(&mut pending).await;
                        let _ = ack.send(());
                    }
                }
            }
            self.write_pending(&mut pending).await;
        }
        tracing::debug!("Persistence worker stopped");
    }

    async fn write_pending(&self, pending: &mut Option<KillMap>) {
        let Some(records) = pending.take() else {
            return;
        };
        let count = records.len();
        let store = Arc::clone(&self.store);
        let result = tokio::task::spawn_blocking(move || store.save(&records)).await;
        let result = flatten(result);
        if result.is_ok() {
            tracing::debug!(records = count, "Kill log saved");
        }
        self.report(result);
    }

    fn report(&self, result: Result<(), StorageError>) {
        if let Err(e) = result {
            let reason = error_chain(&e);
            tracing::error!(error = %reason, "Persistence write failed");
            self.sink.notify(&Notification::SaveFailed { reason });
        }
    }
}

fn flatten(
    result: Result<Result<(), StorageError>, tokio::task::JoinError>,
) -> Result<(), StorageError> {
    result.map_err(StorageError::from).and_then(|inner| inner)
}

/// "outer: inner: root" rendering of an error and its sources
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut out = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        out.push_str(": ");
        out.push_str(&cause.to_string());
        source = cause.source();
    }
    out
}
