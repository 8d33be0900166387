use std::sync::Arc;

use monster_monitor_core::context::{AppConfig, AppConfigExt};
use monster_monitor_core::notify::{NotificationSink, TracingNotifier};
use monster_monitor_core::registry::{IdentityRegistry, load_registry};
use monster_monitor_core::storage::{
    JsonFileStore, KillStore, PersistenceHandle, PersistenceWorker, profile_dir,
};
use monster_monitor_core::{KillLedger, KillMonitor};
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;

/// Holds all shared state for the CLI application.
/// This is a lightweight container - logic lives in the core types.
#[derive(Clone)]
pub struct CliContext {
    pub config: Arc<RwLock<AppConfig>>,
    pub player: String,
    pub registry: Arc<IdentityRegistry>,
    /// Shared with the monitor; user edits go straight here
    pub ledger: KillLedger,
    pub monitor: Arc<Mutex<KillMonitor>>,
    pub store: Arc<JsonFileStore>,
    persistence: PersistenceHandle,
    worker: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl CliContext {
    /// Load config, registry and the player's kill log, and start the
    /// persistence worker. Must be called inside a tokio runtime.
    pub fn new(player: &str) -> Result<Self, String> {
        let config = AppConfig::load_or_default();
        Self::with_config(player, config)
    }

    pub fn with_config(player: &str, config: AppConfig) -> Result<Self, String> {
        let registry = match load_registry(config.registry_file().as_deref()) {
            Ok(registry) => registry,
            Err(e) => {
                tracing::warn!(error = %e, "Custom identity registry not loaded, using built-in tables");
                load_registry(None).map_err(|e| e.to_string())?
            }
        };
        let registry = Arc::new(registry);

        let store = Arc::new(JsonFileStore::new(profile_dir(
            config.data_dir().as_deref(),
            player,
        )));
        // A log we can't read must not be overwritten by an empty one
        let records = store
            .load()
            .map_err(|e| format!("failed to load kill log: {e}"))?;
        tracing::info!(
            player,
            records = records.len(),
            path = %store.log_path().display(),
            "Kill log loaded"
        );

        let sink: Arc<dyn NotificationSink> = Arc::new(TracingNotifier);
        let (persistence, worker) = PersistenceWorker::spawn(store.clone(), sink.clone());

        let ledger = KillLedger::from_records(records).with_persistence(persistence.clone());
        let monitor = KillMonitor::new(registry.clone(), ledger.clone(), config.clone(), sink)
            .with_persistence(persistence.clone());

        Ok(Self {
            config: Arc::new(RwLock::new(config)),
            player: player.to_string(),
            registry,
            ledger,
            monitor: Arc::new(Mutex::new(monitor)),
            store,
            persistence,
            worker: Arc::new(Mutex::new(Some(worker))),
        })
    }

    /// Wait for pending writes, then stop the worker.
    pub async fn shutdown(&self) {
        if let Err(e) = self.persistence.flush().await {
            tracing::error!(error = %e, "Final kill log flush failed");
        }
        if let Some(worker) = self.worker.lock().await.take() {
            worker.abort();
        }
    }
}
