pub mod context;
pub mod events;
pub mod game_data;
pub mod ledger;
pub mod monitor;
pub mod notify;
pub mod registry;
pub mod signal_processor;
pub mod storage;
pub mod tracking;

// Re-exports for convenience
pub use context::{AppConfig, AppConfigExt, ConfigError};
pub use events::{Actor, GameEvent, GameEventHandler, InstanceId, NpcSnapshot, Tick};
pub use ledger::{KillLedger, LedgerError, RecordedKill};
pub use monitor::KillMonitor;
pub use notify::{Notification, NotificationSink, TracingNotifier};
pub use registry::{Classification, IdentityRegistry, RegistryError, load_registry};
pub use signal_processor::{
    DetectionChannel, KillDetector, KillSignal, SignalHandler, SuppressReason,
};
pub use storage::{JsonFileStore, KillStore, PersistenceHandle, PersistenceWorker, StorageError};
pub use tracking::{EngagementTracker, GRACE_PERIOD_TICKS, INTERACTION_TIMEOUT_TICKS};

pub use monster_monitor_types::{KillCredit, NpcRecord};
