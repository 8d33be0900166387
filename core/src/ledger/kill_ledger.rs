//! Kill ledger: the only writer of persisted kill state
//!
//! Shared between the game thread (kills), the UI (reads and user edits) and
//! the persistence worker (snapshots), so the table lives behind a lock.
//! Every mutation queues a full snapshot while still holding the write lock,
//! which keeps snapshots in mutation order.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use monster_monitor_types::{KillCredit, NpcRecord, normalize_npc_name};

use super::error::LedgerError;
use crate::storage::{KillMap, PersistenceHandle};

#[derive(Debug, Default)]
struct LedgerState {
    records: KillMap,
    last_killed: Option<String>,
}

/// Result of crediting a kill. The credit always applies in memory, even
/// when the save request could not be queued.
#[derive(Debug)]
pub struct RecordedKill {
    pub npc: String,
    pub credit: KillCredit,
    pub saved: Result<(), LedgerError>,
}

#[derive(Debug, Clone, Default)]
pub struct KillLedger {
    state: Arc<RwLock<LedgerState>>,
    persistence: Option<PersistenceHandle>,
}

impl KillLedger {
    /// In-memory ledger with no persistence
    pub fn new() -> Self {
        Self::default()
    }

    /// Ledger seeded with previously saved records
    pub fn from_records(records: KillMap) -> Self {
        Self {
            state: Arc::new(RwLock::new(LedgerState {
                records,
                last_killed: None,
            })),
            persistence: None,
        }
    }

    pub fn with_persistence(mut self, handle: PersistenceHandle) -> Self {
        self.persistence = Some(handle);
        self
    }

    fn read(&self) -> RwLockReadGuard<'_, LedgerState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, LedgerState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn persist(&self, state: &LedgerState) -> Result<(), LedgerError> {
        match &self.persistence {
            Some(handle) => handle
                .save(state.records.clone())
                .map_err(LedgerError::SaveNotQueued),
            None => Ok(()),
        }
    }

    /// Apply `f` to an existing record, then persist
    fn update<T>(&self, name: &str, f: impl FnOnce(&mut NpcRecord) -> T) -> Result<T, LedgerError> {
        let key = normalize_npc_name(Some(name));
        let mut state = self.write();
        let record = state
            .records
            .get_mut(&key)
            .ok_or_else(|| LedgerError::UnknownNpc { name: key.clone() })?;
        let out = f(record);
        self.persist(&state)?;
        Ok(out)
    }

    /// Apply `f` to a record, creating it first if needed, then persist
    fn upsert<T>(&self, name: &str, f: impl FnOnce(&mut NpcRecord) -> T) -> Result<T, LedgerError> {
        let key = normalize_npc_name(Some(name));
        let mut state = self.write();
        let record = state
            .records
            .entry(key.clone())
            .or_insert_with(|| NpcRecord::new(key));
        let out = f(record);
        self.persist(&state)?;
        Ok(out)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Kills
    // ─────────────────────────────────────────────────────────────────────────

    /// Credit one logical kill. Ignored NPCs are left untouched.
    pub fn record_kill(&self, name: &str, animation_id: Option<i32>) -> RecordedKill {
        let key = normalize_npc_name(Some(name));
        let mut state = self.write();
        let credit = state
            .records
            .entry(key.clone())
            .or_insert_with(|| NpcRecord::new(key.clone()))
            .register_kill(animation_id);

        let saved = match credit {
            KillCredit::Ignored => Ok(()),
            KillCredit::Counted { .. } => {
                state.last_killed = Some(key.clone());
                self.persist(&state)
            }
        };

        RecordedKill {
            npc: key,
            credit,
            saved,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // User edits
    // ─────────────────────────────────────────────────────────────────────────

    /// Set (limit > 0) or clear (0) the kill limit
    pub fn set_limit(&self, name: &str, limit: u32) -> Result<(), LedgerError> {
        self.update(name, |r| r.set_limit(limit))
    }

    /// Creates the record so an NPC can be ignored before its first kill
    pub fn set_ignored(&self, name: &str, ignored: bool) -> Result<(), LedgerError> {
        self.upsert(name, |r| r.set_ignored(ignored))
    }

    pub fn set_notify_on_limit(&self, name: &str, notify: bool) -> Result<(), LedgerError> {
        self.update(name, |r| r.notify_on_limit = notify)
    }

    /// Context-menu "Monitor": start tracking toward `limit` with notifications on
    pub fn monitor(&self, name: &str, limit: u32) -> Result<(), LedgerError> {
        self.upsert(name, |r| {
            r.set_ignored(false);
            r.set_limit(limit);
            r.notify_on_limit = true;
        })
    }

    /// Zero both the lifetime total and the limit progress
    pub fn reset_count(&self, name: &str) -> Result<(), LedgerError> {
        self.update(name, NpcRecord::reset_count)
    }

    pub fn reset_progress(&self, name: &str) -> Result<(), LedgerError> {
        self.update(name, NpcRecord::reset_progress)
    }

    pub fn remove(&self, name: &str) -> Result<NpcRecord, LedgerError> {
        let key = normalize_npc_name(Some(name));
        let mut state = self.write();
        let removed = state
            .records
            .remove(&key)
            .ok_or_else(|| LedgerError::UnknownNpc { name: key.clone() })?;
        if state.last_killed.as_deref() == Some(key.as_str()) {
            state.last_killed = None;
        }
        self.persist(&state)?;
        Ok(removed)
    }

    /// Delete every record
    pub fn clear(&self) -> Result<(), LedgerError> {
        let mut state = self.write();
        state.records.clear();
        state.last_killed = None;
        self.persist(&state)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Reads
    // ─────────────────────────────────────────────────────────────────────────

    pub fn get(&self, name: &str) -> Option<NpcRecord> {
        let key = normalize_npc_name(Some(name));
        self.read().records.get(&key).cloned()
    }

    /// All records, sorted by name
    pub fn snapshot(&self) -> Vec<NpcRecord> {
        let mut records: Vec<NpcRecord> = self.read().records.values().cloned().collect();
        records.sort_by(|a, b| a.name.cmp(&b.name));
        records
    }

    pub fn records(&self) -> KillMap {
        self.read().records.clone()
    }

    /// Sum of every NPC's lifetime kills
    pub fn total_kills(&self) -> u64 {
        self.read()
            .records
            .values()
            .map(|r| u64::from(r.total_kills))
            .sum()
    }

    /// Most recently credited NPC this session
    pub fn last_killed(&self) -> Option<String> {
        self.read().last_killed.clone()
    }

    pub fn len(&self) -> usize {
        self.read().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().records.is_empty()
    }

    /// Wait for queued saves to reach the store
    pub async fn flush(&self) -> Result<(), LedgerError> {
        match &self.persistence {
            Some(handle) => handle.flush().await.map_err(LedgerError::SaveNotQueued),
            None => Ok(()),
        }
    }
}
