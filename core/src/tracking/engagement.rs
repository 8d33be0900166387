//! Per-instance engagement bookkeeping
//!
//! One record per NPC instance the local player is fighting (or has just
//! targeted). The kill detector owns the tracker and drives its clock.

use hashbrown::HashMap;

use super::animation::AnimationBuffer;
use crate::events::{InstanceId, Tick};

/// Ticks an interaction stays valid after the last refresh
pub const INTERACTION_TIMEOUT_TICKS: Tick = 7;

/// Ticks to wait after a despawn for a late death animation
pub const GRACE_PERIOD_TICKS: Tick = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectionState {
    /// Targeted but not yet hit by the local player
    NotEngaged,
    Engaged,
    /// Despawned while engaged; resolves once `grace_until` passes
    AwaitingFinalSignal { grace_until: Tick },
}

#[derive(Debug, Clone)]
pub struct EngagementRecord {
    /// Raw display name from the most recent signal
    pub name: Option<String>,
    /// Latest type id (changes when a boss transforms in place)
    pub type_id: i32,
    pub last_interaction_tick: Tick,
    pub state: DetectionState,
    pub animations: AnimationBuffer,
}

impl EngagementRecord {
    fn new(type_id: i32, name: Option<&str>, now: Tick) -> Self {
        Self {
            name: name.map(str::to_string),
            type_id,
            last_interaction_tick: now,
            state: DetectionState::NotEngaged,
            animations: AnimationBuffer::default(),
        }
    }

    /// True once a hit from the local player has landed
    pub fn is_engaged(&self) -> bool {
        !matches!(self.state, DetectionState::NotEngaged)
    }

    pub fn in_grace(&self) -> bool {
        matches!(self.state, DetectionState::AwaitingFinalSignal { .. })
    }

    /// Refresh identity from a newer snapshot
    pub fn observe(&mut self, type_id: i32, name: Option<&str>) {
        self.type_id = type_id;
        if let Some(name) = name {
            self.name = Some(name.to_string());
        }
    }
}

/// Records removed by a sweep
#[derive(Debug, Default)]
pub struct SweepResult {
    /// Interaction went stale without a death signal
    pub expired: Vec<(InstanceId, EngagementRecord)>,
    /// Grace deadline passed; the detector decides what they were
    pub grace_elapsed: Vec<(InstanceId, EngagementRecord)>,
}

#[derive(Debug, Default)]
pub struct EngagementTracker {
    records: HashMap<InstanceId, EngagementRecord>,
    now: Tick,
}

impl EngagementTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Tick {
        self.now
    }

    pub fn set_now(&mut self, tick: Tick) {
        self.now = tick;
    }

    /// Local player started targeting the instance. Overwrites any previous
    /// record: the player has to land a hit again before a death counts.
    pub fn on_interaction_started(&mut self, id: InstanceId, type_id: i32, name: Option<&str>) {
        self.records
            .insert(id, EngagementRecord::new(type_id, name, self.now));
    }

    /// Local player hit the instance
    pub fn on_damage_dealt(&mut self, id: InstanceId, type_id: i32, name: Option<&str>) {
        let now = self.now;
        let record = self
            .records
            .entry(id)
            .or_insert_with(|| EngagementRecord::new(type_id, name, now));

        // A hit on an instance we saw despawn means the engine reused the index
        if record.in_grace() {
            *record = EngagementRecord::new(type_id, name, now);
        }

        record.observe(type_id, name);
        record.last_interaction_tick = now;
        record.state = DetectionState::Engaged;
    }

    /// Record exists and was refreshed within the timeout
    pub fn is_interaction_valid(&self, id: InstanceId) -> bool {
        self.records
            .get(&id)
            .is_some_and(|r| self.now.saturating_sub(r.last_interaction_tick) <= INTERACTION_TIMEOUT_TICKS)
    }

    pub fn get(&self, id: InstanceId) -> Option<&EngagementRecord> {
        self.records.get(&id)
    }

    pub fn get_mut(&mut self, id: InstanceId) -> Option<&mut EngagementRecord> {
        self.records.get_mut(&id)
    }

    pub fn remove(&mut self, id: InstanceId) -> Option<EngagementRecord> {
        self.records.remove(&id)
    }

    /// Move an engaged record into its post-despawn grace window
    pub fn begin_grace(&mut self, id: InstanceId) -> Option<Tick> {
        let grace_until = self.now + GRACE_PERIOD_TICKS;
        let record = self.records.get_mut(&id)?;
        record.state = DetectionState::AwaitingFinalSignal { grace_until };
        Some(grace_until)
    }

    /// Per-tick expiry. Grace records are only removed once their deadline
    /// passes; everything else once the interaction times out.
    pub fn sweep(&mut self, now: Tick) -> SweepResult {
        self.now = now;

        let mut result = SweepResult::default();
        let mut to_remove = Vec::new();
        for (&id, record) in &self.records {
            match record.state {
                DetectionState::AwaitingFinalSignal { grace_until } => {
                    if now >= grace_until {
                        to_remove.push((id, true));
                    }
                }
                _ => {
                    if now.saturating_sub(record.last_interaction_tick) > INTERACTION_TIMEOUT_TICKS {
                        to_remove.push((id, false));
                    }
                }
            }
        }

        for (id, grace) in to_remove {
            if let Some(record) = self.records.remove(&id) {
                if grace {
                    result.grace_elapsed.push((id, record));
                } else {
                    result.expired.push((id, record));
                }
            }
        }
        result
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }
}
