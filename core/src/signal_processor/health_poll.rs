//! Health-ratio polling for NPCs that never fire a death event

use hashbrown::HashMap;

use monster_monitor_types::normalize_npc_name;

use super::signal::{DetectionChannel, KillSignal, SuppressReason};
use crate::events::{InstanceId, NpcSnapshot, Tick};
use crate::registry::{Classification, IdentityRegistry};

/// Ratio at or below which a polled NPC counts as dead
pub const DEATH_HEALTH_RATIO: i32 = 1;

#[derive(Debug, Clone)]
struct PolledInstance {
    type_id: i32,
    name: Option<String>,
    /// Type id a kill (or suppression) was logged for; None = armed
    logged_as: Option<i32>,
}

#[derive(Debug, Default)]
pub struct HealthPoller {
    tracked: HashMap<InstanceId, PolledInstance>,
}

impl HealthPoller {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start (or keep) watching an instance the local player is fighting.
    pub fn track(&mut self, npc: &NpcSnapshot) {
        let entry = self
            .tracked
            .entry(npc.instance_id)
            .or_insert_with(|| PolledInstance {
                type_id: npc.type_id,
                name: npc.name.clone(),
                logged_as: None,
            });
        entry.type_id = npc.type_id;
        if npc.name.is_some() {
            entry.name = npc.name.clone();
        }
    }

    /// A fresh hit after a logged death means the instance is alive again.
    pub fn on_player_hit(&mut self, npc: &NpcSnapshot) {
        self.track(npc);
        if let Some(entry) = self.tracked.get_mut(&npc.instance_id)
            && entry.logged_as.take().is_some()
        {
            tracing::debug!(instance_id = npc.instance_id, "Polled NPC rearmed by new hit");
        }
    }

    pub fn untrack(&mut self, id: InstanceId) {
        self.tracked.remove(&id);
    }

    pub fn is_tracked(&self, id: InstanceId) -> bool {
        self.tracked.contains_key(&id)
    }

    pub fn clear(&mut self) {
        self.tracked.clear();
    }

    /// Check every tracked instance present in this tick's scene.
    ///
    /// Emits once per crossing of the death threshold. Only a special boss's
    /// final form is credited; earlier forms are suppressed.
    pub fn poll(
        &mut self,
        tick: Tick,
        npcs: &[NpcSnapshot],
        registry: &IdentityRegistry,
    ) -> Vec<KillSignal> {
        let mut signals = Vec::new();

        for npc in npcs {
            let Some(entry) = self.tracked.get_mut(&npc.instance_id) else {
                continue;
            };
            entry.type_id = npc.type_id;
            if npc.name.is_some() {
                entry.name = npc.name.clone();
            }

            // Transformed into another form since the last log
            if entry.logged_as.is_some_and(|t| t != npc.type_id) {
                entry.logged_as = None;
            }

            let Some(ratio) = npc.health_ratio else {
                continue;
            };

            if ratio > DEATH_HEALTH_RATIO {
                entry.logged_as = None;
                continue;
            }
            if entry.logged_as.is_some() {
                continue;
            }
            entry.logged_as = Some(npc.type_id);

            let raw_name = entry.name.as_deref();
            let display = normalize_npc_name(raw_name);
            let npc_name = registry.logical_name(npc.type_id, raw_name);
            match registry.phase_of(npc.type_id, &display) {
                Classification::IntermediatePhase => {
                    tracing::debug!(
                        instance_id = npc.instance_id,
                        type_id = npc.type_id,
                        npc = %npc_name,
                        tick,
                        "Polled NPC reached zero in an intermediate form"
                    );
                    signals.push(KillSignal::KillSuppressed {
                        instance_id: npc.instance_id,
                        type_id: npc.type_id,
                        npc: npc_name,
                        reason: SuppressReason::IntermediatePhase,
                        tick,
                    });
                }
                _ => {
                    signals.push(KillSignal::KillConfirmed {
                        instance_id: npc.instance_id,
                        type_id: npc.type_id,
                        npc: npc_name,
                        channel: DetectionChannel::HealthPoll,
                        animation_id: None,
                        tick,
                    });
                }
            }
        }

        signals
    }
}
