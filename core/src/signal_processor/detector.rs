//! Kill detection state machine
//!
//! Turns the host's raw event stream into logical kill signals. Four channels
//! feed it, in order of reliability:
//!
//! 1. explicit actor death
//! 2. death animations (catalogued ones resolve immediately, anything else is
//!    buffered and examined after despawn)
//! 3. despawn while engaged, after a short grace window
//! 4. health polling for special NPCs that never fire a death event
//!
//! Every instance resolves at most once: a resolution marker blocks the other
//! channels until the engine reuses the index for a new fight.

use std::sync::Arc;

use hashbrown::HashMap;

use monster_monitor_types::normalize_npc_name;

use super::health_poll::HealthPoller;
use super::signal::{DetectionChannel, KillSignal, SuppressReason};
use crate::events::{Actor, GameEvent, InstanceId, NpcSnapshot, Tick};
use crate::registry::{Classification, IdentityRegistry};
use crate::tracking::{DetectionState, EngagementRecord, EngagementTracker, INTERACTION_TIMEOUT_TICKS};

pub struct KillDetector {
    registry: Arc<IdentityRegistry>,
    tracker: EngagementTracker,
    poller: HealthPoller,
    /// Instance -> tick it was resolved on
    resolved: HashMap<InstanceId, Tick>,
}

impl KillDetector {
    pub fn new(registry: Arc<IdentityRegistry>) -> Self {
        Self {
            registry,
            tracker: EngagementTracker::new(),
            poller: HealthPoller::new(),
            resolved: HashMap::new(),
        }
    }

    pub fn registry(&self) -> &IdentityRegistry {
        &self.registry
    }

    pub fn tracker(&self) -> &EngagementTracker {
        &self.tracker
    }

    pub fn now(&self) -> Tick {
        self.tracker.now()
    }

    pub fn is_resolved(&self, id: InstanceId) -> bool {
        self.resolved.contains_key(&id)
    }

    /// Drop all per-instance state (logout, world hop)
    pub fn reset(&mut self) {
        self.tracker.clear();
        self.poller.clear();
        self.resolved.clear();
    }

    /// Process a recorded event and return the resulting signals.
    pub fn process_event(&mut self, event: &GameEvent) -> Vec<KillSignal> {
        match event {
            GameEvent::InteractionChanged { source, target } => {
                self.interaction_changed(source, target.as_ref())
            }
            GameEvent::DamageApplied {
                target,
                from_local_player,
            } => self.damage_applied(target, *from_local_player),
            GameEvent::ActorDeath { actor } => self.actor_death(actor),
            GameEvent::AnimationChanged {
                actor,
                animation_id,
            } => self.animation_changed(actor, *animation_id),
            GameEvent::ActorDespawned { actor } => self.actor_despawned(actor),
            GameEvent::Tick { tick, npcs } => self.tick(*tick, npcs),
        }
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Engagement
    // ═══════════════════════════════════════════════════════════════════════

    pub fn interaction_changed(&mut self, source: &Actor, target: Option<&Actor>) -> Vec<KillSignal> {
        if !matches!(source, Actor::LocalPlayer) {
            return Vec::new();
        }
        let Some(npc) = target.and_then(Actor::as_npc) else {
            return Vec::new();
        };
        if !self.accept_new_interaction(npc.instance_id) {
            return Vec::new();
        }

        let name = npc.name.as_deref();
        if self.is_special(npc) {
            self.poller.track(npc);
        } else {
            self.tracker
                .on_interaction_started(npc.instance_id, npc.type_id, name);
        }
        tracing::debug!(
            instance_id = npc.instance_id,
            type_id = npc.type_id,
            npc = name.unwrap_or_default(),
            tick = self.now(),
            "Interaction started"
        );
        Vec::new()
    }

    pub fn damage_applied(&mut self, target: &Actor, from_local_player: bool) -> Vec<KillSignal> {
        if !from_local_player {
            return Vec::new();
        }
        let Some(npc) = target.as_npc() else {
            return Vec::new();
        };
        if !self.accept_new_interaction(npc.instance_id) {
            return Vec::new();
        }

        if self.is_special(npc) {
            self.poller.on_player_hit(npc);
            return Vec::new();
        }

        let first_hit = !self
            .tracker
            .get(npc.instance_id)
            .is_some_and(EngagementRecord::is_engaged);
        self.tracker
            .on_damage_dealt(npc.instance_id, npc.type_id, npc.name.as_deref());
        if first_hit {
            tracing::debug!(
                instance_id = npc.instance_id,
                type_id = npc.type_id,
                npc = npc.name.as_deref().unwrap_or_default(),
                tick = self.now(),
                "Engaged"
            );
        }
        Vec::new()
    }

    /// A resolved instance only reopens on a later tick (engine index reuse).
    fn accept_new_interaction(&mut self, id: InstanceId) -> bool {
        match self.resolved.get(&id) {
            Some(&tick) if tick >= self.now() => false,
            Some(_) => {
                self.resolved.remove(&id);
                true
            }
            None => true,
        }
    }

    /// Polled only when nothing outranks it; excluded entities stay on the
    /// tracker path so they resolve as suppressed.
    fn is_special(&self, npc: &NpcSnapshot) -> bool {
        let name = normalize_npc_name(npc.name.as_deref());
        self.registry.classify(npc.type_id, &name) == Classification::SpecialPolled
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Death channels
    // ═══════════════════════════════════════════════════════════════════════

    pub fn actor_death(&mut self, actor: &Actor) -> Vec<KillSignal> {
        let Some(npc) = actor.as_npc() else {
            return Vec::new();
        };
        if self.is_special(npc) || self.is_resolved(npc.instance_id) {
            return Vec::new();
        }
        if !self.death_counts(npc) {
            return Vec::new();
        }
        if let Some(record) = self.tracker.get_mut(npc.instance_id) {
            record.observe(npc.type_id, npc.name.as_deref());
        }
        self.resolve(npc.instance_id, DetectionChannel::ExplicitDeath, None)
    }

    pub fn animation_changed(&mut self, actor: &Actor, animation_id: i32) -> Vec<KillSignal> {
        let Some(npc) = actor.as_npc() else {
            return Vec::new();
        };
        if self.is_special(npc) || self.is_resolved(npc.instance_id) {
            return Vec::new();
        }
        let Some(record) = self.tracker.get_mut(npc.instance_id) else {
            return Vec::new();
        };
        if !record.is_engaged() {
            return Vec::new();
        }
        record.observe(npc.type_id, npc.name.as_deref());
        if !record.animations.push(animation_id) {
            return Vec::new();
        }

        if self.registry.is_death_animation(animation_id) && self.death_counts(npc) {
            return self.resolve(
                npc.instance_id,
                DetectionChannel::DeathAnimation,
                Some(animation_id),
            );
        }
        Vec::new()
    }

    pub fn actor_despawned(&mut self, actor: &Actor) -> Vec<KillSignal> {
        let Some(npc) = actor.as_npc() else {
            return Vec::new();
        };
        let id = npc.instance_id;

        if self.is_special(npc) {
            self.poller.untrack(id);
            return Vec::new();
        }
        if self.is_resolved(id) {
            self.tracker.remove(id);
            return Vec::new();
        }

        let Some(record) = self.tracker.get_mut(id) else {
            return Vec::new();
        };
        if record.in_grace() {
            return Vec::new();
        }
        record.observe(npc.type_id, npc.name.as_deref());

        if !record.is_engaged() || !self.tracker.is_interaction_valid(id) {
            self.tracker.remove(id);
            return Vec::new();
        }
        if self.registry.is_despawn_excluded(npc.type_id) {
            tracing::debug!(instance_id = id, type_id = npc.type_id, "Routine despawn ignored");
            self.tracker.remove(id);
            return Vec::new();
        }

        let display_name = normalize_npc_name(npc.name.as_deref());
        if !self.registry.classify(npc.type_id, &display_name).is_creditable() {
            return self.resolve(id, DetectionChannel::Despawn, None);
        }

        if let Some(grace_until) = self.tracker.begin_grace(id) {
            tracing::debug!(
                instance_id = id,
                npc = %display_name,
                tick = self.now(),
                grace_until,
                "Despawned while engaged, awaiting final signal"
            );
        }
        Vec::new()
    }

    /// Engaged and still within the interaction window (or already in grace)
    fn death_counts(&self, npc: &NpcSnapshot) -> bool {
        match self.tracker.get(npc.instance_id) {
            Some(record) => match record.state {
                DetectionState::NotEngaged => false,
                DetectionState::Engaged => self.tracker.is_interaction_valid(npc.instance_id),
                DetectionState::AwaitingFinalSignal { .. } => true,
            },
            None => false,
        }
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Per-tick work
    // ═══════════════════════════════════════════════════════════════════════

    pub fn tick(&mut self, tick: Tick, npcs: &[NpcSnapshot]) -> Vec<KillSignal> {
        let mut signals = Vec::new();

        let swept = self.tracker.sweep(tick);
        for (id, record) in swept.expired {
            tracing::debug!(
                instance_id = id,
                npc = record.name.as_deref().unwrap_or_default(),
                last_interaction_tick = record.last_interaction_tick,
                tick,
                "Engagement expired"
            );
        }
        for (id, record) in swept.grace_elapsed {
            signals.extend(self.resolve_after_grace(id, record));
        }

        signals.extend(self.poller.poll(tick, npcs, &self.registry));

        self.resolved
            .retain(|_, resolved_at| tick.saturating_sub(*resolved_at) <= INTERACTION_TIMEOUT_TICKS);

        signals
    }

    fn resolve_after_grace(&mut self, id: InstanceId, record: EngagementRecord) -> Vec<KillSignal> {
        let (channel, animation_id) = match record.animations.last() {
            Some(anim) if self.registry.is_death_animation(anim) => {
                (DetectionChannel::DeathAnimation, Some(anim))
            }
            Some(anim) => (DetectionChannel::UnknownAnimation, Some(anim)),
            None => (DetectionChannel::Despawn, None),
        };
        self.emit(id, record, channel, animation_id)
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Resolution
    // ═══════════════════════════════════════════════════════════════════════

    fn resolve(
        &mut self,
        id: InstanceId,
        channel: DetectionChannel,
        animation_id: Option<i32>,
    ) -> Vec<KillSignal> {
        match self.tracker.remove(id) {
            Some(record) => self.emit(id, record, channel, animation_id),
            None => Vec::new(),
        }
    }

    /// Classify and emit exactly one outcome for the instance.
    fn emit(
        &mut self,
        id: InstanceId,
        record: EngagementRecord,
        channel: DetectionChannel,
        animation_id: Option<i32>,
    ) -> Vec<KillSignal> {
        let tick = self.now();
        self.resolved.insert(id, tick);

        let raw_name = record.name.as_deref();
        let display_name = normalize_npc_name(raw_name);
        let npc = self.registry.logical_name(record.type_id, raw_name);

        let reason = match self.registry.classify(record.type_id, &display_name) {
            Classification::Ordinary | Classification::FinalPhase => None,
            Classification::IntermediatePhase => Some(SuppressReason::IntermediatePhase),
            Classification::Excluded => Some(SuppressReason::Excluded),
            Classification::SpecialPolled => {
                // Specials never get tracker records; reaching here means the
                // registry changed under a live record
                tracing::warn!(instance_id = id, npc = %npc, "Special NPC resolved outside the poller");
                return Vec::new();
            }
        };

        if let Some(reason) = reason {
            tracing::debug!(
                instance_id = id,
                type_id = record.type_id,
                npc = %npc,
                channel = channel.as_str(),
                tick,
                ?reason,
                "Kill suppressed"
            );
            return vec![KillSignal::KillSuppressed {
                instance_id: id,
                type_id: record.type_id,
                npc,
                reason,
                tick,
            }];
        }

        tracing::info!(
            instance_id = id,
            type_id = record.type_id,
            npc = %npc,
            channel = channel.as_str(),
            tick,
            "Kill detected"
        );

        let mut signals = vec![KillSignal::KillConfirmed {
            instance_id: id,
            type_id: record.type_id,
            npc: npc.clone(),
            channel,
            animation_id,
            tick,
        }];
        if let (DetectionChannel::UnknownAnimation, Some(animation_id)) = (channel, animation_id) {
            signals.push(KillSignal::UnknownDeathAnimation {
                instance_id: id,
                npc,
                animation_id,
                tick,
            });
        }
        signals
    }
}
