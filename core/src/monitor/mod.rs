//! Kill monitor
//!
//! Wires the pieces together: host events go into the KillDetector, confirmed
//! kills are credited on the KillLedger, and anything the user should hear
//! about goes to the NotificationSink.

use std::sync::Arc;

use monster_monitor_types::{AppConfig, KillCredit};

use crate::events::{Actor, GameEvent, GameEventHandler, NpcSnapshot, Tick};
use crate::ledger::{KillLedger, RecordedKill};
use crate::notify::{Notification, NotificationSink};
use crate::registry::IdentityRegistry;
use crate::signal_processor::{DetectionChannel, KillDetector, KillSignal, SignalHandler};
use crate::storage::PersistenceHandle;


pub struct KillMonitor {
    detector: KillDetector,
    ledger: KillLedger,
    config: AppConfig,
    sink: Arc<dyn NotificationSink>,
    /// Unknown death animations are appended here
    persistence: Option<PersistenceHandle>,
}

impl KillMonitor {
    pub fn new(
        registry: Arc<IdentityRegistry>,
        ledger: KillLedger,
        config: AppConfig,
        sink: Arc<dyn NotificationSink>,
    ) -> Self {
        Self {
            detector: KillDetector::new(registry),
            ledger,
            config,
            sink,
            persistence: None,
        }
    }

    pub fn with_persistence(mut self, handle: PersistenceHandle) -> Self {
        self.persistence = Some(handle);
        self
    }

    pub fn ledger(&self) -> &KillLedger {
        &self.ledger
    }

    pub fn detector(&self) -> &KillDetector {
        &self.detector
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Apply edited settings; takes effect on the next signal
    pub fn set_config(&mut self, config: AppConfig) {
        self.config = config;
    }

    /// Forget every in-flight instance (logout, world hop)
    pub fn reset(&mut self) {
        self.detector.reset();
    }

    /// Run one event through the detector and credit the results.
    /// Returns the signals for callers that want to show them.
    pub fn process_event(&mut self, event: &GameEvent) -> Vec<KillSignal> {
        let signals = self.detector.process_event(event);
        self.handle_signals(&signals);
        signals
    }

    fn credit_kill(&self, npc: &str, channel: DetectionChannel, animation_id: Option<i32>) {
        let RecordedKill { npc, credit, saved } = self.ledger.record_kill(npc, animation_id);

        if let Err(e) = saved {
            tracing::warn!(npc = %npc, error = %e, "Kill counted but not queued for saving");
            self.sink.notify(&Notification::SaveFailed {
                reason: e.to_string(),
            });
        }

        match credit {
            KillCredit::Ignored => {
                tracing::debug!(npc = %npc, "Kill on ignored NPC not counted");
            }
            KillCredit::Counted {
                total,
                limit_reached,
            } => {
                tracing::info!(npc = %npc, total, channel = channel.as_str(), "Kill recorded");
                if limit_reached && self.limit_notification_enabled(&npc) {
                    self.sink.notify(&Notification::LimitReached {
                        message: self.config.limit_message(&npc),
                        npc,
                    });
                }
            }
        }
    }

    fn limit_notification_enabled(&self, npc: &str) -> bool {
        self.config.notify_on_limit && self.ledger.get(npc).is_some_and(|r| r.notify_on_limit)
    }

    fn unknown_animation(&self, npc: &str, animation_id: i32) {
        if let Some(handle) = &self.persistence
            && let Err(e) = handle.append_unknown(npc, animation_id)
        {
            tracing::warn!(npc = %npc, animation_id, error = %e, "Unknown animation not logged");
        }
        if self.config.notify_on_unknown_death_animation {
            self.sink.notify(&Notification::UnknownAnimationSeen {
                npc: npc.to_string(),
                animation_id,
            });
        }
    }
}

impl SignalHandler for KillMonitor {
    fn handle_signal(&mut self, signal: &KillSignal) {
        match signal {
            KillSignal::KillConfirmed {
                npc,
                channel,
                animation_id,
                ..
            } => self.credit_kill(npc, *channel, *animation_id),
            KillSignal::KillSuppressed { .. } => {}
            KillSignal::UnknownDeathAnimation {
                npc, animation_id, ..
            } => self.unknown_animation(npc, *animation_id),
        }
    }
}

impl GameEventHandler for KillMonitor {
    fn on_interaction_changed(&mut self, source: &Actor, target: Option<&Actor>) {
        let signals = self.detector.interaction_changed(source, target);
        self.handle_signals(&signals);
    }

    fn on_damage_applied(&mut self, target: &Actor, from_local_player: bool) {
        let signals = self.detector.damage_applied(target, from_local_player);
        self.handle_signals(&signals);
    }

    fn on_actor_death(&mut self, actor: &Actor) {
        let signals = self.detector.actor_death(actor);
        self.handle_signals(&signals);
    }

    fn on_animation_changed(&mut self, actor: &Actor, animation_id: i32) {
        let signals = self.detector.animation_changed(actor, animation_id);
        self.handle_signals(&signals);
    }

    fn on_actor_despawned(&mut self, actor: &Actor) {
        let signals = self.detector.actor_despawned(actor);
        self.handle_signals(&signals);
    }

    fn on_tick(&mut self, tick: Tick, npcs: &[NpcSnapshot]) {
        let signals = self.detector.tick(tick, npcs);
        self.handle_signals(&signals);
    }
}
