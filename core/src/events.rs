//! Host game events
//!
//! The host delivers these on its game thread, in engine order. Recordings
//! (for replay) are the same enum serialized one JSON object per line.

use serde::{Deserialize, Serialize};

/// Game tick counter (one tick is ~600ms)
pub type Tick = u64;

/// Engine index of a spawned NPC; unique only while the NPC is alive
pub type InstanceId = i32;

/// What the core needs to know about an NPC at the moment of an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NpcSnapshot {
    pub instance_id: InstanceId,
    pub type_id: i32,
    #[serde(default)]
    pub name: Option<String>,
    /// None when the health bar is not shown
    #[serde(default)]
    pub health_ratio: Option<i32>,
    #[serde(default)]
    pub combat_level: i32,
}

impl NpcSnapshot {
    pub fn new(instance_id: InstanceId, type_id: i32, name: &str) -> Self {
        Self {
            instance_id,
            type_id,
            name: Some(name.to_string()),
            health_ratio: None,
            combat_level: 0,
        }
    }

    pub fn with_health(mut self, ratio: i32) -> Self {
        self.health_ratio = Some(ratio);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Actor {
    LocalPlayer,
    Player { name: String },
    Npc(NpcSnapshot),
}

impl Actor {
    pub fn as_npc(&self) -> Option<&NpcSnapshot> {
        match self {
            Actor::Npc(npc) => Some(npc),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GameEvent {
    InteractionChanged {
        source: Actor,
        /// None when the source stops interacting
        #[serde(default)]
        target: Option<Actor>,
    },
    DamageApplied {
        target: Actor,
        from_local_player: bool,
    },
    ActorDeath {
        actor: Actor,
    },
    AnimationChanged {
        actor: Actor,
        animation_id: i32,
    },
    ActorDespawned {
        actor: Actor,
    },
    Tick {
        tick: Tick,
        /// Every NPC currently in the scene
        #[serde(default)]
        npcs: Vec<NpcSnapshot>,
    },
}

/// One method per event kind; the host calls these synchronously.
pub trait GameEventHandler {
    fn on_interaction_changed(&mut self, source: &Actor, target: Option<&Actor>);

    fn on_damage_applied(&mut self, target: &Actor, from_local_player: bool);

    fn on_actor_death(&mut self, actor: &Actor);

    fn on_animation_changed(&mut self, actor: &Actor, animation_id: i32);

    fn on_actor_despawned(&mut self, actor: &Actor);

    fn on_tick(&mut self, tick: Tick, npcs: &[NpcSnapshot]);

    /// Route a recorded event to the matching callback
    fn handle_event(&mut self, event: &GameEvent) {
        match event {
            GameEvent::InteractionChanged { source, target } => {
                self.on_interaction_changed(source, target.as_ref())
            }
            GameEvent::DamageApplied {
                target,
                from_local_player,
            } => self.on_damage_applied(target, *from_local_player),
            GameEvent::ActorDeath { actor } => self.on_actor_death(actor),
            GameEvent::AnimationChanged {
                actor,
                animation_id,
            } => self.on_animation_changed(actor, *animation_id),
            GameEvent::ActorDespawned { actor } => self.on_actor_despawned(actor),
            GameEvent::Tick { tick, npcs } => self.on_tick(*tick, npcs),
        }
    }
}
