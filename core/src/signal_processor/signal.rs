use crate::events::{InstanceId, Tick};

/// How a kill was detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DetectionChannel {
    /// Engine-level actor death event
    ExplicitDeath,
    /// A catalogued death animation played while engaged
    DeathAnimation,
    /// Despawned after an animation that isn't catalogued yet
    UnknownAnimation,
    /// Despawned while engaged, no animation to go on
    Despawn,
    /// Health ratio of a special NPC dropped to the death threshold
    HealthPoll,
}

impl DetectionChannel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ExplicitDeath => "death",
            Self::DeathAnimation => "animation",
            Self::UnknownAnimation => "unknown_animation",
            Self::Despawn => "despawn",
            Self::HealthPoll => "health_poll",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuppressReason {
    IntermediatePhase,
    Excluded,
}

/// Signals emitted by the KillDetector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KillSignal {
    /// One logical kill to credit to `npc`
    KillConfirmed {
        instance_id: InstanceId,
        type_id: i32,
        npc: String,
        channel: DetectionChannel,
        /// Death animation, when the channel saw one
        animation_id: Option<i32>,
        tick: Tick,
    },

    /// Instance died but must not be credited
    KillSuppressed {
        instance_id: InstanceId,
        type_id: i32,
        npc: String,
        reason: SuppressReason,
        tick: Tick,
    },

    /// Credited kill whose death animation isn't catalogued
    UnknownDeathAnimation {
        instance_id: InstanceId,
        npc: String,
        animation_id: i32,
        tick: Tick,
    },
}

impl KillSignal {
    pub fn tick(&self) -> Tick {
        match self {
            Self::KillConfirmed { tick, .. }
            | Self::KillSuppressed { tick, .. }
            | Self::UnknownDeathAnimation { tick, .. } => *tick,
        }
    }

    pub fn npc(&self) -> &str {
        match self {
            Self::KillConfirmed { npc, .. }
            | Self::KillSuppressed { npc, .. }
            | Self::UnknownDeathAnimation { npc, .. } => npc,
        }
    }

    pub fn instance_id(&self) -> InstanceId {
        match self {
            Self::KillConfirmed { instance_id, .. }
            | Self::KillSuppressed { instance_id, .. }
            | Self::UnknownDeathAnimation { instance_id, .. } => *instance_id,
        }
    }
}
