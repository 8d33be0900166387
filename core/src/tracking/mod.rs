mod animation;
mod engagement;

pub use animation::AnimationBuffer;
pub use engagement::{
    DetectionState, EngagementRecord, EngagementTracker, GRACE_PERIOD_TICKS,
    INTERACTION_TIMEOUT_TICKS, SweepResult,
};
