pub mod detector;
pub mod handler;
pub mod signal;

mod health_poll;

#[cfg(test)]
mod detector_tests;

pub use detector::KillDetector;
pub use handler::{SignalHandler, SignalLog};
pub use health_poll::{DEATH_HEALTH_RATIO, HealthPoller};
pub use signal::{DetectionChannel, KillSignal, SuppressReason};
