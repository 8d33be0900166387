//! Notification sink
//!
//! The core says *what* happened; the sink decides how to show it (chat
//! line, sound, popup). Sinks are called from the game thread and from the
//! persistence worker, so they must be thread-safe.

use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// Kill limit just reached. `message` is the rendered user template.
    LimitReached { npc: String, message: String },
    /// Credited kill with an uncatalogued death animation
    UnknownAnimationSeen { npc: String, animation_id: i32 },
    /// Kill log could not be written; counts are still right in memory
    SaveFailed { reason: String },
}

pub trait NotificationSink: Send + Sync {
    fn notify(&self, notification: &Notification);
}

/// Logs notifications through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl NotificationSink for TracingNotifier {
    fn notify(&self, notification: &Notification) {
        match notification {
            Notification::LimitReached { npc, message } => {
                tracing::info!(npc = %npc, "{}", message);
            }
            Notification::UnknownAnimationSeen { npc, animation_id } => {
                tracing::warn!(
                    npc = %npc,
                    animation_id,
                    "Unknown death animation detected for NPC: {} (Animation ID: {})",
                    npc,
                    animation_id
                );
            }
            Notification::SaveFailed { reason } => {
                tracing::error!(reason = %reason, "Kill log was not saved");
            }
        }
    }
}

/// Keeps every notification in memory
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    received: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take(&self) -> Vec<Notification> {
        match self.received.lock() {
            Ok(mut received) => std::mem::take(&mut *received),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }
}

impl NotificationSink for RecordingNotifier {
    fn notify(&self, notification: &Notification) {
        if let Ok(mut received) = self.received.lock() {
            received.push(notification.clone());
        }
    }
}
