//! Shared configuration and kill-record types for Monster Monitor
//!
//! This crate contains serializable types that are shared between the
//! kill-attribution core and its presentation collaborators (overlay, panel,
//! popup, context menu). Nothing here touches the filesystem.

use serde::{Deserialize, Serialize};

/// Placeholder used whenever the game reports an NPC without a usable name.
pub const UNNAMED_NPC: &str = "Unnamed NPC";

/// Token replaced with the NPC name in custom notification messages.
pub const NPC_PLACEHOLDER: &str = "{npc}";

// ─────────────────────────────────────────────────────────────────────────────
// Kill Records
// ─────────────────────────────────────────────────────────────────────────────

/// Aggregate kill counters for one logical NPC (keyed by display name).
///
/// Invariants maintained by the mutating methods:
/// - `kills_toward_limit <= kill_limit` whenever `limit_set`
/// - an ignored record never has a limit set
/// - `total_kills` only goes down through [`NpcRecord::reset_count`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NpcRecord {
    pub name: String,
    #[serde(default)]
    pub total_kills: u32,
    #[serde(default)]
    pub kills_toward_limit: u32,
    /// 0 = no limit
    #[serde(default)]
    pub kill_limit: u32,
    #[serde(default)]
    pub limit_set: bool,
    #[serde(default)]
    pub notify_on_limit: bool,
    #[serde(default)]
    pub ignored: bool,
    /// Last death animation credited to this NPC (None if never seen or unknown)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub death_animation_id: Option<i32>,
}

/// Result of crediting a kill to a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KillCredit {
    /// Record is ignored; nothing changed
    Ignored,
    /// Kill counted. `limit_reached` is true only on the kill that
    /// moved progress onto the limit.
    Counted { total: u32, limit_reached: bool },
}

impl NpcRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            total_kills: 0,
            kills_toward_limit: 0,
            kill_limit: 0,
            limit_set: false,
            notify_on_limit: false,
            ignored: false,
            death_animation_id: None,
        }
    }

    /// Credit one kill.
    pub fn register_kill(&mut self, animation_id: Option<i32>) -> KillCredit {
        if self.ignored {
            return KillCredit::Ignored;
        }

        self.total_kills = self.total_kills.saturating_add(1);
        if animation_id.is_some() {
            self.death_animation_id = animation_id;
        }

        let mut limit_reached = false;
        if self.limit_set && self.kills_toward_limit < self.kill_limit {
            self.kills_toward_limit += 1;
            limit_reached = self.kills_toward_limit == self.kill_limit;
        }

        KillCredit::Counted {
            total: self.total_kills,
            limit_reached,
        }
    }

    /// Set (limit > 0) or clear (limit == 0) the kill limit.
    /// Never touches `total_kills`.
    pub fn set_limit(&mut self, limit: u32) {
        self.kill_limit = limit;
        self.limit_set = limit > 0;
        if self.limit_set {
            self.kills_toward_limit = self.kills_toward_limit.min(limit);
        } else {
            self.kills_toward_limit = 0;
        }
    }

    /// Ignoring an NPC drops any limit tracking; un-ignoring leaves counters alone.
    pub fn set_ignored(&mut self, ignored: bool) {
        self.ignored = ignored;
        if ignored {
            self.kill_limit = 0;
            self.limit_set = false;
            self.kills_toward_limit = 0;
        }
    }

    pub fn reset_count(&mut self) {
        self.total_kills = 0;
        self.kills_toward_limit = 0;
    }

    pub fn reset_progress(&mut self) {
        self.kills_toward_limit = 0;
    }

    /// Progress toward the limit as a fraction in `0.0..=1.0` (0 when no limit).
    pub fn progress_fraction(&self) -> f32 {
        if !self.limit_set || self.kill_limit == 0 {
            return 0.0;
        }
        (self.kills_toward_limit as f32 / self.kill_limit as f32).clamp(0.0, 1.0)
    }

    pub fn limit_reached(&self) -> bool {
        self.limit_set && self.kills_toward_limit >= self.kill_limit
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// App Config
// ─────────────────────────────────────────────────────────────────────────────

fn default_true() -> bool {
    true
}

fn default_kill_limit() -> u32 {
    100
}

fn default_notification_message() -> String {
    "Kill limit reached for {npc}".to_string()
}

/// User-facing plugin settings.
///
/// Note: Persistence methods (load/save) are provided by monster-monitor-core
/// via the `AppConfigExt` trait.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_true")]
    pub show_overlay: bool,
    /// Global switch for kill-limit notifications (each record also has its own flag)
    #[serde(default = "default_true")]
    pub notify_on_limit: bool,
    /// Limit applied by the context-menu "Monitor" action
    #[serde(default = "default_kill_limit")]
    pub default_kill_limit: u32,
    #[serde(default = "default_true")]
    pub show_chat_notifications: bool,
    /// Must contain `{npc}`; falls back to the default message otherwise
    #[serde(default = "default_notification_message")]
    pub custom_notification_message: String,
    #[serde(default = "default_true")]
    pub notify_on_unknown_death_animation: bool,
    #[serde(default = "default_true")]
    pub enable_sound_alerts: bool,
    #[serde(default = "default_true")]
    pub show_right_click_menu_entries: bool,
    /// Extra identity-registry TOML merged over the built-in tables
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registry_path: Option<String>,
    /// Override for the kill-log storage root
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_directory: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            show_overlay: true,
            notify_on_limit: true,
            default_kill_limit: default_kill_limit(),
            show_chat_notifications: true,
            custom_notification_message: default_notification_message(),
            notify_on_unknown_death_animation: true,
            enable_sound_alerts: true,
            show_right_click_menu_entries: true,
            registry_path: None,
            data_directory: None,
        }
    }
}

impl AppConfig {
    /// Render the kill-limit message for an NPC.
    pub fn limit_message(&self, npc_name: &str) -> String {
        format_notification_message(&self.custom_notification_message, npc_name)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Formatting
// ─────────────────────────────────────────────────────────────────────────────

/// Substitute `{npc}` in a user template. Templates without the placeholder
/// are rejected in favour of the default message so the NPC is always named.
pub fn format_notification_message(template: &str, npc_name: &str) -> String {
    if template.contains(NPC_PLACEHOLDER) {
        template.replace(NPC_PLACEHOLDER, npc_name)
    } else {
        default_notification_message().replace(NPC_PLACEHOLDER, npc_name)
    }
}

/// Canonical form of an NPC display name.
///
/// Game names can carry non-breaking spaces and stray padding; records are
/// keyed by the cleaned-up form. Empty names collapse to [`UNNAMED_NPC`].
pub fn normalize_npc_name(raw: Option<&str>) -> String {
    let Some(raw) = raw else {
        return UNNAMED_NPC.to_string();
    };
    let cleaned = raw
        .replace('\u{a0}', " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    if cleaned.is_empty() {
        UNNAMED_NPC.to_string()
    } else {
        cleaned
    }
}
