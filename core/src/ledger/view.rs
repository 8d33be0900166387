//! Presentation view models
//!
//! Pure functions over a ledger snapshot. The panel, overlay and context
//! menu render whatever these return.

use monster_monitor_types::{AppConfig, NpcRecord};

use crate::registry::IdentityRegistry;

// ─────────────────────────────────────────────────────────────────────────────
// Panel
// ─────────────────────────────────────────────────────────────────────────────

/// Panel order: the last killed NPC, then NPCs whose death animation isn't
/// catalogued (they need attention), then everything else. Alphabetical
/// within each group.
pub fn panel_order(
    mut records: Vec<NpcRecord>,
    last_killed: Option<&str>,
    registry: &IdentityRegistry,
) -> Vec<NpcRecord> {
    let rank = |record: &NpcRecord| -> u8 {
        if Some(record.name.as_str()) == last_killed {
            0
        } else if !record
            .death_animation_id
            .is_some_and(|id| registry.is_death_animation(id))
        {
            1
        } else {
            2
        }
    };
    records.sort_by(|a, b| rank(a).cmp(&rank(b)).then_with(|| a.name.cmp(&b.name)));
    records
}

/// Case-insensitive substring search over NPC names. Empty query keeps all.
pub fn filter_records(records: Vec<NpcRecord>, query: &str) -> Vec<NpcRecord> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return records;
    }
    records
        .into_iter()
        .filter(|r| r.name.to_lowercase().contains(&query))
        .collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// Overlay
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct OverlayRow {
    pub name: String,
    pub kills_toward_limit: u32,
    pub kill_limit: u32,
    /// 0.0..=1.0
    pub progress: f32,
    pub complete: bool,
}

/// One progress bar per NPC with a limit set
pub fn overlay_rows(records: &[NpcRecord]) -> Vec<OverlayRow> {
    let mut rows: Vec<OverlayRow> = records
        .iter()
        .filter(|r| r.limit_set && !r.ignored)
        .map(|r| OverlayRow {
            name: r.name.clone(),
            kills_toward_limit: r.kills_toward_limit,
            kill_limit: r.kill_limit,
            progress: r.progress_fraction(),
            complete: r.limit_reached(),
        })
        .collect();
    rows.sort_by(|a, b| a.name.cmp(&b.name));
    rows
}

// ─────────────────────────────────────────────────────────────────────────────
// Context menu
// ─────────────────────────────────────────────────────────────────────────────

/// Menu entry types the game uses for the "Attack" option on an NPC
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuEntryKind {
    ExamineNpc,
    NpcSecondOption,
    NpcFifthOption,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuOption {
    Monitor,
    Ignore,
}

/// Which of our options to add to a right-click entry.
///
/// Only "Attack" entries on NPCs with a combat level, and only for NPCs that
/// aren't already limited or ignored.
pub fn menu_options(
    config: &AppConfig,
    kind: MenuEntryKind,
    option_text: &str,
    combat_level: i32,
    record: Option<&NpcRecord>,
) -> Vec<MenuOption> {
    if !config.show_right_click_menu_entries {
        return Vec::new();
    }
    let attack_entry = matches!(
        kind,
        MenuEntryKind::ExamineNpc | MenuEntryKind::NpcSecondOption | MenuEntryKind::NpcFifthOption
    ) && option_text == "Attack";
    if !attack_entry || combat_level <= 0 {
        return Vec::new();
    }

    match record {
        Some(r) if r.limit_set || r.ignored => Vec::new(),
        _ => vec![MenuOption::Monitor, MenuOption::Ignore],
    }
}
