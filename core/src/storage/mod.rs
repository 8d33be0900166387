//! Kill log storage.
//!
//! Each player profile gets its own directory holding the kill log
//! (`monster_monitor_log.json`) and the unknown death animation log.

mod error;
mod json_store;
mod worker;

pub use error::StorageError;
pub use json_store::{
    JsonFileStore, KILL_LOG_FILENAME, KillMap, KillStore, UNKNOWN_ANIMATIONS_FILENAME,
};
pub use worker::{PersistenceHandle, PersistenceWorker, StoreCommand};

use std::path::{Path, PathBuf};

/// Profile used before the player has logged in
pub const DEFAULT_PROFILE: &str = "default";

/// Storage directory for a player.
/// Resolves to `~/.local/share/monster-monitor/{player}/` unless `base` overrides the root.
pub fn profile_dir(base: Option<&Path>, player: &str) -> PathBuf {
    let root = match base {
        Some(base) => base.to_path_buf(),
        None => dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("monster-monitor"),
    };
    root.join(sanitize_profile_name(player))
}

/// Player names may contain characters that aren't valid in paths.
pub fn sanitize_profile_name(player: &str) -> String {
    let cleaned: String = player
        .trim()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() {
        DEFAULT_PROFILE.to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_names_are_path_safe() {
        assert_eq!(sanitize_profile_name("Zezima"), "Zezima");
        assert_eq!(sanitize_profile_name("Iron Man/2"), "Iron_Man_2");
        assert_eq!(sanitize_profile_name("  "), DEFAULT_PROFILE);
    }

    #[test]
    fn base_override() {
        let dir = profile_dir(Some(Path::new("/tmp/mm")), "Zezima");
        assert_eq!(dir, PathBuf::from("/tmp/mm/Zezima"));
    }
}
