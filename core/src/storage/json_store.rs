use std::collections::{BTreeMap, HashMap};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use monster_monitor_types::NpcRecord;

use super::error::StorageError;

/// Kill records keyed by logical NPC name
pub type KillMap = HashMap<String, NpcRecord>;

pub const KILL_LOG_FILENAME: &str = "monster_monitor_log.json";
pub const UNKNOWN_ANIMATIONS_FILENAME: &str = "unknown_animations.log";

/// Durable home of one player's kill records.
///
/// Implementations do blocking I/O; the persistence worker calls them off
/// the game thread.
pub trait KillStore: Send + Sync {
    fn load(&self) -> Result<KillMap, StorageError>;

    fn save(&self, records: &KillMap) -> Result<(), StorageError>;

    fn append_unknown_animation(&self, npc: &str, animation_id: i32) -> Result<(), StorageError>;
}

/// One pretty-printed JSON document per player profile.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Store rooted at an existing or to-be-created profile directory
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn log_path(&self) -> PathBuf {
        self.dir.join(KILL_LOG_FILENAME)
    }

    pub fn unknown_animations_path(&self) -> PathBuf {
        self.dir.join(UNKNOWN_ANIMATIONS_FILENAME)
    }

    fn ensure_dir(&self) -> Result<(), StorageError> {
        fs::create_dir_all(&self.dir).map_err(|source| StorageError::CreateDir {
            path: self.dir.clone(),
            source,
        })
    }
}

impl KillStore for JsonFileStore {
    fn load(&self) -> Result<KillMap, StorageError> {
        let path = self.log_path();
        if !path.exists() {
            return Ok(KillMap::new());
        }

        let content = fs::read_to_string(&path).map_err(|source| StorageError::Read {
            path: path.clone(),
            source,
        })?;
        if content.trim().is_empty() {
            return Ok(KillMap::new());
        }

        let mut records: KillMap = serde_json::from_str(&content)
            .map_err(|source| StorageError::Parse { path, source })?;

        // Older logs may have an empty name field; the key is authoritative
        for (name, record) in records.iter_mut() {
            if record.name.is_empty() {
                record.name = name.clone();
            }
        }
        Ok(records)
    }

    fn save(&self, records: &KillMap) -> Result<(), StorageError> {
        self.ensure_dir()?;

        // Sorted so the file diffs cleanly between saves
        let sorted: BTreeMap<&String, &NpcRecord> = records.iter().collect();
        let json = serde_json::to_string_pretty(&sorted).map_err(StorageError::Serialize)?;

        let path = self.log_path();
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(|source| StorageError::Write {
            path: tmp.clone(),
            source,
        })?;
        fs::rename(&tmp, &path).map_err(|source| StorageError::Write { path, source })
    }

    fn append_unknown_animation(&self, npc: &str, animation_id: i32) -> Result<(), StorageError> {
        self.ensure_dir()?;

        let path = self.unknown_animations_path();
        let line = format!(
            "{} - Unknown death animation detected for NPC: {} (Animation ID: {})\n",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
            npc,
            animation_id
        );

        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .and_then(|mut file| file.write_all(line.as_bytes()))
            .map_err(|source| StorageError::Write { path, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store(tag: &str) -> JsonFileStore {
        let dir = std::env::temp_dir().join(format!(
            "mm-store-{}-{}-{}",
            tag,
            std::process::id(),
            chrono::Local::now().timestamp_nanos_opt().unwrap_or_default()
        ));
        JsonFileStore::new(dir)
    }

    #[test]
    fn missing_file_loads_empty() {
        let store = temp_store("missing");
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn save_then_load_is_lossless() {
        let store = temp_store("roundtrip");

        let mut limited = NpcRecord::new("Cow");
        limited.set_limit(5);
        limited.register_kill(Some(5851));
        limited.notify_on_limit = true;

        let mut ignored = NpcRecord::new("Chicken");
        ignored.set_ignored(true);

        let mut records = KillMap::new();
        records.insert("Cow".to_string(), limited);
        records.insert("Chicken".to_string(), ignored);
        records.insert("Goblin".to_string(), NpcRecord::new("Goblin"));

        store.save(&records).unwrap();
        assert_eq!(store.load().unwrap(), records);
        assert!(!store.dir().join("monster_monitor_log.json.tmp").exists());

        fs::remove_dir_all(store.dir()).ok();
    }

    #[test]
    fn corrupt_file_is_reported() {
        let store = temp_store("corrupt");
        fs::create_dir_all(store.dir()).unwrap();
        fs::write(store.log_path(), "{ not json").unwrap();

        assert!(matches!(store.load(), Err(StorageError::Parse { .. })));
        fs::remove_dir_all(store.dir()).ok();
    }

    #[test]
    fn unknown_animations_are_appended() {
        let store = temp_store("unknown");
        store.append_unknown_animation("Strange beast", 4001).unwrap();
        store.append_unknown_animation("Strange beast", 4002).unwrap();

        let log = fs::read_to_string(store.unknown_animations_path()).unwrap();
        let lines: Vec<&str> = log.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with(
            "Unknown death animation detected for NPC: Strange beast (Animation ID: 4001)"
        ));

        fs::remove_dir_all(store.dir()).ok();
    }
}
