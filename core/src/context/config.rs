//! Application configuration
//!
//! This module re-exports the shared config type from monster-monitor-types
//! and provides persistence for it.

use std::path::{Path, PathBuf};

pub use monster_monitor_types::AppConfig;

use super::error::ConfigError;

const APP_NAME: &str = "monster-monitor";
const CONFIG_NAME: &str = "config";

// ─────────────────────────────────────────────────────────────────────────────
// AppConfig Extensions
// ─────────────────────────────────────────────────────────────────────────────

/// Extension trait for AppConfig persistence
pub trait AppConfigExt: Sized {
    fn load() -> Result<Self, ConfigError>;
    /// Load, falling back to defaults (with a warning) on any error
    fn load_or_default() -> Self;
    fn save(&self) -> Result<(), ConfigError>;
    fn load_from(path: &Path) -> Result<Self, ConfigError>;
    fn save_to(&self, path: &Path) -> Result<(), ConfigError>;
    fn config_path() -> Result<PathBuf, ConfigError>;
    /// Storage root override, if configured
    fn data_dir(&self) -> Option<PathBuf>;
    /// Extra identity registry file, if configured
    fn registry_file(&self) -> Option<PathBuf>;
}

impl AppConfigExt for AppConfig {
    fn load() -> Result<Self, ConfigError> {
        confy::load(APP_NAME, CONFIG_NAME).map_err(ConfigError::Load)
    }

    fn load_or_default() -> Self {
        match Self::load() {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(error = %e, "Using default configuration");
                Self::default()
            }
        }
    }

    fn save(&self) -> Result<(), ConfigError> {
        confy::store(APP_NAME, CONFIG_NAME, self).map_err(ConfigError::Save)
    }

    fn load_from(path: &Path) -> Result<Self, ConfigError> {
        confy::load_path(path).map_err(ConfigError::Load)
    }

    fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        confy::store_path(path, self).map_err(ConfigError::Save)
    }

    fn config_path() -> Result<PathBuf, ConfigError> {
        confy::get_configuration_file_path(APP_NAME, CONFIG_NAME).map_err(ConfigError::Load)
    }

    fn data_dir(&self) -> Option<PathBuf> {
        self.data_directory
            .as_deref()
            .filter(|d| !d.trim().is_empty())
            .map(PathBuf::from)
    }

    fn registry_file(&self) -> Option<PathBuf> {
        self.registry_path
            .as_deref()
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_and_load_path() {
        let dir = std::env::temp_dir().join(format!("mm-config-{}", std::process::id()));
        let path = dir.join("config.toml");

        let config = AppConfig {
            default_kill_limit: 25,
            custom_notification_message: "{npc} done".to_string(),
            data_directory: Some("/tmp/kills".to_string()),
            ..AppConfig::default()
        };
        config.save_to(&path).unwrap();

        let loaded = AppConfig::load_from(&path).unwrap();
        assert_eq!(loaded, config);
        assert_eq!(loaded.data_dir(), Some(PathBuf::from("/tmp/kills")));
        assert_eq!(loaded.registry_file(), None);

        std::fs::remove_dir_all(&dir).ok();
    }
}
