//! Registry file loading

use std::fs;
use std::path::Path;

use super::definition::{REGISTRY_FORMAT_VERSION, RegistryConfig};
use super::error::RegistryError;
use super::identity::IdentityRegistry;

/// Registry corrections shipped with the crate
pub const BUNDLED_REGISTRY: &str = include_str!("../../data/identity_registry.toml");

/// Parse and validate registry TOML
pub fn parse_registry_config(content: &str) -> Result<RegistryConfig, RegistryError> {
    let config: RegistryConfig = toml::from_str(content).map_err(RegistryError::ParseStr)?;
    validate(&config)?;
    Ok(config)
}

/// Load and validate a registry file
pub fn load_registry_config(path: &Path) -> Result<RegistryConfig, RegistryError> {
    let content = fs::read_to_string(path).map_err(|source| RegistryError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let config: RegistryConfig =
        toml::from_str(&content).map_err(|source| RegistryError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    validate(&config)?;
    Ok(config)
}

fn validate(config: &RegistryConfig) -> Result<(), RegistryError> {
    if config.version > REGISTRY_FORMAT_VERSION {
        return Err(RegistryError::UnsupportedVersion {
            found: config.version,
            supported: REGISTRY_FORMAT_VERSION,
        });
    }
    if let Some(boss) = config.bosses.iter().find(|b| b.final_ids.is_empty()) {
        return Err(RegistryError::MissingFinalIds {
            name: boss.name.clone(),
        });
    }
    Ok(())
}

/// Built-in tables, then the bundled corrections, then an optional user file.
pub fn load_registry(user_path: Option<&Path>) -> Result<IdentityRegistry, RegistryError> {
    let bundled = parse_registry_config(BUNDLED_REGISTRY)?;
    let mut registry = IdentityRegistry::builtin().merged(&bundled);

    if let Some(path) = user_path {
        let user = load_registry_config(path)?;
        tracing::info!(
            path = %path.display(),
            bosses = user.bosses.len(),
            specials = user.specials.len(),
            "Merged user identity registry"
        );
        registry = registry.merged(&user);
    }

    let (animations, bosses, specials) = registry.counts();
    tracing::debug!(animations, bosses, specials, "Identity registry ready");
    Ok(registry)
}
