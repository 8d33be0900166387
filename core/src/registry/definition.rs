//! Identity registry file format
//!
//! A registry file is TOML with a format version and any subset of the
//! tables below. Entries are merged over the built-in tables at startup.
//!
//! ```toml
//! version = 1
//!
//! [[death_animation]]
//! id = 836
//! name = "Human"
//!
//! [[boss]]
//! name = "Vorkath"
//! phase_ids = [8615, 8616, 8617]
//! final_ids = [8618]
//!
//! [excluded]
//! names = ["Hueycoatl tail"]
//! ids = []
//!
//! [despawn_excluded]
//! ids = [10530]
//!
//! [[special]]
//! name = "Duke Sucellus"
//! ids = [12166]
//! ```

use serde::{Deserialize, Serialize};

/// Newest registry format this build understands
pub const REGISTRY_FORMAT_VERSION: u32 = 1;

fn default_version() -> u32 {
    REGISTRY_FORMAT_VERSION
}

/// Root of a registry TOML file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryConfig {
    #[serde(default = "default_version")]
    pub version: u32,

    #[serde(default, rename = "death_animation")]
    pub death_animations: Vec<DeathAnimationDef>,

    #[serde(default, rename = "boss")]
    pub bosses: Vec<BossDef>,

    #[serde(default)]
    pub excluded: ExcludedDef,

    #[serde(default)]
    pub despawn_excluded: DespawnExcludedDef,

    #[serde(default, rename = "special")]
    pub specials: Vec<SpecialDef>,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            version: REGISTRY_FORMAT_VERSION,
            death_animations: Vec::new(),
            bosses: Vec::new(),
            excluded: ExcludedDef::default(),
            despawn_excluded: DespawnExcludedDef::default(),
            specials: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeathAnimationDef {
    pub id: i32,
    /// What the animation was catalogued from (informational)
    #[serde(default)]
    pub name: String,
}

/// Multi-phase boss. Replaces a built-in boss with the same name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BossDef {
    pub name: String,
    #[serde(default)]
    pub phase_ids: Vec<i32>,
    pub final_ids: Vec<i32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExcludedDef {
    #[serde(default)]
    pub names: Vec<String>,
    #[serde(default)]
    pub ids: Vec<i32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DespawnExcludedDef {
    #[serde(default)]
    pub ids: Vec<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecialDef {
    pub name: String,
    #[serde(default)]
    pub ids: Vec<i32>,
}
