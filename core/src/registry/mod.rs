//! Identity registry
//!
//! Static knowledge about NPC identities: death animations, multi-phase
//! bosses, excluded companions and bosses that must be health-polled.

mod definition;
mod error;
mod identity;
mod loader;

pub use definition::{
    BossDef, DeathAnimationDef, DespawnExcludedDef, ExcludedDef, REGISTRY_FORMAT_VERSION,
    RegistryConfig, SpecialDef,
};
pub use error::RegistryError;
pub use identity::{Classification, IdentityRegistry};
pub use loader::{BUNDLED_REGISTRY, load_registry, load_registry_config, parse_registry_config};
