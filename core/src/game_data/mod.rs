mod death_animations;
mod npc_tables;

pub use death_animations::{DEATH_ANIMATIONS, NO_ANIMATION, is_known_death_animation};
pub use npc_tables::{
    DESPAWN_EXCLUDED_IDS, EXCLUDED_IDS, EXCLUDED_NAMES, MULTI_PHASE_BOSSES, MultiPhaseBoss,
    SPECIAL_NPCS, SpecialNpc,
};
