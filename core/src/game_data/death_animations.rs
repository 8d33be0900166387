//! Known NPC death animations.
//!
//! Hand-catalogued from in-game observation. Animations missing from this
//! table are still credited as kills and written to the unknown-animation log
//! so they can be added here later.

use phf::phf_map;

/// Animation id the engine reports when an actor is idle / not animating.
pub const NO_ANIMATION: i32 = -1;

/// Death animation lookup table (animation id -> what it was catalogued from)
pub static DEATH_ANIMATIONS: phf::Map<i32, &'static str> = phf_map! {
    // ═══════════════════════════════════════════════════════════════════════
    // Humanoids
    // ═══════════════════════════════════════════════════════════════════════
    836i32 => "Human",              // Men, women, guards, black knights
    102i32 => "Dwarf",
    2553i32 => "Wizard",
    6182i32 => "Goblin",
    6190i32 => "Goblin (alt)",
    5491i32 => "Skeleton",

    // ═══════════════════════════════════════════════════════════════════════
    // Animals
    // ═══════════════════════════════════════════════════════════════════════
    5851i32 => "Cow",               // Includes calves
    5336i32 => "Ram",
    5389i32 => "Chicken",
    3468i32 => "Duck",
    1795i32 => "Frog",
    2707i32 => "Rat",
    4935i32 => "Giant rat",
    4929i32 => "Black bear",
    6256i32 => "Scorpion",
    6251i32 => "Spider",
    5329i32 => "Giant spider",

    // ═══════════════════════════════════════════════════════════════════════
    // Slayer & misc
    // ═══════════════════════════════════════════════════════════════════════
    172i32 => "Imp",
    1520i32 => "Gargoyle",
    7813i32 => "Marble gargoyle",
    2778i32 => "Lizard",
    1568i32 => "Rockslug",
    3327i32 => "Zygomite",
    3993i32 => "Cave kraken",
    1580i32 => "Icefiend",
    1676i32 => "Corporeal Beast",
};

/// Check if an animation id is a catalogued death animation
pub fn is_known_death_animation(animation_id: i32) -> bool {
    animation_id != NO_ANIMATION && DEATH_ANIMATIONS.contains_key(&animation_id)
}
