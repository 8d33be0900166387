//! Built-in NPC identity tables
//!
//! Baseline data for the identity registry. Several ids here are best guesses
//! gathered while fighting the encounters; corrections belong in a registry
//! TOML file (see `registry::loader`) rather than in detector code.

/// A boss whose fight cycles through several NPC type ids.
/// Only a death while in one of `final_ids` is the real kill.
#[derive(Debug, Clone, Copy)]
pub struct MultiPhaseBoss {
    pub name: &'static str,
    pub phase_ids: &'static [i32],
    pub final_ids: &'static [i32],
}

pub static MULTI_PHASE_BOSSES: &[MultiPhaseBoss] = &[
    MultiPhaseBoss {
        name: "Zalcano",
        phase_ids: &[8360, 8361],
        final_ids: &[8362],
    },
    MultiPhaseBoss {
        name: "The Nightmare",
        phase_ids: &[9425, 9426],
        final_ids: &[9427],
    },
    MultiPhaseBoss {
        name: "Phosani's Nightmare",
        phase_ids: &[11051, 11052],
        final_ids: &[11053],
    },
    MultiPhaseBoss {
        name: "Zulrah",
        phase_ids: &[2042, 2043],
        final_ids: &[2044],
    },
    // Dusk is the one that dies last
    MultiPhaseBoss {
        name: "Grotesque Guardians",
        phase_ids: &[8059],
        final_ids: &[8060],
    },
    MultiPhaseBoss {
        name: "Giant Mole",
        phase_ids: &[963],
        final_ids: &[965],
    },
    MultiPhaseBoss {
        name: "Corporeal Beast",
        phase_ids: &[319],
        final_ids: &[320],
    },
    MultiPhaseBoss {
        name: "Alchemical Hydra",
        phase_ids: &[7888, 7889],
        final_ids: &[7890],
    },
    MultiPhaseBoss {
        name: "Vorkath",
        phase_ids: &[8615, 8616, 8617],
        final_ids: &[8618],
    },
    MultiPhaseBoss {
        name: "Verzik Vitur",
        phase_ids: &[9033, 8251],
        final_ids: &[9034, 8250],
    },
    MultiPhaseBoss {
        name: "Phantom Muspah",
        phase_ids: &[12344],
        final_ids: &[12345],
    },
    MultiPhaseBoss {
        name: "Kalphite Queen",
        phase_ids: &[4303],
        final_ids: &[4304],
    },
    MultiPhaseBoss {
        name: "Vanstrom Klause",
        phase_ids: &[],
        final_ids: &[8240],
    },
    MultiPhaseBoss {
        name: "Ranis Drakan",
        phase_ids: &[8242, 8243, 8244, 8245, 8246],
        final_ids: &[8247, 8248],
    },
    // Also polled (see SPECIAL_NPCS); only the final form is credited
    MultiPhaseBoss {
        name: "The Hueycoatl",
        phase_ids: &[14009],
        final_ids: &[14012],
    },
];

/// Bosses that never fire a death event; detected by health-ratio polling.
#[derive(Debug, Clone, Copy)]
pub struct SpecialNpc {
    pub name: &'static str,
    pub ids: &'static [i32],
}

pub static SPECIAL_NPCS: &[SpecialNpc] = &[
    SpecialNpc {
        name: "The Hueycoatl",
        ids: &[14009, 14012],
    },
    SpecialNpc {
        name: "Amoxliatl",
        ids: &[13685],
    },
    SpecialNpc {
        name: "Duke Sucellus",
        ids: &[12166],
    },
    SpecialNpc {
        name: "Blue Moon",
        ids: &[13013],
    },
    SpecialNpc {
        name: "Eclipse Moon",
        ids: &[13012],
    },
    SpecialNpc {
        name: "Blood Moon",
        ids: &[13011],
    },
];

/// Decorative or non-killable companions that must never be credited.
pub static EXCLUDED_NAMES: &[&str] = &["Hueycoatl tail", "Hueycoatl body"];

pub static EXCLUDED_IDS: &[i32] = &[];

/// NPCs whose despawn is routine (diving, burrowing, skilling bosses).
/// Only the despawn channel ignores these; a death event still counts.
pub static DESPAWN_EXCLUDED_IDS: &[i32] = &[
    10530, // Tempoross
    6503, 6504, // Wintertodt
    2042, 2043, 2044, // Zulrah
    963, 965, // Giant Mole
    8360, 8361, 8362, // Zalcano
    4342, 4343, 4344, // Hueycoatl helpers
    8059, 8060, // Grotesque Guardians
];
