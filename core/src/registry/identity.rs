//! NPC identity classification
//!
//! Decides what a `(type_id, display name)` pair means for kill attribution.
//! Read-only after construction; share it behind an `Arc`.

use hashbrown::{HashMap, HashSet};

use monster_monitor_types::normalize_npc_name;

use super::definition::RegistryConfig;
use crate::game_data::{
    DEATH_ANIMATIONS, DESPAWN_EXCLUDED_IDS, EXCLUDED_IDS, EXCLUDED_NAMES, MULTI_PHASE_BOSSES,
    NO_ANIMATION, SPECIAL_NPCS,
};

/// What a single NPC instance represents for kill attribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Classification {
    Ordinary,
    IntermediatePhase,
    FinalPhase,
    /// Companion or decorative entity; never credited
    Excluded,
    /// Never fires a death event; credited by health polling only
    SpecialPolled,
}

impl Classification {
    /// Whether a death of this classification is a logical kill.
    pub fn is_creditable(self) -> bool {
        matches!(self, Classification::Ordinary | Classification::FinalPhase)
    }
}

#[derive(Debug, Clone)]
struct BossEntry {
    name: String,
    phase_ids: HashSet<i32>,
    final_ids: HashSet<i32>,
}

#[derive(Debug, Clone)]
struct SpecialEntry {
    name: String,
    ids: HashSet<i32>,
}

#[derive(Debug, Clone, Default)]
pub struct IdentityRegistry {
    death_animations: HashMap<i32, String>,
    bosses: Vec<BossEntry>,
    boss_by_id: HashMap<i32, usize>,
    /// lowercase name -> index into `bosses`
    boss_by_name: HashMap<String, usize>,
    specials: Vec<SpecialEntry>,
    special_by_id: HashMap<i32, usize>,
    special_by_name: HashMap<String, usize>,
    excluded_names: HashSet<String>,
    excluded_ids: HashSet<i32>,
    despawn_excluded_ids: HashSet<i32>,
}

impl IdentityRegistry {
    /// Registry with no entries; every NPC is ordinary.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Registry populated from the compiled-in tables.
    pub fn builtin() -> Self {
        let mut registry = Self::empty();

        for (&id, &name) in DEATH_ANIMATIONS.entries() {
            registry.death_animations.insert(id, name.to_string());
        }
        for boss in MULTI_PHASE_BOSSES {
            registry.upsert_boss(boss.name, boss.phase_ids, boss.final_ids);
        }
        for special in SPECIAL_NPCS {
            registry.upsert_special(special.name, special.ids);
        }
        registry
            .excluded_names
            .extend(EXCLUDED_NAMES.iter().map(|n| n.to_lowercase()));
        registry.excluded_ids.extend(EXCLUDED_IDS.iter().copied());
        registry
            .despawn_excluded_ids
            .extend(DESPAWN_EXCLUDED_IDS.iter().copied());

        registry
    }

    /// Layer a registry file over this registry. Bosses and specials with
    /// the same (case-insensitive) name are replaced; everything else is added.
    pub fn merged(mut self, config: &RegistryConfig) -> Self {
        for anim in &config.death_animations {
            if anim.id == NO_ANIMATION {
                continue;
            }
            self.death_animations.insert(anim.id, anim.name.clone());
        }
        for boss in &config.bosses {
            self.upsert_boss(&boss.name, &boss.phase_ids, &boss.final_ids);
        }
        for special in &config.specials {
            self.upsert_special(&special.name, &special.ids);
        }
        self.excluded_names
            .extend(config.excluded.names.iter().map(|n| n.to_lowercase()));
        self.excluded_ids.extend(config.excluded.ids.iter().copied());
        self.despawn_excluded_ids
            .extend(config.despawn_excluded.ids.iter().copied());
        self
    }

    fn upsert_boss(&mut self, name: &str, phase_ids: &[i32], final_ids: &[i32]) {
        let key = name.to_lowercase();
        let entry = BossEntry {
            name: name.to_string(),
            phase_ids: phase_ids.iter().copied().collect(),
            final_ids: final_ids.iter().copied().collect(),
        };

        let idx = match self.boss_by_name.get(&key) {
            Some(&idx) => {
                let old = std::mem::replace(&mut self.bosses[idx], entry);
                for id in old.phase_ids.iter().chain(old.final_ids.iter()) {
                    if self.boss_by_id.get(id) == Some(&idx) {
                        self.boss_by_id.remove(id);
                    }
                }
                idx
            }
            None => {
                self.bosses.push(entry);
                self.bosses.len() - 1
            }
        };

        self.boss_by_name.insert(key, idx);
        let boss = &self.bosses[idx];
        for &id in boss.phase_ids.iter().chain(boss.final_ids.iter()) {
            self.boss_by_id.insert(id, idx);
        }
    }

    fn upsert_special(&mut self, name: &str, ids: &[i32]) {
        let key = name.to_lowercase();
        let entry = SpecialEntry {
            name: name.to_string(),
            ids: ids.iter().copied().collect(),
        };

        let idx = match self.special_by_name.get(&key) {
            Some(&idx) => {
                let old = std::mem::replace(&mut self.specials[idx], entry);
                for id in &old.ids {
                    if self.special_by_id.get(id) == Some(&idx) {
                        self.special_by_id.remove(id);
                    }
                }
                idx
            }
            None => {
                self.specials.push(entry);
                self.specials.len() - 1
            }
        };

        self.special_by_name.insert(key, idx);
        for &id in &self.specials[idx].ids {
            self.special_by_id.insert(id, idx);
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Classification
    // ─────────────────────────────────────────────────────────────────────────

    /// Classify an instance. Precedence: excluded, special, multi-phase, ordinary.
    pub fn classify(&self, type_id: i32, name: &str) -> Classification {
        if self.is_excluded(type_id, name) {
            return Classification::Excluded;
        }
        if self.is_special(type_id, name) {
            return Classification::SpecialPolled;
        }
        self.phase_of(type_id, name)
    }

    /// Multi-phase classification only (ignores exclusion and special rules).
    ///
    /// Type id membership wins; a name match with an unlisted type id is
    /// treated as an intermediate phase of that boss.
    pub fn phase_of(&self, type_id: i32, name: &str) -> Classification {
        match self.boss_entry(type_id, name) {
            Some(boss) if boss.final_ids.contains(&type_id) => Classification::FinalPhase,
            Some(_) => Classification::IntermediatePhase,
            None => Classification::Ordinary,
        }
    }

    fn boss_entry(&self, type_id: i32, name: &str) -> Option<&BossEntry> {
        let idx = self
            .boss_by_id
            .get(&type_id)
            .or_else(|| self.boss_by_name.get(&name.to_lowercase()))?;
        self.bosses.get(*idx)
    }

    pub fn is_excluded(&self, type_id: i32, name: &str) -> bool {
        self.excluded_ids.contains(&type_id) || self.excluded_names.contains(&name.to_lowercase())
    }

    pub fn is_special(&self, type_id: i32, name: &str) -> bool {
        self.special_by_id.contains_key(&type_id)
            || self.special_by_name.contains_key(&name.to_lowercase())
    }

    /// Despawn is routine for this type (diving, burrowing, skilling bosses)
    pub fn is_despawn_excluded(&self, type_id: i32) -> bool {
        self.despawn_excluded_ids.contains(&type_id)
    }

    /// The name a kill is credited under.
    ///
    /// Multi-phase bosses collapse to the boss name (e.g. Dusk credits
    /// "Grotesque Guardians"); everything else keeps its cleaned display name.
    pub fn logical_name(&self, type_id: i32, raw_name: Option<&str>) -> String {
        let name = normalize_npc_name(raw_name);
        match self.boss_entry(type_id, &name) {
            Some(boss) => boss.name.clone(),
            None => name,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Death animations
    // ─────────────────────────────────────────────────────────────────────────

    pub fn is_death_animation(&self, animation_id: i32) -> bool {
        animation_id != NO_ANIMATION && self.death_animations.contains_key(&animation_id)
    }

    pub fn death_animation_name(&self, animation_id: i32) -> Option<&str> {
        self.death_animations.get(&animation_id).map(String::as_str)
    }

    /// (death animations, bosses, specials) for startup logging
    pub fn counts(&self) -> (usize, usize, usize) {
        (
            self.death_animations.len(),
            self.bosses.len(),
            self.specials.len(),
        )
    }
}
