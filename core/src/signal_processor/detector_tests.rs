//! Scenario tests for the kill detector
//!
//! Each test drives the detector tick by tick the way the host would.

use std::sync::Arc;

use crate::events::{Actor, GameEvent, NpcSnapshot, Tick};
use crate::registry::{BossDef, Classification, ExcludedDef, IdentityRegistry, RegistryConfig};

use super::{DetectionChannel, KillDetector, KillSignal, SuppressReason};

const IMP: i32 = 5007;
const GOBLIN: i32 = 3029;
const DUKE: i32 = 12166;

fn make_detector() -> KillDetector {
    KillDetector::new(Arc::new(IdentityRegistry::builtin()))
}

/// Registry with one made-up boss: phases 1 and 2, final form 3
fn make_boss_detector() -> KillDetector {
    let config = RegistryConfig {
        bosses: vec![BossDef {
            name: "Boss".to_string(),
            phase_ids: vec![1, 2],
            final_ids: vec![3],
        }],
        ..Default::default()
    };
    KillDetector::new(Arc::new(IdentityRegistry::builtin().merged(&config)))
}

fn npc(instance_id: i32, type_id: i32, name: &str) -> Actor {
    Actor::Npc(NpcSnapshot::new(instance_id, type_id, name))
}

fn advance_to(detector: &mut KillDetector, tick: Tick) -> Vec<KillSignal> {
    let mut signals = Vec::new();
    let start = detector.now() + 1;
    for t in start..=tick {
        signals.extend(detector.tick(t, &[]));
    }
    signals
}

fn hit(detector: &mut KillDetector, actor: &Actor) -> Vec<KillSignal> {
    detector.damage_applied(actor, true)
}

fn kills(signals: &[KillSignal]) -> Vec<(&str, DetectionChannel)> {
    signals
        .iter()
        .filter_map(|s| match s {
            KillSignal::KillConfirmed { npc, channel, .. } => Some((npc.as_str(), *channel)),
            _ => None,
        })
        .collect()
}

// ═══════════════════════════════════════════════════════════════════════════
// Channels
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn explicit_death_while_engaged() {
    let mut detector = make_detector();
    let goblin = npc(1, GOBLIN, "Goblin");

    detector.tick(1, &[]);
    hit(&mut detector, &goblin);
    let signals = detector.actor_death(&goblin);

    assert_eq!(kills(&signals), vec![("Goblin", DetectionChannel::ExplicitDeath)]);
}

#[test]
fn targeting_without_a_hit_never_counts() {
    let mut detector = make_detector();
    let goblin = npc(1, GOBLIN, "Goblin");

    detector.tick(1, &[]);
    detector.interaction_changed(&Actor::LocalPlayer, Some(&goblin));
    assert!(detector.actor_death(&goblin).is_empty());
    assert!(detector.actor_despawned(&goblin).is_empty());
    assert!(advance_to(&mut detector, 5).is_empty());
}

#[test]
fn damage_from_others_is_ignored() {
    let mut detector = make_detector();
    let goblin = npc(1, GOBLIN, "Goblin");

    detector.tick(1, &[]);
    detector.damage_applied(&goblin, false);
    assert!(detector.actor_death(&goblin).is_empty());
}

#[test]
fn known_death_animation_resolves_immediately() {
    // Imp engaged at tick 100, death animation 172 at tick 103
    let mut detector = make_detector();
    let imp = npc(42, IMP, "Imp");

    detector.tick(100, &[]);
    hit(&mut detector, &imp);
    advance_to(&mut detector, 103);

    let signals = detector.animation_changed(&imp, 172);
    assert_eq!(signals.len(), 1);
    match &signals[0] {
        KillSignal::KillConfirmed {
            instance_id,
            npc,
            channel,
            animation_id,
            tick,
            ..
        } => {
            assert_eq!(*instance_id, 42);
            assert_eq!(npc, "Imp");
            assert_eq!(*channel, DetectionChannel::DeathAnimation);
            assert_eq!(*animation_id, Some(172));
            assert_eq!(*tick, 103);
        }
        other => panic!("expected a kill, got {:?}", other),
    }
}

#[test]
fn despawn_after_unknown_animation_counts_and_reports_it() {
    let mut detector = make_detector();
    let beast = npc(9, 777, "Strange beast");

    detector.tick(1, &[]);
    hit(&mut detector, &beast);
    detector.animation_changed(&beast, 4000);
    detector.animation_changed(&beast, -1);
    detector.animation_changed(&beast, 4001);

    assert!(detector.actor_despawned(&beast).is_empty());
    // Grace window: 2 ticks after the despawn
    assert!(advance_to(&mut detector, 2).is_empty());
    let signals = advance_to(&mut detector, 3);

    assert_eq!(
        kills(&signals),
        vec![("Strange beast", DetectionChannel::UnknownAnimation)]
    );
    assert!(signals.iter().any(|s| matches!(
        s,
        KillSignal::UnknownDeathAnimation {
            animation_id: 4001,
            ..
        }
    )));
}

#[test]
fn despawn_without_animation_falls_back_to_despawn() {
    let mut detector = make_detector();
    let goblin = npc(1, GOBLIN, "Goblin");

    detector.tick(1, &[]);
    hit(&mut detector, &goblin);
    detector.actor_despawned(&goblin);

    let signals = advance_to(&mut detector, 3);
    assert_eq!(kills(&signals), vec![("Goblin", DetectionChannel::Despawn)]);
}

#[test]
fn death_during_grace_resolves_once() {
    let mut detector = make_detector();
    let goblin = npc(1, GOBLIN, "Goblin");

    detector.tick(1, &[]);
    hit(&mut detector, &goblin);
    detector.actor_despawned(&goblin);
    let signals = detector.actor_death(&goblin);
    assert_eq!(kills(&signals), vec![("Goblin", DetectionChannel::ExplicitDeath)]);

    // Grace deadline passes with nothing left to resolve
    assert!(advance_to(&mut detector, 5).is_empty());
}

#[test]
fn routine_despawn_is_ignored_but_death_still_counts() {
    let mut detector = make_detector();
    let tempoross = npc(3, 10530, "Tempoross");

    detector.tick(1, &[]);
    hit(&mut detector, &tempoross);
    detector.actor_despawned(&tempoross);
    assert!(advance_to(&mut detector, 4).is_empty());

    let tempoross = npc(4, 10530, "Tempoross");
    hit(&mut detector, &tempoross);
    let signals = detector.actor_death(&tempoross);
    assert_eq!(kills(&signals).len(), 1);
}

// ═══════════════════════════════════════════════════════════════════════════
// Idempotence
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn duplicate_signals_yield_one_kill() {
    let mut detector = make_detector();
    let goblin = npc(1, GOBLIN, "Goblin");

    detector.tick(1, &[]);
    hit(&mut detector, &goblin);

    let mut signals = detector.actor_death(&goblin);
    signals.extend(detector.actor_death(&goblin));
    signals.extend(detector.animation_changed(&goblin, 6182));
    signals.extend(detector.actor_despawned(&goblin));
    signals.extend(detector.actor_despawned(&goblin));
    signals.extend(advance_to(&mut detector, 6));

    assert_eq!(kills(&signals).len(), 1);
}

#[test]
fn duplicated_despawn_yields_one_kill() {
    let mut detector = make_detector();
    let goblin = npc(1, GOBLIN, "Goblin");

    detector.tick(1, &[]);
    hit(&mut detector, &goblin);
    let mut signals = detector.actor_despawned(&goblin);
    signals.extend(detector.actor_despawned(&goblin));
    signals.extend(advance_to(&mut detector, 3));
    signals.extend(detector.actor_despawned(&goblin));
    signals.extend(advance_to(&mut detector, 8));

    assert_eq!(kills(&signals).len(), 1);
}

#[test]
fn hit_on_same_tick_as_resolution_does_not_reopen() {
    let mut detector = make_detector();
    let goblin = npc(1, GOBLIN, "Goblin");

    detector.tick(1, &[]);
    hit(&mut detector, &goblin);
    detector.actor_death(&goblin);

    // Trailing hitsplat on the same tick
    hit(&mut detector, &goblin);
    assert!(detector.actor_death(&goblin).is_empty());
}

#[test]
fn reused_index_counts_again_on_later_tick() {
    let mut detector = make_detector();
    let first = npc(1, GOBLIN, "Goblin");
    let second = npc(1, IMP, "Imp");

    detector.tick(1, &[]);
    hit(&mut detector, &first);
    let mut signals = detector.actor_death(&first);

    advance_to(&mut detector, 20);
    hit(&mut detector, &second);
    signals.extend(detector.actor_death(&second));

    assert_eq!(
        kills(&signals),
        vec![
            ("Goblin", DetectionChannel::ExplicitDeath),
            ("Imp", DetectionChannel::ExplicitDeath)
        ]
    );
}

// ═══════════════════════════════════════════════════════════════════════════
// Identity
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn phase_suppression_credits_only_final_form() {
    let mut detector = make_boss_detector();
    let mut signals = Vec::new();

    detector.tick(1, &[]);
    for (instance, type_id) in [(10, 1), (11, 2), (12, 3)] {
        let phase = npc(instance, type_id, "Boss");
        hit(&mut detector, &phase);
        signals.extend(detector.actor_death(&phase));
        signals.extend(detector.actor_despawned(&phase));
        let next = detector.now() + 1;
        signals.extend(advance_to(&mut detector, next));
    }

    assert_eq!(kills(&signals), vec![("Boss", DetectionChannel::ExplicitDeath)]);
    let suppressed = signals
        .iter()
        .filter(|s| {
            matches!(
                s,
                KillSignal::KillSuppressed {
                    reason: SuppressReason::IntermediatePhase,
                    ..
                }
            )
        })
        .count();
    assert_eq!(suppressed, 2);
    assert!(matches!(
        signals.last(),
        Some(KillSignal::KillConfirmed { instance_id: 12, type_id: 3, .. })
    ));
}

#[test]
fn boss_transforming_in_place_credits_final_form() {
    let mut detector = make_boss_detector();

    detector.tick(1, &[]);
    hit(&mut detector, &npc(10, 1, "Boss"));
    hit(&mut detector, &npc(10, 2, "Boss"));
    let signals = detector.actor_death(&npc(10, 3, "Boss"));

    assert_eq!(kills(&signals), vec![("Boss", DetectionChannel::ExplicitDeath)]);
}

#[test]
fn multi_phase_kill_uses_boss_name() {
    let mut detector = make_detector();
    let dusk = npc(5, 8060, "Dusk");

    detector.tick(1, &[]);
    hit(&mut detector, &dusk);
    let signals = detector.actor_death(&dusk);
    assert_eq!(
        kills(&signals),
        vec![("Grotesque Guardians", DetectionChannel::ExplicitDeath)]
    );
}

#[test]
fn excluded_despawn_never_counts() {
    let mut detector = make_detector();
    let tail = npc(8, 4242, "Hueycoatl tail");

    detector.tick(1, &[]);
    hit(&mut detector, &tail);
    let mut signals = detector.actor_despawned(&tail);
    signals.extend(advance_to(&mut detector, 6));

    assert!(kills(&signals).is_empty());
    assert!(matches!(
        signals.as_slice(),
        [KillSignal::KillSuppressed {
            reason: SuppressReason::Excluded,
            ..
        }]
    ));
}

#[test]
fn excluded_polled_npc_is_never_credited() {
    let config = RegistryConfig {
        excluded: ExcludedDef {
            names: vec![],
            ids: vec![DUKE],
        },
        ..Default::default()
    };
    let registry = IdentityRegistry::builtin().merged(&config);
    assert_eq!(
        registry.classify(DUKE, "Duke Sucellus"),
        Classification::Excluded
    );
    let mut detector = KillDetector::new(Arc::new(registry));
    let duke = NpcSnapshot::new(7, DUKE, "Duke Sucellus");

    detector.tick(1, &[]);
    hit(&mut detector, &Actor::Npc(duke.clone().with_health(40)));
    let mut signals = detector.tick(2, &[duke.clone().with_health(0)]);
    signals.extend(detector.actor_death(&Actor::Npc(duke.with_health(0))));

    assert!(
        kills(&signals).is_empty(),
        "excluded NPC credited: {:?}",
        kills(&signals)
    );
    assert!(matches!(
        signals.as_slice(),
        [KillSignal::KillSuppressed {
            reason: SuppressReason::Excluded,
            ..
        }]
    ));
}

#[test]
fn unnamed_npc_gets_placeholder() {
    let mut detector = make_detector();
    let nameless = Actor::Npc(NpcSnapshot {
        instance_id: 3,
        type_id: 1,
        name: None,
        health_ratio: None,
        combat_level: 2,
    });

    detector.tick(1, &[]);
    hit(&mut detector, &nameless);
    let signals = detector.actor_death(&nameless);
    assert_eq!(
        kills(&signals),
        vec![("Unnamed NPC", DetectionChannel::ExplicitDeath)]
    );
}

// ═══════════════════════════════════════════════════════════════════════════
// Timeout
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn death_within_timeout_counts() {
    let mut detector = make_detector();
    let goblin = npc(1, GOBLIN, "Goblin");

    detector.tick(10, &[]);
    hit(&mut detector, &goblin);
    advance_to(&mut detector, 16);

    assert_eq!(kills(&detector.actor_death(&goblin)).len(), 1);
}

#[test]
fn death_after_timeout_does_not_count() {
    let mut detector = make_detector();
    let goblin = npc(1, GOBLIN, "Goblin");

    detector.tick(10, &[]);
    hit(&mut detector, &goblin);
    advance_to(&mut detector, 18);

    assert!(detector.actor_death(&goblin).is_empty());
    assert!(detector.actor_despawned(&goblin).is_empty());
}

#[test]
fn animations_do_not_extend_engagement() {
    let mut detector = make_detector();
    let goblin = npc(1, GOBLIN, "Goblin");

    detector.tick(10, &[]);
    hit(&mut detector, &goblin);
    advance_to(&mut detector, 15);
    detector.animation_changed(&goblin, 4000);
    advance_to(&mut detector, 18);

    assert!(detector.tracker().get(1).is_none());
}

// ═══════════════════════════════════════════════════════════════════════════
// Health polling
// ═══════════════════════════════════════════════════════════════════════════

fn duke_at(ratio: i32) -> NpcSnapshot {
    NpcSnapshot::new(7, DUKE, "Duke Sucellus").with_health(ratio)
}

#[test]
fn polled_npc_counts_once_at_zero() {
    let mut detector = make_detector();
    let mut signals = Vec::new();

    detector.tick(1, &[duke_at(50)]);
    hit(&mut detector, &Actor::Npc(duke_at(50)));

    signals.extend(detector.tick(2, &[duke_at(50)]));
    signals.extend(detector.tick(3, &[duke_at(20)]));
    signals.extend(detector.tick(4, &[duke_at(0)]));
    signals.extend(detector.tick(5, &[duke_at(0)]));
    signals.extend(detector.tick(6, &[duke_at(0)]));

    assert_eq!(
        kills(&signals),
        vec![("Duke Sucellus", DetectionChannel::HealthPoll)]
    );
    assert_eq!(signals[0].tick(), 4);
}

#[test]
fn polled_npc_ignores_death_and_despawn_channels() {
    let mut detector = make_detector();
    let duke = Actor::Npc(duke_at(30));

    detector.tick(1, &[]);
    hit(&mut detector, &duke);
    assert!(detector.actor_death(&duke).is_empty());
    assert!(detector.animation_changed(&duke, 172).is_empty());
}

#[test]
fn polled_npc_rearms_when_health_returns() {
    let mut detector = make_detector();
    let mut signals = Vec::new();

    detector.tick(1, &[]);
    hit(&mut detector, &Actor::Npc(duke_at(30)));
    signals.extend(detector.tick(2, &[duke_at(0)]));
    signals.extend(detector.tick(3, &[duke_at(1)]));
    signals.extend(detector.tick(4, &[duke_at(30)]));
    signals.extend(detector.tick(5, &[duke_at(0)]));

    assert_eq!(kills(&signals).len(), 2);
}

#[test]
fn untracked_polled_npc_is_not_credited() {
    let mut detector = make_detector();
    let signals = detector.tick(1, &[duke_at(0)]);
    assert!(signals.is_empty());
}

#[test]
fn polled_boss_credits_only_final_form() {
    let mut detector = make_detector();
    let mut signals = Vec::new();
    let early = NpcSnapshot::new(20, 14009, "The Hueycoatl");
    let last = NpcSnapshot::new(20, 14012, "The Hueycoatl");

    detector.tick(1, &[]);
    hit(&mut detector, &Actor::Npc(early.clone().with_health(10)));
    signals.extend(detector.tick(2, &[early.with_health(0)]));
    signals.extend(detector.tick(3, &[last.clone().with_health(0)]));
    signals.extend(detector.tick(4, &[last.with_health(0)]));

    assert_eq!(
        kills(&signals),
        vec![("The Hueycoatl", DetectionChannel::HealthPoll)]
    );
}

#[test]
fn recorded_events_drive_the_same_machine() {
    let mut detector = make_detector();
    let imp = npc(42, IMP, "Imp");
    let events = vec![
        GameEvent::Tick {
            tick: 100,
            npcs: vec![],
        },
        GameEvent::InteractionChanged {
            source: Actor::LocalPlayer,
            target: Some(imp.clone()),
        },
        GameEvent::DamageApplied {
            target: imp.clone(),
            from_local_player: true,
        },
        GameEvent::Tick {
            tick: 101,
            npcs: vec![],
        },
        GameEvent::AnimationChanged {
            actor: imp.clone(),
            animation_id: 172,
        },
        GameEvent::ActorDeath { actor: imp.clone() },
        GameEvent::ActorDespawned { actor: imp },
    ];

    let signals: Vec<KillSignal> = events
        .iter()
        .flat_map(|e| detector.process_event(e))
        .collect();
    assert_eq!(kills(&signals), vec![("Imp", DetectionChannel::DeathAnimation)]);
}
