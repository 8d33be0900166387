use std::sync::Arc;

use monster_monitor_types::KillCredit;

use super::{KillLedger, LedgerError};
use crate::notify::RecordingNotifier;
use crate::storage::{JsonFileStore, KillStore, PersistenceWorker};

fn make_temp_store(tag: &str) -> JsonFileStore {
    JsonFileStore::new(std::env::temp_dir().join(format!(
        "mm-ledger-{}-{}-{}",
        tag,
        std::process::id(),
        chrono::Local::now().timestamp_nanos_opt().unwrap_or_default()
    )))
}

fn limit_flags(ledger: &KillLedger, name: &str, kills: usize) -> Vec<bool> {
    (0..kills)
        .map(|_| match ledger.record_kill(name, None).credit {
            KillCredit::Counted { limit_reached, .. } => limit_reached,
            KillCredit::Ignored => false,
        })
        .collect()
}

#[test]
fn first_kill_creates_record() {
    let ledger = KillLedger::new();
    let recorded = ledger.record_kill("Goblin", Some(6182));

    assert!(recorded.saved.is_ok());
    assert_eq!(
        recorded.credit,
        KillCredit::Counted {
            total: 1,
            limit_reached: false
        }
    );
    let goblin = ledger.get("Goblin").unwrap();
    assert_eq!(goblin.death_animation_id, Some(6182));
    assert_eq!(ledger.last_killed().as_deref(), Some("Goblin"));
}

#[test]
fn ignored_npc_is_never_counted() {
    let ledger = KillLedger::new();
    ledger.record_kill("Goblin", None);
    ledger.set_ignored("Goblin", true).unwrap();

    let recorded = ledger.record_kill("Goblin", None);
    assert_eq!(recorded.credit, KillCredit::Ignored);
    assert_eq!(ledger.get("Goblin").unwrap().total_kills, 1);
}

#[test]
fn limit_reached_exactly_once() {
    let ledger = KillLedger::new();
    ledger.record_kill("Cow", None);
    ledger.set_limit("Cow", 5).unwrap();

    assert_eq!(
        limit_flags(&ledger, "Cow", 6),
        vec![false, false, false, false, true, false]
    );
    let cow = ledger.get("Cow").unwrap();
    assert_eq!(cow.total_kills, 7);
    assert_eq!(cow.kills_toward_limit, 5);
}

#[test]
fn monitor_creates_limited_record_with_notifications() {
    let ledger = KillLedger::new();
    ledger.monitor("Hill Giant", 10).unwrap();

    let giant = ledger.get("Hill Giant").unwrap();
    assert!(giant.limit_set);
    assert!(giant.notify_on_limit);
    assert_eq!(giant.kill_limit, 10);
    assert_eq!(giant.total_kills, 0);
}

#[test]
fn edits_on_unknown_npc_fail() {
    let ledger = KillLedger::new();
    assert!(matches!(
        ledger.set_limit("Nobody", 3),
        Err(LedgerError::UnknownNpc { .. })
    ));
    assert!(matches!(
        ledger.remove("Nobody"),
        Err(LedgerError::UnknownNpc { .. })
    ));
}

#[test]
fn names_are_normalized() {
    let ledger = KillLedger::new();
    ledger.record_kill("Giant\u{a0}rat", None);
    ledger.record_kill(" Giant rat ", None);
    assert_eq!(ledger.get("Giant rat").unwrap().total_kills, 2);

    ledger.record_kill("", None);
    assert_eq!(ledger.get("Unnamed NPC").unwrap().total_kills, 1);
}

#[test]
fn totals_remove_and_clear() {
    let ledger = KillLedger::new();
    ledger.record_kill("Cow", None);
    ledger.record_kill("Cow", None);
    ledger.record_kill("Imp", None);
    assert_eq!(ledger.total_kills(), 3);

    ledger.remove("Imp").unwrap();
    assert_eq!(ledger.total_kills(), 2);
    assert_eq!(ledger.last_killed(), None);

    ledger.clear().unwrap();
    assert!(ledger.is_empty());
}

#[test]
fn clones_share_state() {
    let ledger = KillLedger::new();
    let ui_view = ledger.clone();
    ledger.record_kill("Cow", None);
    assert_eq!(ui_view.get("Cow").unwrap().total_kills, 1);
}

#[tokio::test]
async fn mutations_reach_disk_and_reload_identically() {
    let store = Arc::new(make_temp_store("persist"));
    let (handle, _task) =
        PersistenceWorker::spawn(store.clone(), Arc::new(RecordingNotifier::new()));
    let ledger = KillLedger::from_records(store.load().unwrap()).with_persistence(handle);

    ledger.record_kill("Cow", Some(5851));
    ledger.monitor("Imp", 3).unwrap();
    ledger.record_kill("Imp", Some(172));
    ledger.set_ignored("Chicken", true).unwrap();
    ledger.flush().await.unwrap();

    let reloaded = store.load().unwrap();
    assert_eq!(reloaded, ledger.records());

    std::fs::remove_dir_all(store.dir()).ok();
}

#[tokio::test]
async fn stopped_worker_keeps_counts_in_memory() {
    let store = Arc::new(make_temp_store("stopped"));
    let (worker, handle) = PersistenceWorker::new(store, Arc::new(RecordingNotifier::new()));
    drop(worker);
    let ledger = KillLedger::new().with_persistence(handle);

    let recorded = ledger.record_kill("Cow", None);
    assert!(matches!(recorded.saved, Err(LedgerError::SaveNotQueued(_))));
    assert_eq!(ledger.get("Cow").unwrap().total_kills, 1);
}
