//! Replay of recorded game events
//!
//! A recording is JSON lines, one `GameEvent` per line. Blank lines and
//! lines starting with `#` are skipped.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use monster_monitor_core::{GameEvent, KillMonitor, KillSignal};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReplaySummary {
    pub events: usize,
    pub kills: Vec<String>,
    pub suppressed: usize,
    pub unknown_animations: usize,
    /// Lines that didn't parse as an event
    pub bad_lines: Vec<usize>,
}

pub fn replay_events<R: BufRead>(
    reader: R,
    monitor: &mut KillMonitor,
) -> std::io::Result<ReplaySummary> {
    let mut summary = ReplaySummary::default();

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let event: GameEvent = match serde_json::from_str(line) {
            Ok(event) => event,
            Err(e) => {
                tracing::warn!(line = idx + 1, error = %e, "Skipping unreadable event");
                summary.bad_lines.push(idx + 1);
                continue;
            }
        };

        summary.events += 1;
        for signal in monitor.process_event(&event) {
            match signal {
                KillSignal::KillConfirmed { npc, .. } => summary.kills.push(npc),
                KillSignal::KillSuppressed { .. } => summary.suppressed += 1,
                KillSignal::UnknownDeathAnimation { .. } => summary.unknown_animations += 1,
            }
        }
    }

    Ok(summary)
}

pub fn replay_file(path: &Path, monitor: &mut KillMonitor) -> Result<ReplaySummary, String> {
    let file =
        File::open(path).map_err(|e| format!("failed to open {}: {}", path.display(), e))?;
    replay_events(BufReader::new(file), monitor)
        .map_err(|e| format!("failed to read {}: {}", path.display(), e))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use monster_monitor_core::notify::TracingNotifier;
    use monster_monitor_core::{AppConfig, IdentityRegistry, KillLedger};

    use super::*;

    const RECORDING: &str = r#"
# goblin fight
{"event":"tick","tick":10}
{"event":"interaction_changed","source":{"kind":"local_player"},"target":{"kind":"npc","instance_id":1,"type_id":3029,"name":"Goblin"}}
{"event":"damage_applied","target":{"kind":"npc","instance_id":1,"type_id":3029,"name":"Goblin"},"from_local_player":true}
{"event":"actor_death","actor":{"kind":"npc","instance_id":1,"type_id":3029,"name":"Goblin"}}
{"event":"actor_despawned","actor":{"kind":"npc","instance_id":1,"type_id":3029,"name":"Goblin"}}
not json
{"event":"tick","tick":11}
"#;

    #[test]
    fn replays_recording() {
        let ledger = KillLedger::new();
        let mut monitor = KillMonitor::new(
            Arc::new(IdentityRegistry::builtin()),
            ledger.clone(),
            AppConfig::default(),
            Arc::new(TracingNotifier),
        );

        let summary = replay_events(RECORDING.as_bytes(), &mut monitor).unwrap();

        assert_eq!(summary.events, 6);
        assert_eq!(summary.kills, vec!["Goblin".to_string()]);
        assert_eq!(summary.bad_lines, vec![8]);
        assert_eq!(ledger.get("Goblin").unwrap().total_kills, 1);
    }
}
