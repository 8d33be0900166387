use std::io::Write;
use std::path::Path;

use monster_monitor_core::ledger::view::{filter_records, overlay_rows, panel_order};
use monster_monitor_core::{AppConfigExt, NpcRecord};

use crate::context::CliContext;
use crate::replay;

pub async fn replay_file(path: &str, ctx: &CliContext) -> Result<(), String> {
    let summary = {
        let mut monitor = ctx.monitor.lock().await;
        replay::replay_file(Path::new(path), &mut monitor)?
    };

    println!(
        "replayed {} events: {} kills, {} suppressed, {} unknown animations",
        summary.events,
        summary.kills.len(),
        summary.suppressed,
        summary.unknown_animations
    );
    for npc in &summary.kills {
        println!("  killed {}", npc);
    }
    if !summary.bad_lines.is_empty() {
        println!("  skipped unreadable lines: {:?}", summary.bad_lines);
    }

    ctx.ledger.flush().await.map_err(|e| e.to_string())
}

pub async fn list(filter: Option<&str>, ctx: &CliContext) -> Result<(), String> {
    let records = filter_records(ctx.ledger.snapshot(), filter.unwrap_or_default());
    let last_killed = ctx.ledger.last_killed();
    let records = panel_order(records, last_killed.as_deref(), &ctx.registry);

    if records.is_empty() {
        println!("No NPCs recorded");
        return Ok(());
    }

    println!("{:<32} {:>8} {:>12}  Flags", "NPC", "Kills", "Limit");
    println!("{}", "-".repeat(64));
    for record in &records {
        println!(
            "{:<32} {:>8} {:>12}  {}",
            record.name,
            record.total_kills,
            limit_column(record),
            flags_column(record)
        );
    }
    println!("Total kills: {}", ctx.ledger.total_kills());
    Ok(())
}

fn limit_column(record: &NpcRecord) -> String {
    if record.limit_set {
        format!("{}/{}", record.kills_toward_limit, record.kill_limit)
    } else {
        "-".to_string()
    }
}

fn flags_column(record: &NpcRecord) -> String {
    let mut flags = Vec::new();
    if record.ignored {
        flags.push("ignored");
    }
    if record.notify_on_limit {
        flags.push("notify");
    }
    if record.limit_reached() {
        flags.push("done");
    }
    flags.join(",")
}

pub async fn overlay(ctx: &CliContext) -> Result<(), String> {
    if !ctx.config.read().await.show_overlay {
        println!("Overlay is disabled (show_overlay = false)");
        return Ok(());
    }

    let rows = overlay_rows(&ctx.ledger.snapshot());
    if rows.is_empty() {
        println!("No kill limits set");
        return Ok(());
    }

    const BAR_WIDTH: usize = 20;
    for row in rows {
        let filled = ((row.progress * BAR_WIDTH as f32).round() as usize).min(BAR_WIDTH);
        println!(
            "{:<32} [{}{}] {}/{}",
            row.name,
            "#".repeat(filled),
            "-".repeat(BAR_WIDTH - filled),
            row.kills_toward_limit,
            row.kill_limit
        );
    }
    Ok(())
}

pub fn set_limit(name: &str, limit: u32, ctx: &CliContext) -> Result<(), String> {
    ctx.ledger.set_limit(name, limit).map_err(|e| e.to_string())?;
    if limit == 0 {
        println!("Cleared kill limit for {}", name);
    } else {
        println!("Kill limit for {} set to {}", name, limit);
    }
    tracing::info!(npc = name, limit, "Kill limit changed");
    Ok(())
}

pub async fn monitor(name: &str, limit: Option<u32>, ctx: &CliContext) -> Result<(), String> {
    let limit = match limit {
        Some(limit) => limit,
        None => ctx.config.read().await.default_kill_limit,
    };
    ctx.ledger.monitor(name, limit).map_err(|e| e.to_string())?;
    println!("Monitoring {} (limit {})", name, limit);
    tracing::info!(npc = name, limit, "NPC monitored");
    Ok(())
}

pub fn set_ignored(name: &str, ignored: bool, ctx: &CliContext) -> Result<(), String> {
    ctx.ledger
        .set_ignored(name, ignored)
        .map_err(|e| e.to_string())?;
    println!("{} {}", if ignored { "Ignoring" } else { "No longer ignoring" }, name);
    tracing::info!(npc = name, ignored, "Ignore flag changed");
    Ok(())
}

pub fn set_notify(name: &str, notify: bool, ctx: &CliContext) -> Result<(), String> {
    ctx.ledger
        .set_notify_on_limit(name, notify)
        .map_err(|e| e.to_string())?;
    println!(
        "Limit notifications for {} {}",
        name,
        if notify { "on" } else { "off" }
    );
    Ok(())
}

pub fn reset(name: &str, ctx: &CliContext) -> Result<(), String> {
    ctx.ledger.reset_count(name).map_err(|e| e.to_string())?;
    println!("Reset all kills for {}", name);
    tracing::info!(npc = name, "Kill count reset");
    Ok(())
}

pub fn reset_progress(name: &str, ctx: &CliContext) -> Result<(), String> {
    ctx.ledger
        .reset_progress(name)
        .map_err(|e| e.to_string())?;
    println!("Reset limit progress for {}", name);
    Ok(())
}

pub fn remove(name: &str, ctx: &CliContext) -> Result<(), String> {
    let removed = ctx.ledger.remove(name).map_err(|e| e.to_string())?;
    println!("Removed {} ({} kills)", removed.name, removed.total_kills);
    tracing::info!(npc = %removed.name, "NPC removed");
    Ok(())
}

pub fn clear(ctx: &CliContext) -> Result<(), String> {
    let count = ctx.ledger.len();
    ctx.ledger.clear().map_err(|e| e.to_string())?;
    println!("Removed {} NPCs", count);
    tracing::info!(count, "Kill log cleared");
    Ok(())
}

pub async fn show_settings(ctx: &CliContext) -> Result<(), String> {
    let config = ctx.config.read().await;
    let rendered = toml::to_string_pretty(&*config).map_err(|e| e.to_string())?;

    if let Ok(path) = monster_monitor_core::AppConfig::config_path() {
        println!("# {}", path.display());
    }
    println!("# player: {}", ctx.player);
    println!("# kill log: {}", ctx.store.log_path().display());
    print!("{}", rendered);
    Ok(())
}

pub async fn exit(ctx: &CliContext) -> Result<(), String> {
    ctx.shutdown().await;
    let mut stdout = std::io::stdout();
    writeln!(stdout, "quitting...").map_err(|e| e.to_string())?;
    stdout.flush().map_err(|e| e.to_string())
}
