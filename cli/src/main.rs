use std::io::Write;

use clap::{Parser, Subcommand};
use monster_monitor_cli::{CliContext, commands, logging, readline};
use monster_monitor_core::storage::DEFAULT_PROFILE;

#[derive(Parser)]
#[command(version, about = "Kill tracking for NPCs slain by the local player")]
struct Args {
    /// Player profile whose kill log is loaded
    #[arg(short, long, default_value = DEFAULT_PROFILE)]
    player: String,
}

#[tokio::main]
async fn main() -> Result<(), String> {
    let args = Args::parse();
    let _log_guard = logging::init();

    let ctx = CliContext::new(&args.player)?;

    loop {
        let line = readline()?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match respond(line, &ctx).await {
            Ok(quit) => {
                if quit {
                    break;
                }
            }
            Err(err) => {
                writeln!(std::io::stdout(), "{err}").map_err(|e| e.to_string())?;
                std::io::stdout().flush().map_err(|e| e.to_string())?;
            }
        }
    }

    Ok(())
}

#[derive(Parser)]
#[command(version, about = "monster-monitor")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Feed a JSON-lines event recording through the detector
    Replay {
        #[arg(short, long)]
        path: String,
    },
    /// Show recorded NPCs in panel order
    List {
        #[arg(short, long)]
        filter: Option<String>,
    },
    /// Show kill limit progress bars
    Overlay,
    SetLimit {
        name: String,
        limit: u32,
    },
    /// Track an NPC with a limit and notifications on
    Monitor {
        name: String,
        #[arg(short, long)]
        limit: Option<u32>,
    },
    Ignore {
        name: String,
    },
    Unignore {
        name: String,
    },
    /// Toggle the limit notification for an NPC
    Notify {
        name: String,
        #[arg(long)]
        off: bool,
    },
    /// Zero all kills for an NPC
    Reset {
        name: String,
    },
    /// Zero only the progress toward the kill limit
    ResetProgress {
        name: String,
    },
    Remove {
        name: String,
    },
    Clear,
    Config,
    Exit,
}

async fn respond(line: &str, ctx: &CliContext) -> Result<bool, String> {
    let mut args = shlex::split(line).ok_or("error: Invalid quoting")?;
    args.insert(0, "monster-monitor".to_string());
    let cli = Cli::try_parse_from(args).map_err(|e| e.to_string())?;

    match &cli.command {
        Some(Commands::Replay { path }) => commands::replay_file(path, ctx).await?,
        Some(Commands::List { filter }) => commands::list(filter.as_deref(), ctx).await?,
        Some(Commands::Overlay) => commands::overlay(ctx).await?,
        Some(Commands::SetLimit { name, limit }) => commands::set_limit(name, *limit, ctx)?,
        Some(Commands::Monitor { name, limit }) => commands::monitor(name, *limit, ctx).await?,
        Some(Commands::Ignore { name }) => commands::set_ignored(name, true, ctx)?,
        Some(Commands::Unignore { name }) => commands::set_ignored(name, false, ctx)?,
        Some(Commands::Notify { name, off }) => commands::set_notify(name, !off, ctx)?,
        Some(Commands::Reset { name }) => commands::reset(name, ctx)?,
        Some(Commands::ResetProgress { name }) => commands::reset_progress(name, ctx)?,
        Some(Commands::Remove { name }) => commands::remove(name, ctx)?,
        Some(Commands::Clear) => commands::clear(ctx)?,
        Some(Commands::Config) => commands::show_settings(ctx).await?,
        Some(Commands::Exit) => {
            commands::exit(ctx).await?;
            return Ok(true);
        }
        None => {}
    }
    Ok(false)
}
