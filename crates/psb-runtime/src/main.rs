//! # Portable Shulker Box Runtime
//!
//! Replays an event journal through the session loop.
//!
//! ## Startup Sequence
//!
//! 1. Load configuration (file or defaults)
//! 2. Initialize tracing
//! 3. Install the journal's holders on a fresh in-memory host
//! 4. Feed every event through the loop
//! 5. Shut down and print a JSON summary

use anyhow::{Context, Result};
use clap::Parser;
use psb_runtime::{init_tracing, Journal, RuntimeConfig, SessionEventLoop};
use serde_json::json;
use std::fs;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(about = "Replay a portable container event journal")]
struct Args {
    /// JSON journal to replay
    #[arg(value_name = "JOURNAL")]
    journal: PathBuf,

    /// TOML configuration file
    #[arg(short = 'c', long = "config", value_name = "FILE", env = "PSB_CONFIG")]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => RuntimeConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => RuntimeConfig::default(),
    };
    init_tracing(&config.logging)?;

    let content = fs::read_to_string(&args.journal)
        .with_context(|| format!("Failed to read journal {}", args.journal.display()))?;
    let journal = Journal::from_json(&content)
        .with_context(|| format!("Failed to parse journal {}", args.journal.display()))?;
    info!(
        "[psb] Replaying {} events for {} holders",
        journal.events.len(),
        journal.holders.len()
    );

    let (mut event_loop, host) = SessionEventLoop::in_memory(config.session);
    journal.install(&host);
    for event in journal.events {
        event_loop.submit(event);
    }
    event_loop.run_until_idle();

    let report = event_loop.shutdown();
    let summary = json!({
        "stats": event_loop.stats(),
        "shutdown": {
            "persisted": report.persisted.len(),
            "faulted": report.faulted.len(),
            "abandoned": report.abandoned.len(),
        },
        "world_drops": host.world_drops().len(),
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);

    Ok(())
}
