use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use reverie_core::journal_file::load_journal;
use reverie_core::replay_to_end;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the JSONL journal file to replay
    #[arg(short, long)]
    journal: PathBuf,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let loaded = load_journal(&args.journal)
        .with_context(|| format!("failed to load journal file: {}", args.journal.display()))?;
    if loaded.truncated {
        println!(
            "warning: journal ended in a corrupt line; replaying the intact prefix of {} frames",
            loaded.journal.frames.len()
        );
    }

    let result = replay_to_end(&loaded.journal);

    println!("Replay complete.");
    println!("Seed: {}", loaded.journal.seed);
    println!("Frames: {}", loaded.journal.frames.len());
    println!("Outcome: {:?}", result.outcome);
    println!("Levels cleared: {}", result.levels_cleared);
    println!("Final clock: {} ms", result.final_now_ms);
    println!("Snapshot hash: {}", result.final_snapshot_hash);

    Ok(())
}
