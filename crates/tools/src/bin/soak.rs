use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::{Rng, SeedableRng};
use reverie_core::journal_file::JournalWriter;
use reverie_core::{
    DEFAULT_GRID_SIZE, Direction, FrameRecord, NullEmotionalSink, RunPath, SignalFrame,
    SimulationSession,
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    #[arg(short, long, default_value_t = 5000)]
    ticks: u32,
    /// Play path: steady, turbulent, or lucid
    #[arg(short, long, default_value = "steady")]
    path: String,
    /// Optional JSONL journal to write for later replay
    #[arg(short = 'o', long)]
    journal_out: Option<PathBuf>,
}

fn parse_path(name: &str) -> Result<RunPath> {
    match name {
        "steady" => Ok(RunPath::Steady),
        "turbulent" => Ok(RunPath::Turbulent),
        "lucid" => Ok(RunPath::Lucid),
        other => bail!("unknown play path {other:?}; expected steady, turbulent, or lucid"),
    }
}

fn random_input(rng: &mut ChaCha8Rng) -> Option<Direction> {
    match rng.next_u32() % 6 {
        0 => Some(Direction::Up),
        1 => Some(Direction::Down),
        2 => Some(Direction::Left),
        3 | 4 => Some(Direction::Right),
        _ => None,
    }
}

fn signal_wave(step: u32) -> SignalFrame {
    let phase = step as f32 * 0.07;
    let mut frame = SignalFrame::default();
    frame.emotional.distortion = (phase.sin() * 0.5 + 0.5).clamp(0.0, 1.0);
    frame.emotional.coherence = (phase.cos() * 0.5 + 0.5).clamp(0.0, 1.0);
    frame.emotional.valence = (phase * 0.3).sin();
    frame.temporal.enemy_speed_mul = 1.0 + 0.25 * phase.sin();
    frame.temporal.insight_mul = 1.0 + 0.25 * phase.cos();
    frame
}

fn main() -> Result<()> {
    let args = Args::parse();
    let path = parse_path(&args.path)?;

    println!("Soaking seed {} on the {:?} path for up to {} ticks...", args.seed, path, args.ticks);

    let mut session = SimulationSession::new(args.seed, DEFAULT_GRID_SIZE, path);
    let mut input_rng = ChaCha8Rng::seed_from_u64(args.seed ^ 0x5eed);
    let mut sink = NullEmotionalSink;
    let mut writer = match &args.journal_out {
        Some(journal_path) => Some(
            JournalWriter::create(journal_path, args.seed, DEFAULT_GRID_SIZE, path)
                .with_context(|| format!("failed to create {}", journal_path.display()))?,
        ),
        None => None,
    };

    let mut pending_transition = false;
    let mut simulated = 0;
    for step in 0..args.ticks {
        if pending_transition {
            session.advance_level().expect("pending transition must be accepted");
            pending_transition = false;
        }

        let input = random_input(&mut input_rng);
        let signals = signal_wave(step);
        if let Some(writer) = writer.as_mut() {
            writer.append(&FrameRecord { dt_ms: 120, input, signals })?;
        }

        let result = session.advance(120, input, &signals, &mut sink);
        simulated = step + 1;

        let player = session.player();
        assert!(session.grid().in_bounds(player.pos), "invariant: player in bounds");
        assert!(!session.grid().is_solid(player.pos), "invariant: player not inside a wall");
        assert!(player.hp <= player.max_hp, "invariant: hp clamped");

        if result.player_dead {
            println!("Player died on level {} after {} ticks.", session.level(), simulated);
            break;
        }
        pending_transition = result.level_complete;
    }

    let events = session.drain_events();
    println!("Soak finished after {simulated} ticks.");
    println!("Level: {}", session.level());
    println!("Score: {}", session.player().score);
    println!("Insight tokens: {}", session.player().insight_tokens);
    println!("HP: {}/{}", session.player().hp, session.player().max_hp);
    println!("Events this run: {}", events.len());
    println!("Snapshot hash: {}", session.snapshot_hash());

    Ok(())
}
