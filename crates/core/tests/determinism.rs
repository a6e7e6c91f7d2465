use reverie_core::{
    DEFAULT_GRID_SIZE, Direction, NullEmotionalSink, RunPath, SessionJournal, SessionSnapshot,
    SignalFrame, SimulationSession, replay_to_end,
};

fn scripted_input(step: usize) -> Option<Direction> {
    match step % 5 {
        0 | 1 => Some(Direction::Right),
        2 => Some(Direction::Down),
        3 => Some(Direction::Left),
        _ => Some(Direction::Down),
    }
}

fn scripted_signals(step: usize) -> SignalFrame {
    let phase = step as f32 * 0.05;
    let mut frame = SignalFrame::default();
    frame.emotional.distortion = (phase.sin() * 0.5 + 0.5).clamp(0.0, 1.0);
    frame.emotional.coherence = (phase.cos() * 0.5 + 0.5).clamp(0.0, 1.0);
    frame.emotional.valence = phase.sin();
    frame.temporal.enemy_speed_mul = 1.0 + 0.2 * phase.cos();
    frame
}

/// Drive a live session with the same contract the replay uses: a tick that
/// reports `level_complete` is followed by `advance_level` before the next.
fn run_live(seed: u64, ticks: usize) -> (u64, SessionJournal) {
    let mut session = SimulationSession::new(seed, DEFAULT_GRID_SIZE, RunPath::Steady);
    let mut journal = SessionJournal::new(seed, DEFAULT_GRID_SIZE, RunPath::Steady);
    let mut sink = NullEmotionalSink;
    let mut pending_transition = false;

    for step in 0..ticks {
        if pending_transition {
            let _ = session.advance_level();
            pending_transition = false;
        }
        let input = scripted_input(step);
        let signals = scripted_signals(step);
        journal.record_frame(200, input, signals);
        let result = session.advance(200, input, &signals, &mut sink);
        if result.player_dead {
            break;
        }
        pending_transition = result.level_complete;
    }
    (session.snapshot_hash(), journal)
}

#[test]
fn journal_replay_reproduces_the_live_run_hash() {
    let (live_hash, journal) = run_live(12_345, 400);
    let replayed = replay_to_end(&journal);
    assert_eq!(live_hash, replayed.final_snapshot_hash);
}

#[test]
fn identical_seeds_produce_identical_runs() {
    let (hash_a, _) = run_live(777, 300);
    let (hash_b, _) = run_live(777, 300);
    assert_eq!(hash_a, hash_b);
}

#[test]
fn different_seeds_produce_different_runs() {
    let (hash_a, _) = run_live(100, 300);
    let (hash_b, _) = run_live(101, 300);
    assert_ne!(hash_a, hash_b);
}

#[test]
fn a_mid_run_snapshot_restores_into_the_same_future() {
    let mut session = SimulationSession::new(55_555, DEFAULT_GRID_SIZE, RunPath::Turbulent);
    let mut sink = NullEmotionalSink;
    let mut pending_transition = false;

    for step in 0..150 {
        if pending_transition {
            let _ = session.advance_level();
            pending_transition = false;
        }
        let result =
            session.advance(200, scripted_input(step), &scripted_signals(step), &mut sink);
        if result.player_dead {
            break;
        }
        pending_transition = result.level_complete;
    }

    let mut restored = SessionSnapshot::capture(&session).restore();
    let mut restored_pending = pending_transition;

    for step in 150..300 {
        if pending_transition {
            let _ = session.advance_level();
            pending_transition = false;
        }
        if restored_pending {
            let _ = restored.advance_level();
            restored_pending = false;
        }
        let signals = scripted_signals(step);
        let live = session.advance(200, scripted_input(step), &signals, &mut sink);
        let replayed = restored.advance(200, scripted_input(step), &signals, &mut sink);
        assert_eq!(live, replayed);
        pending_transition = live.level_complete;
        restored_pending = replayed.level_complete;
    }

    assert_eq!(session.snapshot_hash(), restored.snapshot_hash());
}
