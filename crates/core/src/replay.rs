use crate::difficulty::NullEmotionalSink;
use crate::journal::SessionJournal;
use crate::session::SimulationSession;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReplayOutcome {
    Died { level: u32 },
    Alive { level: u32 },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ReplayResult {
    pub outcome: ReplayOutcome,
    pub levels_cleared: u32,
    pub final_now_ms: u64,
    pub final_snapshot_hash: u64,
}

/// Re-run a journal from its seed. The transition contract is honored the
/// way a live caller would: a tick that reports `level_complete` is followed
/// by `advance_level` before the next frame is fed in.
pub fn replay_to_end(journal: &SessionJournal) -> ReplayResult {
    let mut session = SimulationSession::new(journal.seed, journal.size, journal.path);
    let mut sink = NullEmotionalSink;
    let mut levels_cleared = 0;
    let mut pending_transition = false;

    for frame in &journal.frames {
        if pending_transition {
            if session.advance_level().is_ok() {
                levels_cleared += 1;
            }
            pending_transition = false;
        }

        let result = session.advance(frame.dt_ms, frame.input, &frame.signals, &mut sink);
        if result.player_dead {
            return ReplayResult {
                outcome: ReplayOutcome::Died { level: session.level() },
                levels_cleared,
                final_now_ms: session.now_ms(),
                final_snapshot_hash: session.snapshot_hash(),
            };
        }
        pending_transition = result.level_complete;
    }

    ReplayResult {
        outcome: ReplayOutcome::Alive { level: session.level() },
        levels_cleared,
        final_now_ms: session.now_ms(),
        final_snapshot_hash: session.snapshot_hash(),
    }
}
