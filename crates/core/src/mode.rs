//! Mode dispatch at the session boundary. Play modes are a tagged union
//! with one concrete simulation per tag: adding a mode means adding a
//! variant and handling it everywhere, not overriding a loose base class.

use crate::difficulty::{EmotionalSink, SignalFrame};
use crate::session::SimulationSession;
use crate::types::{Direction, RunPath, SessionError, TickResult};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModeTag {
    Grid,
}

pub enum ModeSession {
    Grid(SimulationSession),
}

impl ModeSession {
    pub fn new(tag: ModeTag, seed: u64, size: usize, path: RunPath) -> Self {
        match tag {
            ModeTag::Grid => ModeSession::Grid(SimulationSession::new(seed, size, path)),
        }
    }

    pub fn advance(
        &mut self,
        dt_ms: u64,
        input: Option<Direction>,
        frame: &SignalFrame,
        sink: &mut dyn EmotionalSink,
    ) -> TickResult {
        match self {
            ModeSession::Grid(session) => session.advance(dt_ms, input, frame, sink),
        }
    }

    pub fn advance_level(&mut self) -> Result<u32, SessionError> {
        match self {
            ModeSession::Grid(session) => session.advance_level(),
        }
    }

    pub fn snapshot_hash(&self) -> u64 {
        match self {
            ModeSession::Grid(session) => session.snapshot_hash(),
        }
    }
}
