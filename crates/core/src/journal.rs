use serde::{Deserialize, Serialize};

use crate::difficulty::SignalFrame;
use crate::types::{Direction, RunPath};

/// Append-only record of everything a session consumed from the outside:
/// the tick cadence, the input direction, and the signal frame. Together
/// with the seed this replays a run exactly.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionJournal {
    pub format_version: u16,
    pub seed: u64,
    pub size: usize,
    pub path: RunPath,
    pub frames: Vec<FrameRecord>,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FrameRecord {
    pub dt_ms: u64,
    pub input: Option<Direction>,
    pub signals: SignalFrame,
}

impl SessionJournal {
    pub fn new(seed: u64, size: usize, path: RunPath) -> Self {
        Self { format_version: 1, seed, size, path, frames: Vec::new() }
    }

    pub fn record_frame(&mut self, dt_ms: u64, input: Option<Direction>, signals: SignalFrame) {
        self.frames.push(FrameRecord { dt_ms, input, signals });
    }
}
