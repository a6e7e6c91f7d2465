//! Versioned, fully serializable capture of a session. External save/load
//! collaborators persist this as plain data; nothing reaches into private
//! session state at restore time except this module.

use serde::{Deserialize, Serialize};
use slotmap::SlotMap;

use crate::difficulty::DifficultyContext;
use crate::rng::SessionRng;
use crate::session::SimulationSession;
use crate::state::{Enemy, Grid, Hallucination, Player};
use crate::types::{EnemyId, HallucinationId, RunPath};

pub const SNAPSHOT_FORMAT_VERSION: u16 = 1;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub format_version: u16,
    pub seed: u64,
    pub size: usize,
    pub path: RunPath,
    pub level: u32,
    pub now_ms: u64,
    pub grid: Grid,
    pub player: Player,
    pub enemies: SlotMap<EnemyId, Enemy>,
    pub hallucinations: SlotMap<HallucinationId, Hallucination>,
    pub insight_remaining: u32,
    pub difficulty: DifficultyContext,
    pub intensity: f32,
    pub level_complete_pending: bool,
    pub rng_word_pos: u128,
}

fn slotmaps_eq<K: slotmap::Key, V: PartialEq>(
    a: &SlotMap<K, V>,
    b: &SlotMap<K, V>,
) -> bool {
    a.len() == b.len() && a.iter().all(|(key, value)| b.get(key) == Some(value))
}

impl PartialEq for SessionSnapshot {
    fn eq(&self, other: &Self) -> bool {
        self.format_version == other.format_version
            && self.seed == other.seed
            && self.size == other.size
            && self.path == other.path
            && self.level == other.level
            && self.now_ms == other.now_ms
            && self.grid == other.grid
            && self.player == other.player
            && slotmaps_eq(&self.enemies, &other.enemies)
            && slotmaps_eq(&self.hallucinations, &other.hallucinations)
            && self.insight_remaining == other.insight_remaining
            && self.difficulty == other.difficulty
            && self.intensity == other.intensity
            && self.level_complete_pending == other.level_complete_pending
            && self.rng_word_pos == other.rng_word_pos
    }
}

impl SessionSnapshot {
    pub fn capture(session: &SimulationSession) -> Self {
        Self {
            format_version: SNAPSHOT_FORMAT_VERSION,
            seed: session.seed,
            size: session.size,
            path: session.path,
            level: session.level,
            now_ms: session.now_ms,
            grid: session.grid.clone(),
            player: session.player.clone(),
            enemies: session.enemies.clone(),
            hallucinations: session.hallucinations.clone(),
            insight_remaining: session.insight_remaining,
            difficulty: session.difficulty,
            intensity: session.intensity,
            level_complete_pending: session.level_complete_pending,
            rng_word_pos: session.rng.word_pos(),
        }
    }

    /// Rebuild a live session at the exact captured point, including the
    /// rng stream position.
    pub fn restore(&self) -> SimulationSession {
        let mut session = SimulationSession::new(self.seed, self.size, self.path);
        session.level = self.level;
        session.now_ms = self.now_ms;
        session.grid = self.grid.clone();
        session.player = self.player.clone();
        session.enemies = self.enemies.clone();
        session.hallucinations = self.hallucinations.clone();
        session.insight_remaining = self.insight_remaining;
        session.difficulty = self.difficulty;
        session.intensity = self.intensity;
        session.level_complete_pending = self.level_complete_pending;
        session.rng = SessionRng::restore(self.seed, self.rng_word_pos);
        session.drain_events();
        session
    }
}
