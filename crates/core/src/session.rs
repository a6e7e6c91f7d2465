//! The owning simulation session: one controlling loop, one entry point per
//! tick, all mutation synchronous inside `advance`. Level transitions are
//! signalled, never executed inline; the caller invokes `advance_level`
//! on a tick of its choosing.

use slotmap::SlotMap;

use crate::behavior::{self, BehaviorContext};
use crate::content::{
    ADAPTIVE_SHRINK_PERCENT, ADAPTIVE_SPEED_FLOOR_MS, MOVE_DELAY_MS, PLAYER_START_HP,
    enemy_archetype,
};
use crate::difficulty::{
    DifficultyContext, EmotionalImpulse, EmotionalSink, SignalFrame, distortion_bonus,
};
use crate::hallucination;
use crate::movement::{self, MoveContext};
use crate::rng::SessionRng;
use crate::state::{Enemy, Grid, Hallucination, Player};
use crate::types::*;
use crate::worldgen::{self, EnemySpawn};

pub const DEFAULT_GRID_SIZE: usize = 12;

pub struct SimulationSession {
    pub(crate) seed: u64,
    pub(crate) size: usize,
    pub(crate) path: RunPath,
    pub(crate) level: u32,
    pub(crate) now_ms: u64,
    pub(crate) grid: Grid,
    pub(crate) player: Player,
    pub(crate) enemies: SlotMap<EnemyId, Enemy>,
    pub(crate) hallucinations: SlotMap<HallucinationId, Hallucination>,
    pub(crate) insight_remaining: u32,
    pub(crate) difficulty: DifficultyContext,
    pub(crate) intensity: f32,
    pub(crate) level_complete_pending: bool,
    pub(crate) rng: SessionRng,
    events: Vec<TickEvent>,
}

impl SimulationSession {
    pub fn new(seed: u64, size: usize, path: RunPath) -> Self {
        let mut session = Self {
            seed,
            size,
            path,
            level: 0,
            now_ms: 0,
            grid: Grid::new(size),
            player: Player::new(Pos { y: 0, x: 0 }, PLAYER_START_HP),
            enemies: SlotMap::with_key(),
            hallucinations: SlotMap::with_key(),
            insight_remaining: 0,
            difficulty: DifficultyContext::default(),
            intensity: 1.0,
            level_complete_pending: false,
            rng: SessionRng::seed_from_u64(seed),
            events: Vec::new(),
        };
        session.install_level(1);
        session
    }

    /// The single per-tick entry point. Signals arrive by value each tick;
    /// nothing here is read from ambient state.
    pub fn advance(
        &mut self,
        dt_ms: u64,
        input: Option<Direction>,
        frame: &SignalFrame,
        sink: &mut dyn EmotionalSink,
    ) -> TickResult {
        if self.player.hp <= 0 {
            return TickResult { move_result: None, player_dead: true, level_complete: false };
        }

        self.now_ms += dt_ms;
        self.difficulty = DifficultyContext::compose(self.path, frame);
        let bonus = distortion_bonus(&frame.emotional);

        let move_result = input.and_then(|direction| {
            self.resolve_player_input(direction, bonus, sink)
        });

        let behavior_context = BehaviorContext {
            now_ms: self.now_ms,
            dt_ms,
            difficulty: &self.difficulty,
            intensity: self.intensity,
            distortion_bonus: bonus,
        };
        let hits = behavior::step_all(
            &mut self.enemies,
            &self.grid,
            &mut self.player,
            &behavior_context,
            &mut self.rng,
        );
        for hit in hits {
            self.events.push(TickEvent::EnemyContact { enemy: hit.enemy, damage: hit.damage });
            sink.add(EmotionalImpulse { calm: 0.0, agitation: hit.damage as f32 * 0.1 });
            if hit.behavior == BehaviorTag::Adaptive
                && let Some(enemy) = self.enemies.get_mut(hit.enemy)
            {
                enemy.speed_ms = quickened(enemy.speed_ms);
                self.events
                    .push(TickEvent::AdaptiveQuickened { enemy: hit.enemy, speed_ms: enemy.speed_ms });
            }
        }

        let hallucination_events = hallucination::tick(
            &mut self.hallucinations,
            &self.grid,
            &mut self.player,
            self.level,
            &behavior_context,
            &mut self.rng,
        );
        for event in &hallucination_events {
            if let TickEvent::HallucinationStruck { damage } = event {
                sink.add(EmotionalImpulse { calm: 0.0, agitation: *damage as f32 * 0.1 });
            }
        }
        self.events.extend(hallucination_events);

        let player_dead = self.player.hp <= 0;
        if player_dead {
            self.events.push(TickEvent::PlayerDied { level: self.level });
        }

        TickResult { move_result, player_dead, level_complete: self.level_complete_pending }
    }

    /// Perform the transition a previous tick signalled. Rejected (not an
    /// error path, a data answer) when no completion is pending.
    pub fn advance_level(&mut self) -> Result<u32, SessionError> {
        if !self.level_complete_pending {
            return Err(SessionError::NoLevelPending);
        }
        self.install_level(self.level + 1);
        Ok(self.level)
    }

    pub fn drain_events(&mut self) -> Vec<TickEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn snapshot_hash(&self) -> u64 {
        use std::hash::Hasher;
        use xxhash_rust::xxh3::Xxh3;

        let mut hasher = Xxh3::new();
        hasher.write_u64(self.seed);
        hasher.write_u64(self.now_ms);
        hasher.write_u32(self.level);
        hasher.write_u8(self.path.code() as u8);
        hasher.write_u32(self.insight_remaining);
        hasher.write_u8(u8::from(self.level_complete_pending));
        hasher.write_u128(self.rng.word_pos());

        for tile in &self.grid.tiles {
            hasher.write_u8(*tile as u8);
        }

        hasher.write_i32(self.player.pos.y);
        hasher.write_i32(self.player.pos.x);
        hasher.write_i32(self.player.hp);
        hasher.write_i64(self.player.score);
        hasher.write_u32(self.player.insight_tokens);
        hasher.write_u32(self.player.stun_turns);
        hasher.write_u64(self.player.last_move_at_ms);

        for (_, enemy) in &self.enemies {
            hasher.write_i32(enemy.pos.y);
            hasher.write_i32(enemy.pos.x);
            hasher.write_u8(enemy.behavior as u8);
            hasher.write_u32(enemy.speed_ms);
            hasher.write_u64(enemy.last_move_at_ms);
            hasher.write_u32(enemy.hits_on_player);
        }
        for (_, entity) in &self.hallucinations {
            hasher.write_i32(entity.pos.y);
            hasher.write_i32(entity.pos.x);
            hasher.write_i32(entity.remaining_life_ms);
        }
        hasher.finish()
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn path(&self) -> RunPath {
        self.path
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn enemies(&self) -> &SlotMap<EnemyId, Enemy> {
        &self.enemies
    }

    pub fn hallucinations(&self) -> &SlotMap<HallucinationId, Hallucination> {
        &self.hallucinations
    }

    pub fn insight_remaining(&self) -> u32 {
        self.insight_remaining
    }

    pub fn difficulty(&self) -> &DifficultyContext {
        &self.difficulty
    }

    pub fn set_intensity(&mut self, intensity: f32) {
        self.intensity = intensity;
    }

    fn resolve_player_input(
        &mut self,
        direction: Direction,
        bonus: f32,
        sink: &mut dyn EmotionalSink,
    ) -> Option<MoveResult> {
        if self.now_ms.saturating_sub(self.player.last_move_at_ms) <= self.effective_move_delay() {
            return None;
        }

        let was_stunned = self.player.stun_turns > 0;
        let context = MoveContext {
            difficulty: &self.difficulty,
            intensity: self.intensity,
            distortion_bonus: bonus,
        };
        let result = movement::attempt_move(
            &mut self.player,
            &mut self.grid,
            direction,
            &context,
            &mut self.insight_remaining,
            &mut self.rng,
        );

        if result.accepted {
            self.player.last_move_at_ms = self.now_ms;
            self.player.last_step = Some(direction);
            self.player.tick_statuses_after_move();
            if let Some(effect) = result.effect {
                sink.add(impulse_for(effect));
            }
            if result.level_complete {
                self.level_complete_pending = true;
                self.events.push(TickEvent::LevelCleared { level: self.level });
            }
        } else if was_stunned {
            // A stunned turn is still an action; it consumes the debounce.
            self.player.last_move_at_ms = self.now_ms;
        }

        Some(result)
    }

    fn effective_move_delay(&self) -> u64 {
        if self.player.is_slowed() { MOVE_DELAY_MS * 2 } else { MOVE_DELAY_MS }
    }

    fn install_level(&mut self, level: u32) {
        let generated =
            worldgen::generate_level(self.seed, self.size, level, self.path, &self.difficulty);
        self.level = level;
        self.grid = generated.grid;
        self.player.pos = generated.spawn_tile;
        self.enemies = SlotMap::with_key();
        for spawn in &generated.enemy_spawns {
            self.enemies.insert(enemy_from_spawn(spawn));
        }
        self.hallucinations = SlotMap::with_key();
        self.insight_remaining = generated.placed.insight;
        self.events.push(TickEvent::LevelStarted { level });
        // A level that generated with zero insight tiles is trivially
        // complete; the signal still flows through the normal channel.
        self.level_complete_pending = self.insight_remaining == 0;
        if self.level_complete_pending {
            self.events.push(TickEvent::LevelCleared { level });
        }
    }
}

fn enemy_from_spawn(spawn: &EnemySpawn) -> Enemy {
    let archetype = enemy_archetype(spawn.behavior);
    Enemy {
        pos: spawn.pos,
        behavior: spawn.behavior,
        speed_ms: archetype.speed_ms,
        last_move_at_ms: 0,
        stun_ms: 0,
        hp: archetype.hp,
        patrol_angle: 0.0,
        orbit_angle: 0.0,
        orbit_radius: archetype.orbit_radius,
        hits_on_player: 0,
    }
}

fn quickened(speed_ms: u32) -> u32 {
    (speed_ms * (100 - ADAPTIVE_SHRINK_PERCENT) / 100).max(ADAPTIVE_SPEED_FLOOR_MS)
}

fn impulse_for(effect: TileEffect) -> EmotionalImpulse {
    match effect {
        TileEffect::Heal { amount } => {
            EmotionalImpulse { calm: amount as f32 * 0.1, agitation: 0.0 }
        }
        TileEffect::InsightGained { .. } => EmotionalImpulse { calm: 0.5, agitation: 0.0 },
        TileEffect::TeleportRandom { .. } => EmotionalImpulse { calm: 0.0, agitation: 0.2 },
        TileEffect::Damage { amount }
        | TileEffect::Stun { damage: amount, .. }
        | TileEffect::Slow { damage: amount, .. } => {
            EmotionalImpulse { calm: 0.0, agitation: amount as f32 * 0.1 }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::difficulty::NullEmotionalSink;

    fn neutral_frame() -> SignalFrame {
        SignalFrame::default()
    }

    #[test]
    fn new_session_matches_its_generated_level() {
        let session = SimulationSession::new(2024, DEFAULT_GRID_SIZE, RunPath::Steady);
        assert_eq!(session.level(), 1);
        assert_eq!(session.player().pos, Pos { y: 0, x: 0 });
        assert_eq!(session.insight_remaining(), session.grid().count_of(TileKind::Insight));
        assert!(!session.enemies().is_empty());
    }

    #[test]
    fn held_input_is_debounced_to_one_move_per_delay_window() {
        let mut session = SimulationSession::new(7, DEFAULT_GRID_SIZE, RunPath::Steady);
        // Clear the lane so both attempts would otherwise be accepted.
        session.grid.set_tile(Pos { y: 0, x: 1 }, TileKind::Void);
        session.grid.set_tile(Pos { y: 0, x: 2 }, TileKind::Void);
        session.enemies.clear();
        let mut sink = NullEmotionalSink;

        let first =
            session.advance(200, Some(Direction::Right), &neutral_frame(), &mut sink);
        assert!(first.move_result.is_some_and(|result| result.accepted));

        // 50ms later the window has not elapsed: the input is swallowed.
        let second = session.advance(50, Some(Direction::Right), &neutral_frame(), &mut sink);
        assert!(second.move_result.is_none());

        let third = session.advance(200, Some(Direction::Right), &neutral_frame(), &mut sink);
        assert!(third.move_result.is_some_and(|result| result.accepted));
        assert_eq!(session.player().pos, Pos { y: 0, x: 2 });
    }

    #[test]
    fn slowed_status_doubles_the_move_delay() {
        let mut session = SimulationSession::new(8, DEFAULT_GRID_SIZE, RunPath::Steady);
        session.grid.set_tile(Pos { y: 0, x: 1 }, TileKind::Void);
        session.enemies.clear();
        session.player.status_effects.push(StatusEffect::Slowed { moves_remaining: 2 });
        let mut sink = NullEmotionalSink;

        // 200ms clears the normal window but not the doubled one.
        let blocked = session.advance(200, Some(Direction::Right), &neutral_frame(), &mut sink);
        assert!(blocked.move_result.is_none());

        let allowed = session.advance(200, Some(Direction::Right), &neutral_frame(), &mut sink);
        assert!(allowed.move_result.is_some_and(|result| result.accepted));
    }

    #[test]
    fn completing_the_insight_count_signals_and_gates_the_transition() {
        let mut session = SimulationSession::new(9, DEFAULT_GRID_SIZE, RunPath::Steady);
        session.enemies.clear();
        // Collapse the objective to one adjacent insight tile.
        for tile in &mut session.grid.tiles {
            if *tile == TileKind::Insight {
                *tile = TileKind::Void;
            }
        }
        session.grid.set_tile(Pos { y: 0, x: 1 }, TileKind::Insight);
        session.insight_remaining = 1;
        let mut sink = NullEmotionalSink;

        assert_eq!(session.advance_level(), Err(SessionError::NoLevelPending));

        let result = session.advance(200, Some(Direction::Right), &neutral_frame(), &mut sink);
        assert!(result.level_complete);
        assert!(session.drain_events().contains(&TickEvent::LevelCleared { level: 1 }));

        assert_eq!(session.advance_level(), Ok(2));
        assert_eq!(session.level(), 2);
        assert_eq!(session.player().pos, Pos { y: 0, x: 0 });
        assert!(session.hallucinations().is_empty());
        assert_eq!(session.advance_level(), Err(SessionError::NoLevelPending));
    }

    #[test]
    fn dead_sessions_no_op_and_keep_reporting_death() {
        let mut session = SimulationSession::new(10, DEFAULT_GRID_SIZE, RunPath::Steady);
        session.player.hp = 0;
        let mut sink = NullEmotionalSink;

        let before = session.snapshot_hash();
        let result = session.advance(200, Some(Direction::Right), &neutral_frame(), &mut sink);
        assert!(result.player_dead);
        assert!(result.move_result.is_none());
        assert_eq!(session.snapshot_hash(), before);
    }

    #[test]
    fn adaptive_enemies_quicken_after_landing_a_hit() {
        let mut session = SimulationSession::new(11, DEFAULT_GRID_SIZE, RunPath::Steady);
        session.enemies.clear();
        session.hallucinations.clear();
        session.grid.set_tile(Pos { y: 5, x: 5 }, TileKind::Void);
        session.grid.set_tile(Pos { y: 5, x: 6 }, TileKind::Void);
        session.player.pos = Pos { y: 5, x: 5 };
        let id = session.enemies.insert(Enemy {
            pos: Pos { y: 5, x: 6 },
            behavior: BehaviorTag::Adaptive,
            speed_ms: 540,
            last_move_at_ms: 0,
            stun_ms: 0,
            hp: 10,
            patrol_angle: 0.0,
            orbit_angle: 0.0,
            orbit_radius: 0.0,
            hits_on_player: 0,
        });
        let mut sink = NullEmotionalSink;

        session.advance(600, None, &neutral_frame(), &mut sink);
        assert_eq!(session.enemies()[id].hits_on_player, 1);
        assert_eq!(session.enemies()[id].speed_ms, 486);
        assert!(
            session
                .drain_events()
                .iter()
                .any(|event| matches!(event, TickEvent::AdaptiveQuickened { .. }))
        );
    }

    #[test]
    fn snapshot_hash_distinguishes_seeds_and_tracks_progress() {
        let baseline = SimulationSession::new(42, DEFAULT_GRID_SIZE, RunPath::Steady);
        let other_seed = SimulationSession::new(43, DEFAULT_GRID_SIZE, RunPath::Steady);
        assert_ne!(baseline.snapshot_hash(), other_seed.snapshot_hash());

        let mut advanced = SimulationSession::new(42, DEFAULT_GRID_SIZE, RunPath::Steady);
        let mut sink = NullEmotionalSink;
        advanced.advance(200, Some(Direction::Right), &neutral_frame(), &mut sink);
        assert_ne!(baseline.snapshot_hash(), advanced.snapshot_hash());
    }
}
