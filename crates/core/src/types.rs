use serde::{Deserialize, Serialize};
use slotmap::new_key_type;

new_key_type! {
    pub struct EnemyId;
    pub struct HallucinationId;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Pos {
    pub y: i32,
    pub x: i32,
}

impl Pos {
    pub fn stepped(self, direction: Direction) -> Self {
        let (dy, dx) = direction.delta();
        Pos { y: self.y + dy, x: self.x + dx }
    }
}

pub fn manhattan(a: Pos, b: Pos) -> u32 {
    a.x.abs_diff(b.x) + a.y.abs_diff(b.y)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] =
        [Direction::Up, Direction::Right, Direction::Down, Direction::Left];

    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TileKind {
    Void,
    Wall,
    Peace,
    Memory,
    Insight,
    Ember,
    Shard,
    Trap,
    Hidden,
    Teleport,
    Cover,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BehaviorTag {
    Chase,
    Wander,
    Patrol,
    Orbit,
    Adaptive,
    Predictive,
    Rush,
    Scatter,
}

impl BehaviorTag {
    /// Parse a behavior name from untyped entity data. Unknown names degrade
    /// to `Chase` so malformed or legacy records keep moving instead of
    /// failing the session.
    pub fn parse(name: &str) -> BehaviorTag {
        match name {
            "chase" => BehaviorTag::Chase,
            "wander" => BehaviorTag::Wander,
            "patrol" => BehaviorTag::Patrol,
            "orbit" => BehaviorTag::Orbit,
            "adaptive" => BehaviorTag::Adaptive,
            "predictive" => BehaviorTag::Predictive,
            "rush" => BehaviorTag::Rush,
            "scatter" => BehaviorTag::Scatter,
            _ => BehaviorTag::Chase,
        }
    }
}

/// The committed play-path of a run. Biases the composed difficulty context
/// and is folded into the level seed, so the same run seed diverges per path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RunPath {
    Steady,
    Turbulent,
    Lucid,
}

impl RunPath {
    pub fn code(self) -> u64 {
        match self {
            RunPath::Steady => 0,
            RunPath::Turbulent => 1,
            RunPath::Lucid => 2,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusEffect {
    Slowed { moves_remaining: u32 },
}

/// Typed side-effect descriptor for a resolved tile. The caller (rendering,
/// audio, score overlays) reacts to these; the resolver never calls out.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TileEffect {
    Heal { amount: i32 },
    Damage { amount: i32 },
    InsightGained { tokens: u32, score: i32 },
    TeleportRandom { to: Pos },
    Stun { turns: u32, damage: i32 },
    Slow { moves: u32, damage: i32 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveResult {
    pub accepted: bool,
    pub effect: Option<TileEffect>,
    pub player_dead: bool,
    pub level_complete: bool,
}

impl MoveResult {
    pub fn rejected() -> Self {
        Self { accepted: false, effect: None, player_dead: false, level_complete: false }
    }
}

/// Per-tick outcome of `SimulationSession::advance`. Small and serializable.
/// `level_complete` stays raised until the caller performs the transition
/// through `advance_level`; the session never swaps the grid on its own.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickResult {
    pub move_result: Option<MoveResult>,
    pub player_dead: bool,
    pub level_complete: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TickEvent {
    LevelStarted { level: u32 },
    LevelCleared { level: u32 },
    EnemyContact { enemy: EnemyId, damage: i32 },
    AdaptiveQuickened { enemy: EnemyId, speed_ms: u32 },
    HallucinationFormed { pos: Pos },
    HallucinationStruck { damage: i32 },
    HallucinationFaded { pos: Pos },
    PlayerDied { level: u32 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionError {
    NoLevelPending,
}
