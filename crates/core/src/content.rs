//! Static content tables: tile effect profiles, enemy archetypes, and the
//! tuning constants shared across generation, movement, and behavior.

use crate::types::{BehaviorTag, TileKind};

/// Player movement debounce; held input never exceeds one move per interval.
pub const MOVE_DELAY_MS: u64 = 160;
/// Floor for enemy step intervals after the speed multiplier is applied.
pub const MIN_STEP_INTERVAL_MS: u32 = 120;
/// Contact damage base for enemies occupying the player's cell.
pub const CONTACT_DAMAGE: i32 = 6;
/// Interior wall count per level = round(size * WALL_DENSITY).
pub const WALL_DENSITY: f32 = 0.9;
/// Per-category placement gives up after this many rejected samples.
pub const CATEGORY_RETRY_CEILING: u32 = 9999;
/// Teleport destination search gives up after this many samples.
pub const TELEPORT_RETRY_CEILING: u32 = 40;

pub const HALLUCINATION_MIN_LEVEL: u32 = 3;
pub const HALLUCINATION_RATE_PER_LEVEL: f32 = 0.004;
pub const HALLUCINATION_MAX_CONCURRENT: usize = 5;
pub const HALLUCINATION_LIFE_MS: i32 = 6000;
pub const HALLUCINATION_STEP_MS: u32 = 450;
pub const HALLUCINATION_DAMAGE: i32 = 5;
pub const HALLUCINATION_PLACE_RETRY_CEILING: u32 = 40;

/// Adaptive enemies lose 10% of their step interval per landed hit,
/// floored so they never become untrackable.
pub const ADAPTIVE_SHRINK_PERCENT: u32 = 10;
pub const ADAPTIVE_SPEED_FLOOR_MS: u32 = 180;

pub const PLAYER_START_HP: i32 = 100;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TileEffectProfile {
    pub damage: i32,
    pub heal: i32,
    pub score: i32,
    pub grants_insight: bool,
    pub solid: bool,
    pub spawn_weight: u32,
}

const fn profile(
    damage: i32,
    heal: i32,
    score: i32,
    grants_insight: bool,
    solid: bool,
    spawn_weight: u32,
) -> TileEffectProfile {
    TileEffectProfile { damage, heal, score, grants_insight, solid, spawn_weight }
}

const PROFILE_VOID: TileEffectProfile = profile(0, 0, 0, false, false, 0);
const PROFILE_WALL: TileEffectProfile = profile(0, 0, 0, false, true, 0);
const PROFILE_PEACE: TileEffectProfile = profile(0, 12, 10, false, false, 3);
const PROFILE_MEMORY: TileEffectProfile = profile(0, 4, 5, false, false, 2);
const PROFILE_INSIGHT: TileEffectProfile = profile(0, 0, 25, true, false, 6);
const PROFILE_EMBER: TileEffectProfile = profile(8, 0, 0, false, false, 4);
const PROFILE_SHARD: TileEffectProfile = profile(14, 0, 0, false, false, 2);
const PROFILE_TRAP: TileEffectProfile = profile(4, 0, 0, false, false, 1);
const PROFILE_HIDDEN: TileEffectProfile = profile(10, 0, 0, false, false, 1);
const PROFILE_TELEPORT: TileEffectProfile = profile(0, 0, 0, false, false, 1);
const PROFILE_COVER: TileEffectProfile = profile(0, 0, 0, false, false, 3);

pub fn effect_profile(kind: TileKind) -> &'static TileEffectProfile {
    match kind {
        TileKind::Void => &PROFILE_VOID,
        TileKind::Wall => &PROFILE_WALL,
        TileKind::Peace => &PROFILE_PEACE,
        TileKind::Memory => &PROFILE_MEMORY,
        TileKind::Insight => &PROFILE_INSIGHT,
        TileKind::Ember => &PROFILE_EMBER,
        TileKind::Shard => &PROFILE_SHARD,
        TileKind::Trap => &PROFILE_TRAP,
        TileKind::Hidden => &PROFILE_HIDDEN,
        TileKind::Teleport => &PROFILE_TELEPORT,
        TileKind::Cover => &PROFILE_COVER,
    }
}

pub const TRAP_STUN_TURNS: u32 = 2;
pub const HIDDEN_SLOW_MOVES: u32 = 3;

pub struct EnemyArchetype {
    pub speed_ms: u32,
    pub hp: i32,
    pub orbit_radius: f32,
}

pub fn enemy_archetype(behavior: BehaviorTag) -> EnemyArchetype {
    match behavior {
        BehaviorTag::Chase => EnemyArchetype { speed_ms: 520, hp: 10, orbit_radius: 0.0 },
        BehaviorTag::Wander => EnemyArchetype { speed_ms: 600, hp: 8, orbit_radius: 0.0 },
        BehaviorTag::Patrol => EnemyArchetype { speed_ms: 640, hp: 12, orbit_radius: 0.0 },
        BehaviorTag::Orbit => EnemyArchetype { speed_ms: 560, hp: 10, orbit_radius: 3.0 },
        BehaviorTag::Adaptive => EnemyArchetype { speed_ms: 540, hp: 10, orbit_radius: 0.0 },
        BehaviorTag::Predictive => EnemyArchetype { speed_ms: 500, hp: 10, orbit_radius: 0.0 },
        BehaviorTag::Rush => EnemyArchetype { speed_ms: 420, hp: 6, orbit_radius: 0.0 },
        BehaviorTag::Scatter => EnemyArchetype { speed_ms: 580, hp: 8, orbit_radius: 0.0 },
    }
}
