//! Level-scaled target counts and clamp bands for placed tile categories,
//! plus the enemy behavior mix per level band.

use crate::difficulty::DifficultyContext;
use crate::rng::SessionRng;
use crate::types::{BehaviorTag, TileKind};

/// Which difficulty multiplier scales a category's target count.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum CountScaling {
    Insight,
    Peace,
    Hazard,
    Neutral,
}

#[derive(Clone, Copy, Debug)]
pub(super) struct CategorySpec {
    pub(super) kind: TileKind,
    pub(super) base: u32,
    pub(super) growth_per_level: f32,
    pub(super) min_count: u32,
    pub(super) max_count: u32,
    pub(super) scaling: CountScaling,
}

/// Placement order is part of the generated-level contract: earlier
/// categories win contended cells on crowded grids.
pub(super) const PLACED_CATEGORIES: [CategorySpec; 9] = [
    CategorySpec {
        kind: TileKind::Insight,
        base: 6,
        growth_per_level: 0.5,
        min_count: 3,
        max_count: 14,
        scaling: CountScaling::Insight,
    },
    CategorySpec {
        kind: TileKind::Peace,
        base: 3,
        growth_per_level: 0.25,
        min_count: 1,
        max_count: 8,
        scaling: CountScaling::Peace,
    },
    CategorySpec {
        kind: TileKind::Memory,
        base: 2,
        growth_per_level: 0.25,
        min_count: 0,
        max_count: 6,
        scaling: CountScaling::Peace,
    },
    CategorySpec {
        kind: TileKind::Ember,
        base: 4,
        growth_per_level: 0.75,
        min_count: 2,
        max_count: 16,
        scaling: CountScaling::Hazard,
    },
    CategorySpec {
        kind: TileKind::Shard,
        base: 2,
        growth_per_level: 0.5,
        min_count: 1,
        max_count: 10,
        scaling: CountScaling::Hazard,
    },
    CategorySpec {
        kind: TileKind::Trap,
        base: 1,
        growth_per_level: 0.34,
        min_count: 0,
        max_count: 6,
        scaling: CountScaling::Hazard,
    },
    CategorySpec {
        kind: TileKind::Hidden,
        base: 1,
        growth_per_level: 0.25,
        min_count: 0,
        max_count: 5,
        scaling: CountScaling::Hazard,
    },
    CategorySpec {
        kind: TileKind::Teleport,
        base: 1,
        growth_per_level: 0.2,
        min_count: 0,
        max_count: 3,
        scaling: CountScaling::Neutral,
    },
    CategorySpec {
        kind: TileKind::Cover,
        base: 3,
        growth_per_level: 0.3,
        min_count: 0,
        max_count: 8,
        scaling: CountScaling::Neutral,
    },
];

pub(super) fn is_reward(kind: TileKind) -> bool {
    matches!(kind, TileKind::Insight | TileKind::Peace | TileKind::Memory)
}

/// `clamp(round((base + floor(level * growth)) * multiplier))`.
pub(super) fn target_count(
    spec: &CategorySpec,
    level: u32,
    context: &DifficultyContext,
) -> u32 {
    let multiplier = match spec.scaling {
        CountScaling::Insight => context.insight_multiplier,
        CountScaling::Peace => context.peace_multiplier,
        CountScaling::Hazard => context.damage_multiplier,
        CountScaling::Neutral => 1.0,
    };
    let grown = spec.base + (level as f32 * spec.growth_per_level).floor() as u32;
    let scaled = (grown as f32 * multiplier).round() as u32;
    scaled.clamp(spec.min_count, spec.max_count)
}

const ENEMY_BASE_COUNT: u32 = 2;
const ENEMY_GROWTH_PER_LEVEL: f32 = 0.8;
const ENEMY_MIN_COUNT: u32 = 1;
const ENEMY_MAX_COUNT: u32 = 10;

pub(super) fn enemy_target_count(level: u32, context: &DifficultyContext) -> u32 {
    let grown = ENEMY_BASE_COUNT + (level as f32 * ENEMY_GROWTH_PER_LEVEL).floor() as u32;
    let scaled = (grown as f32 * context.enemy_count_multiplier).round() as u32;
    scaled.clamp(ENEMY_MIN_COUNT, ENEMY_MAX_COUNT)
}

/// Behavior mix widens with depth: early levels stay readable, later ones
/// introduce the aggressive and anticipatory strategies.
pub(super) fn pick_behavior(level: u32, rng: &mut SessionRng) -> BehaviorTag {
    let roll = rng.roll_usize(0, 99);
    match level {
        0..=2 => {
            if roll < 65 {
                BehaviorTag::Chase
            } else {
                BehaviorTag::Wander
            }
        }
        3..=4 => {
            if roll < 40 {
                BehaviorTag::Chase
            } else if roll < 60 {
                BehaviorTag::Wander
            } else if roll < 80 {
                BehaviorTag::Patrol
            } else {
                BehaviorTag::Scatter
            }
        }
        5..=6 => {
            if roll < 25 {
                BehaviorTag::Chase
            } else if roll < 40 {
                BehaviorTag::Wander
            } else if roll < 55 {
                BehaviorTag::Patrol
            } else if roll < 70 {
                BehaviorTag::Scatter
            } else if roll < 85 {
                BehaviorTag::Orbit
            } else {
                BehaviorTag::Adaptive
            }
        }
        _ => {
            if roll < 20 {
                BehaviorTag::Chase
            } else if roll < 35 {
                BehaviorTag::Patrol
            } else if roll < 50 {
                BehaviorTag::Orbit
            } else if roll < 65 {
                BehaviorTag::Adaptive
            } else if roll < 80 {
                BehaviorTag::Predictive
            } else {
                BehaviorTag::Rush
            }
        }
    }
}
