//! Procedural level generation: interior walls, difficulty-scaled tile
//! categories, and enemy spawn selection.
//!
//! Wall placement is independent of any connectivity check: a level may
//! contain pockets the player cannot reach. That is accepted behavior, not
//! a generation failure; the returned per-category counts are what matters.

mod density;
mod placement;

use crate::content::WALL_DENSITY;
use crate::difficulty::DifficultyContext;
use crate::rng::{SessionRng, derive_level_seed};
use crate::state::Grid;
use crate::types::{BehaviorTag, Pos, RunPath, TileKind};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PlacementCounts {
    pub insight: u32,
    pub peace: u32,
    pub memory: u32,
    pub ember: u32,
    pub shard: u32,
    pub trap: u32,
    pub hidden: u32,
    pub teleport: u32,
    pub cover: u32,
}

impl PlacementCounts {
    fn record(&mut self, kind: TileKind, placed: u32) {
        match kind {
            TileKind::Insight => self.insight = placed,
            TileKind::Peace => self.peace = placed,
            TileKind::Memory => self.memory = placed,
            TileKind::Ember => self.ember = placed,
            TileKind::Shard => self.shard = placed,
            TileKind::Trap => self.trap = placed,
            TileKind::Hidden => self.hidden = placed,
            TileKind::Teleport => self.teleport = placed,
            TileKind::Cover => self.cover = placed,
            TileKind::Void | TileKind::Wall => {}
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EnemySpawn {
    pub behavior: BehaviorTag,
    pub pos: Pos,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GeneratedLevel {
    pub grid: Grid,
    pub spawn_tile: Pos,
    pub placed: PlacementCounts,
    pub enemy_spawns: Vec<EnemySpawn>,
}

/// Build one level. Pure in `(run_seed, size, level, path)` plus the
/// difficulty context; never fails. A crowded grid yields an
/// under-populated level and the counts say so.
pub fn generate_level(
    run_seed: u64,
    size: usize,
    level: u32,
    path: RunPath,
    context: &DifficultyContext,
) -> GeneratedLevel {
    let level_seed = derive_level_seed(run_seed, level, path.code());
    let mut rng = SessionRng::seed_from_u64(level_seed);

    let mut grid = Grid::new(size);

    let wall_count = (size as f32 * WALL_DENSITY).round() as u32;
    placement::place_interior_walls(&mut grid, wall_count, &mut rng);
    placement::clear_spawn_region(&mut grid);

    let mut placed = PlacementCounts::default();
    for spec in &density::PLACED_CATEGORIES {
        let requested = density::target_count(spec, level, context);
        let got = placement::scatter_category(
            &mut grid,
            spec.kind,
            requested,
            density::is_reward(spec.kind),
            &mut rng,
        );
        placed.record(spec.kind, got);
    }

    let enemy_count = density::enemy_target_count(level, context);
    let enemy_spawns = placement::scatter_enemy_positions(&grid, enemy_count, &mut rng)
        .into_iter()
        .map(|pos| EnemySpawn { behavior: density::pick_behavior(level, &mut rng), pos })
        .collect();

    GeneratedLevel { grid, spawn_tile: placement::SPAWN_TILE, placed, enemy_spawns }
}
