//! Bounded-retry random placement primitives. Nothing here throws or loops
//! forever: a category that cannot find room before the retry ceiling is
//! simply placed short, and the returned count is the truth.

use crate::content::CATEGORY_RETRY_CEILING;
use crate::rng::SessionRng;
use crate::state::Grid;
use crate::types::{Pos, TileKind, manhattan};

/// Spawn corner plus its ring, kept clear of walls and refused to rewards.
pub(super) fn in_spawn_region(pos: Pos) -> bool {
    (0..=1).contains(&pos.y) && (0..=1).contains(&pos.x)
}

pub(super) const SPAWN_TILE: Pos = Pos { y: 0, x: 0 };

/// Interior walls land at uniformly random interior coordinates. Overwrites
/// are acceptable for walls, so this needs no retry loop at all.
pub(super) fn place_interior_walls(grid: &mut Grid, count: u32, rng: &mut SessionRng) {
    if grid.size < 3 {
        return;
    }
    for _ in 0..count {
        let y = rng.roll_usize(1, grid.size - 2) as i32;
        let x = rng.roll_usize(1, grid.size - 2) as i32;
        grid.set_tile(Pos { y, x }, TileKind::Wall);
    }
}

/// Force the spawn corner and its surrounding ring back to `Void` so the
/// player is never boxed in at tick 0.
pub(super) fn clear_spawn_region(grid: &mut Grid) {
    for y in 0..=1 {
        for x in 0..=1 {
            grid.set_tile(Pos { y, x }, TileKind::Void);
        }
    }
}

/// Bounded-retry scatter of one category. Samples random coordinates,
/// accepting only still-`Void` cells (and, for rewards, cells outside the
/// protected spawn region); gives up after the retry ceiling. Returns the
/// count actually placed, which callers must treat as authoritative.
pub(super) fn scatter_category(
    grid: &mut Grid,
    kind: TileKind,
    requested: u32,
    protect_spawn_region: bool,
    rng: &mut SessionRng,
) -> u32 {
    let mut placed = 0;
    let mut attempts = 0;
    while placed < requested && attempts < CATEGORY_RETRY_CEILING {
        attempts += 1;
        let pos = Pos {
            y: rng.roll_usize(0, grid.size - 1) as i32,
            x: rng.roll_usize(0, grid.size - 1) as i32,
        };
        if grid.tile_at(pos) != TileKind::Void {
            continue;
        }
        if protect_spawn_region && in_spawn_region(pos) {
            continue;
        }
        grid.set_tile(pos, kind);
        placed += 1;
    }
    placed
}

/// Bounded-retry enemy placement: `Void` cells, clear of the spawn corner,
/// one enemy per cell. Short counts are silently accepted.
pub(super) fn scatter_enemy_positions(
    grid: &Grid,
    requested: u32,
    rng: &mut SessionRng,
) -> Vec<Pos> {
    let mut positions: Vec<Pos> = Vec::with_capacity(requested as usize);
    let mut attempts = 0;
    while (positions.len() as u32) < requested && attempts < CATEGORY_RETRY_CEILING {
        attempts += 1;
        let pos = Pos {
            y: rng.roll_usize(0, grid.size - 1) as i32,
            x: rng.roll_usize(0, grid.size - 1) as i32,
        };
        if grid.tile_at(pos) != TileKind::Void {
            continue;
        }
        if manhattan(pos, SPAWN_TILE) <= 4 {
            continue;
        }
        if positions.contains(&pos) {
            continue;
        }
        positions.push(pos);
    }
    positions
}
