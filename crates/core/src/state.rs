use serde::{Deserialize, Serialize};

use crate::content::effect_profile;
use crate::types::*;

/// Square tile matrix with flat storage. Out-of-bounds probes read as `Wall`
/// so bounds and solidity collapse into one check for movement code.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    pub size: usize,
    pub tiles: Vec<TileKind>,
}

impl Grid {
    pub fn new(size: usize) -> Self {
        Self { size, tiles: vec![TileKind::Void; size * size] }
    }

    pub fn in_bounds(&self, pos: Pos) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as usize) < self.size && (pos.y as usize) < self.size
    }

    pub fn tile_at(&self, pos: Pos) -> TileKind {
        if !self.in_bounds(pos) {
            return TileKind::Wall;
        }
        self.tiles[self.index(pos)]
    }

    pub fn set_tile(&mut self, pos: Pos, tile: TileKind) {
        if !self.in_bounds(pos) {
            return;
        }
        let idx = self.index(pos);
        self.tiles[idx] = tile;
    }

    pub fn is_solid(&self, pos: Pos) -> bool {
        effect_profile(self.tile_at(pos)).solid
    }

    pub fn is_open(&self, pos: Pos) -> bool {
        self.in_bounds(pos) && !self.is_solid(pos)
    }

    pub fn count_of(&self, kind: TileKind) -> u32 {
        self.tiles.iter().filter(|&&tile| tile == kind).count() as u32
    }

    fn index(&self, pos: Pos) -> usize {
        (pos.y as usize) * self.size + (pos.x as usize)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub pos: Pos,
    pub hp: i32,
    pub max_hp: i32,
    pub score: i64,
    pub insight_tokens: u32,
    pub stun_turns: u32,
    pub status_effects: Vec<StatusEffect>,
    pub last_move_at_ms: u64,
    /// Last accepted step; feeds the `Predictive` behavior's aim-ahead.
    pub last_step: Option<Direction>,
}

impl Player {
    pub fn new(pos: Pos, max_hp: i32) -> Self {
        Self {
            pos,
            hp: max_hp,
            max_hp,
            score: 0,
            insight_tokens: 0,
            stun_turns: 0,
            status_effects: Vec::new(),
            last_move_at_ms: 0,
            last_step: None,
        }
    }

    pub fn is_slowed(&self) -> bool {
        self.status_effects
            .iter()
            .any(|effect| matches!(effect, StatusEffect::Slowed { moves_remaining } if *moves_remaining > 0))
    }

    /// Consume one move from every counted status, dropping expired ones.
    pub fn tick_statuses_after_move(&mut self) {
        for effect in &mut self.status_effects {
            match effect {
                StatusEffect::Slowed { moves_remaining } => {
                    *moves_remaining = moves_remaining.saturating_sub(1);
                }
            }
        }
        self.status_effects
            .retain(|effect| !matches!(effect, StatusEffect::Slowed { moves_remaining: 0 }));
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub pos: Pos,
    pub behavior: BehaviorTag,
    pub speed_ms: u32,
    pub last_move_at_ms: u64,
    pub stun_ms: u32,
    pub hp: i32,
    pub patrol_angle: f32,
    pub orbit_angle: f32,
    pub orbit_radius: f32,
    pub hits_on_player: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Hallucination {
    pub pos: Pos,
    pub remaining_life_ms: i32,
    pub step_timer_ms: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_bounds_reads_as_wall() {
        let grid = Grid::new(5);
        assert_eq!(grid.tile_at(Pos { y: -1, x: 0 }), TileKind::Wall);
        assert_eq!(grid.tile_at(Pos { y: 0, x: 5 }), TileKind::Wall);
        assert!(grid.is_solid(Pos { y: 5, x: 5 }));
    }

    #[test]
    fn set_tile_ignores_out_of_bounds_writes() {
        let mut grid = Grid::new(4);
        grid.set_tile(Pos { y: 9, x: 9 }, TileKind::Peace);
        assert_eq!(grid.count_of(TileKind::Peace), 0);
    }

    #[test]
    fn slowed_status_expires_after_counted_moves() {
        let mut player = Player::new(Pos { y: 0, x: 0 }, 100);
        player.status_effects.push(StatusEffect::Slowed { moves_remaining: 2 });
        assert!(player.is_slowed());

        player.tick_statuses_after_move();
        assert!(player.is_slowed());
        player.tick_statuses_after_move();
        assert!(!player.is_slowed());
        assert!(player.status_effects.is_empty());
    }
}
