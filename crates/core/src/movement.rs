//! Player movement validation and tile-effect resolution. Rejections mutate
//! nothing; every side effect of an accepted move is reported as a typed
//! descriptor so rendering/audio collaborators can react without being
//! called from here.

use crate::content::{HIDDEN_SLOW_MOVES, TELEPORT_RETRY_CEILING, TRAP_STUN_TURNS, effect_profile};
use crate::difficulty::{DifficultyContext, scaled_damage};
use crate::rng::SessionRng;
use crate::state::{Grid, Player};
use crate::types::{Direction, MoveResult, Pos, StatusEffect, TileEffect, TileKind};

pub struct MoveContext<'a> {
    pub difficulty: &'a DifficultyContext,
    /// Session-level intensity knob, folded into every damage roll.
    pub intensity: f32,
    /// Supplied by the difficulty layer; opaque here, already in `[0, 0.6]`.
    pub distortion_bonus: f32,
}

/// Validate and commit one requested step, then resolve the landed tile.
/// Reward effects resolve before hazard effects; a single tile is never
/// both. `insight_remaining` is the authoritative tiles-to-win counter and
/// reaching zero raises `level_complete`; the caller owns the transition.
pub fn attempt_move(
    player: &mut Player,
    grid: &mut Grid,
    direction: Direction,
    context: &MoveContext<'_>,
    insight_remaining: &mut u32,
    rng: &mut SessionRng,
) -> MoveResult {
    if player.stun_turns > 0 {
        // A stunned attempt burns one stun turn and changes nothing else.
        player.stun_turns -= 1;
        return MoveResult::rejected();
    }

    let target = player.pos.stepped(direction);
    if !grid.in_bounds(target) || grid.is_solid(target) {
        return MoveResult::rejected();
    }

    player.pos = target;
    let kind = grid.tile_at(target);
    let profile = effect_profile(kind);

    let mut effect = None;
    let mut level_complete = false;

    if profile.heal > 0 || profile.grants_insight {
        let applied_heal = (player.hp + profile.heal).min(player.max_hp) - player.hp;
        player.hp += applied_heal;
        player.score += profile.score as i64;
        if profile.grants_insight {
            player.insight_tokens += 1;
            *insight_remaining = insight_remaining.saturating_sub(1);
            level_complete = *insight_remaining == 0;
            effect = Some(TileEffect::InsightGained { tokens: 1, score: profile.score });
        } else {
            effect = Some(TileEffect::Heal { amount: applied_heal });
        }
        grid.set_tile(target, TileKind::Void);
    } else if profile.damage > 0 {
        let damage =
            scaled_damage(profile.damage, context.difficulty, context.intensity, context.distortion_bonus);
        player.hp = (player.hp - damage).max(0);
        effect = Some(match kind {
            TileKind::Trap => {
                player.stun_turns += TRAP_STUN_TURNS;
                grid.set_tile(target, TileKind::Void);
                TileEffect::Stun { turns: TRAP_STUN_TURNS, damage }
            }
            TileKind::Hidden => {
                player
                    .status_effects
                    .push(StatusEffect::Slowed { moves_remaining: HIDDEN_SLOW_MOVES });
                grid.set_tile(target, TileKind::Void);
                TileEffect::Slow { moves: HIDDEN_SLOW_MOVES, damage }
            }
            _ => TileEffect::Damage { amount: damage },
        });
    } else if kind == TileKind::Teleport
        && let Some(destination) = random_void_cell(grid, player.pos, rng)
    {
        player.pos = destination;
        effect = Some(TileEffect::TeleportRandom { to: destination });
    }

    MoveResult { accepted: true, effect, player_dead: player.hp <= 0, level_complete }
}

/// Bounded-retry search for a random `Void` destination. On exhaustion the
/// teleport simply leaves the player where they stand.
fn random_void_cell(grid: &Grid, exclude: Pos, rng: &mut SessionRng) -> Option<Pos> {
    for _ in 0..TELEPORT_RETRY_CEILING {
        let candidate = Pos {
            y: rng.roll_usize(0, grid.size - 1) as i32,
            x: rng.roll_usize(0, grid.size - 1) as i32,
        };
        if candidate != exclude && grid.tile_at(candidate) == TileKind::Void {
            return Some(candidate);
        }
    }
    None
}
