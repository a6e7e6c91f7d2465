//! Probabilistic spawn/tick/despawn of short-lived hallucination hazards.
//! They drift one cell toward the player on a fixed cadence, deliver at
//! most one contact hit, and fade on timeout. Not physical: walls do not
//! stop them.

use slotmap::SlotMap;

use crate::behavior::BehaviorContext;
use crate::content::{
    HALLUCINATION_DAMAGE, HALLUCINATION_LIFE_MS, HALLUCINATION_MAX_CONCURRENT,
    HALLUCINATION_MIN_LEVEL, HALLUCINATION_PLACE_RETRY_CEILING, HALLUCINATION_RATE_PER_LEVEL,
    HALLUCINATION_STEP_MS,
};
use crate::difficulty::scaled_damage;
use crate::rng::SessionRng;
use crate::state::{Grid, Hallucination, Player};
use crate::types::{HallucinationId, Pos, TickEvent, TileKind};

/// Advance every hallucination by one tick and maybe spawn a new one.
pub fn tick(
    hallucinations: &mut SlotMap<HallucinationId, Hallucination>,
    grid: &Grid,
    player: &mut Player,
    level: u32,
    context: &BehaviorContext<'_>,
    rng: &mut SessionRng,
) -> Vec<TickEvent> {
    let mut events = Vec::new();

    if level >= HALLUCINATION_MIN_LEVEL
        && hallucinations.len() < HALLUCINATION_MAX_CONCURRENT
        && rng.roll_chance(HALLUCINATION_RATE_PER_LEVEL * level as f32)
        && let Some(pos) = find_void_cell(grid, player.pos, rng)
    {
        hallucinations.insert(Hallucination {
            pos,
            remaining_life_ms: HALLUCINATION_LIFE_MS,
            step_timer_ms: 0,
        });
        events.push(TickEvent::HallucinationFormed { pos });
    }

    let ids: Vec<HallucinationId> = hallucinations.keys().collect();
    for id in ids {
        let entity = &mut hallucinations[id];
        entity.remaining_life_ms -= context.dt_ms as i32;
        if entity.remaining_life_ms <= 0 {
            let pos = entity.pos;
            hallucinations.remove(id);
            events.push(TickEvent::HallucinationFaded { pos });
            continue;
        }

        entity.step_timer_ms += context.dt_ms as u32;
        if entity.step_timer_ms < HALLUCINATION_STEP_MS {
            continue;
        }
        entity.step_timer_ms -= HALLUCINATION_STEP_MS;
        entity.pos = drift_step(entity.pos, player.pos);

        if entity.pos == player.pos {
            let damage = scaled_damage(
                HALLUCINATION_DAMAGE,
                context.difficulty,
                context.intensity,
                context.distortion_bonus,
            );
            player.hp = (player.hp - damage).max(0);
            hallucinations.remove(id);
            events.push(TickEvent::HallucinationStruck { damage });
        }
    }

    events
}

/// Sign-only step toward the player, larger-|delta| axis first. Solidity is
/// deliberately ignored; bounds hold because the target is inside the grid.
fn drift_step(from: Pos, target: Pos) -> Pos {
    let dy = target.y - from.y;
    let dx = target.x - from.x;
    if dy == 0 && dx == 0 {
        return from;
    }
    if dy.abs() >= dx.abs() && dy != 0 {
        Pos { y: from.y + dy.signum(), x: from.x }
    } else {
        Pos { y: from.y, x: from.x + dx.signum() }
    }
}

/// Bounded-retry placement onto a `Void` cell that is not the player's.
/// `None` silently skips this tick's spawn.
fn find_void_cell(grid: &Grid, exclude: Pos, rng: &mut SessionRng) -> Option<Pos> {
    for _ in 0..HALLUCINATION_PLACE_RETRY_CEILING {
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
