//! Per-tick enemy stepping: one state machine (stunned → eligible →
//! dispatch) and one shared step-with-fallback primitive under eight
//! movement strategies. Dispatch is total over the behavior enum; the
//! string-to-tag boundary is where unknown data degrades to `Chase`.

use slotmap::SlotMap;

use crate::content::{CONTACT_DAMAGE, MIN_STEP_INTERVAL_MS};
use crate::difficulty::{DifficultyContext, scaled_damage};
use crate::rng::SessionRng;
use crate::state::{Enemy, Grid, Player};
use crate::types::{BehaviorTag, Direction, EnemyId, Pos, manhattan};

const WANDER_BURST_RANGE: u32 = 4;
const PATROL_PIVOT_RANGE: u32 = 5;
const PATROL_PIVOT_CHANCE: f32 = 0.25;
const PATROL_HEADING_JITTER: f32 = 0.2;
const ORBIT_ANGLE_STEP: f32 = 0.25;

pub struct BehaviorContext<'a> {
    pub now_ms: u64,
    pub dt_ms: u64,
    pub difficulty: &'a DifficultyContext,
    pub intensity: f32,
    pub distortion_bonus: f32,
}

/// One landed contact this tick. The caller applies follow-up rules that are
/// not the engine's business (the adaptive speed shrink, event logging).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ContactHit {
    pub enemy: EnemyId,
    pub behavior: BehaviorTag,
    pub damage: i32,
}

/// Step every enemy at most once. Mutates enemies in place and applies
/// contact damage to the player; everything else is reported back.
pub fn step_all(
    enemies: &mut SlotMap<EnemyId, Enemy>,
    grid: &Grid,
    player: &mut Player,
    context: &BehaviorContext<'_>,
    rng: &mut SessionRng,
) -> Vec<ContactHit> {
    let mut hits = Vec::new();
    let ids: Vec<EnemyId> = enemies.keys().collect();

    for id in ids {
        let enemy = &mut enemies[id];

        if enemy.stun_ms > 0 {
            enemy.stun_ms = enemy.stun_ms.saturating_sub(context.dt_ms as u32);
            continue;
        }

        let interval = step_interval(enemy.speed_ms, context.difficulty);
        if context.now_ms.saturating_sub(enemy.last_move_at_ms) < interval as u64 {
            continue;
        }
        // The tick is consumed whether or not the step lands; a blocked rush
        // charged and failed, it does not bank the attempt.
        enemy.last_move_at_ms = context.now_ms;

        if let Some(next) = dispatch_step(enemy, grid, player, rng) {
            enemy.pos = next;
        }

        if enemy.pos == player.pos {
            let damage = scaled_damage(
                CONTACT_DAMAGE,
                context.difficulty,
                context.intensity,
                context.distortion_bonus,
            );
            player.hp = (player.hp - damage).max(0);
            enemy.hits_on_player += 1;
            hits.push(ContactHit { enemy: id, behavior: enemy.behavior, damage });
        }
    }

    hits
}

pub fn step_interval(speed_ms: u32, difficulty: &DifficultyContext) -> u32 {
    let scaled = (speed_ms as f32 * difficulty.enemy_speed_multiplier).round() as u32;
    scaled.max(MIN_STEP_INTERVAL_MS)
}

fn dispatch_step(
    enemy: &mut Enemy,
    grid: &Grid,
    player: &Player,
    rng: &mut SessionRng,
) -> Option<Pos> {
    let from = enemy.pos;
    match enemy.behavior {
        BehaviorTag::Chase | BehaviorTag::Adaptive => {
            step_with_fallback(grid, from, &toward(from, player.pos), true, rng)
        }
        BehaviorTag::Scatter => step_with_fallback(grid, from, &away(from, player.pos), true, rng),
        BehaviorTag::Rush => step_with_fallback(grid, from, &toward(from, player.pos), false, rng),
        BehaviorTag::Predictive => {
            let aim = match player.last_step {
                Some(direction) => player.pos.stepped(direction),
                None => player.pos,
            };
            step_with_fallback(grid, from, &toward(from, aim), false, rng)
        }
        BehaviorTag::Wander => {
            if manhattan(from, player.pos) < WANDER_BURST_RANGE {
                step_with_fallback(grid, from, &toward(from, player.pos), true, rng)
            } else {
                step_with_fallback(grid, from, &[], true, rng)
            }
        }
        BehaviorTag::Patrol => {
            enemy.patrol_angle += rng.roll_signed(PATROL_HEADING_JITTER);
            if manhattan(from, player.pos) < PATROL_PIVOT_RANGE
                && rng.roll_chance(PATROL_PIVOT_CHANCE)
            {
                step_with_fallback(grid, from, &toward(from, player.pos), true, rng)
            } else {
                step_with_fallback(grid, from, &heading_directions(enemy.patrol_angle), true, rng)
            }
        }
        BehaviorTag::Orbit => {
            enemy.orbit_angle += ORBIT_ANGLE_STEP;
            let target = orbit_target(player.pos, enemy.orbit_angle, enemy.orbit_radius);
            step_with_fallback(grid, from, &toward(from, target), true, rng)
        }
    }
}

/// The rotating point an orbiter walks toward: fixed radius around the
/// player, not the player itself.
pub fn orbit_target(center: Pos, angle: f32, radius: f32) -> Pos {
    Pos {
        y: center.y + (radius * angle.sin()).round() as i32,
        x: center.x + (radius * angle.cos()).round() as i32,
    }
}

/// Try each preferred direction in order and take the first open step;
/// optionally spend one uniformly-random try when all preferred fail.
fn step_with_fallback(
    grid: &Grid,
    from: Pos,
    preferred: &[Direction],
    random_fallback: bool,
    rng: &mut SessionRng,
) -> Option<Pos> {
    for &direction in preferred {
        let target = from.stepped(direction);
        if grid.is_open(target) {
            return Some(target);
        }
    }
    if random_fallback {
        let target = from.stepped(rng.roll_direction());
        if grid.is_open(target) {
            return Some(target);
        }
    }
    None
}

/// Axis-priority pursuit order: the larger-|delta| axis first, sign toward
/// the target. Produces diagonal-looking chases on a 4-direction grid.
fn toward(from: Pos, target: Pos) -> Vec<Direction> {
    let dy = target.y - from.y;
    let dx = target.x - from.x;
    ordered_axes(dy, dx)
}

/// Mirror of `toward`: flee along the larger-|delta| axis away from the
/// target.
fn away(from: Pos, target: Pos) -> Vec<Direction> {
    let dy = target.y - from.y;
    let dx = target.x - from.x;
    ordered_axes(-dy, -dx)
}

fn ordered_axes(dy: i32, dx: i32) -> Vec<Direction> {
    let vertical = if dy < 0 { Direction::Up } else { Direction::Down };
    let horizontal = if dx < 0 { Direction::Left } else { Direction::Right };

    let mut order = Vec::with_capacity(2);
    if dy.abs() >= dx.abs() {
        if dy != 0 {
            order.push(vertical);
        }
        if dx != 0 {
            order.push(horizontal);
        }
    } else {
        if dx != 0 {
            order.push(horizontal);
        }
        if dy != 0 {
            order.push(vertical);
        }
    }
    order
}

/// Dominant-axis reading of a patrol heading angle.
fn heading_directions(angle: f32) -> Vec<Direction> {
    let hx = angle.cos();
    let hy = angle.sin();
    let horizontal = if hx < 0.0 { Direction::Left } else { Direction::Right };
    let vertical = if hy < 0.0 { Direction::Up } else { Direction::Down };
    if hx.abs() >= hy.abs() { vec![horizontal, vertical] } else { vec![vertical, horizontal] }
}
