//! Difficulty modulation: folds external temporal/emotional signals and the
//! run path into one multiplier set consumed by generation and combat math.
//! The simulation never computes signals, it only reads the numbers.

use serde::{Deserialize, Serialize};

use crate::types::RunPath;

/// Time-of-day style multipliers supplied by an external collaborator.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TemporalModifiers {
    pub enemy_speed_mul: f32,
    pub enemy_count_mul: f32,
    pub insight_mul: f32,
    pub coherence_mul: f32,
}

impl Default for TemporalModifiers {
    fn default() -> Self {
        Self { enemy_speed_mul: 1.0, enemy_count_mul: 1.0, insight_mul: 1.0, coherence_mul: 1.0 }
    }
}

/// Mood-state scalars supplied by an external collaborator.
/// `distortion` and `coherence` live in `[0, 1]`, `valence` in `[-1, 1]`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EmotionalModifiers {
    pub distortion: f32,
    pub coherence: f32,
    pub valence: f32,
}

impl Default for EmotionalModifiers {
    fn default() -> Self {
        Self { distortion: 0.0, coherence: 1.0, valence: 0.0 }
    }
}

/// One tick's worth of external signal inputs.
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct SignalFrame {
    pub temporal: TemporalModifiers,
    pub emotional: EmotionalModifiers,
}

const MULTIPLIER_FLOOR: f32 = 0.25;
const MULTIPLIER_CEILING: f32 = 4.0;

/// Composed multiplier set. A pure value: recomputed every tick and every
/// generation, replaced wholesale, never mutated in place.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DifficultyContext {
    pub enemy_count_multiplier: f32,
    pub enemy_speed_multiplier: f32,
    pub damage_multiplier: f32,
    pub insight_multiplier: f32,
    pub peace_multiplier: f32,
}

impl Default for DifficultyContext {
    fn default() -> Self {
        Self::compose(RunPath::Steady, &SignalFrame::default())
    }
}

struct PathBias {
    enemy_count: f32,
    enemy_speed: f32,
    damage: f32,
    insight: f32,
    peace: f32,
}

fn path_bias(path: RunPath) -> PathBias {
    match path {
        RunPath::Steady => {
            PathBias { enemy_count: 1.0, enemy_speed: 1.0, damage: 1.0, insight: 1.0, peace: 1.0 }
        }
        RunPath::Turbulent => {
            PathBias { enemy_count: 1.35, enemy_speed: 0.9, damage: 1.25, insight: 0.9, peace: 0.75 }
        }
        RunPath::Lucid => {
            PathBias { enemy_count: 0.85, enemy_speed: 1.1, damage: 0.9, insight: 1.25, peace: 1.3 }
        }
    }
}

impl DifficultyContext {
    /// Multiplicative fold of temporal modifiers, the path bias, and the
    /// emotional terms. Every field is clamped to `[0.25, 4.0]` so a wild
    /// signal source cannot produce a degenerate level.
    pub fn compose(path: RunPath, frame: &SignalFrame) -> Self {
        let bias = path_bias(path);
        let distortion = frame.emotional.distortion.clamp(0.0, 1.0);
        let coherence = frame.emotional.coherence.clamp(0.0, 1.0);
        let valence = frame.emotional.valence.clamp(-1.0, 1.0);

        let enemy_count =
            frame.temporal.enemy_count_mul * bias.enemy_count * (1.0 + 0.5 * distortion);
        // Larger multiplier = longer step interval = slower enemies, so
        // distortion shortens it.
        let enemy_speed =
            frame.temporal.enemy_speed_mul * bias.enemy_speed * (1.0 - 0.25 * distortion);
        let damage = bias.damage * (1.0 + 0.5 * distortion) * (1.0 + 0.2 * (-valence).max(0.0));
        let insight = frame.temporal.insight_mul * bias.insight * (0.6 + 0.4 * coherence);
        let peace = frame.temporal.coherence_mul
            * bias.peace
            * (0.6 + 0.4 * coherence)
            * (1.0 + 0.15 * valence.max(0.0));

        Self {
            enemy_count_multiplier: enemy_count.clamp(MULTIPLIER_FLOOR, MULTIPLIER_CEILING),
            enemy_speed_multiplier: enemy_speed.clamp(MULTIPLIER_FLOOR, MULTIPLIER_CEILING),
            damage_multiplier: damage.clamp(MULTIPLIER_FLOOR, MULTIPLIER_CEILING),
            insight_multiplier: insight.clamp(MULTIPLIER_FLOOR, MULTIPLIER_CEILING),
            peace_multiplier: peace.clamp(MULTIPLIER_FLOOR, MULTIPLIER_CEILING),
        }
    }
}

/// Damage surcharge derived from distortion: 0 below 0.15, linear ramp,
/// saturating at 0.6 from distortion 0.85 upward. Opaque to the movement and
/// behavior code that applies it.
pub fn distortion_bonus(emotional: &EmotionalModifiers) -> f32 {
    let distortion = emotional.distortion.clamp(0.0, 1.0);
    ((distortion - 0.15) / 0.7 * 0.6).clamp(0.0, 0.6)
}

/// Shared damage formula for tiles, enemy contact, and hallucinations.
pub fn scaled_damage(
    base_damage: i32,
    context: &DifficultyContext,
    intensity: f32,
    distortion_bonus: f32,
) -> i32 {
    (base_damage as f32 * context.damage_multiplier * intensity * (1.0 + distortion_bonus)).round()
        as i32
}

/// A single calm/agitation deposit into an external emotional field.
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct EmotionalImpulse {
    pub calm: f32,
    pub agitation: f32,
}

/// Capability interface for the emotional-field collaborator. The required
/// method replaces the legacy presence-checked callback: callers without a
/// field pass `NullEmotionalSink`.
pub trait EmotionalSink {
    fn add(&mut self, impulse: EmotionalImpulse);
}

pub struct NullEmotionalSink;

impl EmotionalSink for NullEmotionalSink {
    fn add(&mut self, _impulse: EmotionalImpulse) {}
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn assert_close(value: f32, expected: f32) {
        assert!((value - expected).abs() < 1e-5, "expected {expected}, got {value}");
    }

    #[test]
    fn neutral_signals_compose_to_unit_multipliers() {
        let context = DifficultyContext::compose(RunPath::Steady, &SignalFrame::default());
        assert_close(context.enemy_count_multiplier, 1.0);
        assert_close(context.enemy_speed_multiplier, 1.0);
        assert_close(context.damage_multiplier, 1.0);
        assert_close(context.insight_multiplier, 1.0);
        assert_close(context.peace_multiplier, 1.0);
    }

    #[test]
    fn temporal_modifiers_fold_multiplicatively_inside_clamps() {
        let mut frame = SignalFrame::default();
        frame.temporal.enemy_count_mul = 1.5;
        let scaled = DifficultyContext::compose(RunPath::Steady, &frame);
        assert!((scaled.enemy_count_multiplier - 1.5).abs() < 1e-6);

        frame.temporal.enemy_count_mul = 100.0;
        let clamped = DifficultyContext::compose(RunPath::Steady, &frame);
        assert_eq!(clamped.enemy_count_multiplier, 4.0);
    }

    #[test]
    fn distortion_raises_damage_and_quickens_enemies() {
        let mut frame = SignalFrame::default();
        frame.emotional.distortion = 1.0;
        let distorted = DifficultyContext::compose(RunPath::Steady, &frame);
        let calm = DifficultyContext::compose(RunPath::Steady, &SignalFrame::default());
        assert!(distorted.damage_multiplier > calm.damage_multiplier);
        assert!(distorted.enemy_speed_multiplier < calm.enemy_speed_multiplier);
        assert!(distorted.enemy_count_multiplier > calm.enemy_count_multiplier);
    }

    #[test]
    fn distortion_bonus_ramp_is_zero_low_and_saturates_high() {
        let low = EmotionalModifiers { distortion: 0.1, coherence: 1.0, valence: 0.0 };
        assert_eq!(distortion_bonus(&low), 0.0);
        let high = EmotionalModifiers { distortion: 1.0, coherence: 1.0, valence: 0.0 };
        assert_eq!(distortion_bonus(&high), 0.6);
    }

    proptest! {
        #[test]
        fn distortion_bonus_stays_in_band(distortion in -2.0_f32..3.0) {
            let emotional = EmotionalModifiers { distortion, coherence: 0.5, valence: 0.0 };
            let bonus = distortion_bonus(&emotional);
            prop_assert!((0.0..=0.6).contains(&bonus));
        }

        #[test]
        fn scaled_damage_is_monotone_in_multiplier_and_bonus(
            multiplier_a in 0.25_f32..4.0,
            multiplier_b in 0.25_f32..4.0,
            bonus_a in 0.0_f32..0.6,
            bonus_b in 0.0_f32..0.6,
        ) {
            let lower_mul = multiplier_a.min(multiplier_b);
            let upper_mul = multiplier_a.max(multiplier_b);
            let lower_bonus = bonus_a.min(bonus_b);
            let upper_bonus = bonus_a.max(bonus_b);

            let context_low = DifficultyContext {
                damage_multiplier: lower_mul,
                ..DifficultyContext::default()
            };
            let context_high = DifficultyContext {
                damage_multiplier: upper_mul,
                ..DifficultyContext::default()
            };

            prop_assert!(
                scaled_damage(10, &context_low, 1.0, lower_bonus)
                    <= scaled_damage(10, &context_high, 1.0, lower_bonus)
            );
            prop_assert!(
                scaled_damage(10, &context_low, 1.0, lower_bonus)
                    <= scaled_damage(10, &context_low, 1.0, upper_bonus)
            );
        }
    }
}
