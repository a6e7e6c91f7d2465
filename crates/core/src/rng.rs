//! Deterministic randomness for the simulation: a seeded ChaCha8 stream with
//! small integer/float helpers, plus splitmix-style seed mixing so level
//! generation stays a pure function of `(seed, level, path)`.

use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::{Rng, SeedableRng};

use crate::types::Direction;

pub struct SessionRng {
    seed: u64,
    inner: ChaCha8Rng,
}

impl SessionRng {
    pub fn seed_from_u64(seed: u64) -> Self {
        Self { seed, inner: ChaCha8Rng::seed_from_u64(seed) }
    }

    /// Rebuild an rng at an exact point in its stream (snapshot restore).
    pub fn restore(seed: u64, word_pos: u128) -> Self {
        let mut inner = ChaCha8Rng::seed_from_u64(seed);
        inner.set_word_pos(word_pos);
        Self { seed, inner }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn word_pos(&self) -> u128 {
        self.inner.get_word_pos()
    }

    pub fn next_u64(&mut self) -> u64 {
        self.inner.next_u64()
    }

    /// Uniform inclusive range. Modulo bias is irrelevant at grid scale.
    pub fn roll_usize(&mut self, min_value: usize, max_value: usize) -> usize {
        debug_assert!(min_value <= max_value);
        let range_size = max_value - min_value + 1;
        min_value + (self.inner.next_u64() as usize) % range_size
    }

    /// Uniform in `[0, 1)`, 24 bits of precision.
    pub fn roll_f32(&mut self) -> f32 {
        (self.inner.next_u32() >> 8) as f32 / (1u32 << 24) as f32
    }

    pub fn roll_chance(&mut self, probability: f32) -> bool {
        self.roll_f32() < probability
    }

    /// Uniform in `[-magnitude, magnitude]`.
    pub fn roll_signed(&mut self, magnitude: f32) -> f32 {
        (self.roll_f32() * 2.0 - 1.0) * magnitude
    }

    pub fn roll_direction(&mut self) -> Direction {
        Direction::ALL[(self.inner.next_u32() as usize) % 4]
    }
}

/// Derive the generation seed for one level of one run. Independent of any
/// rng consumed during play, so regeneration is order-insensitive.
pub fn derive_level_seed(run_seed: u64, level: u32, path_code: u64) -> u64 {
    let mut mixed = run_seed ^ 0x9E37_79B9_7F4A_7C15;
    mixed ^= (level as u64).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    mixed ^= path_code.wrapping_mul(0x94D0_49BB_1331_11EB);
    mixed ^= mixed >> 30;
    mixed = mixed.wrapping_mul(0xBF58_476D_1CE4_E5B9);
    mixed ^= mixed >> 27;
    mixed = mixed.wrapping_mul(0x94D0_49BB_1331_11EB);
    mixed ^ (mixed >> 31)
}
