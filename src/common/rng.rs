//! Seeded RNG for spread, spray jitter and orbital miss offsets.

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

pub const DEFAULT_SEED: u64 = 42;

#[derive(Resource)]
pub struct CombatRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl CombatRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

impl Default for CombatRng {
    fn default() -> Self {
        Self::new(DEFAULT_SEED)
    }
}
