//! Tunable gameplay constants.

use std::time::Duration;

use bevy::prelude::*;

#[derive(Resource, Debug, Clone)]
pub struct Tunables {
    /// Pixels per tile. Weapon ranges, sizes and splash radii are authored in tiles.
    pub tile_size: f32,
    /// Hitscan beam travel per tick, in pixels.
    pub beam_speed: f32,
    pub beam_trail_len: usize,
    pub splash_display: Duration,
    /// Per-tick multiplier applied to knockback velocity.
    pub knockback_friction: f32,
    pub knockback_stop: f32,
    /// Force used when a weapon applies knockback without configuring one.
    pub default_knockback_force: f32,
}

impl Default for Tunables {
    fn default() -> Self {
        Self {
            tile_size: 32.0,
            beam_speed: 48.0,
            beam_trail_len: 20,
            splash_display: Duration::from_millis(200),
            knockback_friction: 0.85,
            knockback_stop: 0.1,
            default_knockback_force: 10.0,
        }
    }
}
