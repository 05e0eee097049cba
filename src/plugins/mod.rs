//! Feature plugins.

use bevy::prelude::*;

use crate::plugins::projectiles::ProjectilesPlugin;

pub mod core;
pub mod effects;
pub mod enemies;
pub mod projectiles;
pub mod weapons;
pub mod world;

/// Register the combat plugins. All of them run headless.
pub fn register_gameplay(app: &mut App) {
    core::plugin(app);
    world::plugin(app);
    enemies::plugin(app);
    weapons::plugin(app);
    effects::plugin(app);
    app.add_plugins(ProjectilesPlugin);
}
