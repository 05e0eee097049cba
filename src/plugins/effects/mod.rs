//! Effects plugin: on-hit resolution, splash and the status scheduler.

pub mod components;
pub mod resolver;
pub mod status;

use bevy::prelude::*;

use crate::common::state::GameState;
use crate::plugins::core::CombatSet;

pub fn plugin(app: &mut App) {
    app.init_resource::<resolver::SplashVisuals>();

    app.add_systems(FixedUpdate, status::tick_status_effects.in_set(CombatSet::Status))
        .add_systems(FixedUpdate, status::expire_splash_visuals.in_set(CombatSet::Cleanup))
        .add_systems(PreUpdate, status::shift_status_timestamps)
        .add_systems(OnExit(GameState::InGame), clear_splash_visuals);
}

fn clear_splash_visuals(mut visuals: ResMut<resolver::SplashVisuals>) {
    visuals.active.clear();
}
