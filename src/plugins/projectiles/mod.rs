//! Projectiles plugin.
//!
//! # Data flow (one fixed tick)
//! ```text
//!  CombatSet::Fire      weapons::fire_weapons / place_mines
//!                         └─ factory::fire / factory::mine ─> spawn_projectile
//!  CombatSet::Simulate  simulate::simulate_projectiles
//!                         ├─ reads:   Wall, FireIntent (orbital beam tracking)
//!                         ├─ mutates: Projectile, Transform, target combat components
//!                         ├─ writes:  SplashVisuals
//!                         └─ despawns spent projectiles
//! ```
//!
//! Every projectile is an entity with a `Projectile` component and a `Transform`
//! kept in step with `Projectile::position` for whatever draws it. All of them are
//! scoped to `GameState::InGame`, so leaving the level drops the whole collection.

pub mod collision;
pub mod components;
pub mod factory;
pub mod simulate;

use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;

use crate::common::state::GameState;
use crate::plugins::core::CombatSet;

use components::Projectile;

/// Projectiles draw above targets.
const PROJECTILE_Z: f32 = 2.0;

pub struct ProjectilesPlugin;

impl Plugin for ProjectilesPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(FixedUpdate, simulate::simulate_projectiles.in_set(CombatSet::Simulate))
            .add_systems(PreUpdate, simulate::shift_projectile_timestamps);
    }
}

pub fn spawn_projectile(commands: &mut Commands, projectile: Projectile) -> Entity {
    commands
        .spawn((
            Name::new("Projectile"),
            Transform::from_translation(projectile.position.extend(PROJECTILE_Z)),
            projectile,
            DespawnOnExit(GameState::InGame),
        ))
        .id()
}

#[cfg(test)]
mod tests;
