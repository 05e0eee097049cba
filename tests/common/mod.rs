//! Integration test harness.
//!
//! Keep integration tests headless:
//! - `MinimalPlugins` provides the ECS runtime and time.
//! - `StatesPlugin` backs `GameState` / `PauseState`.
//! - `arena_combat::game::configure_headless` installs the combat plugins.
//!
//! Ticks are driven with `run_schedule(FixedUpdate)` so each call is exactly one
//! combat tick regardless of wall-clock time.

#![allow(dead_code)]

use bevy::prelude::*;
use bevy::state::app::StatesPlugin;

pub fn app_headless() -> App {
    let mut app = App::new();
    app.add_plugins((MinimalPlugins, StatesPlugin));
    arena_combat::game::configure_headless(&mut app);

    // Apply the initial states and run OnEnter(InGame).
    app.update();
    app
}

pub fn tick(app: &mut App, n: usize) {
    for _ in 0..n {
        app.world_mut().run_schedule(FixedUpdate);
    }
}
