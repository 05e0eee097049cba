//! Game composition root.
//!
//! The combat core has no window or renderer of its own. A host app adds its
//! own plugins (input, drawing) and calls `configure_headless` to install the
//! simulation; integration tests do the same on top of `MinimalPlugins`.

use bevy::prelude::*;

use crate::common::state::{GameState, PauseState};
use crate::plugins;

/// Install states and every combat plugin.
///
/// Notes:
/// - Do NOT add DefaultPlugins here; the host decides.
/// - Requires `StatesPlugin` (part of `DefaultPlugins`, added by hand next to `MinimalPlugins`).
pub fn configure_headless(app: &mut App) {
    configure_game(app);
}

fn configure_game(app: &mut App) {
    app.init_state::<GameState>().add_sub_state::<PauseState>();
    plugins::register_gameplay(app);
}
