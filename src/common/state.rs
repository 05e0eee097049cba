//! Global state machine.
//!
//! Leaving `InGame` (death, level change) clears everything scoped to it.
//! Pausing is a sub-state so it never tears the level down.

use bevy::prelude::*;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, States, Default)]
pub enum GameState {
    #[default]
    InGame,
    LevelTransition,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, SubStates, Default)]
#[source(GameState = GameState::InGame)]
pub enum PauseState {
    #[default]
    Running,
    Paused,
}
