//! Core plugin: shared resources, the combat clock and per-tick ordering.

use bevy::prelude::*;

use crate::common::clock::{advance_clock, CombatClock, ShiftTimestamps};
use crate::common::rng::CombatRng;
use crate::common::state::PauseState;
use crate::common::tunables::Tunables;

/// Order of one combat tick. Nothing in a later set sees a half-finished earlier one.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CombatSet {
    Clock,
    Fire,
    Simulate,
    Status,
    Cleanup,
}

pub fn plugin(app: &mut App) {
    app.insert_resource(Tunables::default())
        .init_resource::<CombatClock>()
        .init_resource::<CombatRng>()
        .add_message::<ShiftTimestamps>();

    app.configure_sets(
        FixedUpdate,
        (
            CombatSet::Clock,
            CombatSet::Fire,
            CombatSet::Simulate,
            CombatSet::Status,
            CombatSet::Cleanup,
        )
            .chain()
            .run_if(in_state(PauseState::Running)),
    );

    app.add_systems(FixedUpdate, advance_clock.in_set(CombatSet::Clock));
}
