//! Simulation clock.
//!
//! Every cooldown, warm-up, reload and status timestamp in the combat core is a
//! `Duration` on this clock. The clock only advances while `CombatSet::Clock`
//! runs, so a `PauseState::Paused` pause freezes it together with every stamp
//! and nothing needs shifting on resume.
//!
//! `ShiftTimestamps` is for hosts that move `CombatClock` themselves while the
//! simulation is stopped (syncing it to a wall clock, say). Such a host sends
//! the amount the clock jumped so stored stamps keep their distance to `now`.
//! Do not send it after a `PauseState` pause: the clock did not move, and the
//! shift would push every timer into the future.

use std::time::Duration;

use bevy::prelude::*;

#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct CombatClock {
    pub now: Duration,
    pub delta: Duration,
}

impl CombatClock {
    pub fn at(now: Duration) -> Self {
        Self { now, delta: Duration::ZERO }
    }

    /// Step forward by `delta`. Used by the fixed-step system and by tests.
    pub fn advance(&mut self, delta: Duration) {
        self.delta = delta;
        self.now += delta;
    }

    #[inline]
    pub fn since(&self, stamp: Duration) -> Duration {
        self.now.saturating_sub(stamp)
    }
}

/// Offset every stored timestamp by how far the host moved the clock.
#[derive(Message, Clone, Copy, Debug)]
pub struct ShiftTimestamps(pub Duration);

/// Implemented by everything that stores absolute clock stamps.
pub trait TimeShift {
    fn shift(&mut self, by: Duration);
}

impl TimeShift for Duration {
    fn shift(&mut self, by: Duration) {
        *self += by;
    }
}

impl<T: TimeShift> TimeShift for Option<T> {
    fn shift(&mut self, by: Duration) {
        if let Some(inner) = self {
            inner.shift(by);
        }
    }
}

/// One fixed tick is one timestep, however the schedule was driven.
pub fn advance_clock(time: Res<Time<Fixed>>, mut clock: ResMut<CombatClock>) {
    clock.advance(time.timestep());
}
