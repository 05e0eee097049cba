use std::time::Duration;

use bevy::prelude::*;

use crate::common::clock::TimeShift;

pub const BURN_DURATION: Duration = Duration::from_secs(3);
pub const BURN_TICK: Duration = Duration::from_millis(500);
/// Fraction of the triggering hit dealt per burn tick.
pub const BURN_FROM_HIT: f32 = 0.3;

pub const POISON_DURATION: Duration = Duration::from_secs(20);
pub const POISON_TICK: Duration = Duration::from_secs(1);
pub const POISON_FALLOFF: f32 = 0.7;
pub const MAX_POISON_STACKS: usize = 4;

pub const SLOW_DURATION: Duration = Duration::from_secs(3);
pub const SLOW_FACTOR: f32 = 0.5;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Burn {
    pub damage: f32,
    pub duration: Duration,
    pub tick: Duration,
    pub started: Duration,
    pub last_tick: Duration,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PoisonStack {
    pub damage_per_tick: f32,
    pub duration: Duration,
    pub tick: Duration,
    pub started: Duration,
    pub last_tick: Duration,
}

/// Damage-over-time state. One burn record per target, so re-ignition refreshes it.
#[derive(Component, Debug, Clone, Default)]
pub struct StatusEffects {
    pub burning: Option<Burn>,
    pub poison: Vec<PoisonStack>,
}

impl StatusEffects {
    pub fn ignite(&mut self, damage: f32, now: Duration) {
        self.burning = Some(Burn {
            damage,
            duration: BURN_DURATION,
            tick: BURN_TICK,
            started: now,
            last_tick: now,
        });
    }

    /// Push a diminished stack, or refresh every stack once at the cap.
    pub fn add_poison(&mut self, base_damage: f32, now: Duration) {
        if self.poison.len() >= MAX_POISON_STACKS {
            for stack in &mut self.poison {
                stack.started = now;
            }
            return;
        }

        let damage_per_tick = match self.poison.last() {
            Some(prev) => prev.damage_per_tick * POISON_FALLOFF,
            None => base_damage,
        };
        self.poison.push(PoisonStack {
            damage_per_tick,
            duration: POISON_DURATION,
            tick: POISON_TICK,
            started: now,
            last_tick: now,
        });
    }

    /// Damage owed by the burn this tick. Clears the record once it has run out.
    pub fn tick_burning(&mut self, now: Duration) -> f32 {
        let Some(burn) = &mut self.burning else {
            return 0.0;
        };

        if now.saturating_sub(burn.started) >= burn.duration {
            self.burning = None;
            return 0.0;
        }

        if now.saturating_sub(burn.last_tick) >= burn.tick {
            burn.last_tick = now;
            return burn.damage;
        }
        0.0
    }

    /// Damage owed by all poison stacks this tick. Expired stacks are dropped
    /// individually; the rest keep their order.
    pub fn tick_poison(&mut self, now: Duration) -> f32 {
        let mut total = 0.0;
        self.poison.retain_mut(|stack| {
            if now.saturating_sub(stack.started) >= stack.duration {
                return false;
            }
            if now.saturating_sub(stack.last_tick) >= stack.tick {
                total += stack.damage_per_tick;
                stack.last_tick = now;
            }
            true
        });
        total
    }
}

impl TimeShift for StatusEffects {
    fn shift(&mut self, by: Duration) {
        if let Some(burn) = &mut self.burning {
            burn.started.shift(by);
            burn.last_tick.shift(by);
        }
        for stack in &mut self.poison {
            stack.started.shift(by);
            stack.last_tick.shift(by);
        }
    }
}

/// Pushback velocity (pixels per tick) and how much of an impulse the target shrugs off.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq)]
pub struct Knockback {
    pub velocity: Vec2,
    /// 0 takes the full impulse, 1 ignores it.
    pub resistance: f32,
}

impl Knockback {
    pub fn with_resistance(resistance: f32) -> Self {
        Self { velocity: Vec2::ZERO, resistance: resistance.clamp(0.0, 1.0) }
    }

    pub fn push(&mut self, direction: Vec2, force: f32) {
        let Some(dir) = direction.try_normalize() else {
            return;
        };
        self.velocity = dir * force * (1.0 - self.resistance);
    }

    /// Move `position` by the current velocity, bouncing off walls, then decay.
    pub fn step(
        &mut self,
        position: &mut Vec2,
        blocked: impl Fn(Vec2) -> bool,
        friction: f32,
        stop: f32,
    ) {
        if self.velocity == Vec2::ZERO {
            return;
        }

        let next = *position + self.velocity;
        if blocked(next) {
            self.velocity = -self.velocity * 0.5;
        } else {
            *position = next;
        }

        self.velocity *= friction;
        if self.velocity.length() < stop {
            self.velocity = Vec2::ZERO;
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Slow {
    pub remaining: Duration,
    pub factor: f32,
}

/// Movement capability. Stationary targets ignore slows.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub enum Mobility {
    Mobile { base_speed: f32, speed: f32, slow: Option<Slow> },
    Stationary,
}

impl Mobility {
    pub fn mobile(base_speed: f32) -> Self {
        Self::Mobile { base_speed, speed: base_speed, slow: None }
    }

    pub fn speed(&self) -> f32 {
        match self {
            Self::Mobile { speed, .. } => *speed,
            Self::Stationary => 0.0,
        }
    }

    /// Renderers tint slowed targets off this.
    pub fn is_slowed(&self) -> bool {
        matches!(self, Self::Mobile { slow: Some(_), .. })
    }

    pub fn apply_slow(&mut self, duration: Duration, factor: f32) {
        if let Self::Mobile { base_speed, speed, slow } = self {
            *speed = *base_speed * factor;
            *slow = Some(Slow { remaining: duration, factor });
        }
    }

    /// Count the slow down by `dt`. Returns true on the tick it wears off.
    pub fn tick(&mut self, dt: Duration) -> bool {
        let Self::Mobile { base_speed, speed, slow } = self else {
            return false;
        };
        let Some(active) = slow else {
            return false;
        };

        active.remaining = active.remaining.saturating_sub(dt);
        if active.remaining.is_zero() {
            *slow = None;
            *speed = *base_speed;
            return true;
        }
        false
    }
}
