//! Per-target status scheduler.
//!
//! Runs after the projectile pass each tick. Burn and poison tick on their own
//! intervals, knockback slides the body and decays, slows count down.

use bevy::ecs::message::MessageReader;
use bevy::math::bounding::{Aabb2d, IntersectsVolume};
use bevy::prelude::*;

use super::components::{Knockback, Mobility, StatusEffects};
use super::resolver::SplashVisuals;
use crate::common::clock::{CombatClock, ShiftTimestamps, TimeShift};
use crate::common::tunables::Tunables;
use crate::plugins::enemies::{Enemy, Health, Hitbox};
use crate::plugins::world::Wall;

pub fn tick_status_effects(
    clock: Res<CombatClock>,
    tunables: Res<Tunables>,
    walls: Query<&Wall>,
    mut targets: Query<
        (
            Entity,
            Option<&Name>,
            &mut Transform,
            &Hitbox,
            &mut Health,
            &mut StatusEffects,
            &mut Knockback,
            Option<&mut Mobility>,
        ),
        With<Enemy>,
    >,
) {
    let walls: Vec<Aabb2d> = walls.iter().map(|w| w.0).collect();
    let now = clock.now;

    for (entity, name, mut transform, hitbox, mut health, mut status, mut knockback, mobility) in
        &mut targets
    {
        if health.hp <= 0.0 {
            continue;
        }

        let damage = status.tick_burning(now) + status.tick_poison(now);
        if damage > 0.0 {
            health.hp -= damage;
        }

        if knockback.velocity != Vec2::ZERO {
            let mut position = transform.translation.truncate();
            let half = hitbox.0;
            knockback.step(
                &mut position,
                |p| walls.iter().any(|w| Aabb2d::new(p, half).intersects(w)),
                tunables.knockback_friction,
                tunables.knockback_stop,
            );
            transform.translation = position.extend(transform.translation.z);
        }

        if let Some(mut mobility) = mobility {
            if mobility.tick(clock.delta) {
                debug!("{} is no longer slowed", label(entity, name));
            }
        }
    }
}

/// Log label for a target. Names are optional on targets.
pub(crate) fn label(entity: Entity, name: Option<&Name>) -> String {
    name.map_or_else(|| entity.to_string(), |n| n.as_str().to_owned())
}

pub fn expire_splash_visuals(
    clock: Res<CombatClock>,
    tunables: Res<Tunables>,
    mut visuals: ResMut<SplashVisuals>,
) {
    visuals.expire(clock.now, tunables.splash_display);
}

pub fn shift_status_timestamps(
    mut shifts: MessageReader<ShiftTimestamps>,
    mut statuses: Query<&mut StatusEffects>,
) {
    for ShiftTimestamps(by) in shifts.read() {
        for mut status in &mut statuses {
            status.shift(*by);
        }
    }
}
