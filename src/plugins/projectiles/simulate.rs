//! The per-tick projectile pass.
//!
//! `step_projectile` advances one projectile against the walls and targets and
//! reports whether it is spent. It owns no ECS state, so the unit tests drive it
//! with plain structs and the system below drives it with borrowed components.
//!
//! Precedence inside a tick: range or lifetime first, then walls, then targets.

use std::f32::consts::{PI, TAU};
use std::time::Duration;

use bevy::ecs::message::MessageReader;
use bevy::math::bounding::Aabb2d;
use bevy::prelude::*;

use super::collision::{bounce_axis, touches, Axis};
use super::components::{GrenadePhase, Projectile, ProjectileKind};
use crate::common::clock::{CombatClock, ShiftTimestamps, TimeShift};
use crate::common::tunables::Tunables;
use crate::plugins::effects::components::{Knockback, Mobility, StatusEffects};
use crate::plugins::effects::resolver::{
    apply_hit, splash_damage, CombatTarget, HitSource, Push, SplashVisual, SplashVisuals,
};
use crate::plugins::enemies::{Enemy, Health, Hitbox, TargetId, TargetMut};
use crate::plugins::weapons::catalog::{ContactEffect, OnHitEffect, WeaponCatalog, WeaponModifiers};
use crate::plugins::weapons::firing::FireIntent;
use crate::plugins::world::Wall;

/// Damage multiplier earned per ricochet by `DamageBounce` shots.
pub const BOUNCE_DAMAGE_BONUS: f32 = 1.1;
pub const GRENADE_ROLL_SPEED: f32 = 2.0;
pub const GRENADE_ROLL_FRICTION: f32 = 0.92;
pub const GRENADE_WALL_DAMPING: f32 = 0.7;
pub const GRENADE_ROLL_STOP: f32 = 0.2;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    Alive,
    Spent,
}

/// Everything a projectile sees besides the targets.
pub struct StepEnv<'a> {
    pub now: Duration,
    pub dt: Duration,
    pub walls: &'a [Aabb2d],
    pub tunables: &'a Tunables,
    pub modifiers: WeaponModifiers,
    /// The owner's current aim point. Orbital beams track it.
    pub aim_point: Option<Vec2>,
}

impl StepEnv<'_> {
    fn source<'e>(&self, damage: f32, effects: &'e [OnHitEffect], push: Push) -> HitSource<'e> {
        HitSource {
            damage,
            effects,
            push,
            force: self.modifiers.knockback_force.unwrap_or(self.tunables.default_knockback_force),
            burn_damage: self.modifiers.burn_damage,
        }
    }
}

pub fn step_projectile<T: CombatTarget>(
    p: &mut Projectile,
    targets: &mut [T],
    env: &StepEnv,
    splashes: &mut Vec<SplashVisual>,
) -> Step {
    match p.kind {
        ProjectileKind::Mine { .. } => step_mine(p, targets, env, splashes),
        ProjectileKind::Beam { .. } => step_beam(p, targets, env),
        ProjectileKind::Orbital { .. } => step_orbital(p, targets, env, splashes),
        ProjectileKind::OrbitalBeam(_) => step_orbital_beam(p, targets, env),
        ProjectileKind::Grenade(_) => step_grenade(p, targets, env, splashes),
        ProjectileKind::Bullet { .. } | ProjectileKind::Spray(_) => {
            step_bullet(p, targets, env, splashes)
        }
    }
}

/// Indices of the live targets passing `touched`, closest to `from` first.
fn nearest_first<T: CombatTarget>(
    targets: &[T],
    from: Vec2,
    touched: impl Fn(&T) -> bool,
) -> Vec<usize> {
    let mut order: Vec<usize> = (0..targets.len())
        .filter(|&i| targets[i].is_alive() && touched(&targets[i]))
        .collect();
    order.sort_by(|&a, &b| {
        let da = targets[a].center().distance_squared(from);
        let db = targets[b].center().distance_squared(from);
        da.total_cmp(&db)
    });
    order
}

fn explode<T: CombatTarget>(
    p: &Projectile,
    targets: &mut [T],
    env: &StepEnv,
    splashes: &mut Vec<SplashVisual>,
) {
    if let Some(radius) = p.splash_radius {
        splashes.push(splash_damage(targets, p.position, radius, env.now));
    }
}

fn step_mine<T: CombatTarget>(
    p: &mut Projectile,
    targets: &mut [T],
    env: &StepEnv,
    splashes: &mut Vec<SplashVisual>,
) -> Step {
    let ProjectileKind::Mine { trigger_radius } = p.kind else {
        return Step::Spent;
    };

    let tripped = targets
        .iter()
        .any(|t| t.is_alive() && t.center().distance(p.position) <= trigger_radius);
    if !tripped {
        return Step::Alive;
    }

    debug!("mine triggered at {}", p.position);
    explode(p, targets, env, splashes);
    Step::Spent
}

fn step_beam<T: CombatTarget>(p: &mut Projectile, targets: &mut [T], env: &StepEnv) -> Step {
    let prev = p.position;
    p.position += p.direction * p.speed;
    p.distance += p.speed;

    let ProjectileKind::Beam { origin, trail } = &mut p.kind else {
        return Step::Spent;
    };
    trail.push_back(p.position);
    while trail.len() > env.tunables.beam_trail_len {
        trail.pop_front();
    }
    if origin.distance(p.position) > p.range {
        return Step::Spent;
    }

    let half = p.bounds_half();
    if env.walls.iter().any(|w| touches(w, prev, p.position, half)) {
        return Step::Spent;
    }

    let order = nearest_first(targets, prev, |t| {
        !p.struck.contains(&t.id()) && touches(&t.bounds(), prev, p.position, half)
    });
    for index in order {
        let target = &mut targets[index];
        p.struck.insert(target.id());
        apply_hit(target, &env.source(p.damage, &p.effects, Push::None), env.now);
        p.pierces_left -= 1;
        if p.pierces_left < 0 {
            return Step::Spent;
        }
    }
    Step::Alive
}

fn step_orbital<T: CombatTarget>(
    p: &mut Projectile,
    targets: &mut [T],
    env: &StepEnv,
    splashes: &mut Vec<SplashVisual>,
) -> Step {
    let ProjectileKind::Orbital { altitude, fall_speed, .. } = &mut p.kind else {
        return Step::Spent;
    };

    *altitude -= *fall_speed;
    if *altitude > 0.0 {
        return Step::Alive;
    }

    debug!("orbital strike landed at {}", p.position);
    explode(p, targets, env, splashes);
    Step::Spent
}

fn step_orbital_beam<T: CombatTarget>(
    p: &mut Projectile,
    targets: &mut [T],
    env: &StepEnv,
) -> Step {
    let ProjectileKind::OrbitalBeam(beam) = &mut p.kind else {
        return Step::Spent;
    };

    if let Some(aim) = env.aim_point {
        p.position = aim;
    }

    let active_since = match beam.active_since {
        Some(since) => since,
        None if env.now.saturating_sub(beam.warm_up_started) >= beam.warm_up => {
            debug!("orbital beam active at {}", p.position);
            beam.active_since = Some(env.now);
            beam.last_tick = env.now;
            env.now
        }
        None => return Step::Alive,
    };

    if env.now.saturating_sub(active_since) >= beam.duration {
        return Step::Spent;
    }
    if env.now.saturating_sub(beam.last_tick) < beam.tick {
        return Step::Alive;
    }
    beam.last_tick = env.now;

    let center = p.position;
    let radius = p.splash_radius.unwrap_or(0.0);
    let hit = env.source(p.damage, &p.effects, Push::AwayFrom(center));
    for target in targets.iter_mut() {
        if target.is_alive() && target.center().distance(center) <= radius {
            apply_hit(target, &hit, env.now);
        }
    }
    Step::Alive
}

/// Reflect off the first wall touched this move. Returns true on a bounce.
fn bounce_off_walls(
    velocity: &mut Vec2,
    prev: Vec2,
    position: &mut Vec2,
    half: Vec2,
    walls: &[Aabb2d],
) -> bool {
    let Some(wall) = walls.iter().find(|w| touches(w, prev, *position, half)) else {
        return false;
    };

    match bounce_axis(wall, prev, *position, half) {
        Axis::X => velocity.x *= -GRENADE_WALL_DAMPING,
        Axis::Y => velocity.y *= -GRENADE_WALL_DAMPING,
    }
    *position = prev;
    true
}

fn step_grenade<T: CombatTarget>(
    p: &mut Projectile,
    targets: &mut [T],
    env: &StepEnv,
    splashes: &mut Vec<SplashVisual>,
) -> Step {
    let ProjectileKind::Grenade(flight) = &mut p.kind else {
        return Step::Spent;
    };

    if env.now.saturating_sub(flight.created) >= flight.fuse {
        debug!("grenade detonated at {}", p.position);
        explode(p, targets, env, splashes);
        return Step::Spent;
    }

    let half = Vec2::splat(p.size);
    let prev = p.position;
    match flight.phase {
        GrenadePhase::Flying => {
            p.position += flight.velocity;
            flight.traveled += flight.velocity.length();
            if bounce_off_walls(&mut flight.velocity, prev, &mut p.position, half, env.walls) {
                flight.roll_dir = flight.velocity.try_normalize().unwrap_or(flight.roll_dir);
            }
            if flight.traveled >= flight.travel {
                flight.phase = GrenadePhase::Rolling;
                flight.velocity = flight.roll_dir * GRENADE_ROLL_SPEED;
            }
        }
        GrenadePhase::Rolling => {
            p.position += flight.velocity;
            flight.roll_left -= flight.velocity.length();
            bounce_off_walls(&mut flight.velocity, prev, &mut p.position, half, env.walls);
            flight.velocity *= GRENADE_ROLL_FRICTION;

            if flight.roll_left <= 0.0 || flight.velocity.abs().max_element() < GRENADE_ROLL_STOP {
                flight.velocity = Vec2::ZERO;
                flight.phase = GrenadePhase::Stopped;
            }
        }
        GrenadePhase::Stopped => {}
    }
    p.direction = flight.velocity.try_normalize().unwrap_or(p.direction);
    Step::Alive
}

fn wrap_angle(a: f32) -> f32 {
    (a + PI).rem_euclid(TAU) - PI
}

/// Turn toward the nearest live target, limited per tick, while homing lasts.
fn steer<T: CombatTarget>(p: &mut Projectile, targets: &[T], dt: Duration) {
    let ProjectileKind::Bullet { homing: Some(homing) } = &mut p.kind else {
        return;
    };

    homing.elapsed += dt;
    if homing.elapsed >= homing.duration {
        return;
    }

    let from = p.position;
    let Some(nearest) = targets
        .iter()
        .filter(|t| t.is_alive())
        .map(|t| t.center())
        .min_by(|a, b| a.distance_squared(from).total_cmp(&b.distance_squared(from)))
    else {
        return;
    };

    let Some(wanted) = (nearest - from).try_normalize() else {
        return;
    };
    let current = p.direction.to_angle();
    let turn = wrap_angle(wanted.to_angle() - current).clamp(-homing.max_turn, homing.max_turn);
    p.direction = Vec2::from_angle(current + turn);
}

fn ricochet(p: &mut Projectile, obstacle: &Aabb2d, prev: Vec2) -> Step {
    if p.bounces_left == 0 {
        return Step::Spent;
    }

    p.bounces_left -= 1;
    let axis = bounce_axis(obstacle, prev, p.position, p.bounds_half());
    p.position = prev;
    p.direction = axis.reflect(p.direction);
    if p.contact == ContactEffect::DamageBounce {
        p.damage *= BOUNCE_DAMAGE_BONUS;
    }
    Step::Alive
}

fn step_bullet<T: CombatTarget>(
    p: &mut Projectile,
    targets: &mut [T],
    env: &StepEnv,
    splashes: &mut Vec<SplashVisual>,
) -> Step {
    steer(p, targets, env.dt);

    let prev = p.position;
    p.position += p.direction * p.speed;
    p.distance += p.speed;
    if p.distance > p.range {
        return Step::Spent;
    }

    let half = p.bounds_half();
    if let Some(wall) = env.walls.iter().find(|w| touches(w, prev, p.position, half)) {
        return match p.contact {
            ContactEffect::Explode => {
                explode(p, targets, env, splashes);
                Step::Spent
            }
            ContactEffect::DamageBounce | ContactEffect::NoDamageBounce => ricochet(p, wall, prev),
            ContactEffect::Pierce => Step::Spent,
        };
    }

    let skip_struck = p.contact == ContactEffect::Pierce;
    let order = nearest_first(targets, prev, |t| {
        !(skip_struck && p.struck.contains(&t.id())) && touches(&t.bounds(), prev, p.position, half)
    });
    let Some(&index) = order.first() else {
        return Step::Alive;
    };
    let target = &mut targets[index];

    let bounds = target.bounds();
    match p.contact {
        ContactEffect::Pierce => {
            p.struck.insert(target.id());
            apply_hit(target, &env.source(p.damage, &p.effects, Push::Along(p.direction)), env.now);
            p.pierces_left -= 1;
            if p.pierces_left < 0 { Step::Spent } else { Step::Alive }
        }
        ContactEffect::Explode => {
            let hit = env.source(p.damage, &p.effects, Push::AwayFrom(p.position));
            apply_hit(target, &hit, env.now);
            explode(p, targets, env, splashes);
            Step::Spent
        }
        ContactEffect::DamageBounce | ContactEffect::NoDamageBounce => {
            apply_hit(target, &env.source(p.damage, &p.effects, Push::Along(p.direction)), env.now);
            ricochet(p, &bounds, prev)
        }
    }
}

// -----------------------------------------------------------------------------
// Systems
// -----------------------------------------------------------------------------

type TargetItems = (
    &'static TargetId,
    &'static Transform,
    &'static Hitbox,
    &'static mut Health,
    &'static mut StatusEffects,
    &'static mut Knockback,
    Option<&'static mut Mobility>,
);

#[allow(clippy::too_many_arguments)]
pub fn simulate_projectiles(
    mut commands: Commands,
    clock: Res<CombatClock>,
    tunables: Res<Tunables>,
    catalog: Res<WeaponCatalog>,
    mut visuals: ResMut<SplashVisuals>,
    walls: Query<&Wall>,
    intents: Query<&FireIntent>,
    mut projectiles: Query<(Entity, &mut Projectile, &mut Transform), Without<Enemy>>,
    mut targets: Query<TargetItems, With<Enemy>>,
) {
    let walls: Vec<Aabb2d> = walls.iter().map(|w| w.0).collect();
    let mut views: Vec<TargetMut> = targets
        .iter_mut()
        .map(|(id, transform, hitbox, health, status, knockback, mobility)| TargetMut {
            id: *id,
            center: transform.translation.truncate(),
            half_size: hitbox.0,
            health,
            status,
            knockback,
            mobility,
        })
        .collect();

    for (entity, mut projectile, mut transform) in &mut projectiles {
        let env = StepEnv {
            now: clock.now,
            dt: clock.delta,
            walls: &walls,
            tunables: &tunables,
            modifiers: catalog.modifiers(projectile.weapon),
            aim_point: projectile
                .owner
                .and_then(|owner| intents.get(owner).ok())
                .map(|i| i.aim_point),
        };

        match step_projectile(&mut *projectile, &mut views, &env, &mut visuals.active) {
            Step::Spent => commands.entity(entity).despawn(),
            Step::Alive => {
                transform.translation = projectile.position.extend(transform.translation.z);
            }
        }
    }
}

pub fn shift_projectile_timestamps(
    mut shifts: MessageReader<ShiftTimestamps>,
    mut projectiles: Query<&mut Projectile>,
) {
    for ShiftTimestamps(by) in shifts.read() {
        for mut projectile in &mut projectiles {
            projectile.shift(*by);
        }
    }
}
