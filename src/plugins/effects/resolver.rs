//! Hit resolution: direct damage, on-hit effects and splash bands.
//!
//! Everything here works on `CombatTarget`, so the resolver never needs to know
//! which ECS components a target is made of. The projectile pass builds short-lived
//! target views over its query items and hands them in.

use std::time::Duration;

use bevy::math::bounding::Aabb2d;
use bevy::prelude::*;

use super::components::{Knockback, StatusEffects, BURN_FROM_HIT, SLOW_DURATION, SLOW_FACTOR};
use crate::plugins::enemies::TargetId;
use crate::plugins::weapons::catalog::OnHitEffect;

/// Falloff table for the five concentric splash bands, innermost first.
pub const SPLASH_BANDS: [f32; 5] = [20.0, 16.0, 12.0, 8.0, 2.0];

/// Anything projectiles can hurt.
pub trait CombatTarget {
    fn id(&self) -> TargetId;
    fn center(&self) -> Vec2;
    fn bounds(&self) -> Aabb2d;
    fn hp(&self) -> f32;
    fn take_damage(&mut self, amount: f32);
    fn status_mut(&mut self) -> &mut StatusEffects;
    fn knockback_mut(&mut self) -> &mut Knockback;

    fn is_alive(&self) -> bool {
        self.hp() > 0.0
    }

    /// Targets that cannot be slowed keep the default.
    fn apply_slow(&mut self, _duration: Duration, _factor: f32) {}
}

/// Which way a knockback impulse points.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Push {
    /// Along the projectile's travel direction.
    Along(Vec2),
    /// Radially away from an impact point.
    AwayFrom(Vec2),
    /// Beams never push.
    None,
}

#[derive(Clone, Copy, Debug)]
pub struct HitSource<'a> {
    pub damage: f32,
    pub effects: &'a [OnHitEffect],
    pub push: Push,
    pub force: f32,
    /// Burn tick override. Falls back to a fraction of `damage`.
    pub burn_damage: Option<f32>,
}

/// Apply one hit: the direct damage once, then every listed effect in order.
pub fn apply_hit<T: CombatTarget + ?Sized>(target: &mut T, hit: &HitSource, now: Duration) {
    target.take_damage(hit.damage);

    for effect in hit.effects {
        match effect {
            OnHitEffect::Physical => {}
            OnHitEffect::Fire => {
                let tick = hit.burn_damage.unwrap_or(hit.damage * BURN_FROM_HIT);
                target.status_mut().ignite(tick, now);
            }
            OnHitEffect::Ice => target.apply_slow(SLOW_DURATION, SLOW_FACTOR),
            OnHitEffect::Poison => target.status_mut().add_poison(hit.damage, now),
            OnHitEffect::Knockback => {
                let direction = match hit.push {
                    Push::Along(dir) => dir,
                    Push::AwayFrom(origin) => target.center() - origin,
                    Push::None => continue,
                };
                target.knockback_mut().push(direction, hit.force);
            }
        }
    }
}

/// Damage for a target `distance` away from a blast of `radius`.
/// A distance exactly on a band edge belongs to the inner band.
pub fn splash_band_damage(distance: f32, radius: f32) -> f32 {
    if radius <= 0.0 || distance > radius {
        return 0.0;
    }
    SPLASH_BANDS
        .iter()
        .enumerate()
        .find(|(i, _)| distance <= radius * (*i as f32 + 1.0) / 5.0)
        .map_or(0.0, |(_, dmg)| *dmg)
}

/// Transient record of a blast, kept only for display.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SplashVisual {
    pub center: Vec2,
    pub radius: f32,
    pub created: Duration,
}

/// Damage every live target around `center` by band, and record the blast.
/// The visual is produced even when nothing was in range.
pub fn splash_damage<T: CombatTarget>(
    targets: &mut [T],
    center: Vec2,
    radius: f32,
    now: Duration,
) -> SplashVisual {
    let mut struck = 0;
    for target in targets.iter_mut().filter(|t| t.is_alive()) {
        let damage = splash_band_damage(target.center().distance(center), radius);
        if damage > 0.0 {
            target.take_damage(damage);
            struck += 1;
        }
    }
    debug!("splash at {center} r={radius}: {struck} target(s)");

    SplashVisual { center, radius, created: now }
}

/// Blasts still on screen.
#[derive(Resource, Debug, Default)]
pub struct SplashVisuals {
    pub active: Vec<SplashVisual>,
}

impl SplashVisuals {
    pub fn push(&mut self, visual: SplashVisual) {
        self.active.push(visual);
    }

    pub fn expire(&mut self, now: Duration, window: Duration) {
        self.active.retain(|v| now.saturating_sub(v.created) < window);
    }
}
