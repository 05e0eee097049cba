//! Test helpers.
//!
//! `run_system_once` runs a single system against a bare `World` and then flushes
//! deferred commands so spawns and despawns are visible to the assertions.

use std::time::Duration;

use bevy::ecs::system::{IntoSystem, RunSystemOnce};
use bevy::math::bounding::Aabb2d;
use bevy::prelude::*;

use crate::common::clock::CombatClock;
use crate::common::rng::CombatRng;
use crate::common::tunables::Tunables;
use crate::plugins::effects::components::{Knockback, StatusEffects};
use crate::plugins::effects::resolver::{CombatTarget, SplashVisuals};
use crate::plugins::enemies::{TargetId, TargetIds};
use crate::plugins::weapons::catalog::WeaponCatalog;

/// Run a system once on the given world, then flush deferred commands.
/// Returns the system output.
pub fn run_system_once<T, Out, Marker>(world: &mut World, system: T) -> Out
where
    T: IntoSystem<(), Out, Marker>,
{
    let out = world.run_system_once(system).expect("system run failed");
    world.flush();
    out
}

/// A world holding every resource the combat systems read.
pub fn combat_world() -> World {
    let mut world = World::new();
    world.insert_resource(Tunables::default());
    world.insert_resource(CombatClock::default());
    world.insert_resource(CombatRng::default());
    world.insert_resource(WeaponCatalog::standard());
    world.insert_resource(SplashVisuals::default());
    world.insert_resource(TargetIds::default());
    world
}

/// Move the combat clock forward by one step of `dt`.
pub fn tick_clock(world: &mut World, dt: Duration) {
    world.resource_mut::<CombatClock>().advance(dt);
}

/// Minimal stand-in for a creature, for driving the resolver and the projectile
/// pass without any ECS plumbing.
#[derive(Debug, Clone)]
pub struct Dummy {
    pub id: TargetId,
    pub center: Vec2,
    pub half: Vec2,
    pub hp: f32,
    pub status: StatusEffects,
    pub knockback: Knockback,
    pub slowed: Option<(Duration, f32)>,
}

impl Dummy {
    pub fn new(id: u32, center: Vec2) -> Self {
        Self {
            id: TargetId(id),
            center,
            half: Vec2::splat(16.0),
            hp: 100.0,
            status: Default::default(),
            knockback: Default::default(),
            slowed: None,
        }
    }
}

impl CombatTarget for Dummy {
    fn id(&self) -> TargetId {
        self.id
    }

    fn center(&self) -> Vec2 {
        self.center
    }

    fn bounds(&self) -> Aabb2d {
        Aabb2d::new(self.center, self.half)
    }

    fn hp(&self) -> f32 {
        self.hp
    }

    fn take_damage(&mut self, amount: f32) {
        self.hp -= amount;
    }

    fn status_mut(&mut self) -> &mut StatusEffects {
        &mut self.status
    }

    fn knockback_mut(&mut self) -> &mut Knockback {
        &mut self.knockback
    }

    fn apply_slow(&mut self, duration: Duration, factor: f32) {
        self.slowed = Some((duration, factor));
    }
}
