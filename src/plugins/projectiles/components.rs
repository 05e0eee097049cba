use std::collections::{HashSet, VecDeque};
use std::time::Duration;

use bevy::prelude::*;

use crate::common::clock::TimeShift;
use crate::plugins::enemies::TargetId;
use crate::plugins::weapons::catalog::{ContactEffect, OnHitEffect, WeaponKind};

/// One live projectile. Common fields first, variant data in `kind`.
#[derive(Component, Debug, Clone)]
pub struct Projectile {
    pub weapon: WeaponKind,
    pub owner: Option<Entity>,
    pub position: Vec2,
    /// Unit travel direction.
    pub direction: Vec2,
    /// Pixels per tick.
    pub speed: f32,
    /// Pixels travelled so far.
    pub distance: f32,
    /// Pixels.
    pub range: f32,
    /// Half extent of the collision box, pixels.
    pub size: f32,
    pub damage: f32,
    pub color: Color,
    pub contact: ContactEffect,
    /// Goes negative on the hit that exhausts it.
    pub pierces_left: i32,
    pub bounces_left: u32,
    pub effects: Vec<OnHitEffect>,
    /// Pixels.
    pub splash_radius: Option<f32>,
    /// Targets already struck by a piercing shot or a beam.
    pub struck: HashSet<TargetId>,
    pub kind: ProjectileKind,
}

impl Projectile {
    pub fn bounds_half(&self) -> Vec2 {
        Vec2::splat(self.size)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProjectileKind {
    Bullet { homing: Option<HomingState> },
    Spray(SprayVariation),
    Grenade(GrenadeFlight),
    Orbital { altitude: f32, drop_height: f32, fall_speed: f32 },
    OrbitalBeam(OrbitalBeamState),
    Beam { origin: Vec2, trail: VecDeque<Vec2> },
    Mine { trigger_radius: f32 },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HomingState {
    /// Radians per tick.
    pub max_turn: f32,
    pub duration: Duration,
    pub elapsed: Duration,
}

/// Render-only seeds for one spray particle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SprayVariation {
    pub phase: f32,
    pub size: f32,
    pub intensity: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GrenadePhase {
    Flying,
    Rolling,
    Stopped,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GrenadeFlight {
    pub phase: GrenadePhase,
    pub velocity: Vec2,
    pub start: Vec2,
    pub landing: Vec2,
    /// Pixels to cover before touching down.
    pub travel: f32,
    pub traveled: f32,
    pub roll_dir: Vec2,
    /// Roll distance still allowed, pixels.
    pub roll_left: f32,
    pub created: Duration,
    pub fuse: Duration,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrbitalBeamState {
    pub warm_up_started: Duration,
    pub warm_up: Duration,
    pub active_since: Option<Duration>,
    pub last_tick: Duration,
    pub duration: Duration,
    pub tick: Duration,
}

impl TimeShift for Projectile {
    fn shift(&mut self, by: Duration) {
        match &mut self.kind {
            ProjectileKind::Grenade(g) => g.created.shift(by),
            ProjectileKind::OrbitalBeam(b) => {
                b.warm_up_started.shift(by);
                b.active_since.shift(by);
                b.last_tick.shift(by);
            }
            _ => {}
        }
    }
}
