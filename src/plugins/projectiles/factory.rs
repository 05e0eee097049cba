//! Turns one trigger pull into projectiles.
//!
//! Pure functions over the config and a caller-supplied RNG, so tests can seed
//! the spread and check exact angles.

use std::collections::{HashSet, VecDeque};
use std::f32::consts::TAU;
use std::time::Duration;

use bevy::prelude::*;
use rand::Rng;

use super::components::{
    GrenadeFlight, GrenadePhase, HomingState, OrbitalBeamState, Projectile, ProjectileKind,
    SprayVariation,
};
use crate::common::tunables::Tunables;
use crate::plugins::weapons::catalog::{BeamTiming, FireMode, WeaponConfig, WeaponKind};

const DEFAULT_DROP_HEIGHT: f32 = 600.0;
const DEFAULT_BEAM_WARM_UP: Duration = Duration::from_secs(2);
const DEFAULT_BEAM: BeamTiming = BeamTiming {
    duration: Duration::from_secs(5),
    tick: Duration::from_millis(200),
};
const DEFAULT_BEAM_SPLASH_TILES: f32 = 2.0;
const DEFAULT_MINE_SPLASH_TILES: f32 = 2.0;
const DEFAULT_FUSE: Duration = Duration::from_secs(3);
/// Spray pellets wobble by up to this many degrees either way.
const SPRAY_JITTER_DEG: f32 = 5.0;

/// Where and when a shot leaves the weapon.
#[derive(Clone, Copy, Debug)]
pub struct ShotOrigin {
    pub position: Vec2,
    pub aim_dir: Vec2,
    pub aim_point: Vec2,
    pub owner: Option<Entity>,
    pub now: Duration,
}

fn rotate_deg(v: Vec2, degrees: f32) -> Vec2 {
    Vec2::from_angle(degrees.to_radians()).rotate(v)
}

fn base(
    kind: WeaponKind,
    cfg: &WeaponConfig,
    shot: &ShotOrigin,
    direction: Vec2,
    tunables: &Tunables,
    variant: ProjectileKind,
) -> Projectile {
    let (pierce, bounce) = cfg.budgets();
    Projectile {
        weapon: kind,
        owner: shot.owner,
        position: shot.position,
        direction,
        speed: cfg.projectile_speed,
        distance: 0.0,
        range: cfg.range * tunables.tile_size,
        size: (cfg.projectile_size * tunables.tile_size).floor().max(1.0),
        damage: cfg.damage,
        color: cfg.color,
        contact: cfg.contact_effect,
        pierces_left: pierce as i32,
        bounces_left: bounce,
        effects: cfg.on_hit.clone(),
        splash_radius: cfg.modifiers.splash.map(|tiles| tiles * tunables.tile_size),
        struck: HashSet::new(),
        kind: variant,
    }
}

/// Build every projectile one shot of `cfg` produces.
pub fn fire(
    kind: WeaponKind,
    cfg: &WeaponConfig,
    shot: &ShotOrigin,
    tunables: &Tunables,
    rng: &mut impl Rng,
) -> Vec<Projectile> {
    let aim = shot.aim_dir.try_normalize().unwrap_or(Vec2::X);

    match cfg.fire_mode {
        FireMode::Single | FireMode::Automatic => {
            vec![standard(kind, cfg, shot, aim, tunables, rng)]
        }
        FireMode::Shotgun => shotgun(kind, cfg, shot, aim, tunables, rng),
        FireMode::Spray => spray(kind, cfg, shot, aim, tunables, rng),
        FireMode::Thrown => vec![thrown(kind, cfg, shot, aim, tunables)],
        FireMode::Orbital => vec![orbital(kind, cfg, shot, tunables, rng)],
        FireMode::OrbitalBeam => vec![orbital_beam(kind, cfg, shot, tunables)],
        FireMode::Beam => vec![beam(kind, cfg, shot, aim, tunables)],
    }
}

fn standard(
    kind: WeaponKind,
    cfg: &WeaponConfig,
    shot: &ShotOrigin,
    aim: Vec2,
    tunables: &Tunables,
    rng: &mut impl Rng,
) -> Projectile {
    let offset = rng.gen_range(-0.5..=0.5) * cfg.accuracy * 360.0;
    let homing = cfg.modifiers.homing.map(|h| HomingState {
        max_turn: h.max_turn_deg.to_radians(),
        duration: h.duration,
        elapsed: Duration::ZERO,
    });
    let direction = rotate_deg(aim, offset);
    base(kind, cfg, shot, direction, tunables, ProjectileKind::Bullet { homing })
}

/// Evenly fanned pellets across the spread. A volley of one is a plain shot.
fn shotgun(
    kind: WeaponKind,
    cfg: &WeaponConfig,
    shot: &ShotOrigin,
    aim: Vec2,
    tunables: &Tunables,
    rng: &mut impl Rng,
) -> Vec<Projectile> {
    let volley = cfg.modifiers.volley.unwrap_or(1);
    if volley <= 1 {
        return vec![standard(kind, cfg, shot, aim, tunables, rng)];
    }

    let spread = cfg.modifiers.spread.unwrap_or(0.0);
    let step = spread / (volley - 1) as f32;
    (0..volley)
        .map(|i| {
            let direction = rotate_deg(aim, step * i as f32 - spread / 2.0);
            base(kind, cfg, shot, direction, tunables, ProjectileKind::Bullet { homing: None })
        })
        .collect()
}

/// Twice the volley, fanned with jitter, each particle a little faster or slower.
fn spray(
    kind: WeaponKind,
    cfg: &WeaponConfig,
    shot: &ShotOrigin,
    aim: Vec2,
    tunables: &Tunables,
    rng: &mut impl Rng,
) -> Vec<Projectile> {
    let count = cfg.modifiers.volley.unwrap_or(1) * 2;
    let spread = cfg.modifiers.spread.unwrap_or(0.0);
    let step = if count > 1 { spread / (count - 1) as f32 } else { 0.0 };

    (0..count)
        .map(|i| {
            let jitter = rng.gen_range(-SPRAY_JITTER_DEG..=SPRAY_JITTER_DEG);
            let direction = rotate_deg(aim, step * i as f32 - spread / 2.0 + jitter);
            let variation = SprayVariation {
                phase: rng.gen_range(0.0..TAU),
                size: rng.gen_range(0.7..=1.3),
                intensity: rng.gen_range(0.8..=1.2),
            };
            let mut particle =
                base(kind, cfg, shot, direction, tunables, ProjectileKind::Spray(variation));
            particle.speed *= rng.gen_range(0.8..=1.2);
            particle
        })
        .collect()
}

/// Lob toward the aim point, capped at range, then roll a short way.
fn thrown(
    kind: WeaponKind,
    cfg: &WeaponConfig,
    shot: &ShotOrigin,
    aim: Vec2,
    tunables: &Tunables,
) -> Projectile {
    let to_target = shot.aim_point - shot.position;
    let dir = to_target.try_normalize().unwrap_or(aim);
    let range = cfg.range * tunables.tile_size;
    let travel = to_target.length().min(range);
    let landing = shot.position + dir * travel;

    let ticks = ((travel / 10.0) as i32).clamp(10, 40) as f32;
    let flight = GrenadeFlight {
        phase: GrenadePhase::Flying,
        velocity: dir * (travel / ticks),
        start: shot.position,
        landing,
        travel,
        traveled: 0.0,
        roll_dir: dir,
        roll_left: (travel * 0.15).clamp(30.0, 80.0),
        created: shot.now,
        fuse: cfg.modifiers.detonation.unwrap_or(DEFAULT_FUSE),
    };
    base(kind, cfg, shot, dir, tunables, ProjectileKind::Grenade(flight))
}

/// Drops from altitude onto a point near the aim, missing by up to ten accuracy cones.
fn orbital(
    kind: WeaponKind,
    cfg: &WeaponConfig,
    shot: &ShotOrigin,
    tunables: &Tunables,
    rng: &mut impl Rng,
) -> Projectile {
    let angle = rng.gen_range(0.0..TAU);
    let miss = tunables.tile_size * cfg.accuracy * 10.0 * rng.gen_range(0.0..=1.0);
    let drop_height = cfg.modifiers.drop_height.unwrap_or(DEFAULT_DROP_HEIGHT);

    let mut strike = base(
        kind,
        cfg,
        shot,
        Vec2::NEG_Y,
        tunables,
        ProjectileKind::Orbital {
            altitude: drop_height,
            drop_height,
            fall_speed: cfg.projectile_speed.max(f32::EPSILON),
        },
    );
    strike.position = shot.aim_point + Vec2::from_angle(angle) * miss;
    strike
}

fn orbital_beam(
    kind: WeaponKind,
    cfg: &WeaponConfig,
    shot: &ShotOrigin,
    tunables: &Tunables,
) -> Projectile {
    let timing = cfg.modifiers.beam.unwrap_or(DEFAULT_BEAM);
    let state = OrbitalBeamState {
        warm_up_started: shot.now,
        warm_up: cfg.modifiers.warm_up.unwrap_or(DEFAULT_BEAM_WARM_UP),
        active_since: None,
        last_tick: shot.now,
        duration: timing.duration,
        tick: timing.tick,
    };

    let splash_tiles = cfg.modifiers.splash.unwrap_or(DEFAULT_BEAM_SPLASH_TILES);
    let mut beam = base(kind, cfg, shot, Vec2::NEG_Y, tunables, ProjectileKind::OrbitalBeam(state));
    beam.position = shot.aim_point;
    beam.splash_radius = Some(splash_tiles * tunables.tile_size);
    beam
}

/// Fast straight ray. Skips the accuracy cone.
fn beam(
    kind: WeaponKind,
    cfg: &WeaponConfig,
    shot: &ShotOrigin,
    aim: Vec2,
    tunables: &Tunables,
) -> Projectile {
    let mut trail = VecDeque::with_capacity(tunables.beam_trail_len);
    trail.push_back(shot.position);

    let variant = ProjectileKind::Beam { origin: shot.position, trail };
    let mut ray = base(kind, cfg, shot, aim, tunables, variant);
    ray.speed = tunables.beam_speed;
    ray
}

/// A mine sitting where the shooter stands.
pub fn mine(
    kind: WeaponKind,
    cfg: &WeaponConfig,
    shot: &ShotOrigin,
    tunables: &Tunables,
) -> Projectile {
    let trigger_radius = cfg.modifiers.trigger_radius.unwrap_or(tunables.tile_size);
    let splash_tiles = cfg.modifiers.splash.unwrap_or(DEFAULT_MINE_SPLASH_TILES);
    let variant = ProjectileKind::Mine { trigger_radius };
    let mut mine = base(kind, cfg, shot, Vec2::ZERO, tunables, variant);
    mine.speed = 0.0;
    mine.splash_radius = Some(splash_tiles * tunables.tile_size);
    mine
}
