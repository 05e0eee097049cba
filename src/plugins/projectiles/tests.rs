//! Projectile tests. The pass is driven with `Dummy` targets and bare wall boxes,
//! one `step_projectile` call per tick, so every tick's outcome can be asserted.

use std::collections::HashSet;
use std::time::Duration;

use bevy::math::bounding::Aabb2d;
use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use super::collision::{bounce_axis, segment_hits, Axis};
use super::components::{GrenadePhase, HomingState, Projectile, ProjectileKind};
use super::factory::{self, ShotOrigin};
use super::simulate::{simulate_projectiles, step_projectile, Step, StepEnv};
use crate::common::clock::{CombatClock, TimeShift};
use crate::common::test_utils::{combat_world, run_system_once, Dummy};
use crate::common::tunables::Tunables;
use crate::plugins::effects::components::StatusEffects;
use crate::plugins::effects::resolver::{SplashVisual, SplashVisuals};
use crate::plugins::enemies::{CreatureBundle, CreatureKind, Health, TargetId};
use crate::plugins::weapons::catalog::{
    ContactEffect, OnHitEffect, WeaponConfig, WeaponKind, WeaponModifiers,
};

const EPS: f32 = 1e-3;
const TICK: Duration = Duration::from_micros(15_625);

fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

fn shot_at(aim_point: Vec2) -> ShotOrigin {
    ShotOrigin {
        position: Vec2::ZERO,
        aim_dir: Vec2::X,
        aim_point,
        owner: None,
        now: Duration::ZERO,
    }
}

fn bullet(contact: ContactEffect, pierces: i32, bounces: u32) -> Projectile {
    Projectile {
        weapon: WeaponKind::RustyPistol,
        owner: None,
        position: Vec2::ZERO,
        direction: Vec2::X,
        speed: 10.0,
        distance: 0.0,
        range: 1000.0,
        size: 2.0,
        damage: 5.0,
        color: Color::WHITE,
        contact,
        pierces_left: pierces,
        bounces_left: bounces,
        effects: vec![OnHitEffect::Physical],
        splash_radius: None,
        struck: HashSet::new(),
        kind: ProjectileKind::Bullet { homing: None },
    }
}

fn env<'a>(walls: &'a [Aabb2d], tunables: &'a Tunables, now: Duration) -> StepEnv<'a> {
    StepEnv {
        now,
        dt: TICK,
        walls,
        tunables,
        modifiers: WeaponModifiers::default(),
        aim_point: None,
    }
}

/// Step until spent or `limit` ticks. Returns the tick it was spent on.
fn run(
    p: &mut Projectile,
    targets: &mut [Dummy],
    walls: &[Aabb2d],
    splashes: &mut Vec<SplashVisual>,
    limit: usize,
) -> Option<usize> {
    let tunables = Tunables::default();
    (1..=limit).find(|tick| {
        let now = TICK * *tick as u32;
        step_projectile(p, targets, &env(walls, &tunables, now), splashes) == Step::Spent
    })
}

/// Step once with nobody around.
fn step_alone(p: &mut Projectile, walls: &[Aabb2d], tunables: &Tunables, now: Duration) -> Step {
    step_projectile(p, &mut Vec::<Dummy>::new(), &env(walls, tunables, now), &mut Vec::new())
}

/// First projectile of one shot from the origin, seeded.
fn fire_one(
    kind: WeaponKind,
    cfg: &WeaponConfig,
    aim_point: Vec2,
    tunables: &Tunables,
) -> Projectile {
    let mut rng = ChaCha8Rng::seed_from_u64(0);
    factory::fire(kind, cfg, &shot_at(aim_point), tunables, &mut rng).remove(0)
}

fn vertical_wall(x: f32) -> Aabb2d {
    Aabb2d {
        min: Vec2::new(x, -100.0),
        max: Vec2::new(x + 10.0, 100.0),
    }
}

// --------------------------------------------------------------------------------------
// Geometry
// --------------------------------------------------------------------------------------

#[test]
fn swept_segment_catches_thin_walls() {
    let thin = Aabb2d { min: Vec2::new(50.0, -10.0), max: Vec2::new(52.0, 10.0) };
    assert!(segment_hits(&thin, Vec2::ZERO, Vec2::new(100.0, 0.0)));
    assert!(!segment_hits(&thin, Vec2::ZERO, Vec2::new(40.0, 0.0)));
    assert!(!segment_hits(&thin, Vec2::new(0.0, 20.0), Vec2::new(100.0, 20.0)));
}

#[test]
fn bounce_axis_picks_the_shallow_side() {
    let wall = Aabb2d { min: Vec2::new(-100.0, 50.0), max: Vec2::new(100.0, 60.0) };
    let half = Vec2::splat(2.0);
    assert_eq!(bounce_axis(&wall, Vec2::new(0.0, 40.0), Vec2::new(0.0, 50.0), half), Axis::Y);

    let side = vertical_wall(50.0);
    assert_eq!(bounce_axis(&side, Vec2::new(40.0, 0.0), Vec2::new(50.0, 0.0), half), Axis::X);
    // Tunnelled clean through: the entered face decides.
    assert_eq!(bounce_axis(&side, Vec2::ZERO, Vec2::new(200.0, 0.0), half), Axis::X);
}

#[test]
fn bounce_axis_uses_the_entered_face_for_a_corner_graze() {
    let target = Aabb2d::new(Vec2::ZERO, Vec2::splat(16.0));
    let half = Vec2::splat(6.0);
    // Ends deeper in x than in y, but it came in through the left face.
    assert_eq!(bounce_axis(&target, Vec2::new(-23.0, 20.0), Vec2::new(-13.0, 20.0), half), Axis::X);
    // Already inside at the start of the move: shallow side wins.
    assert_eq!(bounce_axis(&target, Vec2::new(-12.0, 14.0), Vec2::new(-10.0, 14.0), half), Axis::Y);
}

// --------------------------------------------------------------------------------------
// Factory
// --------------------------------------------------------------------------------------

#[test]
fn shotgun_fans_evenly_across_spread() {
    let cfg = WeaponConfig::shotgun();
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let shot = shot_at(Vec2::new(100.0, 0.0));
    let pellets = factory::fire(WeaponKind::Shotgun, &cfg, &shot, &Tunables::default(), &mut rng);

    assert_eq!(pellets.len(), 8);
    let first = pellets[0].direction.to_angle().to_degrees();
    let last = pellets[7].direction.to_angle().to_degrees();
    assert!((first + 15.0).abs() < EPS, "{first}");
    assert!((last - 15.0).abs() < EPS, "{last}");
}

#[test]
fn single_volley_shotgun_is_a_plain_shot() {
    let cfg = WeaponConfig {
        modifiers: WeaponModifiers { volley: Some(1), spread: Some(30.0), ..default() },
        ..WeaponConfig::shotgun()
    };
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let shot = shot_at(Vec2::X);
    let shots = factory::fire(WeaponKind::Shotgun, &cfg, &shot, &Tunables::default(), &mut rng);
    assert_eq!(shots.len(), 1);
}

#[test]
fn spread_stays_inside_the_accuracy_cone_and_is_seeded() {
    let cfg = WeaponConfig::rusty_pistol();
    let half_cone = cfg.accuracy * 360.0 / 2.0;
    let tunables = Tunables::default();

    let mut a = ChaCha8Rng::seed_from_u64(9);
    let mut b = ChaCha8Rng::seed_from_u64(9);
    for _ in 0..50 {
        let pa = factory::fire(WeaponKind::RustyPistol, &cfg, &shot_at(Vec2::X), &tunables, &mut a);
        let pb = factory::fire(WeaponKind::RustyPistol, &cfg, &shot_at(Vec2::X), &tunables, &mut b);
        let angle = pa[0].direction.to_angle().to_degrees();
        assert!(angle.abs() <= half_cone + EPS);
        assert_eq!(pa[0].direction, pb[0].direction);
    }
}

#[test]
fn spray_doubles_the_volley_with_bounded_jitter() {
    let cfg = WeaponConfig::flamethrower();
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    let shot = shot_at(Vec2::X);
    let particles =
        factory::fire(WeaponKind::Flamethrower, &cfg, &shot, &Tunables::default(), &mut rng);

    assert_eq!(particles.len(), 8);
    for p in &particles {
        let base = cfg.projectile_speed;
        assert!(p.speed >= base * 0.8 - EPS && p.speed <= base * 1.2 + EPS);
        assert!(p.direction.to_angle().to_degrees().abs() <= 25.0 + 5.0 + EPS);
        let ProjectileKind::Spray(v) = p.kind else {
            panic!("expected spray");
        };
        assert!((0.7..=1.3).contains(&v.size));
        assert!((0.8..=1.2).contains(&v.intensity));
    }
}

#[test]
fn thrown_landing_never_exceeds_range() {
    let cfg = WeaponConfig::grenade();
    let tunables = Tunables::default();
    let range = cfg.range * tunables.tile_size;

    for aim in [Vec2::new(1000.0, 0.0), Vec2::new(50.0, 50.0), Vec2::new(-3000.0, 700.0)] {
        let g = fire_one(WeaponKind::Grenade, &cfg, aim, &tunables);
        let ProjectileKind::Grenade(flight) = g.kind else {
            panic!("expected grenade");
        };
        assert!(flight.landing.distance(Vec2::ZERO) <= range + EPS);
    }
}

#[test]
fn thrown_at_own_feet_uses_aim_direction() {
    let cfg = WeaponConfig::grenade();
    let g = fire_one(WeaponKind::Grenade, &cfg, Vec2::ZERO, &Tunables::default());
    assert_eq!(g.direction, Vec2::X);
    assert_eq!(g.position, Vec2::ZERO);
}

#[test]
fn orbital_drops_near_the_aim_point() {
    let cfg = WeaponConfig::missile_striker();
    let tunables = Tunables::default();
    let max_miss = tunables.tile_size * cfg.accuracy * 10.0;
    let mut rng = ChaCha8Rng::seed_from_u64(5);
    let aim = Vec2::new(300.0, -40.0);

    let strike = factory::fire(WeaponKind::MissileStriker, &cfg, &shot_at(aim), &tunables, &mut rng)
        .remove(0);
    assert!(strike.position.distance(aim) <= max_miss + EPS);
    assert!(matches!(strike.kind, ProjectileKind::Orbital { altitude, .. } if altitude == 600.0));
    assert_eq!(strike.splash_radius, Some(7.0 * 32.0));
}

#[test]
fn beam_and_budgets_come_from_config() {
    let tunables = Tunables::default();
    let ray = fire_one(WeaponKind::Railgun, &WeaponConfig::railgun(), Vec2::X, &tunables);
    assert_eq!(ray.speed, tunables.beam_speed);
    assert_eq!(ray.pierces_left, 3);
    assert_eq!(ray.bounces_left, 0);

    let cfg = WeaponConfig::ricochet_pistol();
    let ricochet = fire_one(WeaponKind::RicochetPistol, &cfg, Vec2::X, &tunables);
    assert_eq!((ricochet.pierces_left, ricochet.bounces_left), (0, 2));
}

// --------------------------------------------------------------------------------------
// Bullets
// --------------------------------------------------------------------------------------

#[test]
fn pierce_zero_is_spent_after_exactly_one_hit() {
    let mut p = bullet(ContactEffect::Pierce, 0, 0);
    let mut targets = vec![
        Dummy::new(0, Vec2::new(20.0, 0.0)),
        Dummy::new(1, Vec2::new(60.0, 0.0)),
    ];

    assert_eq!(run(&mut p, &mut targets, &[], &mut Vec::new(), 50), Some(1));
    assert_eq!(targets[0].hp, 95.0);
    assert_eq!(targets[1].hp, 100.0);
}

#[test]
fn pierce_skips_already_struck_targets() {
    let mut p = bullet(ContactEffect::Pierce, 1, 0);
    let mut targets = vec![
        Dummy::new(0, Vec2::new(20.0, 0.0)),
        Dummy::new(1, Vec2::new(100.0, 0.0)),
    ];

    let spent = run(&mut p, &mut targets, &[], &mut Vec::new(), 50);
    assert_eq!(spent, Some(9));
    assert_eq!(targets[0].hp, 95.0, "hit once despite overlapping for several ticks");
    assert_eq!(targets[1].hp, 95.0);
}

#[test]
fn grazing_bounce_hits_the_target_once_and_leaves() {
    let mut p = bullet(ContactEffect::NoDamageBounce, 0, 2);
    p.size = 6.0;
    p.position = Vec2::new(-23.0, 20.0);
    let mut targets = vec![Dummy::new(0, Vec2::ZERO)];

    assert_eq!(run(&mut p, &mut targets, &[], &mut Vec::new(), 10), None);
    assert_eq!(targets[0].hp, 95.0);
    assert_eq!(p.bounces_left, 1);
    assert_eq!(p.direction, Vec2::NEG_X);
}

#[test]
fn nearer_target_takes_the_hit_when_both_are_crossed() {
    let mut p = bullet(ContactEffect::Pierce, 0, 0);
    p.speed = 100.0;
    let mut targets = vec![
        Dummy::new(0, Vec2::new(80.0, 0.0)),
        Dummy::new(1, Vec2::new(40.0, 0.0)),
    ];

    assert_eq!(run(&mut p, &mut targets, &[], &mut Vec::new(), 1), Some(1));
    assert_eq!(targets[1].hp, 95.0);
    assert_eq!(targets[0].hp, 100.0);
}

#[test]
fn dead_targets_are_not_hit() {
    let mut p = bullet(ContactEffect::Pierce, 0, 0);
    let mut corpse = Dummy::new(0, Vec2::new(20.0, 0.0));
    corpse.hp = 0.0;
    let mut targets = vec![corpse];
    assert_eq!(run(&mut p, &mut targets, &[], &mut Vec::new(), 20), None);
}

#[test]
fn damage_bounce_survives_its_budget_then_is_spent() {
    let mut p = bullet(ContactEffect::DamageBounce, 0, 2);
    let walls = [vertical_wall(50.0), vertical_wall(-60.0)];
    let tunables = Tunables::default();

    let mut collisions = 0;
    let mut spent = false;
    for tick in 1..=200u32 {
        let before = p.bounces_left;
        let step = step_alone(&mut p, &walls, &tunables, TICK * tick);
        if step == Step::Spent {
            collisions += 1;
            spent = true;
            break;
        }
        if p.bounces_left < before {
            collisions += 1;
        }
    }

    assert!(spent);
    assert_eq!(collisions, 3);
    assert!((p.damage - 5.0 * 1.1 * 1.1).abs() < EPS);
}

#[test]
fn no_damage_bounce_keeps_damage() {
    let mut p = bullet(ContactEffect::NoDamageBounce, 0, 1);
    let walls = [vertical_wall(50.0)];
    let tunables = Tunables::default();
    for tick in 1..=5u32 {
        step_alone(&mut p, &walls, &tunables, TICK * tick);
    }
    assert_eq!(p.bounces_left, 0);
    assert_eq!(p.direction, Vec2::NEG_X);
    assert_eq!(p.damage, 5.0);
}

#[test]
fn fast_shots_do_not_tunnel() {
    let mut p = bullet(ContactEffect::NoDamageBounce, 0, 1);
    p.speed = 100.0;
    let thin = [Aabb2d { min: Vec2::new(50.0, -10.0), max: Vec2::new(54.0, 10.0) }];

    assert_eq!(run(&mut p, &mut [], &thin, &mut Vec::new(), 1), None);
    assert_eq!(p.position, Vec2::ZERO);
    assert_eq!(p.direction, Vec2::NEG_X);
}

#[test]
fn explode_on_wall_splashes_once() {
    let mut p = bullet(ContactEffect::Explode, 0, 0);
    p.splash_radius = Some(64.0);
    let mut targets = vec![Dummy::new(0, Vec2::new(40.0, 30.0))];
    let mut splashes = Vec::new();

    assert_eq!(run(&mut p, &mut targets, &[vertical_wall(50.0)], &mut splashes, 20), Some(5));
    assert_eq!(splashes.len(), 1);
    assert!(targets[0].hp < 100.0);
}

#[test]
fn explode_on_target_hits_directly_and_splashes() {
    let mut p = bullet(ContactEffect::Explode, 0, 0);
    p.splash_radius = Some(64.0);
    let mut targets = vec![Dummy::new(0, Vec2::new(20.0, 0.0))];
    let mut splashes = Vec::new();

    assert_eq!(run(&mut p, &mut targets, &[], &mut splashes, 5), Some(1));
    // 5 direct, then 20 from the innermost band (10px from the blast).
    assert_eq!(targets[0].hp, 75.0);
    assert_eq!(splashes.len(), 1);
}

#[test]
fn range_runs_out_before_wall_contact() {
    let mut p = bullet(ContactEffect::Explode, 0, 0);
    p.range = 5.0;
    p.splash_radius = Some(64.0);
    let mut splashes = Vec::new();

    assert_eq!(run(&mut p, &mut [], &[vertical_wall(8.0)], &mut splashes, 5), Some(1));
    assert!(splashes.is_empty());
}

#[test]
fn homing_turns_at_most_max_turn_per_tick() {
    let mut p = bullet(ContactEffect::Pierce, 0, 0);
    p.kind = ProjectileKind::Bullet {
        homing: Some(HomingState {
            max_turn: 6f32.to_radians(),
            duration: ms(1500),
            elapsed: Duration::ZERO,
        }),
    };
    let mut targets = vec![Dummy::new(0, Vec2::new(0.0, 300.0))];
    let tunables = Tunables::default();

    step_projectile(&mut p, &mut targets, &env(&[], &tunables, TICK), &mut Vec::new());
    assert!((p.direction.to_angle() - 6f32.to_radians()).abs() < EPS);

    if let ProjectileKind::Bullet { homing: Some(h) } = &mut p.kind {
        h.elapsed = ms(1500);
    }
    let before = p.direction;
    step_projectile(&mut p, &mut targets, &env(&[], &tunables, TICK * 2), &mut Vec::new());
    assert_eq!(p.direction, before, "homing window closed");
}

// --------------------------------------------------------------------------------------
// Other variants
// --------------------------------------------------------------------------------------

#[test]
fn grenade_flies_rolls_stops_then_detonates() {
    let tunables = Tunables::default();
    let cfg = WeaponConfig::grenade();
    let mut g = fire_one(WeaponKind::Grenade, &cfg, Vec2::new(100.0, 0.0), &tunables);
    let mut splashes = Vec::new();

    for tick in 1..=10u32 {
        assert_eq!(step_alone(&mut g, &[], &tunables, TICK * tick), Step::Alive);
    }
    assert!((g.position.x - 100.0).abs() < EPS);
    assert!(matches!(g.kind, ProjectileKind::Grenade(f) if f.phase == GrenadePhase::Rolling));

    for tick in 11..=100u32 {
        step_alone(&mut g, &[], &tunables, TICK * tick);
    }
    assert!(matches!(g.kind, ProjectileKind::Grenade(f) if f.phase == GrenadePhase::Stopped));
    assert!(g.position.x > 100.0 && g.position.x <= 130.0);
    assert!(splashes.is_empty());

    let mut targets = vec![Dummy::new(0, g.position)];
    let fuse = env(&[], &tunables, Duration::from_secs(3));
    let step = step_projectile(&mut g, &mut targets, &fuse, &mut splashes);
    assert_eq!(step, Step::Spent);
    assert_eq!(splashes.len(), 1);
    assert_eq!(splashes[0].radius, 96.0);
    assert_eq!(targets[0].hp, 80.0);
}

#[test]
fn grenade_bounces_off_walls_with_damping() {
    let tunables = Tunables::default();
    let cfg = WeaponConfig::grenade();
    let mut g = fire_one(WeaponKind::Grenade, &cfg, Vec2::new(300.0, 0.0), &tunables);
    let walls = [vertical_wall(40.0)];

    for tick in 1..=10u32 {
        step_alone(&mut g, &walls, &tunables, TICK * tick);
    }
    let ProjectileKind::Grenade(flight) = g.kind else {
        panic!("expected grenade");
    };
    assert!(g.position.x < 40.0);
    assert!(flight.velocity.x < 0.0 || flight.phase != GrenadePhase::Flying);
}

#[test]
fn orbital_strike_lands_when_altitude_runs_out() {
    let tunables = Tunables::default();
    let cfg = WeaponConfig::missile_striker();
    let mut strike = fire_one(WeaponKind::MissileStriker, &cfg, Vec2::ZERO, &tunables);
    let mut splashes = Vec::new();

    // 600 px at 4 px per tick.
    assert_eq!(run(&mut strike, &mut [], &[], &mut splashes, 200), Some(150));
    assert_eq!(splashes.len(), 1);
}

#[test]
fn orbital_beam_charges_ticks_and_expires() {
    let tunables = Tunables::default();
    let cfg = WeaponConfig::solar_death_beam();
    let mut beam = fire_one(WeaponKind::SolarDeathBeam, &cfg, Vec2::ZERO, &tunables);
    let mut targets = vec![
        Dummy::new(0, Vec2::new(30.0, 0.0)),
        Dummy::new(1, Vec2::new(200.0, 0.0)),
    ];
    let mut splashes = Vec::new();
    let mut step = |beam: &mut Projectile, targets: &mut Vec<Dummy>, now: Duration| {
        step_projectile(beam, targets, &env(&[], &tunables, now), &mut splashes)
    };

    assert_eq!(step(&mut beam, &mut targets, ms(1000)), Step::Alive);
    assert_eq!(step(&mut beam, &mut targets, ms(2000)), Step::Alive);
    assert_eq!(targets[0].hp, 100.0, "nothing while charging or on the activation tick");

    step(&mut beam, &mut targets, ms(2200));
    assert_eq!(targets[0].hp, 92.0);
    assert!(targets[0].status.burning.is_some());
    assert_eq!(targets[1].hp, 100.0);

    step(&mut beam, &mut targets, ms(2300));
    assert_eq!(targets[0].hp, 92.0);

    assert_eq!(step(&mut beam, &mut targets, ms(7000)), Step::Spent);
}

#[test]
fn orbital_beam_tracks_the_owner_aim() {
    let tunables = Tunables::default();
    let cfg = WeaponConfig::solar_death_beam();
    let mut beam = fire_one(WeaponKind::SolarDeathBeam, &cfg, Vec2::ZERO, &tunables);

    let tracking = StepEnv {
        aim_point: Some(Vec2::new(40.0, 10.0)),
        ..env(&[], &tunables, ms(100))
    };
    step_projectile(&mut beam, &mut Vec::<Dummy>::new(), &tracking, &mut Vec::new());
    assert_eq!(beam.position, Vec2::new(40.0, 10.0));
}

#[test]
fn beam_strikes_each_target_once_until_pierce_runs_out() {
    let tunables = Tunables::default();
    let mut ray = fire_one(WeaponKind::Railgun, &WeaponConfig::railgun(), Vec2::X, &tunables);
    let mut targets: Vec<Dummy> = (0..5)
        .map(|i| Dummy::new(i, Vec2::new(100.0 * (i + 1) as f32, 0.0)))
        .collect();

    let spent = run(&mut ray, &mut targets, &[], &mut Vec::new(), 50);
    assert!(spent.is_some());
    for t in &targets[..4] {
        assert_eq!(t.hp, 88.0);
        assert_eq!(t.knockback.velocity, Vec2::ZERO, "beams never push");
    }
    assert_eq!(targets[4].hp, 100.0);
}

#[test]
fn beam_spends_its_last_pierce_on_the_nearest_target() {
    let tunables = Tunables::default();
    let mut ray = fire_one(WeaponKind::Railgun, &WeaponConfig::railgun(), Vec2::X, &tunables);
    ray.speed = 200.0;
    ray.pierces_left = 0;
    let mut targets = vec![
        Dummy::new(0, Vec2::new(150.0, 0.0)),
        Dummy::new(1, Vec2::new(60.0, 0.0)),
    ];

    assert_eq!(run(&mut ray, &mut targets, &[], &mut Vec::new(), 1), Some(1));
    assert_eq!(targets[1].hp, 88.0);
    assert_eq!(targets[0].hp, 100.0);
}

#[test]
fn beam_stops_at_walls_and_keeps_a_short_trail() {
    let tunables = Tunables { beam_trail_len: 5, ..default() };
    let mut ray = fire_one(WeaponKind::Railgun, &WeaponConfig::railgun(), Vec2::X, &tunables);

    for tick in 1..=8u32 {
        assert_eq!(step_alone(&mut ray, &[], &tunables, TICK * tick), Step::Alive);
    }
    let ProjectileKind::Beam { trail, .. } = &ray.kind else {
        panic!("expected beam");
    };
    assert_eq!(trail.len(), 5);

    let walled = [vertical_wall(ray.position.x + 20.0)];
    assert_eq!(step_alone(&mut ray, &walled, &tunables, TICK * 9), Step::Spent);
}

#[test]
fn mine_waits_for_a_live_target_in_radius() {
    let tunables = Tunables::default();
    let cfg = WeaponConfig::proximity_mine();
    let mut mine = factory::mine(WeaponKind::ProximityMine, &cfg, &shot_at(Vec2::ZERO), &tunables);
    let mut splashes = Vec::new();

    let mut corpse = Dummy::new(0, Vec2::new(10.0, 0.0));
    corpse.hp = 0.0;
    let mut targets = vec![corpse, Dummy::new(1, Vec2::new(100.0, 0.0))];
    assert_eq!(run(&mut mine, &mut targets, &[], &mut splashes, 100), None);
    assert_eq!(mine.position, Vec2::ZERO);

    targets[1].center = Vec2::new(30.0, 0.0);
    assert_eq!(run(&mut mine, &mut targets, &[], &mut splashes, 1), Some(1));
    assert_eq!(splashes.len(), 1);
    assert_eq!(targets[1].hp, 88.0);
}

#[test]
fn shifting_moves_projectile_timers() {
    let tunables = Tunables::default();
    let cfg = WeaponConfig::grenade();
    let mut g = fire_one(WeaponKind::Grenade, &cfg, Vec2::new(50.0, 0.0), &tunables);
    g.shift(Duration::from_secs(10));
    let ProjectileKind::Grenade(flight) = g.kind else {
        panic!("expected grenade");
    };
    assert_eq!(flight.created, Duration::from_secs(10));
}

// --------------------------------------------------------------------------------------
// System
// --------------------------------------------------------------------------------------

#[test]
fn simulate_system_despawns_spent_and_damages_targets() {
    let mut world = combat_world();
    world.insert_resource(CombatClock::at(TICK));
    let cat = world
        .spawn(CreatureBundle::creature(
            CreatureKind::ZombieCat,
            TargetId(0),
            Vec2::new(20.0, 0.0),
            32.0,
        ))
        .id();

    let cfg = WeaponConfig {
        accuracy: 0.0,
        modifiers: WeaponModifiers::default(),
        ..WeaponConfig::rusty_pistol()
    };
    let shot = fire_one(WeaponKind::RustyPistol, &cfg, Vec2::X, &Tunables::default());
    let flying = world.spawn((Transform::default(), shot.clone())).id();

    let mut stray = shot;
    stray.direction = Vec2::NEG_X;
    let stray = world.spawn((Transform::default(), stray)).id();

    run_system_once(&mut world, simulate_projectiles);

    assert!(world.get_entity(flying).is_err());
    assert_eq!(world.get::<Health>(cat).map(|h| h.hp), Some(3.0));
    let tf = world.get::<Transform>(stray).expect("stray still flying");
    assert_eq!(tf.translation.x, -12.0);
    assert!(world.resource::<SplashVisuals>().active.is_empty());
    assert!(world.get::<StatusEffects>(cat).is_some_and(|s| s.burning.is_none()));
}
