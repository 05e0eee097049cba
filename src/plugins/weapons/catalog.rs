//! Static weapon configuration.
//!
//! `WeaponConfig` is immutable once built. Anything that changes while a weapon is
//! in use (clip, reserve ammo, timers) lives in `WeaponState` instead.

use std::collections::HashMap;
use std::time::Duration;

use bevy::prelude::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WeaponKind {
    RustyPistol,
    RocketLauncher,
    MiniGun,
    Grenade,
    RicochetPistol,
    MissileStriker,
    Shotgun,
    Flamethrower,
    SolarDeathBeam,
    Railgun,
    Seeker,
    FrostLauncher,
    VenomPistol,
    ProximityMine,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FireMode {
    Single,
    Automatic,
    Shotgun,
    Spray,
    Thrown,
    Orbital,
    OrbitalBeam,
    Beam,
}

/// What a projectile does when it meets a wall or a target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContactEffect {
    Pierce,
    Explode,
    DamageBounce,
    NoDamageBounce,
}

/// Secondary effects applied on top of direct damage. Not mutually exclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OnHitEffect {
    Physical,
    Fire,
    Ice,
    Poison,
    Knockback,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Specialization {
    Precision,
    Explosives,
    Pistols,
    Assault,
    Shotguns,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Homing {
    /// Maximum turn per tick, degrees.
    pub max_turn_deg: f32,
    pub duration: Duration,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BeamTiming {
    pub duration: Duration,
    pub tick: Duration,
}

/// Mode-specific knobs. Absent means "does not apply to this weapon".
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct WeaponModifiers {
    pub warm_up: Option<Duration>,
    pub volley: Option<u32>,
    /// Total fan angle, degrees.
    pub spread: Option<f32>,
    pub bounce_limit: Option<u32>,
    pub piercing: Option<u32>,
    /// Splash radius, tiles.
    pub splash: Option<f32>,
    pub detonation: Option<Duration>,
    pub drop_height: Option<f32>,
    pub homing: Option<Homing>,
    pub beam: Option<BeamTiming>,
    pub knockback_force: Option<f32>,
    /// Overrides the 30% burn-from-hit rule.
    pub burn_damage: Option<f32>,
    /// Proximity trigger, pixels. Only mines carry one.
    pub trigger_radius: Option<f32>,
    pub ap_cost: Option<u32>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct WeaponConfig {
    pub name: &'static str,
    /// Cone fraction of a full turn; the shot deviates by up to half of it either way.
    pub accuracy: f32,
    /// Tiles.
    pub range: f32,
    pub damage: f32,
    /// Shots per minute.
    pub fire_rate: f32,
    pub fire_mode: FireMode,
    pub clip_size: u32,
    pub reload_time: Duration,
    /// Tiles.
    pub projectile_size: f32,
    pub color: Color,
    /// Pixels per tick.
    pub projectile_speed: f32,
    /// Reserve ammo at equip time. `None` is infinite.
    pub ammo: Option<u32>,
    pub specialization: Option<(Specialization, u8)>,
    pub contact_effect: ContactEffect,
    pub on_hit: Vec<OnHitEffect>,
    pub modifiers: WeaponModifiers,
}

impl WeaponConfig {
    /// Minimum time between two shots.
    pub fn fire_delay(&self) -> Duration {
        if self.fire_rate <= 0.0 {
            return Duration::MAX;
        }
        Duration::from_secs_f32(60.0 / self.fire_rate)
    }

    /// Pierce wins over bounce: a weapon that declares both never bounces.
    pub fn budgets(&self) -> (u32, u32) {
        let pierce = self.modifiers.piercing.unwrap_or(0);
        let bounce = if pierce > 0 { 0 } else { self.modifiers.bounce_limit.unwrap_or(0) };
        (pierce, bounce)
    }

    fn base(name: &'static str, fire_mode: FireMode, contact_effect: ContactEffect) -> Self {
        Self {
            name,
            accuracy: 5.0 / 360.0,
            range: 10.0,
            damage: 1.0,
            fire_rate: 60.0,
            fire_mode,
            clip_size: 1,
            reload_time: Duration::from_secs(3),
            projectile_size: 0.2,
            color: Color::srgb_u8(255, 255, 255),
            projectile_speed: 10.0,
            ammo: None,
            specialization: None,
            contact_effect,
            on_hit: vec![OnHitEffect::Physical],
            modifiers: WeaponModifiers::default(),
        }
    }

    pub fn rusty_pistol() -> Self {
        Self {
            accuracy: 30.0 / 360.0,
            range: 10.0,
            damage: 2.0,
            fire_rate: 40.0,
            clip_size: 10,
            reload_time: Duration::from_secs(3),
            color: Color::srgb_u8(200, 200, 0),
            projectile_speed: 12.0,
            specialization: Some((Specialization::Pistols, 1)),
            modifiers: WeaponModifiers { piercing: Some(1), ..default() },
            ..Self::base("Rusty Pistol", FireMode::Single, ContactEffect::Pierce)
        }
    }

    pub fn rocket_launcher() -> Self {
        Self {
            range: 12.0,
            damage: 50.0,
            fire_rate: 30.0,
            projectile_size: 0.4,
            color: Color::srgb_u8(255, 100, 0),
            projectile_speed: 8.0,
            ammo: Some(10),
            specialization: Some((Specialization::Explosives, 3)),
            modifiers: WeaponModifiers { splash: Some(2.0), ..default() },
            ..Self::base("Rocket Launcher", FireMode::Single, ContactEffect::Explode)
        }
    }

    pub fn mini_gun() -> Self {
        Self {
            accuracy: 15.0 / 360.0,
            range: 8.0,
            damage: 1.0,
            fire_rate: 480.0,
            clip_size: 120,
            reload_time: Duration::from_secs(4),
            projectile_size: 0.15,
            color: Color::srgb_u8(255, 255, 100),
            ammo: Some(480),
            specialization: Some((Specialization::Assault, 4)),
            modifiers: WeaponModifiers { warm_up: Some(Duration::from_secs(2)), ..default() },
            ..Self::base("Mini Gun", FireMode::Automatic, ContactEffect::Pierce)
        }
    }

    pub fn grenade() -> Self {
        Self {
            range: 12.0,
            damage: 25.0,
            fire_rate: 30.0,
            reload_time: Duration::from_secs(2),
            projectile_size: 0.3,
            color: Color::srgb_u8(0, 255, 0),
            projectile_speed: 8.0,
            ammo: Some(5),
            specialization: Some((Specialization::Explosives, 2)),
            modifiers: WeaponModifiers {
                splash: Some(3.0),
                detonation: Some(Duration::from_secs(3)),
                ..default()
            },
            ..Self::base("Grenade", FireMode::Thrown, ContactEffect::NoDamageBounce)
        }
    }

    pub fn ricochet_pistol() -> Self {
        Self {
            accuracy: 10.0 / 360.0,
            range: 15.0,
            damage: 1.5,
            fire_rate: 120.0,
            clip_size: 15,
            reload_time: Duration::from_millis(2500),
            color: Color::srgb_u8(100, 100, 255),
            specialization: Some((Specialization::Pistols, 2)),
            modifiers: WeaponModifiers { bounce_limit: Some(2), ..default() },
            ..Self::base("Ricochet Pistol", FireMode::Single, ContactEffect::DamageBounce)
        }
    }

    pub fn missile_striker() -> Self {
        Self {
            accuracy: 15.0 / 360.0,
            range: 1000.0,
            damage: 50.0,
            fire_rate: 30.0,
            reload_time: Duration::from_secs(4),
            projectile_size: 0.8,
            color: Color::srgb_u8(255, 150, 50),
            projectile_speed: 4.0,
            ammo: Some(3),
            specialization: Some((Specialization::Explosives, 5)),
            modifiers: WeaponModifiers {
                warm_up: Some(Duration::from_secs(2)),
                splash: Some(7.0),
                drop_height: Some(600.0),
                ..default()
            },
            ..Self::base("Missile Striker", FireMode::Orbital, ContactEffect::Explode)
        }
    }

    pub fn shotgun() -> Self {
        Self {
            range: 6.0,
            damage: 8.0,
            clip_size: 6,
            projectile_size: 0.1,
            color: Color::srgb_u8(255, 200, 100),
            projectile_speed: 8.0,
            ammo: Some(24),
            specialization: Some((Specialization::Shotguns, 1)),
            modifiers: WeaponModifiers { volley: Some(8), spread: Some(30.0), ..default() },
            ..Self::base("Shotgun", FireMode::Shotgun, ContactEffect::Pierce)
        }
    }

    pub fn flamethrower() -> Self {
        Self {
            accuracy: 25.0 / 360.0,
            range: 4.0,
            damage: 2.0,
            fire_rate: 180.0,
            clip_size: 50,
            reload_time: Duration::from_secs(4),
            projectile_size: 0.12,
            color: Color::srgb_u8(255, 100, 0),
            projectile_speed: 5.0,
            ammo: Some(100),
            specialization: Some((Specialization::Explosives, 3)),
            on_hit: vec![OnHitEffect::Fire],
            modifiers: WeaponModifiers { volley: Some(4), spread: Some(50.0), ..default() },
            ..Self::base("Flamethrower", FireMode::Spray, ContactEffect::Pierce)
        }
    }

    pub fn solar_death_beam() -> Self {
        Self {
            range: 1000.0,
            damage: 8.0,
            fire_rate: 1.0,
            reload_time: Duration::from_secs(8),
            projectile_size: 0.3,
            color: Color::srgb_u8(255, 255, 100),
            projectile_speed: 3.0,
            ammo: Some(3),
            specialization: Some((Specialization::Explosives, 4)),
            on_hit: vec![OnHitEffect::Fire],
            modifiers: WeaponModifiers {
                warm_up: Some(Duration::from_secs(2)),
                splash: Some(2.0),
                drop_height: Some(800.0),
                beam: Some(BeamTiming {
                    duration: Duration::from_secs(5),
                    tick: Duration::from_millis(200),
                }),
                ..default()
            },
            ..Self::base("Solar Death Beam", FireMode::OrbitalBeam, ContactEffect::Explode)
        }
    }

    pub fn railgun() -> Self {
        Self {
            accuracy: 2.0 / 360.0,
            range: 20.0,
            damage: 12.0,
            fire_rate: 45.0,
            clip_size: 4,
            reload_time: Duration::from_millis(3500),
            projectile_size: 0.1,
            color: Color::srgb_u8(120, 220, 255),
            ammo: Some(20),
            specialization: Some((Specialization::Precision, 3)),
            on_hit: vec![OnHitEffect::Physical, OnHitEffect::Knockback],
            modifiers: WeaponModifiers { piercing: Some(3), ..default() },
            ..Self::base("Railgun", FireMode::Beam, ContactEffect::Pierce)
        }
    }

    pub fn seeker() -> Self {
        Self {
            accuracy: 20.0 / 360.0,
            range: 14.0,
            damage: 4.0,
            fire_rate: 90.0,
            clip_size: 8,
            projectile_size: 0.2,
            color: Color::srgb_u8(255, 80, 200),
            projectile_speed: 7.0,
            specialization: Some((Specialization::Precision, 2)),
            modifiers: WeaponModifiers {
                homing: Some(Homing { max_turn_deg: 6.0, duration: Duration::from_millis(1500) }),
                ..default()
            },
            ..Self::base("Seeker", FireMode::Single, ContactEffect::Pierce)
        }
    }

    pub fn frost_launcher() -> Self {
        Self {
            accuracy: 8.0 / 360.0,
            range: 9.0,
            damage: 6.0,
            fire_rate: 50.0,
            clip_size: 5,
            projectile_size: 0.3,
            color: Color::srgb_u8(150, 220, 255),
            projectile_speed: 6.0,
            ammo: Some(30),
            on_hit: vec![OnHitEffect::Physical, OnHitEffect::Ice, OnHitEffect::Knockback],
            modifiers: WeaponModifiers { knockback_force: Some(14.0), ..default() },
            ..Self::base("Frost Launcher", FireMode::Single, ContactEffect::NoDamageBounce)
        }
    }

    pub fn venom_pistol() -> Self {
        Self {
            accuracy: 12.0 / 360.0,
            range: 10.0,
            damage: 3.0,
            fire_rate: 75.0,
            clip_size: 12,
            color: Color::srgb_u8(120, 255, 80),
            specialization: Some((Specialization::Pistols, 3)),
            on_hit: vec![OnHitEffect::Physical, OnHitEffect::Poison],
            ..Self::base("Venom Pistol", FireMode::Single, ContactEffect::Pierce)
        }
    }

    pub fn proximity_mine() -> Self {
        Self {
            range: 0.0,
            damage: 30.0,
            fire_rate: 0.0,
            projectile_size: 0.4,
            color: Color::srgb_u8(255, 60, 60),
            projectile_speed: 0.0,
            modifiers: WeaponModifiers {
                splash: Some(2.0),
                trigger_radius: Some(32.0),
                ap_cost: Some(1),
                ..default()
            },
            ..Self::base("Proximity Mine", FireMode::Single, ContactEffect::Explode)
        }
    }
}

/// Immutable per-kind configuration, supplied by the game's catalog layer.
#[derive(Resource, Debug, Clone, Default)]
pub struct WeaponCatalog {
    configs: HashMap<WeaponKind, WeaponConfig>,
}

impl WeaponCatalog {
    pub fn standard() -> Self {
        let mut catalog = Self::default();
        catalog.insert(WeaponKind::RustyPistol, WeaponConfig::rusty_pistol());
        catalog.insert(WeaponKind::RocketLauncher, WeaponConfig::rocket_launcher());
        catalog.insert(WeaponKind::MiniGun, WeaponConfig::mini_gun());
        catalog.insert(WeaponKind::Grenade, WeaponConfig::grenade());
        catalog.insert(WeaponKind::RicochetPistol, WeaponConfig::ricochet_pistol());
        catalog.insert(WeaponKind::MissileStriker, WeaponConfig::missile_striker());
        catalog.insert(WeaponKind::Shotgun, WeaponConfig::shotgun());
        catalog.insert(WeaponKind::Flamethrower, WeaponConfig::flamethrower());
        catalog.insert(WeaponKind::SolarDeathBeam, WeaponConfig::solar_death_beam());
        catalog.insert(WeaponKind::Railgun, WeaponConfig::railgun());
        catalog.insert(WeaponKind::Seeker, WeaponConfig::seeker());
        catalog.insert(WeaponKind::FrostLauncher, WeaponConfig::frost_launcher());
        catalog.insert(WeaponKind::VenomPistol, WeaponConfig::venom_pistol());
        catalog.insert(WeaponKind::ProximityMine, WeaponConfig::proximity_mine());
        catalog
    }

    pub fn insert(&mut self, kind: WeaponKind, config: WeaponConfig) {
        self.configs.insert(kind, config);
    }

    pub fn get(&self, kind: WeaponKind) -> Option<&WeaponConfig> {
        self.configs.get(&kind)
    }

    /// Late lookup used during hit resolution. Unknown kinds resolve to a
    /// modifier set that applies nothing extra, not even default knockback.
    pub fn modifiers(&self, kind: WeaponKind) -> WeaponModifiers {
        match self.get(kind) {
            Some(cfg) => cfg.modifiers,
            None => WeaponModifiers { knockback_force: Some(0.0), ..default() },
        }
    }
}
