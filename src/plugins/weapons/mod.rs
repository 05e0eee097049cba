//! Weapons plugin: static catalog, per-holder weapon state and the firing controller.

pub mod catalog;
pub mod firing;

use bevy::ecs::message::MessageReader;
use bevy::prelude::*;

use crate::common::clock::{CombatClock, ShiftTimestamps, TimeShift};
use crate::common::rng::CombatRng;
use crate::common::tunables::Tunables;
use crate::plugins::core::CombatSet;
use crate::plugins::projectiles::factory::{self, ShotOrigin};
use crate::plugins::projectiles::spawn_projectile;

use catalog::WeaponCatalog;
use firing::{Abilities, FireIntent, Loadout, Specializations, WeaponEvent};

pub fn plugin(app: &mut App) {
    app.insert_resource(WeaponCatalog::standard());

    app.add_systems(FixedUpdate, (fire_weapons, place_mines).in_set(CombatSet::Fire))
        .add_systems(PreUpdate, shift_weapon_timestamps);
}

/// Step every equipped weapon. Only the active one sees the trigger; the rest
/// still finish their reloads.
pub fn fire_weapons(
    mut commands: Commands,
    clock: Res<CombatClock>,
    tunables: Res<Tunables>,
    catalog: Res<WeaponCatalog>,
    mut rng: ResMut<CombatRng>,
    mut shooters: Query<(
        Entity,
        &Transform,
        &mut FireIntent,
        &mut Loadout,
        Option<&Specializations>,
    )>,
) {
    let now = clock.now;

    for (entity, transform, mut intent, mut loadout, specs) in &mut shooters {
        let reload_requested = std::mem::take(&mut intent.reload_requested);
        let active = loadout.active;
        let shot = ShotOrigin {
            position: transform.translation.truncate(),
            aim_dir: intent.aim_dir,
            aim_point: intent.aim_point,
            owner: Some(entity),
            now,
        };

        for (index, weapon) in loadout.weapons.iter_mut().enumerate() {
            let Some(cfg) = catalog.get(weapon.kind) else {
                continue;
            };
            let infinite = specs.is_some_and(|s| s.grants_infinite_ammo(cfg));
            let is_active = index == active;

            if is_active && reload_requested && weapon.state.request_reload(cfg, now, infinite) {
                debug!("{}: manual reload", cfg.name);
            }

            let held = is_active && intent.trigger_held;
            let (state, events) = weapon.state.step(cfg, now, held, infinite);
            weapon.state = state;

            for event in events {
                match event {
                    WeaponEvent::Fired => {
                        let volley =
                            factory::fire(weapon.kind, cfg, &shot, &tunables, &mut rng.rng);
                        for projectile in volley {
                            spawn_projectile(&mut commands, projectile);
                        }
                    }
                    WeaponEvent::WarmUpStarted => debug!("{}: warming up", cfg.name),
                    WeaponEvent::ReloadStarted => debug!("{}: reloading", cfg.name),
                    WeaponEvent::Reloaded { loaded } => debug!("{}: reloaded {loaded}", cfg.name),
                }
            }
        }
    }
}

pub fn place_mines(
    mut commands: Commands,
    clock: Res<CombatClock>,
    tunables: Res<Tunables>,
    catalog: Res<WeaponCatalog>,
    mut holders: Query<(Entity, &Transform, &mut Abilities)>,
) {
    for (entity, transform, mut abilities) in &mut holders {
        if !abilities.triggered {
            continue;
        }

        let kind = abilities.ability;
        let Some(cfg) = catalog.get(kind) else {
            warn!("no ability config for {kind:?}");
            abilities.triggered = false;
            continue;
        };
        if !abilities.try_spend(cfg.modifiers.ap_cost.unwrap_or(0)) {
            debug!("{}: not enough ability points", cfg.name);
            continue;
        }

        let position = transform.translation.truncate();
        let shot = ShotOrigin {
            position,
            aim_dir: Vec2::ZERO,
            aim_point: position,
            owner: Some(entity),
            now: clock.now,
        };
        spawn_projectile(&mut commands, factory::mine(kind, cfg, &shot, &tunables));
    }
}

pub fn shift_weapon_timestamps(
    mut shifts: MessageReader<ShiftTimestamps>,
    mut loadouts: Query<&mut Loadout>,
) {
    for ShiftTimestamps(by) in shifts.read() {
        for mut loadout in &mut loadouts {
            for weapon in &mut loadout.weapons {
                weapon.state.shift(*by);
            }
        }
    }
}
