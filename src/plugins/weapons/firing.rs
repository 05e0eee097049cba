//! Per-weapon runtime state and the firing controller.
//!
//! `WeaponState::step` is a pure transition: given the static config, the clock
//! and whether the trigger is held, it returns the next state plus what happened.
//! The ECS system only feeds it and turns `Fired` events into projectiles.

use std::collections::HashMap;
use std::time::Duration;

use bevy::prelude::*;

use super::catalog::{FireMode, Specialization, WeaponCatalog, WeaponConfig, WeaponKind};
use crate::common::clock::TimeShift;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WeaponEvent {
    Reloaded { loaded: u32 },
    WarmUpStarted,
    Fired,
    ReloadStarted,
}

/// Mutable per-holder weapon state. Two holders of the same kind never share one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WeaponState {
    pub clip: u32,
    /// `None` is an endless reserve.
    pub reserve: Option<u32>,
    pub reload_started: Option<Duration>,
    pub warm_up_started: Option<Duration>,
    pub last_shot: Option<Duration>,
}

impl WeaponState {
    pub fn equip(cfg: &WeaponConfig) -> Self {
        Self {
            clip: cfg.clip_size,
            reserve: cfg.ammo,
            reload_started: None,
            warm_up_started: None,
            last_shot: None,
        }
    }

    pub fn is_reloading(&self) -> bool {
        self.reload_started.is_some()
    }

    pub fn reset_warm_up(&mut self) {
        self.warm_up_started = None;
    }

    fn can_refill(&self, infinite_ammo: bool) -> bool {
        infinite_ammo || self.reserve.is_none_or(|r| r > 0)
    }

    /// Advance one tick.
    pub fn step(
        mut self,
        cfg: &WeaponConfig,
        now: Duration,
        trigger_held: bool,
        infinite_ammo: bool,
    ) -> (Self, Vec<WeaponEvent>) {
        let mut events = Vec::new();

        if let Some(started) = self.reload_started {
            if now.saturating_sub(started) >= cfg.reload_time {
                let loaded = self.finish_reload(cfg, infinite_ammo);
                events.push(WeaponEvent::Reloaded { loaded });
            }
        }

        if !trigger_held {
            self.warm_up_started = None;
            return (self, events);
        }

        let warmed = match cfg.modifiers.warm_up {
            Some(required) => {
                let started = *self.warm_up_started.get_or_insert_with(|| {
                    events.push(WeaponEvent::WarmUpStarted);
                    now
                });
                now.saturating_sub(started) >= required
            }
            None => true,
        };

        let cooled = self.last_shot.is_none_or(|last| now.saturating_sub(last) >= cfg.fire_delay());
        let loaded = self.clip > 0 && !self.is_reloading();
        // Orbital beams charge on the projectile itself, so the holder does not wait.
        let exempt = cfg.fire_mode == FireMode::OrbitalBeam;

        if (warmed || exempt) && cooled && loaded {
            self.clip -= 1;
            self.last_shot = Some(now);
            events.push(WeaponEvent::Fired);

            if self.clip == 0 && self.can_refill(infinite_ammo) {
                self.reload_started = Some(now);
                events.push(WeaponEvent::ReloadStarted);
            }
        }

        (self, events)
    }

    /// Start a reload by hand. Refused while already reloading, on a full clip,
    /// or with nothing left in reserve.
    pub fn request_reload(
        &mut self,
        cfg: &WeaponConfig,
        now: Duration,
        infinite_ammo: bool,
    ) -> bool {
        if self.is_reloading() || self.clip >= cfg.clip_size || !self.can_refill(infinite_ammo) {
            return false;
        }
        self.reload_started = Some(now);
        true
    }

    fn finish_reload(&mut self, cfg: &WeaponConfig, infinite_ammo: bool) -> u32 {
        self.reload_started = None;
        let wanted = cfg.clip_size.saturating_sub(self.clip);

        let loaded = match self.reserve.as_mut() {
            Some(reserve) if !infinite_ammo => {
                let loaded = wanted.min(*reserve);
                *reserve -= loaded;
                loaded
            }
            _ => wanted,
        };
        self.clip += loaded;
        loaded
    }
}

impl TimeShift for WeaponState {
    fn shift(&mut self, by: Duration) {
        self.reload_started.shift(by);
        self.warm_up_started.shift(by);
        self.last_shot.shift(by);
    }
}

// -----------------------------------------------------------------------------
// Components
// -----------------------------------------------------------------------------

/// What the shooter wants this tick. Written by whatever drives the actor.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq)]
pub struct FireIntent {
    pub trigger_held: bool,
    pub reload_requested: bool,
    pub aim_dir: Vec2,
    pub aim_point: Vec2,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EquippedWeapon {
    pub kind: WeaponKind,
    pub state: WeaponState,
}

#[derive(Component, Debug, Clone, Default)]
pub struct Loadout {
    pub weapons: Vec<EquippedWeapon>,
    pub active: usize,
}

impl Loadout {
    /// Equip every kind the catalog knows. Unknown kinds and abilities are skipped;
    /// abilities go in `Abilities`.
    pub fn new(catalog: &WeaponCatalog, kinds: &[WeaponKind]) -> Self {
        let weapons = kinds
            .iter()
            .filter_map(|&kind| {
                let Some(cfg) = catalog.get(kind) else {
                    warn!("no weapon config for {kind:?}, not equipping it");
                    return None;
                };
                if cfg.modifiers.ap_cost.is_some() {
                    warn!("{} is an ability, not equipping it as a weapon", cfg.name);
                    return None;
                }
                Some(EquippedWeapon { kind, state: WeaponState::equip(cfg) })
            })
            .collect();
        Self { weapons, active: 0 }
    }

    pub fn active(&self) -> Option<&EquippedWeapon> {
        self.weapons.get(self.active)
    }

    /// Switch weapons. The newly held one always starts cold.
    pub fn switch_to(&mut self, index: usize) -> bool {
        let Some(weapon) = self.weapons.get_mut(index) else {
            return false;
        };
        weapon.state.reset_warm_up();
        self.active = index;
        true
    }
}

/// Specialization levels earned by the holder.
#[derive(Component, Debug, Clone, Default)]
pub struct Specializations(pub HashMap<Specialization, u8>);

impl Specializations {
    pub fn level(&self, branch: Specialization) -> u8 {
        self.0.get(&branch).copied().unwrap_or(0)
    }

    /// Mastering a weapon's specialization removes its ammo limit.
    pub fn grants_infinite_ammo(&self, cfg: &WeaponConfig) -> bool {
        cfg.specialization.is_some_and(|(branch, required)| self.level(branch) >= required)
    }
}

/// Ability slot. `triggered` is a one-shot request, cleared after evaluation.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Abilities {
    pub points: u32,
    pub ability: WeaponKind,
    pub triggered: bool,
}

impl Abilities {
    pub fn new(ability: WeaponKind, points: u32) -> Self {
        Self { points, ability, triggered: false }
    }

    /// Spend points for one use. Always consumes the trigger.
    pub fn try_spend(&mut self, cost: u32) -> bool {
        if !std::mem::take(&mut self.triggered) || self.points < cost {
            return false;
        }
        self.points -= cost;
        true
    }
}
