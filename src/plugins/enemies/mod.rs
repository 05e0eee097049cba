//! Enemies plugin: the creatures projectiles can hurt.
//!
//! A target is an entity with `TargetId`, `Transform`, `Hitbox`, `Health`,
//! `StatusEffects` and `Knockback`. `Mobility` is optional; without it the target
//! simply has no slow capability.
//!
//! Combat code never touches these components directly. Systems that resolve hits
//! borrow them through `TargetMut`, which implements `CombatTarget`.

use std::time::Duration;

use bevy::math::bounding::Aabb2d;
use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;

use crate::common::state::GameState;
use crate::plugins::core::CombatSet;
use crate::plugins::effects::components::{Knockback, Mobility, StatusEffects};
use crate::plugins::effects::resolver::CombatTarget;
use crate::plugins::effects::status::label;

// -----------------------------------------------------------------------------
// Components
// -----------------------------------------------------------------------------

#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Enemy;

/// Stable identity used by pierce and beam hit sets.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TargetId(pub u32);

#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Health {
    pub hp: f32,
}

impl Health {
    pub fn new(hp: f32) -> Self {
        Self { hp }
    }
}

/// Half extents of the target's box, pixels.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Hitbox(pub Vec2);

/// Terminal marker added the tick a target's hp drops to zero.
#[derive(Component, Debug, Clone, Copy)]
pub struct Dead;

/// Body size. Bigger bodies are harder to push around.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SizeClass {
    Small,
    Medium,
    Large,
    XLarge,
    Gigantic,
}

impl SizeClass {
    pub fn knockback_resistance(self) -> f32 {
        match self {
            Self::Small => 0.0,
            Self::Medium => 0.25,
            Self::Large => 0.5,
            Self::XLarge => 0.7,
            Self::Gigantic => 0.85,
        }
    }

    /// Hitbox multiplier relative to a medium body.
    pub fn scale(self) -> f32 {
        match self {
            Self::Small => 0.5,
            Self::Medium => 1.0,
            Self::Large => 1.5,
            Self::XLarge => 2.0,
            Self::Gigantic => 3.0,
        }
    }
}

// -----------------------------------------------------------------------------
// Resources
// -----------------------------------------------------------------------------

#[derive(Resource, Debug, Default)]
pub struct TargetIds {
    next: u32,
}

impl TargetIds {
    pub fn next(&mut self) -> TargetId {
        let id = TargetId(self.next);
        self.next = self.next.wrapping_add(1);
        id
    }
}

// -----------------------------------------------------------------------------
// Spawning
// -----------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CreatureKind {
    ZombieCat,
    /// Rooted in place. Shrugs off slows.
    Turret,
}

#[derive(Bundle)]
pub struct CreatureBundle {
    pub name: Name,
    pub enemy: Enemy,
    pub id: TargetId,
    pub transform: Transform,
    pub hitbox: Hitbox,
    pub health: Health,
    pub size: SizeClass,
    pub status: StatusEffects,
    pub knockback: Knockback,
    pub mobility: Mobility,
    pub scoped: DespawnOnExit<GameState>,
}

impl CreatureBundle {
    pub fn new(
        id: TargetId,
        position: Vec2,
        half_size: f32,
        size: SizeClass,
        hp: f32,
        mobility: Mobility,
    ) -> Self {
        Self {
            name: Name::new("Creature"),
            enemy: Enemy,
            id,
            transform: Transform::from_translation(position.extend(1.0)),
            hitbox: Hitbox(Vec2::splat(half_size * size.scale())),
            health: Health::new(hp),
            size,
            status: StatusEffects::default(),
            knockback: Knockback::with_resistance(size.knockback_resistance()),
            mobility,
            scoped: DespawnOnExit(GameState::InGame),
        }
    }

    /// Preset creatures. `tile_size` sets the base body size.
    pub fn creature(kind: CreatureKind, id: TargetId, position: Vec2, tile_size: f32) -> Self {
        let half = tile_size * 0.5;
        match kind {
            CreatureKind::ZombieCat => Self {
                name: Name::new("ZombieCat"),
                ..Self::new(id, position, half, SizeClass::Small, 5.0, Mobility::mobile(2.0))
            },
            CreatureKind::Turret => Self {
                name: Name::new("Turret"),
                ..Self::new(id, position, half, SizeClass::Large, 40.0, Mobility::Stationary)
            },
        }
    }
}

// -----------------------------------------------------------------------------
// Combat view
// -----------------------------------------------------------------------------

/// Mutable borrow of one target's combat components.
pub struct TargetMut<'a> {
    pub id: TargetId,
    pub center: Vec2,
    pub half_size: Vec2,
    pub health: Mut<'a, Health>,
    pub status: Mut<'a, StatusEffects>,
    pub knockback: Mut<'a, Knockback>,
    pub mobility: Option<Mut<'a, Mobility>>,
}

impl CombatTarget for TargetMut<'_> {
    fn id(&self) -> TargetId {
        self.id
    }

    fn center(&self) -> Vec2 {
        self.center
    }

    fn bounds(&self) -> Aabb2d {
        Aabb2d::new(self.center, self.half_size)
    }

    fn hp(&self) -> f32 {
        self.health.hp
    }

    fn take_damage(&mut self, amount: f32) {
        self.health.hp -= amount;
    }

    fn status_mut(&mut self) -> &mut StatusEffects {
        &mut self.status
    }

    fn knockback_mut(&mut self) -> &mut Knockback {
        &mut self.knockback
    }

    fn apply_slow(&mut self, duration: Duration, factor: f32) {
        if let Some(mobility) = &mut self.mobility {
            mobility.apply_slow(duration, factor);
        }
    }
}

// -----------------------------------------------------------------------------
// Plugin
// -----------------------------------------------------------------------------

pub fn plugin(app: &mut App) {
    app.init_resource::<TargetIds>();
    app.add_systems(FixedUpdate, mark_dead.in_set(CombatSet::Cleanup));
}

fn mark_dead(
    mut commands: Commands,
    q: Query<(Entity, Option<&Name>, &Health), (With<Enemy>, Without<Dead>)>,
) {
    for (entity, name, health) in &q {
        if health.hp <= 0.0 {
            info!("{} died", label(entity, name));
            commands.entity(entity).insert(Dead);
        }
    }
}
