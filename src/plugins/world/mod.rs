//! World plugin: arena walls.
//!
//! Walls are plain axis-aligned boxes. Projectiles, grenades and knocked-back
//! targets all test against the same `Wall` bounds, so there is no physics
//! engine between the combat code and the geometry.

use bevy::math::bounding::Aabb2d;
use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;

use crate::common::state::GameState;
use crate::common::tunables::Tunables;

/// Arena half extents, in tiles.
const HALF_W_TILES: f32 = 16.0;
const HALF_H_TILES: f32 = 9.0;
const THICKNESS: f32 = 30.0;

/// Solid obstacle. Bounds are in world pixels.
#[derive(Component, Debug, Clone, Copy)]
pub struct Wall(pub Aabb2d);

impl Wall {
    pub fn new(center: Vec2, size: Vec2) -> Self {
        Self(Aabb2d::new(center, size * 0.5))
    }
}

pub fn plugin(app: &mut App) {
    app.add_systems(OnEnter(GameState::InGame), spawn_arena);
}

pub fn spawn_wall(
    commands: &mut Commands,
    name: impl Into<String>,
    center: Vec2,
    size: Vec2,
) -> Entity {
    commands
        .spawn((
            Name::new(name.into()),
            Wall::new(center, size),
            Transform::from_translation(center.extend(0.0)),
            DespawnOnExit(GameState::InGame),
        ))
        .id()
}

fn spawn_arena(mut commands: Commands, tunables: Option<Res<Tunables>>) {
    let tile = tunables.map_or(Tunables::default().tile_size, |t| t.tile_size);
    let half_w = HALF_W_TILES * tile;
    let half_h = HALF_H_TILES * tile;

    spawn_wall(
        &mut commands,
        "WallTop",
        Vec2::new(0.0, half_h + THICKNESS * 0.5),
        Vec2::new(half_w * 2.0 + THICKNESS * 2.0, THICKNESS),
    );
    spawn_wall(
        &mut commands,
        "WallBottom",
        Vec2::new(0.0, -half_h - THICKNESS * 0.5),
        Vec2::new(half_w * 2.0 + THICKNESS * 2.0, THICKNESS),
    );
    spawn_wall(
        &mut commands,
        "WallLeft",
        Vec2::new(-half_w - THICKNESS * 0.5, 0.0),
        Vec2::new(THICKNESS, half_h * 2.0),
    );
    spawn_wall(
        &mut commands,
        "WallRight",
        Vec2::new(half_w + THICKNESS * 0.5, 0.0),
        Vec2::new(THICKNESS, half_h * 2.0),
    );
}
