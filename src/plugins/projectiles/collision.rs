//! Box geometry for projectile contacts.
//!
//! A contact counts if the projectile's box overlaps the obstacle where it ended
//! the tick, or if the straight segment it moved along this tick crosses the
//! obstacle. The second test stops fast shots tunnelling through thin walls.

use bevy::math::Dir2;
use bevy::math::bounding::{Aabb2d, BoundingVolume, IntersectsVolume, RayCast2d};
use bevy::prelude::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    /// Mirror `v` off a surface whose normal lies along this axis.
    pub fn reflect(self, v: Vec2) -> Vec2 {
        match self {
            Self::X => Vec2::new(-v.x, v.y),
            Self::Y => Vec2::new(v.x, -v.y),
        }
    }
}

#[inline]
pub fn box_at(center: Vec2, half: Vec2) -> Aabb2d {
    Aabb2d::new(center, half)
}

fn contains(bounds: &Aabb2d, point: Vec2) -> bool {
    point.cmpge(bounds.min).all() && point.cmple(bounds.max).all()
}

/// Does the segment `from -> to` cross `bounds`?
pub fn segment_hits(bounds: &Aabb2d, from: Vec2, to: Vec2) -> bool {
    let delta = to - from;
    let Some(dir) = Dir2::new(delta).ok() else {
        return contains(bounds, from);
    };
    RayCast2d::new(from, dir, delta.length()).aabb_intersection_at(bounds).is_some()
}

/// Overlap at the end position, or a crossing along the way.
pub fn touches(bounds: &Aabb2d, prev: Vec2, cur: Vec2, half: Vec2) -> bool {
    box_at(cur, half).intersects(bounds) || segment_hits(bounds, prev, cur)
}

fn overlap_depth(a: &Aabb2d, b: &Aabb2d) -> Vec2 {
    a.max.min(b.max) - a.min.max(b.min)
}

fn overlaps(depth: Vec2) -> bool {
    depth.x > 0.0 && depth.y > 0.0
}

/// Collision normal for a box of `half` extents that moved `prev -> cur` into `bounds`.
///
/// A box that started the move clear of the obstacle bounces off the face it
/// crossed last. Only a box that was already overlapping falls back to the
/// shallower overlap axis.
pub fn bounce_axis(bounds: &Aabb2d, prev: Vec2, cur: Vec2, half: Vec2) -> Axis {
    let before = overlap_depth(&box_at(prev, half), bounds);
    if overlaps(before) {
        let after = overlap_depth(&box_at(cur, half), bounds);
        let depth = if overlaps(after) { after } else { before };
        return if depth.x < depth.y { Axis::X } else { Axis::Y };
    }

    let grown = bounds.grow(half);
    let delta = cur - prev;
    let entry = |p: f32, d: f32, lo: f32, hi: f32| {
        if d == 0.0 {
            f32::NEG_INFINITY
        } else if d > 0.0 {
            (lo - p) / d
        } else {
            (hi - p) / d
        }
    };
    let tx = entry(prev.x, delta.x, grown.min.x, grown.max.x);
    let ty = entry(prev.y, delta.y, grown.min.y, grown.max.y);
    if tx > ty { Axis::X } else { Axis::Y }
}
