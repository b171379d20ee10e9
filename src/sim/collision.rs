//! Circle-circle collision detection
//!
//! Every gameplay shape is a bounding circle; no spatial partitioning is
//! needed at this entity count. Overlap resolution (destroy-sets, per-bullet
//! short-circuit) lives in `tick`, keeping this module a pure predicate.

use glam::Vec2;

/// Two circles overlap iff the distance between their centers is strictly
/// less than the sum of their radii.
#[inline]
pub fn circles_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    let reach = ra + rb;
    a.distance_squared(b) < reach * reach
}
