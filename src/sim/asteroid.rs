//! Destructible asteroids: size tiers, silhouettes, splitting
//!
//! An asteroid's radius is a pure function of its tier. The irregular
//! silhouette is generated once at creation and never changes; it is purely
//! visual, collisions use the bounding circle.

use glam::Vec2;
use rand::Rng;

use super::kinematics::{self, Kinematic};
use crate::consts::*;
use crate::{heading, rotate};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeTier {
    Large,
    Medium,
    Small,
}

impl SizeTier {
    pub fn radius(self) -> f32 {
        match self {
            SizeTier::Large => 40.0,
            SizeTier::Medium => 20.0,
            SizeTier::Small => 10.0,
        }
    }

    /// Score awarded when an asteroid of this tier is destroyed
    pub fn points(self) -> u32 {
        match self {
            SizeTier::Large => SCORE_LARGE,
            SizeTier::Medium => SCORE_MEDIUM,
            SizeTier::Small => SCORE_SMALL,
        }
    }

    /// Tier of the two children produced on destruction, if any
    pub fn child(self) -> Option<SizeTier> {
        match self {
            SizeTier::Large => Some(SizeTier::Medium),
            SizeTier::Medium => Some(SizeTier::Small),
            SizeTier::Small => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Asteroid {
    pub pos: Vec2,
    pub vel: Vec2,
    pub tier: SizeTier,
    /// Irregular closed polygon in local space, fixed for the lifetime
    pub silhouette: Vec<Vec2>,
}

impl Asteroid {
    pub fn new(pos: Vec2, vel: Vec2, tier: SizeTier, rng: &mut impl Rng) -> Self {
        Self {
            pos,
            vel,
            tier,
            silhouette: make_silhouette(tier.radius(), rng),
        }
    }

    /// Spawn a large asteroid on the screen perimeter, drifting loosely
    /// toward the center.
    pub fn spawn_on_perimeter(bounds: Vec2, rng: &mut impl Rng) -> Self {
        let pos = match rng.random_range(0..4u8) {
            0 => Vec2::new(rng.random_range(0.0..bounds.x), 0.0),
            1 => Vec2::new(rng.random_range(0.0..bounds.x), bounds.y),
            2 => Vec2::new(0.0, rng.random_range(0.0..bounds.y)),
            _ => Vec2::new(bounds.x, rng.random_range(0.0..bounds.y)),
        };
        let to_center = ((bounds * 0.5) - pos).normalize_or_zero();
        let dir = rotate(to_center, rng.random_range(-SPAWN_AIM_SPREAD..SPAWN_AIM_SPREAD));
        let speed = rng.random_range(ASTEROID_MIN_SPEED..ASTEROID_MAX_SPEED);
        Self::new(pos, dir * speed, SizeTier::Large, rng)
    }

    /// Children spawned at this asteroid's position on destruction.
    ///
    /// Each child moves at 1.5x the parent speed, deflected independently by
    /// up to 45 degrees from the parent heading. Small asteroids yield none.
    pub fn split(&self, rng: &mut impl Rng) -> Vec<Asteroid> {
        let Some(child_tier) = self.tier.child() else {
            return Vec::new();
        };
        let parent_speed = self.vel.length();
        let parent_dir = self.vel.normalize_or_zero();
        (0..2)
            .map(|_| {
                let dir = rotate(
                    parent_dir,
                    rng.random_range(-SPLIT_MAX_DEFLECTION..SPLIT_MAX_DEFLECTION),
                );
                Asteroid::new(self.pos, dir * parent_speed * SPLIT_SPEED_FACTOR, child_tier, rng)
            })
            .collect()
    }

    pub fn update(&mut self, dt: f32, bounds: Vec2) {
        kinematics::advance_wrapped(self, dt, bounds);
    }
}

impl Kinematic for Asteroid {
    fn position(&self) -> Vec2 {
        self.pos
    }
    fn set_position(&mut self, pos: Vec2) {
        self.pos = pos;
    }
    fn velocity(&self) -> Vec2 {
        self.vel
    }
    fn radius(&self) -> f32 {
        self.tier.radius()
    }
}

/// Irregular closed polygon: evenly spaced vertices with per-vertex radius
/// jitter.
fn make_silhouette(radius: f32, rng: &mut impl Rng) -> Vec<Vec2> {
    (0..ASTEROID_VERTEX_COUNT)
        .map(|i| {
            let theta = std::f32::consts::TAU * i as f32 / ASTEROID_VERTEX_COUNT as f32;
            let r = radius * (1.0 + rng.random_range(-ASTEROID_JITTER..ASTEROID_JITTER));
            heading(theta) * r
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    const BOUNDS: Vec2 = Vec2::new(800.0, 600.0);

    #[test]
    fn test_tier_radii() {
        assert_eq!(SizeTier::Large.radius(), 40.0);
        assert_eq!(SizeTier::Medium.radius(), 20.0);
        assert_eq!(SizeTier::Small.radius(), 10.0);
    }

    #[test]
    fn test_split_chain() {
        assert_eq!(SizeTier::Large.child(), Some(SizeTier::Medium));
        assert_eq!(SizeTier::Medium.child(), Some(SizeTier::Small));
        assert_eq!(SizeTier::Small.child(), None);
    }

    #[test]
    fn test_silhouette_shape() {
        let mut rng = Pcg32::seed_from_u64(7);
        let a = Asteroid::new(Vec2::ZERO, Vec2::ZERO, SizeTier::Large, &mut rng);
        assert_eq!(a.silhouette.len(), ASTEROID_VERTEX_COUNT);
        for v in &a.silhouette {
            let r = v.length();
            assert!(r >= 40.0 * (1.0 - ASTEROID_JITTER) - 1e-3);
            assert!(r <= 40.0 * (1.0 + ASTEROID_JITTER) + 1e-3);
        }
    }

    #[test]
    fn test_perimeter_spawn_heads_roughly_inward() {
        let mut rng = Pcg32::seed_from_u64(42);
        for _ in 0..50 {
            let a = Asteroid::spawn_on_perimeter(BOUNDS, &mut rng);
            let speed = a.vel.length();
            assert!((ASTEROID_MIN_SPEED..ASTEROID_MAX_SPEED).contains(&speed));
            let to_center = ((BOUNDS * 0.5) - a.pos).normalize_or_zero();
            let cos = a.vel.normalize_or_zero().dot(to_center);
            // Within 45 degrees of straight at the center
            assert!(cos >= SPAWN_AIM_SPREAD.cos() - 1e-3);
        }
    }

    #[test]
    fn test_small_does_not_split() {
        let mut rng = Pcg32::seed_from_u64(3);
        let a = Asteroid::new(Vec2::ZERO, Vec2::new(60.0, 0.0), SizeTier::Small, &mut rng);
        assert!(a.split(&mut rng).is_empty());
    }

    proptest::proptest! {
        #[test]
        fn prop_split_children_follow_parent(seed in 0u64..1000, angle in 0.0f32..std::f32::consts::TAU, speed in 50.0f32..100.0) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let parent = Asteroid::new(
                Vec2::new(400.0, 300.0),
                crate::heading(angle) * speed,
                SizeTier::Large,
                &mut rng,
            );
            let children = parent.split(&mut rng);
            proptest::prop_assert_eq!(children.len(), 2);
            for child in &children {
                proptest::prop_assert_eq!(child.tier, SizeTier::Medium);
                let child_speed = child.vel.length();
                proptest::prop_assert!((child_speed - speed * SPLIT_SPEED_FACTOR).abs() < 1e-2);
                let cos = child.vel.normalize_or_zero().dot(parent.vel.normalize_or_zero());
                proptest::prop_assert!(cos >= SPLIT_MAX_DEFLECTION.cos() - 1e-3);
            }
        }
    }
}
