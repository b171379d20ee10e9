//! Ship projectiles
//!
//! A bullet expires by travel distance, not by wall clock: once its
//! accumulated path length reaches a fraction of the short screen axis it is
//! done, so it can never complete a full lap. Wraps contribute only the
//! distance up to the exited edge.

use glam::Vec2;

use super::kinematics::{self, Kinematic};
use crate::consts::*;

#[derive(Debug, Clone)]
pub struct Bullet {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Total wrapped-path distance; monotonically non-decreasing
    pub distance_traveled: f32,
    /// Set exactly once, irreversibly
    pub dead: bool,
}

impl Bullet {
    pub fn new(pos: Vec2, vel: Vec2) -> Self {
        Self {
            pos,
            vel,
            distance_traveled: 0.0,
            dead: false,
        }
    }

    /// Maximum travel distance for the given world size
    pub fn max_travel(bounds: Vec2) -> f32 {
        bounds.x.min(bounds.y) * BULLET_MAX_DISTANCE
    }

    pub fn update(&mut self, dt: f32, bounds: Vec2) {
        if self.dead {
            return;
        }
        let step = self.vel.length() * dt;
        // fraction < 1.0 when a wrap cut the tick short of its full path
        let fraction = kinematics::advance_wrapped(self, dt, bounds);
        self.distance_traveled += step * fraction;
        if self.distance_traveled >= Self::max_travel(bounds) {
            self.dead = true;
        }
    }
}

impl Kinematic for Bullet {
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
        BULLET_RADIUS
    }
}
