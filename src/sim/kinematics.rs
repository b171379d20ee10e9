//! Shared motion and screen-wrap behavior
//!
//! Every moving entity (ship, bullets, asteroids) advances and wraps the same
//! way. Wrap policy: radius-inflated edges, so an object slides fully off
//! screen at `bound + radius` before reappearing at `-radius` on the far
//! side. One policy, applied uniformly.

use glam::Vec2;

/// Anything with a position, a velocity and a bounding-circle radius.
pub trait Kinematic {
    fn position(&self) -> Vec2;
    fn set_position(&mut self, pos: Vec2);
    fn velocity(&self) -> Vec2;
    fn radius(&self) -> f32;
}

/// Advance an entity by one tick and wrap it to the opposite edge if it left
/// the inflated bounds.
///
/// Returns the fraction of this tick's motion completed when the first edge
/// was exited (`1.0` when no wrap occurred). Bullets use this to accumulate
/// pre-wrap travel distance instead of the meaningless post-wrap coordinate
/// delta.
pub fn advance_wrapped<E: Kinematic + ?Sized>(entity: &mut E, dt: f32, bounds: Vec2) -> f32 {
    let old = entity.position();
    let new = old + entity.velocity() * dt;
    let (wrapped, fraction) = wrap_with_travel(old, new, entity.radius(), bounds);
    entity.set_position(wrapped);
    fraction
}

/// Wrap a freshly integrated position against radius-inflated bounds.
///
/// Returns the wrapped position and the fraction of the `old -> new` motion
/// completed when the first exited edge was reached.
pub fn wrap_with_travel(old: Vec2, new: Vec2, radius: f32, bounds: Vec2) -> (Vec2, f32) {
    let mut pos = new;
    let mut fraction = 1.0f32;

    let lo_x = -radius;
    let hi_x = bounds.x + radius;
    if new.x < lo_x {
        pos.x = hi_x;
        fraction = fraction.min(axis_exit_fraction(old.x, new.x, lo_x));
    } else if new.x > hi_x {
        pos.x = lo_x;
        fraction = fraction.min(axis_exit_fraction(old.x, new.x, hi_x));
    }

    let lo_y = -radius;
    let hi_y = bounds.y + radius;
    if new.y < lo_y {
        pos.y = hi_y;
        fraction = fraction.min(axis_exit_fraction(old.y, new.y, lo_y));
    } else if new.y > hi_y {
        pos.y = lo_y;
        fraction = fraction.min(axis_exit_fraction(old.y, new.y, hi_y));
    }

    (pos, fraction)
}

/// Fraction along `old -> new` at which `edge` was crossed.
fn axis_exit_fraction(old: f32, new: f32, edge: f32) -> f32 {
    let delta = new - old;
    if delta.abs() < f32::EPSILON {
        return 1.0;
    }
    ((edge - old) / delta).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Probe {
        pos: Vec2,
        vel: Vec2,
        radius: f32,
    }

    impl Kinematic for Probe {
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
            self.radius
        }
    }

    const BOUNDS: Vec2 = Vec2::new(800.0, 600.0);

    #[test]
    fn test_advance_without_wrap() {
        let mut p = Probe {
            pos: Vec2::new(100.0, 100.0),
            vel: Vec2::new(60.0, -30.0),
            radius: 10.0,
        };
        let fraction = advance_wrapped(&mut p, 1.0, BOUNDS);
        assert_eq!(p.pos, Vec2::new(160.0, 70.0));
        assert_eq!(fraction, 1.0);
    }

    #[test]
    fn test_wrap_right_edge() {
        let mut p = Probe {
            pos: Vec2::new(805.0, 300.0),
            vel: Vec2::new(100.0, 0.0),
            radius: 10.0,
        };
        // Moves to x=815 which is past 810; wraps to the left inflated edge
        let fraction = advance_wrapped(&mut p, 0.1, BOUNDS);
        assert_eq!(p.pos.x, -10.0);
        // Exited after 5 of the 10 pixels of motion
        assert!((fraction - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_wrap_top_edge() {
        let mut p = Probe {
            pos: Vec2::new(400.0, -8.0),
            vel: Vec2::new(0.0, -40.0),
            radius: 10.0,
        };
        let fraction = advance_wrapped(&mut p, 0.1, BOUNDS);
        assert_eq!(p.pos.y, 610.0);
        assert!((fraction - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_corner_wrap_reports_first_exit() {
        // Exits the x edge sooner than the y edge
        let mut p = Probe {
            pos: Vec2::new(808.0, 606.0),
            vel: Vec2::new(40.0, 40.0),
            radius: 10.0,
        };
        let fraction = advance_wrapped(&mut p, 0.25, BOUNDS);
        assert_eq!(p.pos, Vec2::new(-10.0, -10.0));
        // x edge at 810 reached after 2 of 10 px, y edge at 610 after 4 of 10
        assert!((fraction - 0.2).abs() < 1e-5);
    }

    proptest::proptest! {
        #[test]
        fn prop_wrapped_position_stays_in_inflated_bounds(
            x in -50.0f32..850.0,
            y in -50.0f32..650.0,
            vx in -500.0f32..500.0,
            vy in -500.0f32..500.0,
        ) {
            let radius = 10.0;
            let mut p = Probe { pos: Vec2::new(x.clamp(-radius, 810.0), y.clamp(-radius, 610.0)), vel: Vec2::new(vx, vy), radius };
            let fraction = advance_wrapped(&mut p, 1.0 / 60.0, BOUNDS);
            proptest::prop_assert!(p.pos.x >= -radius - 1e-3 && p.pos.x <= BOUNDS.x + radius + 1e-3);
            proptest::prop_assert!(p.pos.y >= -radius - 1e-3 && p.pos.y <= BOUNDS.y + radius + 1e-3);
            proptest::prop_assert!((0.0..=1.0).contains(&fraction));
        }
    }
}
