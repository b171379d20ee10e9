//! The player ship
//!
//! Lifecycle is a three-state machine: normal flight, disintegration (the
//! hull breaks into drifting line fragments), and hidden while awaiting
//! respawn. Exactly one state holds at a time; the embedded timers die with
//! their state, so a reset can never leave a stale countdown behind.

use glam::Vec2;
use rand::Rng;

use super::bullet::Bullet;
use super::kinematics::{self, Kinematic};
use super::tick::InputState;
use crate::consts::*;
use crate::{heading, rotate};

#[derive(Debug, Clone, PartialEq)]
pub enum ShipPhase {
    /// Responding to input; invulnerable right after (re)spawn
    Flying {
        invulnerable_for: f32,
        shoot_cooldown: f32,
    },
    /// Hull fragments drifting apart; `respawn` is false on the fatal hit
    Disintegrating { elapsed: f32, respawn: bool },
    /// Invisible; `respawn_in` is None on the fatal hit, where the
    /// orchestrator owns the terminal transition instead
    Hidden { respawn_in: Option<f32> },
}

/// One disintegration piece: a local-space polyline drifting and spinning
/// around its own anchor. Purely visual, owned by the ship.
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    pub pos: Vec2,
    pub points: [Vec2; 2],
    pub vel: Vec2,
    pub spin: f32,
    pub angle: f32,
}

#[derive(Debug, Clone)]
pub struct Ship {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Heading in radians; 0 points along +x
    pub angle: f32,
    pub phase: ShipPhase,
    pub fragments: Vec<Fragment>,
}

impl Ship {
    /// Created once per session, repositioned (not recreated) afterwards
    pub fn new(center: Vec2) -> Self {
        Self {
            pos: center,
            vel: Vec2::ZERO,
            angle: -std::f32::consts::FRAC_PI_2, // facing up
            phase: ShipPhase::Flying {
                invulnerable_for: INVULNERABILITY_TIME,
                shoot_cooldown: 0.0,
            },
            fragments: Vec::new(),
        }
    }

    /// Hull outline in local space (heading along +x), closed by the renderer
    pub fn silhouette() -> [Vec2; 3] {
        [
            Vec2::new(SHIP_RADIUS, 0.0),
            Vec2::new(-0.7 * SHIP_RADIUS, -0.7 * SHIP_RADIUS),
            Vec2::new(-0.7 * SHIP_RADIUS, 0.7 * SHIP_RADIUS),
        ]
    }

    pub fn is_flying(&self) -> bool {
        matches!(self.phase, ShipPhase::Flying { .. })
    }

    /// Hidden ships draw nothing; disintegrating ships draw their fragments
    pub fn is_visible(&self) -> bool {
        !matches!(self.phase, ShipPhase::Hidden { .. })
    }

    pub fn is_vulnerable(&self) -> bool {
        matches!(
            self.phase,
            ShipPhase::Flying {
                invulnerable_for, ..
            } if invulnerable_for <= 0.0
        )
    }

    pub fn invulnerable_remaining(&self) -> f32 {
        match self.phase {
            ShipPhase::Flying {
                invulnerable_for, ..
            } => invulnerable_for.max(0.0),
            _ => 0.0,
        }
    }

    /// Every reset to center grants a fresh invulnerability window
    pub fn reset_to_center(&mut self, center: Vec2) {
        self.pos = center;
        self.vel = Vec2::ZERO;
        self.angle = -std::f32::consts::FRAC_PI_2;
        self.fragments.clear();
        self.phase = ShipPhase::Flying {
            invulnerable_for: INVULNERABILITY_TIME,
            shoot_cooldown: 0.0,
        };
    }

    pub fn update(&mut self, input: &InputState, dt: f32, bounds: Vec2) {
        match &mut self.phase {
            ShipPhase::Flying {
                invulnerable_for,
                shoot_cooldown,
            } => {
                *invulnerable_for = (*invulnerable_for - dt).max(0.0);
                *shoot_cooldown -= dt;

                let steer = (input.right as i8 - input.left as i8) as f32;
                self.angle += steer * ROTATION_SPEED * dt;

                if input.up {
                    self.vel += heading(self.angle) * THRUST_POWER * dt;
                }
                self.vel *= FRICTION;
                let speed = self.vel.length();
                if speed > MAX_SPEED {
                    self.vel = self.vel / speed * MAX_SPEED;
                }

                kinematics::advance_wrapped(self, dt, bounds);
            }
            ShipPhase::Disintegrating { elapsed, respawn } => {
                *elapsed += dt;
                let done = *elapsed >= DISINTEGRATION_TIME;
                let respawn = *respawn;
                for f in &mut self.fragments {
                    f.pos += f.vel * dt;
                    f.angle += f.spin * dt;
                    f.vel *= FRAGMENT_DAMPING;
                    f.spin *= FRAGMENT_DAMPING;
                }
                if done {
                    self.fragments.clear();
                    self.phase = ShipPhase::Hidden {
                        respawn_in: respawn.then_some(RESPAWN_DELAY),
                    };
                }
            }
            ShipPhase::Hidden { respawn_in } => {
                if let Some(t) = respawn_in {
                    *t -= dt;
                    if *t <= 0.0 {
                        self.reset_to_center(bounds * 0.5);
                    }
                }
            }
        }
    }

    /// Spawn a bullet at the nose if flying and off cooldown. Disintegrating
    /// or hidden ships never shoot.
    pub fn try_shoot(&mut self) -> Option<Bullet> {
        let ShipPhase::Flying { shoot_cooldown, .. } = &mut self.phase else {
            return None;
        };
        if *shoot_cooldown > 0.0 {
            return None;
        }
        *shoot_cooldown = SHOOT_DELAY;
        let dir = heading(self.angle);
        Some(Bullet::new(self.pos + dir * SHIP_RADIUS, dir * BULLET_SPEED))
    }

    /// Freeze the hull and break it into three drifting edge fragments.
    /// `respawn` is false on the fatal (last-life) hit.
    pub fn begin_disintegration(&mut self, respawn: bool, rng: &mut impl Rng) {
        self.vel = Vec2::ZERO;
        let outline = Self::silhouette();
        self.fragments = (0..3)
            .map(|i| {
                let a = rotate(outline[i], self.angle);
                let b = rotate(outline[(i + 1) % 3], self.angle);
                let mid = (a + b) * 0.5;
                let drift = mid.normalize_or_zero() * rng.random_range(20.0..60.0)
                    + Vec2::new(rng.random_range(-15.0..15.0), rng.random_range(-15.0..15.0));
                Fragment {
                    pos: self.pos + mid,
                    points: [a - mid, b - mid],
                    vel: drift,
                    spin: rng.random_range(-4.0..4.0),
                    angle: 0.0,
                }
            })
            .collect();
        self.phase = ShipPhase::Disintegrating {
            elapsed: 0.0,
            respawn,
        };
    }
}

impl Kinematic for Ship {
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
        SHIP_RADIUS
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    const BOUNDS: Vec2 = Vec2::new(800.0, 600.0);

    fn flying_ship() -> Ship {
        let mut ship = Ship::new(BOUNDS * 0.5);
        ship.phase = ShipPhase::Flying {
            invulnerable_for: 0.0,
            shoot_cooldown: 0.0,
        };
        ship
    }

    #[test]
    fn test_thrust_accelerates_along_heading() {
        let mut ship = flying_ship();
        ship.angle = 0.0;
        let input = InputState {
            up: true,
            ..Default::default()
        };
        ship.update(&input, SIM_DT, BOUNDS);
        assert!(ship.vel.x > 0.0);
        assert!(ship.vel.y.abs() < 1e-4);
    }

    #[test]
    fn test_speed_clamped() {
        let mut ship = flying_ship();
        ship.vel = Vec2::new(10_000.0, 0.0);
        ship.update(&InputState::default(), SIM_DT, BOUNDS);
        assert!(ship.vel.length() <= MAX_SPEED + 1e-3);
    }

    #[test]
    fn test_cooldown_gates_shots() {
        let mut ship = flying_ship();
        assert!(ship.try_shoot().is_some());
        // Cooldown just reset; no bullet until it drains
        assert!(ship.try_shoot().is_none());
        let mut last = SHOOT_DELAY;
        let mut ticks = 0;
        loop {
            ship.update(&InputState::default(), SIM_DT, BOUNDS);
            let ShipPhase::Flying { shoot_cooldown, .. } = ship.phase else {
                unreachable!()
            };
            assert!(shoot_cooldown <= last, "cooldown must not increase");
            last = shoot_cooldown;
            if shoot_cooldown <= 0.0 {
                break;
            }
            ticks += 1;
            assert!(ticks < 1000);
        }
        assert!(ship.try_shoot().is_some());
    }

    #[test]
    fn test_bullet_spawns_at_nose() {
        let mut ship = flying_ship();
        ship.angle = 0.0;
        let bullet = ship.try_shoot().unwrap();
        assert!((bullet.pos - (ship.pos + Vec2::new(SHIP_RADIUS, 0.0))).length() < 1e-4);
        assert!((bullet.vel - Vec2::new(BULLET_SPEED, 0.0)).length() < 1e-4);
    }

    #[test]
    fn test_no_shot_while_disintegrating_or_hidden() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut ship = flying_ship();
        ship.begin_disintegration(true, &mut rng);
        assert!(ship.try_shoot().is_none());
        ship.phase = ShipPhase::Hidden { respawn_in: None };
        assert!(ship.try_shoot().is_none());
    }

    #[test]
    fn test_disintegration_runs_to_respawn() {
        let mut rng = Pcg32::seed_from_u64(2);
        let mut ship = flying_ship();
        ship.pos = Vec2::new(100.0, 100.0);
        ship.begin_disintegration(true, &mut rng);
        assert_eq!(ship.fragments.len(), 3);
        assert_eq!(ship.vel, Vec2::ZERO);

        // Disintegration animation plays out
        let ticks = (DISINTEGRATION_TIME / SIM_DT).ceil() as u32 + 1;
        for _ in 0..ticks {
            ship.update(&InputState::default(), SIM_DT, BOUNDS);
        }
        assert!(matches!(ship.phase, ShipPhase::Hidden { respawn_in: Some(_) }));
        assert!(ship.fragments.is_empty());

        // Respawn delay elapses; ship comes back at center, invulnerable
        let ticks = (RESPAWN_DELAY / SIM_DT).ceil() as u32 + 1;
        for _ in 0..ticks {
            ship.update(&InputState::default(), SIM_DT, BOUNDS);
        }
        assert!(ship.is_flying());
        assert!(!ship.is_vulnerable());
        assert_eq!(ship.pos, BOUNDS * 0.5);
    }

    #[test]
    fn test_fatal_hit_never_respawns() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut ship = flying_ship();
        ship.begin_disintegration(false, &mut rng);
        let ticks = ((DISINTEGRATION_TIME + RESPAWN_DELAY) / SIM_DT).ceil() as u32 + 10;
        for _ in 0..ticks {
            ship.update(&InputState::default(), SIM_DT, BOUNDS);
        }
        assert_eq!(ship.phase, ShipPhase::Hidden { respawn_in: None });
        assert!(!ship.is_visible());
    }

    #[test]
    fn test_invulnerability_expires() {
        let mut ship = Ship::new(BOUNDS * 0.5);
        assert!(!ship.is_vulnerable());
        let ticks = (INVULNERABILITY_TIME / SIM_DT).ceil() as u32 + 1;
        for _ in 0..ticks {
            ship.update(&InputState::default(), SIM_DT, BOUNDS);
        }
        assert!(ship.is_vulnerable());
    }
}
