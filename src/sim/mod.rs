//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - No rendering or platform dependencies
//!
//! Deferred work (wave spawns, the game-over commit, the beat resume) is held
//! as scheduler entries inside `GameState`, never as free-floating callbacks,
//! so a `reset()` cancels everything in one place.

pub mod asteroid;
pub mod bullet;
pub mod collision;
pub mod kinematics;
pub mod ship;
pub mod state;
pub mod tick;

pub use asteroid::{Asteroid, SizeTier};
pub use bullet::Bullet;
pub use collision::circles_overlap;
pub use kinematics::Kinematic;
pub use ship::{Fragment, Ship, ShipPhase};
pub use state::{GameEvent, GamePhase, GameState};
pub use tick::{InputState, tick};
