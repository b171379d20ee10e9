//! Vectoroids - a vector-graphics Asteroids clone
//!
//! Core modules:
//! - `sim`: Deterministic simulation (kinematics, collisions, game state)
//! - `audio`: Procedural Web Audio with pooled voices and the background beat
//! - `renderer`: Canvas 2D vector draw pass
//! - `settings`: User preferences
//! - `highscores`: Persistent leaderboard

pub mod audio;
pub mod highscores;
#[cfg(target_arch = "wasm32")]
pub mod renderer;
pub mod settings;
pub mod sim;

pub use highscores::HighScores;
pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz - the per-tick damping constants
    /// below assume this rate)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 5;

    /// Fallback world size when the canvas size is unknown (tests, native)
    pub const DEFAULT_WIDTH: f32 = 800.0;
    pub const DEFAULT_HEIGHT: f32 = 600.0;

    // Ship
    pub const SHIP_RADIUS: f32 = 14.0;
    pub const ROTATION_SPEED: f32 = 4.0; // radians/sec
    pub const THRUST_POWER: f32 = 320.0; // pixels/sec^2 along heading
    pub const FRICTION: f32 = 0.99; // per-tick velocity multiplier
    pub const MAX_SPEED: f32 = 420.0;
    pub const SHOOT_DELAY: f32 = 0.2; // seconds between shots
    pub const INVULNERABILITY_TIME: f32 = 2.0;
    pub const DISINTEGRATION_TIME: f32 = 2.0;
    pub const RESPAWN_DELAY: f32 = 2.0;
    pub const FRAGMENT_DAMPING: f32 = 0.98; // per-tick, velocity and spin

    // Bullets
    pub const BULLET_SPEED: f32 = 520.0;
    pub const BULLET_RADIUS: f32 = 2.0;
    /// Max travel as a fraction of min(width, height) - guarantees a bullet
    /// can never complete a full lap
    pub const BULLET_MAX_DISTANCE: f32 = 0.95;

    // Asteroids
    pub const ASTEROID_VERTEX_COUNT: usize = 8;
    pub const ASTEROID_JITTER: f32 = 0.3; // per-vertex radius jitter
    pub const ASTEROID_MIN_SPEED: f32 = 50.0;
    pub const ASTEROID_MAX_SPEED: f32 = 100.0;
    pub const SPLIT_SPEED_FACTOR: f32 = 1.5;
    /// Children deflect from the parent heading by at most this much
    pub const SPLIT_MAX_DEFLECTION: f32 = std::f32::consts::FRAC_PI_4;
    /// Wave n spawns BASE_ASTEROIDS + n large asteroids
    pub const BASE_ASTEROIDS: u32 = 3;
    /// Perimeter spawns aim at the center, deflected by at most this much
    pub const SPAWN_AIM_SPREAD: f32 = std::f32::consts::FRAC_PI_4;

    // Game flow
    pub const STARTING_LIVES: u32 = 3;
    pub const EXTRA_LIFE_SCORE: u32 = 10_000;
    pub const SCORE_LARGE: u32 = 20;
    pub const SCORE_MEDIUM: u32 = 50;
    pub const SCORE_SMALL: u32 = 100;
    /// Delay between the fatal hit and the game-over overlay
    pub const GAME_OVER_DELAY: f32 = 3.0;
    /// Delay between clearing a wave and the next wave spawning
    pub const WAVE_DELAY: f32 = 3.0;
    /// Further delay before the background beat resumes after a spawn
    pub const BEAT_RESUME_DELAY: f32 = 0.5;

    // Audio pacing (milliseconds)
    pub const BEAT_BASE_INTERVAL_MS: f64 = 1000.0;
    pub const BEAT_MIN_INTERVAL_MS: f64 = 250.0;
    pub const THRUST_LOOP_INTERVAL_MS: f64 = 100.0;
}

/// Unit vector for a heading angle (radians)
#[inline]
pub fn heading(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

/// Rotate a vector by an angle (radians)
#[inline]
pub fn rotate(v: Vec2, angle: f32) -> Vec2 {
    Vec2::from_angle(angle).rotate(v)
}
