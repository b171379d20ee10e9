//! Game state and deferred-action scheduling
//!
//! One `GameState` per session, reinitialized wholesale on reset. Everything
//! that must happen "later" (the next wave, the beat resume, the game-over
//! commit) is a `Deferred` entry owned by this state and decremented by the
//! tick, so superseding transitions cancel pending work by clearing the list
//! they own instead of racing detached callbacks.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::asteroid::{Asteroid, SizeTier};
use super::bullet::Bullet;
use super::ship::Ship;
use crate::consts::*;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Externally paused; no simulation mutation at all
    Paused,
    /// Fatal hit landed; input and ship collisions are off while the
    /// disintegration plays out
    GameOverPending,
    /// Run ended; any key restarts
    GameOver,
}

/// Things that happened during a tick, drained by the host for audio/UI cues
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    ShotFired,
    AsteroidDestroyed(SizeTier),
    ShipDestroyed,
    ExtraLife,
    WaveCleared,
    WaveSpawned { wave: u32 },
    BeatResumed,
    GameOverEntered,
    GameRestarted,
}

/// Delayed mutation, owned by the state that will apply it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeferredAction {
    SpawnWave,
    ResumeBeat,
    CommitGameOver,
}

#[derive(Debug, Clone)]
pub struct Deferred {
    pub action: DeferredAction,
    pub remaining: f32,
}

#[derive(Debug, Clone)]
pub struct GameState {
    pub seed: u64,
    pub bounds: Vec2,
    pub score: u32,
    /// Best score this session; survives `reset()`
    pub high_score: u32,
    pub lives: u32,
    pub wave: u32,
    pub phase: GamePhase,
    pub ship: Ship,
    pub bullets: Vec<Bullet>,
    pub asteroids: Vec<Asteroid>,
    /// Next score at which an extra life is due (threshold watermark)
    pub next_extra_life_score: u32,
    /// Destructible pieces in the current wave (a large lineage is 7 pieces)
    pub wave_pieces_total: u32,
    pub wave_pieces_destroyed: u32,
    pub events: Vec<GameEvent>,
    pub(crate) pending: Vec<Deferred>,
    pub(crate) rng: Pcg32,
}

impl GameState {
    /// Create a fresh session state and spawn the first wave
    pub fn new(seed: u64, bounds: Vec2) -> Self {
        let mut state = Self {
            seed,
            bounds,
            score: 0,
            high_score: 0,
            lives: STARTING_LIVES,
            wave: 1,
            phase: GamePhase::Playing,
            ship: Ship::new(bounds * 0.5),
            bullets: Vec::new(),
            asteroids: Vec::new(),
            next_extra_life_score: EXTRA_LIFE_SCORE,
            wave_pieces_total: 0,
            wave_pieces_destroyed: 0,
            events: Vec::new(),
            pending: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
        };
        state.spawn_wave();
        state
    }

    /// Reinitialize everything except the session high score. Rebuilding the
    /// state wholesale also drops every pending deferred action, which is the
    /// cancellation guarantee reset relies on.
    pub fn reset(&mut self) {
        let high_score = self.high_score;
        *self = Self::new(self.seed.wrapping_add(1), self.bounds);
        self.high_score = high_score;
        self.events.push(GameEvent::GameRestarted);
        log::info!("game reset (session best {high_score})");
    }

    /// Spawn `BASE_ASTEROIDS + wave` large asteroids on the perimeter
    pub fn spawn_wave(&mut self) {
        let count = BASE_ASTEROIDS + self.wave;
        self.asteroids = (0..count)
            .map(|_| Asteroid::spawn_on_perimeter(self.bounds, &mut self.rng))
            .collect();
        // Each large lineage breaks into 1 + 2 + 4 destructible pieces
        self.wave_pieces_total = count * 7;
        self.wave_pieces_destroyed = 0;
        self.events.push(GameEvent::WaveSpawned { wave: self.wave });
        log::info!("wave {} spawned with {count} asteroids", self.wave);
    }

    /// Fraction of the current wave destroyed so far, in [0, 1]. Drives the
    /// background beat tempo.
    pub fn wave_progress(&self) -> f32 {
        if self.wave_pieces_total == 0 {
            return 0.0;
        }
        (self.wave_pieces_destroyed as f32 / self.wave_pieces_total as f32).clamp(0.0, 1.0)
    }

    /// Award points, tracking the session best and extra-life thresholds.
    /// One jump across several thresholds awards several lives; the watermark
    /// makes each threshold pay out exactly once.
    pub fn add_score(&mut self, points: u32) {
        self.score += points;
        if self.score > self.high_score {
            self.high_score = self.score;
        }
        while self.score >= self.next_extra_life_score {
            self.lives += 1;
            self.next_extra_life_score += EXTRA_LIFE_SCORE;
            self.events.push(GameEvent::ExtraLife);
        }
    }

    pub fn schedule(&mut self, action: DeferredAction, delay: f32) {
        self.pending.push(Deferred {
            action,
            remaining: delay,
        });
    }

    pub fn has_pending(&self, action: DeferredAction) -> bool {
        self.pending.iter().any(|d| d.action == action)
    }

    /// Drop wave-progression work; the game-over commit (if any) survives.
    /// Called when a fatal hit preempts a scheduled wave.
    pub fn cancel_wave_actions(&mut self) {
        self.pending
            .retain(|d| d.action == DeferredAction::CommitGameOver);
    }

    /// Advance deferred actions and return those that came due, in order
    pub fn drain_due_actions(&mut self, dt: f32) -> Vec<DeferredAction> {
        for d in &mut self.pending {
            d.remaining -= dt;
        }
        let due: Vec<DeferredAction> = self
            .pending
            .iter()
            .filter(|d| d.remaining <= 0.0)
            .map(|d| d.action)
            .collect();
        self.pending.retain(|d| d.remaining > 0.0);
        due
    }

    /// Hand the accumulated events to the host (audio cues, HUD flashes)
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds() -> Vec2 {
        Vec2::new(DEFAULT_WIDTH, DEFAULT_HEIGHT)
    }

    #[test]
    fn test_new_session_spawns_first_wave() {
        let state = GameState::new(1, bounds());
        assert_eq!(state.wave, 1);
        assert_eq!(state.asteroids.len(), 4); // BASE_ASTEROIDS + 1
        assert_eq!(state.lives, STARTING_LIVES);
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(state.asteroids.iter().all(|a| a.tier == SizeTier::Large));
    }

    #[test]
    fn test_wave_count_formula() {
        for wave in 1..6 {
            let mut state = GameState::new(wave as u64, bounds());
            state.wave = wave;
            state.spawn_wave();
            assert_eq!(state.asteroids.len(), (BASE_ASTEROIDS + wave) as usize);
        }
    }

    #[test]
    fn test_extra_life_single_threshold() {
        let mut state = GameState::new(2, bounds());
        state.add_score(EXTRA_LIFE_SCORE);
        assert_eq!(state.lives, STARTING_LIVES + 1);
        assert_eq!(state.next_extra_life_score, EXTRA_LIFE_SCORE * 2);
        // Crossing the same threshold again must not pay twice
        state.add_score(1);
        assert_eq!(state.lives, STARTING_LIVES + 1);
    }

    #[test]
    fn test_extra_life_multiple_thresholds_in_one_jump() {
        let mut state = GameState::new(3, bounds());
        state.add_score(9_000);
        assert_eq!(state.lives, STARTING_LIVES);
        // 9000 -> 21000 crosses 10000 and 20000
        state.add_score(12_000);
        assert_eq!(state.lives, STARTING_LIVES + 2);
        assert_eq!(state.next_extra_life_score, 30_000);
    }

    #[test]
    fn test_high_score_survives_reset() {
        let mut state = GameState::new(4, bounds());
        state.add_score(1_234);
        state.reset();
        assert_eq!(state.score, 0);
        assert_eq!(state.high_score, 1_234);
        assert_eq!(state.wave, 1);
        assert_eq!(state.lives, STARTING_LIVES);
        assert!(state.pending.is_empty());
    }

    #[test]
    fn test_deferred_actions_fire_in_order_after_delay() {
        let mut state = GameState::new(5, bounds());
        state.schedule(DeferredAction::SpawnWave, 0.05);
        state.schedule(DeferredAction::ResumeBeat, 0.02);
        assert!(state.drain_due_actions(0.01).is_empty());
        assert_eq!(
            state.drain_due_actions(0.015),
            vec![DeferredAction::ResumeBeat]
        );
        assert_eq!(
            state.drain_due_actions(0.03),
            vec![DeferredAction::SpawnWave]
        );
        assert!(state.pending.is_empty());
    }

    #[test]
    fn test_cancel_wave_actions_keeps_game_over() {
        let mut state = GameState::new(6, bounds());
        state.schedule(DeferredAction::SpawnWave, 1.0);
        state.schedule(DeferredAction::ResumeBeat, 1.5);
        state.schedule(DeferredAction::CommitGameOver, 3.0);
        state.cancel_wave_actions();
        assert!(!state.has_pending(DeferredAction::SpawnWave));
        assert!(!state.has_pending(DeferredAction::ResumeBeat));
        assert!(state.has_pending(DeferredAction::CommitGameOver));
    }

    #[test]
    fn test_wave_progress() {
        let mut state = GameState::new(7, bounds());
        assert_eq!(state.wave_progress(), 0.0);
        state.wave_pieces_destroyed = state.wave_pieces_total / 2;
        assert!((state.wave_progress() - 0.5).abs() < 0.02);
        state.wave_pieces_destroyed = state.wave_pieces_total;
        assert_eq!(state.wave_progress(), 1.0);
    }
}
