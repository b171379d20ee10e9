//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically: ship, bullets,
//! asteroids, collision resolution, wave progression and the deferred-action
//! scheduler, in that order.

use super::collision::circles_overlap;
use super::state::{DeferredAction, GameEvent, GamePhase, GameState};
use crate::consts::*;

/// Polled input snapshot for a single tick.
///
/// `left`/`right`/`up`/`fire` are level-triggered key states; `pause` and
/// `any_key` are one-shot signals the host clears after each processed tick.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub fire: bool,
    /// Pause toggle
    pub pause: bool,
    /// Any key went down this frame; restarts from game over
    pub any_key: bool,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &InputState, dt: f32) {
    if input.pause {
        match state.phase {
            GamePhase::Playing => {
                state.phase = GamePhase::Paused;
                return;
            }
            GamePhase::Paused => state.phase = GamePhase::Playing,
            _ => {}
        }
    }

    match state.phase {
        GamePhase::Paused => return,
        GamePhase::GameOver => {
            if input.any_key {
                state.reset();
            }
            return;
        }
        _ => {}
    }

    // Deferred actions first, so a due wave exists before entities advance
    for action in state.drain_due_actions(dt) {
        match action {
            DeferredAction::SpawnWave => {
                state.spawn_wave();
                state.schedule(DeferredAction::ResumeBeat, BEAT_RESUME_DELAY);
            }
            DeferredAction::ResumeBeat => state.events.push(GameEvent::BeatResumed),
            DeferredAction::CommitGameOver => {
                state.phase = GamePhase::GameOver;
                state.events.push(GameEvent::GameOverEntered);
                log::info!("game over at score {}", state.score);
            }
        }
    }
    if state.phase == GamePhase::GameOver {
        return;
    }

    let playing = state.phase == GamePhase::Playing;
    let bounds = state.bounds;

    // Once the game-over transition is pending the ship ignores input but
    // its disintegration still animates
    let neutral = InputState::default();
    let ship_input = if playing { input } else { &neutral };
    state.ship.update(ship_input, dt, bounds);
    if playing && input.fire {
        if let Some(bullet) = state.ship.try_shoot() {
            state.bullets.push(bullet);
            state.events.push(GameEvent::ShotFired);
        }
    }

    state.bullets.retain(|b| !b.dead);
    for bullet in &mut state.bullets {
        bullet.update(dt, bounds);
    }

    for asteroid in &mut state.asteroids {
        asteroid.update(dt, bounds);
    }

    resolve_collisions(state, playing);

    // Wave clear: the next wave is deferred, and skipped entirely if a fatal
    // hit moved the phase on
    if state.phase == GamePhase::Playing
        && state.asteroids.is_empty()
        && !state.has_pending(DeferredAction::SpawnWave)
    {
        state.wave += 1;
        state.events.push(GameEvent::WaveCleared);
        state.schedule(DeferredAction::SpawnWave, WAVE_DELAY);
        log::info!("wave cleared; wave {} inbound", state.wave);
    }
}

/// Pairwise overlap scan with a destroy-set applied afterwards, so nothing is
/// matched twice within a tick and indices never go stale mid-scan.
fn resolve_collisions(state: &mut GameState, allow_ship_hits: bool) {
    let mut destroyed: Vec<usize> = Vec::new();

    // Bullets: first hit wins, at most one asteroid per bullet per tick
    for bullet in &mut state.bullets {
        if bullet.dead {
            continue;
        }
        for (i, asteroid) in state.asteroids.iter().enumerate() {
            if destroyed.contains(&i) {
                continue;
            }
            if circles_overlap(
                bullet.pos,
                BULLET_RADIUS,
                asteroid.pos,
                asteroid.tier.radius(),
            ) {
                bullet.dead = true;
                destroyed.push(i);
                break;
            }
        }
    }

    // Ship: at most one hit per tick; the fresh invulnerability window after
    // respawn debounces lingering overlap
    let mut ship_hit = false;
    if allow_ship_hits && state.ship.is_vulnerable() {
        for (i, asteroid) in state.asteroids.iter().enumerate() {
            if destroyed.contains(&i) {
                continue;
            }
            if circles_overlap(
                state.ship.pos,
                SHIP_RADIUS,
                asteroid.pos,
                asteroid.tier.radius(),
            ) {
                destroyed.push(i);
                ship_hit = true;
                break;
            }
        }
    }

    // Apply the destroy-set: score by the tier the asteroid had before
    // splitting, regardless of what destroyed it
    destroyed.sort_unstable_by(|a, b| b.cmp(a));
    let mut children = Vec::new();
    for i in destroyed {
        let asteroid = state.asteroids.remove(i);
        state.add_score(asteroid.tier.points());
        state.wave_pieces_destroyed += 1;
        state.events.push(GameEvent::AsteroidDestroyed(asteroid.tier));
        children.extend(asteroid.split(&mut state.rng));
    }
    state.asteroids.extend(children);

    if ship_hit {
        state.lives = state.lives.saturating_sub(1);
        state.events.push(GameEvent::ShipDestroyed);
        let fatal = state.lives == 0;
        state.ship.begin_disintegration(!fatal, &mut state.rng);
        if fatal {
            state.phase = GamePhase::GameOverPending;
            state.cancel_wave_actions();
            state.schedule(DeferredAction::CommitGameOver, GAME_OVER_DELAY);
            log::info!("fatal hit");
        }
    }
}
