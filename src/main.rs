//! Vectoroids entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::HtmlCanvasElement;

    use vectoroids::audio::{AudioManager, SoundKey};
    use vectoroids::consts::*;
    use vectoroids::renderer::CanvasRenderer;
    use vectoroids::sim::{GameEvent, GamePhase, GameState, InputState, SizeTier, tick};
    use vectoroids::{HighScores, Settings};

    /// Game instance holding all state
    struct Game {
        state: GameState,
        renderer: Option<CanvasRenderer>,
        audio: AudioManager,
        input: InputState,
        accumulator: f32,
        last_time: f64,
        settings: Settings,
        highscores: HighScores,
        // Track phase transitions for overlay/audio edges
        last_phase: GamePhase,
    }

    impl Game {
        fn new(seed: u64, bounds: glam::Vec2) -> Self {
            let settings = Settings::load();
            let mut audio = AudioManager::new();
            audio.set_master_volume(settings.master_volume);
            audio.set_sfx_volume(settings.sfx_volume);
            audio.set_muted(settings.muted);
            Self {
                state: GameState::new(seed, bounds),
                renderer: None,
                audio,
                input: InputState::default(),
                accumulator: 0.0,
                last_time: 0.0,
                settings,
                highscores: HighScores::load(),
                last_phase: GamePhase::Playing,
            }
        }

        /// Run simulation ticks at a fixed timestep
        fn update(&mut self, dt: f32, now_ms: f64) {
            let dt = dt.min(0.1);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                let input = self.input.clone();
                tick(&mut self.state, &input, SIM_DT);
                self.accumulator -= SIM_DT;
                substeps += 1;

                // Clear one-shot inputs after processing
                self.input.pause = false;
                self.input.any_key = false;
            }

            self.dispatch_events(now_ms);
            self.handle_phase_edges(now_ms);

            let thrust_active = self.input.up
                && self.state.phase == GamePhase::Playing
                && self.state.ship.is_flying();
            self.audio
                .update(now_ms, self.state.wave_progress(), thrust_active);
        }

        /// Map drained simulation events onto audio cues
        fn dispatch_events(&mut self, now_ms: f64) {
            for event in self.state.drain_events() {
                match event {
                    GameEvent::ShotFired => self.audio.play(SoundKey::Fire),
                    GameEvent::AsteroidDestroyed(tier) => self.audio.play(match tier {
                        SizeTier::Large => SoundKey::BangLarge,
                        SizeTier::Medium => SoundKey::BangMedium,
                        SizeTier::Small => SoundKey::BangSmall,
                    }),
                    GameEvent::ShipDestroyed => self.audio.play(SoundKey::BangLarge),
                    GameEvent::ExtraLife => self.audio.play(SoundKey::ExtraLife),
                    GameEvent::WaveCleared => {
                        self.audio.stop_beat();
                        self.audio.play(SoundKey::WaveClear);
                    }
                    GameEvent::WaveSpawned { .. } => {}
                    GameEvent::BeatResumed => self.audio.start_beat(now_ms),
                    GameEvent::GameOverEntered => {
                        self.audio.stop_beat();
                        self.audio.play(SoundKey::GameOver);
                        self.record_finished_run();
                    }
                    GameEvent::GameRestarted => self.audio.start_beat(now_ms),
                }
            }
        }

        /// Pause transitions come from the phase itself, not an event
        fn handle_phase_edges(&mut self, now_ms: f64) {
            let phase = self.state.phase;
            if phase != self.last_phase {
                match phase {
                    GamePhase::Paused => self.audio.stop_beat(),
                    GamePhase::Playing if self.last_phase == GamePhase::Paused => {
                        self.audio.start_beat(now_ms)
                    }
                    _ => {}
                }
                self.last_phase = phase;
            }
        }

        fn record_finished_run(&mut self) {
            let score = self.state.score;
            let wave = self.state.wave;
            if let Some(rank) = self.highscores.add_score(score, wave, js_sys::Date::now()) {
                log::info!("run ended at rank {rank} ({score} points, wave {wave})");
                self.highscores.save();
            }
        }

        /// Render the current frame
        fn render(&mut self, time_ms: f64) {
            let thrust_active = self.input.up
                && self.state.phase == GamePhase::Playing
                && self.state.ship.is_flying();
            if let Some(renderer) = &self.renderer {
                renderer.render(&self.state, time_ms, thrust_active);
            }
        }

        /// Update HUD elements in the DOM
        fn update_hud(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };

            let fields = [
                ("hud-score", self.state.score.to_string()),
                ("hud-highscore", self.state.high_score.to_string()),
                ("hud-lives", self.state.lives.to_string()),
                ("hud-wave", self.state.wave.to_string()),
            ];
            for (id, value) in fields {
                if let Some(el) = document
                    .query_selector(&format!("#{id} .hud-value"))
                    .ok()
                    .flatten()
                {
                    el.set_text_content(Some(&value));
                }
            }

            // Game-over overlay, fed by the final score
            if let Some(el) = document.get_element_by_id("game-over") {
                if self.state.phase == GamePhase::GameOver {
                    let _ = el.set_attribute("class", "");
                    if let Some(score_el) = document.get_element_by_id("final-score") {
                        score_el.set_text_content(Some(&self.state.score.to_string()));
                    }
                } else {
                    let _ = el.set_attribute("class", "hidden");
                }
            }
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Vectoroids starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        let dpr = window.device_pixel_ratio();
        let client_w = canvas.client_width();
        let client_h = canvas.client_height();
        let width = (client_w as f64 * dpr) as u32;
        let height = (client_h as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let seed = js_sys::Date::now() as u64;
        let bounds = glam::Vec2::new(width as f32, height as f32);
        let game = Rc::new(RefCell::new(Game::new(seed, bounds)));
        log::info!("Game initialized with seed: {}", seed);

        match CanvasRenderer::new(&canvas) {
            Ok(renderer) => game.borrow_mut().renderer = Some(renderer),
            Err(e) => log::error!("Failed to create renderer: {:?}", e),
        }

        // First beat fires on the first frame
        game.borrow_mut().audio.start_beat(0.0);

        setup_input_handlers(game.clone());
        setup_auto_pause(game.clone());

        request_animation_frame(game);

        log::info!("Vectoroids running!");
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();

        // Keydown: level-triggered movement keys plus one-shot signals
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                let mut g = game.borrow_mut();
                // Browsers keep audio suspended until a user gesture
                g.audio.resume();
                match event.key().as_str() {
                    "ArrowLeft" | "a" | "A" => g.input.left = true,
                    "ArrowRight" | "d" | "D" => g.input.right = true,
                    "ArrowUp" | "w" | "W" => g.input.up = true,
                    " " => {
                        g.input.fire = true;
                        event.prevent_default();
                    }
                    "Escape" | "p" | "P" => g.input.pause = true,
                    _ => {}
                }
                g.input.any_key = true;
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyup: release level-triggered keys
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    "ArrowLeft" | "a" | "A" => g.input.left = false,
                    "ArrowRight" | "d" | "D" => g.input.right = false,
                    "ArrowUp" | "w" | "W" => g.input.up = false,
                    " " => g.input.fire = false,
                    _ => {}
                }
            });
            let _ =
                window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_auto_pause(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();

        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    let mut g = game.borrow_mut();
                    if g.state.phase == GamePhase::Playing {
                        g.input.pause = true;
                        log::info!("Auto-paused (tab hidden)");
                    }
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Window blur (click outside)
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                if g.state.phase == GamePhase::Playing {
                    g.input.pause = true;
                }
                if g.settings.mute_on_blur {
                    g.audio.set_muted(true);
                }
            });
            let _ =
                window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Restore the configured mute state on focus
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                let muted = g.settings.muted;
                g.audio.set_muted(muted);
            });
            let window = web_sys::window().unwrap();
            let _ =
                window.add_event_listener_with_callback("focus", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();

            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            g.update(dt, time);
            g.render(time);
            g.update_hud();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use vectoroids::consts::*;
    use vectoroids::sim::{GameState, InputState, tick};

    env_logger::init();
    log::info!("Vectoroids (native) starting...");
    log::info!("Native mode is headless - run with `trunk serve` for the web version");

    // Headless smoke run of the simulation
    let bounds = glam::Vec2::new(DEFAULT_WIDTH, DEFAULT_HEIGHT);
    let mut state = GameState::new(0xA57E, bounds);
    let input = InputState {
        up: true,
        left: true,
        fire: true,
        ..Default::default()
    };
    for _ in 0..600 {
        tick(&mut state, &input, SIM_DT);
    }
    println!(
        "10s headless run: score {}, wave {}, {} asteroids live",
        state.score,
        state.wave,
        state.asteroids.len()
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
