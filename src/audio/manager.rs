//! Audio manager backed by the Web Audio API
//!
//! Oscillators are one-shot in Web Audio, so each trigger builds a fresh
//! source; the voice pool tracks slot lifetimes and tells us when an
//! in-flight source must be stopped to make room. If the `AudioContext`
//! cannot be created at all, every call degrades to a silent no-op and
//! gameplay never notices.

use web_sys::{AudioContext, AudioContextState, GainNode, OscillatorNode, OscillatorType};

use super::{BeatClock, BeatTone, LoopClock, SoundKey, VoicePool};
use crate::consts::*;

pub struct AudioManager {
    ctx: Option<AudioContext>,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
    /// One pool per sound key, indexed by `SoundKey::index()`
    pools: Vec<VoicePool>,
    /// Primary oscillator per pool slot, kept so a reclaimed voice can be
    /// force-stopped before its slot is reused
    sources: Vec<Vec<Option<OscillatorNode>>>,
    beat: BeatClock,
    thrust: LoopClock,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioManager {
    pub fn new() -> Self {
        // May fail outside a secure context; the game plays on in silence
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        let pools: Vec<VoicePool> = SoundKey::ALL
            .iter()
            .map(|k| VoicePool::new(k.pool_size()))
            .collect();
        let sources = SoundKey::ALL
            .iter()
            .map(|k| vec![None; k.pool_size()])
            .collect();
        Self {
            ctx,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
            pools,
            sources,
            beat: BeatClock::new(BEAT_BASE_INTERVAL_MS, BEAT_MIN_INTERVAL_MS),
            thrust: LoopClock::new(THRUST_LOOP_INTERVAL_MS),
        }
    }

    /// Resume audio context (required after user gesture)
    pub fn resume(&self) {
        if let Some(ctx) = &self.ctx {
            let _ = ctx.resume();
        }
    }

    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Drive the beat and thrust clocks; called once per frame
    pub fn update(&mut self, now_ms: f64, wave_progress: f32, thrust_active: bool) {
        self.thrust.set_active(now_ms, thrust_active);
        if self.thrust.poll(now_ms) {
            self.play(SoundKey::Thrust);
        }
        if let Some(tone) = self.beat.poll(now_ms, wave_progress) {
            self.play(match tone {
                BeatTone::Low => SoundKey::BeatLow,
                BeatTone::High => SoundKey::BeatHigh,
            });
        }
    }

    pub fn start_beat(&mut self, now_ms: f64) {
        self.beat.start(now_ms);
    }

    pub fn stop_beat(&mut self) {
        self.beat.stop();
    }

    /// Trigger a sound effect through its voice pool
    pub fn play(&mut self, key: SoundKey) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }
        let Some(ctx) = self.ctx.clone() else { return };

        // Browsers suspend audio until a user gesture
        if ctx.state() == AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        let idx = key.index();
        let alloc = self.pools[idx].acquire(ctx.current_time(), key.duration());
        if alloc.reclaimed {
            // Tear down the sacrificed voice's source before reuse
            if let Some(osc) = self.sources[idx][alloc.slot].take() {
                let _ = osc.stop();
            }
        }

        let source = match key {
            SoundKey::Fire => self.play_fire(&ctx, vol),
            SoundKey::BangLarge => self.play_bang_large(&ctx, vol),
            SoundKey::BangMedium => self.play_bang_medium(&ctx, vol),
            SoundKey::BangSmall => self.play_bang_small(&ctx, vol),
            SoundKey::Thrust => self.play_thrust(&ctx, vol),
            SoundKey::BeatLow => self.play_beat(&ctx, vol, 55.0),
            SoundKey::BeatHigh => self.play_beat(&ctx, vol, 62.0),
            SoundKey::ExtraLife => self.play_extra_life(&ctx, vol),
            SoundKey::WaveClear => self.play_wave_clear(&ctx, vol),
            SoundKey::GameOver => self.play_game_over(&ctx, vol),
        };
        self.sources[idx][alloc.slot] = source;
    }

    // === Sound generators ===

    /// Create an oscillator with gain envelope
    fn create_osc(
        &self,
        ctx: &AudioContext,
        freq: f32,
        osc_type: OscillatorType,
    ) -> Option<(OscillatorNode, GainNode)> {
        let osc = ctx.create_oscillator().ok()?;
        let gain = ctx.create_gain().ok()?;

        osc.set_type(osc_type);
        osc.frequency().set_value(freq);
        osc.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&ctx.destination()).ok()?;

        Some((osc, gain))
    }

    /// Laser zap - fast downward sweep
    fn play_fire(&self, ctx: &AudioContext, vol: f32) -> Option<OscillatorNode> {
        let (osc, gain) = self.create_osc(ctx, 900.0, OscillatorType::Square)?;
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.25, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.2)
            .ok();
        osc.frequency().set_value_at_time(900.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(120.0, t + 0.2)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.25).ok();
        Some(osc)
    }

    /// Large asteroid - deep rolling boom
    fn play_bang_large(&self, ctx: &AudioContext, vol: f32) -> Option<OscillatorNode> {
        let t = ctx.current_time();

        // Sub-bass thump under the boom
        if let Some((osc, gain)) = self.create_osc(ctx, 50.0, OscillatorType::Sine) {
            gain.gain().set_value_at_time(vol * 0.35, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.3)
                .ok();
            osc.start().ok();
            osc.stop_with_when(t + 0.35).ok();
        }

        let (osc, gain) = self.create_osc(ctx, 90.0, OscillatorType::Sawtooth)?;
        gain.gain().set_value_at_time(vol * 0.5, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.55)
            .ok();
        osc.frequency().set_value_at_time(90.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(28.0, t + 0.55)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.6).ok();
        Some(osc)
    }

    /// Medium asteroid - mid crunch
    fn play_bang_medium(&self, ctx: &AudioContext, vol: f32) -> Option<OscillatorNode> {
        let (osc, gain) = self.create_osc(ctx, 140.0, OscillatorType::Sawtooth)?;
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.45, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.4)
            .ok();
        osc.frequency().set_value_at_time(140.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(40.0, t + 0.4)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.45).ok();
        Some(osc)
    }

    /// Small asteroid - sharp crack
    fn play_bang_small(&self, ctx: &AudioContext, vol: f32) -> Option<OscillatorNode> {
        let t = ctx.current_time();

        if let Some((osc, gain)) = self.create_osc(ctx, 1400.0, OscillatorType::Square) {
            gain.gain().set_value_at_time(vol * 0.12, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.08)
                .ok();
            osc.start().ok();
            osc.stop_with_when(t + 0.1).ok();
        }

        let (osc, gain) = self.create_osc(ctx, 220.0, OscillatorType::Sawtooth)?;
        gain.gain().set_value_at_time(vol * 0.4, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.28)
            .ok();
        osc.frequency().set_value_at_time(220.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(70.0, t + 0.28)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.3).ok();
        Some(osc)
    }

    /// One cycle of the engine rumble, retriggered while thrust is held
    fn play_thrust(&self, ctx: &AudioContext, vol: f32) -> Option<OscillatorNode> {
        let (osc, gain) = self.create_osc(ctx, 75.0, OscillatorType::Triangle)?;
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.22, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.13)
            .ok();
        // Unsteady burn
        osc.frequency().set_value_at_time(75.0, t).ok();
        osc.frequency().set_value_at_time(68.0, t + 0.04).ok();
        osc.frequency().set_value_at_time(80.0, t + 0.08).ok();
        osc.frequency().set_value_at_time(70.0, t + 0.11).ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.14).ok();
        Some(osc)
    }

    /// One background beat tone
    fn play_beat(&self, ctx: &AudioContext, vol: f32, freq: f32) -> Option<OscillatorNode> {
        let (osc, gain) = self.create_osc(ctx, freq, OscillatorType::Sine)?;
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.45, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.11)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.12).ok();
        Some(osc)
    }

    /// Extra life - rising chime
    fn play_extra_life(&self, ctx: &AudioContext, vol: f32) -> Option<OscillatorNode> {
        let mut first = None;
        for (i, freq) in [600.0, 800.0, 1000.0].iter().enumerate() {
            let delay = i as f64 * 0.08;
            if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Sine) {
                let t = ctx.current_time() + delay;
                gain.gain().set_value_at_time(vol * 0.25, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.15)
                    .ok();
                osc.start_with_when(t).ok();
                osc.stop_with_when(t + 0.2).ok();
                if first.is_none() {
                    first = Some(osc);
                }
            }
        }
        first
    }

    /// Wave clear - short fanfare
    fn play_wave_clear(&self, ctx: &AudioContext, vol: f32) -> Option<OscillatorNode> {
        let mut first = None;
        for (i, freq) in [400.0, 500.0, 600.0, 800.0].iter().enumerate() {
            let delay = i as f64 * 0.1;
            if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Triangle) {
                let t = ctx.current_time() + delay;
                gain.gain().set_value_at_time(vol * 0.3, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.4)
                    .ok();
                osc.start_with_when(t).ok();
                osc.stop_with_when(t + 0.5).ok();
                if first.is_none() {
                    first = Some(osc);
                }
            }
        }
        first
    }

    /// Game over - sad descending
    fn play_game_over(&self, ctx: &AudioContext, vol: f32) -> Option<OscillatorNode> {
        let mut first = None;
        for (i, freq) in [400.0, 350.0, 300.0, 200.0].iter().enumerate() {
            let delay = i as f64 * 0.2;
            if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Sine) {
                let t = ctx.current_time() + delay;
                gain.gain().set_value_at_time(vol * 0.3, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.3)
                    .ok();
                osc.start_with_when(t).ok();
                osc.stop_with_when(t + 0.4).ok();
                if first.is_none() {
                    first = Some(osc);
                }
            }
        }
        first
    }
}
