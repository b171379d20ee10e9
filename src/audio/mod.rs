//! Layered procedural audio
//!
//! No sound files: every effect is synthesized from oscillator + gain
//! envelopes at trigger time. Triggering goes through fixed-size voice pools
//! so rapid fire never cuts off in-flight playback, and the background beat
//! and thrust loop run on their own clocks. All pacing/pooling logic is pure
//! and tested natively; only `AudioManager` touches the Web Audio API.

pub mod beat;
pub mod pool;

#[cfg(target_arch = "wasm32")]
mod manager;
#[cfg(target_arch = "wasm32")]
pub use manager::AudioManager;

pub use beat::{BeatClock, BeatTone, LoopClock};
pub use pool::VoicePool;

/// Logical sound cues the game can trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundKey {
    /// Ship fires a bullet
    Fire,
    /// Large asteroid destroyed
    BangLarge,
    /// Medium asteroid destroyed
    BangMedium,
    /// Small asteroid destroyed
    BangSmall,
    /// One cycle of the thrust rumble
    Thrust,
    /// Background beat, lower tone
    BeatLow,
    /// Background beat, higher tone
    BeatHigh,
    /// Extra life awarded
    ExtraLife,
    /// Wave cleared fanfare
    WaveClear,
    /// Run ended
    GameOver,
}

impl SoundKey {
    /// Pool size per key, fixed at configuration time
    pub fn pool_size(self) -> usize {
        match self {
            SoundKey::Fire => 5,
            SoundKey::BangLarge | SoundKey::BangMedium | SoundKey::BangSmall => 5,
            // The loops and jingles never overlap themselves
            SoundKey::Thrust => 2,
            SoundKey::BeatLow | SoundKey::BeatHigh => 1,
            SoundKey::ExtraLife | SoundKey::WaveClear | SoundKey::GameOver => 1,
        }
    }

    /// Envelope length in seconds; doubles as the voice lifetime
    pub fn duration(self) -> f64 {
        match self {
            SoundKey::Fire => 0.25,
            SoundKey::BangLarge => 0.6,
            SoundKey::BangMedium => 0.45,
            SoundKey::BangSmall => 0.3,
            SoundKey::Thrust => 0.14,
            SoundKey::BeatLow | SoundKey::BeatHigh => 0.12,
            SoundKey::ExtraLife => 0.5,
            SoundKey::WaveClear => 0.8,
            SoundKey::GameOver => 1.1,
        }
    }

    pub const ALL: [SoundKey; 10] = [
        SoundKey::Fire,
        SoundKey::BangLarge,
        SoundKey::BangMedium,
        SoundKey::BangSmall,
        SoundKey::Thrust,
        SoundKey::BeatLow,
        SoundKey::BeatHigh,
        SoundKey::ExtraLife,
        SoundKey::WaveClear,
        SoundKey::GameOver,
    ];

    /// Index into per-key tables
    pub fn index(self) -> usize {
        Self::ALL.iter().position(|&k| k == self).unwrap_or(0)
    }
}
