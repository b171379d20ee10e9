//! Fixed-size voice pools
//!
//! Each sound key owns a small, fixed set of playback slots. Triggering a
//! sound takes a free slot; when none is free the least-recently-started
//! voice is reclaimed so a burst of triggers never cuts off the newest
//! playback. The pool never grows after construction.

/// One pooled playback slot
#[derive(Debug, Clone, Copy)]
pub struct Voice {
    pub playing: bool,
    pub started_at: f64,
    ends_at: f64,
}

impl Voice {
    fn idle() -> Self {
        Self {
            playing: false,
            started_at: 0.0,
            ends_at: 0.0,
        }
    }
}

/// Slot handed back by [`VoicePool::acquire`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Allocation {
    pub slot: usize,
    /// True when an in-flight voice was stopped to make room; the caller
    /// must tear down that voice's underlying source before reusing the slot
    pub reclaimed: bool,
}

#[derive(Debug, Clone)]
pub struct VoicePool {
    voices: Vec<Voice>,
}

impl VoicePool {
    pub fn new(size: usize) -> Self {
        assert!(size > 0, "a voice pool needs at least one slot");
        Self {
            voices: vec![Voice::idle(); size],
        }
    }

    pub fn len(&self) -> usize {
        self.voices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.voices.is_empty()
    }

    /// Voices currently playing at `now`
    pub fn active(&mut self, now: f64) -> usize {
        self.release_finished(now);
        self.voices.iter().filter(|v| v.playing).count()
    }

    /// Mark voices whose scheduled duration has elapsed as free again
    pub fn release_finished(&mut self, now: f64) {
        for v in &mut self.voices {
            if v.playing && now >= v.ends_at {
                v.playing = false;
            }
        }
    }

    /// Claim a slot for a playback of `duration` seconds starting at `now`.
    /// Prefers a free voice; otherwise reclaims the least-recently-started.
    pub fn acquire(&mut self, now: f64, duration: f64) -> Allocation {
        self.release_finished(now);

        let (slot, reclaimed) = match self.voices.iter().position(|v| !v.playing) {
            Some(i) => (i, false),
            None => {
                let oldest = self
                    .voices
                    .iter()
                    .enumerate()
                    .min_by(|(_, a), (_, b)| a.started_at.total_cmp(&b.started_at))
                    .map(|(i, _)| i)
                    .unwrap_or(0);
                (oldest, true)
            }
        };

        self.voices[slot] = Voice {
            playing: true,
            started_at: now,
            ends_at: now + duration,
        };
        Allocation { slot, reclaimed }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fills_free_slots_first() {
        let mut pool = VoicePool::new(3);
        let a = pool.acquire(0.0, 1.0);
        let b = pool.acquire(0.1, 1.0);
        let c = pool.acquire(0.2, 1.0);
        assert!(!a.reclaimed && !b.reclaimed && !c.reclaimed);
        assert_eq!(pool.active(0.3), 3);
    }

    #[test]
    fn test_reclaims_least_recently_started() {
        let mut pool = VoicePool::new(2);
        let a = pool.acquire(0.0, 10.0);
        let _b = pool.acquire(1.0, 10.0);
        let c = pool.acquire(2.0, 10.0);
        assert!(c.reclaimed);
        // The oldest voice (slot of `a`) was sacrificed
        assert_eq!(c.slot, a.slot);
        // Pool size never grew
        assert_eq!(pool.len(), 2);
    }

    #[test]
    fn test_voices_free_after_duration() {
        let mut pool = VoicePool::new(1);
        pool.acquire(0.0, 0.5);
        assert_eq!(pool.active(0.4), 1);
        assert_eq!(pool.active(0.6), 0);
        // Next trigger reuses the slot without reclaiming
        let next = pool.acquire(0.7, 0.5);
        assert!(!next.reclaimed);
    }
}
