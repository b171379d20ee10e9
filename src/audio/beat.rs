//! Background beat and thrust-loop pacing
//!
//! The classic two-tone heartbeat: alternating low notes on a repeating
//! deadline. The interval starts at a base value and tightens toward a
//! minimum as the wave is whittled down; restarting the clock mid-wave picks
//! up the current interval immediately. The thrust loop is a separate
//! fixed-period clock so holding thrust retriggers its rumble independently
//! of the beat.
//!
//! Pure deadline arithmetic; the host polls these from its frame loop and
//! plays whatever comes due.

/// Which of the two alternating beat tones is due
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BeatTone {
    Low,
    High,
}

#[derive(Debug, Clone)]
pub struct BeatClock {
    base_interval: f64,
    min_interval: f64,
    next_due: f64,
    tone: BeatTone,
    running: bool,
}

impl BeatClock {
    pub fn new(base_interval: f64, min_interval: f64) -> Self {
        Self {
            base_interval,
            min_interval,
            next_due: 0.0,
            tone: BeatTone::Low,
            running: false,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// (Re)start the beat; the first tone fires on the next poll
    pub fn start(&mut self, now: f64) {
        self.running = true;
        self.next_due = now;
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Interval for a wave that is `progress` (0..=1) destroyed
    pub fn interval_for(&self, progress: f32) -> f64 {
        let t = progress.clamp(0.0, 1.0) as f64;
        self.base_interval + (self.min_interval - self.base_interval) * t
    }

    /// Return the tone to play if one is due at `now`, rescheduling with the
    /// interval for the current wave progress
    pub fn poll(&mut self, now: f64, progress: f32) -> Option<BeatTone> {
        if !self.running || now < self.next_due {
            return None;
        }
        let tone = self.tone;
        self.tone = match tone {
            BeatTone::Low => BeatTone::High,
            BeatTone::High => BeatTone::Low,
        };
        self.next_due = now + self.interval_for(progress);
        Some(tone)
    }
}

/// Fixed-period retrigger clock for the looping thrust rumble
#[derive(Debug, Clone)]
pub struct LoopClock {
    period: f64,
    next_due: f64,
    active: bool,
}

impl LoopClock {
    pub fn new(period: f64) -> Self {
        Self {
            period,
            next_due: 0.0,
            active: false,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn set_active(&mut self, now: f64, active: bool) {
        if active && !self.active {
            self.next_due = now; // retrigger immediately on press
        }
        self.active = active;
    }

    /// True when the loop should retrigger at `now`
    pub fn poll(&mut self, now: f64) -> bool {
        if !self.active || now < self.next_due {
            return false;
        }
        self.next_due = now + self.period;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_interpolates_base_to_min() {
        let clock = BeatClock::new(1000.0, 250.0);
        assert_eq!(clock.interval_for(0.0), 1000.0);
        assert_eq!(clock.interval_for(1.0), 250.0);
        assert!((clock.interval_for(0.5) - 625.0).abs() < 1e-9);
        // Out-of-range progress clamps
        assert_eq!(clock.interval_for(2.0), 250.0);
    }

    #[test]
    fn test_tones_alternate() {
        let mut clock = BeatClock::new(100.0, 100.0);
        clock.start(0.0);
        assert_eq!(clock.poll(0.0, 0.0), Some(BeatTone::Low));
        assert_eq!(clock.poll(50.0, 0.0), None);
        assert_eq!(clock.poll(100.0, 0.0), Some(BeatTone::High));
        assert_eq!(clock.poll(200.0, 0.0), Some(BeatTone::Low));
    }

    #[test]
    fn test_stopped_clock_is_silent() {
        let mut clock = BeatClock::new(100.0, 100.0);
        assert_eq!(clock.poll(1000.0, 0.0), None);
        clock.start(1000.0);
        clock.stop();
        assert_eq!(clock.poll(2000.0, 0.0), None);
    }

    #[test]
    fn test_restart_picks_up_tighter_interval() {
        let mut clock = BeatClock::new(1000.0, 250.0);
        clock.start(0.0);
        clock.poll(0.0, 0.0);
        clock.stop();

        // Restart late in the wave: next gap uses the interpolated interval
        clock.start(5000.0);
        assert!(clock.poll(5000.0, 1.0).is_some());
        assert_eq!(clock.poll(5200.0, 1.0), None);
        assert!(clock.poll(5250.0, 1.0).is_some());
    }

    #[test]
    fn test_loop_clock_retriggers_while_held() {
        let mut thrust = LoopClock::new(100.0);
        assert!(!thrust.poll(0.0));
        thrust.set_active(0.0, true);
        assert!(thrust.poll(0.0));
        assert!(!thrust.poll(50.0));
        assert!(thrust.poll(100.0));
        thrust.set_active(150.0, false);
        assert!(!thrust.poll(200.0));
        // Re-press retriggers immediately
        thrust.set_active(300.0, true);
        assert!(thrust.poll(300.0));
    }
}
