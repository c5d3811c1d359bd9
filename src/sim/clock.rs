//! Frame clock
//!
//! Turns variable display-frame deltas into a whole number of fixed
//! simulation ticks (runner) and whole elapsed milliseconds (tap timers).
//! Frame deltas are clamped so a backgrounded tab cannot dump seconds of
//! simulation into one frame.

use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};

/// Work owed to the simulation for one display frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameSteps {
    /// Fixed ticks to run now
    pub ticks: u32,
    /// Whole milliseconds of play time that passed
    pub elapsed_ms: u64,
}

/// Fixed-timestep accumulator
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    accumulator: f32,
    ms_remainder: f64,
    total_ticks: u64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one display frame of `dt` seconds
    pub fn advance(&mut self, dt: f32) -> FrameSteps {
        let dt = if dt.is_finite() {
            dt.clamp(0.0, MAX_FRAME_DT)
        } else {
            0.0
        };

        self.accumulator += dt;
        let mut ticks = 0;
        while self.accumulator >= SIM_DT && ticks < MAX_SUBSTEPS {
            self.accumulator -= SIM_DT;
            ticks += 1;
        }
        self.total_ticks += u64::from(ticks);

        self.ms_remainder += f64::from(dt) * 1000.0;
        let elapsed_ms = self.ms_remainder.floor();
        self.ms_remainder -= elapsed_ms;

        FrameSteps {
            ticks,
            elapsed_ms: elapsed_ms as u64,
        }
    }

    /// Drop any partial tick, e.g. when a new run starts
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn total_ticks(&self) -> u64 {
        self.total_ticks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_display_frame_is_one_tick() {
        let mut clock = FrameClock::new();
        for _ in 0..60 {
            assert_eq!(clock.advance(SIM_DT).ticks, 1);
        }
        assert_eq!(clock.total_ticks(), 60);
    }

    #[test]
    fn test_long_frames_are_clamped() {
        let mut clock = FrameClock::new();
        let steps = clock.advance(10.0);
        assert_eq!(steps.elapsed_ms, 100);
        assert!(steps.ticks <= 6);
        assert!(steps.ticks <= MAX_SUBSTEPS);
    }

    #[test]
    fn test_bad_deltas_do_nothing() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.advance(-1.0), FrameSteps::default());
        assert_eq!(clock.advance(f32::NAN), FrameSteps::default());
    }

    #[test]
    fn test_slow_frames_accumulate() {
        let mut clock = FrameClock::new();
        let mut ms = 0;
        for _ in 0..60 {
            ms += clock.advance(0.02).elapsed_ms;
        }
        // 1.2 s of play at 60 Hz
        assert!((71..=72).contains(&clock.total_ticks()));
        assert!((1199..=1200).contains(&ms));
    }

    #[test]
    fn test_reset_drops_partial_tick() {
        let mut clock = FrameClock::new();
        clock.advance(SIM_DT * 0.9);
        clock.reset();
        assert_eq!(clock.advance(SIM_DT * 0.5).ticks, 0);
        assert_eq!(clock.total_ticks(), 0);
    }
}
