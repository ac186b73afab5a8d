//! Frame pacing
//!
//! Stands in for the display refresh signal that paces the analysis loop

use std::time::{Duration, Instant};

/// Default display refresh rate (frames per second)
pub const DEFAULT_FRAME_RATE: f64 = 60.0;

/// Blocks until the next frame is due
pub trait FrameClock {
    fn wait_for_frame(&mut self);
}

/// Fixed-rate clock that sleeps until each frame deadline
///
/// If a frame overruns, the schedule restarts from now instead of bursting
/// to catch up.
#[derive(Debug, Clone)]
pub struct IntervalClock {
    period: Duration,
    next_deadline: Option<Instant>,
}

impl IntervalClock {
    /// # Arguments
    /// * `frame_rate` - Frames per second; rates without a representable
    ///   non-zero period (non-positive, NaN, infinite, or vanishingly small)
    ///   fall back to the default
    pub fn new(frame_rate: f64) -> Self {
        let period = Duration::try_from_secs_f64(1.0 / frame_rate)
            .ok()
            .filter(|period| !period.is_zero())
            .unwrap_or_else(|| Duration::from_secs_f64(1.0 / DEFAULT_FRAME_RATE));
        Self {
            period,
            next_deadline: None,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }
}

impl Default for IntervalClock {
    fn default() -> Self {
        Self::new(DEFAULT_FRAME_RATE)
    }
}

impl FrameClock for IntervalClock {
    fn wait_for_frame(&mut self) {
        let now = Instant::now();
        let deadline = self.next_deadline.unwrap_or(now);

        if deadline > now {
            std::thread::sleep(deadline - now);
            self.next_deadline = Some(deadline + self.period);
        } else {
            self.next_deadline = Some(now + self.period);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_period_from_rate() {
        let clock = IntervalClock::new(50.0);
        assert_eq!(clock.period(), Duration::from_millis(20));

        let fallback = IntervalClock::new(0.0);
        assert_eq!(fallback.period(), IntervalClock::default().period());
    }

    #[test]
    fn test_unrepresentable_rates_fall_back() {
        let default = IntervalClock::default().period();
        for rate in [1e-30, -5.0, f64::NAN, f64::INFINITY, f64::MAX] {
            assert_eq!(IntervalClock::new(rate).period(), default, "rate {rate}");
        }
    }

    #[test]
    fn test_frames_are_paced() {
        let mut clock = IntervalClock::new(200.0);
        let start = Instant::now();
        for _ in 0..4 {
            clock.wait_for_frame();
        }
        // First frame is immediate, the next three wait ~5 ms each
        assert!(start.elapsed() >= Duration::from_millis(14));
    }
}
