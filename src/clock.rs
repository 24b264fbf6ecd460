//! Fixed-rate tick driver.

use std::time::Duration;

/// Longest stretch of wall time a single `advance` call will account for.
pub const MAX_FRAME_DELTA: Duration = Duration::from_millis(100);

/// Turns irregular frame times into a whole number of fixed ticks.
#[derive(Debug, Clone)]
pub struct FixedClock {
    interval: Duration,
    accumulated: Duration,
}

impl FixedClock {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            accumulated: Duration::ZERO,
        }
    }

    /// Adds `dt` and returns how many ticks are now due. The remainder carries over.
    pub fn advance(&mut self, dt: Duration) -> u32 {
        if self.interval.is_zero() {
            return 0;
        }
        self.accumulated += dt.min(MAX_FRAME_DELTA);
        let mut ticks = 0;
        while self.accumulated >= self.interval {
            self.accumulated -= self.interval;
            ticks += 1;
        }
        ticks
    }

    /// Time left until the next tick is due.
    pub fn until_next(&self) -> Duration {
        self.interval.saturating_sub(self.accumulated)
    }

    pub fn reset(&mut self) {
        self.accumulated = Duration::ZERO;
    }
}
