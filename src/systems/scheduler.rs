//! Cancellable repeating timers driven by frame deltas.
//!
//! Each periodic concern (the game clock, the spawner) owns exactly one [`RepeatingTask`].
//! Starting a task always replaces the previous run, so two timers of the same kind can
//! never be live at once.

use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepeatingTask {
    period: Duration,
    elapsed: Duration,
    active: bool,
}

impl RepeatingTask {
    /// Creates an inactive task. Nothing fires until [`start`](Self::start) is called.
    ///
    /// # Panics
    ///
    /// Panics if `period` is zero.
    pub fn new(period: Duration) -> Self {
        assert!(!period.is_zero(), "RepeatingTask period must be non-zero");
        Self {
            period,
            elapsed: Duration::ZERO,
            active: false,
        }
    }

    /// Starts a fresh run with a full period ahead, cancelling whatever was running before.
    pub fn start(&mut self) {
        self.cancel();
        self.active = true;
    }

    /// Stops firing immediately and drops any partially accumulated period.
    pub fn cancel(&mut self) {
        self.active = false;
        self.elapsed = Duration::ZERO;
    }

    /// Accumulates `dt` and returns how many whole periods elapsed, carrying the remainder.
    pub fn advance(&mut self, dt: Duration) -> u32 {
        if !self.active {
            return 0;
        }

        self.elapsed += dt;
        let mut fired = 0;
        while self.elapsed >= self.period {
            self.elapsed -= self.period;
            fired += 1;
        }
        fired
    }

    pub fn is_active(&self) -> bool {
        self.active
    }
}
