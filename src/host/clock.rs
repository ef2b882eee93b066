use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use web_time::Instant;

/// Source of real (unscaled) time for the per-frame tick.
pub trait Clock {
    /// The current instant.
    fn now(&self) -> Instant;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock that only moves when told to. Clones share the same time.
#[derive(Debug, Clone)]
pub struct ManualClock(Rc<Cell<Instant>>);

impl ManualClock {
    /// Clock frozen at the current wall-clock instant.
    #[must_use]
    pub fn new() -> Self {
        Self(Rc::new(Cell::new(Instant::now())))
    }

    /// Move time forward by `delta`.
    pub fn advance(&self, delta: Duration) {
        self.0.set(self.0.get() + delta);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.0.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_clones_share_time() {
        let clock = ManualClock::new();
        let view = clock.clone();
        let start = view.now();
        clock.advance(Duration::from_millis(16));
        assert_eq!(view.now() - start, Duration::from_millis(16));
    }
}
