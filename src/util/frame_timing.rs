//! Fixed-rate frame pacing for host loops.

use web_time::{Duration, Instant};

/// Frame pacing for a host loop driving [`ViewRegistry::tick`].
///
/// [`ViewRegistry::tick`]: crate::registry::ViewRegistry::tick
pub struct FrameTiming {
    /// Minimum frame duration based on target FPS (zero = unlimited)
    min_frame_duration: Duration,
    /// Last frame timestamp
    last_frame: Instant,
    /// Smoothed FPS using exponential moving average
    smoothed_fps: f32,
    /// Smoothing factor (lower = smoother, 0.0-1.0)
    smoothing: f32,
    /// Frames completed since construction
    frames: u64,
}

impl FrameTiming {
    /// Create a new frame timer with the given FPS target (0 = unlimited).
    #[must_use]
    pub fn new(target_fps: u32, now: Instant) -> Self {
        let min_frame_duration = if target_fps > 0 {
            Duration::from_secs_f64(1.0 / f64::from(target_fps))
        } else {
            Duration::ZERO
        };

        Self {
            min_frame_duration,
            last_frame: now,
            smoothed_fps: 60.0,
            smoothing: 0.05,
            frames: 0,
        }
    }

    /// Whether enough time has passed since the last frame to tick again.
    #[must_use]
    pub fn should_tick(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.last_frame)
            >= self.min_frame_duration
    }

    /// Time left until the next frame is due.
    #[must_use]
    pub fn until_next(&self, now: Instant) -> Duration {
        let elapsed = now.saturating_duration_since(self.last_frame);
        self.min_frame_duration.saturating_sub(elapsed)
    }

    /// Call after ticking to update timing.
    pub fn end_frame(&mut self, now: Instant) {
        let elapsed = now.saturating_duration_since(self.last_frame);
        self.last_frame = now;
        self.frames += 1;

        let frame_time = elapsed.as_secs_f32();
        if frame_time > 0.0 {
            let instant_fps = 1.0 / frame_time;
            self.smoothed_fps = self.smoothed_fps * (1.0 - self.smoothing)
                + instant_fps * self.smoothing;
        }
    }

    /// Current FPS (smoothed).
    #[must_use]
    pub fn fps(&self) -> f32 {
        self.smoothed_fps
    }

    /// Frames completed so far.
    #[must_use]
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limits_to_target_rate() {
        let start = Instant::now();
        let mut timing = FrameTiming::new(50, start);
        assert!(!timing.should_tick(start + Duration::from_millis(10)));
        assert!(timing.should_tick(start + Duration::from_millis(20)));

        timing.end_frame(start + Duration::from_millis(20));
        assert_eq!(timing.frames(), 1);
        assert_eq!(
            timing.until_next(start + Duration::from_millis(30)),
            Duration::from_millis(10)
        );
    }

    #[test]
    fn unlimited_always_ticks() {
        let start = Instant::now();
        let timing = FrameTiming::new(0, start);
        assert!(timing.should_tick(start));
        assert_eq!(timing.until_next(start), Duration::ZERO);
    }
}
