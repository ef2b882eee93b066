//! Time-driven interpolation of a single value.
//!
//! A [`Tween`] is sampled against an [`Instant`] rather than advanced by a
//! delta, so the same tween yields the same value for the same instant no
//! matter how often it is polled. Time is real time; no time scale applies.

use std::cell::Cell;
use std::ops::{Add, Mul, Sub};
use std::rc::Rc;
use std::time::Duration;

use web_time::Instant;

use crate::util::easing::EasingFunction;

/// Values a tween can interpolate: anything closed under add/sub and scalar
/// multiplication. Covers `f32` (opacity) and `glam::Vec3` (position,
/// euler rotation, scale).
pub trait Animatable:
    Copy + Add<Output = Self> + Sub<Output = Self> + Mul<f32, Output = Self>
{
}

impl<T> Animatable for T where
    T: Copy + Add<Output = T> + Sub<Output = T> + Mul<f32, Output = T>
{
}

/// Linear interpolation between two animatable values.
#[inline]
pub fn lerp<T: Animatable>(start: T, end: T, t: f32) -> T {
    start + (end - start) * t
}

/// Shared cancellation flag.
///
/// Clones observe the same flag, so the owner of a suspended operation can
/// hand one clone to the operation and keep another to cancel it.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Rc<Cell<bool>>);

impl CancelToken {
    /// Fresh, uncancelled token.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Idempotent.
    pub fn cancel(&self) {
        self.0.set(true);
    }

    /// Whether cancellation was requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.get()
    }
}

/// A cancellable interpolation from `from` to `to`.
#[derive(Debug, Clone)]
pub struct Tween<T> {
    from: T,
    to: T,
    start: Instant,
    delay: Duration,
    duration: Duration,
    easing: EasingFunction,
    token: CancelToken,
}

impl<T: Animatable> Tween<T> {
    /// Start a tween at `start`; it holds `from` until `delay` has passed.
    #[must_use]
    pub fn new(
        from: T,
        to: T,
        start: Instant,
        delay: Duration,
        duration: Duration,
        easing: EasingFunction,
    ) -> Self {
        Self {
            from,
            to,
            start,
            delay,
            duration,
            easing,
            token: CancelToken::new(),
        }
    }

    /// Handle that cancels this tween.
    #[must_use]
    pub fn handle(&self) -> CancelToken {
        self.token.clone()
    }

    /// Cancel the tween; subsequent samples return `None`.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Whether the tween was cancelled.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Delay plus duration.
    #[must_use]
    pub fn total(&self) -> Duration {
        self.delay.saturating_add(self.duration)
    }

    /// Raw (uneased) progress in `[0, 1]` at `now`.
    #[must_use]
    pub fn raw_progress(&self, now: Instant) -> f32 {
        let elapsed = now.saturating_duration_since(self.start);
        let Some(active) = elapsed.checked_sub(self.delay) else {
            return 0.0;
        };
        if self.duration.is_zero() {
            1.0
        } else {
            (active.as_secs_f32() / self.duration.as_secs_f32()).min(1.0)
        }
    }

    /// Value at `now`, or `None` once cancelled.
    #[must_use]
    pub fn sample(&self, now: Instant) -> Option<T> {
        if self.is_cancelled() {
            return None;
        }
        let t = self.raw_progress(now);
        if t >= 1.0 {
            return Some(self.to);
        }
        Some(lerp(self.from, self.to, self.easing.evaluate(t)))
    }

    /// Whether the tween has reached its end value at `now`.
    #[must_use]
    pub fn is_complete(&self, now: Instant) -> bool {
        self.raw_progress(now) >= 1.0
    }

    /// Start value.
    #[must_use]
    pub fn start_value(&self) -> T {
        self.from
    }

    /// End value.
    #[must_use]
    pub fn end_value(&self) -> T {
        self.to
    }
}
