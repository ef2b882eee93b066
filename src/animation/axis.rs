//! One independently-enabled sub-animation (move, rotate, scale or fade).

use std::time::Duration;

use serde::{Deserialize, Serialize};
use web_time::Instant;

use super::spec::AnimationType;
use super::tween::{Animatable, Tween};
use crate::util::easing::EasingFunction;

/// Convert authored seconds to a [`Duration`]. Negative and NaN values are
/// zero; infinite values and values too large for a `Duration` saturate to
/// [`Duration::MAX`].
pub(crate) fn secs(value: f32) -> Duration {
    if value.is_nan() || value <= 0.0 {
        return Duration::ZERO;
    }
    Duration::try_from_secs_f32(value).unwrap_or(Duration::MAX)
}

/// A sub-animation of one transform property.
///
/// `from`/`to` are the Show, Hide and State endpoints; when `relative` is
/// set they are offsets added to the container's baseline, otherwise they
/// are absolute values. `by` is the amplitude used by Loop and Punch, which
/// always oscillate around the baseline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    default,
    bound(deserialize = "T: Deserialize<'de> + Animatable + Default")
)]
pub struct AxisAnimation<T> {
    /// Whether this axis animates at all. A disabled axis is held at the
    /// baseline while the other axes play.
    pub enabled: bool,
    /// Whether `from`/`to` are offsets from the baseline.
    pub relative: bool,
    /// Start endpoint.
    pub from: T,
    /// End endpoint.
    pub to: T,
    /// Oscillation amplitude for Loop and Punch.
    pub by: T,
    /// Seconds the interpolation takes once started.
    pub duration: f32,
    /// Seconds to hold `from` before interpolating.
    pub start_delay: f32,
    /// Interpolation curve.
    pub easing: EasingFunction,
}

impl<T: Animatable + Default> Default for AxisAnimation<T> {
    fn default() -> Self {
        Self {
            enabled: false,
            relative: true,
            from: T::default(),
            to: T::default(),
            by: T::default(),
            duration: 0.5,
            start_delay: 0.0,
            easing: EasingFunction::default(),
        }
    }
}

impl<T: Animatable + Default> AxisAnimation<T> {
    /// Enabled axis whose endpoints are absolute values.
    #[must_use]
    pub fn absolute(from: T, to: T) -> Self {
        Self {
            enabled: true,
            relative: false,
            from,
            to,
            ..Self::default()
        }
    }

    /// Enabled axis whose endpoints are offsets from the baseline.
    #[must_use]
    pub fn relative(from: T, to: T) -> Self {
        Self {
            enabled: true,
            relative: true,
            from,
            to,
            ..Self::default()
        }
    }

    /// Enabled axis oscillating around the baseline by `by`.
    #[must_use]
    pub fn oscillating(by: T) -> Self {
        Self {
            enabled: true,
            by,
            ..Self::default()
        }
    }
}

impl<T: Animatable> AxisAnimation<T> {
    /// Set duration and start delay in seconds.
    #[must_use]
    pub fn with_timing(mut self, duration: f32, start_delay: f32) -> Self {
        self.duration = duration;
        self.start_delay = start_delay;
        self
    }

    /// Set the easing curve.
    #[must_use]
    pub fn with_easing(mut self, easing: EasingFunction) -> Self {
        self.easing = easing;
        self
    }

    /// Same axis with `enabled` cleared.
    #[must_use]
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Interpolation time as a [`Duration`].
    #[must_use]
    pub fn duration_span(&self) -> Duration {
        secs(self.duration)
    }

    /// Start delay as a [`Duration`].
    #[must_use]
    pub fn delay_span(&self) -> Duration {
        secs(self.start_delay)
    }

    /// Delay plus duration.
    #[must_use]
    pub fn total(&self) -> Duration {
        self.delay_span().saturating_add(self.duration_span())
    }

    fn resolve(&self, value: T, baseline: T) -> T {
        if self.relative {
            baseline + value
        } else {
            value
        }
    }

    /// Start and end values for `kind` given the container's baseline.
    ///
    /// Loop spans `baseline - by ..= baseline + by`; Punch spans
    /// `baseline ..= baseline + by`; State goes from the baseline to `to`.
    #[must_use]
    pub fn endpoints(&self, kind: AnimationType, baseline: T) -> (T, T) {
        match kind {
            AnimationType::Show | AnimationType::Hide => (
                self.resolve(self.from, baseline),
                self.resolve(self.to, baseline),
            ),
            AnimationType::State => (baseline, self.resolve(self.to, baseline)),
            AnimationType::Loop => (baseline - self.by, baseline + self.by),
            AnimationType::Punch => (baseline, baseline + self.by),
        }
    }

    /// Tween for a Show/Hide/State transition starting at `now`, always from
    /// the configured start endpoint.
    #[must_use]
    pub fn tween(&self, kind: AnimationType, baseline: T, now: Instant) -> Tween<T> {
        let (from, to) = self.endpoints(kind, baseline);
        Tween::new(
            from,
            to,
            now,
            self.delay_span(),
            self.duration_span(),
            self.easing,
        )
    }
}
