//! Loop, Punch and State playback around the baseline.

use std::f32::consts::TAU;
use std::time::Duration;

use web_time::Instant;

use super::axis::AxisAnimation;
use super::spec::{AnimationSpec, AnimationType};
use super::tween::{lerp, Animatable};
use crate::util::easing::EasingFunction;
use crate::view::surface::{Baseline, ViewSurface};

/// Full oscillations a punch performs before it settles.
const PUNCH_CYCLES: f32 = 2.0;

/// Bisection steps when inverting an easing curve.
const MIDPOINT_STEPS: u32 = 24;

/// Leg fraction at which `easing` first reaches 0.5. Every curve starts at 0
/// and ends at 1, so bisection always brackets a crossing.
fn midpoint_phase(easing: &EasingFunction) -> f32 {
    let (mut lo, mut hi) = (0.0_f32, 1.0_f32);
    for _ in 0..MIDPOINT_STEPS {
        let mid = 0.5 * (lo + hi);
        if easing.evaluate(mid) < 0.5 {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    0.5 * (lo + hi)
}

/// Loop leg position at `elapsed`, as the eased fraction between the low and
/// high endpoints. Phase-shifted so the first sample sits on the baseline.
fn loop_fraction<T: Animatable>(axis: &AxisAnimation<T>, elapsed: Duration) -> f32 {
    let Some(active) = elapsed.checked_sub(axis.delay_span()) else {
        return 0.5;
    };
    let leg = axis.duration_span().as_secs_f32();
    if leg <= 0.0 {
        return 0.5;
    }
    let offset = midpoint_phase(&axis.easing);
    let phase = (active.as_secs_f32() / leg + offset).rem_euclid(2.0);
    let u = if phase <= 1.0 { phase } else { 2.0 - phase };
    axis.easing.evaluate(u)
}

/// Punch displacement multiplier at `elapsed`: a sine that decays to zero.
fn punch_factor<T: Animatable>(axis: &AxisAnimation<T>, elapsed: Duration) -> f32 {
    let Some(active) = elapsed.checked_sub(axis.delay_span()) else {
        return 0.0;
    };
    let length = axis.duration_span().as_secs_f32();
    if length <= 0.0 {
        return 0.0;
    }
    let p = (active.as_secs_f32() / length).min(1.0);
    (p * PUNCH_CYCLES * TAU).sin() * (1.0 - p)
}

fn sample_axis<T: Animatable>(
    axis: &AxisAnimation<T>,
    kind: AnimationType,
    baseline: T,
    elapsed: Duration,
) -> T {
    match kind {
        AnimationType::Loop => {
            let (low, high) = axis.endpoints(kind, baseline);
            lerp(low, high, loop_fraction(axis, elapsed))
        }
        AnimationType::Punch => baseline + axis.by * punch_factor(axis, elapsed),
        AnimationType::Show | AnimationType::Hide | AnimationType::State => {
            let (from, to) = axis.endpoints(kind, baseline);
            let Some(active) = elapsed.checked_sub(axis.delay_span()) else {
                return from;
            };
            let length = axis.duration_span().as_secs_f32();
            let t = if length <= 0.0 {
                1.0
            } else {
                active.as_secs_f32() / length
            };
            lerp(from, to, axis.easing.evaluate(t))
        }
    }
}

/// An ambient animation running on a visible container.
///
/// Loops never finish on their own; a punch or state animation finishes
/// after its longest enabled axis.
#[derive(Debug, Clone)]
pub struct AmbientAnimation {
    spec: AnimationSpec,
    baseline: Baseline,
    started: Instant,
}

impl AmbientAnimation {
    /// Start playing `spec` (a Loop, Punch or State spec) around `baseline`.
    #[must_use]
    pub fn new(spec: AnimationSpec, baseline: Baseline, started: Instant) -> Self {
        Self {
            spec,
            baseline,
            started,
        }
    }

    /// Which ambient kind this is.
    #[must_use]
    pub fn kind(&self) -> AnimationType {
        self.spec.animation_type
    }

    /// Whether the animation has run its course at `now`. Loops never do.
    #[must_use]
    pub fn is_finished(&self, now: Instant) -> bool {
        self.kind() != AnimationType::Loop
            && now.saturating_duration_since(self.started)
                >= self.spec.total_duration()
    }

    /// Write the values for `now` to every enabled axis of `surface`.
    ///
    /// Returns `false` once finished; the last write is the resting value
    /// (the baseline for a punch, the target for a state animation).
    pub fn apply(&self, surface: &mut dyn ViewSurface, now: Instant) -> bool {
        let finished = self.is_finished(now);
        let elapsed = if finished {
            self.spec.total_duration()
        } else {
            now.saturating_duration_since(self.started)
        };
        let kind = self.kind();
        let spec = &self.spec;
        let base = &self.baseline;
        if spec.position.enabled {
            surface.set_position(sample_axis(&spec.position, kind, base.position, elapsed));
        }
        if spec.rotation.enabled {
            surface.set_rotation(sample_axis(&spec.rotation, kind, base.rotation, elapsed));
        }
        if spec.scale.enabled {
            surface.set_scale(sample_axis(&spec.scale, kind, base.scale, elapsed));
        }
        if spec.fade.enabled {
            let alpha = sample_axis(&spec.fade, kind, base.alpha, elapsed);
            surface.set_opacity(alpha.clamp(0.0, 1.0));
        }
        !finished
    }

    /// Put every axis this animation touches back on the baseline.
    pub fn restore(&self, surface: &mut dyn ViewSurface) {
        let spec = &self.spec;
        if spec.position.enabled {
            surface.set_position(self.baseline.position);
        }
        if spec.rotation.enabled {
            surface.set_rotation(self.baseline.rotation);
        }
        if spec.scale.enabled {
            surface.set_scale(self.baseline.scale);
        }
        if spec.fade.enabled {
            surface.set_opacity(self.baseline.alpha);
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;
    use crate::view::surface::MemorySurface;

    fn bobbing_loop() -> AnimationSpec {
        let mut spec = AnimationSpec::for_type(AnimationType::Loop);
        spec.position = AxisAnimation::oscillating(Vec3::new(0.0, 10.0, 0.0))
            .with_timing(1.0, 0.0)
            .with_easing(EasingFunction::Linear);
        spec
    }

    #[test]
    fn loop_starts_on_baseline_and_swings_both_ways() {
        let surface = MemorySurface::new();
        let mut target = surface.clone();
        let start = Instant::now();
        let anim = AmbientAnimation::new(bobbing_loop(), Baseline::default(), start);

        assert!(anim.apply(&mut target, start));
        assert!(surface.position().length() < 1e-4);

        // Half a leg later the loop sits on the high endpoint.
        assert!(anim.apply(&mut target, start + Duration::from_millis(500)));
        assert!((surface.position().y - 10.0).abs() < 1e-3);

        assert!(anim.apply(&mut target, start + Duration::from_millis(1500)));
        assert!((surface.position().y + 10.0).abs() < 1e-3);

        assert!(!anim.is_finished(start + Duration::from_secs(3600)));
    }

    #[test]
    fn eased_loop_starts_on_baseline() {
        let mut spec = bobbing_loop();
        spec.position.easing = EasingFunction::DEFAULT;
        let surface = MemorySurface::at(Vec3::new(5.0, 5.0, 0.0));
        let mut target = surface.clone();
        let start = Instant::now();
        let baseline = surface.state().transform;
        let anim = AmbientAnimation::new(spec, baseline, start);

        assert!(anim.apply(&mut target, start));
        assert!((surface.position() - Vec3::new(5.0, 5.0, 0.0)).length() < 1e-3);

        let offset = midpoint_phase(&EasingFunction::DEFAULT);
        assert!((EasingFunction::DEFAULT.evaluate(offset) - 0.5).abs() < 1e-4);
        let to_high = Duration::from_secs_f32(1.0 - offset);
        assert!(anim.apply(&mut target, start + to_high));
        assert!((surface.position().y - 15.0).abs() < 1e-2);
    }

    #[test]
    fn punch_settles_on_baseline() {
        let mut spec = AnimationSpec::for_type(AnimationType::Punch);
        spec.scale.enabled = true;
        let surface = MemorySurface::new();
        let mut target = surface.clone();
        let start = Instant::now();
        let anim = AmbientAnimation::new(spec, Baseline::default(), start);

        assert!(anim.apply(&mut target, start + Duration::from_millis(50)));
        assert!((surface.scale() - Vec3::ONE).length() > 1e-3);

        assert!(!anim.apply(&mut target, start + Duration::from_millis(500)));
        assert_eq!(surface.scale(), Vec3::ONE);
    }

    #[test]
    fn state_sample_reaches_target() {
        let axis = AxisAnimation::absolute(0.0_f32, 0.25)
            .with_timing(0.5, 0.0)
            .with_easing(EasingFunction::Linear);
        let end = sample_axis(&axis, AnimationType::State, 1.0, Duration::from_secs(1));
        assert!((end - 0.25).abs() < 1e-6);
        let mid = sample_axis(&axis, AnimationType::State, 1.0, Duration::from_millis(250));
        assert!((mid - 0.625).abs() < 1e-4);
    }
}
