//! Declarative bundle of the four sub-animations a view can play.

use std::fmt;
use std::time::Duration;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::axis::AxisAnimation;
use crate::error::ViewError;
use crate::util::easing::EasingFunction;

/// What an [`AnimationSpec`] is used for. Decides how axis endpoints are
/// resolved against the baseline.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum AnimationType {
    /// Container appears: absolute or relative `from -> to`.
    #[default]
    Show,
    /// Container disappears: absolute or relative `from -> to`.
    Hide,
    /// Ambient ping-pong around the baseline by `by`.
    Loop,
    /// One-shot decaying oscillation around the baseline by `by`.
    Punch,
    /// Tween from the baseline to a target state `to`.
    State,
}

impl AnimationType {
    /// Every variant, in raw-value order.
    pub const ALL: [Self; 5] =
        [Self::Show, Self::Hide, Self::Loop, Self::Punch, Self::State];

    /// Lowercase name, also used as the preset directory name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Show => "show",
            Self::Hide => "hide",
            Self::Loop => "loop",
            Self::Punch => "punch",
            Self::State => "state",
        }
    }
}

impl fmt::Display for AnimationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<u8> for AnimationType {
    type Error = ViewError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::ALL
            .get(usize::from(value))
            .copied()
            .ok_or(ViewError::InvalidEnum {
                kind: "AnimationType",
                value,
            })
    }
}

/// Four independently-enabled sub-animations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationSpec {
    /// How endpoints are resolved.
    pub animation_type: AnimationType,
    /// Move. Vec3 position.
    pub position: AxisAnimation<Vec3>,
    /// Rotate. Euler angles in degrees.
    pub rotation: AxisAnimation<Vec3>,
    /// Scale.
    pub scale: AxisAnimation<Vec3>,
    /// Fade. Opacity in `[0, 1]`.
    pub fade: AxisAnimation<f32>,
}

impl Default for AnimationSpec {
    fn default() -> Self {
        Self::for_type(AnimationType::Show)
    }
}

impl AnimationSpec {
    /// Spec with every axis disabled.
    #[must_use]
    pub fn empty(animation_type: AnimationType) -> Self {
        Self {
            animation_type,
            position: AxisAnimation::default(),
            rotation: AxisAnimation::default(),
            scale: AxisAnimation {
                relative: false,
                from: Vec3::ONE,
                to: Vec3::ONE,
                ..AxisAnimation::default()
            },
            fade: AxisAnimation {
                relative: false,
                ..AxisAnimation::default()
            },
        }
    }

    /// Default spec for an animation type.
    ///
    /// Show fades in and Hide fades out over 0.3s; Loop, Punch and State
    /// start with every axis disabled but with usable amplitudes so enabling
    /// an axis is enough to see motion.
    #[must_use]
    pub fn for_type(animation_type: AnimationType) -> Self {
        let base = Self::empty(animation_type);
        match animation_type {
            AnimationType::Show => Self {
                fade: AxisAnimation::absolute(0.0, 1.0).with_timing(0.3, 0.0),
                ..base
            },
            AnimationType::Hide => Self {
                fade: AxisAnimation::absolute(1.0, 0.0).with_timing(0.3, 0.0),
                ..base
            },
            AnimationType::Loop => Self {
                position: AxisAnimation::oscillating(Vec3::new(0.0, 10.0, 0.0))
                    .with_timing(1.0, 0.0)
                    .with_easing(EasingFunction::QuadraticInOut)
                    .disabled(),
                rotation: AxisAnimation::oscillating(Vec3::new(0.0, 0.0, 5.0))
                    .with_timing(1.0, 0.0)
                    .with_easing(EasingFunction::QuadraticInOut)
                    .disabled(),
                scale: AxisAnimation::oscillating(Vec3::splat(0.05))
                    .with_timing(1.0, 0.0)
                    .with_easing(EasingFunction::QuadraticInOut)
                    .disabled(),
                fade: AxisAnimation::oscillating(0.2)
                    .with_timing(1.0, 0.0)
                    .with_easing(EasingFunction::QuadraticInOut)
                    .disabled(),
                ..base
            },
            AnimationType::Punch => Self {
                position: AxisAnimation::oscillating(Vec3::new(0.0, 10.0, 0.0))
                    .with_timing(0.4, 0.0)
                    .disabled(),
                rotation: AxisAnimation::oscillating(Vec3::new(0.0, 0.0, 15.0))
                    .with_timing(0.4, 0.0)
                    .disabled(),
                scale: AxisAnimation::oscillating(Vec3::splat(0.1))
                    .with_timing(0.4, 0.0)
                    .disabled(),
                ..base
            },
            AnimationType::State => base,
        }
    }

    /// Whether at least one axis is enabled.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.position.enabled
            || self.rotation.enabled
            || self.scale.enabled
            || self.fade.enabled
    }

    fn enabled_totals(&self) -> impl Iterator<Item = (Duration, Duration)> {
        [
            (self.position.enabled, self.position.delay_span(), self.position.total()),
            (self.rotation.enabled, self.rotation.delay_span(), self.rotation.total()),
            (self.scale.enabled, self.scale.delay_span(), self.scale.total()),
            (self.fade.enabled, self.fade.delay_span(), self.fade.total()),
        ]
        .into_iter()
        .filter(|(enabled, _, _)| *enabled)
        .map(|(_, delay, total)| (delay, total))
    }

    /// Longest delay + duration over enabled axes; zero when none is enabled.
    #[must_use]
    pub fn total_duration(&self) -> Duration {
        self.enabled_totals()
            .map(|(_, total)| total)
            .max()
            .unwrap_or(Duration::ZERO)
    }

    /// Shortest start delay over enabled axes; zero when none is enabled.
    #[must_use]
    pub fn start_delay(&self) -> Duration {
        self.enabled_totals()
            .map(|(delay, _)| delay)
            .min()
            .unwrap_or(Duration::ZERO)
    }
}
