//! Easing functions for tween interpolation.
//!
//! Every curve maps `[0, 1]` onto a value that starts at 0 and ends at 1.
//! `BackOut` overshoots above 1 before settling, which is why callers that
//! write opacity clamp the interpolated result themselves.

use serde::{Deserialize, Serialize};

/// Easing function variants for animation curves.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EasingFunction {
    /// Linear interpolation (no easing).
    Linear,
    /// Quadratic ease-in (slow start, fast end).
    QuadraticIn,
    /// Quadratic ease-out (fast start, slow end).
    QuadraticOut,
    /// Quadratic ease-in-out (slow at both ends).
    QuadraticInOut,
    /// Cubic ease-out.
    CubicOut,
    /// Square root ease-out (fast start, gradual slow).
    SqrtOut,
    /// Ease-out that overshoots the target by `overshoot` and settles back.
    BackOut {
        /// Overshoot amount; 1.70158 is the classic value.
        overshoot: f32,
    },
    /// Cubic Hermite interpolation with configurable control points.
    /// Formula: c1·3t(1-t)² + c2·3(1-t)t² + t³
    CubicHermite {
        /// First control point.
        c1: f32,
        /// Second control point.
        c2: f32,
    },
}

impl EasingFunction {
    /// Default easing function: CubicHermite with c1=0.33, c2=1.0 for a
    /// natural ease-out feel.
    pub const DEFAULT: Self = Self::CubicHermite { c1: 0.33, c2: 1.0 };

    /// Evaluate the easing function at time t.
    ///
    /// Input t is clamped to [0.0, 1.0].
    #[inline]
    #[must_use]
    pub fn evaluate(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);

        match *self {
            Self::Linear => t,
            Self::QuadraticIn => t * t,
            Self::QuadraticOut => {
                let omt = 1.0 - t;
                1.0 - omt * omt
            }
            Self::QuadraticInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    let u = -2.0 * t + 2.0;
                    1.0 - u * u / 2.0
                }
            }
            Self::CubicOut => {
                let omt = 1.0 - t;
                1.0 - omt * omt * omt
            }
            Self::SqrtOut => t.sqrt(),
            Self::BackOut { overshoot } => {
                let u = t - 1.0;
                1.0 + (overshoot + 1.0) * u * u * u + overshoot * u * u
            }
            Self::CubicHermite { c1, c2 } => {
                // f(t) = c0(1-t)³ + c1·3t(1-t)² + c2·3(1-t)t² + c3·t³
                // where c0=0.0, c3=1.0
                let omt = 1.0 - t;
                c1 * 3.0 * t * omt * omt + c2 * 3.0 * omt * t * t + t * t * t
            }
        }
    }
}

impl Default for EasingFunction {
    #[inline]
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_endpoints() {
        let linear = EasingFunction::Linear;
        assert_eq!(linear.evaluate(0.0), 0.0);
        assert_eq!(linear.evaluate(0.5), 0.5);
        assert_eq!(linear.evaluate(1.0), 1.0);
    }

    #[test]
    fn test_cubic_hermite_ease_out_shape() {
        let hermite = EasingFunction::DEFAULT;
        assert_eq!(hermite.evaluate(0.0), 0.0);
        assert!((hermite.evaluate(1.0) - 1.0).abs() < 1e-6);
        let result_at_quarter = hermite.evaluate(0.25);
        assert!(
            result_at_quarter > 0.25,
            "Ease-out should have value > 0.25 at t=0.25, got {result_at_quarter}"
        );
    }

    #[test]
    fn test_input_clamping() {
        let linear = EasingFunction::Linear;
        assert_eq!(linear.evaluate(-0.5), 0.0);
        assert_eq!(linear.evaluate(1.5), 1.0);

        let quad = EasingFunction::QuadraticInOut;
        assert_eq!(quad.evaluate(-3.0), 0.0);
        assert_eq!(quad.evaluate(3.0), 1.0);
    }

    #[test]
    fn test_quadratic_variants() {
        assert_eq!(EasingFunction::QuadraticIn.evaluate(0.5), 0.25);
        assert_eq!(EasingFunction::QuadraticOut.evaluate(0.5), 0.75);
        assert_eq!(EasingFunction::QuadraticInOut.evaluate(0.5), 0.5);
        assert!(EasingFunction::QuadraticInOut.evaluate(0.25) < 0.25);
    }

    #[test]
    fn test_back_out_overshoots_then_settles() {
        let back = EasingFunction::BackOut { overshoot: 1.70158 };
        assert!(back.evaluate(0.0).abs() < 1e-6);
        assert!(back.evaluate(0.7) > 1.0);
        assert!((back.evaluate(1.0) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cubic_out_and_sqrt_out() {
        assert_eq!(EasingFunction::CubicOut.evaluate(0.5), 0.875);
        assert!((EasingFunction::SqrtOut.evaluate(0.25) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn serializes_as_snake_case() {
        #[derive(Serialize, Deserialize)]
        struct Wrapper {
            easing: EasingFunction,
        }
        let text = toml::to_string(&Wrapper {
            easing: EasingFunction::QuadraticOut,
        })
        .unwrap();
        assert!(text.contains("quadratic_out"));
        let parsed: Wrapper = toml::from_str("easing = \"sqrt_out\"").unwrap();
        assert_eq!(parsed.easing, EasingFunction::SqrtOut);
    }
}
