use serde::{Deserialize, Serialize};

use crate::error::ViewError;

/// Detected device orientation.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    /// Taller than wide.
    Portrait,
    /// Wider than tall.
    Landscape,
    /// Not reported yet.
    #[default]
    Unknown,
}

impl TryFrom<u8> for Orientation {
    type Error = ViewError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Portrait),
            1 => Ok(Self::Landscape),
            2 => Ok(Self::Unknown),
            _ => Err(ViewError::InvalidEnum {
                kind: "Orientation",
                value,
            }),
        }
    }
}

/// Orientation a view is designed for.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum TargetOrientation {
    /// Shown in every orientation.
    #[default]
    Any,
    /// Only shown in portrait.
    Portrait,
    /// Only shown in landscape.
    Landscape,
}

impl TargetOrientation {
    /// Whether a view targeting `self` may be visible in `current`.
    /// An unknown orientation never blocks.
    #[must_use]
    pub fn accepts(self, current: Orientation) -> bool {
        match (self, current) {
            (Self::Any, _) | (_, Orientation::Unknown) => true,
            (Self::Portrait, Orientation::Portrait)
            | (Self::Landscape, Orientation::Landscape) => true,
            _ => false,
        }
    }
}

impl TryFrom<u8> for TargetOrientation {
    type Error = ViewError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Any),
            1 => Ok(Self::Portrait),
            2 => Ok(Self::Landscape),
            _ => Err(ViewError::InvalidEnum {
                kind: "TargetOrientation",
                value,
            }),
        }
    }
}

/// Reports the device orientation; polled once per tick.
pub trait OrientationProvider {
    /// The current orientation.
    fn orientation(&self) -> Orientation;
}

/// Provider that always reports the same orientation.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedOrientation(pub Orientation);

impl OrientationProvider for FixedOrientation {
    fn orientation(&self) -> Orientation {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_acceptance() {
        assert!(TargetOrientation::Any.accepts(Orientation::Landscape));
        assert!(TargetOrientation::Portrait.accepts(Orientation::Unknown));
        assert!(TargetOrientation::Portrait.accepts(Orientation::Portrait));
        assert!(!TargetOrientation::Portrait.accepts(Orientation::Landscape));
        assert!(!TargetOrientation::Landscape.accepts(Orientation::Portrait));
    }

    #[test]
    fn out_of_range_raw_values_are_rejected() {
        assert_eq!(Orientation::try_from(1).unwrap(), Orientation::Landscape);
        assert!(Orientation::try_from(3).is_err());
        assert_eq!(
            TargetOrientation::try_from(2).unwrap(),
            TargetOrientation::Landscape
        );
        assert!(matches!(
            TargetOrientation::try_from(7),
            Err(ViewError::InvalidEnum { value: 7, .. })
        ));
    }
}
