//! Visibility state machine vocabulary.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Where a container is in its show/hide cycle.
///
/// `Showing` and `Hiding` are transient: they resolve to `Visible` and
/// `NotVisible`, or are replaced by the opposite transition.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum VisibilityState {
    /// Fully shown. Progress is 1.
    #[default]
    Visible,
    /// Fully hidden. Progress is 0.
    NotVisible,
    /// Show animation running.
    Showing,
    /// Hide animation running.
    Hiding,
}

impl VisibilityState {
    /// Whether the state is `Visible` or `Showing`: the container is or is
    /// about to be on screen, and belongs in the registry's visible set.
    #[must_use]
    pub fn is_shown_or_showing(self) -> bool {
        matches!(self, Self::Visible | Self::Showing)
    }

    /// Whether the state is `Showing` or `Hiding`.
    #[must_use]
    pub fn is_transient(self) -> bool {
        matches!(self, Self::Showing | Self::Hiding)
    }
}

impl fmt::Display for VisibilityState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Visible => "visible",
            Self::NotVisible => "not visible",
            Self::Showing => "showing",
            Self::Hiding => "hiding",
        })
    }
}

/// Direction of a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Towards `Visible`.
    Show,
    /// Towards `NotVisible`.
    Hide,
}

impl Direction {
    /// The opposite direction.
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::Show => Self::Hide,
            Self::Hide => Self::Show,
        }
    }

    /// Lowercase verb, used in diagnostics.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Show => "show",
            Self::Hide => "hide",
        }
    }

    /// State while the transition runs.
    #[must_use]
    pub fn transient_state(self) -> VisibilityState {
        match self {
            Self::Show => VisibilityState::Showing,
            Self::Hide => VisibilityState::Hiding,
        }
    }

    /// State once the transition resolves.
    #[must_use]
    pub fn resting_state(self) -> VisibilityState {
        match self {
            Self::Show => VisibilityState::Visible,
            Self::Hide => VisibilityState::NotVisible,
        }
    }

    /// Progress once the transition resolves.
    #[must_use]
    pub fn resting_progress(self) -> f32 {
        match self {
            Self::Show => 1.0,
            Self::Hide => 0.0,
        }
    }

    /// Progress after fraction `t` of a transition. Every transition starts
    /// at the opposite resting progress.
    #[must_use]
    pub fn progress(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Show => t,
            Self::Hide => 1.0 - t,
        }
    }
}

/// Progress notification sent to listeners.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressEvent {
    /// Visibility progress in `[0, 1]`; 1 is fully visible.
    pub progress: f32,
    /// `1 - progress`.
    pub inverse: f32,
}

impl ProgressEvent {
    /// Event for `progress`.
    #[must_use]
    pub fn new(progress: f32) -> Self {
        Self {
            progress,
            inverse: 1.0 - progress,
        }
    }
}

/// What a show/hide request did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum TransitionOutcome {
    /// An animated transition is now running.
    Started,
    /// The transition ran to completion synchronously.
    Completed,
    /// Already in the requested resting state; nothing changed.
    Unchanged,
    /// A transition in the same direction is already running.
    InProgress,
    /// The animation has no enabled axis and the call was not instant.
    NoAnimation,
    /// The view's target orientation does not match the device.
    OrientationBlocked,
    /// The view id no longer refers to a live view.
    Missing,
}

impl TransitionOutcome {
    /// Whether the request changed anything.
    #[must_use]
    pub fn changed(self) -> bool {
        matches!(self, Self::Started | Self::Completed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_follows_elapsed_fraction() {
        assert_eq!(Direction::Show.progress(0.25), 0.25);
        assert_eq!(Direction::Hide.progress(0.25), 0.75);
        assert_eq!(Direction::Hide.progress(2.0), 0.0);
        assert_eq!(Direction::Show.progress(-1.0), 0.0);
    }

    #[test]
    fn direction_states() {
        assert_eq!(Direction::Show.opposite(), Direction::Hide);
        assert_eq!(Direction::Hide.transient_state(), VisibilityState::Hiding);
        assert_eq!(Direction::Show.resting_state(), VisibilityState::Visible);
        assert!(VisibilityState::Showing.is_shown_or_showing());
        assert!(!VisibilityState::Hiding.is_shown_or_showing());
    }
}
