//! Per-container configuration.

use std::fmt;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::ViewError;
use crate::host::TargetOrientation;

/// `(category, name)` address of a view. Not unique: every view sharing an
/// identity is driven together by the registry's bulk operations.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ViewIdentity {
    /// Category, e.g. `"General"`.
    pub category: String,
    /// Name within the category, e.g. `"Panel"`.
    pub name: String,
}

impl ViewIdentity {
    /// Category used when none is configured.
    pub const DEFAULT_CATEGORY: &'static str = "Uncategorized";
    /// Name used when none is configured.
    pub const DEFAULT_NAME: &'static str = "Unnamed";

    /// Identity from a category and a name.
    #[must_use]
    pub fn new(category: &str, name: &str) -> Self {
        Self {
            category: category.to_owned(),
            name: name.to_owned(),
        }
    }

    /// Whether this identity is `category/name`.
    #[must_use]
    pub fn matches(&self, category: &str, name: &str) -> bool {
        self.category == category && self.name == name
    }
}

impl Default for ViewIdentity {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CATEGORY, Self::DEFAULT_NAME)
    }
}

impl fmt::Display for ViewIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.category, self.name)
    }
}

/// What a view does when it is registered.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum StartBehavior {
    /// Leave the container as it is: visible.
    #[default]
    DoNothing,
    /// Hide instantly.
    Hide,
    /// Hide instantly, then play the show animation.
    PlayShowAnimation,
}

impl TryFrom<u8> for StartBehavior {
    type Error = ViewError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::DoNothing),
            1 => Ok(Self::Hide),
            2 => Ok(Self::PlayShowAnimation),
            _ => Err(ViewError::InvalidEnum {
                kind: "StartBehavior",
                value,
            }),
        }
    }
}

/// Everything about a view that is not an animation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
#[allow(clippy::struct_excessive_bools)]
pub struct ViewSettings {
    /// Registry address.
    pub identity: ViewIdentity,
    /// Behavior at registration.
    pub start_behavior: StartBehavior,
    /// Device orientation the view may be shown in.
    pub target_orientation: TargetOrientation,
    /// Hide automatically some time after a show completes.
    pub auto_hide_after_show: bool,
    /// Seconds between the show completing and the automatic hide.
    pub auto_hide_delay: f32,
    /// Interactive element to select once the view is shown.
    pub auto_select_on_show: Option<String>,
    /// Clear the selection once the view is hidden.
    pub deselect_on_hide: bool,
    /// Stop drawing the container once hidden.
    pub disable_drawing_when_hidden: bool,
    /// Stop hit-testing the container once hidden.
    pub disable_raycast_when_hidden: bool,
    /// Deactivate the whole container once hidden.
    pub deactivate_when_hidden: bool,
    /// Start the loop behavior once a show completes.
    pub auto_start_loop_after_show: bool,
    /// Resting position to use instead of the container's position at
    /// construction.
    pub custom_start_position: Option<Vec3>,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            identity: ViewIdentity::default(),
            start_behavior: StartBehavior::default(),
            target_orientation: TargetOrientation::default(),
            auto_hide_after_show: false,
            auto_hide_delay: 3.0,
            auto_select_on_show: None,
            deselect_on_hide: false,
            disable_drawing_when_hidden: true,
            disable_raycast_when_hidden: true,
            deactivate_when_hidden: false,
            auto_start_loop_after_show: false,
            custom_start_position: None,
        }
    }
}

impl ViewSettings {
    /// Default settings for `category/name`.
    #[must_use]
    pub fn named(category: &str, name: &str) -> Self {
        Self {
            identity: ViewIdentity::new(category, name),
            ..Self::default()
        }
    }

    /// Whether the container is touched at all after a hide completes.
    #[must_use]
    pub fn deactivates_when_hidden(&self) -> bool {
        self.disable_drawing_when_hidden
            || self.disable_raycast_when_hidden
            || self.deactivate_when_hidden
    }
}
