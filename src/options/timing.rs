use std::time::Duration;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::animation::axis::secs;

/// Non-animation waits and scheduling limits.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Timing", inline)]
#[serde(default)]
pub struct TimingOptions {
    /// Seconds between the end of a hide and the container being
    /// deactivated. Deactivating on the very frame the hide ends can clip
    /// its last rendered frame on some platforms.
    #[schemars(title = "Hide Grace Buffer", range(min = 0.0, max = 1.0), extend("step" = 0.01))]
    pub hide_grace_seconds: f32,
    /// How many times the registry re-drains its deferred command queue
    /// after one operation before dropping what is left. Guards against
    /// callbacks that keep re-queueing each other.
    #[schemars(title = "Max Command Passes", range(min = 1, max = 1024))]
    pub max_command_passes: u32,
}

impl Default for TimingOptions {
    fn default() -> Self {
        Self {
            hide_grace_seconds: 0.05,
            max_command_passes: 64,
        }
    }
}

impl TimingOptions {
    /// Grace buffer as a [`Duration`].
    #[must_use]
    pub fn hide_grace(&self) -> Duration {
        secs(self.hide_grace_seconds)
    }
}
