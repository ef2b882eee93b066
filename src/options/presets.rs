use std::path::PathBuf;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Where animation presets come from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Presets", inline)]
#[serde(default)]
pub struct PresetOptions {
    /// Start from the built-in Fade/Slide/Zoom presets.
    #[schemars(title = "Load Built-in Presets")]
    pub load_builtins: bool,
    /// Directory laid out as `<animation type>/<category>/<name>.toml`,
    /// loaded on top of the built-ins.
    #[schemars(skip)]
    pub directory: Option<PathBuf>,
}

impl Default for PresetOptions {
    fn default() -> Self {
        Self {
            load_builtins: true,
            directory: None,
        }
    }
}
