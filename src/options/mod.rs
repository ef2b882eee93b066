//! Process-wide view policy with TOML profile support.
//!
//! Per-container configuration lives in
//! [`ViewSettings`](crate::view::settings::ViewSettings); these options are
//! the knobs shared by every view in a registry. Every section uses
//! `#[serde(default)]` so partial TOML files work.

mod interaction;
mod presets;
mod timing;

use std::path::Path;

pub use interaction::InteractionOptions;
pub use presets::PresetOptions;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
pub use timing::TimingOptions;

use crate::behavior::presets::PresetLibrary;
use crate::error::ViewError;

/// Top-level options container.
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Default, JsonSchema,
)]
#[serde(default)]
pub struct Options {
    /// Input gating while animating.
    pub interaction: InteractionOptions,
    /// Grace buffers and scheduling limits.
    pub timing: TimingOptions,
    /// Preset sources.
    pub presets: PresetOptions,
}

impl Options {
    /// Generate JSON Schema describing the options.
    #[must_use]
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Options)
    }

    /// The JSON Schema, pretty-printed.
    pub fn schema_json() -> Result<String, ViewError> {
        serde_json::to_string_pretty(&Self::json_schema())
            .map_err(|e| ViewError::OptionsParse(e.to_string()))
    }

    /// Load options from a TOML file. Missing fields use defaults.
    pub fn load(path: &Path) -> Result<Self, ViewError> {
        let content = std::fs::read_to_string(path).map_err(ViewError::Io)?;
        toml::from_str(&content)
            .map_err(|e| ViewError::OptionsParse(e.to_string()))
    }

    /// Save options to a TOML file (pretty-printed).
    pub fn save(&self, path: &Path) -> Result<(), ViewError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ViewError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(ViewError::Io)?;
        }
        std::fs::write(path, content).map_err(ViewError::Io)
    }

    /// List available option profiles (TOML file stems) in a directory.
    #[must_use]
    pub fn list_presets(dir: &Path) -> Vec<String> {
        let mut names = Vec::new();
        if let Ok(entries) = std::fs::read_dir(dir) {
            for entry in entries.flatten() {
                let path = entry.path();
                if path.extension().is_some_and(|ext| ext == "toml") {
                    if let Some(stem) =
                        path.file_stem().and_then(|s| s.to_str())
                    {
                        names.push(stem.to_owned());
                    }
                }
            }
        }
        names.sort();
        names
    }

    /// Build the preset library these options describe: the built-ins when
    /// enabled, then the preset directory on top.
    pub fn preset_library(&self) -> Result<PresetLibrary, ViewError> {
        let mut library = if self.presets.load_builtins {
            PresetLibrary::with_builtins()
        } else {
            PresetLibrary::new()
        };
        if let Some(dir) = &self.presets.directory {
            let _ = library.load_dir(dir)?;
        }
        Ok(library)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_round_trips_through_toml() {
        let opts = Options::default();
        let toml_str = toml::to_string_pretty(&opts).unwrap();
        let parsed: Options = toml::from_str(&toml_str).unwrap();
        assert_eq!(opts, parsed);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let toml_str = r"
[timing]
hide_grace_seconds = 0.1
";
        let opts: Options = toml::from_str(toml_str).unwrap();
        assert_eq!(opts.timing.hide_grace_seconds, 0.1);
        // Everything else should be default
        assert_eq!(opts.timing.max_command_passes, 64);
        assert!(opts.interaction.disable_interactions_while_animating);
        assert!(opts.presets.load_builtins);
    }

    #[test]
    fn save_load_and_list_profiles() {
        let dir = std::env::temp_dir()
            .join(format!("viewkit-options-{}", std::process::id()));
        let mut opts = Options::default();
        opts.interaction.disable_interactions_while_animating = false;
        opts.save(&dir.join("quiet.toml")).unwrap();
        Options::default().save(&dir.join("default.toml")).unwrap();

        assert_eq!(Options::load(&dir.join("quiet.toml")).unwrap(), opts);
        assert_eq!(Options::list_presets(&dir), vec!["default", "quiet"]);
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn bad_toml_is_an_options_error() {
        let dir = std::env::temp_dir()
            .join(format!("viewkit-options-bad-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("broken.toml");
        std::fs::write(&path, "[timing]\nmax_command_passes = \"lots\"").unwrap();
        assert!(matches!(
            Options::load(&path),
            Err(ViewError::OptionsParse(_))
        ));
        assert!(matches!(
            Options::load(&dir.join("missing.toml")),
            Err(ViewError::Io(_))
        ));
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn preset_library_honors_builtin_switch() {
        let mut opts = Options::default();
        assert!(!opts.preset_library().unwrap().is_empty());
        opts.presets.load_builtins = false;
        assert!(opts.preset_library().unwrap().is_empty());
    }

    #[test]
    fn schema_has_expected_properties() {
        let schema_value =
            serde_json::to_value(Options::json_schema()).unwrap();
        let props = schema_value["properties"].as_object().unwrap();

        assert!(props.contains_key("interaction"));
        assert!(props.contains_key("timing"));
        assert!(props.contains_key("presets"));

        let presets = &props["presets"]["properties"];
        assert!(presets.get("load_builtins").is_some());
        assert!(presets.get("directory").is_none());

        assert!(Options::schema_json().unwrap().contains("hide_grace_seconds"));
    }
}
