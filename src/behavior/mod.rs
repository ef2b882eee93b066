//! Show, hide and loop behaviors: an animation plus the side effects fired
//! around it.

pub mod actions;
pub mod presets;

use serde::{Deserialize, Serialize};

use self::actions::ActionBundle;
use self::presets::PresetStore;
use crate::animation::{AnimationSpec, AnimationType};

/// One behavior of a view.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BehaviorSpec {
    /// The animation to play.
    pub animation: AnimationSpec,
    /// Fired when the behavior starts (after its start delay when animated).
    pub on_start: ActionBundle,
    /// Fired when the behavior finishes.
    pub on_finished: ActionBundle,
    /// Always run this behavior without animating.
    pub instant_animation: bool,
    /// Replace `animation` with the named preset when the view is registered.
    pub load_preset_at_runtime: bool,
    /// Preset category.
    pub preset_category: String,
    /// Preset name.
    pub preset_name: String,
}

impl Default for BehaviorSpec {
    fn default() -> Self {
        Self::new(AnimationType::Show)
    }
}

impl BehaviorSpec {
    /// Default behavior for `kind`: its default animation and no actions.
    #[must_use]
    pub fn new(kind: AnimationType) -> Self {
        Self {
            animation: AnimationSpec::for_type(kind),
            on_start: ActionBundle::new(),
            on_finished: ActionBundle::new(),
            instant_animation: false,
            load_preset_at_runtime: false,
            preset_category: String::new(),
            preset_name: String::new(),
        }
    }

    /// Behavior playing `animation`.
    #[must_use]
    pub fn with_animation(animation: AnimationSpec) -> Self {
        Self {
            animation,
            ..Self::new(AnimationType::Show)
        }
    }

    /// Load `preset_category/preset_name` at registration.
    #[must_use]
    pub fn with_preset(mut self, category: &str, name: &str) -> Self {
        self.load_preset_at_runtime = true;
        category.clone_into(&mut self.preset_category);
        name.clone_into(&mut self.preset_name);
        self
    }

    /// Fire `bundle` when the behavior starts.
    #[must_use]
    pub fn on_start(mut self, bundle: ActionBundle) -> Self {
        self.on_start = bundle;
        self
    }

    /// Fire `bundle` when the behavior finishes.
    #[must_use]
    pub fn on_finished(mut self, bundle: ActionBundle) -> Self {
        self.on_finished = bundle;
        self
    }

    /// Replace the animation with the configured preset, keeping the
    /// animation type. Returns whether the preset was found; a miss keeps
    /// the current animation.
    pub fn load_preset(&mut self, store: &dyn PresetStore) -> bool {
        let kind = self.animation.animation_type;
        match store.load(kind, &self.preset_category, &self.preset_name) {
            Some(mut spec) => {
                spec.animation_type = kind;
                self.animation = spec;
                true
            }
            None => {
                log::warn!(
                    "{kind} preset '{}/{}' not found; keeping the configured \
                     animation",
                    self.preset_category,
                    self.preset_name
                );
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::behavior::presets::PresetLibrary;

    #[test]
    fn defaults_follow_animation_type() {
        let hide = BehaviorSpec::new(AnimationType::Hide);
        assert_eq!(hide.animation.animation_type, AnimationType::Hide);
        assert_eq!(hide.animation.fade.to, 0.0);
        assert!(hide.on_start.is_empty());
        assert!(!hide.load_preset_at_runtime);
    }

    #[test]
    fn preset_replaces_animation_but_keeps_kind() {
        let library = PresetLibrary::with_builtins();
        let mut behavior =
            BehaviorSpec::new(AnimationType::Show).with_preset("Zoom", "In");
        assert!(behavior.load_preset(&library));
        assert!(behavior.animation.scale.enabled);
        assert_eq!(behavior.animation.animation_type, AnimationType::Show);
    }

    #[test]
    fn missing_preset_keeps_animation() {
        let library = PresetLibrary::new();
        let mut behavior =
            BehaviorSpec::new(AnimationType::Hide).with_preset("Nope", "Gone");
        let before = behavior.animation.clone();
        assert!(!behavior.load_preset(&library));
        assert_eq!(behavior.animation, before);
    }

    #[test]
    fn behavior_reads_from_toml() {
        let behavior: BehaviorSpec = toml::from_str(
            r#"
instant_animation = true

[animation]
animation_type = "hide"

[[on_finished.actions]]
kind = "sound"
name = "whoosh"
"#,
        )
        .unwrap();
        assert!(behavior.instant_animation);
        assert_eq!(behavior.animation.animation_type, AnimationType::Hide);
        assert_eq!(behavior.on_finished.actions.len(), 1);
    }
}
