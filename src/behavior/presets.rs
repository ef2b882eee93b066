//! Named animation presets, loadable at runtime.
//!
//! Presets are plain [`AnimationSpec`]s addressed by animation type,
//! category and name. On disk they live at
//! `<dir>/<animation type>/<category>/<name>.toml`.

use std::path::Path;

use glam::Vec3;
use rustc_hash::FxHashMap;

use crate::animation::{AnimationSpec, AnimationType, AxisAnimation};
use crate::error::ViewError;
use crate::util::easing::EasingFunction;

/// Lookup of named animation specs.
pub trait PresetStore {
    /// The preset `category/name` for `kind`, if one exists. The returned
    /// spec's `animation_type` is always `kind`.
    fn load(
        &self,
        kind: AnimationType,
        category: &str,
        name: &str,
    ) -> Option<AnimationSpec>;
}

type PresetKey = (AnimationType, String, String);

/// In-memory preset collection.
#[derive(Debug, Clone, Default)]
pub struct PresetLibrary {
    presets: FxHashMap<PresetKey, AnimationSpec>,
}

impl PresetLibrary {
    /// Empty library.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Library holding the stock Show/Hide presets (`Fade`, `Slide`,
    /// `Zoom`) and a few Loop/Punch ones.
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut lib = Self::new();
        let quick = |axis: AxisAnimation<Vec3>| {
            axis.with_timing(0.35, 0.0).with_easing(EasingFunction::CubicOut)
        };

        let show = AnimationSpec::for_type(AnimationType::Show);
        lib.insert("Fade", "In", show.clone());
        let mut slide_left = AnimationSpec::empty(AnimationType::Show);
        slide_left.position =
            quick(AxisAnimation::relative(Vec3::new(-800.0, 0.0, 0.0), Vec3::ZERO));
        lib.insert("Slide", "FromLeft", slide_left);
        let mut slide_bottom = AnimationSpec::empty(AnimationType::Show);
        slide_bottom.position =
            quick(AxisAnimation::relative(Vec3::new(0.0, -600.0, 0.0), Vec3::ZERO));
        lib.insert("Slide", "FromBottom", slide_bottom);
        let mut zoom_in = show;
        zoom_in.scale = AxisAnimation::absolute(Vec3::ZERO, Vec3::ONE)
            .with_timing(0.3, 0.0)
            .with_easing(EasingFunction::BackOut { overshoot: 1.70158 });
        lib.insert("Zoom", "In", zoom_in);

        let hide = AnimationSpec::for_type(AnimationType::Hide);
        lib.insert("Fade", "Out", hide.clone());
        let mut slide_right = AnimationSpec::empty(AnimationType::Hide);
        slide_right.position =
            quick(AxisAnimation::relative(Vec3::ZERO, Vec3::new(800.0, 0.0, 0.0)));
        lib.insert("Slide", "ToRight", slide_right);
        let mut zoom_out = hide;
        zoom_out.scale = AxisAnimation::absolute(Vec3::ONE, Vec3::ZERO)
            .with_timing(0.3, 0.0)
            .with_easing(EasingFunction::QuadraticIn);
        lib.insert("Zoom", "Out", zoom_out);

        let mut pulse = AnimationSpec::for_type(AnimationType::Loop);
        pulse.scale.enabled = true;
        lib.insert("Pulse", "Scale", pulse);
        let mut bob = AnimationSpec::for_type(AnimationType::Loop);
        bob.position.enabled = true;
        lib.insert("Bob", "Vertical", bob);

        let mut punch = AnimationSpec::for_type(AnimationType::Punch);
        punch.scale.enabled = true;
        lib.insert("Punch", "Scale", punch);

        lib
    }

    /// Add or replace a preset. Its animation type decides where it is filed.
    pub fn insert(
        &mut self,
        category: impl Into<String>,
        name: impl Into<String>,
        spec: AnimationSpec,
    ) {
        let key = (spec.animation_type, category.into(), name.into());
        let _ = self.presets.insert(key, spec);
    }

    /// Number of presets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.presets.len()
    }

    /// Whether the library is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }

    /// Sorted `(category, name)` pairs available for `kind`.
    #[must_use]
    pub fn names(&self, kind: AnimationType) -> Vec<(String, String)> {
        let mut names: Vec<_> = self
            .presets
            .keys()
            .filter(|(k, _, _)| *k == kind)
            .map(|(_, category, name)| (category.clone(), name.clone()))
            .collect();
        names.sort();
        names
    }

    /// Load every `<kind>/<category>/<name>.toml` under `dir`, adding to or
    /// replacing what the library already holds. Unknown animation-type
    /// directories and non-TOML files are ignored.
    pub fn load_dir(&mut self, dir: &Path) -> Result<usize, ViewError> {
        let mut loaded = 0;
        for kind in AnimationType::ALL {
            let kind_dir = dir.join(kind.as_str());
            if !kind_dir.is_dir() {
                continue;
            }
            for category_entry in std::fs::read_dir(&kind_dir)? {
                let category_path = category_entry?.path();
                let Some(category) = file_name(&category_path) else {
                    continue;
                };
                if !category_path.is_dir() {
                    continue;
                }
                for entry in std::fs::read_dir(&category_path)? {
                    let path = entry?.path();
                    if path.extension().is_none_or(|ext| ext != "toml") {
                        continue;
                    }
                    let Some(name) =
                        path.file_stem().and_then(|s| s.to_str())
                    else {
                        continue;
                    };
                    let content = std::fs::read_to_string(&path)?;
                    let mut spec: AnimationSpec = toml::from_str(&content)
                        .map_err(|e| {
                            ViewError::PresetParse(format!(
                                "{}: {e}",
                                path.display()
                            ))
                        })?;
                    spec.animation_type = kind;
                    self.insert(category.clone(), name, spec);
                    loaded += 1;
                }
            }
        }
        log::info!("loaded {loaded} animation presets from {}", dir.display());
        Ok(loaded)
    }

    /// Write every preset under `dir` in the `load_dir` layout.
    pub fn save_dir(&self, dir: &Path) -> Result<(), ViewError> {
        for ((kind, category, name), spec) in &self.presets {
            let category_dir = dir.join(kind.as_str()).join(category);
            std::fs::create_dir_all(&category_dir)?;
            let content = toml::to_string_pretty(spec)
                .map_err(|e| ViewError::PresetParse(e.to_string()))?;
            std::fs::write(category_dir.join(format!("{name}.toml")), content)?;
        }
        Ok(())
    }
}

fn file_name(path: &Path) -> Option<String> {
    path.file_name().and_then(|s| s.to_str()).map(str::to_owned)
}

impl PresetStore for PresetLibrary {
    fn load(
        &self,
        kind: AnimationType,
        category: &str,
        name: &str,
    ) -> Option<AnimationSpec> {
        self.presets
            .get(&(kind, category.to_owned(), name.to_owned()))
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(tag: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "viewkit-presets-{tag}-{}",
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn builtins_cover_show_and_hide() {
        let lib = PresetLibrary::with_builtins();
        let zoom = lib.load(AnimationType::Show, "Zoom", "In").unwrap();
        assert!(zoom.scale.enabled);
        assert!(zoom.fade.enabled);
        assert!(lib.load(AnimationType::Hide, "Zoom", "In").is_none());
        assert!(lib
            .names(AnimationType::Hide)
            .contains(&("Fade".to_owned(), "Out".to_owned())));
    }

    #[test]
    fn missing_preset_is_none() {
        let lib = PresetLibrary::new();
        assert!(lib.is_empty());
        assert!(lib.load(AnimationType::Show, "Nope", "Nothing").is_none());
    }

    #[test]
    fn save_and_load_dir_round_trip() {
        let dir = scratch_dir("round-trip");
        let lib = PresetLibrary::with_builtins();
        lib.save_dir(&dir).unwrap();

        let mut reloaded = PresetLibrary::new();
        let count = reloaded.load_dir(&dir).unwrap();
        assert_eq!(count, lib.len());
        assert_eq!(
            reloaded.load(AnimationType::Show, "Slide", "FromLeft"),
            lib.load(AnimationType::Show, "Slide", "FromLeft")
        );
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn bad_preset_file_reports_path() {
        let dir = scratch_dir("bad");
        let category = dir.join("show").join("Broken");
        std::fs::create_dir_all(&category).unwrap();
        std::fs::write(category.join("Oops.toml"), "position = 3").unwrap();

        let err = PresetLibrary::new().load_dir(&dir).unwrap_err();
        assert!(err.to_string().contains("Oops.toml"));
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
