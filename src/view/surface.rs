//! The container a view animates, as seen through the host framework.

use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Transform and drawing controls of one UI container.
///
/// The orchestrator reads and writes these properties and never touches a
/// concrete engine type. Only the four transform properties are required;
/// the activation hooks default to no-ops for hosts that do not support them.
pub trait ViewSurface {
    /// Current position.
    fn position(&self) -> Vec3;
    /// Set the position.
    fn set_position(&mut self, position: Vec3);
    /// Current rotation (euler angles, degrees).
    fn rotation(&self) -> Vec3;
    /// Set the rotation (euler angles, degrees).
    fn set_rotation(&mut self, rotation: Vec3);
    /// Current scale.
    fn scale(&self) -> Vec3;
    /// Set the scale.
    fn set_scale(&mut self, scale: Vec3);
    /// Current opacity in `[0, 1]`.
    fn opacity(&self) -> f32;
    /// Set the opacity.
    fn set_opacity(&mut self, opacity: f32);

    /// Activate or deactivate the whole container.
    fn set_active(&mut self, _active: bool) {}
    /// Enable or disable drawing of the container.
    fn set_drawing_enabled(&mut self, _enabled: bool) {}
    /// Enable or disable hit-testing (raycasts) on the container.
    fn set_raycast_enabled(&mut self, _enabled: bool) {}
    /// Whether the container still belongs to a live scene. Detached
    /// containers are skipped by bulk operations.
    fn is_attached(&self) -> bool {
        true
    }
    /// Whether other views are nested beneath this container.
    fn has_nested_views(&self) -> bool {
        false
    }
}

/// Resting values a container returns to when an axis is disabled or an
/// instant transition is requested.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Baseline {
    /// Resting position.
    pub position: Vec3,
    /// Resting rotation (euler angles, degrees).
    pub rotation: Vec3,
    /// Resting scale.
    pub scale: Vec3,
    /// Resting opacity.
    pub alpha: f32,
}

impl Default for Baseline {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
            alpha: 1.0,
        }
    }
}

impl Baseline {
    /// Capture the current values of `surface`.
    #[must_use]
    pub fn capture(surface: &dyn ViewSurface) -> Self {
        Self {
            position: surface.position(),
            rotation: surface.rotation(),
            scale: surface.scale(),
            alpha: surface.opacity(),
        }
    }

    /// Write all four values to `surface`.
    pub fn apply(&self, surface: &mut dyn ViewSurface) {
        surface.set_position(self.position);
        surface.set_rotation(self.rotation);
        surface.set_scale(self.scale);
        surface.set_opacity(self.alpha);
    }
}

/// Observable state of a [`MemorySurface`].
#[derive(Debug, Clone, PartialEq)]
#[allow(clippy::struct_excessive_bools)]
pub struct SurfaceState {
    /// Transform values.
    pub transform: Baseline,
    /// Container active flag.
    pub active: bool,
    /// Drawing enabled flag.
    pub drawing: bool,
    /// Raycast enabled flag.
    pub raycast: bool,
    /// Attached to a live scene.
    pub attached: bool,
    /// Has nested views.
    pub nested_views: bool,
}

impl Default for SurfaceState {
    fn default() -> Self {
        Self {
            transform: Baseline::default(),
            active: true,
            drawing: true,
            raycast: true,
            attached: true,
            nested_views: false,
        }
    }
}

/// Headless surface backed by shared memory.
///
/// Clones share state, so a host (or a test) can keep one clone to observe a
/// container after handing another to the orchestrator.
#[derive(Debug, Clone, Default)]
pub struct MemorySurface(Rc<RefCell<SurfaceState>>);

impl MemorySurface {
    /// Surface at the default transform, active and drawing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Surface at a given position.
    #[must_use]
    pub fn at(position: Vec3) -> Self {
        let surface = Self::new();
        surface.0.borrow_mut().transform.position = position;
        surface
    }

    /// Snapshot of the current state.
    #[must_use]
    pub fn state(&self) -> SurfaceState {
        self.0.borrow().clone()
    }

    /// Mark the container attached/detached from its scene.
    pub fn set_attached(&self, attached: bool) {
        self.0.borrow_mut().attached = attached;
    }

    /// Declare whether views are nested beneath this container.
    pub fn set_nested_views(&self, nested: bool) {
        self.0.borrow_mut().nested_views = nested;
    }
}

impl ViewSurface for MemorySurface {
    fn position(&self) -> Vec3 {
        self.0.borrow().transform.position
    }

    fn set_position(&mut self, position: Vec3) {
        self.0.borrow_mut().transform.position = position;
    }

    fn rotation(&self) -> Vec3 {
        self.0.borrow().transform.rotation
    }

    fn set_rotation(&mut self, rotation: Vec3) {
        self.0.borrow_mut().transform.rotation = rotation;
    }

    fn scale(&self) -> Vec3 {
        self.0.borrow().transform.scale
    }

    fn set_scale(&mut self, scale: Vec3) {
        self.0.borrow_mut().transform.scale = scale;
    }

    fn opacity(&self) -> f32 {
        self.0.borrow().transform.alpha
    }

    fn set_opacity(&mut self, opacity: f32) {
        self.0.borrow_mut().transform.alpha = opacity;
    }

    fn set_active(&mut self, active: bool) {
        self.0.borrow_mut().active = active;
    }

    fn set_drawing_enabled(&mut self, enabled: bool) {
        self.0.borrow_mut().drawing = enabled;
    }

    fn set_raycast_enabled(&mut self, enabled: bool) {
        self.0.borrow_mut().raycast = enabled;
    }

    fn is_attached(&self) -> bool {
        self.0.borrow().attached
    }

    fn has_nested_views(&self) -> bool {
        self.0.borrow().nested_views
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_state() {
        let observer = MemorySurface::at(Vec3::X);
        let mut handed_out = observer.clone();
        handed_out.set_opacity(0.25);
        handed_out.set_drawing_enabled(false);

        let state = observer.state();
        assert_eq!(state.transform.alpha, 0.25);
        assert_eq!(state.transform.position, Vec3::X);
        assert!(!state.drawing);
    }

    #[test]
    fn baseline_capture_and_apply() {
        let mut surface = MemorySurface::at(Vec3::new(5.0, 6.0, 0.0));
        let baseline = Baseline::capture(&surface);

        surface.set_position(Vec3::ZERO);
        surface.set_scale(Vec3::splat(3.0));
        baseline.apply(&mut surface);

        assert_eq!(surface.position(), Vec3::new(5.0, 6.0, 0.0));
        assert_eq!(surface.scale(), Vec3::ONE);
    }
}
