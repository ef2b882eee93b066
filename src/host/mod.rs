//! Capabilities the host application injects into the view system.
//!
//! Time, device orientation, selection of interactive elements and the
//! global "interactions disabled" gate are all owned by the host; the
//! registry only sees them through these types.

mod clock;
mod gate;
mod orientation;

pub use clock::{Clock, ManualClock, SystemClock};
pub use gate::{GateGuard, InteractionGate};
pub use orientation::{
    FixedOrientation, Orientation, OrientationProvider, TargetOrientation,
};

/// Selection of interactive elements (buttons, fields) inside views.
pub trait SelectionHandler {
    /// Select the element identified by `target`.
    fn select(&mut self, target: &str);
    /// Clear the current selection.
    fn clear_selection(&mut self);
    /// Identifier of the currently selected element, if any.
    fn selected(&self) -> Option<String>;
}

/// Selection handler that only remembers what was selected.
#[derive(Debug, Clone, Default)]
pub struct TrackedSelection {
    current: Option<String>,
}

impl SelectionHandler for TrackedSelection {
    fn select(&mut self, target: &str) {
        log::debug!("select '{target}'");
        self.current = Some(target.to_owned());
    }

    fn clear_selection(&mut self) {
        self.current = None;
    }

    fn selected(&self) -> Option<String> {
        self.current.clone()
    }
}
