use std::cell::Cell;
use std::rc::Rc;

/// Process-wide, reentrant "interactions disabled" counter.
///
/// Every [`disable`](Self::disable) must be paired with an
/// [`enable`](Self::enable); the host treats the UI as interactable only
/// while the count is zero. Clones share the same counter.
#[derive(Debug, Clone, Default)]
pub struct InteractionGate(Rc<Cell<u32>>);

impl InteractionGate {
    /// Gate with no outstanding disables.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one disable.
    pub fn disable(&self) {
        self.0.set(self.0.get().saturating_add(1));
    }

    /// Remove one disable. Never goes below zero.
    pub fn enable(&self) {
        self.0.set(self.0.get().saturating_sub(1));
    }

    /// Outstanding disables.
    #[must_use]
    pub fn count(&self) -> u32 {
        self.0.get()
    }

    /// Whether the UI accepts input.
    #[must_use]
    pub fn is_interactable(&self) -> bool {
        self.count() == 0
    }

    /// Disable until the returned guard is dropped.
    #[must_use]
    pub fn guard(&self) -> GateGuard {
        self.disable();
        GateGuard(self.clone())
    }
}

/// Holds one disable on an [`InteractionGate`]; enables on drop.
#[derive(Debug)]
pub struct GateGuard(InteractionGate);

impl Drop for GateGuard {
    fn drop(&mut self) {
        self.0.enable();
    }
}
