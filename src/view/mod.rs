//! One animated UI container: its surface, configuration and state machine.

pub mod orchestrator;
pub mod settings;
pub mod state;
pub mod surface;
pub(crate) mod transition;

pub use orchestrator::{ViewContext, VisibilityOrchestrator};
pub use settings::{StartBehavior, ViewIdentity, ViewSettings};
pub use state::{Direction, ProgressEvent, TransitionOutcome, VisibilityState};
pub use surface::{Baseline, MemorySurface, SurfaceState, ViewSurface};
