// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Complexity limits
#![deny(clippy::cognitive_complexity)]
#![deny(clippy::too_many_lines)]
#![deny(clippy::excessive_nesting)]
// Function signature hygiene
#![deny(clippy::too_many_arguments)]
#![deny(clippy::fn_params_excessive_bools)]
// Clone / pass-by-value hygiene
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::implicit_clone)]
// String hygiene
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::redundant_closure_for_method_calls)]
#![deny(clippy::manual_string_new)]
#![deny(clippy::str_to_string)]
// Cargo lints (warn, not deny since cargo lints can be noisy)
#![warn(clippy::cargo)]
// Unused / redundant code
#![deny(unused_results)]
#![deny(unused_qualifications)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]

//! Visibility orchestration for animated UI views.
//!
//! viewkit drives the show/hide life cycle of UI containers (menus, popups,
//! panels, HUD elements): a four-state machine per container, per-frame
//! interpolation of position, rotation, scale and opacity, side-effect
//! bundles fired around each transition, and a registry that addresses
//! containers by `category/name` for bulk operations.
//!
//! # Key entry points
//!
//! - [`registry::ViewRegistry`] - owns every view and ticks them once per
//!   frame
//! - [`view::VisibilityOrchestrator`] - the state machine for one container
//! - [`behavior::BehaviorSpec`] - an animation plus its OnStart/OnFinished
//!   actions
//! - [`options::Options`] - process-wide policy, loadable from TOML
//!
//! # Architecture
//!
//! Everything runs on the host's UI thread. A show or hide creates a
//! suspended transition that the registry resumes on each
//! [`tick`](registry::ViewRegistry::tick); starting the opposite transition
//! cancels it and starts the new one from the beginning. Callbacks never call
//! back into the registry: they queue [`registry::command::ViewCommand`]s,
//! which the registry runs once the current operation has returned.
//!
//! The host plugs in through [`host`]: a clock, an orientation provider, a
//! selection handler and an interaction gate, plus a
//! [`view::ViewSurface`] per container and an
//! [`behavior::actions::EffectSink`] for sounds and events.

pub mod animation;
pub mod behavior;
pub mod error;
pub mod host;
pub mod options;
pub mod registry;
pub mod util;
pub mod view;
