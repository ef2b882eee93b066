//! Time-driven animation of a container's transform.
//!
//! [`tween`] interpolates one value; [`axis`] describes one of the four
//! sub-animations (move, rotate, scale, fade); [`spec`] bundles the four;
//! [`ambient`] plays the Loop and Punch kinds, which oscillate around the
//! baseline instead of running from one endpoint to another.

pub mod ambient;
pub mod axis;
pub mod spec;
pub mod tween;

pub use ambient::AmbientAnimation;
pub use axis::AxisAnimation;
pub use spec::{AnimationSpec, AnimationType};
pub use tween::{Animatable, CancelToken, Tween};
