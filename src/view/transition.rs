//! The suspended show/hide interpolation loop.
//!
//! A [`TransitionTask`] is created by a show or hide request and resumed once
//! per frame until its longest axis has finished. Every resumption writes
//! all of its property values synchronously, so cancelling between two
//! resumptions never leaves a half-written transform.

use std::time::Duration;

use glam::Vec3;
use web_time::Instant;

use super::state::Direction;
use super::surface::{Baseline, ViewSurface};
use crate::animation::tween::{CancelToken, Tween};
use crate::animation::{AnimationSpec, AnimationType};
use crate::host::GateGuard;

/// Result of one resumption.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Step {
    /// The start delay elapsed during this resumption; fire OnStart now.
    pub(crate) fire_start: bool,
    /// Progress after this resumption.
    pub(crate) progress: f32,
    /// The loop is done and the task can be dropped.
    pub(crate) finished: bool,
}

/// One running show or hide.
#[derive(Debug)]
pub(crate) struct TransitionTask {
    direction: Direction,
    started: Instant,
    start_delay: Duration,
    total: Duration,
    on_start_fired: bool,
    position: Option<Tween<Vec3>>,
    rotation: Option<Tween<Vec3>>,
    scale: Option<Tween<Vec3>>,
    fade: Option<Tween<f32>>,
    token: CancelToken,
    gate: Option<GateGuard>,
}

fn animation_type(direction: Direction) -> AnimationType {
    match direction {
        Direction::Show => AnimationType::Show,
        Direction::Hide => AnimationType::Hide,
    }
}

impl TransitionTask {
    /// Build the tweens for `spec`, starting at `now`.
    ///
    /// Every enabled axis starts from its configured start endpoint, also
    /// when this transition interrupts another one. Disabled axes get no
    /// tween and are expected to have been snapped to the baseline.
    pub(crate) fn new(
        direction: Direction,
        spec: &AnimationSpec,
        baseline: &Baseline,
        now: Instant,
    ) -> Self {
        let kind = animation_type(direction);
        let position = spec
            .position
            .enabled
            .then(|| spec.position.tween(kind, baseline.position, now));
        let rotation = spec
            .rotation
            .enabled
            .then(|| spec.rotation.tween(kind, baseline.rotation, now));
        let scale = spec
            .scale
            .enabled
            .then(|| spec.scale.tween(kind, baseline.scale, now));
        let fade = spec
            .fade
            .enabled
            .then(|| spec.fade.tween(kind, baseline.alpha, now));
        Self {
            direction,
            started: now,
            start_delay: spec.start_delay(),
            total: spec.total_duration(),
            on_start_fired: false,
            position,
            rotation,
            scale,
            fade,
            token: CancelToken::new(),
            gate: None,
        }
    }

    /// Keep `guard` (an interaction-gate disable) until the task is dropped.
    pub(crate) fn with_gate(mut self, guard: Option<GateGuard>) -> Self {
        self.gate = guard;
        self
    }

    pub(crate) fn direction(&self) -> Direction {
        self.direction
    }

    /// Whether the task holds the interaction gate.
    #[cfg(test)]
    pub(crate) fn holds_gate(&self) -> bool {
        self.gate.is_some()
    }

    /// Stop every axis tween; further resumptions write nothing.
    pub(crate) fn cancel(&self) {
        self.token.cancel();
        if let Some(t) = &self.position {
            t.cancel();
        }
        if let Some(t) = &self.rotation {
            t.cancel();
        }
        if let Some(t) = &self.scale {
            t.cancel();
        }
        if let Some(t) = &self.fade {
            t.cancel();
        }
    }

    pub(crate) fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Advance to `now`, writing every running axis to `surface`.
    ///
    /// Returns `None` once cancelled.
    pub(crate) fn resume(
        &mut self,
        surface: &mut dyn ViewSurface,
        now: Instant,
    ) -> Option<Step> {
        if self.is_cancelled() {
            return None;
        }
        let elapsed = now.saturating_duration_since(self.started);

        let fire_start = !self.on_start_fired && elapsed >= self.start_delay;
        self.on_start_fired |= fire_start;

        if let Some(v) = self.position.as_ref().and_then(|t| t.sample(now)) {
            surface.set_position(v);
        }
        if let Some(v) = self.rotation.as_ref().and_then(|t| t.sample(now)) {
            surface.set_rotation(v);
        }
        if let Some(v) = self.scale.as_ref().and_then(|t| t.sample(now)) {
            surface.set_scale(v);
        }
        if let Some(v) = self.fade.as_ref().and_then(|t| t.sample(now)) {
            surface.set_opacity(v.clamp(0.0, 1.0));
        }

        let finished = elapsed >= self.total;
        let progress = if finished {
            self.direction.resting_progress()
        } else {
            let t = elapsed.as_secs_f32() / self.total.as_secs_f32();
            self.direction.progress(t)
        };
        Some(Step {
            fire_start,
            progress,
            finished,
        })
    }
}
