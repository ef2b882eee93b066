//! The per-container visibility state machine.
//!
//! A [`VisibilityOrchestrator`] owns one container's state, progress and
//! baseline, runs its show/hide interpolation loop one resumption per
//! frame, and fires the behaviors' action bundles. Everything it needs from
//! the outside world (time, effects, selection, the interaction gate, the
//! deferred command queue) arrives through a [`ViewContext`].

use std::fmt;

use web_time::Instant;

use super::settings::{StartBehavior, ViewIdentity, ViewSettings};
use super::state::{Direction, ProgressEvent, TransitionOutcome, VisibilityState};
use super::surface::{Baseline, ViewSurface};
use super::transition::TransitionTask;
use crate::animation::ambient::AmbientAnimation;
use crate::animation::axis::secs;
use crate::animation::{AnimationSpec, AnimationType};
use crate::behavior::actions::{ActionContext, ActionPhase, EffectSink};
use crate::behavior::presets::PresetStore;
use crate::behavior::BehaviorSpec;
use crate::error::ViewError;
use crate::host::{InteractionGate, SelectionHandler};
use crate::options::Options;
use crate::registry::command::CommandQueue;
use crate::registry::ViewId;

/// Services a view borrows for the length of one operation.
pub struct ViewContext<'a> {
    /// Id of the view being driven.
    pub id: ViewId,
    /// Current frame time.
    pub now: Instant,
    /// Sound/effect/event layer.
    pub effects: &'a mut dyn EffectSink,
    /// Interactive-element selection.
    pub selection: &'a mut dyn SelectionHandler,
    /// Registry operations requested while this one runs.
    pub commands: &'a mut CommandQueue,
    /// Global "interactions disabled" counter.
    pub gate: &'a InteractionGate,
    /// Process-wide policy.
    pub options: &'a Options,
}

type ProgressListener = Box<dyn FnMut(ProgressEvent)>;

/// Which of the view's behaviors an operation refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Show,
    Hide,
    Loop,
}

impl From<Direction> for Slot {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Show => Self::Show,
            Direction::Hide => Self::Hide,
        }
    }
}

/// Visibility state machine for one UI container.
pub struct VisibilityOrchestrator {
    settings: ViewSettings,
    surface: Box<dyn ViewSurface>,
    show_behavior: BehaviorSpec,
    hide_behavior: BehaviorSpec,
    loop_behavior: BehaviorSpec,
    state: VisibilityState,
    progress: f32,
    baseline: Baseline,
    transition: Option<TransitionTask>,
    ambient_loop: Option<AmbientAnimation>,
    one_shot: Option<AmbientAnimation>,
    auto_hide_at: Option<Instant>,
    deactivate_at: Option<Instant>,
    pending_cascade: Option<(Direction, bool)>,
    orientation_blocked: bool,
    listeners: Vec<ProgressListener>,
}

impl VisibilityOrchestrator {
    /// Orchestrator for `surface`, starting `Visible` with the surface's
    /// current values as baseline (or the custom start position, which is
    /// applied to the surface right away).
    pub fn new(settings: ViewSettings, surface: impl ViewSurface + 'static) -> Self {
        let mut surface: Box<dyn ViewSurface> = Box::new(surface);
        let mut baseline = Baseline::capture(surface.as_ref());
        if let Some(position) = settings.custom_start_position {
            baseline.position = position;
            surface.set_position(position);
        }
        Self {
            settings,
            surface,
            show_behavior: BehaviorSpec::new(AnimationType::Show),
            hide_behavior: BehaviorSpec::new(AnimationType::Hide),
            loop_behavior: BehaviorSpec::new(AnimationType::Loop),
            state: VisibilityState::Visible,
            progress: 1.0,
            baseline,
            transition: None,
            ambient_loop: None,
            one_shot: None,
            auto_hide_at: None,
            deactivate_at: None,
            pending_cascade: None,
            orientation_blocked: false,
            listeners: Vec::new(),
        }
    }

    /// Replace the show behavior.
    #[must_use]
    pub fn with_show_behavior(mut self, mut behavior: BehaviorSpec) -> Self {
        behavior.animation.animation_type = AnimationType::Show;
        self.show_behavior = behavior;
        self
    }

    /// Replace the hide behavior.
    #[must_use]
    pub fn with_hide_behavior(mut self, mut behavior: BehaviorSpec) -> Self {
        behavior.animation.animation_type = AnimationType::Hide;
        self.hide_behavior = behavior;
        self
    }

    /// Replace the loop behavior.
    #[must_use]
    pub fn with_loop_behavior(mut self, mut behavior: BehaviorSpec) -> Self {
        behavior.animation.animation_type = AnimationType::Loop;
        self.loop_behavior = behavior;
        self
    }

    // -- accessors --------------------------------------------------------

    /// Current state.
    #[must_use]
    pub fn state(&self) -> VisibilityState {
        self.state
    }

    /// Current progress; 1 is fully visible.
    #[must_use]
    pub fn progress(&self) -> f32 {
        self.progress
    }

    /// `state == Visible`.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.state == VisibilityState::Visible
    }

    /// `state == NotVisible`.
    #[must_use]
    pub fn is_hidden(&self) -> bool {
        self.state == VisibilityState::NotVisible
    }

    /// `state == Showing`.
    #[must_use]
    pub fn is_showing(&self) -> bool {
        self.state == VisibilityState::Showing
    }

    /// `state == Hiding`.
    #[must_use]
    pub fn is_hiding(&self) -> bool {
        self.state == VisibilityState::Hiding
    }

    /// Registry address.
    #[must_use]
    pub fn identity(&self) -> &ViewIdentity {
        &self.settings.identity
    }

    /// Configuration.
    #[must_use]
    pub fn settings(&self) -> &ViewSettings {
        &self.settings
    }

    /// Resting transform values.
    #[must_use]
    pub fn baseline(&self) -> Baseline {
        self.baseline
    }

    /// The animated container.
    #[must_use]
    pub fn surface(&self) -> &dyn ViewSurface {
        self.surface.as_ref()
    }

    /// The show behavior.
    #[must_use]
    pub fn show_behavior(&self) -> &BehaviorSpec {
        &self.show_behavior
    }

    /// The hide behavior.
    #[must_use]
    pub fn hide_behavior(&self) -> &BehaviorSpec {
        &self.hide_behavior
    }

    /// The loop behavior.
    #[must_use]
    pub fn loop_behavior(&self) -> &BehaviorSpec {
        &self.loop_behavior
    }

    /// Whether a show or hide loop is running.
    #[must_use]
    pub fn is_transitioning(&self) -> bool {
        self.transition.is_some()
    }

    /// Whether the loop behavior is playing.
    #[must_use]
    pub fn is_looping(&self) -> bool {
        self.ambient_loop.is_some()
    }

    /// When the pending automatic hide fires, if one is scheduled.
    #[must_use]
    pub fn auto_hide_deadline(&self) -> Option<Instant> {
        self.auto_hide_at
    }

    /// Whether show requests are currently refused because the device
    /// orientation does not match the view's target orientation.
    #[must_use]
    pub fn is_orientation_blocked(&self) -> bool {
        self.orientation_blocked
    }

    fn behavior(&self, slot: Slot) -> &BehaviorSpec {
        match slot {
            Slot::Show => &self.show_behavior,
            Slot::Hide => &self.hide_behavior,
            Slot::Loop => &self.loop_behavior,
        }
    }

    // -- configuration ----------------------------------------------------

    /// Register a progress listener, called with every progress update.
    pub fn add_progress_listener(
        &mut self,
        listener: impl FnMut(ProgressEvent) + 'static,
    ) {
        self.listeners.push(Box::new(listener));
    }

    /// Re-capture the baseline from the surface's current values. The
    /// custom start position, when set, still wins over the surface
    /// position.
    pub fn update_start_values(&mut self) {
        self.baseline = Baseline::capture(self.surface.as_ref());
        if let Some(position) = self.settings.custom_start_position {
            self.baseline.position = position;
        }
    }

    /// Load the runtime presets of every behavior that asks for one.
    pub fn load_presets(&mut self, store: &dyn PresetStore) {
        for behavior in [
            &mut self.show_behavior,
            &mut self.hide_behavior,
            &mut self.loop_behavior,
        ] {
            if behavior.load_preset_at_runtime {
                let _ = behavior.load_preset(store);
            }
        }
    }

    /// Drop the pending automatic hide, if any.
    pub fn cancel_auto_hide(&mut self) {
        self.auto_hide_at = None;
    }

    pub(crate) fn set_orientation_blocked(&mut self, blocked: bool) {
        self.orientation_blocked = blocked;
    }

    /// Child cascade requested by the last show/hide, for the registry to run
    /// on the next frame.
    pub(crate) fn take_cascade(&mut self) -> Option<(Direction, bool)> {
        self.pending_cascade.take()
    }

    // -- transitions ------------------------------------------------------

    /// Show the container.
    pub fn show(
        &mut self,
        ctx: &mut ViewContext<'_>,
        instant: bool,
    ) -> TransitionOutcome {
        self.begin(ctx, Direction::Show, instant)
    }

    /// Hide the container.
    pub fn hide(
        &mut self,
        ctx: &mut ViewContext<'_>,
        instant: bool,
    ) -> TransitionOutcome {
        self.begin(ctx, Direction::Hide, instant)
    }

    /// Hide when visible or showing, show otherwise.
    pub fn toggle(
        &mut self,
        ctx: &mut ViewContext<'_>,
        instant: bool,
    ) -> TransitionOutcome {
        if self.state.is_shown_or_showing() {
            self.hide(ctx, instant)
        } else {
            self.show(ctx, instant)
        }
    }

    /// Show when `visible`, hide otherwise.
    pub fn set_visibility(
        &mut self,
        ctx: &mut ViewContext<'_>,
        visible: bool,
        instant: bool,
    ) -> TransitionOutcome {
        if visible {
            self.show(ctx, instant)
        } else {
            self.hide(ctx, instant)
        }
    }

    /// Become `Visible` immediately without playing anything: reset the
    /// baseline values and fire the show OnFinished with `animated = false`.
    pub fn instant_show(&mut self, ctx: &mut ViewContext<'_>) -> TransitionOutcome {
        if self.orientation_blocked {
            return TransitionOutcome::OrientationBlocked;
        }
        self.snap(ctx, Direction::Show);
        TransitionOutcome::Completed
    }

    /// Become `NotVisible` immediately without playing anything. Never
    /// refused, whatever the animation configuration.
    pub fn instant_hide(&mut self, ctx: &mut ViewContext<'_>) -> TransitionOutcome {
        self.snap(ctx, Direction::Hide);
        TransitionOutcome::Completed
    }

    /// Apply the configured start behavior. Called once at registration.
    pub(crate) fn start(&mut self, ctx: &mut ViewContext<'_>) {
        match self.settings.start_behavior {
            StartBehavior::DoNothing if self.orientation_blocked => {
                let _ = self.instant_hide(ctx);
            }
            StartBehavior::DoNothing => {}
            StartBehavior::Hide => {
                let _ = self.instant_hide(ctx);
            }
            StartBehavior::PlayShowAnimation => {
                let _ = self.instant_hide(ctx);
                let _ = self.show(ctx, false);
            }
        }
    }

    fn begin(
        &mut self,
        ctx: &mut ViewContext<'_>,
        direction: Direction,
        instant: bool,
    ) -> TransitionOutcome {
        if direction == Direction::Show && self.orientation_blocked {
            log::debug!(
                "[{}] show refused: orientation does not match {:?}",
                self.settings.identity,
                self.settings.target_orientation
            );
            return TransitionOutcome::OrientationBlocked;
        }
        if self.state == direction.resting_state() {
            return TransitionOutcome::Unchanged;
        }
        if self.state == direction.transient_state() {
            return TransitionOutcome::InProgress;
        }

        let behavior = self.behavior(direction.into());
        let instant = instant || behavior.instant_animation;
        if !instant && !behavior.animation.is_enabled() {
            let err = ViewError::NoAnimationEnabled {
                identity: self.settings.identity.to_string(),
                direction: direction.as_str(),
            };
            log::warn!("{err}");
            return TransitionOutcome::NoAnimation;
        }

        if let Some(task) = self.transition.take() {
            log::debug!(
                "[{}] {} interrupted at progress {:.2}",
                self.settings.identity,
                self.state,
                self.progress
            );
            task.cancel();
        }
        self.auto_hide_at = None;
        match direction {
            Direction::Show => {
                self.deactivate_at = None;
                self.set_surfaces_enabled(true);
            }
            Direction::Hide => {
                let _ = self.stop_loop(ctx);
                if let Some(one_shot) = self.one_shot.take() {
                    one_shot.restore(self.surface.as_mut());
                }
            }
        }

        self.snap_still_axes(direction, instant);
        self.state = direction.transient_state();
        if self.surface.has_nested_views() {
            self.pending_cascade = Some((direction, instant));
        }
        log::debug!(
            "[{}] {} (instant: {instant})",
            self.settings.identity,
            direction.transient_state()
        );

        if instant {
            self.fire(ctx, direction.into(), ActionPhase::Start, false);
            self.finish(ctx, direction, false);
            return TransitionOutcome::Completed;
        }

        let gate = ctx
            .options
            .interaction
            .disable_interactions_while_animating
            .then(|| ctx.gate.guard());
        let task = TransitionTask::new(
            direction,
            &self.behavior(direction.into()).animation,
            &self.baseline,
            ctx.now,
        )
        .with_gate(gate);
        self.transition = Some(task);
        self.resume_transition(ctx);
        if self.transition.is_some() {
            TransitionOutcome::Started
        } else {
            TransitionOutcome::Completed
        }
    }

    /// Put every axis that will not be tweened back on the baseline: all of
    /// them for an instant transition, the disabled ones otherwise.
    fn snap_still_axes(&mut self, direction: Direction, instant: bool) {
        if instant {
            self.baseline.apply(self.surface.as_mut());
            return;
        }
        let spec: &AnimationSpec = match direction {
            Direction::Show => &self.show_behavior.animation,
            Direction::Hide => &self.hide_behavior.animation,
        };
        let base = &self.baseline;
        let surface = self.surface.as_mut();
        if !spec.position.enabled {
            surface.set_position(base.position);
        }
        if !spec.rotation.enabled {
            surface.set_rotation(base.rotation);
        }
        if !spec.scale.enabled {
            surface.set_scale(base.scale);
        }
        if !spec.fade.enabled {
            surface.set_opacity(base.alpha);
        }
    }

    fn snap(&mut self, ctx: &mut ViewContext<'_>, direction: Direction) {
        if let Some(task) = self.transition.take() {
            task.cancel();
        }
        self.auto_hide_at = None;
        let _ = self.stop_loop(ctx);
        self.one_shot = None;
        self.baseline.apply(self.surface.as_mut());
        self.state = direction.resting_state();
        self.set_progress(direction.resting_progress());
        match direction {
            Direction::Show => {
                self.deactivate_at = None;
                self.set_surfaces_enabled(true);
            }
            Direction::Hide => {
                if self.settings.deselect_on_hide {
                    ctx.selection.clear_selection();
                }
                self.deactivate_at = None;
                self.set_surfaces_enabled(false);
            }
        }
        self.fire(ctx, direction.into(), ActionPhase::Finished, false);
    }

    fn resume_transition(&mut self, ctx: &mut ViewContext<'_>) {
        let Some(task) = self.transition.as_mut() else {
            return;
        };
        let Some(step) = task.resume(self.surface.as_mut(), ctx.now) else {
            self.transition = None;
            return;
        };
        let direction = task.direction();
        if step.fire_start {
            self.fire(ctx, direction.into(), ActionPhase::Start, true);
        }
        self.set_progress(step.progress);
        if step.finished {
            self.transition = None;
            self.finish(ctx, direction, true);
        }
    }

    /// Resolve a transition: terminal state, OnFinished, then the side
    /// effects the view is configured for.
    fn finish(&mut self, ctx: &mut ViewContext<'_>, direction: Direction, animated: bool) {
        self.state = direction.resting_state();
        if !animated {
            self.set_progress(direction.resting_progress());
        }
        self.fire(ctx, direction.into(), ActionPhase::Finished, animated);

        match direction {
            Direction::Show => {
                if self.settings.auto_start_loop_after_show {
                    let _ = self.start_loop(ctx);
                }
                if self.settings.auto_hide_after_show {
                    self.auto_hide_at =
                        ctx.now.checked_add(secs(self.settings.auto_hide_delay));
                }
                if let Some(target) = &self.settings.auto_select_on_show {
                    ctx.selection.select(target);
                }
            }
            Direction::Hide => {
                if self.settings.deselect_on_hide {
                    ctx.selection.clear_selection();
                }
                if self.settings.deactivates_when_hidden() {
                    self.deactivate_at =
                        ctx.now.checked_add(ctx.options.timing.hide_grace());
                }
            }
        }
    }

    fn set_surfaces_enabled(&mut self, enabled: bool) {
        if self.settings.disable_drawing_when_hidden {
            self.surface.set_drawing_enabled(enabled);
        }
        if self.settings.disable_raycast_when_hidden {
            self.surface.set_raycast_enabled(enabled);
        }
        if self.settings.deactivate_when_hidden {
            self.surface.set_active(enabled);
        }
    }

    fn set_progress(&mut self, progress: f32) {
        self.progress = progress;
        let event = ProgressEvent::new(progress);
        for listener in &mut self.listeners {
            listener(event);
        }
    }

    fn fire(
        &self,
        ctx: &mut ViewContext<'_>,
        slot: Slot,
        phase: ActionPhase,
        animated: bool,
    ) {
        let behavior = self.behavior(slot);
        let bundle = match phase {
            ActionPhase::Start => &behavior.on_start,
            ActionPhase::Finished => &behavior.on_finished,
        };
        if bundle.is_empty() {
            return;
        }
        let action_ctx = ActionContext {
            view: ctx.id,
            identity: &self.settings.identity,
            phase,
            animated,
            after_animation: phase == ActionPhase::Finished,
        };
        bundle.invoke(&action_ctx, ctx.effects, ctx.commands);
    }

    // -- ambient animations ----------------------------------------------

    /// Start the loop behavior. Only a `Visible` view loops; returns whether
    /// a loop was started.
    pub fn start_loop(&mut self, ctx: &mut ViewContext<'_>) -> bool {
        if self.state != VisibilityState::Visible || self.ambient_loop.is_some() {
            return false;
        }
        if !self.loop_behavior.animation.is_enabled() {
            log::debug!("[{}] loop has no enabled axis", self.settings.identity);
            return false;
        }
        let mut spec = self.loop_behavior.animation.clone();
        spec.animation_type = AnimationType::Loop;
        let anim = AmbientAnimation::new(spec, self.baseline, ctx.now);
        let _ = anim.apply(self.surface.as_mut(), ctx.now);
        self.ambient_loop = Some(anim);
        self.fire(ctx, Slot::Loop, ActionPhase::Start, true);
        true
    }

    /// Stop the loop behavior and put its axes back on the baseline.
    /// Returns whether a loop was running.
    pub fn stop_loop(&mut self, ctx: &mut ViewContext<'_>) -> bool {
        let Some(anim) = self.ambient_loop.take() else {
            return false;
        };
        anim.restore(self.surface.as_mut());
        self.fire(ctx, Slot::Loop, ActionPhase::Finished, true);
        true
    }

    /// Play a one-shot punch around the baseline. Only a `Visible` view
    /// punches; a running punch or state animation is replaced.
    pub fn punch(&mut self, ctx: &ViewContext<'_>, spec: AnimationSpec) -> bool {
        self.play_one_shot(ctx, spec, AnimationType::Punch)
    }

    /// Tween from the baseline to the absolute targets of `spec` and stay
    /// there. Only a `Visible` view plays state animations; the next hide
    /// puts the container back on its baseline.
    pub fn play_state(&mut self, ctx: &ViewContext<'_>, spec: AnimationSpec) -> bool {
        self.play_one_shot(ctx, spec, AnimationType::State)
    }

    fn play_one_shot(
        &mut self,
        ctx: &ViewContext<'_>,
        mut spec: AnimationSpec,
        kind: AnimationType,
    ) -> bool {
        if self.state != VisibilityState::Visible || !spec.is_enabled() {
            return false;
        }
        if let Some(previous) = self.one_shot.take() {
            previous.restore(self.surface.as_mut());
        }
        spec.animation_type = kind;
        self.one_shot = Some(AmbientAnimation::new(spec, self.baseline, ctx.now));
        true
    }

    // -- per-frame --------------------------------------------------------

    /// Advance everything time-driven to `ctx.now`: the transition loop,
    /// the loop and one-shot animations, the hide grace buffer and the
    /// automatic hide.
    pub fn tick(&mut self, ctx: &mut ViewContext<'_>) {
        self.resume_transition(ctx);

        if let Some(anim) = &self.ambient_loop {
            let _ = anim.apply(self.surface.as_mut(), ctx.now);
        }
        if let Some(one_shot) = &self.one_shot {
            if !one_shot.apply(self.surface.as_mut(), ctx.now) {
                self.one_shot = None;
            }
        }

        if self.deactivate_at.is_some_and(|at| ctx.now >= at) {
            self.deactivate_at = None;
            if self.state == VisibilityState::NotVisible {
                self.set_surfaces_enabled(false);
            }
        }

        if self.auto_hide_at.is_some_and(|at| ctx.now >= at) {
            self.auto_hide_at = None;
            log::debug!("[{}] auto-hide", self.settings.identity);
            let _ = self.hide(ctx, false);
        }
    }
}

impl fmt::Debug for VisibilityOrchestrator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VisibilityOrchestrator")
            .field("identity", &self.settings.identity)
            .field("state", &self.state)
            .field("progress", &self.progress)
            .field("baseline", &self.baseline)
            .field("transition", &self.transition)
            .field("looping", &self.ambient_loop.is_some())
            .field("auto_hide_at", &self.auto_hide_at)
            .field("orientation_blocked", &self.orientation_blocked)
            .finish_non_exhaustive()
    }
}
