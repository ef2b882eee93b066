//! The registry of live views.
//!
//! [`ViewRegistry`] owns every [`VisibilityOrchestrator`] in an arena
//! addressed by generational [`ViewId`]s, keeps the subset currently shown
//! or showing, runs bulk operations by identity or category, cascades
//! orientation changes and drives every view once per frame from
//! [`ViewRegistry::tick`].
//!
//! Views never call back into the registry directly. Anything they (or
//! their action bundles) want done is pushed as a [`ViewCommand`] and run
//! once the current operation has returned, so a callback that shows
//! another view in the middle of a bulk hide cannot disturb the iteration.

pub mod command;

use serde::{Deserialize, Serialize};
use web_time::Instant;

use self::command::{CommandQueue, ViewCommand};
use crate::animation::AnimationSpec;
use crate::behavior::actions::{EffectSink, LogEffectSink};
use crate::behavior::presets::{PresetLibrary, PresetStore};
use crate::error::ViewError;
use crate::host::{
    Clock, InteractionGate, Orientation, OrientationProvider,
    SelectionHandler, SystemClock, TargetOrientation, TrackedSelection,
};
use crate::options::Options;
use crate::view::settings::ViewIdentity;
use crate::view::state::{Direction, TransitionOutcome};
use crate::view::{ViewContext, VisibilityOrchestrator};

/// Generational handle to a registered view. A handle outlives its view
/// harmlessly: once the view is unregistered, every lookup through the
/// handle misses.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,
)]
pub struct ViewId {
    index: u32,
    generation: u32,
}

struct Entry {
    generation: u32,
    view: Option<VisibilityOrchestrator>,
}

/// Host capabilities shared by every view.
struct Services {
    clock: Box<dyn Clock>,
    effects: Box<dyn EffectSink>,
    selection: Box<dyn SelectionHandler>,
    presets: Box<dyn PresetStore>,
    orientation_provider: Option<Box<dyn OrientationProvider>>,
    orientation: Orientation,
    gate: InteractionGate,
    options: Options,
    commands: CommandQueue,
}

impl Services {
    fn ctx(&mut self, id: ViewId, now: Instant) -> ViewContext<'_> {
        ViewContext {
            id,
            now,
            effects: self.effects.as_mut(),
            selection: self.selection.as_mut(),
            commands: &mut self.commands,
            gate: &self.gate,
            options: &self.options,
        }
    }
}

/// Every live view, plus the services they run against.
pub struct ViewRegistry {
    entries: Vec<Entry>,
    free: Vec<u32>,
    live: Vec<ViewId>,
    visible: Vec<ViewId>,
    services: Services,
    frame: u64,
}

impl ViewRegistry {
    /// Registry with the wall clock, a logging effect sink, a tracking
    /// selection handler and the built-in presets (when `options` asks for
    /// them). The preset directory is not read; see
    /// [`from_options`](Self::from_options).
    #[must_use]
    pub fn new(options: Options) -> Self {
        let presets = if options.presets.load_builtins {
            PresetLibrary::with_builtins()
        } else {
            PresetLibrary::new()
        };
        Self {
            entries: Vec::new(),
            free: Vec::new(),
            live: Vec::new(),
            visible: Vec::new(),
            services: Services {
                clock: Box::new(SystemClock),
                effects: Box::new(LogEffectSink),
                selection: Box::new(TrackedSelection::default()),
                presets: Box::new(presets),
                orientation_provider: None,
                orientation: Orientation::Unknown,
                gate: InteractionGate::new(),
                options,
                commands: CommandQueue::new(),
            },
            frame: 0,
        }
    }

    /// Like [`new`](Self::new), but also loads the configured preset
    /// directory.
    pub fn from_options(options: Options) -> Result<Self, ViewError> {
        let presets = options.preset_library()?;
        Ok(Self::new(options).with_presets(presets))
    }

    /// Use `clock` for frame time.
    #[must_use]
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.services.clock = Box::new(clock);
        self
    }

    /// Route sounds, effects, animator triggers and game events to `effects`.
    #[must_use]
    pub fn with_effects(mut self, effects: impl EffectSink + 'static) -> Self {
        self.services.effects = Box::new(effects);
        self
    }

    /// Route selection requests to `selection`.
    #[must_use]
    pub fn with_selection(
        mut self,
        selection: impl SelectionHandler + 'static,
    ) -> Self {
        self.services.selection = Box::new(selection);
        self
    }

    /// Look presets up in `presets`.
    #[must_use]
    pub fn with_presets(mut self, presets: impl PresetStore + 'static) -> Self {
        self.services.presets = Box::new(presets);
        self
    }

    /// Poll `provider` for the device orientation on every tick.
    #[must_use]
    pub fn with_orientation_provider(
        mut self,
        provider: impl OrientationProvider + 'static,
    ) -> Self {
        self.services.orientation = provider.orientation();
        self.services.orientation_provider = Some(Box::new(provider));
        self
    }

    /// Use `gate` as the interaction gate, shared with the host.
    #[must_use]
    pub fn with_gate(mut self, gate: InteractionGate) -> Self {
        self.services.gate = gate;
        self
    }

    // -- accessors --------------------------------------------------------

    /// The interaction gate views disable while animating.
    #[must_use]
    pub fn gate(&self) -> &InteractionGate {
        &self.services.gate
    }

    /// Process-wide policy.
    #[must_use]
    pub fn options(&self) -> &Options {
        &self.services.options
    }

    /// The selection handler.
    #[must_use]
    pub fn selection(&self) -> &dyn SelectionHandler {
        self.services.selection.as_ref()
    }

    /// Last known device orientation.
    #[must_use]
    pub fn orientation(&self) -> Orientation {
        self.services.orientation
    }

    /// Frames ticked so far.
    #[must_use]
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Number of live views.
    #[must_use]
    pub fn len(&self) -> usize {
        self.live.len()
    }

    /// Whether no view is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    /// Commands still queued (only non-zero inside an operation).
    #[must_use]
    pub fn pending_commands(&self) -> usize {
        self.services.commands.len()
    }

    /// The view behind `id`, if it is still registered.
    #[must_use]
    pub fn view(&self, id: ViewId) -> Option<&VisibilityOrchestrator> {
        self.entries
            .get(id.index as usize)
            .filter(|e| e.generation == id.generation)
            .and_then(|e| e.view.as_ref())
    }

    /// Mutable access to the view behind `id`, for configuration. Drive
    /// transitions through the registry so the visible set stays current.
    pub fn view_mut(
        &mut self,
        id: ViewId,
    ) -> Option<&mut VisibilityOrchestrator> {
        Self::entry_view(&mut self.entries, id)
    }

    /// Whether `id` refers to a live view.
    #[must_use]
    pub fn contains(&self, id: ViewId) -> bool {
        self.view(id).is_some()
    }

    /// Live views in registration order.
    pub fn views(
        &self,
    ) -> impl Iterator<Item = (ViewId, &VisibilityOrchestrator)> + '_ {
        self.live
            .iter()
            .filter_map(|&id| self.view(id).map(|view| (id, view)))
    }

    fn entry_view(
        entries: &mut [Entry],
        id: ViewId,
    ) -> Option<&mut VisibilityOrchestrator> {
        entries
            .get_mut(id.index as usize)
            .filter(|e| e.generation == id.generation)
            .and_then(|e| e.view.as_mut())
    }

    // -- lifecycle --------------------------------------------------------

    /// Add `view`: load its runtime presets, check its orientation, apply
    /// its start behavior.
    pub fn register(&mut self, mut view: VisibilityOrchestrator) -> ViewId {
        view.load_presets(self.services.presets.as_ref());
        let target = view.settings().target_orientation;
        view.set_orientation_blocked(!target.accepts(self.services.orientation));
        log::debug!("registered {}", view.identity());

        let id = self.insert(view);
        self.live.push(id);
        let now = self.services.clock.now();
        let _ = self.drive(id, now, |view, ctx| view.start(ctx));
        self.drain_commands();
        id
    }

    fn insert(&mut self, view: VisibilityOrchestrator) -> ViewId {
        if let Some(index) = self.free.pop() {
            if let Some(entry) = self.entries.get_mut(index as usize) {
                entry.view = Some(view);
                return ViewId {
                    index,
                    generation: entry.generation,
                };
            }
        }
        let index = self.entries.len() as u32;
        self.entries.push(Entry {
            generation: 1,
            view: Some(view),
        });
        ViewId {
            index,
            generation: 1,
        }
    }

    /// Remove a view, returning it. Its running transition and timers die
    /// with it, and `id` leaves the visible set immediately.
    pub fn unregister(&mut self, id: ViewId) -> Option<VisibilityOrchestrator> {
        let entry = self
            .entries
            .get_mut(id.index as usize)
            .filter(|e| e.generation == id.generation)?;
        let view = entry.view.take()?;
        entry.generation = entry.generation.wrapping_add(1);
        self.free.push(id.index);
        self.live.retain(|live| *live != id);
        self.visible.retain(|visible| *visible != id);
        log::debug!("unregistered {}", view.identity());
        Some(view)
    }

    // -- single-view operations ------------------------------------------

    /// Run `op` on the view behind `id` with a fresh context, then update
    /// the visible set from its new state.
    fn drive<R>(
        &mut self,
        id: ViewId,
        now: Instant,
        op: impl FnOnce(&mut VisibilityOrchestrator, &mut ViewContext<'_>) -> R,
    ) -> Option<R> {
        let view = Self::entry_view(&mut self.entries, id)?;
        let mut ctx = self.services.ctx(id, now);
        let result = op(view, &mut ctx);
        let shown = view.state().is_shown_or_showing();
        let position = self.visible.iter().position(|v| *v == id);
        match (shown, position) {
            (true, None) => self.visible.push(id),
            (false, Some(i)) => {
                let _ = self.visible.remove(i);
            }
            _ => {}
        }
        Some(result)
    }

    fn transition(
        &mut self,
        id: ViewId,
        op: impl FnOnce(&mut VisibilityOrchestrator, &mut ViewContext<'_>) -> TransitionOutcome,
    ) -> TransitionOutcome {
        let now = self.services.clock.now();
        let outcome = self
            .drive(id, now, op)
            .unwrap_or(TransitionOutcome::Missing);
        self.drain_commands();
        outcome
    }

    /// Show one view.
    pub fn show(&mut self, id: ViewId, instant: bool) -> TransitionOutcome {
        self.transition(id, |view, ctx| view.show(ctx, instant))
    }

    /// Hide one view.
    pub fn hide(&mut self, id: ViewId, instant: bool) -> TransitionOutcome {
        self.transition(id, |view, ctx| view.hide(ctx, instant))
    }

    /// Toggle one view.
    pub fn toggle(&mut self, id: ViewId, instant: bool) -> TransitionOutcome {
        self.transition(id, |view, ctx| view.toggle(ctx, instant))
    }

    /// Show or hide one view.
    pub fn set_visibility(
        &mut self,
        id: ViewId,
        visible: bool,
        instant: bool,
    ) -> TransitionOutcome {
        self.transition(id, |view, ctx| {
            view.set_visibility(ctx, visible, instant)
        })
    }

    /// Show one view without animating.
    pub fn instant_show(&mut self, id: ViewId) -> TransitionOutcome {
        self.transition(id, VisibilityOrchestrator::instant_show)
    }

    /// Hide one view without animating.
    pub fn instant_hide(&mut self, id: ViewId) -> TransitionOutcome {
        self.transition(id, VisibilityOrchestrator::instant_hide)
    }

    /// Start the loop behavior of one view.
    pub fn start_loop(&mut self, id: ViewId) -> bool {
        let now = self.services.clock.now();
        let started = self.drive(id, now, VisibilityOrchestrator::start_loop);
        self.drain_commands();
        started.unwrap_or(false)
    }

    /// Stop the loop behavior of one view.
    pub fn stop_loop(&mut self, id: ViewId) -> bool {
        let now = self.services.clock.now();
        let stopped = self.drive(id, now, VisibilityOrchestrator::stop_loop);
        self.drain_commands();
        stopped.unwrap_or(false)
    }

    /// Punch one view with `spec`.
    pub fn punch(&mut self, id: ViewId, spec: AnimationSpec) -> bool {
        let now = self.services.clock.now();
        self.drive(id, now, |view, ctx| view.punch(ctx, spec))
            .unwrap_or(false)
    }

    /// Play a state animation on one view.
    pub fn play_state(&mut self, id: ViewId, spec: AnimationSpec) -> bool {
        let now = self.services.clock.now();
        self.drive(id, now, |view, ctx| view.play_state(ctx, spec))
            .unwrap_or(false)
    }

    // -- lookup and bulk operations ---------------------------------------

    /// Live views with identity `category/name`, in registration order.
    #[must_use]
    pub fn find_by_identity(&self, category: &str, name: &str) -> Vec<ViewId> {
        self.views()
            .filter(|(_, view)| view.identity().matches(category, name))
            .map(|(id, _)| id)
            .collect()
    }

    /// Live views in `category`, in registration order.
    #[must_use]
    pub fn find_by_category(&self, category: &str) -> Vec<ViewId> {
        self.views()
            .filter(|(_, view)| view.identity().category == category)
            .map(|(id, _)| id)
            .collect()
    }

    /// Show every attached view with identity `category/name`. Returns how
    /// many views changed.
    pub fn show_by_identity(
        &mut self,
        category: &str,
        name: &str,
        instant: bool,
    ) -> usize {
        let changed = self.bulk(Direction::Show, instant, |identity| {
            identity.matches(category, name)
        });
        self.drain_commands();
        changed
    }

    /// Hide every attached view with identity `category/name`. Returns how
    /// many views changed.
    pub fn hide_by_identity(
        &mut self,
        category: &str,
        name: &str,
        instant: bool,
    ) -> usize {
        let changed = self.bulk(Direction::Hide, instant, |identity| {
            identity.matches(category, name)
        });
        self.drain_commands();
        changed
    }

    /// Show every attached view in `category`.
    pub fn show_category(&mut self, category: &str, instant: bool) -> usize {
        let changed = self.bulk(Direction::Show, instant, |identity| {
            identity.category == category
        });
        self.drain_commands();
        changed
    }

    /// Hide every attached view in `category`.
    pub fn hide_category(&mut self, category: &str, instant: bool) -> usize {
        let changed = self.bulk(Direction::Hide, instant, |identity| {
            identity.category == category
        });
        self.drain_commands();
        changed
    }

    /// Hide every attached view.
    pub fn hide_all(&mut self, instant: bool) -> usize {
        let changed = self.bulk(Direction::Hide, instant, |_| true);
        self.drain_commands();
        changed
    }

    /// Drive every live, attached view matching `filter`. Iterates a copy of
    /// the live list; entries that have gone stale are skipped and purged.
    fn bulk(
        &mut self,
        direction: Direction,
        instant: bool,
        filter: impl Fn(&ViewIdentity) -> bool,
    ) -> usize {
        let now = self.services.clock.now();
        let targets = self.live.clone();
        let mut changed = 0;
        let mut stale = false;
        for id in targets {
            let Some(view) = self.view(id) else {
                stale = true;
                continue;
            };
            if !filter(view.identity()) || !view.surface().is_attached() {
                continue;
            }
            let outcome = self.drive(id, now, |view, ctx| {
                view.set_visibility(ctx, direction == Direction::Show, instant)
            });
            if outcome.is_some_and(TransitionOutcome::changed) {
                changed += 1;
            }
        }
        if stale {
            self.purge_stale();
        }
        changed
    }

    fn purge_stale(&mut self) {
        let entries = &self.entries;
        let alive = |id: &ViewId| {
            entries
                .get(id.index as usize)
                .is_some_and(|e| e.generation == id.generation && e.view.is_some())
        };
        let before = self.live.len() + self.visible.len();
        self.live.retain(alive);
        self.visible.retain(alive);
        let swept = before - self.live.len() - self.visible.len();
        if swept > 0 {
            log::debug!("swept {swept} stale view entries");
        }
    }

    // -- visible set ------------------------------------------------------

    /// Whether any view with identity `category/name` is shown or showing.
    /// Only the visible set is consulted.
    #[must_use]
    pub fn is_any_visible(&self, category: &str, name: &str) -> bool {
        self.visible.iter().any(|&id| {
            self.view(id).is_some_and(|view| {
                view.identity().matches(category, name)
                    && view.state().is_shown_or_showing()
            })
        })
    }

    /// Views currently shown or showing, in the order they became so.
    #[must_use]
    pub fn visible_views(&self) -> Vec<ViewId> {
        self.visible
            .iter()
            .copied()
            .filter(|&id| self.contains(id))
            .collect()
    }

    /// Drop visible-set entries that are stale or whose view is hidden or
    /// hiding.
    pub fn reconcile_visible_set(&mut self) {
        let entries = &self.entries;
        let before = self.visible.len();
        self.visible.retain(|id| {
            entries
                .get(id.index as usize)
                .filter(|e| e.generation == id.generation)
                .and_then(|e| e.view.as_ref())
                .is_some_and(|view| view.state().is_shown_or_showing())
        });
        let swept = before - self.visible.len();
        if swept > 0 {
            log::debug!("reconciled visible set: dropped {swept} entries");
        }
    }

    // -- orientation ------------------------------------------------------

    /// React to a new device orientation: views that may not be shown in it
    /// are hidden instantly; views that just became compatible again are
    /// re-shown instantly through the identity bulk path, together with
    /// every view sharing their identity.
    pub fn notify_orientation_changed(&mut self, orientation: Orientation) {
        self.apply_orientation(orientation);
        self.drain_commands();
    }

    fn apply_orientation(&mut self, orientation: Orientation) {
        log::info!("orientation changed to {orientation:?}");
        self.services.orientation = orientation;
        let now = self.services.clock.now();
        let mut reshow: Vec<ViewIdentity> = Vec::new();
        for id in self.live.clone() {
            let Some(view) = self.view_mut(id) else {
                continue;
            };
            let target = view.settings().target_orientation;
            if target == TargetOrientation::Any {
                continue;
            }
            let compatible = target.accepts(orientation);
            let was_blocked = view.is_orientation_blocked();
            view.set_orientation_blocked(!compatible);
            if !compatible {
                if !view.is_hidden() {
                    let _ = self.drive(id, now, VisibilityOrchestrator::instant_hide);
                }
            } else if was_blocked && !reshow.contains(view.identity()) {
                reshow.push(view.identity().clone());
            }
        }
        for identity in reshow {
            self.services.commands.push(ViewCommand::ShowIdentity {
                category: identity.category,
                name: identity.name,
                instant: true,
            });
        }
    }

    // -- commands and frames ---------------------------------------------

    /// Queue `command` and run the queue.
    pub fn execute(&mut self, command: ViewCommand) {
        self.services.commands.push(command);
        self.drain_commands();
    }

    fn run_command(&mut self, command: ViewCommand) {
        let now = self.services.clock.now();
        match command {
            ViewCommand::Show { view, instant } => {
                let _ = self.drive(view, now, |v, ctx| v.show(ctx, instant));
            }
            ViewCommand::Hide { view, instant } => {
                let _ = self.drive(view, now, |v, ctx| v.hide(ctx, instant));
            }
            ViewCommand::Toggle { view, instant } => {
                let _ = self.drive(view, now, |v, ctx| v.toggle(ctx, instant));
            }
            ViewCommand::ShowIdentity {
                category,
                name,
                instant,
            } => {
                let _ = self.bulk(Direction::Show, instant, |identity| {
                    identity.matches(&category, &name)
                });
            }
            ViewCommand::HideIdentity {
                category,
                name,
                instant,
            } => {
                let _ = self.bulk(Direction::Hide, instant, |identity| {
                    identity.matches(&category, &name)
                });
            }
            ViewCommand::ShowCategory { category, instant } => {
                let _ = self.bulk(Direction::Show, instant, |identity| {
                    identity.category == category
                });
            }
            ViewCommand::HideCategory { category, instant } => {
                let _ = self.bulk(Direction::Hide, instant, |identity| {
                    identity.category == category
                });
            }
            ViewCommand::Unregister { view } => {
                let _ = self.unregister(view);
            }
        }
    }

    /// Run queued commands until the queue is empty, at most
    /// `timing.max_command_passes` times over.
    fn drain_commands(&mut self) {
        let max_passes = self.services.options.timing.max_command_passes.max(1);
        for _ in 0..max_passes {
            let batch = self.services.commands.take();
            if batch.is_empty() {
                return;
            }
            for command in batch {
                self.run_command(command);
            }
        }
        let dropped = self.services.commands.take().len();
        if dropped > 0 {
            log::warn!(
                "dropped {dropped} view commands still queued after \
                 {max_passes} passes"
            );
        }
    }

    /// Advance one frame: poll the orientation, run the child cascades
    /// requested last frame, resume every view, reconcile the visible set
    /// and run whatever the views queued.
    pub fn tick(&mut self) {
        self.frame += 1;
        let polled = self
            .services
            .orientation_provider
            .as_ref()
            .map(|provider| provider.orientation());
        if let Some(orientation) = polled {
            if orientation != self.services.orientation {
                self.apply_orientation(orientation);
            }
        }

        let live = self.live.clone();
        for &id in &live {
            let Some(view) = self.view_mut(id) else {
                continue;
            };
            if let Some((direction, instant)) = view.take_cascade() {
                let identity = view.identity().clone();
                self.services.commands.push(match direction {
                    Direction::Show => ViewCommand::ShowIdentity {
                        category: identity.category,
                        name: identity.name,
                        instant,
                    },
                    Direction::Hide => ViewCommand::HideIdentity {
                        category: identity.category,
                        name: identity.name,
                        instant,
                    },
                });
            }
        }

        let now = self.services.clock.now();
        for id in live {
            let _ = self.drive(id, now, VisibilityOrchestrator::tick);
        }
        self.reconcile_visible_set();
        self.drain_commands();
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;
    use std::time::Duration;

    use super::*;
    use crate::behavior::actions::{Action, ActionBundle};
    use crate::behavior::BehaviorSpec;
    use crate::host::ManualClock;
    use crate::view::settings::{StartBehavior, ViewSettings};
    use crate::view::state::VisibilityState;
    use crate::view::surface::MemorySurface;

    fn registry() -> (ViewRegistry, ManualClock) {
        let clock = ManualClock::new();
        let registry = ViewRegistry::new(Options::default()).with_clock(clock.clone());
        (registry, clock)
    }

    fn hidden(category: &str, name: &str) -> VisibilityOrchestrator {
        let mut settings = ViewSettings::named(category, name);
        settings.start_behavior = StartBehavior::Hide;
        VisibilityOrchestrator::new(settings, MemorySurface::new())
    }

    fn run_frames(registry: &mut ViewRegistry, clock: &ManualClock, frames: usize) {
        for _ in 0..frames {
            clock.advance(Duration::from_millis(16));
            registry.tick();
        }
    }

    #[test]
    fn bulk_show_by_shared_identity() {
        let (mut registry, _clock) = registry();
        let a = registry.register(hidden("General", "Panel"));
        let b = registry.register(hidden("General", "Panel"));
        let other = registry.register(hidden("General", "Other"));
        assert!(registry.visible_views().is_empty());

        assert_eq!(registry.show_by_identity("General", "Panel", true), 2);
        for id in [a, b] {
            let view = registry.view(id).unwrap();
            assert_eq!(view.state(), VisibilityState::Visible);
            assert_eq!(view.progress(), 1.0);
        }
        assert_eq!(registry.visible_views(), vec![a, b]);
        assert!(registry.is_any_visible("General", "Panel"));
        assert!(!registry.is_any_visible("General", "Other"));
        assert!(registry.view(other).unwrap().is_hidden());
    }

    #[test]
    fn start_behaviors_apply_on_register() {
        let (mut registry, _clock) = registry();
        let shown = registry.register(VisibilityOrchestrator::new(
            ViewSettings::named("Hud", "Score"),
            MemorySurface::new(),
        ));
        let hidden_id = registry.register(hidden("Hud", "Pause"));
        let mut settings = ViewSettings::named("Hud", "Intro");
        settings.start_behavior = StartBehavior::PlayShowAnimation;
        let intro = registry
            .register(VisibilityOrchestrator::new(settings, MemorySurface::new()));

        assert!(registry.view(shown).unwrap().is_visible());
        assert!(registry.view(hidden_id).unwrap().is_hidden());
        assert!(registry.view(intro).unwrap().is_showing());
        assert_eq!(registry.visible_views(), vec![shown, intro]);
    }

    #[test]
    fn stale_entries_are_tolerated_and_swept() {
        let (mut registry, _clock) = registry();
        let a = registry.register(hidden("General", "Panel"));
        let b = registry.register(hidden("General", "Panel"));
        let _ = registry.show_by_identity("General", "Panel", true);

        assert!(registry.unregister(a).is_some());
        assert!(registry.unregister(a).is_none());
        assert!(!registry.contains(a));
        assert_eq!(registry.show(a, false), TransitionOutcome::Missing);
        assert_eq!(registry.visible, vec![b]);
        assert_eq!(registry.visible_views(), vec![b]);

        assert_eq!(registry.hide_by_identity("General", "Panel", true), 1);
        registry.reconcile_visible_set();
        assert!(registry.visible_views().is_empty());
        assert!(registry.visible.is_empty());
    }

    #[test]
    fn reused_slot_does_not_resurrect_old_ids() {
        let (mut registry, _clock) = registry();
        let old = registry.register(hidden("General", "Panel"));
        let _ = registry.unregister(old);
        let new = registry.register(hidden("General", "Panel"));
        assert_ne!(old, new);
        assert!(registry.view(old).is_none());
        assert!(registry.view(new).is_some());
    }

    #[test]
    fn detached_views_are_skipped_by_bulk_ops() {
        let (mut registry, _clock) = registry();
        let surface = MemorySurface::new();
        let mut settings = ViewSettings::named("Popups", "Reward");
        settings.start_behavior = StartBehavior::Hide;
        let detached =
            registry.register(VisibilityOrchestrator::new(settings, surface.clone()));
        let attached = registry.register(hidden("Popups", "Reward"));
        surface.set_attached(false);

        assert_eq!(registry.show_category("Popups", true), 1);
        assert!(registry.view(detached).unwrap().is_hidden());
        assert!(registry.view(attached).unwrap().is_visible());
    }

    #[test]
    fn finished_actions_drive_other_views_safely() {
        let (mut registry, _clock) = registry();
        let popup = registry.register(VisibilityOrchestrator::new(
            ViewSettings::named("Popups", "Reward"),
            MemorySurface::new(),
        ));
        let close_popups = BehaviorSpec::new(crate::animation::AnimationType::Show)
            .on_finished(ActionBundle::new().with_action(Action::Command {
                command: ViewCommand::HideCategory {
                    category: "Popups".to_owned(),
                    instant: true,
                },
            }));
        let menu = registry.register(
            hidden("Menus", "Main").with_show_behavior(close_popups),
        );

        assert_eq!(registry.show(menu, true), TransitionOutcome::Completed);
        assert!(registry.view(menu).unwrap().is_visible());
        assert!(registry.view(popup).unwrap().is_hidden());
        assert_eq!(registry.pending_commands(), 0);
    }

    #[test]
    fn bulk_hide_survives_callbacks_that_show_other_views() {
        for instant in [true, false] {
            let (mut registry, clock) = registry();
            let menu = registry.register(hidden("Menus", "Main"));
            let fired = Rc::new(Cell::new(0));
            let panels: Vec<ViewId> = (0..3)
                .map(|_| {
                    let fired = Rc::clone(&fired);
                    let reopen = ActionBundle::new().with_callback(move |_, queue| {
                        fired.set(fired.get() + 1);
                        queue.push(ViewCommand::Show {
                            view: menu,
                            instant: true,
                        });
                    });
                    registry.register(hidden("General", "Panel").with_hide_behavior(
                        BehaviorSpec::new(crate::animation::AnimationType::Hide)
                            .on_finished(reopen),
                    ))
                })
                .collect();
            assert_eq!(registry.show_by_identity("General", "Panel", true), 3);

            assert_eq!(registry.hide_by_identity("General", "Panel", instant), 3);
            run_frames(&mut registry, &clock, 40);

            for id in &panels {
                assert!(registry.view(*id).unwrap().is_hidden());
            }
            assert_eq!(fired.get(), 3);
            assert!(registry.view(menu).unwrap().is_visible());
            assert_eq!(registry.visible_views(), vec![menu]);
            assert_eq!(registry.pending_commands(), 0);
        }
    }

    #[test]
    fn runaway_commands_are_bounded() {
        let mut options = Options::default();
        options.timing.max_command_passes = 8;
        let mut registry = ViewRegistry::new(options);
        let flip = || {
            ActionBundle::new().with_callback(|ctx, queue| {
                queue.push(ViewCommand::Toggle {
                    view: ctx.view,
                    instant: true,
                });
            })
        };
        let view = hidden("Debug", "Flicker")
            .with_show_behavior(
                BehaviorSpec::new(crate::animation::AnimationType::Show)
                    .on_finished(flip()),
            )
            .with_hide_behavior(
                BehaviorSpec::new(crate::animation::AnimationType::Hide)
                    .on_finished(flip()),
            );
        let id = registry.register(view);
        assert!(registry.contains(id));
        assert_eq!(registry.pending_commands(), 0);
    }

    #[test]
    fn unregister_command_removes_view() {
        let (mut registry, _clock) = registry();
        let id = registry.register(hidden("General", "Panel"));
        registry.execute(ViewCommand::Unregister { view: id });
        assert!(registry.is_empty());
    }

    #[test]
    fn category_and_hide_all() {
        let (mut registry, clock) = registry();
        let a = registry.register(hidden("Menus", "Main"));
        let b = registry.register(hidden("Menus", "Options"));
        let c = registry.register(hidden("Hud", "Score"));
        assert_eq!(registry.find_by_category("Menus"), vec![a, b]);
        assert_eq!(registry.find_by_identity("Hud", "Score"), vec![c]);

        assert_eq!(registry.show_category("Menus", false), 2);
        assert!(registry.view(a).unwrap().is_showing());
        run_frames(&mut registry, &clock, 30);
        assert!(registry.view(a).unwrap().is_visible());
        assert!(registry.view(c).unwrap().is_hidden());

        assert_eq!(registry.hide_all(true), 2);
        assert!(registry.visible_views().is_empty());
    }

    #[test]
    fn auto_hide_through_tick() {
        let (mut registry, clock) = registry();
        let mut settings = ViewSettings::named("General", "Toast");
        settings.start_behavior = StartBehavior::Hide;
        settings.auto_hide_after_show = true;
        settings.auto_hide_delay = 2.0;
        let id = registry
            .register(VisibilityOrchestrator::new(settings, MemorySurface::new()));

        let _ = registry.show(id, true);
        assert!(registry.view(id).unwrap().is_visible());
        clock.advance(Duration::from_secs(2));
        registry.tick();
        assert!(registry.view(id).unwrap().is_hiding());
        assert!(registry.visible_views().is_empty());
        run_frames(&mut registry, &clock, 30);
        assert!(registry.view(id).unwrap().is_hidden());
    }

    #[test]
    fn gate_settles_after_bulk_animation() {
        let (mut registry, clock) = registry();
        let _ = registry.register(hidden("General", "Panel"));
        let _ = registry.register(hidden("General", "Panel"));
        let _ = registry.show_by_identity("General", "Panel", false);
        assert_eq!(registry.gate().count(), 2);
        let _ = registry.hide_by_identity("General", "Panel", false);
        assert_eq!(registry.gate().count(), 2);
        run_frames(&mut registry, &clock, 30);
        assert_eq!(registry.gate().count(), 0);
    }

    #[test]
    fn nested_view_cascades_to_its_identity_next_frame() {
        let (mut registry, clock) = registry();
        let surface = MemorySurface::new();
        surface.set_nested_views(true);
        let mut settings = ViewSettings::named("Menus", "Main");
        settings.start_behavior = StartBehavior::Hide;
        let parent =
            registry.register(VisibilityOrchestrator::new(settings, surface));
        let sibling = registry.register(hidden("Menus", "Main"));

        let _ = registry.show(parent, true);
        assert!(registry.view(sibling).unwrap().is_hidden());
        clock.advance(Duration::from_millis(16));
        registry.tick();
        assert!(registry.view(sibling).unwrap().is_visible());
    }

    #[derive(Clone)]
    struct SharedOrientation(Rc<Cell<Orientation>>);

    impl OrientationProvider for SharedOrientation {
        fn orientation(&self) -> Orientation {
            self.0.get()
        }
    }

    fn landscape_only(category: &str, name: &str) -> VisibilityOrchestrator {
        let mut settings = ViewSettings::named(category, name);
        settings.target_orientation = TargetOrientation::Landscape;
        VisibilityOrchestrator::new(settings, MemorySurface::new())
    }

    #[test]
    fn orientation_change_hides_and_reshows() {
        let (mut registry, _clock) = registry();
        let wide = registry.register(landscape_only("Hud", "Map"));
        let any = registry.register(hidden("Hud", "Map"));
        assert!(registry.view(wide).unwrap().is_visible());

        registry.notify_orientation_changed(Orientation::Portrait);
        assert!(registry.view(wide).unwrap().is_hidden());
        assert_eq!(registry.show(wide, true), TransitionOutcome::OrientationBlocked);

        registry.notify_orientation_changed(Orientation::Landscape);
        assert!(registry.view(wide).unwrap().is_visible());
        // Re-shown through the identity path, so the sibling came along.
        assert!(registry.view(any).unwrap().is_visible());
    }

    #[test]
    fn orientation_is_polled_each_tick() {
        let shared = SharedOrientation(Rc::new(Cell::new(Orientation::Portrait)));
        let clock = ManualClock::new();
        let mut registry = ViewRegistry::new(Options::default())
            .with_clock(clock.clone())
            .with_orientation_provider(shared.clone());
        let id = registry.register(landscape_only("Hud", "Map"));
        assert!(registry.view(id).unwrap().is_hidden());

        shared.0.set(Orientation::Landscape);
        clock.advance(Duration::from_millis(16));
        registry.tick();
        assert_eq!(registry.orientation(), Orientation::Landscape);
        assert!(registry.view(id).unwrap().is_visible());
        assert_eq!(registry.frame(), 1);
    }

    #[test]
    fn runtime_presets_load_on_register() {
        let (mut registry, _clock) = registry();
        let view = hidden("Popups", "Reward").with_show_behavior(
            BehaviorSpec::new(crate::animation::AnimationType::Show)
                .with_preset("Zoom", "In"),
        );
        let id = registry.register(view);
        let show = registry.view(id).unwrap().show_behavior();
        assert!(show.animation.scale.enabled);
    }
}
