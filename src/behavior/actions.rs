//! Side effects fired when a behavior starts or finishes.

use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::registry::command::{CommandQueue, ViewCommand};
use crate::registry::ViewId;
use crate::view::settings::ViewIdentity;

/// When in a behavior an [`ActionBundle`] fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionPhase {
    /// The behavior started (after its start delay when animated).
    Start,
    /// The behavior finished.
    Finished,
}

/// What the bundle is told about the invocation.
#[derive(Debug, Clone, Copy)]
pub struct ActionContext<'a> {
    /// View that fired the bundle.
    pub view: ViewId,
    /// Its identity.
    pub identity: &'a ViewIdentity,
    /// Start or finish.
    pub phase: ActionPhase,
    /// Whether the behavior actually animated (false for instant paths).
    pub animated: bool,
    /// Whether the bundle fires after the animation ran.
    pub after_animation: bool,
}

/// Host effect layer: audio, particles, animator parameters, game events.
pub trait EffectSink {
    /// Play a sound by name.
    fn play_sound(&mut self, ctx: &ActionContext<'_>, sound: &str);
    /// Spawn or stop a particle effect by name.
    fn play_effect(&mut self, ctx: &ActionContext<'_>, effect: &str);
    /// Set a trigger on a named animator.
    fn trigger_animator(
        &mut self,
        ctx: &ActionContext<'_>,
        animator: &str,
        trigger: &str,
    );
    /// Broadcast a game-wide event.
    fn send_event(&mut self, ctx: &ActionContext<'_>, event: &str);
}

/// Effect sink that logs every request and does nothing else.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogEffectSink;

impl EffectSink for LogEffectSink {
    fn play_sound(&mut self, ctx: &ActionContext<'_>, sound: &str) {
        log::debug!("[{}] sound '{sound}'", ctx.identity);
    }

    fn play_effect(&mut self, ctx: &ActionContext<'_>, effect: &str) {
        log::debug!(
            "[{}] effect '{effect}' (after animation: {})",
            ctx.identity,
            ctx.after_animation
        );
    }

    fn trigger_animator(
        &mut self,
        ctx: &ActionContext<'_>,
        animator: &str,
        trigger: &str,
    ) {
        log::debug!("[{}] animator '{animator}' <- '{trigger}'", ctx.identity);
    }

    fn send_event(&mut self, ctx: &ActionContext<'_>, event: &str) {
        log::debug!("[{}] event '{event}'", ctx.identity);
    }
}

/// One serializable side effect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Action {
    /// Play a sound.
    Sound {
        /// Sound name.
        name: String,
    },
    /// Play a particle effect.
    Effect {
        /// Effect name.
        name: String,
    },
    /// Set an animator trigger.
    AnimatorTrigger {
        /// Animator name.
        animator: String,
        /// Trigger parameter.
        trigger: String,
    },
    /// Broadcast a game event.
    GameEvent {
        /// Event name.
        name: String,
    },
    /// Queue a registry command.
    Command {
        /// The command to queue.
        command: ViewCommand,
    },
}

/// Code callback run as part of a bundle.
pub type ActionCallback = Rc<dyn Fn(&ActionContext<'_>, &mut CommandQueue)>;

/// Ordered side effects: authored actions first, then code callbacks.
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionBundle {
    /// Serializable actions, run in order.
    pub actions: Vec<Action>,
    #[serde(skip)]
    callbacks: Vec<ActionCallback>,
}

impl ActionBundle {
    /// Empty bundle.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an action.
    #[must_use]
    pub fn with_action(mut self, action: Action) -> Self {
        self.actions.push(action);
        self
    }

    /// Append a callback.
    #[must_use]
    pub fn with_callback(
        mut self,
        callback: impl Fn(&ActionContext<'_>, &mut CommandQueue) + 'static,
    ) -> Self {
        self.add_callback(callback);
        self
    }

    /// Append a callback in place.
    pub fn add_callback(
        &mut self,
        callback: impl Fn(&ActionContext<'_>, &mut CommandQueue) + 'static,
    ) {
        self.callbacks.push(Rc::new(callback));
    }

    /// Whether the bundle does nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty() && self.callbacks.is_empty()
    }

    /// Run every action, then every callback.
    pub fn invoke(
        &self,
        ctx: &ActionContext<'_>,
        effects: &mut dyn EffectSink,
        commands: &mut CommandQueue,
    ) {
        for action in &self.actions {
            match action {
                Action::Sound { name } => effects.play_sound(ctx, name),
                Action::Effect { name } => effects.play_effect(ctx, name),
                Action::AnimatorTrigger { animator, trigger } => {
                    effects.trigger_animator(ctx, animator, trigger);
                }
                Action::GameEvent { name } => effects.send_event(ctx, name),
                Action::Command { command } => commands.push(command.clone()),
            }
        }
        for callback in &self.callbacks {
            callback(ctx, commands);
        }
    }
}

impl fmt::Debug for ActionBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionBundle")
            .field("actions", &self.actions)
            .field("callbacks", &self.callbacks.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    #[derive(Default)]
    struct Recorder(Vec<String>);

    impl EffectSink for Recorder {
        fn play_sound(&mut self, _ctx: &ActionContext<'_>, sound: &str) {
            self.0.push(format!("sound:{sound}"));
        }

        fn play_effect(&mut self, ctx: &ActionContext<'_>, effect: &str) {
            self.0.push(format!("effect:{effect}:{}", ctx.after_animation));
        }

        fn trigger_animator(
            &mut self,
            _ctx: &ActionContext<'_>,
            animator: &str,
            trigger: &str,
        ) {
            self.0.push(format!("animator:{animator}:{trigger}"));
        }

        fn send_event(&mut self, _ctx: &ActionContext<'_>, event: &str) {
            self.0.push(format!("event:{event}"));
        }
    }

    fn ctx(identity: &ViewIdentity) -> ActionContext<'_> {
        ActionContext {
            view: ViewId::default(),
            identity,
            phase: ActionPhase::Finished,
            animated: true,
            after_animation: true,
        }
    }

    #[test]
    fn runs_actions_in_order_then_callbacks() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let log = Rc::clone(&seen);
        let bundle = ActionBundle::new()
            .with_action(Action::Sound {
                name: "click".to_owned(),
            })
            .with_action(Action::Effect {
                name: "sparkle".to_owned(),
            })
            .with_action(Action::GameEvent {
                name: "menu-closed".to_owned(),
            })
            .with_callback(move |ctx, _| log.borrow_mut().push(ctx.animated));

        let identity = ViewIdentity::new("General", "Panel");
        let mut sink = Recorder::default();
        let mut queue = CommandQueue::new();
        bundle.invoke(&ctx(&identity), &mut sink, &mut queue);

        assert_eq!(
            sink.0,
            vec!["sound:click", "effect:sparkle:true", "event:menu-closed"]
        );
        assert_eq!(*seen.borrow(), vec![true]);
    }

    #[test]
    fn command_actions_are_queued_not_run() {
        let bundle = ActionBundle::new().with_action(Action::Command {
            command: ViewCommand::ShowCategory {
                category: "Hud".to_owned(),
                instant: true,
            },
        });
        let identity = ViewIdentity::default();
        let mut queue = CommandQueue::new();
        bundle.invoke(&ctx(&identity), &mut LogEffectSink, &mut queue);
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn callbacks_are_not_serialized() {
        let bundle = ActionBundle::new()
            .with_action(Action::AnimatorTrigger {
                animator: "Door".to_owned(),
                trigger: "Open".to_owned(),
            })
            .with_callback(|_, _| {});
        let text = toml::to_string(&bundle).unwrap();
        let parsed: ActionBundle = toml::from_str(&text).unwrap();
        assert_eq!(parsed.actions, bundle.actions);
        assert!(!parsed.is_empty());
        assert!(ActionBundle::new().is_empty());
    }
}
