//! Deferred registry operations.
//!
//! Anything that wants to drive views while the registry is busy (action
//! callbacks, timers, cascades) pushes a [`ViewCommand`]; the registry runs
//! the queue after the current operation, never in the middle of one.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use super::ViewId;

/// One registry operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "op")]
pub enum ViewCommand {
    /// Show one view.
    Show {
        /// Target view.
        view: ViewId,
        /// Skip the animation.
        instant: bool,
    },
    /// Hide one view.
    Hide {
        /// Target view.
        view: ViewId,
        /// Skip the animation.
        instant: bool,
    },
    /// Toggle one view.
    Toggle {
        /// Target view.
        view: ViewId,
        /// Skip the animation.
        instant: bool,
    },
    /// Show every view sharing an identity.
    ShowIdentity {
        /// View category.
        category: String,
        /// View name.
        name: String,
        /// Skip the animation.
        instant: bool,
    },
    /// Hide every view sharing an identity.
    HideIdentity {
        /// View category.
        category: String,
        /// View name.
        name: String,
        /// Skip the animation.
        instant: bool,
    },
    /// Show every view in a category.
    ShowCategory {
        /// View category.
        category: String,
        /// Skip the animation.
        instant: bool,
    },
    /// Hide every view in a category.
    HideCategory {
        /// View category.
        category: String,
        /// Skip the animation.
        instant: bool,
    },
    /// Destroy a view.
    Unregister {
        /// Target view.
        view: ViewId,
    },
}

/// FIFO of pending commands.
#[derive(Debug, Clone, Default)]
pub struct CommandQueue(VecDeque<ViewCommand>);

impl CommandQueue {
    /// Empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a command.
    pub fn push(&mut self, command: ViewCommand) {
        self.0.push_back(command);
    }

    /// Take the oldest command.
    pub fn pop(&mut self) -> Option<ViewCommand> {
        self.0.pop_front()
    }

    /// Number of pending commands.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether nothing is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Take every pending command, leaving the queue empty.
    pub fn take(&mut self) -> Vec<ViewCommand> {
        self.0.drain(..).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queue_is_fifo() {
        let mut queue = CommandQueue::new();
        queue.push(ViewCommand::ShowCategory {
            category: "Menus".to_owned(),
            instant: false,
        });
        queue.push(ViewCommand::HideCategory {
            category: "Popups".to_owned(),
            instant: true,
        });
        assert_eq!(queue.len(), 2);
        assert!(matches!(queue.pop(), Some(ViewCommand::ShowCategory { .. })));
        assert_eq!(queue.take().len(), 1);
        assert!(queue.is_empty());
    }

    #[test]
    fn identity_command_reads_from_toml() {
        let command: ViewCommand = toml::from_str(
            "op = \"hide_identity\"\ncategory = \"General\"\nname = \"Panel\"\ninstant = false",
        )
        .unwrap();
        assert_eq!(
            command,
            ViewCommand::HideIdentity {
                category: "General".to_owned(),
                name: "Panel".to_owned(),
                instant: false,
            }
        );
    }
}
