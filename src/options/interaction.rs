use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Input policy while views animate.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Interaction", inline)]
#[serde(default)]
pub struct InteractionOptions {
    /// Hold the interaction gate closed for the whole length of every
    /// animated show/hide.
    #[schemars(title = "Disable Interactions While Animating")]
    pub disable_interactions_while_animating: bool,
}

impl Default for InteractionOptions {
    fn default() -> Self {
        Self {
            disable_interactions_while_animating: true,
        }
    }
}
