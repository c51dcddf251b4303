//! Slash commands and context menu commands.
//!
//! These are registered with discord once the bot has logged in.

mod avatar;
mod echo;
mod feedback;
mod panel;
mod ping;

use crate::registry::Definition;

/// Lists all the slash and context menu commands.
pub fn list() -> Vec<Definition> {
    vec![
        ping::ping(),
        echo::echo(),
        panel::panel(),
        feedback::feedback(),
        avatar::avatar(),
    ]
    .into_iter()
    .map(Definition::Slash)
    .collect()
}
