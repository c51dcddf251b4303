//! Prefixed message commands.

mod echo;
mod help;
mod owners;
mod ping;

use crate::registry::Definition;

/// Lists all the message commands.
pub fn list() -> Vec<Definition> {
    vec![ping::ping(), echo::echo(), help::help(), owners::owners()]
        .into_iter()
        .map(Definition::Message)
        .collect()
}
