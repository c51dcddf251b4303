//! Gateway event listeners.

mod guild_create;
mod ready;

use crate::registry::Definition;

pub fn list() -> Vec<Definition> {
    vec![ready::ready(), guild_create::guild_create()]
        .into_iter()
        .map(Definition::Event)
        .collect()
}
