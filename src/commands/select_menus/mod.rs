//! Select menu handlers.

pub mod colour;

use crate::registry::Definition;

pub fn list() -> Vec<Definition> {
    vec![colour::colour()]
        .into_iter()
        .map(Definition::SelectMenu)
        .collect()
}
