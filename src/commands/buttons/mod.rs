//! Button handlers.

pub mod panel;

use crate::registry::Definition;

pub fn list() -> Vec<Definition> {
    vec![panel::ping(), panel::fallback()]
        .into_iter()
        .map(Definition::Button)
        .collect()
}
