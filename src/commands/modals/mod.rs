//! Modal form handlers.

pub mod feedback;

use crate::registry::Definition;

pub fn list() -> Vec<Definition> {
    vec![feedback::feedback()]
        .into_iter()
        .map(Definition::Modal)
        .collect()
}
