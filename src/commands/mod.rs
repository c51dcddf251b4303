//! The definition catalogue.
//!
//! Each capability has its own module with one definition per file.
//! To add something, write the file and list it in that module's `list()`.

pub mod buttons;
pub mod events;
pub mod message;
pub mod modals;
pub mod select_menus;
pub mod slash;

use crate::registry::Definition;
use crate::serenity;

/// Every definition the bot ships with.
pub fn list() -> Vec<Definition> {
    [
        message::list(),
        events::list(),
        buttons::list(),
        select_menus::list(),
        modals::list(),
        slash::list(),
    ]
    .into_iter()
    .flatten()
    .collect()
}

/// A public interaction response.
pub(crate) fn respond(content: impl Into<String>) -> serenity::CreateInteractionResponse {
    serenity::CreateInteractionResponse::Message(
        serenity::CreateInteractionResponseMessage::new().content(content),
    )
}

/// An interaction response only the invoking user sees.
pub(crate) fn respond_ephemeral(content: impl Into<String>) -> serenity::CreateInteractionResponse {
    serenity::CreateInteractionResponse::Message(
        serenity::CreateInteractionResponseMessage::new()
            .content(content)
            .ephemeral(true),
    )
}
