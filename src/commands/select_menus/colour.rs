//! The colour picker sent by `/panel`.

use futures::FutureExt;
use itertools::Itertools;

use crate::commands::respond_ephemeral;
use crate::registry::Component;
use crate::registry::CustomId;
use crate::serenity;
use crate::BotError;
use crate::Context;

pub const COLOUR_ID: &str = "panel:colour";

/// Label and value of each choice.
pub const COLOURS: &[(&str, &str)] = &[("Red", "red"), ("Green", "green"), ("Blue", "blue")];

pub fn colour() -> Component {
    Component::builder()
        .custom_id(CustomId::exact(COLOUR_ID))
        .handler(|ctx, interaction| run(ctx, interaction).boxed())
        .build()
}

async fn run(ctx: Context<'_>, interaction: &serenity::ComponentInteraction) -> Result<(), BotError> {
    let picked = match &interaction.data.kind {
        serenity::ComponentInteractionDataKind::StringSelect { values } => {
            values.iter().join(", ")
        }
        _ => String::new(),
    };

    let content = if picked.is_empty() {
        "You didn't pick a colour.".to_string()
    } else {
        format!("You picked {picked}.")
    };

    interaction
        .create_response(ctx.serenity, respond_ephemeral(content))
        .await?;
    Ok(())
}
