//! Receives the form opened by `/feedback`.

use futures::FutureExt;
use tracing::info;

use crate::commands::respond_ephemeral;
use crate::registry::CustomId;
use crate::registry::ModalForm;
use crate::serenity;
use crate::BotError;
use crate::Context;

pub const FEEDBACK_ID: &str = "feedback";
pub const FEEDBACK_TEXT_ID: &str = "feedback:text";

pub fn feedback() -> ModalForm {
    ModalForm::builder()
        .custom_id(CustomId::exact(FEEDBACK_ID))
        .handler(|ctx, interaction| run(ctx, interaction).boxed())
        .build()
}

async fn run(ctx: Context<'_>, interaction: &serenity::ModalInteraction) -> Result<(), BotError> {
    let text = interaction
        .data
        .components
        .iter()
        .flat_map(|row| &row.components)
        .find_map(|component| match component {
            serenity::ActionRowComponent::InputText(input) if input.custom_id == FEEDBACK_TEXT_ID => {
                input.value.clone()
            }
            _ => None,
        })
        .unwrap_or_default();

    info!("Feedback from {}: {text}", interaction.user.name);

    interaction
        .create_response(ctx.serenity, respond_ephemeral("Thanks for the feedback!"))
        .await?;
    Ok(())
}
