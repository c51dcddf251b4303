//! Implements the `/feedback` command, which opens the feedback modal.

use futures::FutureExt;

use crate::commands::modals::feedback::FEEDBACK_ID;
use crate::commands::modals::feedback::FEEDBACK_TEXT_ID;
use crate::registry::SlashCommand;
use crate::serenity;
use crate::BotError;
use crate::Context;

pub fn feedback() -> SlashCommand {
    SlashCommand::builder()
        .name("feedback")
        .description("Tell the bot owners what you think.")
        .handler(|ctx, interaction| run(ctx, interaction).boxed())
        .build()
}

async fn run(ctx: Context<'_>, interaction: &serenity::CommandInteraction) -> Result<(), BotError> {
    let input = serenity::CreateInputText::new(
        serenity::InputTextStyle::Paragraph,
        "Your feedback",
        FEEDBACK_TEXT_ID,
    )
    .max_length(1000);

    let modal = serenity::CreateModal::new(FEEDBACK_ID, "Feedback")
        .components(vec![serenity::CreateActionRow::InputText(input)]);

    interaction
        .create_response(ctx.serenity, serenity::CreateInteractionResponse::Modal(modal))
        .await?;
    Ok(())
}
