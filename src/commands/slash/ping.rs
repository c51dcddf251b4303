//! Implements the `/ping` command.

use futures::FutureExt;

use crate::commands::respond;
use crate::registry::SlashCommand;
use crate::serenity;
use crate::BotError;
use crate::Context;

pub fn ping() -> SlashCommand {
    SlashCommand::builder()
        .name("ping")
        .description("Checks that the bot is alive.")
        .handler(|ctx, interaction| run(ctx, interaction).boxed())
        .build()
}

async fn run(ctx: Context<'_>, interaction: &serenity::CommandInteraction) -> Result<(), BotError> {
    interaction.create_response(ctx.serenity, respond("Pong!")).await?;
    Ok(())
}
