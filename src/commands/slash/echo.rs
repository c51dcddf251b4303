//! Implements the `/echo` command.

use std::time::Duration;

use futures::FutureExt;

use crate::commands::respond;
use crate::error::UserError;
use crate::registry::SlashCommand;
use crate::serenity;
use crate::BotError;
use crate::Context;

/// Name of the only option.
const TEXT: &str = "text";

pub fn echo() -> SlashCommand {
    let text = serenity::CreateCommandOption::new(
        serenity::CommandOptionType::String,
        TEXT,
        "What to repeat",
    )
    .required(true)
    .max_length(2000);

    SlashCommand::builder()
        .name("echo")
        .description("Repeats what you say.")
        .options(vec![text])
        .cooldown(Duration::from_secs(10))
        .handler(|ctx, interaction| run(ctx, interaction).boxed())
        .build()
}

async fn run(ctx: Context<'_>, interaction: &serenity::CommandInteraction) -> Result<(), BotError> {
    let text = interaction
        .data
        .options
        .iter()
        .find(|option| option.name == TEXT)
        .and_then(|option| option.value.as_str())
        .ok_or(UserError::MissingArgument {
            name: TEXT.to_string(),
        })?;

    interaction.create_response(ctx.serenity, respond(text)).await?;
    Ok(())
}
