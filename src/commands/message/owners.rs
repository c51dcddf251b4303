//! Implements the owner-only `owners` message command.

use futures::FutureExt;
use itertools::Itertools;
use serenity::Mentionable;

use crate::registry::MessageCommand;
use crate::serenity;
use crate::BotError;
use crate::Context;

pub fn owners() -> MessageCommand {
    MessageCommand::builder()
        .name("owners")
        .description("Lists the bot owners.")
        .owner_only(true)
        .handler(|ctx, message, _args| run(ctx, message).boxed())
        .build()
}

async fn run(ctx: Context<'_>, message: &serenity::Message) -> Result<(), BotError> {
    let owners = ctx
        .data
        .owners
        .iter()
        .sorted()
        .map(|id| id.mention().to_string())
        .join(", ");

    message
        .reply(ctx.serenity, format!("Owners: {owners}"))
        .await?;
    Ok(())
}
