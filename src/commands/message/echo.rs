//! Implements the `echo` message command.

use std::time::Duration;

use futures::FutureExt;

use crate::error::UserError;
use crate::registry::MessageCommand;
use crate::serenity;
use crate::BotError;
use crate::Context;

pub fn echo() -> MessageCommand {
    MessageCommand::builder()
        .name("echo")
        .description("Repeats what you say.")
        .cooldown(Duration::from_secs(10))
        .handler(|ctx, message, args| run(ctx, message, args).boxed())
        .build()
}

async fn run(
    ctx: Context<'_>,
    message: &serenity::Message,
    args: Vec<String>,
) -> Result<(), BotError> {
    if args.is_empty() {
        Err(UserError::MissingArgument {
            name: "text".to_string(),
        })?
    }

    message.channel_id.say(ctx.serenity, args.join(" ")).await?;
    Ok(())
}
