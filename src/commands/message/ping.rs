//! Implements the `ping` message command.
//!
//! Replies, then edits the reply with how long the round trip took.

use std::time::Duration;
use std::time::Instant;

use futures::FutureExt;

use crate::registry::MessageCommand;
use crate::serenity;
use crate::BotError;
use crate::Context;

pub fn ping() -> MessageCommand {
    MessageCommand::builder()
        .name("ping")
        .aliases(vec!["p".to_string()])
        .description("Checks that the bot is alive.")
        .cooldown(Duration::from_secs(5))
        .handler(|ctx, message, _args| run(ctx, message).boxed())
        .build()
}

async fn run(ctx: Context<'_>, message: &serenity::Message) -> Result<(), BotError> {
    let started = Instant::now();
    let mut reply = message.reply(ctx.serenity, "Pinging...").await?;
    let elapsed = started.elapsed().as_millis();

    let edit = serenity::EditMessage::new().content(format!("Pong! `{elapsed}ms`"));
    reply.edit(ctx.serenity, edit).await?;

    Ok(())
}
