//! Announces the login.

use futures::FutureExt;
use tracing::info;

use crate::registry::EventListener;
use crate::serenity;
use crate::BotError;
use crate::Context;

pub fn ready() -> EventListener {
    EventListener::builder()
        .event("ready")
        .once(true)
        .handler(|ctx, event| run(ctx, event).boxed())
        .build()
}

async fn run(ctx: Context<'_>, event: &serenity::FullEvent) -> Result<(), BotError> {
    if let serenity::FullEvent::Ready { data_about_bot } = event {
        info!(
            success = true,
            "Logged in as {} with prefix '{}'",
            data_about_bot.user.name,
            ctx.data.prefix
        );
    }
    Ok(())
}
