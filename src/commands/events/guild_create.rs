use futures::FutureExt;
use tracing::debug;

use crate::registry::EventListener;
use crate::serenity;
use crate::BotError;
use crate::Context;

pub fn guild_create() -> EventListener {
    EventListener::builder()
        .event("guild_create")
        .handler(|ctx, event| run(ctx, event).boxed())
        .build()
}

async fn run(_ctx: Context<'_>, event: &serenity::FullEvent) -> Result<(), BotError> {
    if let serenity::FullEvent::GuildCreate { guild, is_new } = event {
        debug!(
            "Available in guild '{}' ({}){}",
            guild.name,
            guild.id,
            if *is_new == Some(true) { ", newly joined" } else { "" }
        );
    }
    Ok(())
}
