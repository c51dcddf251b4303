//! Buttons sent by `/panel`.

use futures::FutureExt;
use tracing::debug;

use crate::commands::respond_ephemeral;
use crate::registry::Component;
use crate::registry::CustomId;
use crate::serenity;
use crate::BotError;
use crate::Context;

/// Shared by every panel component.
pub const PANEL_PREFIX: &str = "panel:";
pub const PING_ID: &str = "panel:ping";

pub fn ping() -> Component {
    Component::builder()
        .custom_id(CustomId::exact(PING_ID))
        .handler(|ctx, interaction| run_ping(ctx, interaction).boxed())
        .build()
}

/// Catches panel buttons without a handler of their own.
pub fn fallback() -> Component {
    Component::builder()
        .custom_id(CustomId::prefix(PANEL_PREFIX))
        .handler(|ctx, interaction| run_fallback(ctx, interaction).boxed())
        .build()
}

async fn run_ping(
    ctx: Context<'_>,
    interaction: &serenity::ComponentInteraction,
) -> Result<(), BotError> {
    interaction
        .create_response(ctx.serenity, respond_ephemeral("Pong!"))
        .await?;
    Ok(())
}

async fn run_fallback(
    ctx: Context<'_>,
    interaction: &serenity::ComponentInteraction,
) -> Result<(), BotError> {
    let action = interaction
        .data
        .custom_id
        .strip_prefix(PANEL_PREFIX)
        .unwrap_or_default();
    debug!("Panel button '{action}' pressed by {}", interaction.user.name);

    interaction
        .create_response(
            ctx.serenity,
            respond_ephemeral(format!("{} pressed `{action}`.", interaction.user.name)),
        )
        .await?;
    Ok(())
}
