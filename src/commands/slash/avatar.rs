//! Implements the `Avatar` user context menu.

use futures::FutureExt;

use crate::commands::respond_ephemeral;
use crate::error::UserError;
use crate::registry::SlashCommand;
use crate::serenity;
use crate::BotError;
use crate::Context;

pub fn avatar() -> SlashCommand {
    SlashCommand::builder()
        .name("Avatar")
        .kind(serenity::CommandType::User)
        .handler(|ctx, interaction| run(ctx, interaction).boxed())
        .build()
}

async fn run(ctx: Context<'_>, interaction: &serenity::CommandInteraction) -> Result<(), BotError> {
    let Some(serenity::ResolvedTarget::User(user, _)) = interaction.data.target() else {
        return Err(UserError::MissingArgument {
            name: "user".to_string(),
        }
        .into());
    };

    let content = format!("{}'s avatar: {}", user.name, user.face());
    interaction
        .create_response(ctx.serenity, respond_ephemeral(content))
        .await?;
    Ok(())
}
