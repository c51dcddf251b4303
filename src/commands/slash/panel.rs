//! Implements the `/panel` command.
//!
//! Sends a row of buttons and a select menu, handled by
//! [buttons](crate::commands::buttons) and
//! [select menus](crate::commands::select_menus).

use futures::FutureExt;

use crate::commands::buttons::panel::PANEL_PREFIX;
use crate::commands::buttons::panel::PING_ID;
use crate::commands::select_menus::colour::COLOUR_ID;
use crate::commands::select_menus::colour::COLOURS;
use crate::registry::SlashCommand;
use crate::serenity;
use crate::BotError;
use crate::Context;

pub fn panel() -> SlashCommand {
    SlashCommand::builder()
        .name("panel")
        .description("Shows a panel of buttons and a colour picker.")
        .handler(|ctx, interaction| run(ctx, interaction).boxed())
        .build()
}

async fn run(ctx: Context<'_>, interaction: &serenity::CommandInteraction) -> Result<(), BotError> {
    let buttons = serenity::CreateActionRow::Buttons(vec![
        serenity::CreateButton::new(PING_ID)
            .label("Ping")
            .style(serenity::ButtonStyle::Primary),
        // Only caught by the prefix handler.
        serenity::CreateButton::new(format!("{PANEL_PREFIX}wave"))
            .label("Wave")
            .style(serenity::ButtonStyle::Secondary),
    ]);

    let options = COLOURS
        .iter()
        .map(|(label, value)| serenity::CreateSelectMenuOption::new(*label, *value))
        .collect();
    let menu = serenity::CreateActionRow::SelectMenu(
        serenity::CreateSelectMenu::new(COLOUR_ID, serenity::CreateSelectMenuKind::String { options })
            .placeholder("Pick a colour"),
    );

    let message = serenity::CreateInteractionResponseMessage::new()
        .content("Control panel")
        .components(vec![buttons, menu]);

    interaction
        .create_response(ctx.serenity, serenity::CreateInteractionResponse::Message(message))
        .await?;
    Ok(())
}
