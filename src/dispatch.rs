//! Routes gateway events into the registries.
//!
//! Installed as the framework's event handler. Errors returned from here are
//! handed to [handle_framework_error](crate::log::handle_framework_error),
//! which replies to the user that triggered them.

use tracing::instrument;

use crate::error::BotError;
use crate::error::UserError;
use crate::serenity;
use crate::Context;
use crate::Data;

/// A message command invocation parsed from message content.
#[derive(Debug, PartialEq, Eq)]
pub struct Invocation {
    /// Lowercase command name or alias.
    pub name: String,
    /// Whitespace separated arguments.
    pub args: Vec<String>,
}

impl Invocation {
    /// Parse `content` if it starts with `prefix` and names something.
    pub fn parse(prefix: &str, content: &str) -> Option<Self> {
        let rest = content.strip_prefix(prefix)?;
        let mut words = rest.split_whitespace();
        let name = words.next()?.to_lowercase();
        let args = words.map(str::to_string).collect();
        Some(Self { name, args })
    }
}

/// Entry point for every event delivered by the framework.
pub async fn handle_event(
    ctx: &serenity::Context,
    event: &serenity::FullEvent,
    data: &Data,
) -> Result<(), BotError> {
    let ctx = Context {
        serenity: ctx,
        data,
    };

    let routed = match event {
        serenity::FullEvent::Message { new_message } => dispatch_message(ctx, new_message).await,
        serenity::FullEvent::InteractionCreate { interaction } => {
            dispatch_interaction(ctx, interaction).await
        }
        _ => Ok(()),
    };

    dispatch_listeners(ctx, event).await;

    routed
}

/// Run the message command named by a prefixed message, if any.
#[instrument(level = "debug", skip_all, fields(author = %message.author.name))]
async fn dispatch_message(ctx: Context<'_>, message: &serenity::Message) -> Result<(), BotError> {
    if message.author.bot {
        return Ok(());
    }

    let Some(invocation) = Invocation::parse(&ctx.data.prefix, &message.content) else {
        return Ok(());
    };

    // Unknown message commands are ignored silently.
    let Some(command) = ctx.data.message_command(&invocation.name) else {
        tracing::trace!("No message command named '{}'.", invocation.name);
        return Ok(());
    };

    let cmd_name = &command.name;
    let user = &message.author.name;
    tracing::info!("Started '{cmd_name}' command from {user}.");

    ctx.data
        .admit(message.author.id, cmd_name, command.owner_only, command.cooldown)?;
    (command.handler)(ctx, message, invocation.args).await?;

    tracing::info!("Finished '{cmd_name}' command from {user}.");
    Ok(())
}

/// Route an interaction to the slash, button, select menu or modal registry.
async fn dispatch_interaction(
    ctx: Context<'_>,
    interaction: &serenity::Interaction,
) -> Result<(), BotError> {
    match interaction {
        serenity::Interaction::Command(command) => dispatch_command(ctx, command).await,
        serenity::Interaction::Component(component) => dispatch_component(ctx, component).await,
        serenity::Interaction::Modal(modal) => dispatch_modal(ctx, modal).await,
        _ => Ok(()),
    }
}

/// Run a slash or context menu command.
#[instrument(level = "debug", skip_all, fields(author = %interaction.user.name))]
async fn dispatch_command(
    ctx: Context<'_>,
    interaction: &serenity::CommandInteraction,
) -> Result<(), BotError> {
    let cmd_name = &interaction.data.name;
    let user = &interaction.user.name;

    let Some(command) = ctx.data.registries.slash_commands.get(cmd_name) else {
        return Err(UserError::UnknownCommand {
            name: cmd_name.clone(),
        }
        .into());
    };

    tracing::info!("Started '{cmd_name}' command from {user}.");

    ctx.data
        .admit(interaction.user.id, cmd_name, command.owner_only, command.cooldown)?;
    (command.handler)(ctx, interaction).await?;

    tracing::info!("Finished '{cmd_name}' command from {user}.");
    Ok(())
}

/// Run the button or select menu handler matching the custom id.
async fn dispatch_component(
    ctx: Context<'_>,
    interaction: &serenity::ComponentInteraction,
) -> Result<(), BotError> {
    let custom_id = &interaction.data.custom_id;

    let registry = match interaction.data.kind {
        serenity::ComponentInteractionDataKind::Button => &ctx.data.registries.buttons,
        serenity::ComponentInteractionDataKind::Unknown(kind) => {
            tracing::debug!("Ignoring component '{custom_id}' of unknown kind {kind}.");
            return Ok(());
        }
        // Every other kind is a select menu.
        _ => &ctx.data.registries.select_menus,
    };

    match registry.find(custom_id) {
        Some(component) => (component.handler)(ctx, interaction).await,
        None => {
            tracing::debug!("No handler for component '{custom_id}'.");
            Ok(())
        }
    }
}

/// Run the modal form handler matching the custom id.
async fn dispatch_modal(
    ctx: Context<'_>,
    interaction: &serenity::ModalInteraction,
) -> Result<(), BotError> {
    let custom_id = &interaction.data.custom_id;

    match ctx.data.registries.modals.find(custom_id) {
        Some(modal) => (modal.handler)(ctx, interaction).await,
        None => {
            tracing::debug!("No handler for modal '{custom_id}'.");
            Ok(())
        }
    }
}

/// Run the listener registered for this event, if any.
/// A failing listener is only logged.
async fn dispatch_listeners(ctx: Context<'_>, event: &serenity::FullEvent) {
    let name = event.snake_case_name();

    let Some(listener) = ctx.data.registries.events.get(name) else {
        return;
    };

    if !listener.arm() {
        return;
    }

    if let Err(error) = (listener.handler)(ctx, event).await {
        tracing::error!("Listener for '{name}' failed: {error}");
    }
}

#[cfg(test)]
mod test {
    use test_case::test_case;

    use super::*;

    #[test_case("!ping", Some(("ping", vec![])); "when bare command")]
    #[test_case("!echo hello  world", Some(("echo", vec!["hello", "world"])); "when with args")]
    #[test_case("! PING", Some(("ping", vec![])); "when spaced and uppercase")]
    #[test_case("ping", None; "when missing prefix")]
    #[test_case("!", None; "when only prefix")]
    #[test_case("?ping", None; "when other prefix")]
    fn parses_invocations(content: &str, expected: Option<(&str, Vec<&str>)>) {
        let expected = expected.map(|(name, args)| Invocation {
            name: name.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
        });
        assert_eq!(Invocation::parse("!", content), expected);
    }

    #[test]
    fn multi_character_prefix() {
        let parsed = Invocation::parse("hb!", "hb!help ping");
        assert_eq!(
            parsed,
            Some(Invocation {
                name: "help".to_string(),
                args: vec!["ping".to_string()],
            })
        );
    }
}
