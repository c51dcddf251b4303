//! Setup for [poise::Framework]

use itertools::Itertools;

use crate::registry::Registries;
use crate::serenity;
use crate::BotError;
use crate::Config;
use crate::Data;

/// Convenient type alias, only this [poise::Framework] type is used.
type Framework = poise::Framework<Data, BotError>;

/// Construct a [poise::Framework]
pub(super) fn framework(config: Config, data: Data) -> Framework {
    poise::Framework::builder()
        .options(framework_options())
        .setup(move |ctx, rdy, _fw| framework_setup(ctx, rdy, config, data))
        .build()
}

/// Configure options for the [Framework]
///
/// The framework only owns the gateway connection and the error boundary.
/// Its own command lists stay empty, every event goes through
/// [dispatch](crate::dispatch::handle_event).
fn framework_options() -> poise::FrameworkOptions<Data, BotError> {
    poise::FrameworkOptions {
        commands: Vec::new(),
        prefix_options: poise::PrefixFrameworkOptions {
            prefix: None,
            mention_as_prefix: false,
            ..Default::default()
        },
        // Handle errors returned by handlers
        on_error: |e| crate::log::handle_framework_error(e),
        // Route events into the registries
        event_handler: |ctx, event, _fw, data| {
            Box::pin(crate::dispatch::handle_event(ctx, event, data))
        },
        ..Default::default()
    }
}

/// Construct future that runs once logged in.
fn framework_setup<'a>(
    ctx: &'a serenity::Context,
    rdy: &'a serenity::Ready,
    config: Config,
    data: Data,
) -> poise::BoxFuture<'a, Result<Data, BotError>> {
    Box::pin(async move {
        // Registering needs an authenticated session, so it waits for login.
        register_commands(ctx, &data.registries, config.dev_guild()).await;

        let bot_name = &rdy.user.name;
        tracing::debug!("Setup finished for {bot_name}.");

        Ok(data)
    })
}

/// Overwrite the bot's global application commands with the slash registry.
/// Failures are logged and the bot keeps running with whatever discord has.
async fn register_commands(
    ctx: &serenity::Context,
    registries: &Registries,
    dev_guild: Option<serenity::GuildId>,
) {
    let app_commands = registries
        .slash_commands
        .values()
        .sorted_by(|a, b| a.name.cmp(&b.name))
        .map(|command| command.create_command())
        .collect_vec();

    match serenity::Command::set_global_commands(ctx, app_commands.clone()).await {
        Ok(registered) => {
            let names = registered.iter().map(|c| &c.name).join(", ");
            tracing::info!(success = true, "Registered {} global commands: {names}", registered.len());
        }
        Err(e) => tracing::error!("Failed to register global commands: {e}"),
    }

    if let Some(dev_guild) = dev_guild {
        // This is faster than global registers, useful for development.
        tracing::info!("Registering commands on dev guild.");
        if let Err(e) = dev_guild.set_commands(ctx, app_commands).await {
            tracing::error!("Failed to register dev guild commands: {e}");
        }
    }
}
