//! Startup: configuration, registries and the discord client.

mod config;
mod framework;

use crate::commands;
use crate::data::CooldownStore;
use crate::registry::Registries;
use crate::serenity;
use crate::BotError;
use crate::Data;

pub use config::Config;

/// Constructs a [serenity::Client] with every registry loaded.
///
/// Anything that can't be recovered from (token, cooldown file) fails here,
/// before the bot connects.
pub(super) async fn client(config: Config) -> Result<serenity::Client, BotError> {
    // Get discord token from config file
    let token = config.token()?;

    let cooldowns = CooldownStore::open(config.cooldown_db())?;
    let registries = Registries::load(commands::list());

    let data = Data::builder()
        .prefix(config.prefix())
        .owners(config.owners())
        .notify_list(config.notify_list())
        .registries(registries)
        .cooldowns(cooldowns)
        .build();

    // Intents we wish to use
    // See https://discord.com/developers/docs/topics/gateway#gateway-intents
    // Message content is privileged and must be enabled for the bot account.
    let intents =
        serenity::GatewayIntents::non_privileged() | serenity::GatewayIntents::MESSAGE_CONTENT;

    let client = serenity::ClientBuilder::new(token, intents)
        .framework(framework::framework(config, data))
        .await?;

    Ok(client)
}
