//! A discord bot whose commands, component handlers and event listeners
//! are compiled into registries and dispatched from gateway events.

mod commands;
mod data;
mod dispatch;
mod error;
mod log;
mod registry;
mod setup;

use poise::serenity_prelude as serenity;

pub use data::Data;
pub use error::BotError;
pub use setup::Config;

/// Handed to every handler: the discord client context and the [Data]
/// holding registries and cooldowns.
#[derive(Clone, Copy)]
pub struct Context<'a> {
    pub serenity: &'a serenity::Context,
    pub data: &'a Data,
}

#[tokio::main]
async fn main() -> Result<(), BotError> {
    // Tracing needs the config, so config errors are printed plainly.
    let config = Config::read().inspect_err(|e| eprintln!("{e}"))?;

    let _guard = log::install_tracing(&config);

    let mut client = setup::client(config)
        .await
        .inspect_err(|e| tracing::error!("Failed to start: {e}"))?;

    client.start().await?;

    Ok(())
}
