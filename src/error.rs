//! Error types used across the bot.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::registry::Capability;
use crate::serenity;

/// Top level error returned by handlers, the dispatcher and startup.
#[derive(Error, Debug)]
pub enum BotError {
    /// An error meant to be shown to the user who triggered it.
    #[error(transparent)]
    UserError(#[from] UserError),
    /// Config could not be read.
    #[error(transparent)]
    ConfigError(#[from] ConfigError),
    /// The cooldown store failed.
    #[error(transparent)]
    StoreError(#[from] StoreError),
    /// Anything the discord client reports.
    #[error("Discord error: {0}")]
    Serenity(#[from] serenity::Error),
}

/// Errors caused by how a user invoked something.
/// These are replied to the user and only logged at debug level.
#[derive(Error, Debug)]
pub enum UserError {
    #[error("Slow down! You can use `{command}` again in {}s.", .remaining.as_secs_f32().ceil())]
    OnCooldown { command: String, remaining: Duration },
    #[error("Only the bot owners can use `{command}`.")]
    NotOwner { command: String },
    #[error("Missing the `{name}` argument.")]
    MissingArgument { name: String },
    #[error("Unknown command `{name}`.")]
    UnknownCommand { name: String },
}

/// Errors while reading `config.toml`.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file missing. {action_msg}")]
    MissingConfig { action_msg: String },
    #[error("Invalid config: {reason}")]
    InvalidConfig { reason: String },
    #[error("Could not serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error(transparent)]
    IoError(#[from] std::io::Error),
}

/// Errors from the cooldown store.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Could not access cooldown file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Cooldown file {} is corrupted: {source}", .path.display())]
    Corrupt {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// A definition that was rejected by a loader.
/// Never leaves the loader; it is logged and the definition is skipped.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum DefinitionError {
    #[error("{capability} name '{name}' is invalid: {reason}")]
    InvalidName {
        capability: Capability,
        name: String,
        reason: &'static str,
    },
    #[error("{capability} '{name}' needs a description of 1 to 100 characters")]
    InvalidDescription { capability: Capability, name: String },
    #[error("{capability} custom id '{id}' is invalid: {reason}")]
    InvalidCustomId {
        capability: Capability,
        id: String,
        reason: &'static str,
    },
    #[error("'{event}' is not a gateway event")]
    UnknownEvent { event: String },
    #[error("{capability} '{key}' is already registered")]
    Duplicate { capability: Capability, key: String },
}
