//! Configuration for running this bot.

use std::collections::HashSet;

use serde::Deserialize;
use serde::Serialize;
use serenity::GuildId;
use serenity::UserId;

use crate::error::ConfigError;
use crate::log::Badges;
use crate::log::TimeZone;
use crate::serenity;

/// The path to the config file
const CONFIG_PATH: &str = "config.toml";

/// Environment variable that overrides the token in [CONFIG_PATH].
const TOKEN_VAR: &str = "DISCORD_TOKEN";

/// Settings read from [CONFIG_PATH] that modify bot behavior.
#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    /// Token needed to use a bot account.
    discord_token: String,

    /// Prefix for message commands.
    prefix: String,

    /// Users allowed to run owner-only commands.
    #[serde(default)]
    owners: Vec<UserId>,

    /// File backing the cooldown store.
    cooldown_db: String,

    /// See [LoggingConfig]
    logging: LoggingConfig,

    /// Useful developer specific configs.
    dev_utils: DevConfig,
}

impl Config {
    /// Tries to read [CONFIG_PATH] to extract a [Config].
    /// If a file doesn't exists, create the default config file and returns error.
    /// If a file exists but is empty, re-write the default values and return error.
    /// If a file exists but is incomplete, show error and don't change files.
    /// If a file exists and is complete, read file to create a config.
    /// If file existance is indeterminent (e.g. missing permissions), return error.
    pub fn read() -> Result<Config, ConfigError> {
        let file = std::fs::read_to_string(CONFIG_PATH);

        match file {
            // Config file found
            Ok(content) => {
                // Write default values to file if it's empty.
                if content.trim().is_empty() {
                    write_file(Config::default())?;
                    Err(ConfigError::InvalidConfig {
                        reason: format!("Empty config file! Rewriting {CONFIG_PATH} ..."),
                    })
                } else {
                    Config::parse(&content)
                }
            }
            // File not found or other filesystem error
            Err(file_error) => match file_error.kind() {
                // If file doesn't exist, create default config file.
                std::io::ErrorKind::NotFound => {
                    let action = format!("Creating {CONFIG_PATH}...");
                    write_file(Config::default())?;
                    Err(ConfigError::MissingConfig { action_msg: action })
                }
                _ => Err(ConfigError::IoError(file_error)),
            },
        }
    }

    /// Parse and check the content of a config file.
    /// Deserialization errors describe the path of the mistake.
    pub fn parse(content: &str) -> Result<Config, ConfigError> {
        let to_toml = toml::Deserializer::new(content);
        let config: Config =
            serde_path_to_error::deserialize(to_toml).map_err(|error| ConfigError::InvalidConfig {
                reason: error.to_string(),
            })?;

        if config.prefix.is_empty() || config.prefix.chars().any(char::is_whitespace) {
            return Err(ConfigError::InvalidConfig {
                reason: "prefix must be non-empty and contain no whitespace".to_string(),
            });
        }

        Ok(config)
    }

    /// The token from the environment, or from the file after a basic sanity check.
    pub fn token(&self) -> Result<String, ConfigError> {
        if let Ok(token) = std::env::var(TOKEN_VAR) {
            if !token.trim().is_empty() {
                return Ok(token);
            }
        }

        self.file_token().cloned()
    }

    /// Basic sanity check for if a token was given in the file.
    fn file_token(&self) -> Result<&String, ConfigError> {
        let default_token = Config::default().discord_token;
        let given_token = &self.discord_token;

        let is_empty = given_token.trim().is_empty();
        let contains_default = given_token.contains(&default_token);

        if !is_empty && !contains_default {
            Ok(&self.discord_token)
        } else {
            Err(ConfigError::InvalidConfig {
                reason: format!("Missing discord token, set it in {CONFIG_PATH} or {TOKEN_VAR}"),
            })
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn owners(&self) -> HashSet<UserId> {
        self.owners.iter().copied().collect()
    }

    /// Construct a bug notification notify list based on the config.
    pub fn notify_list(&self) -> HashSet<UserId> {
        self.dev_utils.notifications.notify_list(&self.owners)
    }

    pub fn cooldown_db(&self) -> &str {
        &self.cooldown_db
    }

    pub fn logging(&self) -> &LoggingConfig {
        &self.logging
    }

    pub fn dev_guild(&self) -> Option<GuildId> {
        self.dev_utils.dev_guild
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            discord_token: "put_token_here".to_string(),
            prefix: "!".to_string(),
            owners: vec![],
            cooldown_db: "cooldownDB.json".to_string(),

            logging: LoggingConfig {
                console_debug: false,
                logs_enabled: true,
                log_dir: "logs".to_string(),
                show_timestamp: true,
                time_zone: TimeZone::Local,
                badges: Badges::default(),
            },

            dev_utils: DevConfig {
                dev_guild: None,
                notifications: NotifyConfig {
                    enabled: false,
                    add_owners: true,
                    userids: vec![],
                },
            },
        }
    }
}

/// Configs for console and file logs.
#[derive(Debug, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Print debug traces to console?
    pub console_debug: bool,
    /// Enable writing to log file?
    pub logs_enabled: bool,
    /// Directory to store log files
    pub log_dir: String,
    /// Show `[date time]` on console lines?
    #[serde(default = "enabled")]
    pub show_timestamp: bool,
    /// Zone of console timestamps.
    #[serde(default)]
    pub time_zone: TimeZone,
    /// Glyphs in front of console lines.
    #[serde(default)]
    pub badges: Badges,
}

/// Optional configs to enable developer-specific behavior.
#[derive(Debug, Serialize, Deserialize)]
struct DevConfig {
    /// Optional guild to automatically update commands quickly.
    #[serde(serialize_with = "serialize_opt", deserialize_with = "deserialize_opt")]
    dev_guild: Option<GuildId>,
    /// See [NotifyConfig]
    notifications: NotifyConfig,
}

/// Configs for notification behavior when encountering unexpected errors.
#[derive(Debug, Serialize, Deserialize)]
struct NotifyConfig {
    /// Enable this behavior or not. (bot sends a private message)
    enabled: bool,
    /// Whether to automatically add owners to the notify list.
    add_owners: bool,
    /// Additional users to add to the notify list.
    userids: Vec<UserId>,
}

impl NotifyConfig {
    /// Construct a bug notification notify list based on the config.
    fn notify_list(&self, owners: &[UserId]) -> HashSet<UserId> {
        let mut notify_list = HashSet::new();

        // If disabled, don't add anyone to the list.
        if !self.enabled {
            return notify_list;
        }

        if self.add_owners {
            notify_list.extend(owners.iter().copied());
        }

        notify_list.extend(self.userids.iter().copied());

        notify_list
    }
}

/// Serde default for flags that are on unless turned off.
fn enabled() -> bool {
    true
}

/// Write the given config to [CONFIG_PATH].
fn write_file(config: Config) -> Result<(), ConfigError> {
    let content = toml::to_string_pretty(&config)?;
    std::fs::write(CONFIG_PATH, content).map_err(ConfigError::IoError)
}

fn deserialize_opt<'de, D>(deserializer: D) -> Result<Option<GuildId>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    deserializer.deserialize_str(OptVisitor)
}

fn serialize_opt<T, S>(val: &Option<T>, ser: S) -> Result<S::Ok, S::Error>
where
    T: serde::Serialize,
    S: serde::Serializer,
{
    match val {
        Some(v) => v.serialize(ser),
        None => ser.serialize_str(""),
    }
}

struct OptVisitor;

impl<'de> serde::de::Visitor<'de> for OptVisitor {
    type Value = Option<GuildId>;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        formatter.write_str("a valid guild id")
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        match v {
            "" => Ok(None),
            _ => {
                let num: u64 = v.parse().map_err(|_| E::custom("not u64"))?;
                Ok(Some(GuildId::new(num)))
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const EXAMPLE: &str = r#"
        discord_token = "abc.def"
        prefix = "hb!"
        owners = ["1234"]
        cooldown_db = "cooldowns.json"

        [logging]
        console_debug = false
        logs_enabled = false
        log_dir = "logs"
        time_zone = "+06:00"

        [logging.badges]
        error = "!!"

        [dev_utils]
        dev_guild = "42"

        [dev_utils.notifications]
        enabled = true
        add_owners = true
        userids = ["99"]
    "#;

    #[test]
    fn parses_complete_config() {
        let config = Config::parse(EXAMPLE).unwrap();

        assert_eq!(config.prefix(), "hb!");
        assert_eq!(config.cooldown_db(), "cooldowns.json");
        assert_eq!(config.dev_guild(), Some(GuildId::new(42)));
        assert!(config.owners().contains(&UserId::new(1234)));
        assert_eq!(config.logging().time_zone, "+06:00".parse::<TimeZone>().unwrap());
        assert!(config.logging().show_timestamp);
        assert_eq!(config.logging().badges.error, "!!");
        assert_eq!(config.logging().badges.info, Badges::default().info);

        let notify = config.notify_list();
        assert_eq!(notify.len(), 2);
        assert!(notify.contains(&UserId::new(99)));
    }

    #[test]
    fn default_config_round_trips() {
        let content = toml::to_string_pretty(&Config::default()).unwrap();
        let config = Config::parse(&content).unwrap();
        assert_eq!(config.prefix(), "!");
        assert_eq!(config.dev_guild(), None);
        assert_eq!(config.logging().time_zone, TimeZone::Local);
    }

    #[test]
    fn accepts_named_time_zone() {
        let content = EXAMPLE.replace(r#"time_zone = "+06:00""#, r#"time_zone = "Asia/Dhaka""#);
        let config = Config::parse(&content).unwrap();
        assert_eq!(config.logging().time_zone, TimeZone::Named(chrono_tz::Asia::Dhaka));
    }

    #[test]
    fn default_token_is_rejected() {
        let config = Config::default();
        assert!(config.file_token().is_err());
    }

    #[test]
    fn whitespace_prefix_is_rejected() {
        let content = EXAMPLE.replace(r#"prefix = "hb!""#, r#"prefix = "hb !""#);
        assert!(matches!(
            Config::parse(&content),
            Err(ConfigError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn errors_name_the_bad_field() {
        let content = EXAMPLE.replace(r#"time_zone = "+06:00""#, r#"time_zone = "Mars/Olympus""#);
        let Err(ConfigError::InvalidConfig { reason }) = Config::parse(&content) else {
            panic!("expected invalid config");
        };
        assert!(reason.contains("logging.time_zone"));
    }
}
