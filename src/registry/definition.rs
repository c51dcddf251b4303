//! Typed definitions for everything the bot can register.
//!
//! Each capability has its own record with a handler of a fixed signature.
//! Records are built with their generated builders and gathered into
//! [Definition]s by the [catalogue](crate::commands).

use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use std::time::Duration;

use futures::future::BoxFuture;

use super::Capability;
use crate::error::BotError;
use crate::error::DefinitionError;
use crate::serenity;
use crate::Context;

/// Future returned by every handler.
pub type HandlerFuture<'a> = BoxFuture<'a, Result<(), BotError>>;

/// Runs a prefixed message command with its whitespace separated arguments.
pub type MessageHandler =
    for<'a> fn(Context<'a>, &'a serenity::Message, Vec<String>) -> HandlerFuture<'a>;

/// Runs a slash command or context menu command.
pub type SlashHandler = for<'a> fn(Context<'a>, &'a serenity::CommandInteraction) -> HandlerFuture<'a>;

/// Runs on a button press or a select menu choice.
pub type ComponentHandler =
    for<'a> fn(Context<'a>, &'a serenity::ComponentInteraction) -> HandlerFuture<'a>;

/// Runs on a modal form submission.
pub type ModalHandler = for<'a> fn(Context<'a>, &'a serenity::ModalInteraction) -> HandlerFuture<'a>;

/// Runs on a gateway event.
pub type EventHandler = for<'a> fn(Context<'a>, &'a serenity::FullEvent) -> HandlerFuture<'a>;

/// Anything the bot can register, tagged by capability.
pub enum Definition {
    Message(MessageCommand),
    Slash(SlashCommand),
    Button(Component),
    SelectMenu(Component),
    Modal(ModalForm),
    Event(EventListener),
}

/// Checks the parts of a definition the type system can't.
pub trait Validate {
    fn validate(&self, capability: Capability) -> Result<(), DefinitionError>;
}

/// A command invoked by a message starting with the configured prefix.
#[derive(bon::Builder)]
#[builder(on(String, into))]
pub struct MessageCommand {
    /// Lowercase name used after the prefix.
    pub name: String,
    /// Alternative names.
    #[builder(default)]
    pub aliases: Vec<String>,
    /// Shown by `help`.
    #[builder(default)]
    pub description: String,
    /// Minimum time between two uses by the same user.
    pub cooldown: Option<Duration>,
    #[builder(default)]
    pub owner_only: bool,
    pub handler: MessageHandler,
}

impl Validate for MessageCommand {
    fn validate(&self, capability: Capability) -> Result<(), DefinitionError> {
        check_word(capability, &self.name)?;
        for alias in &self.aliases {
            check_word(capability, alias)?;
        }
        Ok(())
    }
}

/// A slash command, or a user/message context menu command.
#[derive(bon::Builder)]
#[builder(on(String, into))]
pub struct SlashCommand {
    pub name: String,
    /// Required for chat input commands, ignored for context menus.
    #[builder(default)]
    pub description: String,
    #[builder(default = serenity::CommandType::ChatInput)]
    pub kind: serenity::CommandType,
    /// Declarative option schema sent to discord.
    #[builder(default)]
    pub options: Vec<serenity::CreateCommandOption>,
    pub cooldown: Option<Duration>,
    #[builder(default)]
    pub owner_only: bool,
    pub handler: SlashHandler,
}

impl SlashCommand {
    /// Is this a user or message context menu command?
    pub fn is_context_menu(&self) -> bool {
        self.kind != serenity::CommandType::ChatInput
    }

    /// Schema sent to discord when registering commands.
    pub fn create_command(&self) -> serenity::CreateCommand {
        let command = serenity::CreateCommand::new(&self.name).kind(self.kind);

        if self.is_context_menu() {
            command
        } else {
            command
                .description(&self.description)
                .set_options(self.options.clone())
        }
    }
}

impl Validate for SlashCommand {
    fn validate(&self, capability: Capability) -> Result<(), DefinitionError> {
        let invalid = |reason| DefinitionError::InvalidName {
            capability,
            name: self.name.clone(),
            reason,
        };

        let length = self.name.chars().count();
        if !(1..=32).contains(&length) || self.name.trim().is_empty() {
            return Err(invalid("must be 1 to 32 characters"));
        }

        if self.is_context_menu() {
            return Ok(());
        }

        let allowed = |c: char| c == '-' || c == '_' || (c.is_alphanumeric() && !c.is_uppercase());
        if !self.name.chars().all(allowed) {
            return Err(invalid("only lowercase letters, digits, '-' and '_' are allowed"));
        }

        let description = self.description.chars().count();
        if !(1..=100).contains(&description) {
            return Err(DefinitionError::InvalidDescription {
                capability,
                name: self.name.clone(),
            });
        }

        Ok(())
    }
}

/// How a component handler matches custom ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CustomId {
    /// Matches exactly this id.
    Exact(String),
    /// Matches any id starting with this. An empty prefix matches everything.
    Prefix(String),
}

impl CustomId {
    pub fn exact(id: impl Into<String>) -> Self {
        Self::Exact(id.into())
    }

    pub fn prefix(prefix: impl Into<String>) -> Self {
        Self::Prefix(prefix.into())
    }

    /// Does `id` match this rule?
    pub fn matches(&self, id: &str) -> bool {
        match self {
            CustomId::Exact(exact) => exact == id,
            CustomId::Prefix(prefix) => id.starts_with(prefix.as_str()),
        }
    }

    /// Registry key for this rule, prefixes are marked with a trailing `*`.
    pub fn key(&self) -> String {
        match self {
            CustomId::Exact(id) => id.clone(),
            CustomId::Prefix(prefix) => format!("{prefix}*"),
        }
    }
}

impl Validate for CustomId {
    fn validate(&self, capability: Capability) -> Result<(), DefinitionError> {
        // Discord caps custom ids at 100 characters.
        let (id, min) = match self {
            CustomId::Exact(id) => (id, 1),
            CustomId::Prefix(prefix) => (prefix, 0),
        };

        if (min..=100).contains(&id.chars().count()) {
            Ok(())
        } else {
            Err(DefinitionError::InvalidCustomId {
                capability,
                id: id.clone(),
                reason: "must be 1 to 100 characters",
            })
        }
    }
}

/// Matches custom ids of a component registry entry.
pub trait HasCustomId {
    fn custom_id(&self) -> &CustomId;
}

/// A button or select menu handler.
#[derive(bon::Builder)]
pub struct Component {
    pub custom_id: CustomId,
    pub handler: ComponentHandler,
}

impl HasCustomId for Component {
    fn custom_id(&self) -> &CustomId {
        &self.custom_id
    }
}

impl Validate for Component {
    fn validate(&self, capability: Capability) -> Result<(), DefinitionError> {
        self.custom_id.validate(capability)
    }
}

/// A modal form submission handler.
#[derive(bon::Builder)]
pub struct ModalForm {
    pub custom_id: CustomId,
    pub handler: ModalHandler,
}

impl HasCustomId for ModalForm {
    fn custom_id(&self) -> &CustomId {
        &self.custom_id
    }
}

impl Validate for ModalForm {
    fn validate(&self, capability: Capability) -> Result<(), DefinitionError> {
        self.custom_id.validate(capability)
    }
}

/// A gateway event listener.
#[derive(bon::Builder)]
#[builder(on(String, into))]
pub struct EventListener {
    /// Snake case event name, e.g. `ready` or `guild_create`.
    pub event: String,
    /// Run at most once for the lifetime of the process.
    #[builder(default)]
    pub once: bool,
    pub handler: EventHandler,
    #[builder(skip)]
    fired: AtomicBool,
}

impl EventListener {
    /// Should this listener run for the current event?
    /// Consumes the only run of a `once` listener.
    pub fn arm(&self) -> bool {
        !self.once || !self.fired.swap(true, Ordering::AcqRel)
    }
}

impl Validate for EventListener {
    fn validate(&self, _capability: Capability) -> Result<(), DefinitionError> {
        if GATEWAY_EVENTS.contains(&self.event.as_str()) {
            Ok(())
        } else {
            Err(DefinitionError::UnknownEvent {
                event: self.event.clone(),
            })
        }
    }
}

/// Message command names and aliases are single lowercase words.
fn check_word(capability: Capability, word: &str) -> Result<(), DefinitionError> {
    let reason = if word.is_empty() {
        Some("must not be empty")
    } else if word.chars().any(char::is_whitespace) {
        Some("must not contain whitespace")
    } else if word.chars().any(char::is_uppercase) {
        Some("must be lowercase")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(DefinitionError::InvalidName {
            capability,
            name: word.to_string(),
            reason,
        }),
        None => Ok(()),
    }
}

/// Names of the events the discord client delivers.
const GATEWAY_EVENTS: &[&str] = &[
    "auto_moderation_action_execution",
    "auto_moderation_rule_create",
    "auto_moderation_rule_delete",
    "auto_moderation_rule_update",
    "cache_ready",
    "category_create",
    "category_delete",
    "channel_create",
    "channel_delete",
    "channel_pins_update",
    "channel_update",
    "command_permissions_update",
    "entitlement_create",
    "entitlement_delete",
    "entitlement_update",
    "guild_audit_log_entry_create",
    "guild_ban_addition",
    "guild_ban_removal",
    "guild_create",
    "guild_delete",
    "guild_emojis_update",
    "guild_integrations_update",
    "guild_member_addition",
    "guild_member_removal",
    "guild_member_update",
    "guild_members_chunk",
    "guild_role_create",
    "guild_role_delete",
    "guild_role_update",
    "guild_scheduled_event_create",
    "guild_scheduled_event_delete",
    "guild_scheduled_event_update",
    "guild_scheduled_event_user_add",
    "guild_scheduled_event_user_remove",
    "guild_stickers_update",
    "guild_update",
    "integration_create",
    "integration_delete",
    "integration_update",
    "interaction_create",
    "invite_create",
    "invite_delete",
    "message",
    "message_delete",
    "message_delete_bulk",
    "message_update",
    "poll_vote_add",
    "poll_vote_remove",
    "presence_replace",
    "presence_update",
    "ratelimit",
    "reaction_add",
    "reaction_remove",
    "reaction_remove_all",
    "reaction_remove_emoji",
    "ready",
    "resume",
    "shard_stage_update",
    "shards_ready",
    "stage_instance_create",
    "stage_instance_delete",
    "stage_instance_update",
    "thread_create",
    "thread_delete",
    "thread_list_sync",
    "thread_member_update",
    "thread_members_update",
    "thread_update",
    "typing_start",
    "user_update",
    "voice_channel_status_update",
    "voice_server_update",
    "voice_state_update",
    "webhook_update",
];

#[cfg(test)]
mod test {
    use futures::FutureExt;
    use test_case::test_case;

    use super::*;

    fn slash(name: &str, description: &str, kind: serenity::CommandType) -> SlashCommand {
        SlashCommand::builder()
            .name(name)
            .description(description)
            .kind(kind)
            .handler(|_, _| async { Ok(()) }.boxed())
            .build()
    }

    #[test_case("ping", true; "when lowercase")]
    #[test_case("set-prefix_2", true; "when with dashes and digits")]
    #[test_case("Ping", false; "when uppercase")]
    #[test_case("two words", false; "when with whitespace")]
    #[test_case("", false; "when empty")]
    #[test_case("this-name-is-much-too-long-for-discord", false; "when too long")]
    fn chat_command_names(name: &str, valid: bool) {
        let command = slash(name, "Does a thing.", serenity::CommandType::ChatInput);
        assert_eq!(command.validate(Capability::SlashCommand).is_ok(), valid);
    }

    #[test]
    fn context_menus_allow_spaces_and_capitals() {
        let command = slash("User Info", "", serenity::CommandType::User);
        assert!(command.validate(Capability::SlashCommand).is_ok());
    }

    #[test]
    fn chat_commands_need_description() {
        let command = slash("ping", "", serenity::CommandType::ChatInput);
        assert!(matches!(
            command.validate(Capability::SlashCommand),
            Err(DefinitionError::InvalidDescription { .. })
        ));
    }

    #[test]
    fn message_command_aliases_are_checked() {
        let command = MessageCommand::builder()
            .name("ping")
            .aliases(vec!["P".to_string()])
            .handler(|_, _, _| async { Ok(()) }.boxed())
            .build();
        assert!(command.validate(Capability::MessageCommand).is_err());
    }

    #[test_case(CustomId::exact("panel:ping"), "panel:ping", true)]
    #[test_case(CustomId::exact("panel:ping"), "panel:pin", false)]
    #[test_case(CustomId::prefix("panel:"), "panel:anything", true)]
    #[test_case(CustomId::prefix("panel:"), "other", false)]
    #[test_case(CustomId::prefix(""), "other", true)]
    fn custom_id_matching(rule: CustomId, id: &str, expected: bool) {
        assert_eq!(rule.matches(id), expected);
    }

    #[test]
    fn empty_exact_custom_id_is_invalid() {
        assert!(CustomId::exact("").validate(Capability::Button).is_err());
        assert!(CustomId::prefix("").validate(Capability::Button).is_ok());
    }

    #[test]
    fn unknown_events_are_rejected() {
        let listener = EventListener::builder()
            .event("on_ready")
            .handler(|_, _| async { Ok(()) }.boxed())
            .build();
        assert_eq!(
            listener.validate(Capability::EventListener),
            Err(DefinitionError::UnknownEvent {
                event: "on_ready".to_string()
            })
        );
    }

    #[test]
    fn once_listeners_arm_once() {
        let once = EventListener::builder()
            .event("ready")
            .once(true)
            .handler(|_, _| async { Ok(()) }.boxed())
            .build();
        assert!(once.arm());
        assert!(!once.arm());

        let always = EventListener::builder()
            .event("message")
            .handler(|_, _| async { Ok(()) }.boxed())
            .build();
        assert!(always.arm());
        assert!(always.arm());
    }
}
