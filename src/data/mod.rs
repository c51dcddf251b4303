//! This module contains everything relating to [Data].

mod cooldown;

use std::collections::HashSet;
use std::time::Duration;

use serenity::UserId;

use crate::error::BotError;
use crate::error::UserError;
use crate::registry::MessageCommand;
use crate::registry::Registries;
use crate::serenity;
pub use cooldown::now_millis;
pub use cooldown::Cooldown;
pub use cooldown::CooldownStore;

/// The application context.
///
/// Built once before logging in and handed to the framework, which shares it
/// with every handler. Nothing in here is replaced after startup.
#[derive(bon::Builder)]
#[builder(on(String, into))]
pub struct Data {
    /// Prefix for message commands.
    pub prefix: String,
    /// Users allowed to run owner-only commands.
    #[builder(default)]
    pub owners: HashSet<UserId>,
    /// Users that receive bug notifications.
    #[builder(default)]
    pub notify_list: HashSet<UserId>,
    /// Every loaded command, component handler and event listener.
    pub registries: Registries,
    /// Persisted per-user cooldowns.
    pub cooldowns: CooldownStore,
}

impl Data {
    /// Find a message command by name or alias.
    pub fn message_command(&self, name: &str) -> Option<&MessageCommand> {
        self.registries.message_commands.resolve(name)
    }

    /// Is `user` one of the configured owners?
    pub fn is_owner(&self, user: UserId) -> bool {
        self.owners.contains(&user)
    }

    /// Checks whether `user` may run `command` right now.
    ///
    /// Rejects non-owners from owner-only commands. For throttled commands,
    /// rejects while the cooldown is running, otherwise starts a new one.
    pub fn admit(
        &self,
        user: UserId,
        command: &str,
        owner_only: bool,
        cooldown: Option<Duration>,
    ) -> Result<(), BotError> {
        self.admit_at(user, command, owner_only, cooldown, now_millis())
    }

    /// [Data::admit] at `now` (unix millis).
    fn admit_at(
        &self,
        user: UserId,
        command: &str,
        owner_only: bool,
        cooldown: Option<Duration>,
        now: i64,
    ) -> Result<(), BotError> {
        if owner_only && !self.is_owner(user) {
            Err(UserError::NotOwner {
                command: command.to_string(),
            })?
        }

        let Some(duration) = cooldown else {
            return Ok(());
        };

        let key = CooldownStore::key(user, command);
        match self.cooldowns.throttle(&key, now, duration)? {
            Cooldown::Ready => Ok(()),
            Cooldown::Wait(remaining) => Err(UserError::OnCooldown {
                command: command.to_string(),
                remaining,
            }
            .into()),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::commands;
    use crate::registry::Definition;

    fn owner() -> UserId {
        UserId::new(1)
    }

    fn member() -> UserId {
        UserId::new(2)
    }

    fn data(dir: &tempfile::TempDir) -> Data {
        let cooldowns = CooldownStore::open(dir.path().join("cooldowns.json")).unwrap();
        Data::builder()
            .prefix("!")
            .owners(HashSet::from([owner()]))
            .registries(Registries::default())
            .cooldowns(cooldowns)
            .build()
    }

    /// The shipped definition of a message command.
    fn shipped(name: &str) -> MessageCommand {
        commands::message::list()
            .into_iter()
            .find_map(|definition| match definition {
                Definition::Message(command) if command.name == name => Some(command),
                _ => None,
            })
            .unwrap()
    }

    #[test]
    fn owner_only_commands_reject_other_users() {
        let dir = tempfile::tempdir().unwrap();
        let data = data(&dir);
        let owners = shipped("owners");
        assert!(owners.owner_only);

        let rejected = data.admit(member(), &owners.name, owners.owner_only, owners.cooldown);
        assert!(matches!(
            rejected,
            Err(BotError::UserError(UserError::NotOwner { command })) if command == "owners"
        ));

        assert!(data
            .admit(owner(), &owners.name, owners.owner_only, owners.cooldown)
            .is_ok());
    }

    #[test]
    fn ten_second_cooldown_blocks_then_permits() {
        let dir = tempfile::tempdir().unwrap();
        let data = data(&dir);
        let echo = shipped("echo");
        assert_eq!(echo.cooldown, Some(Duration::from_secs(10)));

        let start = 1_700_000_000_000;
        let admit = |now| data.admit_at(member(), &echo.name, echo.owner_only, echo.cooldown, now);

        assert!(admit(start).is_ok());
        assert!(matches!(
            admit(start + 4_000),
            Err(BotError::UserError(UserError::OnCooldown { remaining, .. }))
                if remaining == Duration::from_secs(6)
        ));
        assert!(admit(start + 10_000).is_ok());

        // Other users keep their own cooldowns.
        assert!(data
            .admit_at(owner(), &echo.name, echo.owner_only, echo.cooldown, start + 4_000)
            .is_ok());
    }
}
