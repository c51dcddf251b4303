//! Registries of commands, component handlers and event listeners.
//!
//! Registries start empty, are filled once by [Registries::load] before the
//! bot logs in, and are only read afterwards.

mod definition;
mod loader;

use std::collections::hash_map;
use std::collections::HashMap;
use std::fmt::Display;

use delegate::delegate;
use itertools::Itertools;

use crate::error::DefinitionError;
pub use definition::Component;
pub use definition::CustomId;
pub use definition::Definition;
pub use definition::EventListener;
pub use definition::HasCustomId;
pub use definition::MessageCommand;
pub use definition::ModalForm;
pub use definition::SlashCommand;
pub use definition::Validate;

/// The kinds of things the bot can register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    MessageCommand,
    SlashCommand,
    Button,
    SelectMenu,
    ModalForm,
    EventListener,
}

impl Display for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Capability::MessageCommand => "message command",
            Capability::SlashCommand => "slash command",
            Capability::Button => "button",
            Capability::SelectMenu => "select menu",
            Capability::ModalForm => "modal form",
            Capability::EventListener => "event listener",
        };
        f.write_str(name)
    }
}

/// Map from identifier to entry. Identifiers are unique.
pub struct Registry<T> {
    #[allow(clippy::missing_docs_in_private_items)]
    entries: HashMap<String, T>,
}

impl<T> Default for Registry<T> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<T> Registry<T> {
    /// Look up an entry by identifier.
    pub fn get(&self, key: &str) -> Option<&T> {
        self.entries.get(key)
    }

    /// Add an entry. The first entry for an identifier wins.
    pub fn insert(
        &mut self,
        capability: Capability,
        key: String,
        entry: T,
    ) -> Result<(), DefinitionError> {
        match self.entries.entry(key) {
            hash_map::Entry::Occupied(taken) => Err(DefinitionError::Duplicate {
                capability,
                key: taken.key().clone(),
            }),
            hash_map::Entry::Vacant(slot) => {
                slot.insert(entry);
                Ok(())
            }
        }
    }

    delegate! {
        to self.entries {
            pub fn len(&self) -> usize;
            pub fn is_empty(&self) -> bool;
            pub fn values(&self) -> hash_map::Values<'_, String, T>;
        }
    }
}

/// Message commands, looked up by name or alias.
#[derive(Default)]
pub struct MessageCommands {
    /// Commands by name.
    commands: Registry<MessageCommand>,
    /// Alias to command name.
    aliases: HashMap<String, String>,
}

impl MessageCommands {
    /// Find a command by its name, falling back to its aliases.
    pub fn resolve(&self, name: &str) -> Option<&MessageCommand> {
        self.commands.get(name).or_else(|| {
            self.aliases
                .get(name)
                .and_then(|target| self.commands.get(target))
        })
    }

    /// Register a command and its aliases, returning its name.
    ///
    /// A name already used by another command or alias rejects the command.
    /// A taken alias is only skipped, the command keeps its other names.
    pub fn insert(&mut self, command: MessageCommand) -> Result<String, DefinitionError> {
        let capability = Capability::MessageCommand;
        let name = command.name.clone();

        if self.aliases.contains_key(&name) {
            return Err(DefinitionError::Duplicate {
                capability,
                key: name,
            });
        }

        let aliases = command.aliases.clone();
        self.commands.insert(capability, name.clone(), command)?;

        for alias in aliases {
            if self.resolve(&alias).is_some() {
                let error = DefinitionError::Duplicate {
                    capability,
                    key: alias,
                };
                tracing::warn!("Skipping alias of '{name}': {error}");
                continue;
            }
            self.aliases.insert(alias, name.clone());
        }

        Ok(name)
    }

    /// All commands, sorted by name.
    pub fn iter(&self) -> impl Iterator<Item = &MessageCommand> {
        self.commands.values().sorted_by(|a, b| a.name.cmp(&b.name))
    }

    /// Aliases pointing at `name`, sorted.
    pub fn aliases_of<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> {
        self.aliases
            .iter()
            .filter(move |(_, target)| target.as_str() == name)
            .map(|(alias, _)| alias.as_str())
            .sorted()
    }

    delegate! {
        to self.commands {
            pub fn len(&self) -> usize;
            pub fn is_empty(&self) -> bool;
        }
    }
}

/// Component or modal handlers, matched by exact custom id first and then
/// by the longest matching prefix.
pub struct ComponentRegistry<T> {
    /// Handlers for exact ids.
    exact: Registry<T>,
    /// Prefix handlers, longest prefix first.
    prefixed: Vec<T>,
}

impl<T> Default for ComponentRegistry<T> {
    fn default() -> Self {
        Self {
            exact: Registry::default(),
            prefixed: Vec::new(),
        }
    }
}

impl<T: HasCustomId> ComponentRegistry<T> {
    /// Find the handler for an incoming custom id.
    pub fn find(&self, custom_id: &str) -> Option<&T> {
        self.exact.get(custom_id).or_else(|| {
            self.prefixed
                .iter()
                .find(|entry| entry.custom_id().matches(custom_id))
        })
    }

    /// Register a handler under its custom id rule, returning the rule's key.
    pub fn insert(&mut self, capability: Capability, entry: T) -> Result<String, DefinitionError> {
        let key = entry.custom_id().key();

        match entry.custom_id().clone() {
            CustomId::Exact(id) => self.exact.insert(capability, id, entry)?,
            CustomId::Prefix(prefix) => {
                let taken = self
                    .prefixed
                    .iter()
                    .any(|other| *other.custom_id() == CustomId::Prefix(prefix.clone()));
                if taken {
                    return Err(DefinitionError::Duplicate { capability, key });
                }

                self.prefixed.push(entry);
                // Stable, so equal lengths keep registration order.
                self.prefixed
                    .sort_by_key(|e| std::cmp::Reverse(prefix_len(e.custom_id())));
            }
        }

        Ok(key)
    }

    /// Number of handlers.
    pub fn len(&self) -> usize {
        self.exact.len() + self.prefixed.len()
    }
}

/// Length of a prefix rule, zero for exact rules.
fn prefix_len(id: &CustomId) -> usize {
    match id {
        CustomId::Prefix(prefix) => prefix.len(),
        CustomId::Exact(_) => 0,
    }
}

/// Event listeners keyed by event name, one listener per event.
#[derive(Default)]
pub struct EventListeners {
    #[allow(clippy::missing_docs_in_private_items)]
    by_event: Registry<EventListener>,
}

impl EventListeners {
    /// The listener for `event`, if any.
    pub fn get(&self, event: &str) -> Option<&EventListener> {
        self.by_event.get(event)
    }

    /// Add a listener, returning its event name.
    /// The first listener for an event wins.
    pub fn insert(&mut self, listener: EventListener) -> Result<String, DefinitionError> {
        let event = listener.event.clone();
        self.by_event
            .insert(Capability::EventListener, event.clone(), listener)?;
        Ok(event)
    }

    delegate! {
        to self.by_event {
            pub fn len(&self) -> usize;
        }
    }
}

/// Every registry the dispatcher reads from.
#[derive(Default)]
pub struct Registries {
    pub message_commands: MessageCommands,
    pub events: EventListeners,
    pub buttons: ComponentRegistry<Component>,
    pub select_menus: ComponentRegistry<Component>,
    pub modals: ComponentRegistry<ModalForm>,
    pub slash_commands: Registry<SlashCommand>,
}
