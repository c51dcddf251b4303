//! Loads the definition catalogue into [Registries].

use itertools::Itertools;
use tracing::instrument;

use super::Capability;
use super::Definition;
use super::Registries;
use super::Validate;
use crate::error::DefinitionError;

/// Outcome of loading one capability.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Identifiers that were registered.
    pub loaded: Vec<String>,
    /// Number of rejected definitions.
    pub skipped: usize,
}

/// Definitions split by capability, in catalogue order.
#[derive(Default)]
struct Catalogue {
    message: Vec<super::MessageCommand>,
    events: Vec<super::EventListener>,
    buttons: Vec<super::Component>,
    select_menus: Vec<super::Component>,
    modals: Vec<super::ModalForm>,
    slash: Vec<super::SlashCommand>,
}

impl Catalogue {
    fn split(definitions: Vec<Definition>) -> Self {
        let mut catalogue = Self::default();
        for definition in definitions {
            match definition {
                Definition::Message(d) => catalogue.message.push(d),
                Definition::Event(d) => catalogue.events.push(d),
                Definition::Button(d) => catalogue.buttons.push(d),
                Definition::SelectMenu(d) => catalogue.select_menus.push(d),
                Definition::Modal(d) => catalogue.modals.push(d),
                Definition::Slash(d) => catalogue.slash.push(d),
            }
        }
        catalogue
    }
}

impl Registries {
    /// Build the registries from the catalogue.
    ///
    /// Capabilities load one after another: message commands, events,
    /// buttons, select menus, modal forms, then slash commands.
    /// Invalid or duplicate definitions are logged and skipped.
    #[instrument(level = "debug", skip_all)]
    pub fn load(definitions: Vec<Definition>) -> Self {
        let catalogue = Catalogue::split(definitions);
        let mut registries = Registries::default();

        let reports = [
            load_stage(Capability::MessageCommand, catalogue.message, |c| {
                registries.message_commands.insert(c)
            }),
            load_stage(Capability::EventListener, catalogue.events, |l| {
                registries.events.insert(l)
            }),
            load_stage(Capability::Button, catalogue.buttons, |b| {
                registries.buttons.insert(Capability::Button, b)
            }),
            load_stage(Capability::SelectMenu, catalogue.select_menus, |s| {
                registries.select_menus.insert(Capability::SelectMenu, s)
            }),
            load_stage(Capability::ModalForm, catalogue.modals, |m| {
                registries.modals.insert(Capability::ModalForm, m)
            }),
            load_stage(Capability::SlashCommand, catalogue.slash, |c| {
                let name = c.name.clone();
                registries
                    .slash_commands
                    .insert(Capability::SlashCommand, name.clone(), c)
                    .map(|()| name)
            }),
        ];

        let loaded: usize = reports.iter().map(|r| r.loaded.len()).sum();
        let skipped: usize = reports.iter().map(|r| r.skipped).sum();
        if skipped > 0 {
            tracing::warn!("Loaded {loaded} definitions, skipped {skipped}.");
        } else {
            tracing::info!(success = true, "Loaded all {loaded} definitions.");
        }

        registries
    }
}

/// Validate and insert every definition of one capability.
/// Each definition succeeds or fails on its own.
fn load_stage<T: Validate>(
    capability: Capability,
    definitions: Vec<T>,
    mut insert: impl FnMut(T) -> Result<String, DefinitionError>,
) -> LoadReport {
    let mut report = LoadReport::default();

    if definitions.is_empty() {
        tracing::debug!("No {capability} definitions to load.");
        return report;
    }

    for definition in definitions {
        match definition.validate(capability).and_then(|()| insert(definition)) {
            Ok(key) => report.loaded.push(key),
            Err(error) => {
                tracing::warn!("Skipping {capability}: {error}");
                report.skipped += 1;
            }
        }
    }

    tracing::info!(
        "Loaded {} {capability}(s): {}",
        report.loaded.len(),
        report.loaded.iter().join(", ")
    );

    report
}

#[cfg(test)]
mod test {
    use futures::FutureExt;

    use super::*;
    use crate::commands;
    use crate::registry::Component;
    use crate::registry::CustomId;
    use crate::registry::EventListener;
    use crate::registry::MessageCommand;
    use crate::registry::SlashCommand;

    fn message(name: &str, aliases: &[&str]) -> Definition {
        Definition::Message(
            MessageCommand::builder()
                .name(name)
                .aliases(aliases.iter().map(|a| a.to_string()).collect())
                .handler(|_, _, _| async { Ok(()) }.boxed())
                .build(),
        )
    }

    fn button(custom_id: CustomId) -> Definition {
        Definition::Button(
            Component::builder()
                .custom_id(custom_id)
                .handler(|_, _| async { Ok(()) }.boxed())
                .build(),
        )
    }

    #[test]
    fn ping_and_echo_resolve_by_name_and_alias() {
        let registries = Registries::load(commands::message::list());
        let commands = &registries.message_commands;

        assert_eq!(commands.resolve("ping").map(|c| c.name.as_str()), Some("ping"));
        assert_eq!(commands.resolve("p").map(|c| c.name.as_str()), Some("ping"));
        assert_eq!(commands.resolve("echo").map(|c| c.name.as_str()), Some("echo"));
        assert!(commands.resolve("unknown").is_none());
    }

    #[test]
    fn whole_catalogue_loads_cleanly() {
        let definitions = commands::list();
        let total = definitions.len();
        let registries = Registries::load(definitions);

        let loaded = registries.message_commands.len()
            + registries.events.len()
            + registries.buttons.len()
            + registries.select_menus.len()
            + registries.modals.len()
            + registries.slash_commands.len();
        assert_eq!(loaded, total);
    }

    #[test]
    fn invalid_definitions_are_skipped() {
        let registries = Registries::load(vec![
            message("", &[]),
            message("has space", &[]),
            message("ok", &["k"]),
            Definition::Slash(
                SlashCommand::builder()
                    .name("NoDescription")
                    .handler(|_, _| async { Ok(()) }.boxed())
                    .build(),
            ),
            Definition::Event(
                EventListener::builder()
                    .event("not_an_event")
                    .handler(|_, _| async { Ok(()) }.boxed())
                    .build(),
            ),
        ]);

        assert_eq!(registries.message_commands.len(), 1);
        assert!(registries.message_commands.resolve("k").is_some());
        assert!(registries.slash_commands.is_empty());
        assert_eq!(registries.events.len(), 0);
    }

    #[test]
    fn first_definition_wins_on_duplicates() {
        let registries = Registries::load(vec![
            message("ping", &["p"]),
            message("ping", &[]),
            // Name collides with an alias.
            message("p", &[]),
            // Alias collides with a name, the command stays.
            message("pong", &["ping", "po"]),
        ]);
        let commands = &registries.message_commands;

        assert_eq!(commands.len(), 2);
        assert_eq!(commands.resolve("p").map(|c| c.name.as_str()), Some("ping"));
        assert_eq!(commands.resolve("ping").map(|c| c.name.as_str()), Some("ping"));
        assert_eq!(commands.resolve("po").map(|c| c.name.as_str()), Some("pong"));
        assert_eq!(commands.aliases_of("pong").collect::<Vec<_>>(), vec!["po"]);
    }

    #[test]
    fn second_listener_for_an_event_is_skipped() {
        let listener = |once| {
            Definition::Event(
                EventListener::builder()
                    .event("ready")
                    .once(once)
                    .handler(|_, _| async { Ok(()) }.boxed())
                    .build(),
            )
        };
        let registries = Registries::load(vec![listener(true), listener(false)]);

        assert_eq!(registries.events.len(), 1);
        assert!(registries.events.get("ready").is_some_and(|l| l.once));
        assert!(registries.events.get("guild_create").is_none());
    }

    #[test]
    fn poll_events_are_known() {
        let registries = Registries::load(vec![Definition::Event(
            EventListener::builder()
                .event("poll_vote_add")
                .handler(|_, _| async { Ok(()) }.boxed())
                .build(),
        )]);
        assert_eq!(registries.events.len(), 1);
    }

    #[test]
    fn load_stage_reports_loaded_and_skipped() {
        let mut registries = Registries::default();
        let report = load_stage(
            Capability::Button,
            vec![
                Component::builder()
                    .custom_id(CustomId::exact("a"))
                    .handler(|_, _| async { Ok(()) }.boxed())
                    .build(),
                Component::builder()
                    .custom_id(CustomId::exact("a"))
                    .handler(|_, _| async { Ok(()) }.boxed())
                    .build(),
                Component::builder()
                    .custom_id(CustomId::prefix("b:"))
                    .handler(|_, _| async { Ok(()) }.boxed())
                    .build(),
            ],
            |b| registries.buttons.insert(Capability::Button, b),
        );

        assert_eq!(
            report,
            LoadReport {
                loaded: vec!["a".to_string(), "b:*".to_string()],
                skipped: 1,
            }
        );
    }

    #[test]
    fn components_prefer_exact_then_longest_prefix() {
        let registries = Registries::load(vec![
            button(CustomId::prefix("")),
            button(CustomId::prefix("panel:")),
            button(CustomId::prefix("panel:colour:")),
            button(CustomId::exact("panel:ping")),
        ]);
        let buttons = &registries.buttons;
        let matched = |id: &str| buttons.find(id).map(|b| b.custom_id.key());

        assert_eq!(matched("panel:ping"), Some("panel:ping".to_string()));
        assert_eq!(matched("panel:colour:red"), Some("panel:colour:*".to_string()));
        assert_eq!(matched("panel:other"), Some("panel:*".to_string()));
        assert_eq!(matched("elsewhere"), Some("*".to_string()));
    }

    #[test]
    fn missing_capability_is_a_noop() {
        let registries = Registries::load(Vec::new());
        assert!(registries.message_commands.is_empty());
        assert_eq!(registries.modals.len(), 0);
    }
}
