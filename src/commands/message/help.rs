//! Implements the `help` message command.
//!
//! Lists every message command with its aliases and cooldown, or the
//! details of a single command when one is named. Cooldowns the caller is
//! still waiting on are shown too.

use futures::FutureExt;
use itertools::Itertools;

use crate::data::now_millis;
use crate::data::Cooldown;
use crate::data::CooldownStore;
use crate::registry::MessageCommand;
use crate::serenity;
use crate::BotError;
use crate::Context;

pub fn help() -> MessageCommand {
    MessageCommand::builder()
        .name("help")
        .aliases(vec!["h".to_string(), "commands".to_string()])
        .description("Lists the message commands.")
        .handler(|ctx, message, args| run(ctx, message, args).boxed())
        .build()
}

async fn run(
    ctx: Context<'_>,
    message: &serenity::Message,
    args: Vec<String>,
) -> Result<(), BotError> {
    let prefix = &ctx.data.prefix;
    let commands = &ctx.data.registries.message_commands;

    let selected = match args.first() {
        Some(name) => commands.resolve(&name.to_lowercase()).into_iter().collect_vec(),
        None => commands.iter().collect_vec(),
    };

    if selected.is_empty() {
        message.reply(ctx.serenity, "No such command.").await?;
        return Ok(());
    }

    let now = now_millis();
    let content = selected
        .into_iter()
        .map(|command| {
            let mut line = format!("`{prefix}{}`", command.name);
            if !command.description.is_empty() {
                line.push_str(&format!(" {}", command.description));
            }

            let aliases = commands.aliases_of(&command.name).join(", ");
            if !aliases.is_empty() {
                line.push_str(&format!(" (aliases: {aliases})"));
            }

            if let Some(cooldown) = command.cooldown {
                line.push_str(&format!(" [{}s cooldown]", cooldown.as_secs()));

                let key = CooldownStore::key(message.author.id, &command.name);
                if let Cooldown::Wait(left) = ctx.data.cooldowns.check(&key, now) {
                    line.push_str(&format!(" ready in {}s", left.as_secs_f32().ceil()));
                }
            }

            line
        })
        .join("\n");

    message.reply(ctx.serenity, content).await?;
    Ok(())
}
