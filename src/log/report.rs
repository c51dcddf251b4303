//! Error boundary for handler failures.
//!
//! The framework hands every error returned by the dispatcher to
//! [handle_framework_error]. User errors are replied to whoever triggered
//! them; anything else is logged as an error and reported to the notify list.

use poise::BoxFuture;
use poise::FrameworkError;
use tracing::debug;
use tracing::error;
use tracing::trace;

use crate::error::BotError;
use crate::serenity;
use crate::Data;

/// Defines how each framework error is handled.
pub fn handle_framework_error(err: FrameworkError<'_, Data, BotError>) -> BoxFuture<'_, ()> {
    let handler = async move {
        match err {
            FrameworkError::Setup { error, .. } => error!("Error during startup: {error}"),

            // Commands live in our own registries, the framework's lists stay empty.
            FrameworkError::UnknownCommand { .. } | FrameworkError::UnknownInteraction { .. } => {
                trace!("Framework saw a command it doesn't own.")
            }

            FrameworkError::EventHandler {
                error,
                ctx,
                event,
                framework,
                ..
            } => {
                let target = Target::from_event(event);
                let data = framework.user_data;

                match error {
                    BotError::UserError(user_error) => {
                        Response::builder()
                            .ctx(ctx)
                            .data(data)
                            .maybe_target(target)
                            .reply(user_error.to_string())
                            .source(user_error)
                            .build()
                            .send()
                            .await;
                    }
                    error => {
                        let event_name = event.snake_case_name();
                        Response::builder()
                            .ctx(ctx)
                            .data(data)
                            .maybe_target(target)
                            .reply("Something went wrong... A bug report has been sent.")
                            .source(error)
                            .add_info(format!("while handling '{event_name}'"))
                            .notify(true)
                            .is_error(true)
                            .build()
                            .send()
                            .await;
                    }
                }
            }

            _ => error!("Unhandled framework error."),
        }
    };

    Box::pin(handler)
}

/// Where to reply to the user that triggered an event.
#[derive(Debug, Clone, Copy)]
enum Target<'a> {
    Message(&'a serenity::Message),
    Command(&'a serenity::CommandInteraction),
    Component(&'a serenity::ComponentInteraction),
    Modal(&'a serenity::ModalInteraction),
}

impl<'a> Target<'a> {
    /// The reply target for events triggered by a user.
    fn from_event(event: &'a serenity::FullEvent) -> Option<Self> {
        match event {
            serenity::FullEvent::Message { new_message } => Some(Target::Message(new_message)),
            serenity::FullEvent::InteractionCreate { interaction } => match interaction {
                serenity::Interaction::Command(i) => Some(Target::Command(i)),
                serenity::Interaction::Component(i) => Some(Target::Component(i)),
                serenity::Interaction::Modal(i) => Some(Target::Modal(i)),
                _ => None,
            },
            _ => None,
        }
    }

    /// Short description for bug reports.
    fn describe(&self) -> String {
        match self {
            Target::Message(m) => format!("{} sent '{}'", m.author.name, m.content),
            Target::Command(i) => format!("{} used /{}", i.user.name, i.data.name),
            Target::Component(i) => format!("{} clicked '{}'", i.user.name, i.data.custom_id),
            Target::Modal(i) => format!("{} submitted '{}'", i.user.name, i.data.custom_id),
        }
    }

    /// Reply to the user. Interactions get an ephemeral response.
    async fn reply(&self, ctx: &serenity::Context, content: &str) -> Result<(), serenity::Error> {
        let response = || {
            serenity::CreateInteractionResponse::Message(
                serenity::CreateInteractionResponseMessage::new()
                    .content(content)
                    .ephemeral(true),
            )
        };

        match self {
            Target::Message(m) => m.reply(ctx, content).await.map(|_| ()),
            Target::Command(i) => i.create_response(ctx, response()).await,
            Target::Component(i) => i.create_response(ctx, response()).await,
            Target::Modal(i) => i.create_response(ctx, response()).await,
        }
    }
}

/// Sends a notification (via private message) to users in the notify list.
/// If a message fails, only log and don't retry.
async fn notify_bug(ctx: &serenity::Context, data: &Data, content: impl Into<String>) {
    let message = serenity::CreateMessage::new().content(content);

    for user in &data.notify_list {
        if let Err(e) = user.direct_message(ctx, message.clone()).await {
            error!("Failed to send bug notification. {e}");
        }
    }
}

/// Structured response to errors.
/// Always logs as at least [debug level](tracing::debug), but is upgraded to
/// [error level](tracing::error) if `is_error` is set.
#[derive(bon::Builder)]
#[builder(on(String, into))]
struct Response<'a> {
    /// Discord client context.
    ctx: &'a serenity::Context,
    /// Application data, for the notify list.
    data: &'a Data,
    /// Who to reply to, if anyone.
    target: Option<Target<'a>>,
    /// The reason for this reply, usually the error causing the response.
    #[builder(into)]
    source: BotError,
    /// Optional reply to the user.
    reply: Option<String>,
    /// Additional information to log
    add_info: Option<String>,
    /// Set to `true` to log as error.
    #[builder(default = false)]
    is_error: bool,
    /// Set to `true` to send notifications of the error.
    /// Does nothing if `is_error` is false.
    #[builder(default = false)]
    notify: bool,
}

impl Response<'_> {
    /// Execute the response
    async fn send(&self) {
        let log_message = {
            let source = &self.source;
            let add_info = self
                .add_info
                .as_ref()
                .map_or("".to_string(), |s| format!("| {s}"));
            format!("{source} {add_info}")
        };

        if self.is_error {
            error!("{log_message}");
            if self.notify {
                let dbg_info = self
                    .target
                    .map_or("no user involved".to_string(), |t| t.describe());
                let content = format!("Debug Info: {dbg_info}\n{log_message}");
                notify_bug(self.ctx, self.data, content).await;
            }
        } else {
            debug!("{log_message}");
        }

        if let (Some(target), Some(reply)) = (self.target, &self.reply) {
            if let Err(e) = target.reply(self.ctx, reply).await {
                error!("Failed to reply to user. {e}");
            }
        }
    }
}
