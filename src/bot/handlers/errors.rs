//! Translates framework errors into canned replies.

use crate::bot::{Data, Error};
use crate::utils::format::{create_error_embed, sad_emoji};
use poise::serenity_prelude as serenity;
use poise::FrameworkError;

const EMOJI_PLACEHOLDER: &str = "{emoji}";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    UnknownCommand,
    InvalidInput,
    CheckFailed,
    Cooldown,
    CommandFailed,
    Other,
}

impl ErrorKind {
    pub fn of(error: &FrameworkError<'_, Data, Error>) -> Self {
        match error {
            FrameworkError::UnknownCommand { .. } => ErrorKind::UnknownCommand,
            FrameworkError::ArgumentParse { .. } => ErrorKind::InvalidInput,
            FrameworkError::CommandCheckFailed { .. }
            | FrameworkError::NotAnOwner { .. }
            | FrameworkError::GuildOnly { .. }
            | FrameworkError::MissingUserPermissions { .. } => ErrorKind::CheckFailed,
            FrameworkError::CooldownHit { .. } => ErrorKind::Cooldown,
            FrameworkError::Command { .. } => ErrorKind::CommandFailed,
            _ => ErrorKind::Other,
        }
    }

    /// Canned reply, possibly with an emoji placeholder. `None` for errors
    /// left to the framework's own handler.
    pub fn template(self) -> Option<&'static str> {
        match self {
            ErrorKind::UnknownCommand => Some("No such command exists"),
            ErrorKind::InvalidInput => Some("Command was invoked with invalid parameters {emoji}"),
            ErrorKind::CheckFailed => Some("Permission check failed {emoji}"),
            ErrorKind::Cooldown => Some("Command is currently on cooldown!"),
            ErrorKind::CommandFailed => Some("Command failed to execute {emoji}"),
            ErrorKind::Other => None,
        }
    }
}

pub fn render(template: &str, emoji: &str) -> String {
    template.replace(EMOJI_PLACEHOLDER, emoji)
}

pub async fn on_error(error: FrameworkError<'_, Data, Error>) {
    let kind = ErrorKind::of(&error);

    let Some(template) = kind.template() else {
        if let Err(e) = poise::builtins::on_error(error).await {
            tracing::error!("Error while handling error: {}", e);
        }
        return;
    };

    let embed = create_error_embed(&render(template, sad_emoji()));

    let sent = match &error {
        FrameworkError::UnknownCommand { ctx, msg, .. } => msg
            .channel_id
            .send_message(*ctx, serenity::CreateMessage::new().embed(embed))
            .await
            .map(|_| ()),
        other => match other.ctx() {
            Some(ctx) => ctx
                .send(poise::CreateReply::default().embed(embed))
                .await
                .map(|_| ()),
            None => Ok(()),
        },
    };

    if let Err(e) = sent {
        tracing::warn!("Failed to send error response: {}", e);
    }

    match error {
        FrameworkError::Command { error, ctx, .. } => {
            tracing::error!(
                "Command '{}' failed: {:?}",
                ctx.command().qualified_name,
                error
            );
        }
        _ => tracing::debug!("Handled {:?} framework error", kind),
    }
}
