use crate::daemon::{Announcer, MemberDirectory, SwitchError};
use crate::utils::format::create_success_embed;
use async_trait::async_trait;
use poise::serenity_prelude as serenity;
use std::sync::Arc;

/// HTTP status of a failed Discord request, if the failure came from Discord.
pub fn status_of(error: &serenity::Error) -> Option<u16> {
    match error {
        serenity::Error::Http(http) => http.status_code().map(|status| status.as_u16()),
        _ => None,
    }
}

pub fn is_forbidden(error: &serenity::Error) -> bool {
    status_of(error) == Some(403)
}

/// Guild members as seen through the gateway cache, falling back to HTTP.
pub struct DiscordDirectory {
    cache: Arc<serenity::Cache>,
    http: Arc<serenity::Http>,
}

impl DiscordDirectory {
    pub fn new(cache: Arc<serenity::Cache>, http: Arc<serenity::Http>) -> Self {
        Self { cache, http }
    }

    fn cached_display_name(
        &self,
        guild: serenity::GuildId,
        user: serenity::UserId,
    ) -> Option<String> {
        let guild = self.cache.guild(guild)?;
        let name = guild.members.get(&user)?.display_name().to_string();
        Some(name)
    }
}

#[async_trait]
impl MemberDirectory for DiscordDirectory {
    async fn display_name(
        &self,
        guild: serenity::GuildId,
        user: serenity::UserId,
    ) -> Result<String, SwitchError> {
        if let Some(name) = self.cached_display_name(guild, user) {
            return Ok(name);
        }

        tracing::debug!("Member {} not cached, fetching from guild {}", user, guild);
        let member = self
            .http
            .get_member(guild, user)
            .await
            .map_err(|e| {
                SwitchError::TargetNotFound(format!("member {} in guild {}: {}", user, guild, e))
            })?;

        Ok(member.display_name().to_string())
    }

    async fn set_nickname(
        &self,
        guild: serenity::GuildId,
        user: serenity::UserId,
        nickname: &str,
    ) -> Result<(), SwitchError> {
        let edit = serenity::EditMember::new().nickname(nickname);

        match guild.edit_member(self.http.as_ref(), user, edit).await {
            Ok(_) => Ok(()),
            Err(e) if is_forbidden(&e) => Err(SwitchError::PermissionDenied { status: 403 }),
            Err(e) => Err(SwitchError::MutationFailed {
                status: status_of(&e),
                detail: e.to_string(),
            }),
        }
    }
}

/// Posts rotation announcements as success embeds into a fixed channel.
pub struct DiscordAnnouncer {
    http: Arc<serenity::Http>,
    channel: serenity::ChannelId,
}

impl DiscordAnnouncer {
    pub fn new(http: Arc<serenity::Http>, channel: serenity::ChannelId) -> Self {
        Self { http, channel }
    }
}

#[async_trait]
impl Announcer for DiscordAnnouncer {
    async fn announce(&self, content: &str) -> anyhow::Result<()> {
        let message = serenity::CreateMessage::new().embed(create_success_embed(content));
        self.channel.send_message(self.http.as_ref(), message).await?;
        Ok(())
    }
}
