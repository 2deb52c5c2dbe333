//! Reaction roll on messages from the rotation target.

use crate::bot::Data;
use anyhow::Result;
use poise::serenity_prelude as serenity;
use rand::Rng;

/// One in this many messages gets rolled.
pub const ROLL_ODDS: u32 = 100;

pub fn roll<R: Rng + ?Sized>(rng: &mut R) -> bool {
    rng.gen_range(0..ROLL_ODDS) == 0
}

pub fn is_rollable(message: &serenity::Message, target: serenity::UserId) -> bool {
    message.guild_id.is_some() && message.author.id == target
}

pub async fn on_message(
    ctx: &serenity::Context,
    message: &serenity::Message,
    data: &Data,
) -> Result<()> {
    if !is_rollable(message, data.config.target_user_id) || !roll(&mut rand::thread_rng()) {
        return Ok(());
    }

    let Some(rolls_channel) = data.config.rolls_channel_id else {
        return Ok(());
    };

    tracing::info!("Rolled message {} in channel {}", message.id, message.channel_id);

    let emoji = data
        .config
        .roll_emoji
        .parse::<serenity::ReactionType>()
        .map_err(|e| anyhow::anyhow!("Invalid roll emoji {:?}: {:?}", data.config.roll_emoji, e))?;
    message.react(ctx, emoji).await?;

    relay_message(ctx, message, rolls_channel).await
}

/// Quote `message` into `target`, re-uploading its first attachment.
async fn relay_message(
    ctx: &serenity::Context,
    message: &serenity::Message,
    target: serenity::ChannelId,
) -> Result<()> {
    let author = &message.author;
    let nick = message.author_nick(ctx).await;
    let name = match nick {
        Some(nick) if nick != author.name => format!("{} ({})", nick, author.name),
        _ => author.name.clone(),
    };

    let guild_name = message
        .guild_id
        .and_then(|id| ctx.cache.guild(id).map(|guild| guild.name.clone()))
        .unwrap_or_else(|| "unknown guild".to_string());
    let channel_name = message
        .channel_id
        .name(ctx)
        .await
        .unwrap_or_else(|_| "unknown channel".to_string());

    let mut embed = serenity::CreateEmbed::new()
        .description(&message.content)
        .author(serenity::CreateEmbedAuthor::new(name).icon_url(author.face()))
        .footer(serenity::CreateEmbedFooter::new(format!(
            "{} - {}",
            guild_name, channel_name
        )))
        .timestamp(message.timestamp);
    let mut relay = serenity::CreateMessage::new();

    if let Some(attachment) = message.attachments.first() {
        tracing::debug!(
            "Relaying first of {} attachments",
            message.attachments.len()
        );
        match attachment.download().await {
            Ok(bytes) => {
                embed = embed.image(format!("attachment://{}", attachment.filename));
                relay = relay.add_file(serenity::CreateAttachment::bytes(
                    bytes,
                    attachment.filename.clone(),
                ));
            }
            Err(e) => tracing::warn!("Failed to download attachment {}: {}", attachment.url, e),
        }
    }

    target.send_message(ctx, relay.embed(embed)).await?;
    Ok(())
}
