use crate::bot::{Context, Error};
use crate::utils::time::humanize_since;
use chrono::Utc;
use poise::serenity_prelude as serenity;

/// Basic information about the bot
#[poise::command(prefix_command)]
pub async fn help(ctx: Context<'_>) -> Result<(), Error> {
    let data = ctx.data();
    let avatar = ctx.cache().current_user().face();

    let commands = ctx
        .framework()
        .options()
        .commands
        .iter()
        .map(|cmd| format!("`{}{}`", data.config.prefix, cmd.name))
        .collect::<Vec<_>>()
        .join("\n");

    let embed = serenity::CreateEmbed::new()
        .color(0x2ecc71) // Green
        .author(serenity::CreateEmbedAuthor::new("Ryan ~ real human bean").icon_url(avatar))
        .field("Revision:", format!("`{}`", data.config.revision), false)
        .field("Commands:", commands, false)
        .footer(serenity::CreateEmbedFooter::new(format!(
            "Awakened {}",
            humanize_since(data.started_at, Utc::now())
        )));

    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    Ok(())
}
