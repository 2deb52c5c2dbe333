use crate::bot::checks::home_guild_or_owner;
use crate::bot::{Context, Error};
use crate::daemon::DaemonStatus;
use crate::database::models::SettingKey;
use crate::database::queries;
use crate::utils::format::{
    create_error_embed, create_group_help_embed, create_success_embed, format_nickname_change,
    sad_emoji,
};
use crate::utils::time::format_duration;
use crate::utils::validation::validate_nickname;
use poise::serenity_prelude as serenity;

async fn reply(ctx: Context<'_>, embed: serenity::CreateEmbed) -> Result<(), Error> {
    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    Ok(())
}

/// Nickname pool and daemon control for the rotation target
#[poise::command(
    prefix_command,
    aliases("gallon", "gallo", "gm"),
    subcommands("add", "remove", "list", "clear", "switch", "help", "daemon"),
    check = "home_guild_or_owner"
)]
pub async fn gallonmate(ctx: Context<'_>) -> Result<(), Error> {
    reply(ctx, create_group_help_embed(ctx.command(), true)).await
}

/// Register new nickname
#[poise::command(prefix_command, aliases("a"))]
pub async fn add(ctx: Context<'_>, #[rest] value: Option<String>) -> Result<(), Error> {
    let pool = &ctx.data().pool;
    let value = value.unwrap_or_default();

    let valid = match validate_nickname(&value) {
        Ok(value) => !queries::nickname_exists(pool, value).await?,
        Err(e) => {
            tracing::debug!("Rejected nickname {:?}: {}", value, e);
            false
        }
    };

    if !valid {
        return reply(
            ctx,
            create_error_embed("Value either invalid or duplicate (already exists)"),
        )
        .await;
    }

    let author = ctx.author().id.get() as i64;
    let target = ctx.data().config.target_user_id.get() as i64;
    queries::add_nickname(pool, author, target, &value).await?;

    tracing::info!("{} added nickname {:?}", ctx.author().name, value);
    reply(ctx, create_success_embed(&format!("Inserted `{}`", value))).await
}

/// Remove specific nickname
#[poise::command(prefix_command, aliases("rm"))]
pub async fn remove(ctx: Context<'_>, #[rest] value: Option<String>) -> Result<(), Error> {
    let removed = match value.as_deref() {
        Some(value) if !value.is_empty() => {
            queries::remove_nickname(&ctx.data().pool, value).await?
        }
        _ => 0,
    };

    if removed == 0 {
        return reply(
            ctx,
            create_error_embed("Value either invalid or not present in database"),
        )
        .await;
    }

    let value = value.unwrap_or_default();
    tracing::info!("{} removed nickname {:?}", ctx.author().name, value);
    reply(ctx, create_success_embed(&format!("Removed `{}`", value))).await
}

/// List all available nicknames
#[poise::command(prefix_command, aliases("ls"))]
pub async fn list(ctx: Context<'_>) -> Result<(), Error> {
    let pool = &ctx.data().pool;
    let entries = queries::list_nickname_entries(pool).await?;

    if entries.is_empty() {
        return reply(ctx, create_error_embed("No nicknames available")).await;
    }

    let size = queries::database_size(pool).await?;
    let embed = create_success_embed(&format!(
        "There are currently **{}** names in the database:\n\n{}",
        entries.len(),
        entries
            .iter()
            .map(|entry| entry.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    ))
    .footer(serenity::CreateEmbedFooter::new(format!("{} bytes", size)));

    reply(ctx, embed).await
}

/// Remove all nicknames
#[poise::command(prefix_command, aliases("clr"), owners_only)]
pub async fn clear(ctx: Context<'_>) -> Result<(), Error> {
    let removed = queries::truncate_nicknames(&ctx.data().pool).await?;
    tracing::warn!("{} truncated the nickname pool ({} rows)", ctx.author().name, removed);

    reply(ctx, create_success_embed("Table truncated!")).await
}

/// Draw a random nickname and apply it now
#[poise::command(prefix_command, aliases("s", "change", "apply"))]
pub async fn switch(ctx: Context<'_>) -> Result<(), Error> {
    let data = ctx.data();

    let embed = match data.daemon.trigger_now().await {
        Ok(switch) => create_success_embed(&format!(
            "Nickname for <@{}> changed\n\n{}",
            data.config.target_user_id,
            format_nickname_change(&switch.old_name, &switch.new_name)
        )),
        Err(e) => create_error_embed(&format!("{} {}", e.summary(), sad_emoji())),
    };

    reply(ctx, embed).await
}

/// Give the help embed directly
#[poise::command(prefix_command, aliases("h"))]
pub async fn help(ctx: Context<'_>) -> Result<(), Error> {
    match ctx.parent_commands().last() {
        Some(&group) => reply(ctx, create_group_help_embed(group, false)).await,
        None => Ok(()),
    }
}

/// Control the daily rotation daemon
#[poise::command(
    prefix_command,
    aliases("d"),
    subcommands("daemon_status", "daemon_stop", "daemon_start", "daemon_announce", "daemon_help")
)]
pub async fn daemon(ctx: Context<'_>) -> Result<(), Error> {
    reply(ctx, create_group_help_embed(ctx.command(), true)).await
}

/// Check whether the daemon is currently running
#[poise::command(prefix_command, rename = "status", aliases("state"))]
pub async fn daemon_status(ctx: Context<'_>) -> Result<(), Error> {
    let embed = match ctx.data().daemon.status().await {
        DaemonStatus::Running { remaining } => create_success_embed(&format!(
            "Daemon is running, scheduled delta: `{}` (raw `{}`)",
            format_duration(remaining),
            remaining.as_secs()
        )),
        DaemonStatus::Stopped => create_error_embed("Daemon is inactive"),
    };

    reply(ctx, embed).await
}

/// Stop the daemon
#[poise::command(prefix_command, rename = "stop", aliases("kill", "k", "disable"))]
pub async fn daemon_stop(ctx: Context<'_>) -> Result<(), Error> {
    let embed = match ctx.data().daemon.stop().await {
        Ok(()) => {
            tracing::info!("{} stopped the daemon", ctx.author().name);
            create_success_embed("Daemon has been stopped")
        }
        Err(_) => create_error_embed("Daemon is not running!"),
    };

    reply(ctx, embed).await
}

/// Start the daemon
#[poise::command(prefix_command, rename = "start", aliases("enable"))]
pub async fn daemon_start(ctx: Context<'_>) -> Result<(), Error> {
    let embed = match ctx.data().daemon.start().await {
        Ok(()) => {
            tracing::info!("{} started the daemon", ctx.author().name);
            create_success_embed("Daemon has been started")
        }
        Err(_) => create_error_embed("Daemon is already running!"),
    };

    reply(ctx, embed).await
}

/// Read or set whether daily switches are announced
#[poise::command(prefix_command, rename = "announce", aliases("ann"))]
pub async fn daemon_announce(ctx: Context<'_>, value: Option<bool>) -> Result<(), Error> {
    let data = ctx.data();

    if let Some(value) = value {
        queries::set_setting(&data.pool, SettingKey::AnnounceRotation, i64::from(value)).await?;
        data.daemon.set_announce(value);
    }

    reply(
        ctx,
        create_success_embed(&format!(
            "Daemon announce control var: `{}`",
            data.daemon.announces()
        )),
    )
    .await
}

/// Give the help embed directly
#[poise::command(prefix_command, rename = "help", aliases("h"))]
pub async fn daemon_help(ctx: Context<'_>) -> Result<(), Error> {
    match ctx.parent_commands().last() {
        Some(&group) => reply(ctx, create_group_help_embed(group, false)).await,
        None => Ok(()),
    }
}
