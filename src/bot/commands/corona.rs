use crate::bot::{Context, Error};
use crate::corona::{CacheStatus, Country, PerMillion};
use crate::utils::format::{create_error_embed, create_success_embed, format_thousands, sad_emoji};
use crate::utils::time::humanize_since;
use chrono::{DateTime, Utc};
use poise::serenity_prelude as serenity;

const THUMBNAIL: &str = "https://cdn.discordapp.com/attachments/746790524567945277/746790671557591070/coronavirus-5107715_1280.webp";

fn per_million(value: Option<i64>) -> String {
    value.map_or_else(|| "n/a".to_string(), format_thousands)
}

fn stat_field(total: i64, new: i64, pml: Option<i64>) -> String {
    format!(
        "Total: `{}`\nNew: `{}`\nPer-mil: `{}`",
        format_thousands(total),
        format_thousands(new),
        per_million(pml)
    )
}

pub fn create_country_embed(
    country: &Country,
    refreshed_at: DateTime<Utc>,
) -> serenity::CreateEmbed {
    let pm: Option<PerMillion> = country.per_million;

    let title = format!(
        "Currently active cases: `{}` (`{}` per million)",
        format_thousands(country.active),
        per_million(pm.map(|p| p.active))
    );

    let mut embed = serenity::CreateEmbed::new()
        .title(title)
        .color(0x7289da) // Blurple
        .thumbnail(THUMBNAIL)
        .author(serenity::CreateEmbedAuthor::new(&country.name).icon_url(country.flag_url()))
        .field(
            "Confirmed",
            stat_field(country.confirmed, country.confirmed_new, pm.map(|p| p.confirmed)),
            true,
        )
        .field(
            "Recovered",
            stat_field(country.recovered, country.recovered_new, pm.map(|p| p.recovered)),
            true,
        )
        .field(
            "Deaths",
            stat_field(country.deaths, country.deaths_new, pm.map(|p| p.deaths)),
            true,
        );

    if let Ok(timestamp) = serenity::Timestamp::from_unix_timestamp(refreshed_at.timestamp()) {
        embed = embed.timestamp(timestamp);
    }

    embed
}

/// Look up COVID-19 statistics for a country
#[poise::command(prefix_command, subcommands("status", "refresh"))]
pub async fn corona(ctx: Context<'_>, #[rest] name: Option<String>) -> Result<(), Error> {
    let countries = &ctx.data().countries;

    let (Some(name), Some(snapshot)) = (name, countries.snapshot()) else {
        return send_status(ctx).await;
    };

    let embed = match snapshot.lookup(&name) {
        Some(country) => create_country_embed(country, snapshot.timestamp()),
        None => create_error_embed(&format!("No such country found. {}", sad_emoji())),
    };

    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    Ok(())
}

/// Show info about internal state
#[poise::command(prefix_command, aliases("info", "about"))]
pub async fn status(ctx: Context<'_>) -> Result<(), Error> {
    send_status(ctx).await
}

/// Refresh internal state
#[poise::command(prefix_command, aliases("pull"))]
pub async fn refresh(ctx: Context<'_>) -> Result<(), Error> {
    tracing::debug!("Manually refreshing country cache");

    let embed = match ctx.data().countries.refresh().await {
        Ok(count) => create_success_embed(&format!(
            "Refreshed successfully, `{}` countries cached! 👌",
            count
        )),
        Err(e) => {
            tracing::error!("Manual country cache refresh failed: {}", e);
            create_error_embed(&format!(
                "Something has gone wrong, check log for details. {}",
                sad_emoji()
            ))
        }
    };

    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    Ok(())
}

async fn send_status(ctx: Context<'_>) -> Result<(), Error> {
    let embed = match ctx.data().countries.status() {
        CacheStatus::Ready {
            countries,
            refreshed_at,
        } => create_success_embed(&format!(
            "There are currently `{}` countries in the cache, refreshed {}.",
            countries,
            humanize_since(refreshed_at, Utc::now())
        )),
        CacheStatus::Empty => create_error_embed("Cache is empty, check log for errors."),
    };

    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    Ok(())
}
