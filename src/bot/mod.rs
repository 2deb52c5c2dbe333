pub mod checks;
pub mod commands;
pub mod discord;
pub mod handlers;

use crate::config::Config;
use crate::corona::{self, CountryCache, HttpStatsSource, PopulationTable};
use crate::daemon::{DailySchedule, NicknameDaemon, Rotation};
use crate::database::{self, models::SettingKey, queries};
use anyhow::Result;
use chrono::{DateTime, Utc};
use discord::{DiscordAnnouncer, DiscordDirectory};
use poise::serenity_prelude as serenity;
use sqlx::SqlitePool;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

pub type Error = Box<dyn std::error::Error + Send + Sync>;
pub type Context<'a> = poise::Context<'a, Data, Error>;

#[derive(Clone)]
pub struct Data {
    pub pool: SqlitePool,
    pub config: Config,
    pub daemon: Arc<NicknameDaemon>,
    pub countries: Arc<CountryCache>,
    pub started_at: DateTime<Utc>,
}

/// Build the client. Background tasks spawned once connected stop when
/// `shutdown` is cancelled.
pub async fn create_bot(config: Config, shutdown: CancellationToken) -> Result<serenity::Client> {
    let pool = database::create_connection(&config.database_url).await?;
    let started_at = Utc::now();

    let intents = serenity::GatewayIntents::non_privileged()
        | serenity::GatewayIntents::MESSAGE_CONTENT
        | serenity::GatewayIntents::GUILD_MEMBERS;

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: vec![
                commands::nicknames::gallonmate(),
                commands::corona::corona(),
                commands::seasons::season(),
                commands::help::help(),
            ],
            prefix_options: poise::PrefixFrameworkOptions {
                prefix: Some(config.prefix.clone()),
                case_insensitive_commands: true,
                ..Default::default()
            },
            owners: config.owner_id.into_iter().collect(),
            on_error: |error| Box::pin(handlers::errors::on_error(error)),
            event_handler: |ctx, event, framework, data| {
                Box::pin(handlers::event_handler(ctx, event, framework, data))
            },
            ..Default::default()
        })
        .setup({
            let config = config.clone();
            move |ctx, ready, _framework| {
                Box::pin(async move {
                    tracing::info!("Connected as {}, setting up", ready.user.name);

                    let directory =
                        Arc::new(DiscordDirectory::new(ctx.cache.clone(), ctx.http.clone()));
                    let announcer = Arc::new(DiscordAnnouncer::new(
                        ctx.http.clone(),
                        config.announce_channel_id,
                    ));
                    let rotation = Rotation::new(
                        Arc::new(pool.clone()),
                        directory,
                        config.home_guild_id,
                        config.target_user_id,
                    );

                    let announce = queries::get_setting(&pool, SettingKey::AnnounceRotation)
                        .await?
                        .is_none_or(|value| value != 0);

                    let daemon = Arc::new(NicknameDaemon::new(
                        rotation,
                        Arc::new(DailySchedule),
                        announcer,
                        announce,
                    ));
                    daemon.start().await?;

                    let population = PopulationTable::embedded()?;
                    tracing::info!("Loaded population figures for {} countries", population.len());

                    let source = HttpStatsSource::new(config.corona_api_url.clone())?;
                    let countries = Arc::new(CountryCache::new(Arc::new(source), population));
                    tokio::spawn(corona::refresh_periodically(
                        countries.clone(),
                        config.corona_refresh_interval,
                        shutdown,
                    ));

                    Ok(Data {
                        pool,
                        config,
                        daemon,
                        countries,
                        started_at,
                    })
                })
            }
        })
        .build();

    let client = serenity::ClientBuilder::new(&config.discord_token, intents)
        .framework(framework)
        .await?;

    Ok(client)
}
