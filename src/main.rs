mod bot;
mod config;
mod corona;
mod daemon;
mod database;
mod seasons;
mod utils;

use anyhow::Result;
use config::Config;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "ryan=info,poise=info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;
    tracing::info!("Starting Ryan, revision {}", config.revision);

    let shutdown = CancellationToken::new();
    let mut client = bot::create_bot(config, shutdown.clone()).await?;

    tracing::info!("Connecting to Discord...");

    if let Err(why) = client.start().await {
        tracing::error!("Client error: {:?}", why);
    }

    shutdown.cancel();
    Ok(())
}
