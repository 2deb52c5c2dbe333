pub mod errors;
pub mod galoon;

use crate::bot::{Data, Error};
use poise::serenity_prelude as serenity;

pub async fn event_handler(
    ctx: &serenity::Context,
    event: &serenity::FullEvent,
    _framework: poise::FrameworkContext<'_, Data, Error>,
    data: &Data,
) -> Result<(), Error> {
    match event {
        serenity::FullEvent::Ready { data_about_bot } => {
            tracing::info!("Bot logged in as {}", data_about_bot.user.name);
        }
        serenity::FullEvent::Message { new_message } => {
            if let Err(e) = galoon::on_message(ctx, new_message, data).await {
                tracing::error!("Error handling reaction roll: {:?}", e);
            }
        }
        _ => {}
    }
    Ok(())
}
