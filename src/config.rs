use anyhow::Result;
use poise::serenity_prelude as serenity;
use std::env;
use std::time::Duration;

const DEFAULT_PREFIX: &str = "!";
const DEFAULT_DATABASE_URL: &str = "sqlite:ryan.db";
const DEFAULT_CORONA_API_URL: &str = "https://api.covid19api.com/summary";
const DEFAULT_REFRESH_SECS: u64 = 3600;
const DEFAULT_ROLL_EMOJI: &str = "🎲";

#[derive(Debug, Clone)]
pub struct Config {
    pub discord_token: String,
    pub prefix: String,
    pub database_url: String,
    pub home_guild_id: serenity::GuildId,
    pub target_user_id: serenity::UserId,
    pub announce_channel_id: serenity::ChannelId,
    pub rolls_channel_id: Option<serenity::ChannelId>,
    pub owner_id: Option<serenity::UserId>,
    pub roll_emoji: String,
    pub corona_api_url: String,
    pub corona_refresh_interval: Duration,
    pub revision: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the config from an arbitrary key lookup, e.g. a map in tests.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let discord_token = lookup("DISCORD_TOKEN")
            .ok_or_else(|| anyhow::anyhow!("DISCORD_TOKEN environment variable is required"))?;

        let prefix = lookup("COMMAND_PREFIX").unwrap_or_else(|| DEFAULT_PREFIX.to_string());

        let database_url =
            lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());

        let home_guild_id = serenity::GuildId::new(required_id(&lookup, "HOME_GUILD_ID")?);
        let target_user_id = serenity::UserId::new(required_id(&lookup, "TARGET_USER_ID")?);
        let announce_channel_id =
            serenity::ChannelId::new(required_id(&lookup, "ANNOUNCE_CHANNEL_ID")?);

        let rolls_channel_id =
            optional_id(&lookup, "ROLLS_CHANNEL_ID")?.map(serenity::ChannelId::new);
        let owner_id = optional_id(&lookup, "OWNER_ID")?.map(serenity::UserId::new);

        let roll_emoji = lookup("ROLL_EMOJI").unwrap_or_else(|| DEFAULT_ROLL_EMOJI.to_string());

        let corona_api_url =
            lookup("CORONA_API_URL").unwrap_or_else(|| DEFAULT_CORONA_API_URL.to_string());

        let refresh_secs = match lookup("CORONA_REFRESH_SECS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .map_err(|e| anyhow::anyhow!("CORONA_REFRESH_SECS is not a number: {}", e))?,
            None => DEFAULT_REFRESH_SECS,
        };
        if refresh_secs == 0 {
            return Err(anyhow::anyhow!("CORONA_REFRESH_SECS must be greater than zero"));
        }

        let revision = lookup("REVISION").unwrap_or_else(|| "unknown".to_string());

        Ok(Config {
            discord_token,
            prefix,
            database_url,
            home_guild_id,
            target_user_id,
            announce_channel_id,
            rolls_channel_id,
            owner_id,
            roll_emoji,
            corona_api_url,
            corona_refresh_interval: Duration::from_secs(refresh_secs),
            revision,
        })
    }
}

fn required_id<F>(lookup: &F, key: &str) -> Result<u64>
where
    F: Fn(&str) -> Option<String>,
{
    optional_id(lookup, key)?
        .ok_or_else(|| anyhow::anyhow!("{} environment variable is required", key))
}

fn optional_id<F>(lookup: &F, key: &str) -> Result<Option<u64>>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return Ok(None);
    };

    match raw.trim().parse::<u64>() {
        Ok(0) => Err(anyhow::anyhow!("{} must be a non-zero id", key)),
        Ok(id) => Ok(Some(id)),
        Err(e) => Err(anyhow::anyhow!("{} is not a valid id: {}", key, e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    const MINIMAL: &[(&str, &str)] = &[
        ("DISCORD_TOKEN", "token"),
        ("HOME_GUILD_ID", "319955430732464128"),
        ("TARGET_USER_ID", "209018651360100352"),
        ("ANNOUNCE_CHANNEL_ID", "319955430732464128"),
    ];

    #[test]
    fn minimal_config_uses_defaults() {
        let config = Config::from_lookup(lookup_from(MINIMAL)).unwrap();

        assert_eq!(config.prefix, "!");
        assert_eq!(config.database_url, "sqlite:ryan.db");
        assert_eq!(config.target_user_id.get(), 209018651360100352);
        assert!(config.rolls_channel_id.is_none());
        assert!(config.owner_id.is_none());
        assert_eq!(config.corona_refresh_interval, Duration::from_secs(3600));
        assert_eq!(config.revision, "unknown");
    }

    #[test]
    fn missing_token_is_an_error() {
        let pairs: Vec<_> = MINIMAL
            .iter()
            .copied()
            .filter(|(k, _)| *k != "DISCORD_TOKEN")
            .collect();
        let err = Config::from_lookup(lookup_from(&pairs)).unwrap_err();
        assert!(err.to_string().contains("DISCORD_TOKEN"));
    }

    #[test]
    fn malformed_id_names_the_key() {
        let mut pairs = MINIMAL.to_vec();
        pairs.push(("OWNER_ID", "kwzrd"));
        let err = Config::from_lookup(lookup_from(&pairs)).unwrap_err();
        assert!(err.to_string().contains("OWNER_ID"));
    }

    #[test]
    fn zero_refresh_interval_is_rejected() {
        let mut pairs = MINIMAL.to_vec();
        pairs.push(("CORONA_REFRESH_SECS", "0"));
        assert!(Config::from_lookup(lookup_from(&pairs)).is_err());
    }

    #[test]
    fn optional_values_are_read() {
        let mut pairs = MINIMAL.to_vec();
        pairs.push(("ROLLS_CHANNEL_ID", "484118447073132574"));
        pairs.push(("COMMAND_PREFIX", "?"));
        pairs.push(("CORONA_REFRESH_SECS", "60"));
        let config = Config::from_lookup(lookup_from(&pairs)).unwrap();

        assert_eq!(config.prefix, "?");
        assert_eq!(
            config.rolls_channel_id,
            Some(serenity::ChannelId::new(484118447073132574))
        );
        assert_eq!(config.corona_refresh_interval, Duration::from_secs(60));
    }
}
