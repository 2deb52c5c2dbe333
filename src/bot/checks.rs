use crate::bot::{Context, Error};
use crate::config::Config;
use poise::serenity_prelude as serenity;

/// Commands touching the rotation target only work in its home guild, or for the owner.
pub async fn home_guild_or_owner(ctx: Context<'_>) -> Result<bool, Error> {
    Ok(is_permitted(&ctx.data().config, ctx.guild_id(), ctx.author().id))
}

pub fn is_permitted(
    config: &Config,
    guild: Option<serenity::GuildId>,
    author: serenity::UserId,
) -> bool {
    guild == Some(config.home_guild_id) || config.owner_id == Some(author)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(owner: Option<&str>) -> Config {
        let mut env: HashMap<&str, &str> = HashMap::from([
            ("DISCORD_TOKEN", "token"),
            ("HOME_GUILD_ID", "100"),
            ("TARGET_USER_ID", "200"),
            ("ANNOUNCE_CHANNEL_ID", "300"),
        ]);
        if let Some(owner) = owner {
            env.insert("OWNER_ID", owner);
        }
        Config::from_lookup(|key| env.get(key).map(|v| v.to_string())).unwrap()
    }

    #[test]
    fn home_guild_is_permitted() {
        let config = config(None);
        let anyone = serenity::UserId::new(5);

        assert!(is_permitted(&config, Some(serenity::GuildId::new(100)), anyone));
        assert!(!is_permitted(&config, Some(serenity::GuildId::new(101)), anyone));
        assert!(!is_permitted(&config, None, anyone));
    }

    #[test]
    fn owner_is_permitted_anywhere() {
        let config = config(Some("42"));
        let owner = serenity::UserId::new(42);

        assert!(is_permitted(&config, Some(serenity::GuildId::new(101)), owner));
        assert!(is_permitted(&config, None, owner));
        assert!(!is_permitted(&config, None, serenity::UserId::new(43)));
    }
}
