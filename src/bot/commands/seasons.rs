use crate::bot::discord::is_forbidden;
use crate::bot::{Context, Error};
use crate::seasons::{SEASONS, Season, decorate_name, find_season};
use poise::serenity_prelude as serenity;

/// Outcome counts for one kind of rename.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Tally {
    pub success: usize,
    pub forbidden: usize,
    pub failed: usize,
}

impl Tally {
    pub fn record<T>(&mut self, result: Result<T, serenity::Error>, what: &str) {
        match result {
            Ok(_) => self.success += 1,
            Err(e) if is_forbidden(&e) => self.forbidden += 1,
            Err(e) => {
                tracing::warn!("Failed to decorate {}: {}", what, e);
                self.failed += 1;
            }
        }
    }

    pub fn report(&self) -> String {
        let mut report = format!(
            "Success: {}\nMissing permission: {}",
            self.success, self.forbidden
        );
        if self.failed > 0 {
            report.push_str(&format!("\nOther failure: {}", self.failed));
        }
        report
    }
}

/// New names for the guild, its channels and its members.
struct Plan {
    guild: String,
    channels: Vec<(serenity::ChannelId, String)>,
    members: Vec<(serenity::UserId, String)>,
}

fn plan(guild: &serenity::Guild, season: &Season) -> Plan {
    let mut rng = rand::thread_rng();

    Plan {
        guild: decorate_name(&guild.name, season, &mut rng),
        channels: guild
            .channels
            .values()
            .map(|channel| (channel.id, decorate_name(&channel.name, season, &mut rng)))
            .collect(),
        members: guild
            .members
            .values()
            .map(|member| {
                (
                    member.user.id,
                    decorate_name(member.display_name(), season, &mut rng),
                )
            })
            .collect(),
    }
}

pub fn create_seasons_embed() -> serenity::CreateEmbed {
    let fields = SEASONS.iter().map(|season| {
        let emoji = if season.emoji.is_empty() {
            "remove decorations".to_string()
        } else {
            season.emoji.concat()
        };
        (season.name, emoji, false)
    });

    serenity::CreateEmbed::new()
        .title("Available seasons")
        .color(0xe67e22) // Orange
        .fields(fields)
}

/// Decorate the server for a season
///
/// Renames the guild, every channel and every member. Many renames may fail
/// for lack of permission; the reply reports how many did.
#[poise::command(prefix_command, guild_only)]
pub async fn season(ctx: Context<'_>, #[rest] name: Option<String>) -> Result<(), Error> {
    let Some(season) = name.as_deref().and_then(find_season) else {
        ctx.send(poise::CreateReply::default().embed(create_seasons_embed()))
            .await?;
        return Ok(());
    };

    let Some(guild_id) = ctx.guild_id() else {
        return Ok(());
    };

    let plan = {
        let Some(guild) = ctx.guild() else {
            return Err("Guild is not cached".into());
        };
        plan(&guild, season)
    };

    tracing::info!(
        "Applying season {:?} to guild {} ({} channels, {} members)",
        season.name,
        guild_id,
        plan.channels.len(),
        plan.members.len()
    );
    let http = ctx.http();

    let mut guild_tally = Tally::default();
    guild_tally.record(
        guild_id
            .edit(http, serenity::EditGuild::new().name(&plan.guild))
            .await,
        "guild",
    );

    let mut channels = Tally::default();
    for (channel_id, name) in &plan.channels {
        let result = channel_id
            .edit(http, serenity::EditChannel::new().name(name))
            .await;
        channels.record(result, "channel");
    }

    let mut members = Tally::default();
    for (user_id, name) in &plan.members {
        let result = guild_id
            .edit_member(http, *user_id, serenity::EditMember::new().nickname(name))
            .await;
        members.record(result, "member");
    }

    let guild_outcome = if guild_tally.success > 0 {
        "Success"
    } else if guild_tally.forbidden > 0 {
        "Missing permission"
    } else {
        "Failed"
    };

    let embed = serenity::CreateEmbed::new()
        .title("Season change completed")
        .color(0x2ecc71) // Green
        .field("Guild name", guild_outcome, false)
        .field("Channels", channels.report(), false)
        .field("Members", members.report(), false);

    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tally_separates_missing_permissions_from_other_failures() {
        let mut tally = Tally::default();
        tally.record(Ok::<(), serenity::Error>(()), "channel");
        tally.record(Ok::<(), serenity::Error>(()), "channel");
        tally.record(Err::<(), _>(serenity::Error::Other("boom")), "channel");

        assert_eq!(
            tally,
            Tally {
                success: 2,
                forbidden: 0,
                failed: 1,
            }
        );
        assert_eq!(tally.report(), "Success: 2\nMissing permission: 0\nOther failure: 1");
    }

    #[test]
    fn clean_report_omits_other_failures() {
        let tally = Tally {
            success: 4,
            forbidden: 1,
            failed: 0,
        };
        assert_eq!(tally.report(), "Success: 4\nMissing permission: 1");
    }
}
