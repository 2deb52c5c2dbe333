use poise::serenity_prelude as serenity;
use rand::Rng;
use rand::seq::SliceRandom;

const TITLE_SUCCESS: &[&str] = &[
    "Good point",
    "Great moves Ethan",
    "Keep it up",
    "Life is excellent!",
    "The daemon congratulates you",
];

const TITLE_ERROR: &[&str] = &[
    "Galooned again",
    "Put on full blast",
    "Reduced you to memes",
    "Get in the kiln",
    "Idk & dunno",
    "Something wrong",
    "I hold my head",
];

const AUTHOR_ICON: &str = "https://cdn.discordapp.com/attachments/319955430732464128/695021552520921148/Screenshot_20200327-184350_FaceApp.jpg";

/// Emoji sprinkled into error replies.
pub const SAD_EMOJI: &[&str] = &["😩", "😠", "😦", "🙃", "😔"];

pub fn random_from<'a, R: Rng + ?Sized>(pool: &[&'a str], rng: &mut R) -> &'a str {
    pool.choose(rng).copied().unwrap_or_default()
}

pub fn sad_emoji() -> &'static str {
    random_from(SAD_EMOJI, &mut rand::thread_rng())
}

/// `1234567` -> `1,234,567`
pub fn format_thousands(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);

    if n < 0 {
        out.push('-');
    }
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }

    out
}

pub fn format_nickname_change(old_name: &str, new_name: &str) -> String {
    format!("`{}` -> `{}`", old_name, new_name)
}

// Embed utility functions
pub fn create_success_embed(description: &str) -> serenity::CreateEmbed {
    let title = random_from(TITLE_SUCCESS, &mut rand::thread_rng());
    serenity::CreateEmbed::new()
        .description(description)
        .color(0x2ecc71) // Green
        .author(serenity::CreateEmbedAuthor::new(title).icon_url(AUTHOR_ICON))
}

pub fn create_error_embed(description: &str) -> serenity::CreateEmbed {
    let title = random_from(TITLE_ERROR, &mut rand::thread_rng());
    serenity::CreateEmbed::new()
        .description(description)
        .color(0xe74c3c) // Red
        .author(serenity::CreateEmbedAuthor::new(title).icon_url(AUTHOR_ICON))
}

/// List the subcommands of `group` with their aliases and descriptions.
///
/// Orange when shown because no valid subcommand was given, green otherwise.
pub fn create_group_help_embed<U, E>(
    group: &poise::Command<U, E>,
    failed_command: bool,
) -> serenity::CreateEmbed {
    let mut subcommands: Vec<_> = group.subcommands.iter().collect();
    subcommands.sort_by(|a, b| a.name.cmp(&b.name));

    let mut title = group.name.clone();
    if let Some(first) = title.get_mut(0..1) {
        first.make_ascii_uppercase();
    }

    let fields = subcommands.into_iter().map(|cmd| {
        let aliases = if cmd.aliases.is_empty() {
            "NA".to_string()
        } else {
            cmd.aliases.join(", ")
        };
        let doc = cmd
            .description
            .clone()
            .unwrap_or_else(|| "No description".to_string());
        (format!("{} [{}]", cmd.name, aliases), doc, false)
    });

    serenity::CreateEmbed::new()
        .title(title)
        .description(format!("Available arguments in {} group", group.name))
        .color(if failed_command { 0xe67e22 } else { 0x2ecc71 })
        .fields(fields)
}
