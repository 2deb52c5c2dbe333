//! Seasonal server decoration.
//!
//! Names are decorated by stripping every non-safe character and wrapping the
//! rest with two distinct emoji of the chosen season.

use crate::utils::validation::strip_decorations;
use rand::Rng;
use rand::seq::SliceRandom;

/// Name of the pseudo-season that removes decorations.
pub const RESET_SEASON: &str = "reset";

pub struct Season {
    pub name: &'static str,
    pub emoji: &'static [&'static str],
}

pub const SEASONS: &[Season] = &[
    Season {
        name: "christmas",
        emoji: &["🎄", "🎅", "🦌", "🎁", "❄", "☃"],
    },
    Season {
        name: "easter",
        emoji: &["🐇", "🐰", "🐣", "🌱", "🥚", "🍫"],
    },
    Season {
        name: "valentines",
        emoji: &["🍫", "💕", "💓", "💞", "💘", "💋"],
    },
    Season {
        name: "saint patrick",
        emoji: &["💚", "🍀", "🤞", "🍺", "🌈", "🎩"],
    },
    Season {
        name: RESET_SEASON,
        emoji: &[],
    },
];

pub fn find_season(name: &str) -> Option<&'static Season> {
    let name = name.trim().to_lowercase();
    SEASONS.iter().find(|season| season.name == name)
}

/// Strip existing decorations from `name` and, unless `season` is the reset
/// season, wrap it with two distinct emoji drawn from the season.
pub fn decorate_name<R: Rng + ?Sized>(name: &str, season: &Season, rng: &mut R) -> String {
    let stripped = strip_decorations(name);

    let mut picked = season.emoji.choose_multiple(rng, 2);
    match (picked.next(), picked.next()) {
        (Some(prefix), Some(postfix)) => format!("{}{}{}", prefix, stripped, postfix),
        _ => stripped,
    }
}
