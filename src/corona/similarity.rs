//! Sequence-matching similarity between country keys.

use similar::TextDiff;

/// Similarity of `a` and `b` in `[0, 1]`: twice the matching characters
/// over the combined length. `1.0` for identical strings.
pub fn ratio(a: &str, b: &str) -> f64 {
    f64::from(TextDiff::from_chars(a, b).ratio())
}

/// The candidate most similar to `word`, if its ratio reaches `cutoff`.
/// Ties go to the earlier candidate.
pub fn closest_match<'a, I>(word: &str, candidates: I, cutoff: f64) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut best: Option<(f64, &'a str)> = None;

    for candidate in candidates {
        let score = ratio(word, candidate);
        if score < cutoff {
            continue;
        }
        if best.is_none_or(|(top, _)| score > top) {
            best = Some((score, candidate));
        }
    }

    best.map(|(_, candidate)| candidate)
}
