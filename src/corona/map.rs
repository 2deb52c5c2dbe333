use crate::corona::country::Country;
use crate::corona::similarity::closest_match;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tracing::debug;

/// Normalized names shorter than this skip substring matching, which would
/// otherwise produce too many false positives.
pub const SUBSTRING_MIN_LEN: usize = 5;

/// Minimum similarity ratio for a fuzzy match.
pub const SIMILARITY_CUTOFF: f64 = 0.75;

/// Immutable snapshot of country records keyed by normalized name.
#[derive(Debug)]
pub struct CountryMap {
    // Insertion order of the source data, which decides substring match ties
    entries: Vec<(String, Country)>,
    index: HashMap<String, usize>,
    timestamp: DateTime<Utc>,
}

impl CountryMap {
    /// Index `countries` in order, stamped with the current time.
    pub fn new(countries: Vec<Country>) -> Self {
        let mut entries: Vec<(String, Country)> = Vec::with_capacity(countries.len());
        let mut index: HashMap<String, usize> = HashMap::with_capacity(countries.len());

        for country in countries {
            let key = Self::normalize(&country.name);
            match index.get(&key).copied() {
                // Later records replace earlier ones but keep their position
                Some(i) => entries[i].1 = country,
                None => {
                    index.insert(key.clone(), entries.len());
                    entries.push((key, country));
                }
            }
        }

        Self {
            entries,
            index,
            timestamp: Utc::now(),
        }
    }

    /// Lowercase and drop all whitespace.
    pub fn normalize(name: &str) -> String {
        name.chars()
            .filter(|c| !c.is_whitespace())
            .flat_map(char::to_lowercase)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// When this snapshot was built.
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Resolve a free-text country name.
    ///
    /// Tries, in order: an exact match of the normalized name, the first key
    /// containing it (for names of at least [`SUBSTRING_MIN_LEN`] characters),
    /// and the most similar key reaching [`SIMILARITY_CUTOFF`].
    pub fn lookup(&self, name: &str) -> Option<&Country> {
        let normal_name = Self::normalize(name);
        debug!("Name '{}' normalized into '{}'", name, normal_name);

        if let Some(&i) = self.index.get(&normal_name) {
            debug!("Name found directly in cache");
            return Some(&self.entries[i].1);
        }

        if let Some(country) = self.substring_match(&normal_name) {
            debug!("Found a substring match");
            return Some(country);
        }

        debug!("Name does not exist in cache, trying to find closest match");
        let keys = self.entries.iter().map(|(key, _)| key.as_str());
        match closest_match(&normal_name, keys, SIMILARITY_CUTOFF) {
            Some(key) => self.index.get(key).map(|&i| &self.entries[i].1),
            None => {
                debug!("No match found");
                None
            }
        }
    }

    fn substring_match(&self, normal_name: &str) -> Option<&Country> {
        if normal_name.chars().count() < SUBSTRING_MIN_LEN {
            return None;
        }

        self.entries
            .iter()
            .find(|(key, _)| key.contains(normal_name))
            .map(|(_, country)| country)
    }
}
