use crate::corona::population::PopulationTable;
use serde::Deserialize;
use thiserror::Error;

const FLAG_URL: &str = "https://flagcdn.com/64x48/{code}.png";

/// Why a single raw record was rejected.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error(transparent)]
    Malformed(#[from] serde_json::Error),

    #[error("record has an empty country name")]
    EmptyName,

    #[error("case counts for '{0}' are out of range")]
    OutOfRange(String),
}

/// One country record as returned by the statistics API.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawCountry {
    country: String,
    slug: String,
    country_code: String,
    total_confirmed: i64,
    new_confirmed: i64,
    total_recovered: i64,
    new_recovered: i64,
    total_deaths: i64,
    new_deaths: i64,
}

/// Totals scaled to one million inhabitants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PerMillion {
    pub confirmed: i64,
    pub recovered: i64,
    pub deaths: i64,
    pub active: i64,
}

/// Validated statistics for a single country.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Country {
    pub name: String,
    pub slug: String,
    /// ISO 3166-1 alpha-2 code.
    pub code: String,

    pub confirmed: i64,
    pub confirmed_new: i64,
    pub recovered: i64,
    pub recovered_new: i64,
    pub deaths: i64,
    pub deaths_new: i64,

    /// Not reported by the API; derived as confirmed minus recovered and deaths.
    pub active: i64,

    /// `None` when the population of the country is unknown.
    pub per_million: Option<PerMillion>,
}

impl Country {
    pub fn parse(
        record: &serde_json::Value,
        population: &PopulationTable,
    ) -> Result<Self, RecordError> {
        let raw = RawCountry::deserialize(record)?;

        if raw.country.trim().is_empty() {
            return Err(RecordError::EmptyName);
        }

        let active = raw
            .total_recovered
            .checked_add(raw.total_deaths)
            .and_then(|closed| raw.total_confirmed.checked_sub(closed))
            .ok_or_else(|| RecordError::OutOfRange(raw.country.clone()))?;

        let per_million = match population.get(&raw.country_code) {
            Some(pop) => {
                let millions = pop as f64 / 1_000_000.0;
                let scale = |n: i64| (n as f64 / millions) as i64;
                Some(PerMillion {
                    confirmed: scale(raw.total_confirmed),
                    recovered: scale(raw.total_recovered),
                    deaths: scale(raw.total_deaths),
                    active: scale(active),
                })
            }
            None => {
                tracing::warn!(
                    "Failed to fetch population for: '{}' ({})",
                    raw.country_code,
                    raw.country
                );
                None
            }
        };

        Ok(Country {
            name: raw.country,
            slug: raw.slug,
            code: raw.country_code,
            confirmed: raw.total_confirmed,
            confirmed_new: raw.new_confirmed,
            recovered: raw.total_recovered,
            recovered_new: raw.new_recovered,
            deaths: raw.total_deaths,
            deaths_new: raw.new_deaths,
            active,
            per_million,
        })
    }

    pub fn flag_url(&self) -> String {
        FLAG_URL.replace("{code}", &self.code.to_ascii_lowercase())
    }
}
