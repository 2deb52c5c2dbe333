//! COVID-19 statistics per country, cached in memory and resolved from
//! free-text names.

pub mod cache;
pub mod country;
pub mod error;
pub mod map;
pub mod population;
pub mod similarity;
pub mod source;

pub use cache::{CacheStatus, CountryCache, refresh_periodically};
pub use country::{Country, PerMillion};
pub use population::PopulationTable;
pub use source::HttpStatsSource;
