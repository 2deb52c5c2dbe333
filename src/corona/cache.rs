use crate::corona::country::Country;
use crate::corona::error::RefreshError;
use crate::corona::map::CountryMap;
use crate::corona::population::PopulationTable;
use crate::corona::source::StatsSource;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

#[derive(Debug, Clone, PartialEq)]
pub enum CacheStatus {
    /// No refresh has succeeded yet.
    Empty,
    Ready {
        countries: usize,
        refreshed_at: DateTime<Utc>,
    },
}

/// Country statistics, swapped in whole on every successful refresh.
///
/// Readers always see either the previous snapshot or the new one, never a
/// mix of the two.
pub struct CountryCache {
    source: Arc<dyn StatsSource>,
    population: PopulationTable,
    current: RwLock<Option<Arc<CountryMap>>>,
}

impl CountryCache {
    pub fn new(source: Arc<dyn StatsSource>, population: PopulationTable) -> Self {
        Self {
            source,
            population,
            current: RwLock::new(None),
        }
    }

    /// Fetch, validate and publish a new snapshot. Returns the number of
    /// countries now cached.
    ///
    /// All-or-nothing: a transport failure, an unusable payload or a single
    /// invalid record leaves the current snapshot untouched.
    pub async fn refresh(&self) -> Result<usize, RefreshError> {
        debug!("Refreshing country cache");
        let records = self.source.fetch_summary().await?;

        if records.is_empty() {
            return Err(RefreshError::Payload("summary lists no countries".to_string()));
        }

        let countries = records
            .iter()
            .enumerate()
            .map(|(index, record)| {
                Country::parse(record, &self.population)
                    .map_err(|source| RefreshError::Validation { index, source })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let map = Arc::new(CountryMap::new(countries));
        let count = map.len();
        *self.current.write() = Some(map);

        info!(countries = count, "Country cache refreshed");
        Ok(count)
    }

    /// The current snapshot. Holding it keeps it alive across later refreshes.
    pub fn snapshot(&self) -> Option<Arc<CountryMap>> {
        self.current.read().clone()
    }

    pub fn lookup(&self, name: &str) -> Option<Country> {
        self.snapshot()?.lookup(name).cloned()
    }

    pub fn status(&self) -> CacheStatus {
        match self.snapshot() {
            Some(map) => CacheStatus::Ready {
                countries: map.len(),
                refreshed_at: map.timestamp(),
            },
            None => CacheStatus::Empty,
        }
    }
}

/// Refresh `cache` right away and then every `every`, until `cancel` fires.
/// Failed refreshes are logged and retried at the next tick.
pub async fn refresh_periodically(
    cache: Arc<CountryCache>,
    every: Duration,
    cancel: CancellationToken,
) {
    let mut interval = tokio::time::interval(every);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = interval.tick() => {}
        }

        if let Err(e) = cache.refresh().await {
            error!("Country cache refresh failed: {}", e);
        }
    }

    debug!("Country cache refresh loop stopped");
}
