//! Shared test helpers for GeoIP resolver tests.
//!
//! Provides an in-memory [`CityDatabase`] and an opener that counts attempts.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use super::types::{CityRecord, LookupFault};
use super::{CityDatabase, DatabaseOpener, GeoResolver, OpenFuture};

/// In-memory database keyed by address string.
#[derive(Default, Clone)]
pub(crate) struct StaticCityDatabase {
    records: HashMap<String, Result<Option<CityRecord>, LookupFault>>,
}

impl StaticCityDatabase {
    pub(crate) fn with(
        mut self,
        address: &str,
        answer: Result<Option<CityRecord>, LookupFault>,
    ) -> Self {
        self.records.insert(address.to_string(), answer);
        self
    }
}

impl CityDatabase for StaticCityDatabase {
    fn get(&self, address: &str) -> Result<Option<CityRecord>, LookupFault> {
        self.records.get(address).cloned().unwrap_or(Ok(None))
    }
}

pub(crate) fn record(lat: f64, lng: f64, city: Option<&str>, country: Option<&str>) -> CityRecord {
    CityRecord {
        latitude: Some(lat),
        longitude: Some(lng),
        city: city.map(str::to_string),
        country: country.map(str::to_string),
    }
}

/// Opener that counts how many times `open()` was called.
pub(crate) struct CountingOpener {
    pub(crate) calls: AtomicUsize,
    database: StaticCityDatabase,
    fail: bool,
    delay: Duration,
}

impl CountingOpener {
    pub(crate) fn ok(database: StaticCityDatabase) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            database,
            fail: false,
            delay: Duration::ZERO,
        }
    }

    pub(crate) fn failing() -> Self {
        Self {
            fail: true,
            ..Self::ok(StaticCityDatabase::default())
        }
    }

    pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl DatabaseOpener for CountingOpener {
    fn open(&self) -> OpenFuture {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let database = self.database.clone();
        let fail = self.fail;
        let delay = self.delay;
        Box::pin(async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            if fail {
                anyhow::bail!("Failed to read GeoIP database from test.mmdb");
            }
            Ok(Arc::new(database) as Arc<dyn CityDatabase>)
        })
    }
}

/// Builds a resolver over `database` and initializes it.
pub(crate) async fn ready_resolver(database: StaticCityDatabase) -> GeoResolver {
    let resolver = GeoResolver::new(Arc::new(CountingOpener::ok(database)));
    resolver
        .initialize()
        .await
        .expect("in-memory database should open");
    resolver
}
