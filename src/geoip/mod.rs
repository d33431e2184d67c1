//! GeoIP lookup using a MaxMind GeoLite2-City database.
//!
//! The resolver is an explicitly constructed resource: the composition root
//! builds one, shares it by `Arc`, and calls [`GeoResolver::initialize`] before
//! each pipeline run. Initialization is single-flight; lookups are synchronous
//! and report every failure as data.

mod init;
mod lookup;
mod metadata;
#[cfg(test)]
pub(crate) mod test_helpers;
mod types;

// Re-export public API
pub use init::MmdbFileOpener;
pub use lookup::MaxMindCityDatabase;
pub use types::{CityRecord, GeoIpMetadata, GeoResult, LookupFault};

use futures::future::{BoxFuture, Shared};
use std::sync::atomic::AtomicU64;
use std::sync::{Arc, Mutex, OnceLock};

use crate::error_handling::GeoIpError;

/// A city-level lookup object.
///
/// Implementations must be safe for unsynchronized concurrent reads.
pub trait CityDatabase: Send + Sync {
    /// Looks up `address`. `Ok(None)` means the address is not in the database.
    fn get(&self, address: &str) -> Result<Option<CityRecord>, LookupFault>;

    /// Describes the underlying database, if known.
    fn metadata(&self) -> Option<GeoIpMetadata> {
        None
    }
}

/// Future returned by [`DatabaseOpener::open`].
pub type OpenFuture = BoxFuture<'static, anyhow::Result<Arc<dyn CityDatabase>>>;

/// Opens the lookup object backing a [`GeoResolver`].
pub trait DatabaseOpener: Send + Sync {
    fn open(&self) -> OpenFuture;
}

type InitAttempt = Shared<BoxFuture<'static, Result<(), GeoIpError>>>;

/// Lazily-initialized GeoIP resolver.
///
/// The open database handle is kept for the lifetime of the resolver and never
/// closed or replaced once set.
pub struct GeoResolver {
    opener: Arc<dyn DatabaseOpener>,
    database: Arc<OnceLock<Arc<dyn CityDatabase>>>,
    /// Attempt currently opening the database, tagged with its generation
    in_flight: Mutex<Option<(u64, InitAttempt)>>,
    generation: AtomicU64,
}

impl GeoResolver {
    pub fn new(opener: Arc<dyn DatabaseOpener>) -> Self {
        Self {
            opener,
            database: Arc::new(OnceLock::new()),
            in_flight: Mutex::new(None),
            generation: AtomicU64::new(0),
        }
    }

    /// Checks if the database is open.
    pub fn is_initialized(&self) -> bool {
        self.database.get().is_some()
    }

    /// Metadata of the open database, if initialized and known.
    pub fn metadata(&self) -> Option<GeoIpMetadata> {
        self.database.get().and_then(|db| db.metadata())
    }
}

impl std::fmt::Debug for GeoResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeoResolver")
            .field("initialized", &self.is_initialized())
            .finish_non_exhaustive()
    }
}
