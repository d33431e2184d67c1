//! GeoIP database initialization.
//!
//! [`GeoResolver::initialize`] is single-flight: the first caller starts one
//! open attempt and stores it as a shared future; callers that overlap with it
//! await the same future and observe the same outcome. A failed attempt is
//! discarded so that the next call starts a fresh one.

mod loader;

use futures::FutureExt;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use super::{GeoResolver, InitAttempt};
use crate::error_handling::GeoIpError;

pub use loader::MmdbFileOpener;

impl GeoResolver {
    /// Opens the database if it is not open yet.
    ///
    /// Returns immediately once the database is open. While an attempt is in
    /// flight, every caller awaits that attempt instead of starting another.
    ///
    /// # Errors
    ///
    /// Returns `GeoIpError::OpenFailed` to every caller of a failed attempt.
    /// The resolver stays uninitialized and a later call retries.
    pub async fn initialize(&self) -> Result<(), GeoIpError> {
        if self.is_initialized() {
            return Ok(());
        }

        let (generation, attempt) = {
            let mut slot = self
                .in_flight
                .lock()
                .map_err(|_| GeoIpError::LockPoisoned)?;
            if self.is_initialized() {
                return Ok(());
            }
            match slot.as_ref() {
                Some((generation, attempt)) => {
                    log::debug!("GeoIP initialization already in flight, awaiting it");
                    (*generation, attempt.clone())
                }
                None => {
                    let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
                    let attempt = self.start_attempt(generation);
                    *slot = Some((generation, attempt.clone()));
                    (generation, attempt)
                }
            }
        };

        let outcome = attempt.await;

        // Whoever returns first clears the slot; a newer attempt is left alone
        if let Ok(mut slot) = self.in_flight.lock() {
            if matches!(slot.as_ref(), Some((current, _)) if *current == generation) {
                *slot = None;
            }
        }

        outcome
    }

    fn start_attempt(&self, generation: u64) -> InitAttempt {
        let opener = Arc::clone(&self.opener);
        let database = Arc::clone(&self.database);
        async move {
            log::debug!("Opening GeoIP City database (attempt {})", generation);
            match opener.open().await {
                Ok(db) => {
                    if let Some(metadata) = db.metadata() {
                        log::info!(
                            "GeoIP City database loaded: {} ({})",
                            metadata.source,
                            metadata.version
                        );
                    } else {
                        log::info!("GeoIP City database loaded");
                    }
                    // Only one attempt can be in flight, so the cell is still empty
                    let _ = database.set(db);
                    Ok(())
                }
                Err(e) => {
                    log::error!("Failed to initialize GeoIP City database: {:#}", e);
                    Err(GeoIpError::OpenFailed(Arc::new(e)))
                }
            }
        }
        .boxed()
        .shared()
    }
}
