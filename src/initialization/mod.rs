//! Application initialization and resource setup.
//!
//! This module provides functions to initialize the shared resources of a run:
//! - Logger
//! - HTTP client
//! - GeoIP resolver backed by a GeoLite2-City file

mod client;
mod logger;

use std::sync::Arc;

use crate::config::Config;
use crate::geoip::{GeoResolver, MmdbFileOpener};

// Re-export public API
pub use client::init_client;
pub use logger::init_logger_with;

/// Builds the GeoIP resolver for the configured database file.
///
/// The database is not opened here; `GeoResolver::initialize` opens it on the
/// first pipeline run.
pub fn init_resolver(config: &Config) -> Arc<GeoResolver> {
    Arc::new(GeoResolver::new(Arc::new(MmdbFileOpener::new(
        config.geoip_path.clone(),
    ))))
}
