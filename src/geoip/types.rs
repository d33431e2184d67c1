//! GeoIP data structures.
//!
//! This module defines the data structures used for GeoIP lookups and metadata.

use serde::{Deserialize, Serialize};
use std::time::SystemTime;

/// Metadata about the GeoIP database
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeoIpMetadata {
    /// Source path
    pub source: String,
    /// Database build date/version (extracted from database)
    pub version: String,
    /// When the database was opened
    pub last_updated: SystemTime,
}

/// Raw city-level record returned by a [`CityDatabase`](super::CityDatabase).
///
/// Any field may be missing when the database lacks that granularity.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CityRecord {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// English city name
    pub city: Option<String>,
    /// English country name
    pub country: Option<String>,
}

/// Internal fault raised by a database while looking up one address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupFault(pub String);

impl LookupFault {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

impl std::fmt::Display for LookupFault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Resolver output for one address.
///
/// When `error` is set every geographic field is `None`. A successful lookup
/// always carries `lat` and `lng`; `city` and `country` may still be missing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeoResult {
    pub ip: String,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub error: Option<String>,
}

impl GeoResult {
    /// Builds a failed result; all geographic fields are cleared.
    pub fn failure(ip: &str, error: impl Into<String>) -> Self {
        Self {
            ip: ip.to_string(),
            lat: None,
            lng: None,
            city: None,
            country: None,
            error: Some(error.into()),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    /// True when the result can be placed in a named location bin.
    pub fn has_location(&self) -> bool {
        self.lat.is_some() && self.lng.is_some() && self.country.is_some()
    }
}
