//! Configuration constants.
//!
//! This module defines the constants used throughout the application,
//! including the registry endpoint, GeoIP defaults and aggregation labels.

/// Network status endpoint of the stake registry.
///
/// Returns `{ "nodes": [...], "network": { "current_height", "block_timestamp", ... } }`.
pub const DEFAULT_REGISTRY_URL: &str = "https://stake.getsession.org/api/ssb/nodes";

/// Default location of the MaxMind GeoLite2-City database
pub const DEFAULT_GEOIP_PATH: &str = "GeoLite2-City.mmdb";

/// Environment variable that overrides the GeoIP database path when `--geoip` is absent
pub const GEOIP_PATH_ENV: &str = "GEOIP_CITY_DB";

/// Per-request timeout for the registry fetch, in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Nodes with an uptime proof younger than this are considered online (uptime filter only)
pub const DEFAULT_UPTIME_WINDOW_HOURS: u64 = 48;

/// Polling interval used by the original globe client (10 minutes)
pub const SUGGESTED_WATCH_INTERVAL_SECS: u64 = 600;

pub const DEFAULT_USER_AGENT: &str = concat!("node_atlas/", env!("CARGO_PKG_VERSION"));

// Fallback bin
/// Group id of the bin that collects nodes without a usable location
pub const UNKNOWN_GROUP_ID: &str = "null";
/// City and country label of the fallback bin
pub const UNKNOWN_LOCATION_LABEL: &str = "Unknown";

// Lookup error messages
// Surfaced verbatim in `GeoResult::error`
pub const LOOKUP_ERROR_NOT_INITIALIZED: &str = "DB not initialized";
pub const LOOKUP_ERROR_NOT_FOUND: &str = "Not found";
pub const LOOKUP_ERROR_GENERIC: &str = "Lookup error";

/// Maximum number of characters of an error body included in logs
pub const MAX_ERROR_BODY_LOG_CHARS: usize = 500;
