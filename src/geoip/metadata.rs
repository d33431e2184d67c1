//! Metadata extraction for GeoIP databases.

use maxminddb::Reader;
use std::time::SystemTime;

use super::types::GeoIpMetadata;

/// Extracts metadata from a GeoIP database
pub(crate) fn extract_metadata<T: AsRef<[u8]>>(reader: &Reader<T>, source: &str) -> GeoIpMetadata {
    // MaxMind databases carry a build_epoch field in their metadata section
    let version = format!("build_{}", reader.metadata.build_epoch);

    GeoIpMetadata {
        source: source.to_string(),
        version,
        last_updated: SystemTime::now(),
    }
}
