//! IP address lookup functions.
//!
//! This module provides the synchronous point lookup of [`GeoResolver`] and the
//! MaxMind-backed [`CityDatabase`] implementation.

use std::net::IpAddr;

use maxminddb::Reader;

use super::types::{CityRecord, GeoIpMetadata, GeoResult, LookupFault};
use super::{CityDatabase, GeoResolver};
use crate::config::{LOOKUP_ERROR_GENERIC, LOOKUP_ERROR_NOT_FOUND, LOOKUP_ERROR_NOT_INITIALIZED};

impl GeoResolver {
    /// Looks up an address in the open database.
    ///
    /// Never blocks on I/O and never triggers initialization. Every failure is
    /// reported in `GeoResult::error`:
    /// - `"DB not initialized"` before [`GeoResolver::initialize`] has succeeded
    /// - `"Not found"` when the database has no record with coordinates
    /// - the fault message (or `"Lookup error"`) when the database reports a fault
    pub fn lookup(&self, address: &str) -> GeoResult {
        let Some(database) = self.database.get() else {
            return GeoResult::failure(address, LOOKUP_ERROR_NOT_INITIALIZED);
        };

        match database.get(address) {
            Ok(Some(record)) => match (record.latitude, record.longitude) {
                (Some(lat), Some(lng)) => GeoResult {
                    ip: address.to_string(),
                    lat: Some(lat),
                    lng: Some(lng),
                    city: record.city,
                    country: record.country,
                    error: None,
                },
                _ => GeoResult::failure(address, LOOKUP_ERROR_NOT_FOUND),
            },
            Ok(None) => GeoResult::failure(address, LOOKUP_ERROR_NOT_FOUND),
            Err(fault) => {
                log::debug!("GeoIP lookup fault for {}: {}", address, fault);
                let message = if fault.0.trim().is_empty() {
                    LOOKUP_ERROR_GENERIC.to_string()
                } else {
                    fault.0
                };
                GeoResult::failure(address, message)
            }
        }
    }
}

/// GeoLite2-City database held in memory.
pub struct MaxMindCityDatabase {
    reader: Reader<Vec<u8>>,
    metadata: GeoIpMetadata,
}

impl MaxMindCityDatabase {
    pub fn new(reader: Reader<Vec<u8>>, metadata: GeoIpMetadata) -> Self {
        Self { reader, metadata }
    }
}

impl CityDatabase for MaxMindCityDatabase {
    fn get(&self, address: &str) -> Result<Option<CityRecord>, LookupFault> {
        let ip_addr = parse_address(address)?;

        // maxminddb 0.27 API: lookup() returns Result<LookupResult, MaxMindDbError>
        // Use has_data() to check if data exists, then decode() to get the City struct
        let city_lookup = self
            .reader
            .lookup(ip_addr)
            .map_err(|e| LookupFault::new(e.to_string()))?;

        if !city_lookup.has_data() {
            return Ok(None);
        }

        let city_result: maxminddb::geoip2::City = match city_lookup.decode() {
            Ok(Some(city)) => city,
            Ok(None) => return Ok(None),
            Err(e) => return Err(LookupFault::new(e.to_string())),
        };

        Ok(Some(CityRecord {
            latitude: city_result.location.latitude,
            longitude: city_result.location.longitude,
            city: city_result.city.names.english.map(|s| s.to_string()),
            country: city_result.country.names.english.map(|s| s.to_string()),
        }))
    }

    fn metadata(&self) -> Option<GeoIpMetadata> {
        Some(self.metadata.clone())
    }
}

/// Parses a registry-reported address; anything that is not a bare IPv4 or
/// IPv6 address is a lookup fault.
fn parse_address(address: &str) -> Result<IpAddr, LookupFault> {
    address
        .trim()
        .parse()
        .map_err(|e| LookupFault::new(format!("{e}: '{address}'")))
}
