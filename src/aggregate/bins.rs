//! Grouping of geolocated nodes into location bins.

use std::collections::HashMap;

use serde::Serialize;

use crate::config::{UNKNOWN_GROUP_ID, UNKNOWN_LOCATION_LABEL};
use crate::geoip::GeoResult;

/// Grouping key of a bin.
///
/// Structured so that a city name can never collide with another
/// location's country text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GroupKey {
    /// Lookup failed or lacked latitude, longitude or country
    Unknown,
    Location {
        city: Option<String>,
        country: String,
    },
}

impl GroupKey {
    pub fn for_result(result: &GeoResult) -> Self {
        match (result.lat, result.lng, &result.country) {
            (Some(_), Some(_), Some(country)) => GroupKey::Location {
                city: result.city.clone(),
                country: country.clone(),
            },
            _ => GroupKey::Unknown,
        }
    }

    /// Display form of the key, used in bin logging; `"null"` for the
    /// fallback group. Never used for grouping.
    pub fn id(&self) -> String {
        match self {
            GroupKey::Unknown => UNKNOWN_GROUP_ID.to_string(),
            GroupKey::Location { city, country } => {
                format!("{}{}", city.as_deref().unwrap_or("null"), country)
            }
        }
    }
}

/// Aggregated group of nodes sharing a location.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationBin {
    pub lat: f64,
    pub lng: f64,
    pub city: Option<String>,
    pub country: Option<String>,
    /// Nodes in the bin
    pub n: usize,
    /// Nodes in the bin with `active = true`
    #[serde(rename = "nActive")]
    pub n_active: usize,
}

impl LocationBin {
    fn first(key: &GroupKey, result: &GeoResult) -> Self {
        match (key, result.lat, result.lng) {
            (GroupKey::Location { city, country }, Some(lat), Some(lng)) => Self {
                lat,
                lng,
                city: city.clone(),
                country: Some(country.clone()),
                n: 0,
                n_active: 0,
            },
            _ => Self::unknown(),
        }
    }

    /// Empty fallback bin fixed at (0, 0).
    pub fn unknown() -> Self {
        Self {
            lat: 0.0,
            lng: 0.0,
            city: Some(UNKNOWN_LOCATION_LABEL.to_string()),
            country: Some(UNKNOWN_LOCATION_LABEL.to_string()),
            n: 0,
            n_active: 0,
        }
    }

    pub fn is_unknown(&self) -> bool {
        self.lat == 0.0
            && self.lng == 0.0
            && self.city.as_deref() == Some(UNKNOWN_LOCATION_LABEL)
            && self.country.as_deref() == Some(UNKNOWN_LOCATION_LABEL)
    }
}

/// Folds geolocated nodes into bins in first-encounter order.
///
/// The first member of a group fixes its coordinates and names.
#[derive(Debug, Default)]
pub struct BinAccumulator {
    bins: Vec<LocationBin>,
    index: HashMap<GroupKey, usize>,
}

impl BinAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, result: &GeoResult, active: bool) {
        let key = GroupKey::for_result(result);
        let slot = match self.index.get(&key) {
            Some(&slot) => slot,
            None => {
                log::trace!("New location bin '{}' from {}", key.id(), result.ip);
                self.bins.push(LocationBin::first(&key, result));
                let slot = self.bins.len() - 1;
                self.index.insert(key, slot);
                slot
            }
        };

        let bin = &mut self.bins[slot];
        bin.n += 1;
        if active {
            bin.n_active += 1;
        }
    }

    pub fn len(&self) -> usize {
        self.bins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    pub fn into_bins(self) -> Vec<LocationBin> {
        self.bins
    }
}

/// Bins `(result, active)` pairs.
pub fn aggregate<'a, I>(items: I) -> Vec<LocationBin>
where
    I: IntoIterator<Item = (&'a GeoResult, bool)>,
{
    let mut acc = BinAccumulator::new();
    for (result, active) in items {
        acc.add(result, active);
    }
    acc.into_bins()
}
