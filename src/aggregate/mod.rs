//! Node selection and location binning.
//!
//! This module provides:
//! - The two node selection policies (stake state, uptime window)
//! - Grouping of geolocated nodes into `LocationBin`s
//! - Per-run statistics

mod bins;
mod filter;
mod stats;

// Re-export public API
pub use bins::{aggregate, BinAccumulator, GroupKey, LocationBin};
pub use filter::{oldest_uptime, select_nodes};
pub use stats::RunStats;
