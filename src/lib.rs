//! node_atlas library: geographic binning of registered service nodes
//!
//! This library fetches the stake registry's network snapshot, classifies each
//! stake's lifecycle, geolocates the selected nodes with a local GeoLite2-City
//! database and groups them into location bins with total and active counts.
//!
//! # Example
//!
//! ```no_run
//! use node_atlas::{Config, NodePipeline};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config {
//!     geoip_path: std::path::PathBuf::from("GeoLite2-City.mmdb"),
//!     ..Default::default()
//! };
//!
//! let pipeline = NodePipeline::from_config(&config)?;
//! match pipeline.get_nodes().await.into_result() {
//!     Ok(bins) => println!("{} locations", bins.len()),
//!     Err(e) => eprintln!("{e}"),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Use `#[tokio::main]` in your application
//! or ensure you're calling library functions within an async context.

pub mod aggregate;
pub mod config;
pub mod error_handling;
pub mod geoip;
pub mod initialization;
mod outcome;
mod pipeline;
pub mod registry;
pub mod stake;

// Re-export public API
pub use aggregate::{LocationBin, RunStats};
pub use config::{Config, FilterPolicy, LogFormat, LogLevel, Opt};
pub use error_handling::{FetchError, GeoIpError, InitializationError};
pub use geoip::{
    CityDatabase, CityRecord, DatabaseOpener, GeoResolver, GeoResult, LookupFault, OpenFuture,
};
pub use outcome::{safe_try, Outcome};
pub use pipeline::{summarize, NodePipeline};
