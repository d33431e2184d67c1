//! Error handling.
//!
//! Errors are split along the propagation policy of a pipeline run:
//! - **Fatal**: registry transport/format errors and GeoIP open failures abort
//!   the run and reach the caller through the `Outcome` error slot
//! - **Absorbed**: per-record lookup failures become data (`GeoResult::error`)
//!   and stake classification never fails

mod types;

// Re-export public API
pub use types::{FetchError, GeoIpError, InitializationError};
