//! Upstream stake registry.
//!
//! Fetches and validates the network-status snapshot.

mod fetch;
mod types;

// Re-export public API
pub use fetch::{fetch_snapshot, parse_snapshot};
pub use types::{NetworkInfo, NetworkSnapshot};
