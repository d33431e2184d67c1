//! Application configuration and constants.
//!
//! This module provides:
//! - Configuration constants (endpoints, windows, fallback labels)
//! - CLI option types and parsing
//! - The library `Config` used by the pipeline

mod constants;
mod types;

// Re-export all constants
pub use constants::*;
pub use types::{Config, FilterPolicy, LogFormat, LogLevel, Opt};
