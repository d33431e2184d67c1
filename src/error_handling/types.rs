//! Error type definitions.
//!
//! This module defines the error types used at the typed boundaries of the
//! application. Inside the pipeline these are wrapped in `anyhow::Error` with
//! context.

use std::sync::Arc;

use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] ReqwestError),
}

/// Error types for the registry fetch.
///
/// Every variant is fatal for the run that produced it.
#[derive(Error, Debug)]
pub enum FetchError {
    /// The registry answered with a non-success status code.
    #[error("Failed to fetch nodes (status {status})")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body, kept for logging
        body: String,
    },

    /// The body parsed as JSON but lacks the `nodes` array or `network` object.
    #[error("Invalid response format from nodes API")]
    InvalidFormat,

    /// The request could not be completed or the body could not be read.
    #[error("Failed to reach nodes API: {0}")]
    Transport(#[from] ReqwestError),

    /// The body is not valid JSON or a node record has the wrong shape.
    #[error("Failed to decode nodes API response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Error types for GeoIP resolver initialization.
#[derive(Error, Debug, Clone)]
pub enum GeoIpError {
    /// Opening the database failed. Shared by every caller that awaited the attempt.
    #[error("Failed to initialize GeoIP database: {0:#}")]
    OpenFailed(Arc<anyhow::Error>),

    /// The in-flight slot lock was poisoned by a panicking caller.
    #[error("GeoIP initialization lock poisoned")]
    LockPoisoned,
}
