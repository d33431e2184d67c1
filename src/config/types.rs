//! Configuration types and CLI options.
//!
//! This module defines enums and structs used for command-line argument parsing
//! and configuration.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};

use crate::config::constants::{
    DEFAULT_GEOIP_PATH, DEFAULT_REGISTRY_URL, DEFAULT_TIMEOUT_SECS, DEFAULT_UPTIME_WINDOW_HOURS,
    DEFAULT_USER_AGENT,
};

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Node selection policy applied before geolocation.
///
/// Both policies exist because the registry consumer moved from an uptime
/// window to stake-state classification; a deployment picks one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum FilterPolicy {
    /// Keep nodes whose stake state is Running or Decommissioned
    State,
    /// Keep nodes that submitted an uptime proof inside the uptime window
    Uptime,
}

/// Library configuration (no CLI dependencies).
///
/// # Examples
///
/// ```no_run
/// use node_atlas::{Config, FilterPolicy};
///
/// let config = Config {
///     filter: FilterPolicy::Uptime,
///     uptime_window_hours: 24,
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Registry network-status endpoint
    pub registry_url: String,

    /// GeoLite2-City database file
    pub geoip_path: PathBuf,

    /// Node selection policy
    pub filter: FilterPolicy,

    /// Uptime window in hours (uptime filter only)
    pub uptime_window_hours: u64,

    /// Per-request timeout in seconds
    pub timeout_seconds: u64,

    /// HTTP User-Agent header value
    pub user_agent: String,

    /// Log level
    pub log_level: LogLevel,

    /// Log format
    pub log_format: LogFormat,

    /// Re-run the pipeline every N seconds instead of once
    pub watch: Option<u64>,

    /// Pretty-print JSON output
    pub pretty: bool,
}

impl Config {
    /// Uptime window as a `Duration`.
    pub fn uptime_window(&self) -> Duration {
        Duration::from_secs(self.uptime_window_hours.saturating_mul(60 * 60))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            registry_url: DEFAULT_REGISTRY_URL.to_string(),
            geoip_path: PathBuf::from(DEFAULT_GEOIP_PATH),
            filter: FilterPolicy::State,
            uptime_window_hours: DEFAULT_UPTIME_WINDOW_HOURS,
            timeout_seconds: DEFAULT_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            log_level: LogLevel::Info,
            log_format: LogFormat::Plain,
            watch: None,
            pretty: false,
        }
    }
}

/// Command-line options.
///
/// # Examples
///
/// ```bash
/// # One-shot run, bins printed as JSON
/// node_atlas --geoip ./GeoLite2-City.mmdb
///
/// # Legacy uptime filter with a 24h window
/// node_atlas --filter uptime --uptime-window-hours 24
///
/// # Refresh every 10 minutes
/// node_atlas --watch 600
/// ```
#[derive(Debug, Parser)]
#[command(
    name = "node_atlas",
    about = "Bins registered service nodes by GeoIP location."
)]
pub struct Opt {
    /// Registry network-status endpoint
    #[arg(long, value_parser = parse_registry_url, default_value = DEFAULT_REGISTRY_URL)]
    pub registry_url: String,

    /// GeoLite2-City database file (.mmdb)
    ///
    /// Falls back to the GEOIP_CITY_DB environment variable, then to
    /// ./GeoLite2-City.mmdb.
    #[arg(long)]
    pub geoip: Option<PathBuf>,

    /// Node selection policy: state|uptime
    #[arg(long, value_enum, default_value_t = FilterPolicy::State)]
    pub filter: FilterPolicy,

    /// Uptime window in hours (only used with --filter uptime)
    #[arg(long, default_value_t = DEFAULT_UPTIME_WINDOW_HOURS)]
    pub uptime_window_hours: u64,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_seconds: u64,

    /// HTTP User-Agent header value
    #[arg(long, default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// Log level: error|warn|info|debug|trace
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Log format: plain|json
    #[arg(long, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,

    /// Re-run every N seconds until interrupted (the globe client used 600)
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub watch: Option<u64>,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,
}

fn parse_registry_url(value: &str) -> Result<String, String> {
    let parsed = url::Url::parse(value).map_err(|e| format!("invalid URL '{value}': {e}"))?;
    match parsed.scheme() {
        "http" | "https" => Ok(value.to_string()),
        other => Err(format!("unsupported scheme '{other}', expected http or https")),
    }
}

impl From<Opt> for Config {
    fn from(opt: Opt) -> Self {
        let geoip_path = opt.geoip.unwrap_or_else(|| {
            std::env::var(crate::config::GEOIP_PATH_ENV)
                .ok()
                .filter(|p| !p.is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_GEOIP_PATH))
        });

        Self {
            registry_url: opt.registry_url,
            geoip_path,
            filter: opt.filter,
            uptime_window_hours: opt.uptime_window_hours,
            timeout_seconds: opt.timeout_seconds,
            user_agent: opt.user_agent,
            log_level: opt.log_level,
            log_format: opt.log_format,
            watch: opt.watch,
            pretty: opt.pretty,
        }
    }
}
