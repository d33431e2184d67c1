//! The node aggregation pipeline.
//!
//! One run: initialize the resolver, fetch the registry snapshot, select nodes,
//! geolocate each one and fold the results into location bins.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::aggregate::{select_nodes, BinAccumulator, LocationBin, RunStats};
use crate::config::{Config, FilterPolicy};
use crate::error_handling::InitializationError;
use crate::geoip::GeoResolver;
use crate::initialization::{init_client, init_resolver};
use crate::outcome::{safe_try, Outcome};
use crate::registry::{fetch_snapshot, NetworkSnapshot};
use crate::stake::parse_stake_state;

/// Runs the fetch → filter → geolocate → bin pipeline.
///
/// Holds no per-run state, so overlapping calls to [`NodePipeline::get_nodes`]
/// are safe; they share the resolver and its single-flight initialization.
#[derive(Debug, Clone)]
pub struct NodePipeline {
    client: Arc<reqwest::Client>,
    resolver: Arc<GeoResolver>,
    registry_url: String,
    filter: FilterPolicy,
    uptime_window: Duration,
}

impl NodePipeline {
    pub fn new(config: &Config, client: Arc<reqwest::Client>, resolver: Arc<GeoResolver>) -> Self {
        Self {
            client,
            resolver,
            registry_url: config.registry_url.clone(),
            filter: config.filter,
            uptime_window: config.uptime_window(),
        }
    }

    /// Builds the HTTP client and a file-backed resolver from `config`.
    ///
    /// # Errors
    ///
    /// Returns `InitializationError::HttpClientError` if the client cannot be built.
    pub fn from_config(config: &Config) -> Result<Self, InitializationError> {
        let client = init_client(config)?;
        let resolver = init_resolver(config);
        Ok(Self::new(config, client, resolver))
    }

    pub fn resolver(&self) -> &Arc<GeoResolver> {
        &self.resolver
    }

    /// Runs the pipeline, capturing any failure in the returned `Outcome`.
    pub async fn get_nodes(&self) -> Outcome<Vec<LocationBin>> {
        safe_try(self.get_nodes_unsafe()).await
    }

    /// Runs the pipeline.
    ///
    /// # Errors
    ///
    /// Fails without partial results if the resolver cannot be initialized or
    /// the registry fetch fails. Per-node lookup failures never fail the run;
    /// those nodes land in the `"null"` bin.
    pub async fn get_nodes_unsafe(&self) -> Result<Vec<LocationBin>> {
        self.resolver
            .initialize()
            .await
            .context("GeoIP resolver unavailable")?;

        let snapshot = fetch_snapshot(&self.client, &self.registry_url)
            .await
            .with_context(|| format!("Failed to fetch registry snapshot from {}", self.registry_url))?;

        let (bins, stats) = summarize(&snapshot, self.filter, self.uptime_window, &self.resolver);
        stats.log_summary();
        Ok(bins)
    }
}

/// Selects, geolocates and bins the nodes of one snapshot.
///
/// Lookups go through `resolver` as-is; an uninitialized resolver puts every
/// node in the `"null"` bin.
pub fn summarize(
    snapshot: &NetworkSnapshot,
    filter: FilterPolicy,
    uptime_window: Duration,
    resolver: &GeoResolver,
) -> (Vec<LocationBin>, RunStats) {
    let mut stats = RunStats::new();
    stats.total_nodes = snapshot.nodes.len();
    for node in &snapshot.nodes {
        stats.record_state(parse_stake_state(node, snapshot.network.current_height));
    }

    let selected = select_nodes(snapshot, filter, uptime_window);
    stats.selected_nodes = selected.len();

    let mut acc = BinAccumulator::new();
    for node in selected {
        let result = resolver.lookup(&node.public_ip);
        if let Some(error) = result.error.as_deref() {
            log::trace!("No location for {}: {}", node.public_ip, error);
            stats.record_lookup_failure(error);
        }
        acc.add(&result, node.active);
    }

    log::debug!("{} location bins", acc.len());
    (acc.into_bins(), stats)
}
