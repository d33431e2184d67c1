//! Node selection before geolocation.

use std::time::Duration;

use crate::config::FilterPolicy;
use crate::registry::NetworkSnapshot;
use crate::stake::{parse_stake_state, StakeRecord};

/// Oldest uptime proof, in unix seconds, that still counts as online.
pub fn oldest_uptime(block_timestamp: i64, window: Duration) -> i64 {
    let window_secs = i64::try_from(window.as_secs()).unwrap_or(i64::MAX);
    block_timestamp.saturating_sub(window_secs)
}

/// Returns the records of `snapshot` kept by `policy`, in snapshot order.
pub fn select_nodes(
    snapshot: &NetworkSnapshot,
    policy: FilterPolicy,
    uptime_window: Duration,
) -> Vec<&StakeRecord> {
    match policy {
        FilterPolicy::Uptime => {
            let oldest = oldest_uptime(snapshot.network.block_timestamp, uptime_window);
            snapshot
                .nodes
                .iter()
                .filter(|node| node.last_uptime_proof >= oldest)
                .collect()
        }
        FilterPolicy::State => {
            let height = snapshot.network.current_height;
            snapshot
                .nodes
                .iter()
                .filter(|node| parse_stake_state(node, height).is_present())
                .collect()
        }
    }
}
