//! Registry snapshot types.

use serde::Deserialize;

use crate::stake::StakeRecord;

/// Chain state reported alongside the node list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct NetworkInfo {
    pub current_height: u64,
    /// Unix seconds of the block at `current_height`
    pub block_timestamp: i64,
}

/// One fetch of the registry's network-status endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NetworkSnapshot {
    pub network: NetworkInfo,
    pub nodes: Vec<StakeRecord>,
}
