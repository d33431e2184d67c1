//! Network timing constants and block-height/time conversion.

use chrono::{DateTime, TimeDelta, Utc};

/// Average milliseconds per block (~2 minutes per block)
pub const MS_PER_BLOCK: i64 = 2 * 60 * 1000;
/// Confirmations required for a network action
pub const NETWORK_REQUIRED_CONFIRMATIONS: u32 = 5;
/// Average time to collect all confirmations
pub const NETWORK_CONFIRMATION_TIME_AVG_MS: i64 = 12 * 60 * 1000;
pub const MIN_OPERATOR_FEE: u32 = 0;
pub const MAX_OPERATOR_FEE: u32 = 100;
pub const MAX_CONTRIBUTORS: u32 = 10;
/// A small contributor contributes less than 1/DIVISOR of the total
pub const SMALL_CONTRIBUTOR_DIVISOR: u32 = 4;
/// 2 hours
pub const INITIAL_DOWNTIME_CREDITS_MS: i64 = 2 * 60 * 60 * 1000;

pub fn blocks_in_ms(blocks: i64) -> i64 {
    blocks.saturating_mul(MS_PER_BLOCK)
}

/// Whole blocks that fit in `ms`, rounded down.
pub fn ms_in_blocks(ms: i64) -> i64 {
    ms.div_euclid(MS_PER_BLOCK)
}

/// Estimates wall-clock dates of blocks from one known (time, height) pair.
#[derive(Debug, Clone, Copy)]
pub struct BlockTimeManager {
    network_time_secs: i64,
    current_block: u64,
}

impl BlockTimeManager {
    /// `network_time_secs` is the unix time of `current_block`.
    pub fn new(network_time_secs: i64, current_block: u64) -> Self {
        Self {
            network_time_secs,
            current_block,
        }
    }

    /// Estimated date of `target_block`; earlier blocks give dates in the past.
    ///
    /// Returns `None` if the estimate is outside the range `chrono` can represent.
    pub fn date_of_block(&self, target_block: u64) -> Option<DateTime<Utc>> {
        let delta_blocks = i128::from(target_block) - i128::from(self.current_block);
        let offset_ms = delta_blocks.checked_mul(i128::from(MS_PER_BLOCK))?;
        let base_ms = i128::from(self.network_time_secs).checked_mul(1000)?;
        let millis = i64::try_from(base_ms.checked_add(offset_ms)?).ok()?;
        DateTime::<Utc>::from_timestamp_millis(millis)
    }

    /// Estimated time until `target_block`, negative if it is in the past.
    pub fn time_until_block(&self, target_block: u64) -> Option<TimeDelta> {
        let target = self.date_of_block(target_block)?;
        let now = DateTime::<Utc>::from_timestamp(self.network_time_secs, 0)?;
        Some(target - now)
    }
}
