//! Stake records and lifecycle classification.
//!
//! This module provides:
//! - Typed stake records and the on-chain event catalogue
//! - The stake state classifier
//! - Block-height to wall-clock estimation

mod block_time;
mod state;
mod types;

// Re-export public API
pub use block_time::{
    blocks_in_ms, ms_in_blocks, BlockTimeManager, INITIAL_DOWNTIME_CREDITS_MS, MAX_CONTRIBUTORS,
    MAX_OPERATOR_FEE, MIN_OPERATOR_FEE, MS_PER_BLOCK, NETWORK_CONFIRMATION_TIME_AVG_MS,
    NETWORK_REQUIRED_CONFIRMATIONS, SMALL_CONTRIBUTOR_DIVISOR,
};
pub use state::{
    is_stake_deregistered, is_stake_ready_to_exit, is_stake_requesting_exit,
    parse_stake_event_state, parse_stake_state, StakeEventState, StakeState,
};
pub use types::{ArbitrumEvent, ExitType, StakeEvent, StakeRecord};
