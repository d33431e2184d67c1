//! Stake lifecycle classification.
//!
//! A stake's state is derived from the most recent state-relevant event in its
//! history, then refined by the deregistration and unlock-height rules. Every
//! function here is pure and total.

use serde::Serialize;
use strum_macros::{Display, EnumIter};

use super::types::{ArbitrumEvent, ExitType, StakeRecord};

/// State implied by the latest state-relevant event alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StakeEventState {
    Unknown,
    Active,
    ExitRequested,
    Exited,
}

/// Final lifecycle state of a stake.
///
/// All states are mutually exclusive: a deregistered stake is never also `Exited`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, Serialize)]
pub enum StakeState {
    /// Active event state and `active = true`
    #[strum(serialize = "Running")]
    Running,
    /// Active event state and `active = false`
    #[strum(serialize = "Decommissioned")]
    Decommissioned,
    /// Exit requested and the unlock height has passed
    #[strum(serialize = "Ready To Exit")]
    AwaitingExit,
    /// Exited by unlock or liquidation
    #[strum(serialize = "Exited")]
    Exited,
    /// Deregistered by the network
    #[strum(serialize = "Deregistered")]
    Deregistered,
    #[strum(serialize = "Unknown")]
    Unknown,
}

impl StakeState {
    /// Nodes still materially present in the network, active or not.
    pub fn is_present(self) -> bool {
        matches!(self, StakeState::Running | StakeState::Decommissioned)
    }
}

/// Classifies the first state-relevant event of `stake.events`.
pub fn parse_stake_event_state(stake: &StakeRecord) -> StakeEventState {
    let latest = stake.events.iter().find(|event| event.name.is_state_event());

    match latest.map(|event| event.name) {
        Some(ArbitrumEvent::NewSeededServiceNode | ArbitrumEvent::NewServiceNodeV2) => {
            StakeEventState::Active
        }
        Some(ArbitrumEvent::ServiceNodeExitRequest) => StakeEventState::ExitRequested,
        Some(ArbitrumEvent::ServiceNodeExit | ArbitrumEvent::ServiceNodeLiquidated) => {
            StakeEventState::Exited
        }
        _ => StakeEventState::Unknown,
    }
}

/// True when the network deregistered the stake.
pub fn is_stake_deregistered(stake: &StakeRecord) -> bool {
    stake.exit_type == Some(ExitType::Deregister)
        && stake.deregistration_height.is_some_and(|height| height > 0)
}

pub fn is_stake_requesting_exit(stake: &StakeRecord) -> bool {
    parse_stake_event_state(stake) == StakeEventState::ExitRequested
}

/// True when an exit was requested and its unlock height is below `block_height`.
pub fn is_stake_ready_to_exit(stake: &StakeRecord, block_height: u64) -> bool {
    is_stake_requesting_exit(stake)
        && stake
            .requested_unlock_height
            .is_some_and(|unlock| unlock > 0 && unlock < block_height)
}

/// Classifies a stake at `block_height`.
///
/// Precedence, first match wins:
/// 1. deregistered by the network
/// 2. exit or liquidation event
/// 3. exit request: ready to exit once the unlock height has passed, running before
/// 4. creation event: running or decommissioned depending on `active`
/// 5. unknown
pub fn parse_stake_state(stake: &StakeRecord, block_height: u64) -> StakeState {
    if is_stake_deregistered(stake) {
        return StakeState::Deregistered;
    }

    match parse_stake_event_state(stake) {
        StakeEventState::Exited => StakeState::Exited,
        StakeEventState::ExitRequested => {
            if is_stake_ready_to_exit(stake, block_height) {
                StakeState::AwaitingExit
            } else {
                StakeState::Running
            }
        }
        StakeEventState::Active if stake.active => StakeState::Running,
        StakeEventState::Active => StakeState::Decommissioned,
        StakeEventState::Unknown => StakeState::Unknown,
    }
}
