//! Stake record and event types as reported by the registry.
//!
//! Only the fields used by classification, filtering and aggregation are typed;
//! every other field of the registry payload is ignored.

use serde::{Deserialize, Deserializer};

/// How a stake left the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExitType {
    /// The node is deregistered by consensus
    Deregister,
    /// The node is exited by contributor request
    Exit,
    /// Any value this crate does not know about
    #[serde(other)]
    Unrecognized,
}

/// On-chain event kinds emitted by the staking contracts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum ArbitrumEvent {
    // ServiceNodeContributionFactory
    NewServiceNodeContributionContract,
    // ServiceNodeContribution
    Finalized,
    NewContribution,
    OpenForPublicContribution,
    Filled,
    WithdrawContribution,
    UpdateStakerBeneficiary,
    UpdateManualFinalize,
    UpdateFee,
    UpdatePubkeys,
    UpdateReservedContributors,
    Reset,
    // ServiceNodeRewards
    NewSeededServiceNode,
    NewServiceNodeV2,
    ServiceNodeExitRequest,
    ServiceNodeExit,
    ServiceNodeLiquidated,
    RewardsClaimed,
    StakingRequirementUpdated,
    ClaimThresholdUpdated,
    ClaimCycleUpdated,
    LiquidationRatiosUpdated,
    BLSNonSignerIndicesUpdated,
    // Token
    Transfer,
    Approval,
    /// Event names added to the contracts after this list was written
    #[serde(other)]
    Other,
}

impl ArbitrumEvent {
    /// True for events that change a stake's lifecycle.
    pub fn is_state_event(self) -> bool {
        matches!(
            self,
            ArbitrumEvent::NewSeededServiceNode
                | ArbitrumEvent::NewServiceNodeV2
                | ArbitrumEvent::ServiceNodeExitRequest
                | ArbitrumEvent::ServiceNodeExit
                | ArbitrumEvent::ServiceNodeLiquidated
        )
    }
}

/// One entry of a stake's event history. The event payload is not kept.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StakeEvent {
    pub name: ArbitrumEvent,
}

impl StakeEvent {
    pub fn new(name: ArbitrumEvent) -> Self {
        Self { name }
    }
}

/// One network participant from a registry snapshot.
///
/// `events` is ordered most-recent first.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct StakeRecord {
    #[serde(default, deserialize_with = "null_as_default")]
    pub public_ip: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub active: bool,
    /// Unix seconds of the last uptime proof
    #[serde(default, deserialize_with = "null_as_default")]
    pub last_uptime_proof: i64,
    #[serde(default)]
    pub exit_type: Option<ExitType>,
    #[serde(default)]
    pub deregistration_height: Option<u64>,
    #[serde(default)]
    pub requested_unlock_height: Option<u64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub events: Vec<StakeEvent>,
}

/// Treats an explicit JSON `null` like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
