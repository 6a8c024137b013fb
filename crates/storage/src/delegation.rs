//! Delegation document model.

use serde::{Deserialize, Serialize};
use staking_types::DelegationState;

/// A staked Bitcoin position tracked through its lifecycle.
///
/// Identity is the staking transaction hash (hex, unique). Created on the
/// first active-staking event, mutated only through allowed state
/// transitions, never deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelegationDocument {
    /// Staking transaction hash (hex), the document identity.
    pub staking_tx_hash_hex: String,
    /// Staker BTC public key (hex).
    pub staker_pk_hex: String,
    /// Finality provider BTC public key (hex).
    pub finality_provider_pk_hex: String,
    /// Raw staking transaction (hex).
    pub staking_tx_hex: String,
    /// Staked amount in satoshis.
    pub staking_value: u64,
    /// Block height at which staking started.
    pub staking_start_height: u64,
    /// Staking timelock in blocks.
    pub staking_timelock: u64,
    /// Output index of the staking output.
    pub staking_output_index: u64,
    /// Unix timestamp at which staking started.
    pub staking_start_timestamp: i64,
    /// Whether the delegation exceeded the staking cap when accepted.
    pub is_overflow: bool,
    /// Staker taproot address, used for address-based existence checks.
    pub staker_taproot_address: String,
    /// Current lifecycle state.
    pub state: DelegationState,
    /// Unbonding transaction details, populated by the unbonding transition.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unbonding: Option<UnbondingDetails>,
}

/// Fields populated when a delegation transitions to `Unbonding`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnbondingDetails {
    /// Raw unbonding transaction (hex).
    pub unbonding_tx_hex: String,
    /// Block height at which unbonding started.
    pub unbonding_start_height: u64,
    /// Unbonding timelock in blocks.
    pub unbonding_timelock: u64,
    /// Output index of the unbonding output.
    pub unbonding_output_index: u64,
    /// Unix timestamp at which unbonding started.
    pub unbonding_start_timestamp: i64,
}
