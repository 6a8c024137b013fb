//! Typed queue event schemas.
//!
//! Field names mirror the wire format emitted by the staking indexer
//! (snake_case JSON). Events carry hex-encoded identities; nothing here is
//! parsed beyond JSON.

use serde::{Deserialize, Serialize};
use staking_types::{DelegationState, TxType};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The event kinds this backend consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventType {
    /// A new delegation became active.
    ActiveStaking,
    /// A staker broadcast an unbonding transaction.
    UnbondingStaking,
    /// A delegation's funds were withdrawn on chain.
    WithdrawStaking,
    /// A tracked timelock expired.
    ExpiredStaking,
    /// A derived stats delta emitted by another handler.
    StakingStats,
    /// New BTC network info from the indexer.
    BtcInfo,
}

/// Error parsing an event type from its message-type string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown event type: {0}")]
pub struct EventTypeError(
    /// The unrecognized message-type tag.
    pub String,
);

impl EventType {
    /// Message-type string used on the queue.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ActiveStaking => "active_staking_event",
            Self::UnbondingStaking => "unbonding_staking_event",
            Self::WithdrawStaking => "withdraw_staking_event",
            Self::ExpiredStaking => "expired_staking_event",
            Self::StakingStats => "staking_stats_event",
            Self::BtcInfo => "btc_info_event",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventType {
    type Err = EventTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active_staking_event" => Ok(Self::ActiveStaking),
            "unbonding_staking_event" => Ok(Self::UnbondingStaking),
            "withdraw_staking_event" => Ok(Self::WithdrawStaking),
            "expired_staking_event" => Ok(Self::ExpiredStaking),
            "staking_stats_event" => Ok(Self::StakingStats),
            "btc_info_event" => Ok(Self::BtcInfo),
            other => Err(EventTypeError(other.to_string())),
        }
    }
}

/// A delegation became active on chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveStakingEvent {
    /// Staking transaction hash (hex), the delegation identity.
    pub staking_tx_hash_hex: String,
    /// Staker public key (hex).
    pub staker_pk_hex: String,
    /// Finality provider public key (hex).
    pub finality_provider_pk_hex: String,
    /// Staked amount in satoshis.
    pub staking_value: u64,
    /// BTC height the staking transaction confirmed at.
    pub staking_start_height: u64,
    /// Unix timestamp of the staking transaction's block.
    pub staking_start_timestamp: i64,
    /// Staking timelock in blocks.
    pub staking_timelock: u64,
    /// Index of the staking output in the transaction.
    pub staking_output_index: u64,
    /// Raw staking transaction (hex).
    pub staking_tx_hex: String,
    /// Whether the delegation exceeded the staking cap.
    pub is_overflow: bool,
    /// Taproot address derived upstream from the staker key.
    pub staker_taproot_address: String,
    /// Native segwit address for the odd-parity staker key variant.
    pub staker_native_segwit_odd_address: String,
    /// Native segwit address for the even-parity staker key variant.
    pub staker_native_segwit_even_address: String,
}

/// A staker broadcast an unbonding transaction for a delegation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnbondingStakingEvent {
    /// Staking transaction hash (hex) of the delegation being unbonded.
    pub staking_tx_hash_hex: String,
    /// Unbonding transaction hash (hex).
    pub unbonding_tx_hash_hex: String,
    /// Raw unbonding transaction (hex).
    pub unbonding_tx_hex: String,
    /// BTC height the unbonding transaction confirmed at.
    pub unbonding_start_height: u64,
    /// Unbonding timelock in blocks.
    pub unbonding_timelock: u64,
    /// Index of the unbonding output in the transaction.
    pub unbonding_output_index: u64,
    /// Unix timestamp of the unbonding transaction's block.
    pub unbonding_start_timestamp: i64,
}

/// A delegation's funds were withdrawn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawStakingEvent {
    /// Staking transaction hash (hex) of the withdrawn delegation.
    pub staking_tx_hash_hex: String,
}

/// A tracked timelock expired at the current BTC height.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpiredStakingEvent {
    /// Staking transaction hash (hex) of the affected delegation.
    pub staking_tx_hash_hex: String,
    /// Which transaction's timelock expired; decides the eligible prior
    /// state for the unbonded transition.
    pub tx_type: TxType,
}

/// A derived stats delta: "this amount must be (re)counted for this
/// state". Emitted by the lifecycle handlers, consumed by the stats
/// handler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsEvent {
    /// Staking transaction hash (hex); half the stats lock key.
    pub staking_tx_hash_hex: String,
    /// Staker public key (hex) whose aggregates this delta touches.
    pub staker_pk_hex: String,
    /// Finality provider public key (hex) whose aggregates this delta
    /// touches.
    pub finality_provider_pk_hex: String,
    /// Amount in satoshis to count or reverse.
    pub staking_value: u64,
    /// State the delegation reached; decides the delta direction and the
    /// other half of the lock key.
    pub state: DelegationState,
    /// Whether the delegation is excluded from the aggregates.
    pub is_overflow: bool,
}

impl StatsEvent {
    /// Stats event for a delegation reaching `state`.
    pub fn new(
        staking_tx_hash_hex: String,
        staker_pk_hex: String,
        finality_provider_pk_hex: String,
        staking_value: u64,
        state: DelegationState,
        is_overflow: bool,
    ) -> Self {
        Self {
            staking_tx_hash_hex,
            staker_pk_hex,
            finality_provider_pk_hex,
            staking_value,
            state,
            is_overflow,
        }
    }
}

/// New BTC network info observed by the indexer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BtcInfoEvent {
    /// Current BTC tip height.
    pub height: u64,
    /// Confirmed total value locked in satoshis.
    pub confirmed_tvl: u64,
    /// Unconfirmed total value locked in satoshis.
    pub unconfirmed_tvl: u64,
}
