//! Aggregate statistics documents and the per-delegation stats lock.

use serde::{Deserialize, Serialize};

/// Durable proof that a given amount was already reflected in aggregate
/// counters for a given (staking tx, state) pair.
///
/// Composite key = (staking tx hash, state name). The document's existence
/// is the lock; the per-group flags record which of the three counter
/// groups has been applied, so a retry after a partial failure only
/// re-applies the outstanding groups. Lock documents are never deleted;
/// they are the permanent audit trail of counting decisions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsLockDocument {
    /// Staking transaction hash (hex).
    pub staking_tx_hash_hex: String,
    /// State name the lock is keyed to.
    pub state: String,
    /// Overall aggregate counters applied.
    pub overall_stats: bool,
    /// Per-staker counters applied.
    pub staker_stats: bool,
    /// Per-finality-provider counters applied.
    pub finality_provider_stats: bool,
}

impl StatsLockDocument {
    /// Fresh lock with no counter group applied yet.
    pub fn new(staking_tx_hash_hex: &str, state: &str) -> Self {
        Self {
            staking_tx_hash_hex: staking_tx_hash_hex.to_string(),
            state: state.to_string(),
            overall_stats: false,
            staker_stats: false,
            finality_provider_stats: false,
        }
    }

    /// Whether every counter group has been applied under this lock.
    pub fn fully_applied(&self) -> bool {
        self.overall_stats && self.staker_stats && self.finality_provider_stats
    }
}

/// Which counter group a lock flag refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatsLockField {
    /// The overall (network-wide) aggregates.
    OverallStats,
    /// The per-staker aggregates.
    StakerStats,
    /// The per-finality-provider aggregates.
    FinalityProviderStats,
}

impl StatsLockField {
    /// Stored field name for this group.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OverallStats => "overall_stats",
            Self::StakerStats => "staker_stats",
            Self::FinalityProviderStats => "finality_provider_stats",
        }
    }
}

/// Singleton network-wide aggregates.
///
/// `active_*` counters move in both directions; `total_*` counters only
/// ever grow and survive unbonding.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverallStatsDocument {
    /// TVL currently staked, in satoshis.
    pub active_tvl: i64,
    /// Cumulative TVL ever staked, in satoshis.
    pub total_tvl: i64,
    /// Number of currently active delegations.
    pub active_delegations: i64,
    /// Cumulative number of delegations.
    pub total_delegations: i64,
}

/// Per-finality-provider aggregates, keyed by provider public key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalityProviderStatsDocument {
    /// Finality provider BTC public key (hex).
    pub finality_provider_pk_hex: String,
    /// TVL currently staked toward this provider, in satoshis.
    pub active_tvl: i64,
    /// Cumulative TVL ever staked toward this provider.
    pub total_tvl: i64,
    /// Number of currently active delegations toward this provider.
    pub active_delegations: i64,
    /// Cumulative number of delegations toward this provider.
    pub total_delegations: i64,
}

impl FinalityProviderStatsDocument {
    /// Zeroed stats for a provider.
    pub fn new(finality_provider_pk_hex: &str) -> Self {
        Self {
            finality_provider_pk_hex: finality_provider_pk_hex.to_string(),
            active_tvl: 0,
            total_tvl: 0,
            active_delegations: 0,
            total_delegations: 0,
        }
    }
}

/// Per-staker aggregates, keyed by staker public key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakerStatsDocument {
    /// Staker BTC public key (hex).
    pub staker_pk_hex: String,
    /// TVL currently staked by this staker, in satoshis.
    pub active_tvl: i64,
    /// Cumulative TVL ever staked by this staker.
    pub total_tvl: i64,
    /// Number of currently active delegations by this staker.
    pub active_delegations: i64,
    /// Cumulative number of delegations by this staker.
    pub total_delegations: i64,
}

impl StakerStatsDocument {
    /// Zeroed stats for a staker.
    pub fn new(staker_pk_hex: &str) -> Self {
        Self {
            staker_pk_hex: staker_pk_hex.to_string(),
            active_tvl: 0,
            total_tvl: 0,
            active_delegations: 0,
            total_delegations: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_lock_has_no_groups_applied() {
        let lock = StatsLockDocument::new("aa", "active");
        assert!(!lock.fully_applied());
        assert!(!lock.overall_stats);
        assert!(!lock.staker_stats);
        assert!(!lock.finality_provider_stats);
    }

    #[test]
    fn test_lock_field_names() {
        assert_eq!(StatsLockField::OverallStats.as_str(), "overall_stats");
        assert_eq!(StatsLockField::StakerStats.as_str(), "staker_stats");
        assert_eq!(
            StatsLockField::FinalityProviderStats.as_str(),
            "finality_provider_stats"
        );
    }
}
