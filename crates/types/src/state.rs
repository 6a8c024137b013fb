//! Delegation lifecycle state and transition eligibility tables.
//!
//! Transitions are one-directional: `Active → Unbonding → Unbonded →
//! Withdrawn`, with a direct `Active → Unbonded` path for timelock expiry
//! of the original staking transaction. Eligibility is expressed as
//! explicit per-event tables rather than scattered conditionals, so the
//! rules stay auditable in one place.

use crate::tx_type::TxType;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Lifecycle state of a delegation.
///
/// Overflow is a qualifier on the delegation document, orthogonal to this
/// state.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DelegationState {
    /// Staked and accruing.
    Active,
    /// Unbonding requested, waiting out the timelock.
    Unbonding,
    /// Timelock elapsed, funds spendable.
    Unbonded,
    /// Funds withdrawn on chain.
    Withdrawn,
}

/// Error parsing a delegation state from its string form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown delegation state: {0}")]
pub struct DelegationStateError(pub String);

impl DelegationState {
    /// Canonical string form, used for stats lock keys and wire payloads.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Unbonding => "unbonding",
            Self::Unbonded => "unbonded",
            Self::Withdrawn => "withdrawn",
        }
    }

    /// States from which a delegation may move to `Unbonding`.
    pub fn qualified_for_unbonding() -> &'static [DelegationState] {
        &[DelegationState::Active]
    }

    /// States from which a delegation may move to `Unbonded`, depending on
    /// which transaction's timelock expired.
    pub fn qualified_for_unbonded(tx_type: TxType) -> &'static [DelegationState] {
        match tx_type {
            TxType::Active => &[DelegationState::Active],
            TxType::Unbonding => &[DelegationState::Unbonding],
        }
    }

    /// States from which a delegation may move to `Withdrawn`.
    pub fn qualified_for_withdrawn() -> &'static [DelegationState] {
        &[DelegationState::Unbonded]
    }

    /// States that supersede an unbonding event. A delegation already in
    /// one of these has moved past unbonding; the event is an outdated
    /// duplicate and must be absorbed before any side effect is scheduled.
    pub fn outdated_for_unbonding() -> &'static [DelegationState] {
        &[DelegationState::Unbonded, DelegationState::Withdrawn]
    }

    /// States that supersede a withdrawal event.
    pub fn outdated_for_withdrawn() -> &'static [DelegationState] {
        &[DelegationState::Withdrawn]
    }

    /// States that supersede a timelock-expiry event.
    pub fn outdated_for_expired() -> &'static [DelegationState] {
        &[DelegationState::Unbonded, DelegationState::Withdrawn]
    }
}

impl fmt::Display for DelegationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DelegationState {
    type Err = DelegationStateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "unbonding" => Ok(Self::Unbonding),
            "unbonded" => Ok(Self::Unbonded),
            "withdrawn" => Ok(Self::Withdrawn),
            other => Err(DelegationStateError(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_round_trip() {
        for state in [
            DelegationState::Active,
            DelegationState::Unbonding,
            DelegationState::Unbonded,
            DelegationState::Withdrawn,
        ] {
            assert_eq!(state.as_str().parse::<DelegationState>(), Ok(state));
        }
    }

    #[test]
    fn test_unknown_state_rejected() {
        assert!("bonded".parse::<DelegationState>().is_err());
    }

    #[test]
    fn test_serde_uses_snake_case() {
        let json = serde_json::to_string(&DelegationState::Unbonding).expect("serialize");
        assert_eq!(json, "\"unbonding\"");
    }

    #[test]
    fn test_unbonded_eligibility_depends_on_tx_type() {
        assert_eq!(
            DelegationState::qualified_for_unbonded(TxType::Active),
            &[DelegationState::Active]
        );
        assert_eq!(
            DelegationState::qualified_for_unbonded(TxType::Unbonding),
            &[DelegationState::Unbonding]
        );
    }

    #[test]
    fn test_outdated_tables_exclude_current_target() {
        assert!(!DelegationState::outdated_for_unbonding().contains(&DelegationState::Unbonding));
        assert!(!DelegationState::outdated_for_withdrawn().contains(&DelegationState::Unbonded));
    }
}
