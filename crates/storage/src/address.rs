//! Public-key-to-address mappings and address-based delegation filters.

use serde::{Deserialize, Serialize};
use staking_types::DelegationState;

/// Mapping from a staker public key to its BTC address encodings.
///
/// Identity is the staker public key. Append/lookup only: used to resolve
/// addresses back to public keys for existence checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PkAddressMapping {
    /// Staker BTC public key (hex).
    pub pk_hex: String,
    /// Taproot address.
    pub taproot: String,
    /// Native segwit address derived from the odd-parity key.
    pub native_segwit_odd: String,
    /// Native segwit address derived from the even-parity key.
    pub native_segwit_even: String,
}

/// Optional constraints on an address-based delegation existence check.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DelegationFilter {
    /// Only consider delegations that started after this Unix timestamp.
    pub after_timestamp: Option<i64>,
    /// Only consider delegations currently in one of these states.
    pub states: Option<Vec<DelegationState>>,
}

impl DelegationFilter {
    /// Whether a delegation with the given start timestamp and state
    /// passes this filter.
    pub fn matches(&self, start_timestamp: i64, state: DelegationState) -> bool {
        if let Some(after) = self.after_timestamp {
            if start_timestamp <= after {
                return false;
            }
        }
        if let Some(states) = &self.states {
            if !states.contains(&state) {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_filter_matches_everything() {
        let filter = DelegationFilter::default();
        assert!(filter.matches(0, DelegationState::Withdrawn));
    }

    #[test]
    fn test_timestamp_filter_is_strict() {
        let filter = DelegationFilter {
            after_timestamp: Some(100),
            states: None,
        };
        assert!(!filter.matches(100, DelegationState::Active));
        assert!(filter.matches(101, DelegationState::Active));
    }

    #[test]
    fn test_state_filter() {
        let filter = DelegationFilter {
            after_timestamp: None,
            states: Some(vec![DelegationState::Active, DelegationState::Unbonding]),
        };
        assert!(filter.matches(0, DelegationState::Unbonding));
        assert!(!filter.matches(0, DelegationState::Withdrawn));
    }
}
