//! Staking transaction kind for timelock-expiry tracking.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Which transaction's timelock an expiry check record refers to.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TxType {
    /// The original staking transaction.
    Active,
    /// The unbonding transaction.
    Unbonding,
}

/// Error parsing a transaction type from its string form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown staking tx type: {0}")]
pub struct TxTypeError(pub String);

impl TxType {
    /// Canonical string form used in stored expiry check records.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Unbonding => "unbonding",
        }
    }
}

impl fmt::Display for TxType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TxType {
    type Err = TxTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "unbonding" => Ok(Self::Unbonding),
            other => Err(TxTypeError(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tx_type_round_trip() {
        assert_eq!("active".parse::<TxType>(), Ok(TxType::Active));
        assert_eq!("unbonding".parse::<TxType>(), Ok(TxType::Unbonding));
        assert!("withdraw".parse::<TxType>().is_err());
    }
}
