//! Timelock-expiry check records.

use serde::{Deserialize, Serialize};
use staking_types::TxType;

/// A scheduled timelock-expiry check.
///
/// Written as a separate record keyed by (staking tx, tx type) rather than
/// as a field on the delegation, so expiry scanning can be done by height
/// range independent of delegation lookups. The upsert key makes the write
/// idempotent under redelivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeLockDocument {
    /// Staking transaction hash (hex).
    pub staking_tx_hash_hex: String,
    /// BTC height at which the timelock expires.
    pub expire_height: u64,
    /// Which transaction's timelock this check tracks.
    pub tx_type: TxType,
}
