//! Latest observed Bitcoin network info.

use serde::{Deserialize, Serialize};

/// Singleton document holding the latest observed chain state.
///
/// Updated with last-write-wins upsert semantics: a BTC-info event
/// overwrites all three values unconditionally.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BtcInfo {
    /// Latest observed BTC block height.
    pub btc_height: u64,
    /// TVL confirmed on chain, in satoshis.
    pub confirmed_tvl: u64,
    /// TVL including unconfirmed transactions, in satoshis.
    pub unconfirmed_tvl: u64,
}
