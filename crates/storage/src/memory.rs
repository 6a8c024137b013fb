//! In-memory implementation of the storage contract.
//!
//! This implementation is primarily for testing and development. It stores
//! all documents in memory behind `parking_lot::RwLock`s.
//!
//! # Concurrency Safety
//!
//! 1. **Single-Lock Principle**: documents that must be updated together
//!    (the stats locks and the three counter groups) live under one lock.
//! 2. **Minimal Lock Duration**: no lock is held across an await point;
//!    data is cloned out before returning.
//! 3. CAS transitions and get-or-create locks are atomic within their
//!    lock, matching the contract's conditional-write semantics.

use crate::address::{DelegationFilter, PkAddressMapping};
use crate::contract::DelegationStore;
use crate::delegation::{DelegationDocument, UnbondingDetails};
use crate::error::{Result, StorageError};
use crate::info::BtcInfo;
use crate::pagination::{decode_token, encode_token, Page};
use crate::stats::{
    FinalityProviderStatsDocument, OverallStatsDocument, StakerStatsDocument, StatsLockDocument,
    StatsLockField,
};
use crate::timelock::TimeLockDocument;
use crate::unprocessable::UnprocessableMessageDocument;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};
use std::ops::Bound;
use staking_types::{DelegationState, TxType};

/// Default number of documents per page.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Stats-related state bundled under a single lock.
///
/// The lock documents and the counter groups they guard are grouped so a
/// flag test-and-set and the matching counter update never race with each
/// other inside this adapter.
#[derive(Default)]
struct StatsState {
    /// Stats locks keyed by (staking tx hash, state name).
    locks: HashMap<(String, String), StatsLockDocument>,
    overall: OverallStatsDocument,
    finality_providers: HashMap<String, FinalityProviderStatsDocument>,
    stakers: HashMap<String, StakerStatsDocument>,
}

/// In-memory store for testing and local runs.
pub struct InMemoryStore {
    page_size: usize,
    /// Delegations keyed by staking tx hash; BTreeMap gives the scan a
    /// stable order so tokens stay valid across concurrent inserts.
    delegations: RwLock<BTreeMap<String, DelegationDocument>>,
    stats: RwLock<StatsState>,
    timelocks: RwLock<HashMap<(String, TxType), TimeLockDocument>>,
    unprocessable: RwLock<BTreeMap<String, UnprocessableMessageDocument>>,
    btc_info: RwLock<Option<BtcInfo>>,
    pk_mappings: RwLock<HashMap<String, PkAddressMapping>>,
}

impl InMemoryStore {
    /// New store with the default page size.
    pub fn new() -> Self {
        Self::with_page_size(DEFAULT_PAGE_SIZE)
    }

    /// New store with a custom page size for paginated queries.
    pub fn with_page_size(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            delegations: RwLock::new(BTreeMap::new()),
            stats: RwLock::new(StatsState::default()),
            timelocks: RwLock::new(HashMap::new()),
            unprocessable: RwLock::new(BTreeMap::new()),
            btc_info: RwLock::new(None),
            pk_mappings: RwLock::new(HashMap::new()),
        }
    }

    /// Number of stored delegations.
    pub fn delegation_count(&self) -> usize {
        self.delegations.read().len()
    }

    /// Page out of an ordered iterator of (cursor, item) pairs, where
    /// `cursor` is the resume point encoded into the next token.
    fn paginate<T>(&self, entries: impl Iterator<Item = (String, T)>) -> Page<T> {
        let mut items = Vec::with_capacity(self.page_size);
        let mut last_cursor = None;
        let mut has_more = false;
        for (cursor, item) in entries {
            if items.len() == self.page_size {
                has_more = true;
                break;
            }
            items.push(item);
            last_cursor = Some(cursor);
        }
        let next_token = match (has_more, last_cursor) {
            (true, Some(cursor)) => Some(encode_token(&cursor)),
            _ => None,
        };
        Page { items, next_token }
    }

    fn transition(
        &self,
        staking_tx_hash_hex: &str,
        eligible_prior_states: &[DelegationState],
        target: DelegationState,
        details: Option<UnbondingDetails>,
    ) -> Result<bool> {
        let mut delegations = self.delegations.write();
        let doc = delegations
            .get_mut(staking_tx_hash_hex)
            .ok_or_else(|| StorageError::NotFound(format!("delegation {staking_tx_hash_hex}")))?;
        if !eligible_prior_states.contains(&doc.state) {
            return Ok(false);
        }
        doc.state = target;
        if let Some(details) = details {
            doc.unbonding = Some(details);
        }
        Ok(true)
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DelegationStore for InMemoryStore {
    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    async fn save_active_staking_delegation(&self, delegation: DelegationDocument) -> Result<()> {
        let mut delegations = self.delegations.write();
        if delegations.contains_key(&delegation.staking_tx_hash_hex) {
            return Err(StorageError::DuplicateKey(format!(
                "delegation {}",
                delegation.staking_tx_hash_hex
            )));
        }
        delegations.insert(delegation.staking_tx_hash_hex.clone(), delegation);
        Ok(())
    }

    async fn find_delegation_by_tx_hash(
        &self,
        staking_tx_hash_hex: &str,
    ) -> Result<Option<DelegationDocument>> {
        Ok(self.delegations.read().get(staking_tx_hash_hex).cloned())
    }

    async fn find_delegations_by_staker_pk(
        &self,
        staker_pk_hex: &str,
        pagination_token: Option<&str>,
    ) -> Result<Page<DelegationDocument>> {
        let after = pagination_token.map(decode_token).transpose()?;
        let delegations = self.delegations.read();
        let range = match &after {
            Some(last) => delegations.range::<String, _>((Bound::Excluded(last.clone()), Bound::Unbounded)),
            None => delegations.range::<String, _>(..),
        };
        Ok(self.paginate(
            range
                .filter(|(_, doc)| doc.staker_pk_hex == staker_pk_hex)
                .map(|(hash, doc)| (hash.clone(), doc.clone())),
        ))
    }

    async fn transition_to_unbonding_state(
        &self,
        staking_tx_hash_hex: &str,
        eligible_prior_states: &[DelegationState],
        details: UnbondingDetails,
    ) -> Result<bool> {
        self.transition(
            staking_tx_hash_hex,
            eligible_prior_states,
            DelegationState::Unbonding,
            Some(details),
        )
    }

    async fn transition_to_unbonded_state(
        &self,
        staking_tx_hash_hex: &str,
        eligible_prior_states: &[DelegationState],
    ) -> Result<bool> {
        self.transition(
            staking_tx_hash_hex,
            eligible_prior_states,
            DelegationState::Unbonded,
            None,
        )
    }

    async fn transition_to_withdrawn_state(
        &self,
        staking_tx_hash_hex: &str,
        eligible_prior_states: &[DelegationState],
    ) -> Result<bool> {
        self.transition(
            staking_tx_hash_hex,
            eligible_prior_states,
            DelegationState::Withdrawn,
            None,
        )
    }

    async fn scan_delegations_paginated(
        &self,
        pagination_token: Option<&str>,
    ) -> Result<Page<DelegationDocument>> {
        let after = pagination_token.map(decode_token).transpose()?;
        let delegations = self.delegations.read();
        let range = match &after {
            Some(last) => delegations.range::<String, _>((Bound::Excluded(last.clone()), Bound::Unbounded)),
            None => delegations.range::<String, _>(..),
        };
        Ok(self.paginate(range.map(|(hash, doc)| (hash.clone(), doc.clone()))))
    }

    async fn check_delegation_exist_by_staker_taproot_address(
        &self,
        address: &str,
        filter: Option<&DelegationFilter>,
    ) -> Result<bool> {
        let delegations = self.delegations.read();
        Ok(delegations.values().any(|doc| {
            doc.staker_taproot_address == address
                && filter
                    .map(|f| f.matches(doc.staking_start_timestamp, doc.state))
                    .unwrap_or(true)
        }))
    }

    async fn save_timelock_expire_check(
        &self,
        staking_tx_hash_hex: &str,
        expire_height: u64,
        tx_type: TxType,
    ) -> Result<()> {
        let mut timelocks = self.timelocks.write();
        timelocks.insert(
            (staking_tx_hash_hex.to_string(), tx_type),
            TimeLockDocument {
                staking_tx_hash_hex: staking_tx_hash_hex.to_string(),
                expire_height,
                tx_type,
            },
        );
        Ok(())
    }

    async fn find_expired_checks_by_height(
        &self,
        btc_height: u64,
    ) -> Result<Vec<TimeLockDocument>> {
        let timelocks = self.timelocks.read();
        let mut expired: Vec<TimeLockDocument> = timelocks
            .values()
            .filter(|doc| doc.expire_height <= btc_height)
            .cloned()
            .collect();
        expired.sort_by_key(|doc| (doc.expire_height, doc.staking_tx_hash_hex.clone()));
        Ok(expired)
    }

    async fn save_unprocessable_message(&self, message_body: &str, receipt: &str) -> Result<()> {
        let mut unprocessable = self.unprocessable.write();
        unprocessable.insert(
            receipt.to_string(),
            UnprocessableMessageDocument {
                receipt: receipt.to_string(),
                message_body: message_body.to_string(),
            },
        );
        Ok(())
    }

    async fn find_unprocessable_messages(&self) -> Result<Vec<UnprocessableMessageDocument>> {
        Ok(self.unprocessable.read().values().cloned().collect())
    }

    async fn delete_unprocessable_message(&self, receipt: &str) -> Result<()> {
        let mut unprocessable = self.unprocessable.write();
        unprocessable
            .remove(receipt)
            .map(|_| ())
            .ok_or_else(|| StorageError::NotFound(format!("unprocessable message {receipt}")))
    }

    async fn get_or_create_stats_lock(
        &self,
        staking_tx_hash_hex: &str,
        state: &str,
    ) -> Result<StatsLockDocument> {
        let mut stats = self.stats.write();
        let key = (staking_tx_hash_hex.to_string(), state.to_string());
        Ok(stats
            .locks
            .entry(key)
            .or_insert_with(|| StatsLockDocument::new(staking_tx_hash_hex, state))
            .clone())
    }

    async fn set_stats_lock_field(
        &self,
        staking_tx_hash_hex: &str,
        state: &str,
        field: StatsLockField,
    ) -> Result<bool> {
        let mut stats = self.stats.write();
        let key = (staking_tx_hash_hex.to_string(), state.to_string());
        let lock = stats.locks.get_mut(&key).ok_or_else(|| {
            StorageError::NotFound(format!("stats lock {staking_tx_hash_hex}:{state}"))
        })?;
        let flag = match field {
            StatsLockField::OverallStats => &mut lock.overall_stats,
            StatsLockField::StakerStats => &mut lock.staker_stats,
            StatsLockField::FinalityProviderStats => &mut lock.finality_provider_stats,
        };
        if *flag {
            return Ok(false);
        }
        *flag = true;
        Ok(true)
    }

    async fn increment_overall_stats(&self, amount: u64) -> Result<()> {
        let mut stats = self.stats.write();
        stats.overall.active_tvl += amount as i64;
        stats.overall.total_tvl += amount as i64;
        stats.overall.active_delegations += 1;
        stats.overall.total_delegations += 1;
        Ok(())
    }

    async fn subtract_overall_stats(&self, amount: u64) -> Result<()> {
        let mut stats = self.stats.write();
        stats.overall.active_tvl -= amount as i64;
        stats.overall.active_delegations -= 1;
        Ok(())
    }

    async fn get_overall_stats(&self) -> Result<OverallStatsDocument> {
        Ok(self.stats.read().overall.clone())
    }

    async fn increment_finality_provider_stats(&self, fp_pk_hex: &str, amount: u64) -> Result<()> {
        let mut stats = self.stats.write();
        let doc = stats
            .finality_providers
            .entry(fp_pk_hex.to_string())
            .or_insert_with(|| FinalityProviderStatsDocument::new(fp_pk_hex));
        doc.active_tvl += amount as i64;
        doc.total_tvl += amount as i64;
        doc.active_delegations += 1;
        doc.total_delegations += 1;
        Ok(())
    }

    async fn subtract_finality_provider_stats(&self, fp_pk_hex: &str, amount: u64) -> Result<()> {
        let mut stats = self.stats.write();
        let doc = stats
            .finality_providers
            .entry(fp_pk_hex.to_string())
            .or_insert_with(|| FinalityProviderStatsDocument::new(fp_pk_hex));
        doc.active_tvl -= amount as i64;
        doc.active_delegations -= 1;
        Ok(())
    }

    async fn find_finality_provider_stats(
        &self,
        pagination_token: Option<&str>,
    ) -> Result<Page<FinalityProviderStatsDocument>> {
        let after = pagination_token.map(decode_token).transpose()?;
        let stats = self.stats.read();
        let mut docs: Vec<FinalityProviderStatsDocument> =
            stats.finality_providers.values().cloned().collect();
        docs.sort_by(|a, b| {
            b.active_tvl
                .cmp(&a.active_tvl)
                .then_with(|| a.finality_provider_pk_hex.cmp(&b.finality_provider_pk_hex))
        });
        paginate_by_tvl(
            self,
            docs,
            after,
            |d| (d.active_tvl, d.finality_provider_pk_hex.clone()),
        )
    }

    async fn find_finality_provider_stats_by_pks(
        &self,
        fp_pk_hex: &[String],
    ) -> Result<Vec<FinalityProviderStatsDocument>> {
        let stats = self.stats.read();
        Ok(fp_pk_hex
            .iter()
            .filter_map(|pk| stats.finality_providers.get(pk).cloned())
            .collect())
    }

    async fn increment_staker_stats(&self, staker_pk_hex: &str, amount: u64) -> Result<()> {
        let mut stats = self.stats.write();
        let doc = stats
            .stakers
            .entry(staker_pk_hex.to_string())
            .or_insert_with(|| StakerStatsDocument::new(staker_pk_hex));
        doc.active_tvl += amount as i64;
        doc.total_tvl += amount as i64;
        doc.active_delegations += 1;
        doc.total_delegations += 1;
        Ok(())
    }

    async fn subtract_staker_stats(&self, staker_pk_hex: &str, amount: u64) -> Result<()> {
        let mut stats = self.stats.write();
        let doc = stats
            .stakers
            .entry(staker_pk_hex.to_string())
            .or_insert_with(|| StakerStatsDocument::new(staker_pk_hex));
        doc.active_tvl -= amount as i64;
        doc.active_delegations -= 1;
        Ok(())
    }

    async fn find_top_stakers_by_tvl(
        &self,
        pagination_token: Option<&str>,
    ) -> Result<Page<StakerStatsDocument>> {
        let after = pagination_token.map(decode_token).transpose()?;
        let stats = self.stats.read();
        let mut docs: Vec<StakerStatsDocument> = stats.stakers.values().cloned().collect();
        docs.sort_by(|a, b| {
            b.active_tvl
                .cmp(&a.active_tvl)
                .then_with(|| a.staker_pk_hex.cmp(&b.staker_pk_hex))
        });
        paginate_by_tvl(self, docs, after, |d| (d.active_tvl, d.staker_pk_hex.clone()))
    }

    async fn upsert_latest_btc_info(
        &self,
        height: u64,
        confirmed_tvl: u64,
        unconfirmed_tvl: u64,
    ) -> Result<()> {
        let mut info = self.btc_info.write();
        *info = Some(BtcInfo {
            btc_height: height,
            confirmed_tvl,
            unconfirmed_tvl,
        });
        Ok(())
    }

    async fn get_latest_btc_info(&self) -> Result<Option<BtcInfo>> {
        Ok(self.btc_info.read().clone())
    }

    async fn insert_pk_address_mappings(&self, mapping: PkAddressMapping) -> Result<()> {
        let mut mappings = self.pk_mappings.write();
        mappings.entry(mapping.pk_hex.clone()).or_insert(mapping);
        Ok(())
    }

    async fn find_pk_mappings_by_taproot_address(
        &self,
        taproot_addresses: &[String],
    ) -> Result<Vec<PkAddressMapping>> {
        let mappings = self.pk_mappings.read();
        Ok(mappings
            .values()
            .filter(|m| taproot_addresses.contains(&m.taproot))
            .cloned()
            .collect())
    }

    async fn find_pk_mappings_by_native_segwit_address(
        &self,
        native_segwit_addresses: &[String],
    ) -> Result<Vec<PkAddressMapping>> {
        let mappings = self.pk_mappings.read();
        Ok(mappings
            .values()
            .filter(|m| {
                native_segwit_addresses.contains(&m.native_segwit_odd)
                    || native_segwit_addresses.contains(&m.native_segwit_even)
            })
            .cloned()
            .collect())
    }
}

/// Paginate a TVL-descending sorted vec. The cursor is `"{tvl}:{pk}"` of
/// the last returned document; resumption skips everything that sorts at
/// or before it.
fn paginate_by_tvl<T>(
    store: &InMemoryStore,
    docs: Vec<T>,
    after: Option<String>,
    key: impl Fn(&T) -> (i64, String),
) -> Result<Page<T>> {
    let resume = match after {
        Some(cursor) => {
            let (tvl, pk) = cursor.split_once(':').ok_or_else(|| {
                StorageError::InvalidPaginationToken(format!("malformed cursor: {cursor}"))
            })?;
            let tvl: i64 = tvl.parse().map_err(|_| {
                StorageError::InvalidPaginationToken(format!("malformed cursor: {cursor}"))
            })?;
            Some((tvl, pk.to_string()))
        }
        None => None,
    };
    let entries = docs
        .into_iter()
        .map(|doc| {
            let (tvl, pk) = key(&doc);
            (format!("{tvl}:{pk}"), (tvl, pk, doc))
        })
        .filter(|(_, (tvl, pk, _))| match &resume {
            // Descending TVL order: strictly after the cursor means a lower
            // TVL, or the same TVL with a greater key.
            Some((r_tvl, r_pk)) => *tvl < *r_tvl || (*tvl == *r_tvl && pk > r_pk),
            None => true,
        })
        .map(|(cursor, (_, _, doc))| (cursor, doc));
    Ok(store.paginate(entries))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn delegation(tx: &str, staker: &str) -> DelegationDocument {
        DelegationDocument {
            staking_tx_hash_hex: tx.to_string(),
            staker_pk_hex: staker.to_string(),
            finality_provider_pk_hex: "fp01".to_string(),
            staking_tx_hex: "00".to_string(),
            staking_value: 50_000,
            staking_start_height: 800_000,
            staking_timelock: 150,
            staking_output_index: 0,
            staking_start_timestamp: 1_700_000_000,
            is_overflow: false,
            staker_taproot_address: format!("bc1p{staker}"),
            state: DelegationState::Active,
            unbonding: None,
        }
    }

    #[tokio::test]
    async fn test_duplicate_delegation_rejected() {
        let store = InMemoryStore::new();
        store
            .save_active_staking_delegation(delegation("aa", "s1"))
            .await
            .expect("first save");
        let err = store
            .save_active_staking_delegation(delegation("aa", "s1"))
            .await
            .expect_err("duplicate");
        assert!(err.is_duplicate_key());
    }

    #[tokio::test]
    async fn test_transition_requires_eligible_prior_state() {
        let store = InMemoryStore::new();
        store
            .save_active_staking_delegation(delegation("aa", "s1"))
            .await
            .expect("save");

        // Withdrawn requires Unbonded; the delegation is Active.
        let applied = store
            .transition_to_withdrawn_state("aa", DelegationState::qualified_for_withdrawn())
            .await
            .expect("cas");
        assert!(!applied);
        let doc = store
            .find_delegation_by_tx_hash("aa")
            .await
            .expect("find")
            .expect("present");
        assert_eq!(doc.state, DelegationState::Active);
    }

    #[tokio::test]
    async fn test_transition_missing_delegation_is_not_found() {
        let store = InMemoryStore::new();
        let err = store
            .transition_to_unbonded_state("missing", &[DelegationState::Active])
            .await
            .expect_err("not found");
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_unbonding_transition_populates_details() {
        let store = InMemoryStore::new();
        store
            .save_active_staking_delegation(delegation("aa", "s1"))
            .await
            .expect("save");
        let details = UnbondingDetails {
            unbonding_tx_hex: "beef".to_string(),
            unbonding_start_height: 800_100,
            unbonding_timelock: 100,
            unbonding_output_index: 1,
            unbonding_start_timestamp: 1_700_000_500,
        };
        let applied = store
            .transition_to_unbonding_state(
                "aa",
                DelegationState::qualified_for_unbonding(),
                details.clone(),
            )
            .await
            .expect("cas");
        assert!(applied);
        let doc = store
            .find_delegation_by_tx_hash("aa")
            .await
            .expect("find")
            .expect("present");
        assert_eq!(doc.state, DelegationState::Unbonding);
        assert_eq!(doc.unbonding, Some(details));
    }

    #[tokio::test]
    async fn test_stats_lock_get_or_create_is_idempotent() {
        let store = InMemoryStore::new();
        let first = store
            .get_or_create_stats_lock("aa", "active")
            .await
            .expect("create");
        assert!(!first.fully_applied());

        let newly = store
            .set_stats_lock_field("aa", "active", StatsLockField::OverallStats)
            .await
            .expect("set");
        assert!(newly);

        let second = store
            .get_or_create_stats_lock("aa", "active")
            .await
            .expect("get");
        assert!(second.overall_stats);

        let again = store
            .set_stats_lock_field("aa", "active", StatsLockField::OverallStats)
            .await
            .expect("set again");
        assert!(!again);
    }

    #[tokio::test]
    async fn test_overall_stats_increment_and_subtract() {
        let store = InMemoryStore::new();
        store.increment_overall_stats(1_000).await.expect("inc");
        store.increment_overall_stats(500).await.expect("inc");
        store.subtract_overall_stats(1_000).await.expect("sub");

        let overall = store.get_overall_stats().await.expect("get");
        assert_eq!(overall.active_tvl, 500);
        assert_eq!(overall.total_tvl, 1_500);
        assert_eq!(overall.active_delegations, 1);
        assert_eq!(overall.total_delegations, 2);
    }

    #[tokio::test]
    async fn test_btc_info_upsert_overwrites() {
        let store = InMemoryStore::new();
        assert!(store.get_latest_btc_info().await.expect("get").is_none());

        store
            .upsert_latest_btc_info(799_999, 400_000_000, 410_000_000)
            .await
            .expect("first upsert");
        store
            .upsert_latest_btc_info(800_000, 500_000_000, 520_000_000)
            .await
            .expect("second upsert");

        let info = store
            .get_latest_btc_info()
            .await
            .expect("get")
            .expect("present");
        assert_eq!(info.btc_height, 800_000);
        assert_eq!(info.confirmed_tvl, 500_000_000);
        assert_eq!(info.unconfirmed_tvl, 520_000_000);
    }

    #[tokio::test]
    async fn test_timelock_check_upsert_is_idempotent() {
        let store = InMemoryStore::new();
        store
            .save_timelock_expire_check("aa", 800_150, TxType::Unbonding)
            .await
            .expect("save");
        store
            .save_timelock_expire_check("aa", 800_150, TxType::Unbonding)
            .await
            .expect("save again");

        let expired = store
            .find_expired_checks_by_height(800_150)
            .await
            .expect("find");
        assert_eq!(expired.len(), 1);
        assert!(store
            .find_expired_checks_by_height(800_149)
            .await
            .expect("find")
            .is_empty());
    }

    #[tokio::test]
    async fn test_taproot_existence_check_with_filter() {
        let store = InMemoryStore::new();
        store
            .save_active_staking_delegation(delegation("aa", "s1"))
            .await
            .expect("save");

        assert!(store
            .check_delegation_exist_by_staker_taproot_address("bc1ps1", None)
            .await
            .expect("check"));
        let filter = DelegationFilter {
            after_timestamp: None,
            states: Some(vec![DelegationState::Withdrawn]),
        };
        assert!(!store
            .check_delegation_exist_by_staker_taproot_address("bc1ps1", Some(&filter))
            .await
            .expect("check"));
    }

    #[tokio::test]
    async fn test_pk_mapping_insert_and_lookup() {
        let store = InMemoryStore::new();
        let mapping = PkAddressMapping {
            pk_hex: "pk1".to_string(),
            taproot: "bc1p-tap".to_string(),
            native_segwit_odd: "bc1q-odd".to_string(),
            native_segwit_even: "bc1q-even".to_string(),
        };
        store
            .insert_pk_address_mappings(mapping.clone())
            .await
            .expect("insert");
        // Re-insert is a no-op.
        store
            .insert_pk_address_mappings(mapping.clone())
            .await
            .expect("re-insert");

        let by_taproot = store
            .find_pk_mappings_by_taproot_address(&["bc1p-tap".to_string(), "unknown".to_string()])
            .await
            .expect("find");
        assert_eq!(by_taproot, vec![mapping.clone()]);

        let by_segwit = store
            .find_pk_mappings_by_native_segwit_address(&["bc1q-even".to_string()])
            .await
            .expect("find");
        assert_eq!(by_segwit, vec![mapping]);
    }
}
