//! Stats-consistency engine.
//!
//! The storage model offers no multi-document transactions across the
//! three aggregate groups, so idempotency is decoupled from atomicity: a
//! persisted per-(tx, state) lock is the durable proof that an economic
//! event was reflected. Each counter group flips its own flag on the lock
//! only after its counter update lands, so a failed update leaves the
//! flag unset and a retry with the same key re-applies exactly the
//! outstanding groups. The cost is at-least-once on a counter when the
//! flag write itself fails after the update: an accepted
//! eventual-consistency window, never a lost delta.

use crate::error::ServiceError;
use crate::StakingService;
use staking_metrics::stats::{
    BTC_INFO_UPSERTS, STATS_COUNTER_UPDATES, STATS_LOCKS_ACQUIRED, STATS_LOCKS_ALREADY_HELD,
};
use staking_storage::StatsLockField;
use staking_types::DelegationState;
use tracing::debug;

/// Whether a stats delta adds to or reverses the aggregates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatsDirection {
    /// Count the amount into the aggregates.
    Increment,
    /// Reverse a previously counted amount.
    Subtract,
}

impl StatsDirection {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Increment => "increment",
            Self::Subtract => "subtract",
        }
    }
}

impl StakingService {
    /// Apply one stats delta for a delegation, exactly-once-equivalent.
    ///
    /// The lock is keyed to `state`: increments are locked under the state
    /// that earned the amount, subtractions under the state that reverses
    /// it, so the two directions never share a key.
    pub async fn process_staking_stats(
        &self,
        staking_tx_hash_hex: &str,
        staker_pk_hex: &str,
        finality_provider_pk_hex: &str,
        amount: u64,
        state: DelegationState,
        direction: StatsDirection,
    ) -> Result<(), ServiceError> {
        let state_name = state.as_str();
        let lock = self
            .store()
            .get_or_create_stats_lock(staking_tx_hash_hex, state_name)
            .await?;
        if lock.fully_applied() {
            STATS_LOCKS_ALREADY_HELD.inc();
            debug!(
                staking_tx_hash_hex,
                state = state_name,
                "stats delta already applied, skipping"
            );
            return Ok(());
        }
        STATS_LOCKS_ACQUIRED.inc();

        // Each group: counter update first, flag second. The flag is the
        // durable "this group is done" record; it must never be set for a
        // counter that was not applied.
        if !lock.overall_stats {
            match direction {
                StatsDirection::Increment => self.store().increment_overall_stats(amount).await?,
                StatsDirection::Subtract => self.store().subtract_overall_stats(amount).await?,
            }
            STATS_COUNTER_UPDATES
                .with_label_values(&["overall", direction.as_str()])
                .inc();
            self.mark_group_applied(staking_tx_hash_hex, state_name, StatsLockField::OverallStats)
                .await?;
        }

        if !lock.finality_provider_stats {
            match direction {
                StatsDirection::Increment => {
                    self.store()
                        .increment_finality_provider_stats(finality_provider_pk_hex, amount)
                        .await?
                }
                StatsDirection::Subtract => {
                    self.store()
                        .subtract_finality_provider_stats(finality_provider_pk_hex, amount)
                        .await?
                }
            }
            STATS_COUNTER_UPDATES
                .with_label_values(&["finality_provider", direction.as_str()])
                .inc();
            self.mark_group_applied(
                staking_tx_hash_hex,
                state_name,
                StatsLockField::FinalityProviderStats,
            )
            .await?;
        }

        if !lock.staker_stats {
            match direction {
                StatsDirection::Increment => {
                    self.store()
                        .increment_staker_stats(staker_pk_hex, amount)
                        .await?
                }
                StatsDirection::Subtract => {
                    self.store()
                        .subtract_staker_stats(staker_pk_hex, amount)
                        .await?
                }
            }
            STATS_COUNTER_UPDATES
                .with_label_values(&["staker", direction.as_str()])
                .inc();
            self.mark_group_applied(staking_tx_hash_hex, state_name, StatsLockField::StakerStats)
                .await?;
        }

        Ok(())
    }

    async fn mark_group_applied(
        &self,
        staking_tx_hash_hex: &str,
        state_name: &str,
        field: StatsLockField,
    ) -> Result<(), ServiceError> {
        let newly_set = self
            .store()
            .set_stats_lock_field(staking_tx_hash_hex, state_name, field)
            .await?;
        if !newly_set {
            // A concurrent delivery of the same event flipped the flag
            // between our snapshot and ours landing; that delivery also
            // applied the counter, so this one was counted twice.
            debug!(
                staking_tx_hash_hex,
                state = state_name,
                field = field.as_str(),
                "stats group applied concurrently"
            );
        }
        Ok(())
    }

    /// Last-write-wins upsert of the BTC network info singleton.
    pub async fn process_btc_info_stats(
        &self,
        height: u64,
        confirmed_tvl: u64,
        unconfirmed_tvl: u64,
    ) -> Result<(), ServiceError> {
        self.store()
            .upsert_latest_btc_info(height, confirmed_tvl, unconfirmed_tvl)
            .await?;
        BTC_INFO_UPSERTS.inc();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use staking_storage::delegation::UnbondingDetails;
    use staking_storage::error::Result as StorageResult;
    use staking_storage::{
        BtcInfo, DelegationDocument, DelegationFilter, DelegationStore,
        FinalityProviderStatsDocument, InMemoryStore, OverallStatsDocument, Page,
        PkAddressMapping, StakerStatsDocument, StatsLockDocument, StorageError, TimeLockDocument,
        UnprocessableMessageDocument,
    };
    use staking_types::TxType;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    fn service() -> (StakingService, Arc<InMemoryStore>) {
        let store = Arc::new(InMemoryStore::new());
        (StakingService::new(store.clone()), store)
    }

    /// Delegating store that fails the next N overall-stats increments
    /// with a transient backend error.
    struct FlakyStore {
        inner: Arc<InMemoryStore>,
        fail_overall_increments: AtomicU32,
    }

    #[async_trait]
    impl DelegationStore for FlakyStore {
        async fn ping(&self) -> StorageResult<()> {
            self.inner.ping().await
        }

        async fn save_active_staking_delegation(
            &self,
            delegation: DelegationDocument,
        ) -> StorageResult<()> {
            self.inner.save_active_staking_delegation(delegation).await
        }

        async fn find_delegation_by_tx_hash(
            &self,
            staking_tx_hash_hex: &str,
        ) -> StorageResult<Option<DelegationDocument>> {
            self.inner.find_delegation_by_tx_hash(staking_tx_hash_hex).await
        }

        async fn find_delegations_by_staker_pk(
            &self,
            staker_pk_hex: &str,
            pagination_token: Option<&str>,
        ) -> StorageResult<Page<DelegationDocument>> {
            self.inner
                .find_delegations_by_staker_pk(staker_pk_hex, pagination_token)
                .await
        }

        async fn transition_to_unbonding_state(
            &self,
            staking_tx_hash_hex: &str,
            eligible_prior_states: &[DelegationState],
            details: UnbondingDetails,
        ) -> StorageResult<bool> {
            self.inner
                .transition_to_unbonding_state(staking_tx_hash_hex, eligible_prior_states, details)
                .await
        }

        async fn transition_to_unbonded_state(
            &self,
            staking_tx_hash_hex: &str,
            eligible_prior_states: &[DelegationState],
        ) -> StorageResult<bool> {
            self.inner
                .transition_to_unbonded_state(staking_tx_hash_hex, eligible_prior_states)
                .await
        }

        async fn transition_to_withdrawn_state(
            &self,
            staking_tx_hash_hex: &str,
            eligible_prior_states: &[DelegationState],
        ) -> StorageResult<bool> {
            self.inner
                .transition_to_withdrawn_state(staking_tx_hash_hex, eligible_prior_states)
                .await
        }

        async fn scan_delegations_paginated(
            &self,
            pagination_token: Option<&str>,
        ) -> StorageResult<Page<DelegationDocument>> {
            self.inner.scan_delegations_paginated(pagination_token).await
        }

        async fn check_delegation_exist_by_staker_taproot_address(
            &self,
            address: &str,
            filter: Option<&DelegationFilter>,
        ) -> StorageResult<bool> {
            self.inner
                .check_delegation_exist_by_staker_taproot_address(address, filter)
                .await
        }

        async fn save_timelock_expire_check(
            &self,
            staking_tx_hash_hex: &str,
            expire_height: u64,
            tx_type: TxType,
        ) -> StorageResult<()> {
            self.inner
                .save_timelock_expire_check(staking_tx_hash_hex, expire_height, tx_type)
                .await
        }

        async fn find_expired_checks_by_height(
            &self,
            btc_height: u64,
        ) -> StorageResult<Vec<TimeLockDocument>> {
            self.inner.find_expired_checks_by_height(btc_height).await
        }

        async fn save_unprocessable_message(
            &self,
            message_body: &str,
            receipt: &str,
        ) -> StorageResult<()> {
            self.inner.save_unprocessable_message(message_body, receipt).await
        }

        async fn find_unprocessable_messages(
            &self,
        ) -> StorageResult<Vec<UnprocessableMessageDocument>> {
            self.inner.find_unprocessable_messages().await
        }

        async fn delete_unprocessable_message(&self, receipt: &str) -> StorageResult<()> {
            self.inner.delete_unprocessable_message(receipt).await
        }

        async fn get_or_create_stats_lock(
            &self,
            staking_tx_hash_hex: &str,
            state: &str,
        ) -> StorageResult<StatsLockDocument> {
            self.inner.get_or_create_stats_lock(staking_tx_hash_hex, state).await
        }

        async fn set_stats_lock_field(
            &self,
            staking_tx_hash_hex: &str,
            state: &str,
            field: StatsLockField,
        ) -> StorageResult<bool> {
            self.inner
                .set_stats_lock_field(staking_tx_hash_hex, state, field)
                .await
        }

        async fn increment_overall_stats(&self, amount: u64) -> StorageResult<()> {
            if self
                .fail_overall_increments
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok()
            {
                return Err(StorageError::Backend("injected failure".to_string()));
            }
            self.inner.increment_overall_stats(amount).await
        }

        async fn subtract_overall_stats(&self, amount: u64) -> StorageResult<()> {
            self.inner.subtract_overall_stats(amount).await
        }

        async fn get_overall_stats(&self) -> StorageResult<OverallStatsDocument> {
            self.inner.get_overall_stats().await
        }

        async fn increment_finality_provider_stats(
            &self,
            fp_pk_hex: &str,
            amount: u64,
        ) -> StorageResult<()> {
            self.inner.increment_finality_provider_stats(fp_pk_hex, amount).await
        }

        async fn subtract_finality_provider_stats(
            &self,
            fp_pk_hex: &str,
            amount: u64,
        ) -> StorageResult<()> {
            self.inner.subtract_finality_provider_stats(fp_pk_hex, amount).await
        }

        async fn find_finality_provider_stats(
            &self,
            pagination_token: Option<&str>,
        ) -> StorageResult<Page<FinalityProviderStatsDocument>> {
            self.inner.find_finality_provider_stats(pagination_token).await
        }

        async fn find_finality_provider_stats_by_pks(
            &self,
            fp_pk_hex: &[String],
        ) -> StorageResult<Vec<FinalityProviderStatsDocument>> {
            self.inner.find_finality_provider_stats_by_pks(fp_pk_hex).await
        }

        async fn increment_staker_stats(
            &self,
            staker_pk_hex: &str,
            amount: u64,
        ) -> StorageResult<()> {
            self.inner.increment_staker_stats(staker_pk_hex, amount).await
        }

        async fn subtract_staker_stats(
            &self,
            staker_pk_hex: &str,
            amount: u64,
        ) -> StorageResult<()> {
            self.inner.subtract_staker_stats(staker_pk_hex, amount).await
        }

        async fn find_top_stakers_by_tvl(
            &self,
            pagination_token: Option<&str>,
        ) -> StorageResult<Page<StakerStatsDocument>> {
            self.inner.find_top_stakers_by_tvl(pagination_token).await
        }

        async fn upsert_latest_btc_info(
            &self,
            height: u64,
            confirmed_tvl: u64,
            unconfirmed_tvl: u64,
        ) -> StorageResult<()> {
            self.inner
                .upsert_latest_btc_info(height, confirmed_tvl, unconfirmed_tvl)
                .await
        }

        async fn get_latest_btc_info(&self) -> StorageResult<Option<BtcInfo>> {
            self.inner.get_latest_btc_info().await
        }

        async fn insert_pk_address_mappings(
            &self,
            mapping: PkAddressMapping,
        ) -> StorageResult<()> {
            self.inner.insert_pk_address_mappings(mapping).await
        }

        async fn find_pk_mappings_by_taproot_address(
            &self,
            taproot_addresses: &[String],
        ) -> StorageResult<Vec<PkAddressMapping>> {
            self.inner
                .find_pk_mappings_by_taproot_address(taproot_addresses)
                .await
        }

        async fn find_pk_mappings_by_native_segwit_address(
            &self,
            native_segwit_addresses: &[String],
        ) -> StorageResult<Vec<PkAddressMapping>> {
            self.inner
                .find_pk_mappings_by_native_segwit_address(native_segwit_addresses)
                .await
        }
    }

    #[tokio::test]
    async fn test_duplicate_delta_applies_once() {
        let (service, store) = service();
        for _ in 0..3 {
            service
                .process_staking_stats(
                    "aa",
                    "staker",
                    "fp",
                    10_000,
                    DelegationState::Active,
                    StatsDirection::Increment,
                )
                .await
                .expect("stats");
        }

        let overall = store.get_overall_stats().await.expect("get");
        assert_eq!(overall.active_tvl, 10_000);
        assert_eq!(overall.active_delegations, 1);

        let stakers = store.find_top_stakers_by_tvl(None).await.expect("find");
        assert_eq!(stakers.items.len(), 1);
        assert_eq!(stakers.items[0].active_tvl, 10_000);
    }

    #[tokio::test]
    async fn test_subtract_reverses_increment() {
        let (service, store) = service();
        service
            .process_staking_stats(
                "aa",
                "staker",
                "fp",
                10_000,
                DelegationState::Active,
                StatsDirection::Increment,
            )
            .await
            .expect("increment");
        // Reversal locks under the reversing state, an independent key, so
        // repeating it is as idempotent as the increment was.
        for _ in 0..2 {
            service
                .process_staking_stats(
                    "aa",
                    "staker",
                    "fp",
                    10_000,
                    DelegationState::Unbonded,
                    StatsDirection::Subtract,
                )
                .await
                .expect("subtract");
        }

        let overall = store.get_overall_stats().await.expect("get");
        assert_eq!(overall.active_tvl, 0);
        assert_eq!(overall.active_delegations, 0);
        assert_eq!(overall.total_tvl, 10_000);
        assert_eq!(overall.total_delegations, 1);
    }

    #[tokio::test]
    async fn test_partial_failure_retries_only_outstanding_groups() {
        let (service, store) = service();
        // Simulate a prior attempt that finished the overall group
        // (counter applied, then flag set) and died before the others.
        store
            .get_or_create_stats_lock("aa", "active")
            .await
            .expect("create lock");
        store.increment_overall_stats(10_000).await.expect("counter");
        store
            .set_stats_lock_field("aa", "active", StatsLockField::OverallStats)
            .await
            .expect("flag");

        service
            .process_staking_stats(
                "aa",
                "staker",
                "fp",
                10_000,
                DelegationState::Active,
                StatsDirection::Increment,
            )
            .await
            .expect("retry");

        // Overall was not re-applied; the other two groups were.
        let overall = store.get_overall_stats().await.expect("get");
        assert_eq!(overall.active_tvl, 10_000);
        assert_eq!(overall.active_delegations, 1);
        let stakers = store.find_top_stakers_by_tvl(None).await.expect("find");
        assert_eq!(stakers.items[0].active_tvl, 10_000);
        let fps = store
            .find_finality_provider_stats_by_pks(&["fp".to_string()])
            .await
            .expect("find");
        assert_eq!(fps[0].active_tvl, 10_000);
    }

    #[tokio::test]
    async fn test_transient_counter_failure_recovers_on_retry() {
        let inner = Arc::new(InMemoryStore::new());
        let store = Arc::new(FlakyStore {
            inner: inner.clone(),
            fail_overall_increments: AtomicU32::new(1),
        });
        let service = StakingService::new(store);

        // The injected failure surfaces; no flag may be left claiming the
        // lost counter was applied.
        let err = service
            .process_staking_stats(
                "aa",
                "staker",
                "fp",
                10_000,
                DelegationState::Active,
                StatsDirection::Increment,
            )
            .await
            .expect_err("injected failure");
        assert!(matches!(err, ServiceError::Storage(_)));
        let lock = inner
            .get_or_create_stats_lock("aa", "active")
            .await
            .expect("lock");
        assert!(!lock.overall_stats);

        service
            .process_staking_stats(
                "aa",
                "staker",
                "fp",
                10_000,
                DelegationState::Active,
                StatsDirection::Increment,
            )
            .await
            .expect("retry");

        let overall = inner.get_overall_stats().await.expect("get");
        assert_eq!(overall.active_tvl, 10_000);
        assert_eq!(overall.active_delegations, 1);
        let stakers = inner.find_top_stakers_by_tvl(None).await.expect("find");
        assert_eq!(stakers.items[0].active_tvl, 10_000);
        let fps = inner
            .find_finality_provider_stats_by_pks(&["fp".to_string()])
            .await
            .expect("find");
        assert_eq!(fps[0].active_tvl, 10_000);
    }

    #[tokio::test]
    async fn test_btc_info_is_last_write_wins() {
        let (service, store) = service();
        service
            .process_btc_info_stats(799_000, 1, 2)
            .await
            .expect("first");
        service
            .process_btc_info_stats(800_000, 500_000_000, 520_000_000)
            .await
            .expect("second");

        let info = store
            .get_latest_btc_info()
            .await
            .expect("get")
            .expect("present");
        assert_eq!(info.btc_height, 800_000);
        assert_eq!(info.confirmed_tvl, 500_000_000);
        assert_eq!(info.unconfirmed_tvl, 520_000_000);
    }
}
