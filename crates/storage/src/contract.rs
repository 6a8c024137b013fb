//! The storage contract consumed by the event-processing core.
//!
//! [`DelegationStore`] is a capability trait over atomic document
//! primitives. Implementations must be thread-safe (`Send + Sync`);
//! handlers run across independent tasks with no shared memory and rely on
//! these primitives (conditional update, get-or-create, atomic increment)
//! instead of application-level locking.

use crate::address::{DelegationFilter, PkAddressMapping};
use crate::delegation::{DelegationDocument, UnbondingDetails};
use crate::error::Result;
use crate::info::BtcInfo;
use crate::pagination::Page;
use crate::stats::{
    FinalityProviderStatsDocument, OverallStatsDocument, StakerStatsDocument, StatsLockDocument,
    StatsLockField,
};
use crate::timelock::TimeLockDocument;
use crate::unprocessable::UnprocessableMessageDocument;
use async_trait::async_trait;
use staking_types::{DelegationState, TxType};

/// Storage contract for the staking ledger.
#[async_trait]
pub trait DelegationStore: Send + Sync {
    /// Health check against the backend.
    async fn ping(&self) -> Result<()>;

    // ============================================================
    // Delegations
    // ============================================================

    /// Create a new delegation document in state `Active`.
    ///
    /// # Returns
    /// * `Err(StorageError::DuplicateKey)` if a delegation with this
    ///   staking tx hash already exists
    async fn save_active_staking_delegation(&self, delegation: DelegationDocument) -> Result<()>;

    /// Find a delegation by its staking tx hash.
    ///
    /// # Returns
    /// * `Ok(Some(doc))` if found
    /// * `Ok(None)` if not found
    async fn find_delegation_by_tx_hash(
        &self,
        staking_tx_hash_hex: &str,
    ) -> Result<Option<DelegationDocument>>;

    /// Find delegations belonging to a staker, paginated.
    async fn find_delegations_by_staker_pk(
        &self,
        staker_pk_hex: &str,
        pagination_token: Option<&str>,
    ) -> Result<Page<DelegationDocument>>;

    /// Conditionally transition a delegation to `Unbonding`, populating the
    /// unbonding transaction fields.
    ///
    /// The update is a compare-and-swap: it only applies if the current
    /// state is in `eligible_prior_states`.
    ///
    /// # Returns
    /// * `Ok(true)` if the transition was applied
    /// * `Ok(false)` if the current state was not eligible (stale duplicate)
    /// * `Err(StorageError::NotFound)` if no such delegation exists
    async fn transition_to_unbonding_state(
        &self,
        staking_tx_hash_hex: &str,
        eligible_prior_states: &[DelegationState],
        details: UnbondingDetails,
    ) -> Result<bool>;

    /// Conditionally transition a delegation to `Unbonded`.
    ///
    /// Same compare-and-swap semantics as
    /// [`transition_to_unbonding_state`](Self::transition_to_unbonding_state).
    async fn transition_to_unbonded_state(
        &self,
        staking_tx_hash_hex: &str,
        eligible_prior_states: &[DelegationState],
    ) -> Result<bool>;

    /// Conditionally transition a delegation to `Withdrawn`.
    ///
    /// Same compare-and-swap semantics as
    /// [`transition_to_unbonding_state`](Self::transition_to_unbonding_state).
    async fn transition_to_withdrawn_state(
        &self,
        staking_tx_hash_hex: &str,
        eligible_prior_states: &[DelegationState],
    ) -> Result<bool>;

    /// Unordered, exhaustive paginated scan of all delegations.
    ///
    /// Every document that exists before the scan starts is returned
    /// exactly once across the pages; no guarantee is made about documents
    /// written concurrently with the scan.
    async fn scan_delegations_paginated(
        &self,
        pagination_token: Option<&str>,
    ) -> Result<Page<DelegationDocument>>;

    /// Check whether any delegation exists for a staker taproot address,
    /// optionally constrained by timestamp and state.
    async fn check_delegation_exist_by_staker_taproot_address(
        &self,
        address: &str,
        filter: Option<&DelegationFilter>,
    ) -> Result<bool>;

    // ============================================================
    // Timelock expiry checks
    // ============================================================

    /// Upsert a timelock-expiry check keyed by (staking tx, tx type).
    async fn save_timelock_expire_check(
        &self,
        staking_tx_hash_hex: &str,
        expire_height: u64,
        tx_type: TxType,
    ) -> Result<()>;

    /// Find expiry checks whose expire height is at or below `btc_height`.
    async fn find_expired_checks_by_height(&self, btc_height: u64)
        -> Result<Vec<TimeLockDocument>>;

    // ============================================================
    // Unprocessable messages
    // ============================================================

    /// Quarantine a message body under its delivery receipt.
    async fn save_unprocessable_message(&self, message_body: &str, receipt: &str) -> Result<()>;

    /// All quarantined messages, for manual inspection and replay.
    async fn find_unprocessable_messages(&self) -> Result<Vec<UnprocessableMessageDocument>>;

    /// Delete a quarantined message after successful reprocessing.
    ///
    /// # Returns
    /// * `Err(StorageError::NotFound)` if no message exists for the receipt
    async fn delete_unprocessable_message(&self, receipt: &str) -> Result<()>;

    // ============================================================
    // Stats locks and aggregate counters
    // ============================================================

    /// Get or create the stats lock for a (staking tx, state) pair.
    ///
    /// Returns the pre-existing document if one exists, otherwise creates a
    /// fresh lock with no counter group applied. The returned flags tell
    /// the caller which groups are outstanding.
    async fn get_or_create_stats_lock(
        &self,
        staking_tx_hash_hex: &str,
        state: &str,
    ) -> Result<StatsLockDocument>;

    /// Atomically set one counter-group flag on a stats lock.
    ///
    /// # Returns
    /// * `Ok(true)` if the flag was newly set by this call
    /// * `Ok(false)` if it was already set (the group was already applied)
    /// * `Err(StorageError::NotFound)` if the lock does not exist
    async fn set_stats_lock_field(
        &self,
        staking_tx_hash_hex: &str,
        state: &str,
        field: StatsLockField,
    ) -> Result<bool>;

    /// Increment the overall aggregates by `amount` and one delegation.
    async fn increment_overall_stats(&self, amount: u64) -> Result<()>;

    /// Subtract `amount` and one active delegation from the overall
    /// aggregates. Total counters are unaffected.
    async fn subtract_overall_stats(&self, amount: u64) -> Result<()>;

    /// Current overall aggregates.
    async fn get_overall_stats(&self) -> Result<OverallStatsDocument>;

    /// Increment a finality provider's aggregates.
    async fn increment_finality_provider_stats(&self, fp_pk_hex: &str, amount: u64) -> Result<()>;

    /// Subtract from a finality provider's active aggregates.
    async fn subtract_finality_provider_stats(&self, fp_pk_hex: &str, amount: u64) -> Result<()>;

    /// Finality provider stats ordered by active TVL, paginated.
    async fn find_finality_provider_stats(
        &self,
        pagination_token: Option<&str>,
    ) -> Result<Page<FinalityProviderStatsDocument>>;

    /// Batch lookup of finality provider stats by public key.
    ///
    /// Providers without a stats document are simply absent from the
    /// result.
    async fn find_finality_provider_stats_by_pks(
        &self,
        fp_pk_hex: &[String],
    ) -> Result<Vec<FinalityProviderStatsDocument>>;

    /// Increment a staker's aggregates.
    async fn increment_staker_stats(&self, staker_pk_hex: &str, amount: u64) -> Result<()>;

    /// Subtract from a staker's active aggregates.
    async fn subtract_staker_stats(&self, staker_pk_hex: &str, amount: u64) -> Result<()>;

    /// Stakers ordered by active TVL descending, paginated.
    async fn find_top_stakers_by_tvl(
        &self,
        pagination_token: Option<&str>,
    ) -> Result<Page<StakerStatsDocument>>;

    // ============================================================
    // BTC network info
    // ============================================================

    /// Last-write-wins upsert of the BTC info singleton.
    async fn upsert_latest_btc_info(
        &self,
        height: u64,
        confirmed_tvl: u64,
        unconfirmed_tvl: u64,
    ) -> Result<()>;

    /// Latest observed BTC info, if any has been recorded.
    async fn get_latest_btc_info(&self) -> Result<Option<BtcInfo>>;

    // ============================================================
    // PK address mappings
    // ============================================================

    /// Insert the address encodings for a staker public key. Inserting the
    /// same key again is a no-op.
    async fn insert_pk_address_mappings(&self, mapping: PkAddressMapping) -> Result<()>;

    /// Look up mappings by taproot address. Addresses without a mapping
    /// are absent from the result.
    async fn find_pk_mappings_by_taproot_address(
        &self,
        taproot_addresses: &[String],
    ) -> Result<Vec<PkAddressMapping>>;

    /// Look up mappings by either native segwit address variant. Addresses
    /// without a mapping are absent from the result.
    async fn find_pk_mappings_by_native_segwit_address(
        &self,
        native_segwit_addresses: &[String],
    ) -> Result<Vec<PkAddressMapping>>;
}
