//! Delegation lifecycle transitions and expiry scheduling.
//!
//! Each transition is a compare-and-swap with an explicit allow-list of
//! eligible prior states. A current state outside the allow-list means
//! the event is a stale duplicate: the transition reports `applied =
//! false` with no error, and the caller acknowledges the message.

use crate::error::ServiceError;
use crate::StakingService;
use staking_storage::delegation::UnbondingDetails;
use staking_storage::DelegationDocument;
use staking_types::{DelegationState, TxType};
use tracing::debug;

impl StakingService {
    /// Delegation by staking tx hash. Absence is reported as
    /// [`ServiceError::DelegationNotFound`], which callers treat as
    /// retryable.
    pub async fn get_delegation(
        &self,
        staking_tx_hash_hex: &str,
    ) -> Result<DelegationDocument, ServiceError> {
        self.store()
            .find_delegation_by_tx_hash(staking_tx_hash_hex)
            .await?
            .ok_or_else(|| ServiceError::DelegationNotFound(staking_tx_hash_hex.to_string()))
    }

    /// Create a delegation in state `Active`.
    ///
    /// A duplicate staking tx hash surfaces as
    /// [`ServiceError::DelegationAlreadyExists`]; the active handler
    /// absorbs it as an already-processed delivery.
    pub async fn save_active_staking_delegation(
        &self,
        delegation: DelegationDocument,
    ) -> Result<(), ServiceError> {
        let tx = delegation.staking_tx_hash_hex.clone();
        self.store()
            .save_active_staking_delegation(delegation)
            .await
            .map_err(|e| {
                if e.is_duplicate_key() {
                    ServiceError::DelegationAlreadyExists(tx.clone())
                } else {
                    ServiceError::from(e)
                }
            })
    }

    /// Transition to `Unbonding`, populating the unbonding transaction
    /// fields and scheduling the unbonding timelock-expiry check.
    ///
    /// The expiry check is written before the transition so a crash in
    /// between cannot lose it; the check is idempotent by its own key.
    pub async fn transition_to_unbonding_state(
        &self,
        staking_tx_hash_hex: &str,
        details: UnbondingDetails,
    ) -> Result<bool, ServiceError> {
        let expire_height = details
            .unbonding_start_height
            .saturating_add(details.unbonding_timelock);
        self.store()
            .save_timelock_expire_check(staking_tx_hash_hex, expire_height, TxType::Unbonding)
            .await?;

        let applied = self
            .store()
            .transition_to_unbonding_state(
                staking_tx_hash_hex,
                DelegationState::qualified_for_unbonding(),
                details,
            )
            .await
            .map_err(|e| self.map_transition_err(staking_tx_hash_hex, e))?;
        if !applied {
            debug!(
                staking_tx_hash_hex,
                "unbonding transition skipped, state not eligible"
            );
        }
        Ok(applied)
    }

    /// Transition to `Unbonded`. The eligible prior state depends on which
    /// transaction's timelock expired.
    pub async fn transition_to_unbonded_state(
        &self,
        staking_tx_hash_hex: &str,
        tx_type: TxType,
    ) -> Result<bool, ServiceError> {
        let applied = self
            .store()
            .transition_to_unbonded_state(
                staking_tx_hash_hex,
                DelegationState::qualified_for_unbonded(tx_type),
            )
            .await
            .map_err(|e| self.map_transition_err(staking_tx_hash_hex, e))?;
        if !applied {
            debug!(
                staking_tx_hash_hex,
                tx_type = %tx_type,
                "unbonded transition skipped, state not eligible"
            );
        }
        Ok(applied)
    }

    /// Transition to `Withdrawn`.
    pub async fn transition_to_withdrawn_state(
        &self,
        staking_tx_hash_hex: &str,
    ) -> Result<bool, ServiceError> {
        let applied = self
            .store()
            .transition_to_withdrawn_state(
                staking_tx_hash_hex,
                DelegationState::qualified_for_withdrawn(),
            )
            .await
            .map_err(|e| self.map_transition_err(staking_tx_hash_hex, e))?;
        if !applied {
            debug!(
                staking_tx_hash_hex,
                "withdrawn transition skipped, state not eligible"
            );
        }
        Ok(applied)
    }

    /// Schedule a timelock-expiry check for a staking or unbonding
    /// transaction. Idempotent upsert keyed by (tx, tx type).
    pub async fn process_expire_check(
        &self,
        staking_tx_hash_hex: &str,
        start_height: u64,
        timelock: u64,
        tx_type: TxType,
    ) -> Result<(), ServiceError> {
        let expire_height = start_height.saturating_add(timelock);
        self.store()
            .save_timelock_expire_check(staking_tx_hash_hex, expire_height, tx_type)
            .await?;
        Ok(())
    }

    fn map_transition_err(
        &self,
        staking_tx_hash_hex: &str,
        err: staking_storage::StorageError,
    ) -> ServiceError {
        if err.is_not_found() {
            ServiceError::DelegationNotFound(staking_tx_hash_hex.to_string())
        } else {
            ServiceError::from(err)
        }
    }
}
