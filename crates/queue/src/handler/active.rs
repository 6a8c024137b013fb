//! Handler for new active delegations.

use staking_service::ServiceError;
use staking_storage::delegation::DelegationDocument;
use staking_storage::PkAddressMapping;
use staking_types::{DelegationState, TxType};
use tracing::debug;

use crate::error::{HandlerError, HandlerOutcome};
use crate::events::{ActiveStakingEvent, EventType, StatsEvent};
use crate::handler::QueueHandlers;

impl QueueHandlers {
    /// Record a newly active delegation.
    ///
    /// Side effects run before the delegation document is saved, so a
    /// crash mid-handler leaves the message retryable: the presence check
    /// only short-circuits once the final write landed, and every earlier
    /// step is idempotent on its own key.
    pub(crate) async fn handle_active_staking(
        &self,
        body: &str,
    ) -> Result<HandlerOutcome, HandlerError> {
        let event: ActiveStakingEvent = Self::decode(EventType::ActiveStaking, body)?;

        match self.service().get_delegation(&event.staking_tx_hash_hex).await {
            Ok(_) => {
                debug!(
                    staking_tx_hash_hex = %event.staking_tx_hash_hex,
                    "delegation already recorded, ignoring active event"
                );
                return Ok(HandlerOutcome::Ignored);
            }
            Err(ServiceError::DelegationNotFound(_)) => {}
            Err(e) => return Err(e.into()),
        }

        self.service()
            .process_expire_check(
                &event.staking_tx_hash_hex,
                event.staking_start_height,
                event.staking_timelock,
                TxType::Active,
            )
            .await?;

        self.service()
            .register_pk_address_mappings(PkAddressMapping {
                pk_hex: event.staker_pk_hex.clone(),
                taproot: event.staker_taproot_address.clone(),
                native_segwit_odd: event.staker_native_segwit_odd_address.clone(),
                native_segwit_even: event.staker_native_segwit_even_address.clone(),
            })
            .await?;

        self.emitter()
            .emit_stats_event(StatsEvent::new(
                event.staking_tx_hash_hex.clone(),
                event.staker_pk_hex.clone(),
                event.finality_provider_pk_hex.clone(),
                event.staking_value,
                DelegationState::Active,
                event.is_overflow,
            ))
            .await?;

        let save = self
            .service()
            .save_active_staking_delegation(DelegationDocument {
                staking_tx_hash_hex: event.staking_tx_hash_hex,
                staker_pk_hex: event.staker_pk_hex,
                finality_provider_pk_hex: event.finality_provider_pk_hex,
                staking_tx_hex: event.staking_tx_hex,
                staking_value: event.staking_value,
                staking_start_height: event.staking_start_height,
                staking_timelock: event.staking_timelock,
                staking_output_index: event.staking_output_index,
                staking_start_timestamp: event.staking_start_timestamp,
                is_overflow: event.is_overflow,
                staker_taproot_address: event.staker_taproot_address,
                state: DelegationState::Active,
                unbonding: None,
            })
            .await;
        match save {
            Ok(()) => Ok(HandlerOutcome::Processed),
            // A concurrent delivery won the race; its side effects cover ours.
            Err(ServiceError::DelegationAlreadyExists(_)) => Ok(HandlerOutcome::Ignored),
            Err(e) => Err(e.into()),
        }
    }
}
