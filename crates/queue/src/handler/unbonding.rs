//! Handler for staker-initiated unbonding.

use staking_storage::delegation::UnbondingDetails;
use staking_types::DelegationState;
use tracing::debug;

use crate::error::{HandlerError, HandlerOutcome};
use crate::events::{EventType, StatsEvent, UnbondingStakingEvent};
use crate::handler::QueueHandlers;

impl QueueHandlers {
    /// Move a delegation into `Unbonding`.
    ///
    /// The `Unbonded` stats reversal is emitted before the transition:
    /// the reversal is idempotent under its own lock key while the
    /// transition is the step that makes a retry of this message a stale
    /// duplicate, so it goes last.
    pub(crate) async fn handle_unbonding_staking(
        &self,
        body: &str,
    ) -> Result<HandlerOutcome, HandlerError> {
        let event: UnbondingStakingEvent = Self::decode(EventType::UnbondingStaking, body)?;

        let delegation = self
            .service()
            .get_delegation(&event.staking_tx_hash_hex)
            .await?;
        if DelegationState::outdated_for_unbonding().contains(&delegation.state) {
            debug!(
                staking_tx_hash_hex = %event.staking_tx_hash_hex,
                state = %delegation.state,
                "delegation state is outdated for unbonding event"
            );
            return Ok(HandlerOutcome::Ignored);
        }

        self.emitter()
            .emit_stats_event(StatsEvent::new(
                delegation.staking_tx_hash_hex.clone(),
                delegation.staker_pk_hex.clone(),
                delegation.finality_provider_pk_hex.clone(),
                delegation.staking_value,
                DelegationState::Unbonded,
                delegation.is_overflow,
            ))
            .await?;

        let applied = self
            .service()
            .transition_to_unbonding_state(
                &event.staking_tx_hash_hex,
                UnbondingDetails {
                    unbonding_tx_hex: event.unbonding_tx_hex,
                    unbonding_start_height: event.unbonding_start_height,
                    unbonding_timelock: event.unbonding_timelock,
                    unbonding_output_index: event.unbonding_output_index,
                    unbonding_start_timestamp: event.unbonding_start_timestamp,
                },
            )
            .await?;
        if applied {
            Ok(HandlerOutcome::Processed)
        } else {
            Ok(HandlerOutcome::Ignored)
        }
    }
}
