//! Handler for derived stats deltas.

use staking_service::StatsDirection;
use staking_types::DelegationState;
use tracing::debug;

use crate::error::{HandlerError, HandlerOutcome};
use crate::events::{EventType, StatsEvent};
use crate::handler::QueueHandlers;

impl QueueHandlers {
    /// Apply a stats delta under the per-(tx, state) lock.
    ///
    /// Overflow delegations are tracked in the ledger but excluded from
    /// the aggregates, so their deltas are acknowledged without counter
    /// updates.
    pub(crate) async fn handle_staking_stats(
        &self,
        body: &str,
    ) -> Result<HandlerOutcome, HandlerError> {
        let event: StatsEvent = Self::decode(EventType::StakingStats, body)?;

        let direction = match event.state {
            DelegationState::Active => StatsDirection::Increment,
            DelegationState::Unbonded => StatsDirection::Subtract,
            state => return Err(HandlerError::InvalidStatsState(state)),
        };

        if event.is_overflow {
            debug!(
                staking_tx_hash_hex = %event.staking_tx_hash_hex,
                state = %event.state,
                "overflow delegation, skipping stats calculation"
            );
            return Ok(HandlerOutcome::Ignored);
        }

        self.service()
            .process_staking_stats(
                &event.staking_tx_hash_hex,
                &event.staker_pk_hex,
                &event.finality_provider_pk_hex,
                event.staking_value,
                event.state,
                direction,
            )
            .await?;
        Ok(HandlerOutcome::Processed)
    }
}
