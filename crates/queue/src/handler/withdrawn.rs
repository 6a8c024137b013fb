//! Handler for on-chain withdrawals.

use staking_types::DelegationState;
use tracing::debug;

use crate::error::{HandlerError, HandlerOutcome};
use crate::events::{EventType, WithdrawStakingEvent};
use crate::handler::QueueHandlers;

impl QueueHandlers {
    /// Move a delegation into `Withdrawn`. No stats delta: the amount was
    /// already reversed when the delegation unbonded.
    pub(crate) async fn handle_withdraw_staking(
        &self,
        body: &str,
    ) -> Result<HandlerOutcome, HandlerError> {
        let event: WithdrawStakingEvent = Self::decode(EventType::WithdrawStaking, body)?;

        let delegation = self
            .service()
            .get_delegation(&event.staking_tx_hash_hex)
            .await?;
        if DelegationState::outdated_for_withdrawn().contains(&delegation.state) {
            debug!(
                staking_tx_hash_hex = %event.staking_tx_hash_hex,
                state = %delegation.state,
                "delegation state is outdated for withdraw event"
            );
            return Ok(HandlerOutcome::Ignored);
        }

        let applied = self
            .service()
            .transition_to_withdrawn_state(&event.staking_tx_hash_hex)
            .await?;
        if applied {
            Ok(HandlerOutcome::Processed)
        } else {
            Ok(HandlerOutcome::Ignored)
        }
    }
}
