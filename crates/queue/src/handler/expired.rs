//! Handler for timelock expiry.

use staking_types::DelegationState;
use tracing::debug;

use crate::error::{HandlerError, HandlerOutcome};
use crate::events::{EventType, ExpiredStakingEvent};
use crate::handler::QueueHandlers;

impl QueueHandlers {
    /// Move a delegation into `Unbonded` after its timelock expired.
    ///
    /// The transaction type on the event decides the eligible prior
    /// state: a staking-tx expiry unbonds an `Active` delegation, an
    /// unbonding-tx expiry completes an `Unbonding` one. No stats delta
    /// is emitted on this path.
    pub(crate) async fn handle_expired_staking(
        &self,
        body: &str,
    ) -> Result<HandlerOutcome, HandlerError> {
        let event: ExpiredStakingEvent = Self::decode(EventType::ExpiredStaking, body)?;

        let delegation = self
            .service()
            .get_delegation(&event.staking_tx_hash_hex)
            .await?;
        if DelegationState::outdated_for_expired().contains(&delegation.state) {
            debug!(
                staking_tx_hash_hex = %event.staking_tx_hash_hex,
                state = %delegation.state,
                "delegation state is outdated for expired event"
            );
            return Ok(HandlerOutcome::Ignored);
        }

        let applied = self
            .service()
            .transition_to_unbonded_state(&event.staking_tx_hash_hex, event.tx_type)
            .await?;
        if applied {
            Ok(HandlerOutcome::Processed)
        } else {
            Ok(HandlerOutcome::Ignored)
        }
    }
}
