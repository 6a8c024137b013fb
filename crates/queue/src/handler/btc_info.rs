//! Handler for BTC network info updates.

use crate::error::{HandlerError, HandlerOutcome};
use crate::events::{BtcInfoEvent, EventType};
use crate::handler::QueueHandlers;

impl QueueHandlers {
    /// Upsert the BTC info singleton, last write wins.
    pub(crate) async fn handle_btc_info(
        &self,
        body: &str,
    ) -> Result<HandlerOutcome, HandlerError> {
        let event: BtcInfoEvent = Self::decode(EventType::BtcInfo, body)?;
        self.service()
            .process_btc_info_stats(event.height, event.confirmed_tvl, event.unconfirmed_tvl)
            .await?;
        Ok(HandlerOutcome::Processed)
    }
}
