//! Event-type dispatch.

use std::str::FromStr;
use std::sync::Arc;

use staking_service::StakingService;

use crate::emitter::StatsEmitter;
use crate::error::{HandlerError, HandlerOutcome};
use crate::events::EventType;

mod active;
mod btc_info;
mod expired;
mod stats;
mod unbonding;
mod withdrawn;

/// The full set of event handlers over one service instance.
///
/// Cheap to clone; handlers share the service and emitter.
#[derive(Clone)]
pub struct QueueHandlers {
    service: StakingService,
    emitter: Arc<dyn StatsEmitter>,
}

impl QueueHandlers {
    /// Build the handler set.
    pub fn new(service: StakingService, emitter: Arc<dyn StatsEmitter>) -> Self {
        Self { service, emitter }
    }

    /// Dispatch one message body to the handler for its event type.
    pub async fn handle(
        &self,
        event_type: &str,
        body: &str,
    ) -> Result<HandlerOutcome, HandlerError> {
        let event_type = EventType::from_str(event_type)
            .map_err(|e| HandlerError::UnknownEventType(e.0))?;
        match event_type {
            EventType::ActiveStaking => self.handle_active_staking(body).await,
            EventType::UnbondingStaking => self.handle_unbonding_staking(body).await,
            EventType::WithdrawStaking => self.handle_withdraw_staking(body).await,
            EventType::ExpiredStaking => self.handle_expired_staking(body).await,
            EventType::StakingStats => self.handle_staking_stats(body).await,
            EventType::BtcInfo => self.handle_btc_info(body).await,
        }
    }

    pub(crate) fn service(&self) -> &StakingService {
        &self.service
    }

    pub(crate) fn emitter(&self) -> &Arc<dyn StatsEmitter> {
        &self.emitter
    }

    pub(crate) fn decode<T: serde::de::DeserializeOwned>(
        event_type: EventType,
        body: &str,
    ) -> Result<T, HandlerError> {
        serde_json::from_str(body).map_err(|source| HandlerError::Decode {
            event_type: event_type.as_str(),
            source,
        })
    }
}
