//! Queue event dispatch for the staking ledger.
//!
//! One handler per event type decodes the message body, applies the
//! outdated-state filter, schedules side effects, and drives the
//! delegation state machine and stats engine. Failures come back as a
//! classified [`HandlerError`] whose [`ErrorKind`] tells the consumer
//! whether to acknowledge, requeue, or quarantine:
//!
//! - `BadRequest`: the message will never decode; quarantine it
//! - `NotFound`: the referenced write may not be visible yet; requeue
//! - `InternalService`: storage or dependency failure; requeue
//!
//! An event superseded by the delegation's current state is not an error:
//! the handler reports [`HandlerOutcome::Ignored`] and the message is
//! acknowledged.
//!
//! [`Consumer`] is a tokio task wrapping the handlers with the retry /
//! quarantine policy over an abstract [`MessageQueue`] transport.

#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]

pub mod config;
pub mod consumer;
pub mod emitter;
pub mod error;
pub mod events;
pub mod handler;

pub use config::ConsumerConfig;
pub use consumer::{Consumer, ConsumerHandle, IncomingMessage, MessageQueue, TransportError};
pub use emitter::{ChannelStatsEmitter, EmitError, StatsEmitter};
pub use error::{ErrorKind, HandlerError, HandlerOutcome};
pub use events::{
    ActiveStakingEvent, BtcInfoEvent, EventType, ExpiredStakingEvent, StatsEvent,
    UnbondingStakingEvent, WithdrawStakingEvent,
};
pub use handler::QueueHandlers;
