//! Outbound emission of derived stats events.
//!
//! Lifecycle handlers compute stats deltas but never mutate counters
//! directly. They hand a [`StatsEvent`] to a [`StatsEmitter`], and the
//! stats handler applies it on a later delivery. The indirection keeps
//! counter updates behind the stats lock even when a lifecycle message
//! is retried.

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

use crate::events::StatsEvent;

/// Failure to hand off a stats event.
#[derive(Debug, Error)]
pub enum EmitError {
    /// The receiving side of the channel is gone.
    #[error("stats event channel closed")]
    ChannelClosed,
}

/// Sink for derived stats events.
#[async_trait]
pub trait StatsEmitter: Send + Sync {
    /// Emit a stats event for later processing.
    async fn emit_stats_event(&self, event: StatsEvent) -> Result<(), EmitError>;
}

/// [`StatsEmitter`] backed by an in-process mpsc channel.
///
/// The receiving half is typically wired into a consumer inbox so the
/// stats events flow through the same dispatch path as external ones.
#[derive(Clone)]
pub struct ChannelStatsEmitter {
    tx: mpsc::Sender<StatsEvent>,
}

impl ChannelStatsEmitter {
    /// Create an emitter over the sending half of a channel.
    pub fn new(tx: mpsc::Sender<StatsEvent>) -> Self {
        Self { tx }
    }
}

#[async_trait]
impl StatsEmitter for ChannelStatsEmitter {
    async fn emit_stats_event(&self, event: StatsEvent) -> Result<(), EmitError> {
        self.tx.send(event).await.map_err(|_| EmitError::ChannelClosed)
    }
}
