//! Consumer worker: retry and quarantine policy over a queue transport.
//!
//! The consumer owns no transport details. An adapter feeds deliveries
//! into the inbox through [`ConsumerHandle::deliver`] and implements
//! [`MessageQueue`] for acknowledgement and redelivery. Every message is
//! terminally disposed: acknowledged, requeued with an incremented
//! attempt count, or quarantined in the unprocessable store.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use staking_metrics::queue::{
    QUEUE_EVENTS_PROCESSED, QUEUE_HANDLER_DURATION, QUEUE_MESSAGES_QUARANTINED,
    QUEUE_MESSAGES_REQUEUED,
};
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::config::ConsumerConfig;
use crate::error::HandlerOutcome;
use crate::handler::QueueHandlers;

/// One delivery from the queue transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingMessage {
    /// Message-type tag naming the event schema.
    pub message_type: String,
    /// Raw JSON body.
    pub body: String,
    /// Transport receipt used to acknowledge this delivery.
    pub receipt: String,
    /// Delivery attempts so far, including this one.
    pub attempts: u32,
}

/// Transport failure on acknowledge or requeue.
#[derive(Debug, Error)]
#[error("queue transport failure: {0}")]
pub struct TransportError(
    /// Description of the transport failure.
    pub String,
);

/// Acknowledgement side of the queue transport.
#[async_trait]
pub trait MessageQueue: Send + Sync {
    /// Remove a delivery from the queue.
    async fn ack(&self, receipt: &str) -> Result<(), TransportError>;

    /// Return a message to the queue for a later attempt.
    async fn requeue(&self, message: IncomingMessage) -> Result<(), TransportError>;
}

/// Error delivering into a consumer whose worker has stopped.
#[derive(Debug, Error)]
#[error("consumer inbox closed")]
pub struct InboxClosed;

/// Handle to a running [`Consumer`] task.
pub struct ConsumerHandle {
    inbox: mpsc::Sender<IncomingMessage>,
    shutdown: CancellationToken,
    handle: JoinHandle<()>,
}

impl ConsumerHandle {
    /// Feed one delivery into the consumer.
    pub async fn deliver(&self, message: IncomingMessage) -> Result<(), InboxClosed> {
        self.inbox.send(message).await.map_err(|_| InboxClosed)
    }

    /// Stop the worker after it drains the inbox. For an immediate stop
    /// that abandons queued deliveries to redelivery, cancel the token
    /// passed to [`Consumer::spawn`] instead.
    pub async fn shutdown(self) {
        drop(self.inbox);
        if let Err(e) = self.handle.await {
            error!(error = %e, "consumer task panicked during shutdown");
        }
        self.shutdown.cancel();
    }
}

/// The consumer worker.
pub struct Consumer {
    handlers: QueueHandlers,
    queue: Arc<dyn MessageQueue>,
    config: ConsumerConfig,
    inbox: mpsc::Receiver<IncomingMessage>,
    shutdown: CancellationToken,
}

impl Consumer {
    /// Spawn the consumer task and return its handle.
    pub fn spawn(
        handlers: QueueHandlers,
        queue: Arc<dyn MessageQueue>,
        config: ConsumerConfig,
        shutdown: CancellationToken,
    ) -> ConsumerHandle {
        let (tx, rx) = mpsc::channel(config.inbox_capacity);
        let consumer = Consumer {
            handlers,
            queue,
            config,
            inbox: rx,
            shutdown: shutdown.clone(),
        };
        let handle = tokio::spawn(consumer.run());
        ConsumerHandle {
            inbox: tx,
            shutdown,
            handle,
        }
    }

    async fn run(mut self) {
        info!(
            max_retry_attempts = self.config.max_retry_attempts,
            "consumer started"
        );
        loop {
            tokio::select! {
                // Cancellation wins over pending deliveries: anything
                // still in the inbox stays un-acked, and the transport
                // redelivers it to the next consumer.
                biased;
                _ = self.shutdown.cancelled() => break,
                maybe = self.inbox.recv() => match maybe {
                    Some(message) => self.process(message).await,
                    None => break,
                },
            }
        }
        info!("consumer stopped");
    }

    async fn process(&self, message: IncomingMessage) {
        let event_type = message.message_type.clone();
        let start = Instant::now();
        let result = self.handlers.handle(&message.message_type, &message.body).await;
        QUEUE_HANDLER_DURATION
            .with_label_values(&[event_type.as_str()])
            .observe(start.elapsed().as_secs_f64());

        match result {
            Ok(outcome) => {
                QUEUE_EVENTS_PROCESSED
                    .with_label_values(&[event_type.as_str(), outcome.as_str()])
                    .inc();
                if outcome == HandlerOutcome::Ignored {
                    info!(event_type, receipt = %message.receipt, "outdated event ignored");
                }
                self.ack(&message).await;
            }
            Err(err) => {
                let kind = err.kind();
                QUEUE_EVENTS_PROCESSED
                    .with_label_values(&[event_type.as_str(), kind.as_str()])
                    .inc();
                warn!(
                    event_type,
                    receipt = %message.receipt,
                    attempts = message.attempts,
                    kind = kind.as_str(),
                    error = %err,
                    "event handling failed"
                );
                if !kind.is_retryable() || message.attempts >= self.config.max_retry_attempts {
                    self.quarantine(message).await;
                } else {
                    self.requeue(message).await;
                }
            }
        }
    }

    async fn ack(&self, message: &IncomingMessage) {
        if let Err(e) = self.queue.ack(&message.receipt).await {
            // At-least-once transport: the redelivery will be absorbed as
            // a stale duplicate.
            error!(receipt = %message.receipt, error = %e, "failed to acknowledge message");
        }
    }

    async fn requeue(&self, mut message: IncomingMessage) {
        QUEUE_MESSAGES_REQUEUED
            .with_label_values(&[message.message_type.as_str()])
            .inc();
        message.attempts += 1;
        let receipt = message.receipt.clone();
        if let Err(e) = self.queue.requeue(message).await {
            error!(receipt = %receipt, error = %e, "failed to requeue message");
        }
    }

    async fn quarantine(&self, message: IncomingMessage) {
        match self
            .handlers
            .service()
            .save_unprocessable_message(&message.body, &message.receipt)
            .await
        {
            Ok(()) => {
                QUEUE_MESSAGES_QUARANTINED
                    .with_label_values(&[message.message_type.as_str()])
                    .inc();
                self.ack(&message).await;
            }
            Err(e) => {
                // The quarantine write must land before the message leaves
                // the queue; until then the transport keeps redelivering.
                error!(
                    receipt = %message.receipt,
                    error = %e,
                    "failed to quarantine message, requeueing"
                );
                self.requeue(message).await;
            }
        }
    }
}
