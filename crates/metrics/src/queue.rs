//! Queue event processing metrics.

use once_cell::sync::Lazy;
use prometheus::{CounterVec, HistogramVec, Registry};

pub static QUEUE_EVENTS_PROCESSED: Lazy<CounterVec> = Lazy::new(|| {
    CounterVec::new(
        prometheus::opts!(
            "staking_queue_events_processed_total",
            "Queue events handled, by event type and outcome"
        ),
        &["event_type", "outcome"],
    )
    .expect("metric can be created")
});

pub static QUEUE_MESSAGES_REQUEUED: Lazy<CounterVec> = Lazy::new(|| {
    CounterVec::new(
        prometheus::opts!(
            "staking_queue_messages_requeued_total",
            "Messages sent back to the queue for retry, by event type"
        ),
        &["event_type"],
    )
    .expect("metric can be created")
});

pub static QUEUE_MESSAGES_QUARANTINED: Lazy<CounterVec> = Lazy::new(|| {
    CounterVec::new(
        prometheus::opts!(
            "staking_queue_messages_quarantined_total",
            "Messages moved to the unprocessable store, by event type"
        ),
        &["event_type"],
    )
    .expect("metric can be created")
});

pub static QUEUE_HANDLER_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        prometheus::histogram_opts!(
            "staking_queue_handler_duration_seconds",
            "Time spent handling one queue event",
            vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0]
        ),
        &["event_type"],
    )
    .expect("metric can be created")
});

/// Register queue metrics with the given registry.
pub fn register_metrics(registry: &Registry) {
    registry
        .register(Box::new(QUEUE_EVENTS_PROCESSED.clone()))
        .expect("collector can be registered");
    registry
        .register(Box::new(QUEUE_MESSAGES_REQUEUED.clone()))
        .expect("collector can be registered");
    registry
        .register(Box::new(QUEUE_MESSAGES_QUARANTINED.clone()))
        .expect("collector can be registered");
    registry
        .register(Box::new(QUEUE_HANDLER_DURATION.clone()))
        .expect("collector can be registered");
}
