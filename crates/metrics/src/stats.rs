//! Stats-consistency engine metrics.

use once_cell::sync::Lazy;
use prometheus::{Counter, CounterVec, Registry};

pub static STATS_LOCKS_ACQUIRED: Lazy<Counter> = Lazy::new(|| {
    Counter::new(
        "staking_stats_locks_acquired_total",
        "Stats locks observed with at least one counter group outstanding",
    )
    .expect("metric can be created")
});

pub static STATS_LOCKS_ALREADY_HELD: Lazy<Counter> = Lazy::new(|| {
    Counter::new(
        "staking_stats_locks_already_held_total",
        "Stats deltas skipped because the lock was fully applied",
    )
    .expect("metric can be created")
});

pub static STATS_COUNTER_UPDATES: Lazy<CounterVec> = Lazy::new(|| {
    CounterVec::new(
        prometheus::opts!(
            "staking_stats_counter_updates_total",
            "Aggregate counter updates applied, by group and direction"
        ),
        &["group", "direction"],
    )
    .expect("metric can be created")
});

pub static BTC_INFO_UPSERTS: Lazy<Counter> = Lazy::new(|| {
    Counter::new(
        "staking_btc_info_upserts_total",
        "BTC network info singleton overwrites",
    )
    .expect("metric can be created")
});

/// Register stats metrics with the given registry.
pub fn register_metrics(registry: &Registry) {
    registry
        .register(Box::new(STATS_LOCKS_ACQUIRED.clone()))
        .expect("collector can be registered");
    registry
        .register(Box::new(STATS_LOCKS_ALREADY_HELD.clone()))
        .expect("collector can be registered");
    registry
        .register(Box::new(STATS_COUNTER_UPDATES.clone()))
        .expect("collector can be registered");
    registry
        .register(Box::new(BTC_INFO_UPSERTS.clone()))
        .expect("collector can be registered");
}
