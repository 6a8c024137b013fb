//! Prometheus metrics infrastructure for the staking ledger.
//!
//! This crate provides centralized metric definitions for all subsystems.
//! Metrics are organized by subsystem: queue event processing and the
//! stats-consistency engine.

pub mod queue;
pub mod server;
pub mod stats;

pub use server::{spawn_metrics_server, start_metrics_server};

use once_cell::sync::Lazy;
use prometheus::Registry;

/// Global Prometheus registry for all staking ledger metrics.
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();

    queue::register_metrics(&registry);
    stats::register_metrics(&registry);

    registry
});

/// Initialize all metrics. Call once at startup.
pub fn init() {
    Lazy::force(&REGISTRY);
    tracing::info!("staking ledger metrics initialized");
}
