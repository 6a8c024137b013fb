//! Delegation lifecycle state machine and stats-consistency engine.
//!
//! [`StakingService`] owns the business rules on top of the storage
//! contract: which prior states make an event applicable, how transitions
//! populate derived fields and schedule timelock-expiry checks, and how
//! aggregate statistics stay exactly-once-equivalent under at-least-once
//! delivery via the per-(tx, state) stats lock.
//!
//! The service never caches documents beyond one operation and holds no
//! in-memory locks across storage calls; correctness comes from the
//! contract's conditional writes, not from serialization.

#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]

pub mod address;
pub mod delegation;
pub mod error;
pub mod query;
pub mod stats;
pub mod unprocessable;

pub use error::ServiceError;
pub use stats::StatsDirection;

use staking_storage::DelegationStore;
use std::sync::Arc;

/// Business-logic layer over the storage contract.
///
/// Cheap to clone; handlers across concurrent tasks share one instance
/// through the inner `Arc`.
#[derive(Clone)]
pub struct StakingService {
    store: Arc<dyn DelegationStore>,
}

impl StakingService {
    /// New service over the given storage backend.
    pub fn new(store: Arc<dyn DelegationStore>) -> Self {
        Self { store }
    }

    /// Health check against the storage backend.
    pub async fn ping(&self) -> Result<(), ServiceError> {
        self.store.ping().await.map_err(ServiceError::from)
    }

    pub(crate) fn store(&self) -> &dyn DelegationStore {
        self.store.as_ref()
    }
}
