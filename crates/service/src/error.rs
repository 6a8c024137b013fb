//! Service error types

use staking_storage::StorageError;
use thiserror::Error;

/// Errors surfaced by the service layer.
///
/// "Stale duplicate" is not represented here: an event superseded by the
/// delegation's current state is a successful no-op, reported through the
/// `applied` flag of the transition methods.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Referenced delegation does not exist yet. Retryable: the write that
    /// creates it may not be visible.
    #[error("delegation not found: {0}")]
    DelegationNotFound(String),

    /// Delegation already exists; a duplicate active-staking delivery.
    #[error("delegation already exists: {0}")]
    DelegationAlreadyExists(String),

    /// Storage failure. Retryable.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl ServiceError {
    /// Whether this error reports a missing entity (retryable because the
    /// creating write may not yet be visible) rather than a failure.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ServiceError::DelegationNotFound(_) | ServiceError::Storage(StorageError::NotFound(_))
        )
    }
}
