//! Handler error classification.
//!
//! The taxonomy is a retry/quarantine policy, not a transport concern:
//! the consumer maps [`ErrorKind`] to acknowledge / requeue / quarantine.

use staking_service::ServiceError;
use staking_types::DelegationState;
use thiserror::Error;

/// How a handler disposed of a message without error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerOutcome {
    /// The event was applied (or its effects were already durable).
    Processed,
    /// The event was superseded by the delegation's current state; an
    /// outdated duplicate, absorbed with no side effects.
    Ignored,
}

impl HandlerOutcome {
    /// Metrics label for this outcome.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Processed => "processed",
            Self::Ignored => "ignored",
        }
    }
}

/// Classification of a handler failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed input; retrying cannot help. Quarantine candidate.
    BadRequest,
    /// Referenced entity absent; the creating write may not be visible
    /// yet. Retryable.
    NotFound,
    /// Storage or dependency failure. Retryable.
    InternalService,
}

impl ErrorKind {
    /// Whether the consumer should requeue on this kind.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, ErrorKind::BadRequest)
    }

    /// Metrics label for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BadRequest => "bad_request",
            Self::NotFound => "not_found",
            Self::InternalService => "internal_service",
        }
    }
}

/// A classified handler failure.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// The message body will never decode correctly on retry.
    #[error("malformed {event_type} payload: {source}")]
    Decode {
        /// Which event schema failed to decode.
        event_type: &'static str,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// The message-type tag names no known event.
    #[error("unknown event type: {0}")]
    UnknownEventType(String),

    /// A stats event carried a state no stats rule exists for.
    #[error("invalid delegation state for stats calculation: {0}")]
    InvalidStatsState(DelegationState),

    /// Failure from the service layer.
    #[error(transparent)]
    Service(#[from] ServiceError),

    /// Outbound stats event emission failed.
    #[error(transparent)]
    Emit(#[from] crate::emitter::EmitError),
}

impl HandlerError {
    /// Map this failure to the consumer's retry/quarantine policy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            HandlerError::Decode { .. }
            | HandlerError::UnknownEventType(_)
            | HandlerError::InvalidStatsState(_) => ErrorKind::BadRequest,
            HandlerError::Service(e) if e.is_not_found() => ErrorKind::NotFound,
            HandlerError::Service(_) | HandlerError::Emit(_) => ErrorKind::InternalService,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_errors_are_bad_requests() {
        let source = serde_json::from_str::<u64>("{}").expect_err("bad json");
        let err = HandlerError::Decode {
            event_type: "btc_info_event",
            source,
        };
        assert_eq!(err.kind(), ErrorKind::BadRequest);
        assert!(!err.kind().is_retryable());
    }

    #[test]
    fn test_missing_delegation_is_retryable() {
        let err = HandlerError::Service(ServiceError::DelegationNotFound("aa".into()));
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert!(err.kind().is_retryable());
    }
}
