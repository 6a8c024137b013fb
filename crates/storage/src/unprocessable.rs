//! Quarantined message records.

use serde::{Deserialize, Serialize};

/// A message that exhausted its processing retries.
///
/// Identity is the delivery receipt. Append-only quarantine, retrievable
/// for manual inspection and deleted on successful replay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnprocessableMessageDocument {
    /// Delivery receipt identifying the message in the queue.
    pub receipt: String,
    /// Raw message body as received.
    pub message_body: String,
}
