//! Consumer tuning knobs.

use serde::{Deserialize, Serialize};

/// Default number of delivery attempts before a message is quarantined.
pub const DEFAULT_MAX_RETRY_ATTEMPTS: u32 = 5;

/// Default capacity of the consumer's in-process inbox.
pub const DEFAULT_INBOX_CAPACITY: usize = 256;

/// Configuration for a [`Consumer`](crate::consumer::Consumer).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsumerConfig {
    /// Deliveries (including the first) a message gets before it is
    /// moved to the unprocessable store.
    pub max_retry_attempts: u32,
    /// Bound on the inbox channel between producers and the worker.
    pub inbox_capacity: usize,
}

impl Default for ConsumerConfig {
    fn default() -> Self {
        Self {
            max_retry_attempts: DEFAULT_MAX_RETRY_ATTEMPTS,
            inbox_capacity: DEFAULT_INBOX_CAPACITY,
        }
    }
}

impl ConsumerConfig {
    /// Override the retry budget.
    pub fn with_max_retry_attempts(mut self, attempts: u32) -> Self {
        self.max_retry_attempts = attempts;
        self
    }

    /// Override the inbox capacity.
    pub fn with_inbox_capacity(mut self, capacity: usize) -> Self {
        self.inbox_capacity = capacity;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_and_builders() {
        let config = ConsumerConfig::default();
        assert_eq!(config.max_retry_attempts, DEFAULT_MAX_RETRY_ATTEMPTS);
        assert_eq!(config.inbox_capacity, DEFAULT_INBOX_CAPACITY);

        let config = config.with_max_retry_attempts(2).with_inbox_capacity(8);
        assert_eq!(config.max_retry_attempts, 2);
        assert_eq!(config.inbox_capacity, 8);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: ConsumerConfig =
            serde_json::from_str(r#"{"max_retry_attempts":7}"#).expect("decode");
        assert_eq!(config.max_retry_attempts, 7);
        assert_eq!(config.inbox_capacity, DEFAULT_INBOX_CAPACITY);
    }
}
