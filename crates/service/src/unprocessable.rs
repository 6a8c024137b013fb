//! Quarantine operations for messages that exhausted processing retries.
//!
//! Pure audit store: handlers never call this themselves; the consumer's
//! retry-exhaustion policy does.

use crate::error::ServiceError;
use crate::StakingService;
use staking_storage::UnprocessableMessageDocument;
use tracing::warn;

impl StakingService {
    /// Quarantine a message body under its delivery receipt.
    pub async fn save_unprocessable_message(
        &self,
        message_body: &str,
        receipt: &str,
    ) -> Result<(), ServiceError> {
        warn!(receipt, "quarantining unprocessable message");
        self.store()
            .save_unprocessable_message(message_body, receipt)
            .await?;
        Ok(())
    }

    /// All quarantined messages, for inspection and replay.
    pub async fn find_unprocessable_messages(
        &self,
    ) -> Result<Vec<UnprocessableMessageDocument>, ServiceError> {
        Ok(self.store().find_unprocessable_messages().await?)
    }

    /// Remove a quarantined message after successful reprocessing.
    pub async fn delete_unprocessable_message(&self, receipt: &str) -> Result<(), ServiceError> {
        self.store().delete_unprocessable_message(receipt).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::StakingService;
    use staking_storage::InMemoryStore;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_quarantine_round_trip() {
        let service = StakingService::new(Arc::new(InMemoryStore::new()));
        service
            .save_unprocessable_message("not json", "r-1")
            .await
            .expect("save");

        let all = service.find_unprocessable_messages().await.expect("find");
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].message_body, "not json");

        service
            .delete_unprocessable_message("r-1")
            .await
            .expect("delete");
        assert!(service
            .find_unprocessable_messages()
            .await
            .expect("find")
            .is_empty());
    }
}
