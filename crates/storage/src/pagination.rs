//! Continuation-token pagination.
//!
//! Every multi-result query returns a [`Page`]: the items plus an opaque
//! token for the next call. An absent token signals the end of the result
//! set; callers loop until then to guarantee exhaustive traversal.

use serde::{Deserialize, Serialize};

/// One page of a paginated query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    /// Documents in this page.
    pub items: Vec<T>,
    /// Opaque continuation token. `None` means the result set is exhausted.
    pub next_token: Option<String>,
}

impl<T> Page<T> {
    /// Page with no items and no continuation.
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            next_token: None,
        }
    }

    /// Whether a further page exists.
    pub fn has_more(&self) -> bool {
        self.next_token.is_some()
    }
}

/// Encode a backend cursor into an opaque token.
pub(crate) fn encode_token(cursor: &str) -> String {
    hex::encode(cursor.as_bytes())
}

/// Decode an opaque token back into a backend cursor.
pub(crate) fn decode_token(token: &str) -> crate::error::Result<String> {
    let bytes = hex::decode(token)
        .map_err(|e| crate::error::StorageError::InvalidPaginationToken(e.to_string()))?;
    String::from_utf8(bytes)
        .map_err(|e| crate::error::StorageError::InvalidPaginationToken(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_round_trip() {
        let token = encode_token("staker:abc123");
        assert_eq!(decode_token(&token).expect("decode"), "staker:abc123");
    }

    #[test]
    fn test_garbage_token_rejected() {
        assert!(decode_token("not-hex!").is_err());
    }

    #[test]
    fn test_empty_page() {
        let page: Page<u64> = Page::empty();
        assert!(page.items.is_empty());
        assert!(!page.has_more());
    }
}
