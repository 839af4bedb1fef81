//! Moderation and legal-takedown store.

use crate::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Low-latency lookup into the content blacklist.
///
/// The two queries are independent reads and may be issued concurrently.
#[async_trait]
pub trait BlacklistStore: Send + Sync {
    /// Whether this specific content-addressed blob is blocked
    async fn is_cid_blocked(&self, cid: &str) -> Result<bool>;

    /// Whether the logical entity (for example a whole track) is blocked
    async fn is_content_id_blocked(&self, content_id: u64) -> Result<bool>;
}

#[async_trait]
impl<T: BlacklistStore + ?Sized> BlacklistStore for Arc<T> {
    async fn is_cid_blocked(&self, cid: &str) -> Result<bool> {
        (**self).is_cid_blocked(cid).await
    }

    async fn is_content_id_blocked(&self, content_id: u64) -> Result<bool> {
        (**self).is_content_id_blocked(content_id).await
    }
}
