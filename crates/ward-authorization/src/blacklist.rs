//! Moderation gate
//!
//! Two independent lookups, CID-level and content-id-level, issued
//! concurrently and each bounded by the configured query timeout. Either
//! positive blocks. If neither is positive but either lookup failed, the gate
//! fails closed.

use std::sync::Arc;
use std::time::Duration;
use ward_core::{BlacklistStore, WardError};

/// Result of consulting the blacklist
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlacklistOutcome {
    /// Neither the CID nor the content id is blocked
    Clear,
    /// The specific CID is blocked
    CidBlocked,
    /// The logical content id is blocked
    ContentBlocked,
    /// A lookup failed or timed out and no block was confirmed
    Unavailable,
}

impl BlacklistOutcome {
    /// Whether the request must be refused
    pub fn is_blocked(self) -> bool {
        !matches!(self, Self::Clear)
    }
}

/// Concurrent, timeout-bounded blacklist check
#[derive(Clone)]
pub struct BlacklistGate {
    store: Arc<dyn BlacklistStore>,
    query_timeout: Duration,
}

impl BlacklistGate {
    /// Gate over `store`, bounding each query by `query_timeout`
    pub fn new(store: Arc<dyn BlacklistStore>, query_timeout: Duration) -> Self {
        Self {
            store,
            query_timeout,
        }
    }

    /// Whether serving `cid` of `content_id` must be refused
    pub async fn is_blocked(&self, cid: &str, content_id: u64) -> bool {
        self.check(cid, content_id).await.is_blocked()
    }

    /// Consult both lookups and classify the result
    pub async fn check(&self, cid: &str, content_id: u64) -> BlacklistOutcome {
        let (cid_result, content_result) = tokio::join!(
            self.bounded("is_cid_blocked", self.store.is_cid_blocked(cid)),
            self.bounded(
                "is_content_id_blocked",
                self.store.is_content_id_blocked(content_id)
            ),
        );

        match (cid_result, content_result) {
            (Ok(true), _) => BlacklistOutcome::CidBlocked,
            (_, Ok(true)) => BlacklistOutcome::ContentBlocked,
            (Ok(false), Ok(false)) => BlacklistOutcome::Clear,
            (cid_result, content_result) => {
                let cid_error = cid_result.err();
                let content_error = content_result.err();
                tracing::warn!(
                    cid,
                    content_id,
                    cid_error = ?cid_error,
                    content_error = ?content_error,
                    "blacklist lookup failed, refusing to serve"
                );
                BlacklistOutcome::Unavailable
            }
        }
    }

    async fn bounded<F>(&self, operation: &'static str, query: F) -> Result<bool, WardError>
    where
        F: std::future::Future<Output = Result<bool, WardError>>,
    {
        match tokio::time::timeout(self.query_timeout, query).await {
            Ok(result) => result,
            Err(_) => Err(WardError::timeout(
                operation,
                u64::try_from(self.query_timeout.as_millis()).unwrap_or(u64::MAX),
            )),
        }
    }
}

impl std::fmt::Debug for BlacklistGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlacklistGate")
            .field("query_timeout", &self.query_timeout)
            .finish_non_exhaustive()
    }
}
