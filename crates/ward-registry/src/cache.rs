//! Read-through registry cache
//!
//! # Refresh protocol
//!
//! A lookup first reads the current snapshot pointer. A fresh snapshot answers
//! immediately. Otherwise:
//!
//! - **Stale snapshot**: the caller that wins `refresh_lock` fetches
//!   synchronously and answers from the result, falling back to the stale
//!   snapshot on failure. Callers that lose the race answer from the stale
//!   snapshot without waiting. For `retry_backoff_ms` after a failed fetch,
//!   stale lookups skip the fetch entirely and answer from the snapshot.
//! - **No snapshot**: callers queue on `refresh_lock`. The first one fetches.
//!   The rest observe its outcome through `attempts`: a stored snapshot
//!   answers them, a failed attempt that finished while they waited yields
//!   `Unavailable` without a second fetch.
//!
//! The snapshot itself sits behind a `parking_lot::RwLock` that is only ever
//! held to clone or replace an `Arc`, never across an await point.

use crate::{RegistryCacheConfig, RegistrySnapshot};
use parking_lot::{Mutex, RwLock};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use ward_core::{Address, PhysicalTimeEffects, RegistrySource, WardError};

/// Registry lookup failure
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// The registry could not be consulted and no snapshot has ever been cached
    #[error("node registry unavailable and no snapshot cached: {0}")]
    Unavailable(WardError),
}

/// Process-wide cached view of registered discovery-node wallets
pub struct NodeRegistryCache {
    source: Arc<dyn RegistrySource>,
    clock: Arc<dyn PhysicalTimeEffects>,
    config: RegistryCacheConfig,
    snapshot: RwLock<Option<Arc<RegistrySnapshot>>>,
    refresh_lock: tokio::sync::Mutex<()>,
    /// Completed fetch attempts, successful or not
    attempts: AtomicU64,
    last_error: Mutex<Option<WardError>>,
    /// Clock time of the most recent failed fetch, cleared on success
    last_failure_ms: Mutex<Option<u64>>,
}

impl NodeRegistryCache {
    /// Create an empty cache. The first lookup fetches.
    pub fn new(
        source: Arc<dyn RegistrySource>,
        clock: Arc<dyn PhysicalTimeEffects>,
        config: RegistryCacheConfig,
    ) -> Self {
        Self {
            source,
            clock,
            config,
            snapshot: RwLock::new(None),
            refresh_lock: tokio::sync::Mutex::new(()),
            attempts: AtomicU64::new(0),
            last_error: Mutex::new(None),
            last_failure_ms: Mutex::new(None),
        }
    }

    /// Cache configuration
    pub fn config(&self) -> &RegistryCacheConfig {
        &self.config
    }

    /// Current snapshot without triggering a fetch
    pub fn snapshot(&self) -> Option<Arc<RegistrySnapshot>> {
        self.snapshot.read().clone()
    }

    /// Whether `wallet` belongs to a currently registered discovery node.
    ///
    /// `Err` means the answer is unknown, not negative: callers must not treat
    /// it as a confirmed denial.
    pub async fn is_registered_discovery_node(
        &self,
        wallet: &Address,
    ) -> Result<bool, RegistryError> {
        let snapshot = self.current_snapshot().await?;
        Ok(snapshot.contains(wallet))
    }

    /// Snapshot to answer from, refreshing first when missing or stale
    pub async fn current_snapshot(&self) -> Result<Arc<RegistrySnapshot>, RegistryError> {
        match self.snapshot() {
            Some(snapshot) if self.is_fresh(&snapshot) => Ok(snapshot),
            Some(stale) => Ok(self.refresh_stale(stale).await),
            None => self.populate().await,
        }
    }

    /// Fetch now and replace the snapshot, waiting for any in-flight fetch
    /// first. On failure the previous snapshot stays in place.
    pub async fn refresh(&self) -> Result<Arc<RegistrySnapshot>, WardError> {
        let _guard = self.refresh_lock.lock().await;
        self.fetch_and_store().await
    }

    fn is_fresh(&self, snapshot: &RegistrySnapshot) -> bool {
        snapshot.age_ms(self.clock.now_ms()) < self.config.refresh_interval_ms
    }

    fn in_backoff(&self) -> bool {
        match *self.last_failure_ms.lock() {
            Some(failed_at) => {
                self.clock.now_ms().saturating_sub(failed_at) < self.config.retry_backoff_ms
            }
            None => false,
        }
    }

    async fn refresh_stale(&self, stale: Arc<RegistrySnapshot>) -> Arc<RegistrySnapshot> {
        let Ok(_guard) = self.refresh_lock.try_lock() else {
            tracing::debug!(
                snapshot_age_ms = stale.age_ms(self.clock.now_ms()),
                "registry refresh in flight, answering from stale snapshot"
            );
            return stale;
        };

        // Another caller may have finished a refresh between our read and the lock.
        if let Some(current) = self.snapshot() {
            if self.is_fresh(&current) {
                return current;
            }
        }

        if self.in_backoff() {
            tracing::debug!(
                snapshot_age_ms = stale.age_ms(self.clock.now_ms()),
                backoff_ms = self.config.retry_backoff_ms,
                "registry refresh backing off, answering from stale snapshot"
            );
            return stale;
        }

        match self.fetch_and_store().await {
            Ok(fresh) => fresh,
            Err(error) => {
                tracing::warn!(
                    %error,
                    snapshot_age_ms = stale.age_ms(self.clock.now_ms()),
                    wallets = stale.len(),
                    "registry refresh failed, serving stale snapshot"
                );
                stale
            }
        }
    }

    async fn populate(&self) -> Result<Arc<RegistrySnapshot>, RegistryError> {
        let observed = self.attempts.load(Ordering::Acquire);
        let _guard = self.refresh_lock.lock().await;

        if let Some(snapshot) = self.snapshot() {
            return Ok(snapshot);
        }

        if self.attempts.load(Ordering::Acquire) != observed {
            let error = self
                .last_error
                .lock()
                .clone()
                .unwrap_or_else(|| WardError::internal("registry fetch failed"));
            return Err(RegistryError::Unavailable(error));
        }

        self.fetch_and_store()
            .await
            .map_err(RegistryError::Unavailable)
    }

    /// Caller must hold `refresh_lock`.
    async fn fetch_and_store(&self) -> Result<Arc<RegistrySnapshot>, WardError> {
        let timeout_ms = self.config.fetch_timeout_ms;
        let result = match tokio::time::timeout(
            self.config.fetch_timeout(),
            self.source.list_discovery_nodes(),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => Err(WardError::timeout("list_discovery_nodes", timeout_ms)),
        };

        let outcome = match result {
            Ok(records) => {
                let snapshot = Arc::new(RegistrySnapshot::from_records(
                    &records,
                    self.clock.now_ms(),
                ));
                *self.snapshot.write() = Some(Arc::clone(&snapshot));
                *self.last_error.lock() = None;
                *self.last_failure_ms.lock() = None;
                tracing::info!(
                    wallets = snapshot.len(),
                    records = records.len(),
                    "registry snapshot refreshed"
                );
                Ok(snapshot)
            }
            Err(error) => {
                tracing::warn!(%error, "registry fetch failed");
                *self.last_error.lock() = Some(error.clone());
                *self.last_failure_ms.lock() = Some(self.clock.now_ms());
                Err(error)
            }
        };

        self.attempts.fetch_add(1, Ordering::AcqRel);
        outcome
    }
}

impl std::fmt::Debug for NodeRegistryCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeRegistryCache")
            .field("config", &self.config)
            .field("snapshot", &self.snapshot())
            .field("attempts", &self.attempts.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use ward_testkit::{ManualClock, MockRegistrySource};

    fn wallet(byte: u8) -> Address {
        Address::from_bytes([byte; 20])
    }

    fn cache_with(
        source: &Arc<MockRegistrySource>,
        clock: &Arc<ManualClock>,
    ) -> NodeRegistryCache {
        NodeRegistryCache::new(
            source.clone(),
            clock.clone(),
            RegistryCacheConfig {
                refresh_interval_ms: 1_000,
                fetch_timeout_ms: 100,
                retry_backoff_ms: 2_000,
            },
        )
    }

    #[tokio::test]
    async fn first_lookup_fetches_then_serves_from_cache() {
        let source = Arc::new(MockRegistrySource::with_wallets(&[wallet(1)]));
        let clock = Arc::new(ManualClock::new(10_000));
        let cache = cache_with(&source, &clock);

        assert!(cache.is_registered_discovery_node(&wallet(1)).await.unwrap());
        assert!(!cache.is_registered_discovery_node(&wallet(2)).await.unwrap());
        assert_eq!(source.call_count(), 1);
    }

    #[tokio::test]
    async fn stale_snapshot_is_refreshed_and_replaced_wholesale() {
        let source = Arc::new(MockRegistrySource::with_wallets(&[wallet(1)]));
        let clock = Arc::new(ManualClock::new(10_000));
        let cache = cache_with(&source, &clock);
        assert!(cache.is_registered_discovery_node(&wallet(1)).await.unwrap());

        source.set_wallets(&[wallet(2)]);
        clock.advance(1_000);

        assert!(cache.is_registered_discovery_node(&wallet(2)).await.unwrap());
        assert!(!cache.is_registered_discovery_node(&wallet(1)).await.unwrap());
        assert_eq!(source.call_count(), 2);
    }

    #[tokio::test]
    async fn failed_refresh_serves_stale_snapshot() {
        let source = Arc::new(MockRegistrySource::with_wallets(&[wallet(1)]));
        let clock = Arc::new(ManualClock::new(10_000));
        let cache = cache_with(&source, &clock);
        assert!(cache.is_registered_discovery_node(&wallet(1)).await.unwrap());

        source.set_failing(true);
        clock.advance(5_000);

        assert!(cache.is_registered_discovery_node(&wallet(1)).await.unwrap());
        assert_eq!(cache.snapshot().unwrap().fetched_at_ms(), 10_000);
    }

    #[tokio::test]
    async fn no_snapshot_and_failing_source_is_unavailable() {
        let source = Arc::new(MockRegistrySource::with_wallets(&[wallet(1)]));
        source.set_failing(true);
        let clock = Arc::new(ManualClock::new(10_000));
        let cache = cache_with(&source, &clock);

        let result = cache.is_registered_discovery_node(&wallet(1)).await;
        assert!(matches!(result, Err(RegistryError::Unavailable(_))));

        source.set_failing(false);
        assert!(cache.is_registered_discovery_node(&wallet(1)).await.unwrap());
    }

    #[tokio::test]
    async fn slow_source_times_out_as_unavailable() {
        let source = Arc::new(MockRegistrySource::with_wallets(&[wallet(1)]));
        source.set_delay(Duration::from_millis(500));
        let clock = Arc::new(ManualClock::new(10_000));
        let cache = cache_with(&source, &clock);

        match cache.is_registered_discovery_node(&wallet(1)).await {
            Err(RegistryError::Unavailable(WardError::Timeout { timeout_ms, .. })) => {
                assert_eq!(timeout_ms, 100);
            }
            other => panic!("expected timeout, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn explicit_refresh_failure_keeps_previous_snapshot() {
        let source = Arc::new(MockRegistrySource::with_wallets(&[wallet(1)]));
        let clock = Arc::new(ManualClock::new(10_000));
        let cache = cache_with(&source, &clock);
        cache.refresh().await.unwrap();

        source.set_failing(true);
        assert!(cache.refresh().await.is_err());
        assert!(cache.snapshot().unwrap().contains(&wallet(1)));
    }

    #[tokio::test]
    async fn stale_refresh_timeout_serves_stale_snapshot() {
        let source = Arc::new(MockRegistrySource::with_wallets(&[wallet(1)]));
        let clock = Arc::new(ManualClock::new(10_000));
        let cache = cache_with(&source, &clock);
        cache.refresh().await.unwrap();

        source.set_delay(Duration::from_millis(500));
        clock.advance(1_000);

        assert!(cache.is_registered_discovery_node(&wallet(1)).await.unwrap());
        assert_eq!(cache.snapshot().unwrap().fetched_at_ms(), 10_000);
        assert_eq!(source.call_count(), 2);
    }

    #[tokio::test]
    async fn failed_refresh_backs_off_before_retrying() {
        let source = Arc::new(MockRegistrySource::with_wallets(&[wallet(1)]));
        let clock = Arc::new(ManualClock::new(10_000));
        let cache = cache_with(&source, &clock);
        cache.refresh().await.unwrap();

        source.set_failing(true);
        clock.advance(1_000);
        assert!(cache.is_registered_discovery_node(&wallet(1)).await.unwrap());
        assert_eq!(source.call_count(), 2);

        // Inside the window: no fetch, stale answer.
        for _ in 0..3 {
            clock.advance(500);
            assert!(cache.is_registered_discovery_node(&wallet(1)).await.unwrap());
        }
        assert_eq!(source.call_count(), 2);

        // Window elapsed: one retry, which succeeds and clears the backoff.
        source.set_failing(false);
        source.set_wallets(&[wallet(2)]);
        clock.advance(500);
        assert!(cache.is_registered_discovery_node(&wallet(2)).await.unwrap());
        assert_eq!(source.call_count(), 3);
    }

    #[tokio::test]
    async fn zero_backoff_retries_on_every_stale_lookup() {
        let source = Arc::new(MockRegistrySource::with_wallets(&[wallet(1)]));
        let clock = Arc::new(ManualClock::new(10_000));
        let cache = NodeRegistryCache::new(
            source.clone(),
            clock.clone(),
            RegistryCacheConfig {
                refresh_interval_ms: 1_000,
                fetch_timeout_ms: 100,
                retry_backoff_ms: 0,
            },
        );
        cache.refresh().await.unwrap();

        source.set_failing(true);
        clock.advance(1_000);
        for _ in 0..3 {
            assert!(cache.is_registered_discovery_node(&wallet(1)).await.unwrap());
        }
        assert_eq!(source.call_count(), 4);
    }
}
