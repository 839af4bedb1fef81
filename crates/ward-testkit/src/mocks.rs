//! Mock collaborators
//!
//! Both mocks count calls so tests can assert how much I/O a decision cost,
//! and both can be made slow or failing at runtime.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;
use ward_core::{
    Address, BlacklistStore, DiscoveryNodeRecord, RegistrySource, Result, WardError,
};

/// In-memory registry with injectable latency and failures
#[derive(Debug, Default)]
pub struct MockRegistrySource {
    records: Mutex<Vec<DiscoveryNodeRecord>>,
    failing: AtomicBool,
    delay: Mutex<Option<Duration>>,
    calls: AtomicUsize,
}

impl MockRegistrySource {
    /// Registry holding exactly `records`
    pub fn new(records: Vec<DiscoveryNodeRecord>) -> Self {
        Self {
            records: Mutex::new(records),
            ..Self::default()
        }
    }

    /// Registry of discovery nodes owned by `wallets`
    pub fn with_wallets(wallets: &[Address]) -> Self {
        Self::new(discovery_records(wallets))
    }

    /// Replace the registry contents
    pub fn set_records(&self, records: Vec<DiscoveryNodeRecord>) {
        *self.records.lock() = records;
    }

    /// Replace the registry with discovery nodes owned by `wallets`
    pub fn set_wallets(&self, wallets: &[Address]) {
        self.set_records(discovery_records(wallets));
    }

    /// Make every subsequent fetch fail with a network error
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Sleep this long inside every fetch
    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock() = Some(delay);
    }

    /// Number of fetches started
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

fn discovery_records(wallets: &[Address]) -> Vec<DiscoveryNodeRecord> {
    wallets
        .iter()
        .enumerate()
        .map(|(i, wallet)| {
            DiscoveryNodeRecord::discovery(*wallet, format!("https://dn{i}.test"))
        })
        .collect()
}

#[async_trait]
impl RegistrySource for MockRegistrySource {
    async fn list_discovery_nodes(&self) -> Result<Vec<DiscoveryNodeRecord>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let delay = *self.delay.lock();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.failing.load(Ordering::SeqCst) {
            return Err(WardError::network("mock registry unreachable"));
        }
        Ok(self.records.lock().clone())
    }
}

/// In-memory blacklist with injectable latency and per-query failures
#[derive(Debug, Default)]
pub struct MockBlacklistStore {
    cids: Mutex<HashSet<String>>,
    content_ids: Mutex<HashSet<u64>>,
    cid_failing: AtomicBool,
    content_id_failing: AtomicBool,
    delay: Mutex<Option<Duration>>,
    cid_calls: AtomicUsize,
    content_id_calls: AtomicUsize,
}

impl MockBlacklistStore {
    /// Empty blacklist
    pub fn new() -> Self {
        Self::default()
    }

    /// Block a specific CID
    pub fn block_cid(&self, cid: impl Into<String>) {
        self.cids.lock().insert(cid.into());
    }

    /// Block every CID of a logical entity
    pub fn block_content_id(&self, content_id: u64) {
        self.content_ids.lock().insert(content_id);
    }

    /// Make both queries fail
    pub fn set_failing(&self, failing: bool) {
        self.fail_cid_queries(failing);
        self.fail_content_id_queries(failing);
    }

    /// Make only the CID query fail
    pub fn fail_cid_queries(&self, failing: bool) {
        self.cid_failing.store(failing, Ordering::SeqCst);
    }

    /// Make only the content-id query fail
    pub fn fail_content_id_queries(&self, failing: bool) {
        self.content_id_failing.store(failing, Ordering::SeqCst);
    }

    /// Sleep this long inside every query
    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock() = Some(delay);
    }

    /// CID queries issued
    pub fn cid_calls(&self) -> usize {
        self.cid_calls.load(Ordering::SeqCst)
    }

    /// Content-id queries issued
    pub fn content_id_calls(&self) -> usize {
        self.content_id_calls.load(Ordering::SeqCst)
    }

    /// All queries issued
    pub fn call_count(&self) -> usize {
        self.cid_calls() + self.content_id_calls()
    }

    async fn pause(&self) {
        let delay = *self.delay.lock();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl BlacklistStore for MockBlacklistStore {
    async fn is_cid_blocked(&self, cid: &str) -> Result<bool> {
        self.cid_calls.fetch_add(1, Ordering::SeqCst);
        self.pause().await;
        if self.cid_failing.load(Ordering::SeqCst) {
            return Err(WardError::network("mock blacklist unreachable"));
        }
        Ok(self.cids.lock().contains(cid))
    }

    async fn is_content_id_blocked(&self, content_id: u64) -> Result<bool> {
        self.content_id_calls.fetch_add(1, Ordering::SeqCst);
        self.pause().await;
        if self.content_id_failing.load(Ordering::SeqCst) {
            return Err(WardError::network("mock blacklist unreachable"));
        }
        Ok(self.content_ids.lock().contains(&content_id))
    }
}
