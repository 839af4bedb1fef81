//! Concurrency behaviour of the registry cache under a slow or failing source.

#![allow(clippy::unwrap_used)]

use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;
use ward_core::Address;
use ward_registry::{NodeRegistryCache, RegistryCacheConfig, RegistryError};
use ward_testkit::{ManualClock, MockRegistrySource};

const W1: Address = Address::from_bytes([1; 20]);

fn wallet(byte: u8) -> Address {
    Address::from_bytes([byte; 20])
}

fn cache(source: Arc<MockRegistrySource>, clock: Arc<ManualClock>) -> NodeRegistryCache {
    NodeRegistryCache::new(
        source,
        clock,
        RegistryCacheConfig {
            refresh_interval_ms: 60_000,
            fetch_timeout_ms: 1_000,
            ..RegistryCacheConfig::default()
        },
    )
}

#[tokio::test]
async fn concurrent_cold_lookups_share_one_fetch() {
    let source = Arc::new(MockRegistrySource::with_wallets(&[W1]));
    source.set_delay(Duration::from_millis(20));
    let cache = cache(source.clone(), Arc::new(ManualClock::new(1_000)));

    let results = join_all((0..32).map(|_| cache.is_registered_discovery_node(&W1))).await;

    assert!(results.into_iter().all(|r| r.unwrap()));
    assert_eq!(source.call_count(), 1);
}

#[tokio::test]
async fn concurrent_stale_lookups_share_one_fetch() {
    let source = Arc::new(MockRegistrySource::with_wallets(&[W1]));
    let clock = Arc::new(ManualClock::new(1_000));
    let cache = cache(source.clone(), clock.clone());
    cache.refresh().await.unwrap();

    source.set_delay(Duration::from_millis(20));
    clock.advance(120_000);

    let results = join_all((0..16).map(|_| cache.is_registered_discovery_node(&W1))).await;

    assert!(results.into_iter().all(|r| r.unwrap()));
    assert_eq!(source.call_count(), 2);
}

#[tokio::test]
async fn registry_outage_with_stale_snapshot_costs_one_fetch() {
    let source = Arc::new(MockRegistrySource::with_wallets(&[W1]));
    let clock = Arc::new(ManualClock::new(1_000));
    let cache = cache(source.clone(), clock.clone());
    cache.refresh().await.unwrap();

    source.set_failing(true);
    source.set_delay(Duration::from_millis(20));
    clock.advance(120_000);

    let results = join_all((0..16).map(|_| cache.is_registered_discovery_node(&W1))).await;
    assert!(results.into_iter().all(|r| r.unwrap()));
    assert_eq!(source.call_count(), 2);

    // Follow-up lookups inside the backoff window answer without fetching.
    clock.advance(1_000);
    assert!(cache.is_registered_discovery_node(&W1).await.unwrap());
    assert_eq!(source.call_count(), 2);
}

#[tokio::test]
async fn failed_cold_fetch_is_not_repeated_by_waiters() {
    let source = Arc::new(MockRegistrySource::with_wallets(&[W1]));
    source.set_failing(true);
    source.set_delay(Duration::from_millis(20));
    let cache = cache(source.clone(), Arc::new(ManualClock::new(1_000)));

    let results = join_all((0..8).map(|_| cache.is_registered_discovery_node(&W1))).await;

    for result in results {
        assert!(matches!(result, Err(RegistryError::Unavailable(_))));
    }
    assert_eq!(source.call_count(), 1);
}

#[tokio::test]
async fn unregistered_and_content_nodes_are_not_trusted() {
    let content = ward_core::DiscoveryNodeRecord {
        delegate_owner_wallet: wallet(2),
        endpoint: "https://cn.test".into(),
        node_type: ward_core::NodeType::Content,
    };
    let source = Arc::new(MockRegistrySource::new(vec![
        ward_core::DiscoveryNodeRecord::discovery(wallet(1), "https://dn.test"),
        content,
    ]));
    let cache = cache(source, Arc::new(ManualClock::new(1_000)));

    assert!(cache.is_registered_discovery_node(&wallet(1)).await.unwrap());
    assert!(!cache.is_registered_discovery_node(&wallet(2)).await.unwrap());
    assert!(!cache.is_registered_discovery_node(&wallet(3)).await.unwrap());
}
