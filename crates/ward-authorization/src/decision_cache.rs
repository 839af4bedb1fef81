//! Caller-side decision memoization
//!
//! Decisions are memoized only when they say so (`should_cache`). An entry
//! lives for the configured TTL but never past the instant its attestation
//! leaves the freshness window, so a cached grant cannot outlive the grant
//! itself. Capacity is bounded; the oldest insertions are evicted first.

use crate::{AccessAuthorizer, DecisionCacheConfig};
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use ward_core::{AccessDecision, SignedAttestation};

// =============================================================================
// Decision Cache
// =============================================================================

/// Request identity: requested CID, signed payload bytes, signature bytes
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct DecisionKey {
    requested_cid: String,
    payload: Vec<u8>,
    signature: Vec<u8>,
}

#[derive(Debug, Clone, Copy)]
struct Entry {
    decision: AccessDecision,
    valid_until_ms: u64,
    seq: u64,
}

#[derive(Debug, Default)]
struct Inner {
    entries: HashMap<DecisionKey, Entry>,
    order: VecDeque<(u64, DecisionKey)>,
    next_seq: u64,
    stats: DecisionCacheStats,
}

/// Counters for cache effectiveness
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecisionCacheStats {
    /// Lookups answered from the cache
    pub hits: u64,
    /// Lookups that found nothing usable
    pub misses: u64,
    /// Entries evicted for capacity
    pub evictions: u64,
}

/// Bounded, TTL-limited memo of cacheable decisions
#[derive(Debug)]
pub struct DecisionCache {
    config: DecisionCacheConfig,
    inner: Mutex<Inner>,
}

impl DecisionCache {
    /// Empty cache
    pub fn new(config: DecisionCacheConfig) -> Self {
        Self {
            config,
            inner: Mutex::new(Inner::default()),
        }
    }

    /// Cached decision for this exact request, if still valid at `now_ms`
    pub fn get(
        &self,
        requested_cid: &str,
        payload: &[u8],
        signature: &[u8],
        now_ms: u64,
    ) -> Option<AccessDecision> {
        let key = DecisionKey {
            requested_cid: requested_cid.to_owned(),
            payload: payload.to_vec(),
            signature: signature.to_vec(),
        };
        let mut inner = self.inner.lock();
        match inner.entries.get(&key).copied() {
            Some(entry) if now_ms < entry.valid_until_ms => {
                inner.stats.hits += 1;
                Some(entry.decision)
            }
            Some(_) => {
                inner.entries.remove(&key);
                inner.stats.misses += 1;
                None
            }
            None => {
                inner.stats.misses += 1;
                None
            }
        }
    }

    /// Memoize `decision` if it is cacheable.
    ///
    /// `expires_at_ms` is the last instant at which the attestation is still
    /// fresh. Returns whether an entry was stored.
    pub fn insert(
        &self,
        requested_cid: &str,
        payload: &[u8],
        signature: &[u8],
        decision: AccessDecision,
        now_ms: u64,
        expires_at_ms: u64,
    ) -> bool {
        if !decision.should_cache() || self.config.max_entries == 0 {
            return false;
        }
        let valid_until_ms = now_ms
            .saturating_add(self.config.ttl_ms)
            .min(expires_at_ms.saturating_add(1));
        if valid_until_ms <= now_ms {
            return false;
        }

        let key = DecisionKey {
            requested_cid: requested_cid.to_owned(),
            payload: payload.to_vec(),
            signature: signature.to_vec(),
        };
        let mut inner = self.inner.lock();
        let seq = inner.next_seq;
        inner.next_seq += 1;
        inner.entries.insert(
            key.clone(),
            Entry {
                decision,
                valid_until_ms,
                seq,
            },
        );
        inner.order.push_back((seq, key));
        self.evict(&mut inner, now_ms);
        true
    }

    fn evict(&self, inner: &mut Inner, now_ms: u64) {
        if inner.entries.len() > self.config.max_entries {
            inner.entries.retain(|_, entry| now_ms < entry.valid_until_ms);
        }
        while inner.entries.len() > self.config.max_entries {
            let Some((seq, key)) = inner.order.pop_front() else {
                break;
            };
            if inner.entries.get(&key).is_some_and(|entry| entry.seq == seq) {
                inner.entries.remove(&key);
                inner.stats.evictions += 1;
            }
        }
        // Drop order records whose entry was replaced, expired, or evicted.
        if inner.order.len() > self.config.max_entries.saturating_mul(2) {
            let entries = &inner.entries;
            inner
                .order
                .retain(|(seq, key)| entries.get(key).is_some_and(|entry| entry.seq == *seq));
        }
    }

    /// Live entry count, including entries not yet found expired
    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    /// Whether the cache holds no entries
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every entry
    pub fn clear(&self) {
        let mut inner = self.inner.lock();
        inner.entries.clear();
        inner.order.clear();
    }

    /// Hit, miss, and eviction counters
    pub fn stats(&self) -> DecisionCacheStats {
        self.inner.lock().stats
    }
}

// =============================================================================
// Cached Authorizer
// =============================================================================

/// [`AccessAuthorizer`] fronted by a [`DecisionCache`]
#[derive(Debug)]
pub struct CachedAuthorizer {
    authorizer: Arc<AccessAuthorizer>,
    cache: DecisionCache,
}

impl CachedAuthorizer {
    /// Front `authorizer` with a cache built from `config`
    pub fn new(authorizer: Arc<AccessAuthorizer>, config: DecisionCacheConfig) -> Self {
        Self {
            authorizer,
            cache: DecisionCache::new(config),
        }
    }

    /// Wrapped authorizer
    pub fn authorizer(&self) -> &Arc<AccessAuthorizer> {
        &self.authorizer
    }

    /// Underlying cache
    pub fn cache(&self) -> &DecisionCache {
        &self.cache
    }

    /// [`AccessAuthorizer::authorize_raw`], answering repeated cacheable
    /// requests from memory
    pub async fn authorize_raw(
        &self,
        requested_cid: &str,
        attestation_bytes: &[u8],
        signature: &[u8],
    ) -> AccessDecision {
        let now_ms = self.authorizer.now_ms();
        if let Some(decision) = self
            .cache
            .get(requested_cid, attestation_bytes, signature, now_ms)
        {
            tracing::trace!(cid = requested_cid, "decision served from cache");
            return decision;
        }

        let decision = self
            .authorizer
            .authorize_raw(requested_cid, attestation_bytes, signature)
            .await;
        if decision.should_cache() {
            if let Ok(attestation) = SignedAttestation::from_json_bytes(attestation_bytes) {
                self.remember(requested_cid, attestation_bytes, signature, &attestation, decision);
            }
        }
        decision
    }

    /// [`AccessAuthorizer::authorize`], answering repeated cacheable requests
    /// from memory
    pub async fn authorize(
        &self,
        requested_cid: &str,
        attestation: &SignedAttestation,
        signature: &[u8],
    ) -> AccessDecision {
        let Ok(payload) = attestation.canonical_bytes() else {
            return self
                .authorizer
                .authorize(requested_cid, attestation, signature)
                .await;
        };
        let now_ms = self.authorizer.now_ms();
        if let Some(decision) = self.cache.get(requested_cid, &payload, signature, now_ms) {
            tracing::trace!(cid = requested_cid, "decision served from cache");
            return decision;
        }

        let decision = self
            .authorizer
            .authorize(requested_cid, attestation, signature)
            .await;
        self.remember(requested_cid, &payload, signature, attestation, decision);
        decision
    }

    fn remember(
        &self,
        requested_cid: &str,
        payload: &[u8],
        signature: &[u8],
        attestation: &SignedAttestation,
        decision: AccessDecision,
    ) {
        let expires_at_ms = self
            .authorizer
            .freshness()
            .expires_at_ms(attestation.timestamp_ms());
        self.cache.insert(
            requested_cid,
            payload,
            signature,
            decision,
            self.authorizer.now_ms(),
            expires_at_ms,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ward_core::DenialKind;

    fn cache(ttl_ms: u64, max_entries: usize) -> DecisionCache {
        DecisionCache::new(DecisionCacheConfig {
            ttl_ms,
            max_entries,
        })
    }

    #[test]
    fn denials_are_never_stored() {
        let cache = cache(1_000, 10);
        let stored = cache.insert(
            "Qm1",
            b"p",
            b"s",
            AccessDecision::denied(DenialKind::ContentBlocked),
            0,
            u64::MAX,
        );
        assert!(!stored);
        assert!(cache.is_empty());
    }

    #[test]
    fn non_cacheable_grants_are_not_stored() {
        let cache = cache(1_000, 10);
        assert!(!cache.insert("Qm1", b"p", b"s", AccessDecision::authorized(1, false), 0, u64::MAX));
    }

    #[test]
    fn entries_expire_after_ttl() {
        let cache = cache(1_000, 10);
        let decision = AccessDecision::authorized(1, true);
        assert!(cache.insert("Qm1", b"p", b"s", decision, 100, u64::MAX));
        assert_eq!(cache.get("Qm1", b"p", b"s", 1_099), Some(decision));
        assert_eq!(cache.get("Qm1", b"p", b"s", 1_100), None);
    }

    #[test]
    fn entries_never_outlive_attestation_freshness() {
        let cache = cache(60_000, 10);
        let decision = AccessDecision::authorized(1, true);
        assert!(cache.insert("Qm1", b"p", b"s", decision, 100, 500));
        assert_eq!(cache.get("Qm1", b"p", b"s", 500), Some(decision));
        assert_eq!(cache.get("Qm1", b"p", b"s", 501), None);
    }

    #[test]
    fn key_covers_cid_payload_and_signature() {
        let cache = cache(1_000, 10);
        cache.insert("Qm1", b"p", b"s", AccessDecision::authorized(1, true), 0, u64::MAX);
        assert!(cache.get("Qm2", b"p", b"s", 1).is_none());
        assert!(cache.get("Qm1", b"q", b"s", 1).is_none());
        assert!(cache.get("Qm1", b"p", b"t", 1).is_none());
        assert!(cache.get("Qm1", b"p", b"s", 1).is_some());
    }

    #[test]
    fn capacity_evicts_oldest_first() {
        let cache = cache(1_000, 2);
        let decision = AccessDecision::authorized(1, true);
        cache.insert("a", b"p", b"s", decision, 0, u64::MAX);
        cache.insert("b", b"p", b"s", decision, 0, u64::MAX);
        cache.insert("c", b"p", b"s", decision, 0, u64::MAX);

        assert_eq!(cache.len(), 2);
        assert!(cache.get("a", b"p", b"s", 1).is_none());
        assert!(cache.get("b", b"p", b"s", 1).is_some());
        assert!(cache.get("c", b"p", b"s", 1).is_some());
        assert_eq!(cache.stats().evictions, 1);
    }

    #[test]
    fn reinserting_a_key_refreshes_its_position() {
        let cache = cache(1_000, 2);
        let decision = AccessDecision::authorized(1, true);
        cache.insert("a", b"p", b"s", decision, 0, u64::MAX);
        cache.insert("b", b"p", b"s", decision, 0, u64::MAX);
        cache.insert("a", b"p", b"s", decision, 0, u64::MAX);
        cache.insert("c", b"p", b"s", decision, 0, u64::MAX);

        assert!(cache.get("a", b"p", b"s", 1).is_some());
        assert!(cache.get("b", b"p", b"s", 1).is_none());
    }
}
