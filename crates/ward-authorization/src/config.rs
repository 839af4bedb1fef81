//! Authorizer configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;
use ward_core::config::parse_value;
use ward_core::{ConfigValidator, Result, WardConfig};
use ward_registry::RegistryCacheConfig;
use ward_signature::DigestScheme;

const HOUR_MS: u64 = 60 * 60 * 1000;

/// Every tunable the authorization pipeline reads.
///
/// ```toml
/// max_attestation_age_ms = 172800000
/// digest_scheme = "raw"
///
/// [registry]
/// refresh_interval_ms = 300000
/// fetch_timeout_ms = 5000
///
/// [blacklist]
/// query_timeout_ms = 1000
///
/// [decision_cache]
/// ttl_ms = 60000
/// max_entries = 10000
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthorizerConfig {
    /// Oldest attestation accepted, in milliseconds
    pub max_attestation_age_ms: u64,
    /// How signed digests are derived from payload bytes
    pub digest_scheme: DigestScheme,
    /// Registry cache tuning
    pub registry: RegistryCacheConfig,
    /// Blacklist lookups
    pub blacklist: BlacklistConfig,
    /// Caller-side memoization of cacheable decisions
    pub decision_cache: DecisionCacheConfig,
}

impl Default for AuthorizerConfig {
    fn default() -> Self {
        Self {
            max_attestation_age_ms: 48 * HOUR_MS,
            digest_scheme: DigestScheme::Raw,
            registry: RegistryCacheConfig::default(),
            blacklist: BlacklistConfig::default(),
            decision_cache: DecisionCacheConfig::default(),
        }
    }
}

/// Blacklist query settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlacklistConfig {
    /// Bound on each of the two concurrent lookups
    pub query_timeout_ms: u64,
}

impl Default for BlacklistConfig {
    fn default() -> Self {
        Self {
            query_timeout_ms: 1_000,
        }
    }
}

impl BlacklistConfig {
    /// Query timeout as a `Duration`
    pub fn query_timeout(&self) -> Duration {
        Duration::from_millis(self.query_timeout_ms)
    }
}

/// Decision cache settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecisionCacheConfig {
    /// Upper bound on how long a decision is memoized
    pub ttl_ms: u64,
    /// Entries kept before the oldest are evicted
    pub max_entries: usize,
}

impl Default for DecisionCacheConfig {
    fn default() -> Self {
        Self {
            ttl_ms: 60_000,
            max_entries: 10_000,
        }
    }
}

impl WardConfig for AuthorizerConfig {
    fn set_from_string(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "max_attestation_age_ms" => self.max_attestation_age_ms = parse_value(key, value)?,
            "digest_scheme" => self.digest_scheme = parse_value(key, value)?,
            "registry.refresh_interval_ms" => {
                self.registry.refresh_interval_ms = parse_value(key, value)?;
            }
            "registry.fetch_timeout_ms" => self.registry.fetch_timeout_ms = parse_value(key, value)?,
            "registry.retry_backoff_ms" => {
                self.registry.retry_backoff_ms = parse_value(key, value)?;
            }
            "blacklist.query_timeout_ms" => {
                self.blacklist.query_timeout_ms = parse_value(key, value)?;
            }
            "decision_cache.ttl_ms" => self.decision_cache.ttl_ms = parse_value(key, value)?,
            "decision_cache.max_entries" => {
                self.decision_cache.max_entries = parse_value(key, value)?;
            }
            _ => {}
        }
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        let mut validator = ConfigValidator::new();
        validator.require_positive("max_attestation_age_ms", self.max_attestation_age_ms);

        let mut registry = validator.for_field("registry");
        self.registry.validate_into(&mut registry);
        validator.merge(registry);

        let mut blacklist = validator.for_field("blacklist");
        blacklist.require_positive("query_timeout_ms", self.blacklist.query_timeout_ms);
        validator.merge(blacklist);

        let mut cache = validator.for_field("decision_cache");
        cache
            .require_positive("ttl_ms", self.decision_cache.ttl_ms)
            .require_positive("max_entries", self.decision_cache.max_entries as u64);
        validator.merge(cache);

        validator.finish()
    }
}
