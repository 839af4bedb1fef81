//! Registry cache tuning.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use ward_core::ConfigValidator;

/// How often the snapshot is refreshed and how long a fetch may take
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryCacheConfig {
    /// Snapshot age beyond which a lookup triggers a refresh
    pub refresh_interval_ms: u64,
    /// Bound on a single registry fetch
    pub fetch_timeout_ms: u64,
    /// After a failed refresh, serve the stale snapshot without fetching for
    /// this long. Zero retries on the next stale lookup.
    pub retry_backoff_ms: u64,
}

impl Default for RegistryCacheConfig {
    fn default() -> Self {
        Self {
            refresh_interval_ms: 5 * 60 * 1000,
            fetch_timeout_ms: 5_000,
            retry_backoff_ms: 10_000,
        }
    }
}

impl RegistryCacheConfig {
    /// Refresh interval as a `Duration`
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_interval_ms)
    }

    /// Fetch timeout as a `Duration`
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }

    /// Add this section's rules to `validator`
    pub fn validate_into(&self, validator: &mut ConfigValidator) {
        validator
            .require_positive("refresh_interval_ms", self.refresh_interval_ms)
            .require_positive("fetch_timeout_ms", self.fetch_timeout_ms);
    }
}
