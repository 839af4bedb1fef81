//! Attestation freshness window

/// Whether an attestation signed at `timestamp_ms` is too old at `now_ms`.
///
/// Expired means strictly older than `max_age_ms`: an attestation exactly
/// `max_age_ms` old is still fresh. A timestamp in the future (signer clock
/// ahead of ours) is never expired.
pub fn is_expired(timestamp_ms: u64, max_age_ms: u64, now_ms: u64) -> bool {
    match now_ms.checked_sub(timestamp_ms) {
        Some(age_ms) => age_ms > max_age_ms,
        None => false,
    }
}

/// Freshness check bound to a configured window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FreshnessGuard {
    max_age_ms: u64,
}

impl FreshnessGuard {
    /// Guard accepting attestations up to `max_age_ms` old
    pub fn new(max_age_ms: u64) -> Self {
        Self { max_age_ms }
    }

    /// Configured window
    pub fn max_age_ms(&self) -> u64 {
        self.max_age_ms
    }

    /// See [`is_expired`]
    pub fn is_expired(&self, timestamp_ms: u64, now_ms: u64) -> bool {
        is_expired(timestamp_ms, self.max_age_ms, now_ms)
    }

    /// Instant after which an attestation signed at `timestamp_ms` is expired
    pub fn expires_at_ms(&self, timestamp_ms: u64) -> u64 {
        timestamp_ms.saturating_add(self.max_age_ms)
    }
}
