//! Immutable registry snapshot.

use std::collections::HashSet;
use ward_core::{Address, DiscoveryNodeRecord};

/// Wallets of every registered discovery node at one point in time.
///
/// Never mutated after construction; a refresh builds a new snapshot and
/// swaps the pointer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrySnapshot {
    wallets: HashSet<Address>,
    fetched_at_ms: u64,
}

impl RegistrySnapshot {
    /// Build a snapshot from registry records, keeping discovery nodes only
    pub fn from_records(records: &[DiscoveryNodeRecord], fetched_at_ms: u64) -> Self {
        let wallets = records
            .iter()
            .filter(|record| record.is_discovery())
            .map(|record| record.delegate_owner_wallet)
            .collect();
        Self {
            wallets,
            fetched_at_ms,
        }
    }

    /// Whether `wallet` belongs to a registered discovery node
    pub fn contains(&self, wallet: &Address) -> bool {
        self.wallets.contains(wallet)
    }

    /// Number of discovery-node wallets
    pub fn len(&self) -> usize {
        self.wallets.len()
    }

    /// Whether the registry listed no discovery nodes
    pub fn is_empty(&self) -> bool {
        self.wallets.is_empty()
    }

    /// When the snapshot was fetched, milliseconds since epoch
    pub fn fetched_at_ms(&self) -> u64 {
        self.fetched_at_ms
    }

    /// Snapshot age at `now_ms`; a clock that moved backwards reads as zero
    pub fn age_ms(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.fetched_at_ms)
    }
}
