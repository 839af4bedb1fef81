//! In-memory blacklist store
//!
//! Suitable for a node that receives moderation updates out of band and keeps
//! the full list resident. Lookups never suspend.

use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use ward_core::{BlacklistStore, Result, WardError};

/// On-disk form of a blacklist: `{ "cids": [...], "content_ids": [...] }`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BlacklistFile {
    /// Blocked CIDs
    pub cids: Vec<String>,
    /// Blocked logical content ids
    pub content_ids: Vec<u64>,
}

#[derive(Debug, Default)]
struct Entries {
    cids: HashSet<String>,
    content_ids: HashSet<u64>,
}

/// Blacklist held entirely in memory
#[derive(Debug, Default)]
pub struct InMemoryBlacklist {
    entries: RwLock<Entries>,
}

impl InMemoryBlacklist {
    /// Empty blacklist
    pub fn new() -> Self {
        Self::default()
    }

    /// Blacklist seeded from a parsed file
    pub fn from_file_contents(file: BlacklistFile) -> Self {
        let blacklist = Self::new();
        blacklist.replace(file);
        blacklist
    }

    /// Load from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path).map_err(|e| {
            WardError::invalid(format!("failed to read blacklist {}: {e}", path.display()))
        })?;
        let file: BlacklistFile = serde_json::from_slice(&bytes)?;
        tracing::info!(
            path = %path.display(),
            cids = file.cids.len(),
            content_ids = file.content_ids.len(),
            "loaded blacklist"
        );
        Ok(Self::from_file_contents(file))
    }

    /// Atomically swap in a new list
    pub fn replace(&self, file: BlacklistFile) {
        let entries = Entries {
            cids: file.cids.into_iter().collect(),
            content_ids: file.content_ids.into_iter().collect(),
        };
        *self.entries.write() = entries;
    }

    /// Block a CID. Returns whether it was newly blocked.
    pub fn block_cid(&self, cid: impl Into<String>) -> bool {
        self.entries.write().cids.insert(cid.into())
    }

    /// Lift a CID block. Returns whether it was blocked.
    pub fn unblock_cid(&self, cid: &str) -> bool {
        self.entries.write().cids.remove(cid)
    }

    /// Block a content id. Returns whether it was newly blocked.
    pub fn block_content_id(&self, content_id: u64) -> bool {
        self.entries.write().content_ids.insert(content_id)
    }

    /// Lift a content-id block. Returns whether it was blocked.
    pub fn unblock_content_id(&self, content_id: u64) -> bool {
        self.entries.write().content_ids.remove(&content_id)
    }

    /// Current contents, sorted
    pub fn snapshot(&self) -> BlacklistFile {
        let entries = self.entries.read();
        let mut cids: Vec<String> = entries.cids.iter().cloned().collect();
        let mut content_ids: Vec<u64> = entries.content_ids.iter().copied().collect();
        cids.sort();
        content_ids.sort_unstable();
        BlacklistFile { cids, content_ids }
    }
}

#[async_trait]
impl BlacklistStore for InMemoryBlacklist {
    async fn is_cid_blocked(&self, cid: &str) -> Result<bool> {
        Ok(self.entries.read().cids.contains(cid))
    }

    async fn is_content_id_blocked(&self, content_id: u64) -> Result<bool> {
        Ok(self.entries.read().content_ids.contains(&content_id))
    }
}
