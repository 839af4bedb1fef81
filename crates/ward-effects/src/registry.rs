//! Registry source backed by a fixed list or a JSON file
//!
//! The file form is re-read on every fetch, so an operator can rotate the
//! registry by rewriting the file and the cache picks it up on its next
//! refresh. The file holds a JSON array of records:
//!
//! ```json
//! [
//!   {
//!     "delegate_owner_wallet": "0x7e5f4552091a69125d5dfcb7b8c2659029395bdf",
//!     "endpoint": "https://dn1.example.org",
//!     "node_type": "discovery"
//!   }
//! ]
//! ```

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use ward_core::{DiscoveryNodeRecord, RegistrySource, Result, WardError};

#[derive(Debug, Clone)]
enum Backing {
    Records(Vec<DiscoveryNodeRecord>),
    File(PathBuf),
}

/// Registry source for deployments without a chain indexer
#[derive(Debug, Clone)]
pub struct StaticRegistrySource {
    backing: Backing,
}

impl StaticRegistrySource {
    /// Serve exactly `records`
    pub fn from_records(records: Vec<DiscoveryNodeRecord>) -> Self {
        Self {
            backing: Backing::Records(records),
        }
    }

    /// Serve whatever `path` holds at fetch time
    pub fn from_file(path: impl Into<PathBuf>) -> Self {
        Self {
            backing: Backing::File(path.into()),
        }
    }

    async fn read_file(path: &Path) -> Result<Vec<DiscoveryNodeRecord>> {
        let bytes = tokio::fs::read(path).await.map_err(|e| {
            WardError::network(format!("failed to read registry file {}: {e}", path.display()))
        })?;
        let records: Vec<DiscoveryNodeRecord> = serde_json::from_slice(&bytes)?;
        tracing::debug!(path = %path.display(), records = records.len(), "loaded registry file");
        Ok(records)
    }
}

#[async_trait]
impl RegistrySource for StaticRegistrySource {
    async fn list_discovery_nodes(&self) -> Result<Vec<DiscoveryNodeRecord>> {
        match &self.backing {
            Backing::Records(records) => Ok(records.clone()),
            Backing::File(path) => Self::read_file(path).await,
        }
    }
}
