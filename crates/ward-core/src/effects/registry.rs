//! Authoritative node registry source.

use crate::types::DiscoveryNodeRecord;
use crate::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Chain-indexed node registry.
///
/// Expected to be eventually consistent with on-chain state. Implementations
/// may perform network I/O; callers bound every call with a timeout.
#[async_trait]
pub trait RegistrySource: Send + Sync {
    /// List every registered node. The list is small and fully enumerable.
    async fn list_discovery_nodes(&self) -> Result<Vec<DiscoveryNodeRecord>>;
}

#[async_trait]
impl<T: RegistrySource + ?Sized> RegistrySource for Arc<T> {
    async fn list_discovery_nodes(&self) -> Result<Vec<DiscoveryNodeRecord>> {
        (**self).list_discovery_nodes().await
    }
}
