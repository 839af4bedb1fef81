//! Node registry records
//!
//! Entries are created and removed by on-chain governance. This crate only ever
//! reads snapshots of them.

use super::Address;
use serde::{Deserialize, Serialize};

/// Role a registered node plays in the network
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeType {
    /// Indexes protocol state and signs content-access attestations
    Discovery,
    /// Stores and serves content bytes
    Content,
}

/// Entry from the authoritative node registry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveryNodeRecord {
    /// Identity whose signature the storage node expects
    pub delegate_owner_wallet: Address,
    /// Public endpoint of the node
    pub endpoint: String,
    /// Registered role
    pub node_type: NodeType,
}

impl DiscoveryNodeRecord {
    /// Create a discovery-node record
    pub fn discovery(delegate_owner_wallet: Address, endpoint: impl Into<String>) -> Self {
        Self {
            delegate_owner_wallet,
            endpoint: endpoint.into(),
            node_type: NodeType::Discovery,
        }
    }

    /// Whether this record may sign attestations
    pub fn is_discovery(&self) -> bool {
        self.node_type == NodeType::Discovery
    }
}
