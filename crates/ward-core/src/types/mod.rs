//! Request-scoped value objects and registry records.

mod address;
mod attestation;
mod decision;
mod node;

pub use address::Address;
pub use attestation::{AttestationError, SignedAttestation, MAX_CID_LEN};
pub use decision::{AccessDecision, DenialKind};
pub use node::{DiscoveryNodeRecord, NodeType};
