//! # Ward Core - Layer 1: Shared Data Model
//!
//! Types, unified errors, and effect traits shared by every Ward crate.
//!
//! - [`types`]: `Address`, `SignedAttestation`, `AccessDecision`, `DenialKind`,
//!   and the discovery-node registry records the storage node reads.
//! - [`effects`]: traits for the collaborators the authorization core consumes
//!   (node registry source, blacklist store, physical clock).
//! - [`config`]: configuration loading, environment overlays, and validation.
//!
//! Nothing in this crate performs I/O on its own. Production handlers live in
//! `ward-effects`; test doubles live in `ward-testkit`.

pub mod config;
pub mod effects;
pub mod errors;
pub mod types;

pub use config::{ConfigValidator, ValidationError, WardConfig};
pub use effects::{BlacklistStore, PhysicalTimeEffects, RegistrySource};
pub use errors::{Result, WardError};
pub use types::{
    AccessDecision, Address, AttestationError, DenialKind, DiscoveryNodeRecord, NodeType,
    SignedAttestation, MAX_CID_LEN,
};
