//! # Ward Authorization
//!
//! Decides whether a storage node may serve a requested CID to a client
//! presenting an attestation signed by a discovery node.
//!
//! [`AccessAuthorizer`] runs a linear, short-circuiting pipeline:
//!
//! 1. recover the signer from the signature (pure)
//! 2. compare the attested CID with the requested CID (pure)
//! 3. check the attestation is inside the freshness window (pure)
//! 4. confirm the signer is a registered discovery node (cached I/O)
//! 5. confirm neither the CID nor its content id is blacklisted (I/O)
//!
//! The pure checks run first so malformed or misdirected requests never cost
//! a network round trip. The result is always an [`AccessDecision`]; no error
//! escapes to the caller.
//!
//! Registry and blacklist failures are handled asymmetrically. A registry
//! outage is served from the last good snapshot, while a blacklist outage
//! denies the request.
//!
//! [`AccessDecision`]: ward_core::AccessDecision

mod authorizer;
mod blacklist;
mod config;
mod decision_cache;
mod freshness;

pub use authorizer::AccessAuthorizer;
pub use blacklist::{BlacklistGate, BlacklistOutcome};
pub use config::{AuthorizerConfig, BlacklistConfig, DecisionCacheConfig};
pub use decision_cache::{CachedAuthorizer, DecisionCache, DecisionCacheStats};
pub use freshness::{is_expired, FreshnessGuard};
