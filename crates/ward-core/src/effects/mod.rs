//! Effect traits for the collaborators the authorization core consumes.
//!
//! # Effect Classification
//!
//! - **Category**: Infrastructure Effect
//! - **Implementation**: `ward-effects` (production), `ward-testkit` (mocks)
//! - **Usage**: `ward-registry` and `ward-authorization`
//!
//! The core only ever reads through these traits. It never writes to the node
//! registry or the blacklist store.

pub mod blacklist;
pub mod registry;
pub mod time;

pub use blacklist::BlacklistStore;
pub use registry::RegistrySource;
pub use time::PhysicalTimeEffects;
