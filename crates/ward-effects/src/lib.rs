//! # Ward Effects - Production Handlers
//!
//! Stateless or self-contained implementations of the `ward-core` effect
//! traits. Mocks belong in `ward-testkit`, not here.

mod blacklist;
mod registry;
mod time;

pub use blacklist::{BlacklistFile, InMemoryBlacklist};
pub use registry::StaticRegistrySource;
pub use time::SystemClock;
