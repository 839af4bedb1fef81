#![deny(clippy::await_holding_lock)]
//! # Ward Registry
//!
//! Answers "is this wallet a currently registered discovery node" from a
//! process-wide snapshot of the registry.
//!
//! The snapshot is replaced wholesale on each successful fetch and readers
//! always observe a complete list. At most one fetch is in flight per cache.
//! When a fetch fails the previous snapshot keeps serving; only a cache that
//! has never fetched successfully reports [`RegistryError::Unavailable`].

mod cache;
mod config;
mod refresher;
mod snapshot;

pub use cache::{NodeRegistryCache, RegistryError};
pub use config::RegistryCacheConfig;
pub use refresher::{spawn_refresher, RegistryRefresher};
pub use snapshot::RegistrySnapshot;
