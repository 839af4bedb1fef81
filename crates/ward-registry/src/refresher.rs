//! Background registry refresh
//!
//! Keeps the snapshot warm so request paths rarely pay for a synchronous
//! fetch. Failures are logged and retried on the next tick; the cache keeps
//! serving its previous snapshot in the meantime.

use crate::NodeRegistryCache;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Handle to a running refresh task. Dropping it stops the task.
#[derive(Debug)]
pub struct RegistryRefresher {
    handle: JoinHandle<()>,
}

impl RegistryRefresher {
    /// Stop refreshing
    pub fn stop(self) {
        self.handle.abort();
    }

    /// Whether the task has exited
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for RegistryRefresher {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Spawn a task that refreshes `cache` every `period`, starting immediately.
///
/// Must be called from within a tokio runtime.
pub fn spawn_refresher(cache: Arc<NodeRegistryCache>, period: Duration) -> RegistryRefresher {
    let handle = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            match cache.refresh().await {
                Ok(snapshot) => {
                    tracing::debug!(wallets = snapshot.len(), "background registry refresh");
                }
                Err(error) => {
                    tracing::warn!(%error, "background registry refresh failed");
                }
            }
        }
    });
    RegistryRefresher { handle }
}
