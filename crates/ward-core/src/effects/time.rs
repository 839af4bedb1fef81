//! Physical clock effect.

use std::sync::Arc;

/// Wall-clock time source.
///
/// Reading the clock never suspends, so freshness checks stay pure CPU work.
/// Tests substitute a controllable clock to hit freshness boundaries exactly.
pub trait PhysicalTimeEffects: Send + Sync {
    /// Milliseconds since the Unix epoch
    fn now_ms(&self) -> u64;
}

impl<T: PhysicalTimeEffects + ?Sized> PhysicalTimeEffects for Arc<T> {
    fn now_ms(&self) -> u64 {
        (**self).now_ms()
    }
}
