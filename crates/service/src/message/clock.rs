use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;

/// Source of timestamps, in nanoseconds since the Unix epoch.
pub trait Clock: Send + Sync {
    fn now(&self) -> u64;
}

/// Wall clock that never goes backwards: a reading earlier than the previous
/// one (e.g. after an NTP step) returns the previous value instead.
#[derive(Debug, Default)]
pub struct SystemClock {
    last: AtomicU64,
}

impl SystemClock {
    pub fn new() -> Self { Self::default() }
}

impl Clock for SystemClock {
    fn now(&self) -> u64 {
        let wall = Utc::now()
            .timestamp_nanos_opt()
            .and_then(|n| u64::try_from(n).ok())
            .unwrap_or(0);
        let prev = self.last.fetch_max(wall, Ordering::AcqRel);
        prev.max(wall)
    }
}
