use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Controllable time for deterministic UUIDs.
///
/// Pass `as_provider()` to `UuidGenerator::with_time_provider()`.
#[derive(Clone)]
pub struct MockClock {
    /// Nanoseconds since the Unix epoch.
    current: Arc<AtomicU64>,
}

impl MockClock {
    /// Create a clock frozen at `secs` after the Unix epoch
    pub fn at(secs: u64) -> Self {
        Self {
            current: Arc::new(AtomicU64::new(secs * 1_000_000_000)),
        }
    }

    /// Creates a time provider function reading this clock.
    pub fn as_provider(&self) -> impl Fn() -> Duration + Send + Sync + 'static {
        let current = self.current.clone();
        move || Duration::from_nanos(current.load(Ordering::SeqCst))
    }

    /// Get current time
    pub fn now(&self) -> Duration {
        Duration::from_nanos(self.current.load(Ordering::SeqCst))
    }

    /// Advance time by duration
    pub fn advance(&self, duration: Duration) {
        self.current
            .fetch_add(duration.as_nanos() as u64, Ordering::SeqCst);
    }

    /// Move time backwards, as after an NTP correction
    pub fn rewind(&self, duration: Duration) {
        self.current
            .fetch_sub(duration.as_nanos() as u64, Ordering::SeqCst);
    }
}

impl Default for MockClock {
    fn default() -> Self {
        // 2016-07-10T12:00:00Z
        Self::at(1_468_152_000)
    }
}
