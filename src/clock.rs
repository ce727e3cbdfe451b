//! Time abstraction so the tick-driven scheduling in `engine` is testable
//! without sleeping. Grounded on `merkle-tox-core::clock`'s
//! `TimeProvider`/`ManualTimeProvider`/`SystemTimeProvider` split, trimmed
//! of that crate's multi-peer consensus clock (`NetworkClock`), since this
//! protocol only ever reasons about its own local monotonic clock.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// A source of monotonic time for the engine.
pub trait TimeProvider: Send + Sync {
    fn now(&self) -> Instant;
}

/// The real wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemTimeProvider;

impl TimeProvider for SystemTimeProvider {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A manually-advanced clock for deterministic tests.
///
/// Stores an offset (in milliseconds) from a fixed base `Instant` rather
/// than an `Instant` directly, since `Instant` has no const/zero value to
/// initialize an atomic with.
pub struct ManualTimeProvider {
    base: Instant,
    offset_ms: AtomicU64,
}

impl ManualTimeProvider {
    pub fn new() -> Self {
        Self {
            base: Instant::now(),
            offset_ms: AtomicU64::new(0),
        }
    }

    /// Advances the clock by `d`.
    pub fn advance(&self, d: Duration) {
        self.offset_ms
            .fetch_add(d.as_millis() as u64, Ordering::SeqCst);
    }
}

impl Default for ManualTimeProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeProvider for ManualTimeProvider {
    fn now(&self) -> Instant {
        self.base + Duration::from_millis(self.offset_ms.load(Ordering::SeqCst))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_advances_monotonically() {
        let clock = ManualTimeProvider::new();
        let t0 = clock.now();
        clock.advance(Duration::from_secs(5));
        let t1 = clock.now();
        assert_eq!(t1 - t0, Duration::from_secs(5));
    }
}
