//! Time capabilities for the poll loop.
//!
//! The poll loop never reads the system clock or sleeps directly; it goes
//! through these traits so tests can advance time instantly.

use std::time::{Duration, Instant};

/// Monotonic time source.
pub trait Clock {
    /// Current instant. Must never move backwards.
    fn now(&self) -> Instant;
}

/// Production clock backed by `std::time::Instant`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Blocking sleep between probes.
pub trait Sleep {
    /// Block the calling thread for `duration`.
    fn sleep(&self, duration: Duration);
}

/// Production sleep backed by `std::thread::sleep`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadSleep;

impl Sleep for ThreadSleep {
    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}
