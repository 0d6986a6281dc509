// Copyright 2026 the Cadence Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Injectable time sources.
//!
//! The reporting cadence must be deterministically testable, so the reporter
//! never reads platform time directly. It is parameterized over a [`Clock`]:
//!
//! - [`MonotonicClock`] (`std` feature) reads `std::time::Instant` for
//!   production use.
//! - [`ManualClock`] is an explicitly advanceable clock. Clones share the
//!   same underlying time, so a test can keep one handle for advancing while
//!   the reporter owns another.

use alloc::sync::Arc;
use core::sync::atomic::{AtomicU64, Ordering};

use crate::time::{Interval, Timestamp};

/// A monotonic time source.
///
/// `now` takes `&self` so that clock handles can be shared between the
/// reporter and the host (or a test harness) without synchronization beyond
/// what the implementation itself provides.
pub trait Clock {
    /// Returns the current time.
    fn now(&self) -> Timestamp;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> Timestamp {
        (**self).now()
    }
}

/// An advanceable clock for deterministic tests and simulations.
///
/// All clones observe the same time; advancing any handle advances them
/// all.
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    nanos: Arc<AtomicU64>,
}

impl ManualClock {
    /// Creates a clock at time zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Advances the clock by the given interval.
    pub fn advance(&self, interval: Interval) {
        self.nanos.fetch_add(interval.nanos(), Ordering::Relaxed);
    }

    /// Sets the clock to an absolute time.
    ///
    /// Monotonicity is the caller's responsibility; the reporter tolerates a
    /// backwards step by treating elapsed time as zero.
    pub fn set(&self, time: Timestamp) {
        self.nanos.store(time.nanos(), Ordering::Relaxed);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        Timestamp(self.nanos.load(Ordering::Relaxed))
    }
}

/// A production clock backed by `std::time::Instant`.
///
/// Timestamps are nanoseconds since the clock's construction.
#[cfg(feature = "std")]
#[derive(Clone, Copy, Debug)]
pub struct MonotonicClock {
    origin: std::time::Instant,
}

#[cfg(feature = "std")]
impl MonotonicClock {
    /// Creates a clock whose epoch is the moment of construction.
    #[must_use]
    pub fn new() -> Self {
        Self {
            origin: std::time::Instant::now(),
        }
    }
}

#[cfg(feature = "std")]
impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "std")]
impl Clock for MonotonicClock {
    #[expect(
        clippy::cast_possible_truncation,
        reason = "u64 nanoseconds cover ~584 years of process uptime"
    )]
    fn now(&self) -> Timestamp {
        Timestamp(self.origin.elapsed().as_nanos() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_starts_at_zero() {
        let clock = ManualClock::new();
        assert_eq!(clock.now(), Timestamp::ZERO);
    }

    #[test]
    fn advance_accumulates() {
        let clock = ManualClock::new();
        clock.advance(Interval::from_millis(600));
        clock.advance(Interval::from_millis(200));
        assert_eq!(clock.now(), Timestamp(800_000_000));
    }

    #[test]
    fn clones_share_time() {
        let clock = ManualClock::new();
        let handle = clock.clone();
        handle.advance(Interval::from_millis(10));
        assert_eq!(clock.now(), Timestamp(10_000_000));
    }

    #[test]
    fn set_overrides() {
        let clock = ManualClock::new();
        clock.advance(Interval::from_secs(5));
        clock.set(Timestamp(42));
        assert_eq!(clock.now(), Timestamp(42));
    }

    #[cfg(feature = "std")]
    #[test]
    fn monotonic_clock_does_not_go_backwards() {
        let clock = MonotonicClock::new();
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a, "monotonic clock regressed");
    }
}
