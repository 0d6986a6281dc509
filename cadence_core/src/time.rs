// Copyright 2026 the Cadence Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Monotonic timestamps and intervals, in nanoseconds.
//!
//! [`Timestamp`] is a point on an arbitrary monotonic epoch; [`Interval`] is
//! a span between two timestamps. The core fixes its unit to nanoseconds —
//! hosts whose display clocks run in platform ticks convert before handing
//! times in. Rate-limit configuration is most naturally written in
//! milliseconds, so [`Interval`] carries millisecond and second
//! constructors.

use core::fmt;
use core::ops::{Add, Sub};

/// A point in time, in nanoseconds on an arbitrary monotonic epoch.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Timestamp(pub u64);

impl Timestamp {
    /// The epoch itself (zero nanoseconds).
    pub const ZERO: Self = Self(0);

    /// Returns the raw nanosecond value.
    #[inline]
    #[must_use]
    pub const fn nanos(self) -> u64 {
        self.0
    }

    /// Returns the interval between `self` and an earlier time, or zero if
    /// `earlier` is after `self`.
    #[inline]
    #[must_use]
    pub const fn saturating_since(self, earlier: Self) -> Interval {
        Interval(self.0.saturating_sub(earlier.0))
    }

    /// Checked addition of an interval.
    #[inline]
    #[must_use]
    pub const fn checked_add(self, interval: Interval) -> Option<Self> {
        match self.0.checked_add(interval.0) {
            Some(t) => Some(Self(t)),
            None => None,
        }
    }
}

impl Add<Interval> for Timestamp {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Interval) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sub<Interval> for Timestamp {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Interval) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl Sub for Timestamp {
    type Output = Interval;

    #[inline]
    fn sub(self, rhs: Self) -> Interval {
        Interval(self.0 - rhs.0)
    }
}

impl fmt::Debug for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Timestamp({}ns)", self.0)
    }
}

/// A span of time in nanoseconds.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Interval(pub u64);

impl Interval {
    /// A zero-length interval.
    pub const ZERO: Self = Self(0);

    /// Creates an interval from whole seconds.
    #[inline]
    #[must_use]
    pub const fn from_secs(secs: u64) -> Self {
        Self(secs * 1_000_000_000)
    }

    /// Creates an interval from milliseconds.
    #[inline]
    #[must_use]
    pub const fn from_millis(millis: u64) -> Self {
        Self(millis * 1_000_000)
    }

    /// Creates an interval from microseconds.
    #[inline]
    #[must_use]
    pub const fn from_micros(micros: u64) -> Self {
        Self(micros * 1_000)
    }

    /// Returns the raw nanosecond value.
    #[inline]
    #[must_use]
    pub const fn nanos(self) -> u64 {
        self.0
    }

    /// Returns this interval in whole milliseconds, truncating.
    #[inline]
    #[must_use]
    pub const fn as_millis(self) -> u64 {
        self.0 / 1_000_000
    }

    /// Saturating addition.
    #[inline]
    #[must_use]
    pub const fn saturating_add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }

    /// Saturating subtraction.
    #[inline]
    #[must_use]
    pub const fn saturating_sub(self, rhs: Self) -> Self {
        Self(self.0.saturating_sub(rhs.0))
    }
}

impl Add for Interval {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Interval {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl fmt::Debug for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Interval({}ns)", self.0)
    }
}
