// Copyright 2026 the Wake Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Monotonic frame time.
//!
//! [`HostTime`] is a point in time as monotonic nanoseconds; the frame
//! driver samples it once per update call from whatever platform clock it
//! has. [`FrameClock`] accumulates those samples into the elapsed seconds
//! that drive birth times and fade-out.
//!
//! The first sample after construction or a [`resync`](FrameClock::resync)
//! contributes no delta: there is no previous timestamp to difference
//! against, and a large spurious jump would expire every sample at once.

use core::fmt;

const NANOS_PER_SEC: f64 = 1_000_000_000.0;

/// A point in time expressed as monotonic nanoseconds.
///
/// Only differences between values are meaningful; the epoch is whatever
/// the driver's clock uses.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct HostTime(pub u64);

impl HostTime {
    /// Returns the raw nanosecond value.
    #[inline]
    #[must_use]
    pub const fn nanos(self) -> u64 {
        self.0
    }

    /// Creates a [`HostTime`] from whole milliseconds.
    #[inline]
    #[must_use]
    pub const fn from_millis(millis: u64) -> Self {
        Self(millis * 1_000_000)
    }

    /// Returns the duration since an earlier time in seconds, or zero if
    /// `earlier` is after `self`.
    #[inline]
    #[must_use]
    pub fn saturating_secs_since(self, earlier: Self) -> f64 {
        self.0.saturating_sub(earlier.0) as f64 / NANOS_PER_SEC
    }
}

impl fmt::Debug for HostTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HostTime({})", self.0)
    }
}

/// Accumulates per-frame wall-clock deltas into elapsed seconds.
///
/// Each updater owns one. [`advance`](Self::advance) is called once per
/// update with the current [`HostTime`]; the returned delta is zero on the
/// first call after construction or [`resync`](Self::resync).
#[derive(Clone, Debug)]
pub struct FrameClock {
    last: Option<HostTime>,
    elapsed: f32,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock {
    /// Creates a clock with zero elapsed time.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            last: None,
            elapsed: 0.0,
        }
    }

    /// Creates a clock pre-advanced to `elapsed` seconds.
    ///
    /// Used by the particle emitter to make zero-initialized records (birth
    /// time 0) start out already expired.
    #[must_use]
    pub const fn with_elapsed(elapsed: f32) -> Self {
        Self {
            last: None,
            elapsed,
        }
    }

    /// Feeds one timestamp and returns the delta in seconds since the
    /// previous one (zero on the first call after construction or
    /// [`resync`](Self::resync)).
    #[expect(
        clippy::cast_possible_truncation,
        reason = "frame deltas are far below f32 range; f64 intermediate keeps the subtraction exact"
    )]
    pub fn advance(&mut self, now: HostTime) -> f32 {
        let delta = match self.last {
            Some(last) => now.saturating_secs_since(last) as f32,
            None => 0.0,
        };
        self.last = Some(now);
        self.elapsed += delta;
        delta
    }

    /// Total accumulated seconds.
    #[inline]
    #[must_use]
    pub const fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Forgets the previous timestamp, so the next [`advance`](Self::advance)
    /// contributes no delta. Elapsed time is preserved.
    pub const fn resync(&mut self) {
        self.last = None;
    }
}
