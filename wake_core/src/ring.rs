// Copyright 2026 the Wake Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fixed-capacity circular cursors.
//!
//! [`RingCursor`] is the index state shared by both updaters: `low` is the
//! oldest occupied slot, `high` the newest, `len` the occupied count.
//! Invariants: `0 <= len <= capacity`, and `high == (low + len - 1) %
//! capacity` whenever `len > 0`. Once the ring is full, every advance also
//! advances `low`, evicting the oldest sample in place.
//!
//! [`ParticleCursor`] extends the same accounting with bulk advancement (a
//! single frame can emit many records) and a monotonic `abs_len` counter of
//! everything ever emitted.

/// Circular index state for a ring of emitted samples.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RingCursor {
    low: u32,
    high: u32,
    len: u32,
    capacity: u32,
}

impl RingCursor {
    /// Creates an empty cursor over `capacity` slots.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    #[must_use]
    pub const fn new(capacity: u32) -> Self {
        assert!(capacity > 0, "ring capacity must be at least 1");
        Self {
            low: 0,
            high: 0,
            len: 0,
            capacity,
        }
    }

    /// Oldest occupied slot. Zero while empty.
    #[inline]
    #[must_use]
    pub const fn low(&self) -> u32 {
        self.low
    }

    /// Newest occupied slot. Zero while empty.
    #[inline]
    #[must_use]
    pub const fn high(&self) -> u32 {
        self.high
    }

    /// Number of occupied slots.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> u32 {
        self.len
    }

    /// Whether no slot is occupied.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Whether every slot is occupied.
    #[inline]
    #[must_use]
    pub const fn is_full(&self) -> bool {
        self.len == self.capacity
    }

    /// Total slot count.
    #[inline]
    #[must_use]
    pub const fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Occupies the next slot and returns its index.
    ///
    /// The first push seeds slot 0. Afterwards the cursor wraps modulo
    /// `capacity`; once full, `low` rotates along with `high` so the oldest
    /// sample is evicted.
    pub const fn push(&mut self) -> u32 {
        if self.len == 0 {
            self.low = 0;
            self.high = 0;
            self.len = 1;
            return 0;
        }
        let next = (self.high + 1) % self.capacity;
        if self.len == self.capacity {
            self.low = (self.low + 1) % self.capacity;
        } else {
            self.len += 1;
        }
        self.high = next;
        next
    }

    /// Returns to the empty state. Capacity is unchanged.
    pub const fn clear(&mut self) {
        self.low = 0;
        self.high = 0;
        self.len = 0;
    }
}

/// Ring cursor for bulk particle emission.
///
/// Tracks the same `low`/`high`/`len` view as [`RingCursor`], plus
/// `abs_len`: the total number of records ever emitted, which only grows.
/// Consumers use it for emission statistics and as a shader-facing
/// parameter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParticleCursor {
    /// Next slot to write.
    next: u32,
    len: u32,
    abs_len: u64,
    capacity: u32,
}

impl ParticleCursor {
    /// Creates an empty cursor over `capacity` slots.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    #[must_use]
    pub const fn new(capacity: u32) -> Self {
        assert!(capacity > 0, "ring capacity must be at least 1");
        Self {
            next: 0,
            len: 0,
            abs_len: 0,
            capacity,
        }
    }

    /// Oldest live slot. Zero while empty.
    #[inline]
    #[must_use]
    pub const fn low(&self) -> u32 {
        if self.len == 0 {
            0
        } else {
            (self.next + self.capacity - self.len) % self.capacity
        }
    }

    /// Newest written slot. Zero while empty.
    #[inline]
    #[must_use]
    pub const fn high(&self) -> u32 {
        if self.len == 0 {
            0
        } else {
            (self.next + self.capacity - 1) % self.capacity
        }
    }

    /// Number of slots holding a record (live or expired).
    #[inline]
    #[must_use]
    pub const fn len(&self) -> u32 {
        self.len
    }

    /// Whether nothing has been emitted since construction or
    /// [`clear`](Self::clear).
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Total records ever emitted. Never decreases while the cursor lives.
    #[inline]
    #[must_use]
    pub const fn abs_len(&self) -> u64 {
        self.abs_len
    }

    /// Total slot count.
    #[inline]
    #[must_use]
    pub const fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Claims `n` consecutive slots (wrapping) and returns the first one.
    ///
    /// The caller writes records into slots `(start + i) % capacity` for
    /// `i` in `0..n`. `n` must not exceed `capacity`; the emitter clamps
    /// before calling.
    ///
    /// # Panics
    ///
    /// Panics if `n > capacity`.
    pub const fn bulk_advance(&mut self, n: u32) -> u32 {
        assert!(n <= self.capacity, "burst exceeds ring capacity");
        let start = self.next;
        self.next = (self.next + n) % self.capacity;
        self.len = if self.len + n > self.capacity {
            self.capacity
        } else {
            self.len + n
        };
        self.abs_len += n as u64;
        start
    }

    /// Returns to the empty state. Capacity is unchanged; `abs_len` restarts
    /// from zero.
    pub const fn clear(&mut self) {
        self.next = 0;
        self.len = 0;
        self.abs_len = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_then_grow_then_rotate() {
        let mut cursor = RingCursor::new(4);
        assert!(cursor.is_empty());

        // Seed.
        assert_eq!(cursor.push(), 0);
        assert_eq!((cursor.low(), cursor.high(), cursor.len()), (0, 0, 1));

        // Growing.
        assert_eq!(cursor.push(), 1);
        assert_eq!(cursor.push(), 2);
        assert_eq!(cursor.push(), 3);
        assert_eq!((cursor.low(), cursor.high(), cursor.len()), (0, 3, 4));
        assert!(cursor.is_full());

        // Full: low rotates with high.
        assert_eq!(cursor.push(), 0);
        assert_eq!((cursor.low(), cursor.high(), cursor.len()), (1, 0, 4));
    }

    #[test]
    fn len_and_low_follow_write_count() {
        // After k writes: len == min(k, cap); once full,
        // low == (k - cap) % cap and high == (k - 1) % cap.
        let cap = 4_u32;
        let mut cursor = RingCursor::new(cap);
        for k in 1..=11_u32 {
            cursor.push();
            assert_eq!(cursor.len(), k.min(cap), "len after {k} writes");
            assert_eq!(cursor.high(), (k - 1) % cap, "high after {k} writes");
            if k > cap {
                assert_eq!(cursor.low(), (k - cap) % cap, "low after {k} writes");
            } else {
                assert_eq!(cursor.low(), 0, "low while growing");
            }
        }
    }

    #[test]
    fn high_is_low_plus_len_minus_one() {
        let mut cursor = RingCursor::new(5);
        for _ in 0..13 {
            cursor.push();
            assert_eq!(
                cursor.high(),
                (cursor.low() + cursor.len() - 1) % cursor.capacity(),
                "ring invariant"
            );
        }
    }

    #[test]
    fn capacity_one_stays_on_slot_zero() {
        let mut cursor = RingCursor::new(1);
        assert_eq!(cursor.push(), 0);
        assert_eq!(cursor.push(), 0);
        assert_eq!((cursor.low(), cursor.high(), cursor.len()), (0, 0, 1));
    }

    #[test]
    fn clear_empties_without_touching_capacity() {
        let mut cursor = RingCursor::new(3);
        cursor.push();
        cursor.push();
        cursor.clear();
        assert!(cursor.is_empty());
        assert_eq!(cursor.capacity(), 3);
        assert_eq!(cursor.push(), 0);
    }

    #[test]
    fn particle_bulk_advance_wraps() {
        let mut cursor = ParticleCursor::new(8);
        assert_eq!(cursor.bulk_advance(3), 0);
        assert_eq!((cursor.low(), cursor.high(), cursor.len()), (0, 2, 3));

        assert_eq!(cursor.bulk_advance(7), 3);
        // 10 total writes into 8 slots: newest is slot 1, oldest slot 2.
        assert_eq!((cursor.low(), cursor.high(), cursor.len()), (2, 1, 8));
        assert_eq!(cursor.abs_len(), 10);
    }

    #[test]
    fn particle_len_tracks_abs_len_until_full() {
        let mut cursor = ParticleCursor::new(6);
        for n in [1, 2, 4, 5] {
            cursor.bulk_advance(n);
            assert_eq!(
                u64::from(cursor.len()),
                cursor.abs_len().min(u64::from(cursor.capacity())),
                "len == min(abs_len, capacity)"
            );
        }
        assert_eq!(cursor.abs_len(), 12);
    }

    #[test]
    fn particle_full_capacity_burst() {
        let mut cursor = ParticleCursor::new(4);
        cursor.bulk_advance(2);
        assert_eq!(cursor.bulk_advance(4), 2);
        assert_eq!(cursor.len(), 4);
        assert_eq!(cursor.high(), 1);
        assert_eq!(cursor.low(), 2);
    }

    #[test]
    #[should_panic(expected = "burst exceeds ring capacity")]
    fn particle_burst_over_capacity_panics() {
        let mut cursor = ParticleCursor::new(4);
        cursor.bulk_advance(5);
    }
}
