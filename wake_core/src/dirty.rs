// Copyright 2026 the Wake Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dirty-range accumulation.
//!
//! Each updater owns one [`DirtyRanges`] list per mutable backing store.
//! Buffer writes append the touched `(start, count)` span; once per frame
//! the updater drains the list into the backend's upload operation, in the
//! order recorded, and the list empties while keeping its allocation.
//!
//! Ranges are in buffer-element units (`f32` or `u16` elements); the flush
//! step converts to bytes. No coalescing is performed — correctness needs
//! only that the drained ranges cover exactly the elements written since
//! the previous drain. Overlap between ranges from separate writes (e.g.
//! refine frames rewriting the same head slot) is fine; the upload is
//! idempotent.

use alloc::vec::Vec;

/// A contiguous span of buffer elements touched since the last drain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DirtyRange {
    /// First element of the span.
    pub start: usize,
    /// Number of elements in the span.
    pub count: usize,
}

impl DirtyRange {
    /// One-past-the-end element of the span.
    #[inline]
    #[must_use]
    pub const fn end(&self) -> usize {
        self.start + self.count
    }
}

/// Ordered, append-only list of [`DirtyRange`]s for one buffer.
#[derive(Clone, Debug, Default)]
pub struct DirtyRanges {
    ranges: Vec<DirtyRange>,
}

impl DirtyRanges {
    /// Creates an empty list.
    #[must_use]
    pub const fn new() -> Self {
        Self { ranges: Vec::new() }
    }

    /// Appends a span. Zero-length spans are dropped.
    pub fn mark(&mut self, start: usize, count: usize) {
        if count == 0 {
            return;
        }
        self.ranges.push(DirtyRange { start, count });
    }

    /// Whether nothing has been marked since the last drain.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// The accumulated spans, oldest first.
    #[inline]
    #[must_use]
    pub fn ranges(&self) -> &[DirtyRange] {
        &self.ranges
    }

    /// Hands every span to `consume`, oldest first, then empties the list.
    ///
    /// The backing allocation is retained, so steady-state frames do not
    /// reallocate.
    pub fn drain(&mut self, mut consume: impl FnMut(DirtyRange)) {
        for range in &self.ranges {
            consume(*range);
        }
        self.ranges.clear();
    }

    /// Discards all accumulated spans without consuming them.
    pub fn clear(&mut self) {
        self.ranges.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn drain_preserves_order_and_clears() {
        let mut dirty = DirtyRanges::new();
        dirty.mark(10, 4);
        dirty.mark(0, 2);
        dirty.mark(10, 4);

        let mut seen = Vec::new();
        dirty.drain(|r| seen.push(r));
        assert_eq!(
            seen,
            vec![
                DirtyRange { start: 10, count: 4 },
                DirtyRange { start: 0, count: 2 },
                DirtyRange { start: 10, count: 4 },
            ]
        );
        assert!(dirty.is_empty());
    }

    #[test]
    fn zero_length_marks_are_dropped() {
        let mut dirty = DirtyRanges::new();
        dirty.mark(5, 0);
        assert!(dirty.is_empty());
    }

    #[test]
    fn drain_keeps_allocation() {
        let mut dirty = DirtyRanges::new();
        for i in 0..32 {
            dirty.mark(i, 1);
        }
        let cap = dirty.ranges.capacity();
        dirty.drain(|_| {});
        assert_eq!(dirty.ranges.capacity(), cap, "allocation retained");
    }

    #[test]
    fn range_end() {
        assert_eq!(DirtyRange { start: 3, count: 4 }.end(), 7);
    }
}
