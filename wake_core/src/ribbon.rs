// Copyright 2026 the Wake Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Continuous ribbon trail.
//!
//! [`TrailRibbon`] stamps a fixed "brush" cross-section into world space
//! every time the tracked pose has moved far enough, and keeps adjacent
//! cross-sections connected by a block of triangles. Cross-sections live in
//! a fixed-capacity ring: once full, each new stamp evicts the oldest one
//! in place, so the ribbon follows the pose at a bounded length while the
//! shading stage fades old cross-sections by birth time.
//!
//! # Connectivity and the unlink-ahead rule
//!
//! Each slot owns one *outgoing* block of `(V-1) * 2` triangles connecting
//! it to the following slot. The head's outgoing block is kept zeroed
//! (degenerate, non-rendering) until a successor is stamped; otherwise the
//! freshest cross-section would connect to whatever the slot one lap ahead
//! held previously, and the ribbon would flash a stale segment every time
//! the ring wraps.
//!
//! # Frame classification
//!
//! - *seed*: the very first update records the pose, stamps slot 0, and
//!   draws nothing.
//! - *advance*: squared motion since the last recorded pose exceeds the
//!   threshold; a new slot is stamped, linked, and unlinked ahead.
//! - *refine*: motion stayed below the threshold; the head slot is
//!   re-stamped in place so small jitter tracks continuously instead of
//!   snapping only at threshold crossings.

use alloc::vec;
use alloc::vec::Vec;

use crate::backend::{RangeUploader, UploadTarget};
use crate::clock::{FrameClock, HostTime};
use crate::dirty::DirtyRanges;
use crate::error::ConfigError;
use crate::params::RibbonParams;
use crate::pose::Pose;
use crate::ring::RingCursor;

/// `f32` elements per brush side-channel record: center xyz + birth time.
pub const BRUSH_DATA_STRIDE: usize = 4;

/// The default brush: a 2-point segment producing a flat ribbon.
pub const FLAT_BRUSH: [[f32; 3]; 2] = [[-1.0, 0.0, 0.0], [1.0, 0.0, 0.0]];

/// Ribbon configuration, fixed at construction.
#[derive(Clone, Debug)]
pub struct RibbonConfig {
    /// Ring capacity in cross-sections.
    pub capacity: u32,
    /// Ordered local-space brush offsets, at least two.
    pub brush: Vec<[f32; 3]>,
    /// Fade lifetime in seconds.
    pub lifetime: f32,
    /// Emit threshold in *squared* distance units: an advance happens when
    /// the squared distance from the last recorded pose exceeds this.
    pub emit_distance_sq: f32,
}

impl Default for RibbonConfig {
    fn default() -> Self {
        Self {
            capacity: 20,
            brush: FLAT_BRUSH.to_vec(),
            lifetime: 0.8,
            emit_distance_sq: 0.1,
        }
    }
}

impl RibbonConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        if self.brush.len() < 2 {
            return Err(ConfigError::BrushTooSmall {
                got: self.brush.len(),
            });
        }
        if self.lifetime.is_nan() || self.lifetime <= 0.0 {
            return Err(ConfigError::NonPositiveLifetime { got: self.lifetime });
        }
        let vertices = self.capacity as usize * self.brush.len();
        if vertices > u16::MAX as usize + 1 {
            return Err(ConfigError::IndexRangeOverflow { vertices });
        }
        Ok(())
    }
}

/// Ring-buffered ribbon trail updater.
///
/// Owns its vertex, index, and side-channel stores exclusively; the
/// rendering backend only ever sees read-only slices during
/// [`flush`](Self::flush). Nothing reallocates after construction.
#[derive(Debug)]
pub struct TrailRibbon {
    config: RibbonConfig,

    // -- Backing stores --
    positions: Vec<f32>,
    indices: Vec<u16>,
    brush_data: Vec<f32>,

    // -- Dirty tracking --
    dirty_positions: DirtyRanges,
    dirty_indices: DirtyRanges,
    dirty_brush: DirtyRanges,

    // -- Frame state --
    cursor: RingCursor,
    last_pose: Option<Pose>,
    clock: FrameClock,
    emitting: bool,
    visible_indices: u32,
    params: RibbonParams,
}

impl TrailRibbon {
    /// Creates a ribbon updater, validating the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for a zero capacity, a brush with fewer than
    /// two vertices, a non-positive lifetime, or a ring too large for `u16`
    /// indices.
    pub fn new(config: RibbonConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let capacity = config.capacity as usize;
        let brush_len = config.brush.len();
        let positions = vec![0.0; capacity * brush_len * 3];
        let indices = vec![0; capacity * (brush_len - 1) * 6];
        let brush_data = vec![0.0; capacity * BRUSH_DATA_STRIDE];

        #[expect(
            clippy::cast_precision_loss,
            reason = "slot counts are far below f32 integer range"
        )]
        let params = RibbonParams {
            max_slot: (config.capacity - 1) as f32,
            lifetime: config.lifetime,
            brush_edges: (brush_len - 1) as f32,
            ..RibbonParams::default()
        };

        Ok(Self {
            cursor: RingCursor::new(config.capacity),
            config,
            positions,
            indices,
            brush_data,
            dirty_positions: DirtyRanges::new(),
            dirty_indices: DirtyRanges::new(),
            dirty_brush: DirtyRanges::new(),
            last_pose: None,
            clock: FrameClock::new(),
            emitting: true,
            visible_indices: 0,
            params,
        })
    }

    /// Per-frame update: samples the world pose, advances or refines the
    /// ring, and records exactly the buffer ranges it wrote.
    ///
    /// The elapsed clock keeps running even while stopped, so fade-out of
    /// already-emitted cross-sections continues.
    pub fn update(&mut self, pose: &Pose, now: HostTime) {
        self.clock.advance(now);
        self.params.elapsed = self.clock.elapsed();
        if !self.emitting {
            return;
        }

        let Some(last) = self.last_pose else {
            // Seed: first sample, nothing to connect to yet.
            self.last_pose = Some(*pose);
            let slot = self.cursor.push();
            self.write_brush(slot, pose);
            self.visible_indices = 0;
            self.sync_cursor_params();
            return;
        };

        let distance_sq = last.distance_squared_to(pose);
        if distance_sq > self.config.emit_distance_sq {
            // Advance: stamp a new cross-section and re-link.
            self.last_pose = Some(*pose);
            let prev = self.cursor.high();
            let next = self.cursor.push();
            self.write_brush(next, pose);
            self.link(prev, next);
            self.unlink(next);
            #[expect(
                clippy::cast_possible_truncation,
                reason = "capacity * brush length is validated against the u16 range at construction"
            )]
            let indices_per_slot = self.indices_per_slot() as u32;
            self.visible_indices = self.cursor.len() * indices_per_slot;
        } else {
            // Refine: keep the head tracking sub-threshold motion.
            self.write_brush(self.cursor.high(), pose);
        }
        self.sync_cursor_params();
    }

    /// Discards the cursor and last-recorded pose, returning to the
    /// unseeded state. Emission is re-enabled.
    ///
    /// Buffers are *not* cleared: stale contents are inert (the next seed
    /// draws nothing, and growth re-stamps and re-links slots before they
    /// enter the visible range). The clock re-syncs so the next update
    /// contributes no delta; elapsed time is preserved.
    pub fn reset(&mut self) {
        self.cursor.clear();
        self.last_pose = None;
        self.emitting = true;
        self.visible_indices = 0;
        self.clock.resync();
    }

    /// Suppresses future emission. Data already written stays visible and
    /// continues to fade.
    pub fn stop(&mut self) {
        self.emitting = false;
    }

    /// Whether updates currently emit.
    #[must_use]
    pub const fn is_emitting(&self) -> bool {
        self.emitting
    }

    /// The current shader-facing parameter block.
    #[must_use]
    pub const fn params(&self) -> RibbonParams {
        self.params
    }

    /// Number of indices the backend should draw this frame.
    ///
    /// Never exceeds `capacity * (V-1) * 6`; grows monotonically while the
    /// ring fills, then stays constant. The head's zeroed outgoing block is
    /// inside this range and renders as degenerate triangles.
    #[must_use]
    pub const fn visible_index_count(&self) -> u32 {
        self.visible_indices
    }

    /// Ring capacity in cross-sections.
    #[must_use]
    pub const fn capacity(&self) -> u32 {
        self.config.capacity
    }

    /// Vertices per cross-section.
    #[must_use]
    pub fn brush_vertex_count(&self) -> usize {
        self.config.brush.len()
    }

    /// The ring cursor, for consumers wanting occupancy statistics.
    #[must_use]
    pub const fn cursor(&self) -> &RingCursor {
        &self.cursor
    }

    /// The vertex position store: `capacity * V * 3` elements.
    #[must_use]
    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    /// The triangle index store: `capacity * (V-1) * 6` elements.
    #[must_use]
    pub fn indices(&self) -> &[u16] {
        &self.indices
    }

    /// The per-slot side-channel: center xyz + birth time, 4 elements per
    /// slot.
    #[must_use]
    pub fn brush_data(&self) -> &[f32] {
        &self.brush_data
    }

    /// Drains the dirty ranges accumulated since the previous flush into
    /// `uploader`, converting element spans to byte spans.
    pub fn flush(&mut self, uploader: &mut impl RangeUploader) {
        let Self {
            positions,
            indices,
            brush_data,
            dirty_positions,
            dirty_indices,
            dirty_brush,
            ..
        } = self;
        dirty_positions.drain(|r| {
            uploader.upload_range(
                UploadTarget::RibbonPositions,
                (r.start * 4) as u64,
                bytemuck::cast_slice(&positions[r.start..r.end()]),
            );
        });
        dirty_indices.drain(|r| {
            uploader.upload_range(
                UploadTarget::RibbonIndices,
                (r.start * 2) as u64,
                bytemuck::cast_slice(&indices[r.start..r.end()]),
            );
        });
        dirty_brush.drain(|r| {
            uploader.upload_range(
                UploadTarget::RibbonBrushData,
                (r.start * 4) as u64,
                bytemuck::cast_slice(&brush_data[r.start..r.end()]),
            );
        });
    }

    // -- Internal geometry --

    /// Indices in one slot's outgoing link block: `(V-1) * 2` triangles.
    fn indices_per_slot(&self) -> usize {
        (self.config.brush.len() - 1) * 6
    }

    /// Stamps `slot` from `pose`: transforms every brush offset into world
    /// space and records the center + birth time side-channel entry.
    fn write_brush(&mut self, slot: u32, pose: &Pose) {
        let slot = slot as usize;
        let stride = self.config.brush.len() * 3;
        let base = slot * stride;
        for (i, offset) in self.config.brush.iter().enumerate() {
            let p = pose.transform_point(*offset);
            self.positions[base + i * 3..base + i * 3 + 3].copy_from_slice(&p);
        }
        self.dirty_positions.mark(base, stride);

        let center = pose.translation();
        let data_base = slot * BRUSH_DATA_STRIDE;
        self.brush_data[data_base..data_base + 3].copy_from_slice(&center);
        self.brush_data[data_base + 3] = self.clock.elapsed();
        self.dirty_brush.mark(data_base, BRUSH_DATA_STRIDE);
    }

    /// Writes the triangle block connecting cross-section `a` to `b` into
    /// `a`'s outgoing slot.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "capacity * brush length is validated against the u16 range at construction"
    )]
    fn link(&mut self, a: u32, b: u32) {
        let brush_len = self.config.brush.len();
        let span = self.indices_per_slot();
        let vert_a = a as usize * brush_len;
        let vert_b = b as usize * brush_len;
        let base = a as usize * span;
        for i in 0..brush_len - 1 {
            let face = base + i * 6;
            let a0 = (vert_a + i) as u16;
            let a1 = (vert_a + i + 1) as u16;
            let b0 = (vert_b + i) as u16;
            let b1 = (vert_b + i + 1) as u16;
            self.indices[face..face + 6].copy_from_slice(&[a0, b0, a1, b0, b1, a1]);
        }
        self.dirty_indices.mark(base, span);
    }

    /// Zeroes cross-section `a`'s outgoing block (the unlink-ahead rule).
    fn unlink(&mut self, a: u32) {
        let span = self.indices_per_slot();
        let base = a as usize * span;
        self.indices[base..base + span].fill(0);
        self.dirty_indices.mark(base, span);
    }

    #[expect(
        clippy::cast_precision_loss,
        reason = "cursor indices are far below f32 integer range"
    )]
    fn sync_cursor_params(&mut self) {
        self.params.low = self.cursor.low() as f32;
        self.params.high = self.cursor.high() as f32;
        self.params.len = self.cursor.len() as f32;
        self.params.lifetime = self.config.lifetime;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ribbon(capacity: u32) -> TrailRibbon {
        TrailRibbon::new(RibbonConfig {
            capacity,
            emit_distance_sq: 0.5,
            ..RibbonConfig::default()
        })
        .unwrap()
    }

    /// Drives one update with the pose at `x` and a 16 ms step.
    fn step(ribbon: &mut TrailRibbon, frame: &mut u64, x: f32) {
        *frame += 1;
        ribbon.update(
            &Pose::from_translation(x, 0.0, 0.0),
            HostTime::from_millis(*frame * 16),
        );
    }

    #[test]
    fn rejects_bad_configs() {
        let err = TrailRibbon::new(RibbonConfig {
            capacity: 0,
            ..RibbonConfig::default()
        });
        assert_eq!(err.unwrap_err(), ConfigError::ZeroCapacity);

        let err = TrailRibbon::new(RibbonConfig {
            brush: vec![[0.0, 0.0, 0.0]],
            ..RibbonConfig::default()
        });
        assert_eq!(err.unwrap_err(), ConfigError::BrushTooSmall { got: 1 });

        let err = TrailRibbon::new(RibbonConfig {
            lifetime: 0.0,
            ..RibbonConfig::default()
        });
        assert_eq!(
            err.unwrap_err(),
            ConfigError::NonPositiveLifetime { got: 0.0 }
        );

        let err = TrailRibbon::new(RibbonConfig {
            capacity: 40_000,
            ..RibbonConfig::default()
        });
        assert_eq!(
            err.unwrap_err(),
            ConfigError::IndexRangeOverflow { vertices: 80_000 }
        );
    }

    #[test]
    fn seed_draws_nothing() {
        let mut ribbon = ribbon(4);
        let mut frame = 0;
        step(&mut ribbon, &mut frame, 0.0);
        assert_eq!(ribbon.visible_index_count(), 0);
        assert_eq!(ribbon.cursor().len(), 1);

        // Slot 0 was stamped at the seed pose.
        assert_eq!(&ribbon.positions()[0..3], &[-1.0, 0.0, 0.0]);
        assert_eq!(&ribbon.positions()[3..6], &[1.0, 0.0, 0.0]);
        assert_eq!(&ribbon.brush_data()[0..4], &[0.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn ring_wraps_per_scenario_a() {
        // Capacity 4, threshold exceeded on every call, poses x = 0..=5:
        // 5 writes beyond capacity-4 growth leave low=1, high=0, len=4.
        let mut ribbon = ribbon(4);
        let mut frame = 0;
        for x in 0..=4 {
            step(&mut ribbon, &mut frame, x as f32);
        }
        let cursor = ribbon.cursor();
        assert_eq!(
            (cursor.low(), cursor.high(), cursor.len()),
            (1, 0, 4),
            "wrapped once"
        );

        step(&mut ribbon, &mut frame, 5.0);
        let cursor = ribbon.cursor();
        assert_eq!((cursor.low(), cursor.high(), cursor.len()), (2, 1, 4));
    }

    #[test]
    fn unlink_ahead_keeps_head_block_zeroed() {
        let mut ribbon = ribbon(4);
        let ips = ribbon.indices_per_slot();
        let mut frame = 0;
        for x in 0..12 {
            step(&mut ribbon, &mut frame, x as f32);
            if x == 0 {
                continue;
            }
            let head = ribbon.cursor().high() as usize;
            assert!(
                ribbon.indices()[head * ips..(head + 1) * ips]
                    .iter()
                    .all(|&i| i == 0),
                "head block must stay zeroed after the advance at x={x}"
            );
        }
    }

    #[test]
    fn link_block_connects_adjacent_cross_sections() {
        let mut ribbon = ribbon(4);
        let mut frame = 0;
        step(&mut ribbon, &mut frame, 0.0);
        step(&mut ribbon, &mut frame, 1.0);
        // Slot 0's outgoing block connects vertices {0,1} to {2,3}.
        assert_eq!(&ribbon.indices()[0..6], &[0, 2, 1, 2, 3, 1]);
    }

    #[test]
    fn visible_count_grows_then_saturates() {
        let mut ribbon = ribbon(4);
        let ips = ribbon.indices_per_slot();
        let mut frame = 0;
        let mut previous = 0;
        for x in 0..10 {
            step(&mut ribbon, &mut frame, x as f32);
            let visible = ribbon.visible_index_count() as usize;
            assert!(visible >= previous, "monotone while filling");
            assert!(visible <= 4 * ips, "bounded by capacity");
            previous = visible;
        }
        assert_eq!(previous, 4 * ips, "saturated at capacity");
    }

    #[test]
    fn refine_frame_rewrites_head_without_advancing() {
        let mut ribbon = ribbon(4);
        let mut frame = 0;
        step(&mut ribbon, &mut frame, 0.0);
        step(&mut ribbon, &mut frame, 1.0);
        let cursor_before = *ribbon.cursor();

        // Below the 0.5 squared threshold: refine.
        step(&mut ribbon, &mut frame, 1.2);
        assert_eq!(*ribbon.cursor(), cursor_before, "no ring motion");
        let head = ribbon.cursor().high() as usize;
        let base = head * ribbon.brush_vertex_count() * 3;
        assert_eq!(ribbon.positions()[base], 1.2 - 1.0, "head re-stamped");
    }

    #[test]
    fn refine_keeps_threshold_anchor() {
        // Refine frames must not move the emit anchor: many sub-threshold
        // steps that add up past the threshold still advance eventually.
        let mut ribbon = ribbon(8);
        let mut frame = 0;
        step(&mut ribbon, &mut frame, 0.0);
        let mut x = 0.0;
        for _ in 0..3 {
            x += 0.3; // 0.3^2 < 0.5 each step, but 0.9^2 > 0.5 total
            step(&mut ribbon, &mut frame, x);
        }
        assert_eq!(ribbon.cursor().len(), 2, "accumulated motion advanced once");
    }

    #[test]
    fn stop_freezes_ring_but_clock_runs() {
        let mut ribbon = ribbon(4);
        let mut frame = 0;
        step(&mut ribbon, &mut frame, 0.0);
        step(&mut ribbon, &mut frame, 1.0);
        ribbon.stop();
        let cursor_before = *ribbon.cursor();
        let elapsed_before = ribbon.params().elapsed;

        step(&mut ribbon, &mut frame, 5.0);
        assert_eq!(*ribbon.cursor(), cursor_before);
        assert!(ribbon.params().elapsed > elapsed_before, "fade continues");
    }

    #[test]
    fn reset_reenters_seed_and_leaves_buffers_untouched() {
        // Scenario C: reset mid-steady-state, then one more frame.
        let mut ribbon = ribbon(4);
        let mut frame = 0;
        for x in 0..7 {
            step(&mut ribbon, &mut frame, x as f32);
        }
        let positions_before = ribbon.positions().to_vec();
        let indices_before = ribbon.indices().to_vec();

        ribbon.reset();
        assert!(ribbon.cursor().is_empty());
        assert!(ribbon.is_emitting());

        step(&mut ribbon, &mut frame, 100.0);
        assert_eq!(ribbon.cursor().len(), 1, "seed path again");
        assert_eq!(ribbon.visible_index_count(), 0, "draw count reset");

        // Only slot 0's vertex span and side-channel entry changed.
        let stride = ribbon.brush_vertex_count() * 3;
        assert_eq!(
            &ribbon.positions()[stride..],
            &positions_before[stride..],
            "untouched slots byte-identical"
        );
        assert_eq!(ribbon.indices(), &indices_before[..], "no links written");
    }

    #[test]
    fn params_mirror_cursor_and_config() {
        let mut ribbon = ribbon(4);
        let mut frame = 0;
        for x in 0..3 {
            step(&mut ribbon, &mut frame, x as f32);
        }
        let params = ribbon.params();
        assert_eq!(params.low, 0.0);
        assert_eq!(params.high, 2.0);
        assert_eq!(params.len, 3.0);
        assert_eq!(params.max_slot, 3.0);
        assert_eq!(params.brush_edges, 1.0);
        assert_eq!(params.lifetime, 0.8);
    }

    #[test]
    fn capacity_one_is_degenerate_but_sound() {
        let mut ribbon = ribbon(1);
        let mut frame = 0;
        for x in 0..4 {
            step(&mut ribbon, &mut frame, x as f32);
        }
        // The single slot links to itself and is immediately unlinked, so
        // the whole index buffer stays degenerate.
        assert!(ribbon.indices().iter().all(|&i| i == 0));
        assert_eq!(ribbon.cursor().len(), 1);
    }

    #[test]
    fn multi_vertex_brush_links_every_edge() {
        let mut ribbon = TrailRibbon::new(RibbonConfig {
            capacity: 4,
            brush: vec![[-1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [1.0, 0.0, 0.0]],
            emit_distance_sq: 0.5,
            ..RibbonConfig::default()
        })
        .unwrap();
        let mut frame = 0;
        step(&mut ribbon, &mut frame, 0.0);
        step(&mut ribbon, &mut frame, 1.0);

        // V=3: two edges, 12 indices per slot; slot 0 connects 0..3 to 3..6.
        assert_eq!(ribbon.indices_per_slot(), 12);
        assert_eq!(
            &ribbon.indices()[0..12],
            &[0, 3, 1, 3, 4, 1, 1, 4, 2, 4, 5, 2]
        );
    }
}
