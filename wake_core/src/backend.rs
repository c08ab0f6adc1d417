// Copyright 2026 the Wake Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Backend contract for rendering integrations.
//!
//! `wake` splits GPU-specific work into *backend* crates. A backend
//! provides the following pieces:
//!
//! - **GPU buffers** — One device buffer per [`UploadTarget`], sized to the
//!   corresponding updater backing store (e.g. `wake_backend_wgpu`'s
//!   `TrailBuffers`).
//!
//! - **Uploader** — Implements [`RangeUploader`] so the updaters' `flush`
//!   can push only the byte ranges that changed this frame.
//!
//! - **Draw bounds** — Reads
//!   [`TrailRibbon::visible_index_count`](crate::ribbon::TrailRibbon::visible_index_count)
//!   and
//!   [`TrailParticles::instance_count`](crate::particle::TrailParticles::instance_count)
//!   to parameterize its draw calls, and uploads the
//!   [`params`](crate::params) block as a uniform.
//!
//! # Crate boundaries
//!
//! `wake_core` owns the sample rings, buffer contents, and dirty-range
//! bookkeeping. Backend crates own device resources and the upload/draw
//! submission. Application code (the frame driver) owns the world pose and
//! the monotonic clock and wires everything together.
//!
//! # Frame loop pseudocode
//!
//! ```rust,ignore
//! fn on_frame(pose: &Pose, now: HostTime) {
//!     // Update: advance the ring, mutate buffers, record dirty ranges.
//!     ribbon.update(pose, now);
//!
//!     // Upload: push exactly the changed ranges, then the uniforms.
//!     ribbon.flush(&mut uploader);
//!     queue.write_buffer(&uniforms, 0, bytemuck::bytes_of(&ribbon.params()));
//!
//!     // Draw: bounded by the updater's visible-element count.
//!     pass.draw_indexed(0..ribbon.visible_index_count(), 0, 0..1);
//! }
//! ```
//!
//! The upload step must run strictly after the update step within the same
//! frame; the core hands out read-only slices during `flush` and mutates
//! nothing concurrently.

/// Identifies which backing store a flushed range belongs to.
///
/// No two updaters share a target, so an uploader can route each range to
/// its device buffer without further bookkeeping.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UploadTarget {
    /// Ribbon cross-section vertex positions (`f32` triples).
    RibbonPositions,
    /// Ribbon triangle indices (`u16`).
    RibbonIndices,
    /// Ribbon per-slot side-channel: center xyz + birth time (`f32` quads).
    RibbonBrushData,
    /// Interleaved particle records: seed, birth time, position (`f32`,
    /// stride 5).
    ParticleInstances,
}

/// Receives the byte ranges an updater changed this frame.
///
/// `byte_offset` is the destination offset within the target's device
/// buffer; `bytes` is the corresponding read-only slice of the core-side
/// store. Offsets and lengths are always multiples of 4 (every slot layout
/// works out to whole `f32` quads or `u16` index sextets), which keeps
/// `wgpu`'s copy alignment rules satisfied without padding.
pub trait RangeUploader {
    /// Uploads one contiguous changed range.
    fn upload_range(&mut self, target: UploadTarget, byte_offset: u64, bytes: &[u8]);
}
