// Copyright 2026 the Wake Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! wgpu backend for wake trails.
//!
//! Owns the GPU-side buffers mirroring a [`TrailRibbon`] and
//! [`TrailParticles`] pair and forwards their dirty ranges through
//! [`wgpu::Queue::write_buffer`]. The crate stops at buffer management:
//! pipelines, bind groups, and shaders belong to the embedding renderer,
//! which reads the draw extents from
//! [`TrailRibbon::visible_index_count`] and
//! [`TrailParticles::instance_count`] and the shading inputs from the
//! updaters' parameter blocks.
//!
//! A frame looks like:
//!
//! ```ignore
//! ribbon.update(&pose, now);
//! particles.update(&pose, now);
//! buffers.flush(&queue, &mut ribbon, &mut particles);
//! // ... encode draws using buffers.ribbon_positions() etc.
//! ```

use wake_core::backend::{RangeUploader, UploadTarget};
use wake_core::particle::TrailParticles;
use wake_core::ribbon::TrailRibbon;

/// GPU buffers sized for one ribbon + particle updater pair.
///
/// Buffer sizes are fixed by the updaters' configured capacities, so a
/// [`TrailBuffers`] stays valid for the lifetime of the updaters it was
/// created from.
#[derive(Debug)]
pub struct TrailBuffers {
    ribbon_positions: wgpu::Buffer,
    ribbon_indices: wgpu::Buffer,
    ribbon_brush_data: wgpu::Buffer,
    particle_instances: wgpu::Buffer,
}

impl TrailBuffers {
    /// Allocates device buffers matching the updaters' store sizes and
    /// seeds them with the current (typically all-zero) contents.
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        ribbon: &TrailRibbon,
        particles: &TrailParticles,
    ) -> Self {
        let ribbon_positions = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("trail ribbon positions"),
            size: size_of_val(ribbon.positions()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let ribbon_indices = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("trail ribbon indices"),
            size: size_of_val(ribbon.indices()) as u64,
            usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let ribbon_brush_data = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("trail ribbon brush data"),
            size: size_of_val(ribbon.brush_data()) as u64,
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let particle_instances = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("trail particle instances"),
            size: size_of_val(particles.instances()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        log::debug!(
            "allocated trail buffers: {} ribbon slots, {} particle slots",
            ribbon.capacity(),
            particles.instance_count(),
        );

        queue.write_buffer(&ribbon_positions, 0, bytemuck::cast_slice(ribbon.positions()));
        queue.write_buffer(&ribbon_indices, 0, bytemuck::cast_slice(ribbon.indices()));
        queue.write_buffer(
            &ribbon_brush_data,
            0,
            bytemuck::cast_slice(ribbon.brush_data()),
        );
        queue.write_buffer(
            &particle_instances,
            0,
            bytemuck::cast_slice(particles.instances()),
        );

        Self {
            ribbon_positions,
            ribbon_indices,
            ribbon_brush_data,
            particle_instances,
        }
    }

    /// Drains both updaters' dirty ranges into the queue.
    pub fn flush(
        &self,
        queue: &wgpu::Queue,
        ribbon: &mut TrailRibbon,
        particles: &mut TrailParticles,
    ) {
        let mut uploader = QueueUploader {
            queue,
            buffers: self,
        };
        ribbon.flush(&mut uploader);
        particles.flush(&mut uploader);
    }

    /// Ribbon vertex positions, bound as a vertex buffer.
    #[must_use]
    pub const fn ribbon_positions(&self) -> &wgpu::Buffer {
        &self.ribbon_positions
    }

    /// Ribbon triangle indices (`u16`), bound as an index buffer.
    #[must_use]
    pub const fn ribbon_indices(&self) -> &wgpu::Buffer {
        &self.ribbon_indices
    }

    /// Per-slot center + birth time records, bound as a storage buffer so
    /// the vertex stage can index it by slot.
    #[must_use]
    pub const fn ribbon_brush_data(&self) -> &wgpu::Buffer {
        &self.ribbon_brush_data
    }

    /// Interleaved particle records, bound as a per-instance vertex
    /// buffer.
    #[must_use]
    pub const fn particle_instances(&self) -> &wgpu::Buffer {
        &self.particle_instances
    }
}

/// [`RangeUploader`] writing each range straight to the queue.
///
/// `write_buffer` requires 4-byte aligned offsets and sizes; every slot
/// layout in `wake_core` is a whole number of 4-byte elements, so ranges
/// arriving here always qualify.
#[derive(Debug)]
pub struct QueueUploader<'a> {
    queue: &'a wgpu::Queue,
    buffers: &'a TrailBuffers,
}

impl RangeUploader for QueueUploader<'_> {
    fn upload_range(&mut self, target: UploadTarget, byte_offset: u64, bytes: &[u8]) {
        let buffer = match target {
            UploadTarget::RibbonPositions => &self.buffers.ribbon_positions,
            UploadTarget::RibbonIndices => &self.buffers.ribbon_indices,
            UploadTarget::RibbonBrushData => &self.buffers.ribbon_brush_data,
            UploadTarget::ParticleInstances => &self.buffers.particle_instances,
        };
        self.queue.write_buffer(buffer, byte_offset, bytes);
    }
}
