// Copyright 2026 the Wake Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shader-facing parameter blocks.
//!
//! Each updater maintains a small fixed vector of scalars that the
//! downstream shading stage consumes as a uniform block: the ring cursor,
//! the shared elapsed clock, the fade lifetime, and effect-specific extras.
//! The core writes these slots and does not interpret how they are
//! consumed. Both structs are `#[repr(C)]` and [`bytemuck::Pod`] so a
//! driver can upload them with `bytemuck::bytes_of` directly.
//!
//! Everything is `f32` (cursor indices included) because that is what a
//! uniform vector carries; `abs_len` loses integer precision past 2^24,
//! which consumers needing exact statistics avoid by reading
//! [`TrailParticles::emitted_total`](crate::particle::TrailParticles::emitted_total)
//! instead.

use bytemuck::{Pod, Zeroable};

/// Uniform block for the ribbon effect.
///
/// Layout: `cursor = (low, high, len, max_slot)` then
/// `time_info = (elapsed, lifetime)` then the brush edge count, padded to
/// 16-byte alignment.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct RibbonParams {
    /// Oldest occupied ring slot.
    pub low: f32,
    /// Newest occupied ring slot.
    pub high: f32,
    /// Occupied slot count.
    pub len: f32,
    /// Highest slot index, `capacity - 1`.
    pub max_slot: f32,
    /// Elapsed clock seconds.
    pub elapsed: f32,
    /// Fade lifetime in seconds.
    pub lifetime: f32,
    /// Brush edge count, `brush_vertices - 1`.
    pub brush_edges: f32,
    /// Padding to a 16-byte multiple for uniform-block layout rules.
    pub _pad: f32,
}

/// Uniform block for the particle effect.
///
/// Layout: `cursor = (low, high, len, abs_len)` then
/// `time_info = (elapsed, lifetime)` then `size` and `velocity`.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct ParticleParams {
    /// Oldest live ring slot.
    pub low: f32,
    /// Newest written ring slot.
    pub high: f32,
    /// Occupied slot count.
    pub len: f32,
    /// Total records ever emitted (lossy above 2^24).
    pub abs_len: f32,
    /// Elapsed clock seconds.
    pub elapsed: f32,
    /// Particle lifetime in seconds.
    pub lifetime: f32,
    /// Base particle size.
    pub size: f32,
    /// Base particle velocity scale.
    pub velocity: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blocks_are_uniform_sized() {
        // Two vec4s each; a size change here breaks every consumer's layout.
        assert_eq!(core::mem::size_of::<RibbonParams>(), 32);
        assert_eq!(core::mem::size_of::<ParticleParams>(), 32);
    }

    #[test]
    fn bytes_round_trip() {
        let params = ParticleParams {
            low: 1.0,
            high: 5.0,
            len: 5.0,
            abs_len: 5.0,
            elapsed: 0.25,
            lifetime: 1.0,
            size: 0.2,
            velocity: 1.0,
        };
        let bytes = bytemuck::bytes_of(&params);
        assert_eq!(bytes.len(), 32);
        assert_eq!(bytemuck::pod_read_unaligned::<ParticleParams>(bytes), params);
    }
}
