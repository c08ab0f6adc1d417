// Copyright 2026 the Wake Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Distance-driven particle spray.
//!
//! [`TrailParticles`] converts pose motion into spawn records at a fixed
//! number of particles per world-space unit travelled. Fractional spawn
//! budget carries over between frames in *distance* units, so many small
//! steps emit exactly as many particles as one large step of the same total
//! length.
//!
//! The instance store is a fixed ring of interleaved records; the shader
//! animates each particle from its seed and birth time alone, so the CPU
//! never revisits a record after writing it. Expiry is a shader-side
//! comparison of `elapsed - birth` against the lifetime, which is why the
//! frame clock here starts pre-advanced by one lifetime: every slot of a
//! freshly constructed ring reads as long expired instead of as a burst of
//! particles born at time zero.

use alloc::vec;
use alloc::vec::Vec;

use rand::rngs::SmallRng;
use rand::{Rng as _, SeedableRng as _};

use crate::backend::{RangeUploader, UploadTarget};
use crate::clock::{FrameClock, HostTime};
use crate::dirty::DirtyRanges;
use crate::error::ConfigError;
use crate::params::ParticleParams;
use crate::pose::{Pose, distance, lerp};
use crate::ring::ParticleCursor;

/// `f32` elements per interleaved instance record: seed, birth time, spawn
/// position xyz.
pub const PARTICLE_STRIDE: usize = 5;

/// Averaging window applied to per-frame spawn counts.
///
/// Fast pose jumps (teleports, hitches) otherwise dump a visible clump of
/// particles in one frame. Smoothing first clamps the raw count to
/// `ratio * average`, then emits the mean of the clamped count and the
/// running average, which becomes the new average.
#[derive(Clone, Copy, Debug)]
pub struct BurstSmoothing {
    /// Maximum allowed multiple of the running average, > 1.
    pub ratio: f32,
}

impl Default for BurstSmoothing {
    fn default() -> Self {
        Self { ratio: 4.0 }
    }
}

/// Particle spray configuration, fixed at construction.
#[derive(Clone, Debug)]
pub struct ParticleConfig {
    /// Ring capacity in particle records.
    pub capacity: u32,
    /// Seconds a particle lives after its birth time.
    pub lifetime: f32,
    /// Shader-facing particle size, forwarded via the parameter block.
    pub size: f32,
    /// Shader-facing initial speed, forwarded via the parameter block.
    pub velocity: f32,
    /// Particles spawned per world-space unit of pose travel. Zero or
    /// negative disables emission while motion tracking continues.
    pub emit_over_distance: f32,
    /// Per-axis jitter half-extent around the interpolated spawn point.
    pub spawn_radius: f32,
    /// Optional burst smoothing; `None` emits the raw per-frame count.
    pub smoothing: Option<BurstSmoothing>,
    /// Seed for the internal jitter generator, for reproducible runs.
    pub rng_seed: u64,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            capacity: 128,
            lifetime: 1.0,
            size: 0.2,
            velocity: 1.0,
            emit_over_distance: 10.0,
            spawn_radius: 0.1,
            smoothing: None,
            rng_seed: 0,
        }
    }
}

impl ParticleConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        if self.lifetime.is_nan() || self.lifetime <= 0.0 {
            return Err(ConfigError::NonPositiveLifetime { got: self.lifetime });
        }
        Ok(())
    }
}

/// Ring-buffered particle spray updater.
#[derive(Debug)]
pub struct TrailParticles {
    config: ParticleConfig,

    instances: Vec<f32>,
    dirty: DirtyRanges,

    cursor: ParticleCursor,
    last_pose: Option<Pose>,
    clock: FrameClock,
    emitting: bool,
    /// Fractional spawn budget in distance units, in `[0, 1/density)`.
    carry: f32,
    /// Running average for [`BurstSmoothing`], `None` until the first
    /// emitting frame.
    smoothed_average: Option<f32>,
    rng: SmallRng,
    params: ParticleParams,
}

impl TrailParticles {
    /// Creates a particle updater, validating the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for a zero capacity or non-positive
    /// lifetime.
    pub fn new(config: ParticleConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let instances = vec![0.0; config.capacity as usize * PARTICLE_STRIDE];
        let params = ParticleParams {
            lifetime: config.lifetime,
            size: config.size,
            velocity: config.velocity,
            // Matches the pre-advanced clock below.
            elapsed: config.lifetime,
            ..ParticleParams::default()
        };

        Ok(Self {
            cursor: ParticleCursor::new(config.capacity),
            instances,
            dirty: DirtyRanges::new(),
            last_pose: None,
            // Zero-initialized records have birth time 0; starting the
            // clock one lifetime in makes them all read as expired.
            clock: FrameClock::with_elapsed(config.lifetime),
            emitting: true,
            carry: 0.0,
            smoothed_average: None,
            rng: SmallRng::seed_from_u64(config.rng_seed),
            config,
            params,
        })
    }

    /// Per-frame update: measures pose travel since the previous call and
    /// spawns the corresponding whole number of particles along that path.
    pub fn update(&mut self, pose: &Pose, now: HostTime) {
        self.clock.advance(now);
        self.params.elapsed = self.clock.elapsed();
        if !self.emitting {
            return;
        }

        let Some(last) = self.last_pose else {
            self.last_pose = Some(*pose);
            return;
        };
        let travelled = distance(last.translation(), pose.translation());
        self.last_pose = Some(*pose);

        let density = self.config.emit_over_distance;
        if density.is_nan() || density <= 0.0 {
            // Emission disabled; the pose above still advanced so a later
            // re-enable does not see the whole idle span as travel.
            return;
        }

        let budget = (self.carry + travelled) * density;
        #[expect(
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss,
            reason = "budget is non-negative and truncation toward zero is the spawn-count floor"
        )]
        let mut n = budget as u32;
        #[expect(
            clippy::cast_precision_loss,
            reason = "spawn counts are far below f32 integer range"
        )]
        {
            self.carry = (budget - n as f32) / density;
        }
        if n == 0 {
            return;
        }

        if let Some(smoothing) = self.config.smoothing {
            n = self.smooth(n, smoothing.ratio);
            if n == 0 {
                return;
            }
        }

        if n > self.cursor.capacity() {
            log::debug!(
                "particle burst of {n} clamped to ring capacity {}",
                self.cursor.capacity()
            );
            n = self.cursor.capacity();
        }

        self.spawn(&last, pose, n);
        self.sync_cursor_params();
    }

    /// Discards the cursor, carry, smoothing history, and last pose.
    /// Emission is re-enabled; old records stay in the buffer and keep
    /// expiring on their own.
    pub fn reset(&mut self) {
        self.cursor.clear();
        self.last_pose = None;
        self.carry = 0.0;
        self.smoothed_average = None;
        self.emitting = true;
        self.clock.resync();
        self.sync_cursor_params();
    }

    /// Suppresses future emission. Live particles keep aging out.
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
    pub const fn params(&self) -> ParticleParams {
        self.params
    }

    /// Total particles emitted since construction (or the last
    /// [`reset`](Self::reset)), not bounded by capacity.
    #[must_use]
    pub const fn emitted_total(&self) -> u64 {
        self.cursor.abs_len()
    }

    /// Instances the backend should draw. Always the full ring: expired
    /// slots are culled in the shader, not on the CPU.
    #[must_use]
    pub const fn instance_count(&self) -> u32 {
        self.cursor.capacity()
    }

    /// The ring cursor, for consumers wanting occupancy statistics.
    #[must_use]
    pub const fn cursor(&self) -> &ParticleCursor {
        &self.cursor
    }

    /// The interleaved instance store: `capacity * 5` elements.
    #[must_use]
    pub fn instances(&self) -> &[f32] {
        &self.instances
    }

    /// Drains the dirty ranges accumulated since the previous flush into
    /// `uploader`, converting element spans to byte spans.
    pub fn flush(&mut self, uploader: &mut impl RangeUploader) {
        let Self {
            instances, dirty, ..
        } = self;
        dirty.drain(|r| {
            uploader.upload_range(
                UploadTarget::ParticleInstances,
                (r.start * 4) as u64,
                bytemuck::cast_slice(&instances[r.start..r.end()]),
            );
        });
    }

    // -- Internal --

    /// Applies the burst-smoothing window to a raw spawn count.
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss,
        reason = "spawn counts are small non-negative integers"
    )]
    fn smooth(&mut self, n: u32, ratio: f32) -> u32 {
        let average = self.smoothed_average.unwrap_or(n as f32);
        let clamped = (n as f32).min(average * ratio);
        let out = ((clamped + average) * 0.5) as u32;
        self.smoothed_average = Some(out as f32);
        out
    }

    /// Writes `n` records interpolated from `from` to `to` and marks the
    /// touched spans dirty.
    #[expect(
        clippy::cast_precision_loss,
        reason = "spawn counts are far below f32 integer range"
    )]
    fn spawn(&mut self, from: &Pose, to: &Pose, n: u32) {
        let start = self.cursor.bulk_advance(n);
        let capacity = self.cursor.capacity();
        let birth = self.clock.elapsed();
        let from_p = from.translation();
        let to_p = to.translation();
        let radius = self.config.spawn_radius;

        for i in 0..n {
            let slot = ((start + i) % capacity) as usize;
            let base = slot * PARTICLE_STRIDE;
            // Spread along the travelled segment, excluding the stale
            // previous-frame endpoint.
            let t = (i + 1) as f32 / n as f32;
            let mut p = lerp(from_p, to_p, t);
            for axis in &mut p {
                *axis += (self.rng.random::<f32>() * 2.0 - 1.0) * radius;
            }
            self.instances[base] = self.rng.random::<f32>();
            self.instances[base + 1] = birth;
            self.instances[base + 2..base + 5].copy_from_slice(&p);
        }

        let start = start as usize;
        let n = n as usize;
        let capacity = capacity as usize;
        if n == capacity {
            // A full-ring burst rewrites every slot exactly once.
            self.dirty.mark(0, capacity * PARTICLE_STRIDE);
        } else if start + n <= capacity {
            self.dirty.mark(start * PARTICLE_STRIDE, n * PARTICLE_STRIDE);
        } else {
            let tail = capacity - start;
            self.dirty
                .mark(start * PARTICLE_STRIDE, tail * PARTICLE_STRIDE);
            self.dirty.mark(0, (n - tail) * PARTICLE_STRIDE);
        }
    }

    #[expect(
        clippy::cast_precision_loss,
        reason = "cursor indices and counts are far below f32 integer range"
    )]
    fn sync_cursor_params(&mut self) {
        self.params.low = self.cursor.low() as f32;
        self.params.high = self.cursor.high() as f32;
        self.params.len = self.cursor.len() as f32;
        self.params.abs_len = self.cursor.abs_len() as f32;
    }
}
