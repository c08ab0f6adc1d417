// Copyright 2026 the Wake Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Ring-buffered trail updaters for motion-trail rendering.
//!
//! `wake_core` turns a per-frame stream of world-space poses into two GPU
//! vertex streams: a connected ribbon mesh that sweeps a fixed brush
//! cross-section along the motion path, and a particle spray emitted at a
//! fixed density per unit travelled. It is `no_std` compatible (with
//! `alloc`), allocates only at construction, and reports exactly which
//! byte ranges of its buffers changed each frame so uploads stay minimal.
//!
//! # Architecture
//!
//! The crate is organized around a frame loop that turns pose samples into
//! incremental buffer uploads:
//!
//! ```text
//!   Host (pose source)
//!       │
//!       ▼
//!   Pose + HostTime ──► TrailRibbon::update()    ─┐
//!                   ──► TrailParticles::update() ─┤
//!                                                 ▼
//!                                          DirtyRanges
//!                                                 │
//!                 ┌───────────────────────────────┘
//!                 ▼
//!   flush() ──► RangeUploader::upload_range() ──► GPU buffers
//!                                                 + params() uniforms
//! ```
//!
//! **[`ribbon`]** — [`TrailRibbon`](ribbon::TrailRibbon): fixed-capacity
//! ring of brush cross-sections with in-place triangle re-linking and the
//! unlink-ahead rule that keeps the head detached from stale data.
//!
//! **[`particle`]** — [`TrailParticles`](particle::TrailParticles):
//! distance-driven spawner with fractional budget carryover and optional
//! burst smoothing.
//!
//! **[`ring`]** — Cursor arithmetic shared by both updaters: single-step
//! [`RingCursor`](ring::RingCursor) and bulk-advance
//! [`ParticleCursor`](ring::ParticleCursor).
//!
//! **[`dirty`]** — Element-range dirty accumulation drained at flush time.
//!
//! **[`pose`]** — Column-major affine [`Pose`](pose::Pose) with the small
//! amount of point math the updaters need.
//!
//! **[`clock`]** — Host timestamps and the per-updater
//! [`FrameClock`](clock::FrameClock) that converts them into a monotone
//! elapsed-seconds value.
//!
//! **[`params`]** — Pod parameter blocks mirroring cursor and clock state
//! for the shading stage.
//!
//! **[`backend`]** — The [`RangeUploader`](backend::RangeUploader) trait
//! that rendering backends implement to receive byte-range uploads.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod backend;
pub mod clock;
pub mod dirty;
pub mod error;
pub mod params;
pub mod particle;
pub mod pose;
pub mod ribbon;
pub mod ring;
