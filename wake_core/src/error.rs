// Copyright 2026 the Wake Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Construction-time configuration errors.
//!
//! Updaters validate their configuration exactly once, in `new`. A
//! [`ConfigError`] is fatal to that instance; no partially-constructed
//! updater exists afterward. Everything that can go "wrong" per frame
//! (zero-distance motion, zero computed emission count, a burst larger than
//! the ring) is a silent skip or clamp, not an error.

use core::error::Error;
use core::fmt;

/// A rejected updater configuration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ConfigError {
    /// Ring capacity must be at least 1.
    ZeroCapacity,
    /// A brush cross-section needs at least two vertices to form a strip.
    BrushTooSmall {
        /// Number of vertices that were supplied.
        got: usize,
    },
    /// Fade lifetime must be positive.
    NonPositiveLifetime {
        /// The rejected lifetime, in seconds.
        got: f32,
    },
    /// `capacity * brush_vertices` exceeds the `u16` index range.
    IndexRangeOverflow {
        /// Total ring vertex count that was requested.
        vertices: usize,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroCapacity => write!(f, "ring capacity must be at least 1"),
            Self::BrushTooSmall { got } => {
                write!(f, "brush cross-section needs at least 2 vertices, got {got}")
            }
            Self::NonPositiveLifetime { got } => {
                write!(f, "lifetime must be positive, got {got}")
            }
            Self::IndexRangeOverflow { vertices } => {
                write!(
                    f,
                    "{vertices} ring vertices exceed the u16 index range ({})",
                    u16::MAX as usize + 1
                )
            }
        }
    }
}

impl Error for ConfigError {}
