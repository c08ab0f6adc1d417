// Copyright 2026 the Wake Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Minimal column-major 4×4 world pose.
//!
//! This type covers the subset of 3-D transforms the updaters actually
//! consume (translation extraction, stamping brush offsets into world
//! space) without pulling in a full linear-algebra crate. The layout
//! matches GPU APIs: 16 `f32` elements, column-major, with the translation
//! in elements 12/13/14.

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

/// A column-major 4×4 world transform stored as `[[f32; 4]; 4]`.
///
/// Each inner array is one *column* of the matrix. The updaters read only
/// the translation column and apply the matrix to brush offsets; rotation,
/// scale, and shear flow through untouched and uninterpreted.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pose {
    /// Four columns, each a 4-element array `[x, y, z, w]`.
    pub cols: [[f32; 4]; 4],
}

impl Pose {
    /// The 4×4 identity matrix.
    pub const IDENTITY: Self = Self {
        cols: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ],
    };

    /// Creates a pose from a column-major 16-element array.
    #[inline]
    #[must_use]
    pub const fn from_cols_array(m: &[f32; 16]) -> Self {
        Self {
            cols: [
                [m[0], m[1], m[2], m[3]],
                [m[4], m[5], m[6], m[7]],
                [m[8], m[9], m[10], m[11]],
                [m[12], m[13], m[14], m[15]],
            ],
        }
    }

    /// Creates a pure translation pose.
    #[inline]
    #[must_use]
    pub const fn from_translation(x: f32, y: f32, z: f32) -> Self {
        Self {
            cols: [
                [1.0, 0.0, 0.0, 0.0],
                [0.0, 1.0, 0.0, 0.0],
                [0.0, 0.0, 1.0, 0.0],
                [x, y, z, 1.0],
            ],
        }
    }

    /// Returns the translation column (elements 12/13/14 of the column-major
    /// layout).
    #[inline]
    #[must_use]
    pub const fn translation(&self) -> [f32; 3] {
        [self.cols[3][0], self.cols[3][1], self.cols[3][2]]
    }

    /// Applies the full transform to a point (w = 1, no perspective divide).
    #[inline]
    #[must_use]
    pub fn transform_point(&self, p: [f32; 3]) -> [f32; 3] {
        let c = &self.cols;
        [
            c[0][0] * p[0] + c[1][0] * p[1] + c[2][0] * p[2] + c[3][0],
            c[0][1] * p[0] + c[1][1] * p[1] + c[2][1] * p[2] + c[3][1],
            c[0][2] * p[0] + c[1][2] * p[1] + c[2][2] * p[2] + c[3][2],
        ]
    }

    /// Squared Euclidean distance between the translations of two poses.
    ///
    /// The cheap form used for the per-frame emit threshold test; no square
    /// root on the hot path.
    #[inline]
    #[must_use]
    pub fn distance_squared_to(&self, other: &Self) -> f32 {
        distance_squared(self.translation(), other.translation())
    }
}

impl Default for Pose {
    #[inline]
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Squared Euclidean distance between two points.
#[inline]
#[must_use]
pub fn distance_squared(a: [f32; 3], b: [f32; 3]) -> f32 {
    let dx = b[0] - a[0];
    let dy = b[1] - a[1];
    let dz = b[2] - a[2];
    dx * dx + dy * dy + dz * dz
}

/// Euclidean distance between two points.
#[inline]
#[must_use]
pub fn distance(a: [f32; 3], b: [f32; 3]) -> f32 {
    distance_squared(a, b).sqrt()
}

/// Linear interpolation between two points at fraction `t`.
#[inline]
#[must_use]
pub fn lerp(a: [f32; 3], b: [f32; 3], t: f32) -> [f32; 3] {
    [
        a[0] + (b[0] - a[0]) * t,
        a[1] + (b[1] - a[1]) * t,
        a[2] + (b[2] - a[2]) * t,
    ]
}
