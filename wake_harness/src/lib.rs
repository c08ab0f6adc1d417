// Copyright 2026 the Wake Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recording uploader and scripted drivers for demos and tests.
//!
//! [`RecordingUploader`] captures every range a trail updater flushes, so a
//! test (or a headless demo) can assert exactly what a real GPU queue
//! would have received. [`replay`] applies captured ranges onto a byte
//! snapshot, which turns "were the dirty ranges sufficient?" into a plain
//! byte comparison: snapshot the stores before a frame, replay the flush
//! onto the snapshot, and the result must equal the stores after.

#![no_std]

extern crate alloc;

use alloc::vec::Vec;

use wake_core::backend::{RangeUploader, UploadTarget};
use wake_core::clock::HostTime;
use wake_core::pose::Pose;

/// One captured upload, byte-exact.
#[derive(Clone, Debug, PartialEq)]
pub struct UploadRecord {
    /// Destination buffer.
    pub target: UploadTarget,
    /// Byte offset within the destination.
    pub byte_offset: u64,
    /// Uploaded bytes.
    pub bytes: Vec<u8>,
}

/// [`RangeUploader`] that stores every upload in order.
#[derive(Clone, Debug, Default)]
pub struct RecordingUploader {
    records: Vec<UploadRecord>,
}

impl RecordingUploader {
    /// Creates an empty recorder.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    /// All records captured so far, in upload order.
    #[must_use]
    pub fn records(&self) -> &[UploadRecord] {
        &self.records
    }

    /// Records addressed to `target`, in upload order.
    pub fn records_for(&self, target: UploadTarget) -> impl Iterator<Item = &UploadRecord> {
        self.records.iter().filter(move |r| r.target == target)
    }

    /// Total payload bytes captured, across all targets.
    #[must_use]
    pub fn bytes_uploaded(&self) -> usize {
        self.records.iter().map(|r| r.bytes.len()).sum()
    }

    /// Forgets all captured records.
    pub fn clear(&mut self) {
        self.records.clear();
    }
}

impl RangeUploader for RecordingUploader {
    fn upload_range(&mut self, target: UploadTarget, byte_offset: u64, bytes: &[u8]) {
        self.records.push(UploadRecord {
            target,
            byte_offset,
            bytes: bytes.to_vec(),
        });
    }
}

/// Applies every record addressed to `target` onto `snapshot`, in order.
///
/// # Panics
///
/// Panics if a record reaches past the end of `snapshot`, which means the
/// updater emitted a range outside its own buffer.
pub fn replay(records: &[UploadRecord], target: UploadTarget, snapshot: &mut [u8]) {
    for record in records.iter().filter(|r| r.target == target) {
        let start = usize::try_from(record.byte_offset).expect("offset fits usize");
        let end = start + record.bytes.len();
        assert!(
            end <= snapshot.len(),
            "record [{start}..{end}) exceeds {} byte buffer",
            snapshot.len()
        );
        snapshot[start..end].copy_from_slice(&record.bytes);
    }
}

/// Fixed-interval frame timestamps.
///
/// `next()` yields `start + interval`, `start + 2 * interval`, and so on;
/// the scripted frame loop stays deterministic without a real clock.
#[derive(Clone, Copy, Debug)]
pub struct ScriptedDriver {
    start: HostTime,
    interval_nanos: u64,
    frame: u64,
}

impl Default for ScriptedDriver {
    /// 60 Hz starting at time zero.
    fn default() -> Self {
        Self::new(HostTime(0), 16_666_667)
    }
}

impl ScriptedDriver {
    /// Creates a driver ticking every `interval_nanos` after `start`.
    #[must_use]
    pub const fn new(start: HostTime, interval_nanos: u64) -> Self {
        Self {
            start,
            interval_nanos,
            frame: 0,
        }
    }

    /// The next frame's timestamp.
    pub const fn next(&mut self) -> HostTime {
        self.frame += 1;
        HostTime(self.start.0 + self.frame * self.interval_nanos)
    }

    /// Frames issued so far.
    #[must_use]
    pub const fn frames(&self) -> u64 {
        self.frame
    }
}

/// A pose translated to `(x, 0, 0)`, the usual scripted straight-line
/// path.
#[must_use]
pub fn pose_at(x: f32) -> Pose {
    Pose::from_translation(x, 0.0, 0.0)
}
