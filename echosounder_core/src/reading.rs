// echosounder_core/src/reading.rs

use crate::calibration::{CameraIntrinsics, SensorExtrinsics};
use crate::footprint::{Footprint, FootprintProjector};
use crate::types::RangeSample;

/// Everything derived from a single ping. Built in one go by
/// [`ReadingState::from_sample`] and never modified afterwards, so a
/// reader always sees a consistent footprint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReadingState {
    /// One-way range: half of the raw reported distance.
    pub distance: f64,
    /// Sensor-reported confidence.
    pub confidence: i32,
    pub footprint: Footprint,
}

impl ReadingState {
    /// Converts a raw sample into a reading. Negative or zero ranges are
    /// accepted and yield a degenerate footprint; the confidence gate is
    /// what keeps them out of the pipeline.
    pub fn from_sample(
        sample: RangeSample,
        extrinsics: &SensorExtrinsics,
        intrinsics: &CameraIntrinsics,
        projector: &dyn FootprintProjector,
    ) -> Self {
        let distance = sample.raw_distance / 2.0;
        Self {
            distance,
            confidence: sample.confidence,
            footprint: projector.project(extrinsics, intrinsics, distance),
        }
    }
}

/// Decides whether a reading is trustworthy enough to act on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfidenceGate {
    pub enabled: bool,
    pub threshold: i32,
}

impl ConfidenceGate {
    pub fn new(enabled: bool, threshold: i32) -> Self {
        Self { enabled, threshold }
    }

    /// `true` only if the sensor is enabled, the range is positive, and the
    /// confidence reaches the threshold.
    pub fn is_confident(&self, reading: &ReadingState) -> bool {
        self.enabled && reading.distance > 0.0 && reading.confidence >= self.threshold
    }
}
