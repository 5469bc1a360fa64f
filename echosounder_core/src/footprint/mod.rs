// echosounder_core/src/footprint/mod.rs

pub mod lateral;

pub use lateral::LateralOffsetProjector;

use dyn_clone::DynClone;
use nalgebra::{Point2, Point3};
use std::fmt::Debug;

use crate::calibration::{CameraIntrinsics, SensorExtrinsics};

/// The patch of seabed (or whatever the beam hits) covered by one ping,
/// both in the camera frame and projected into the image at calibration
/// resolution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Footprint {
    /// Radius of the footprint in the camera frame.
    pub radius: f64,
    /// Centre of the footprint in the camera frame.
    pub center_point: Point3<f64>,
    /// A point on the footprint's rim in the camera frame.
    pub edge_point: Point3<f64>,
    /// Pixel position of `center_point` at calibration resolution.
    pub center_px: Point2<f64>,
    /// Pixel position of `edge_point` at calibration resolution.
    pub edge_px: Point2<f64>,
}

/// The contract for anything that turns a range into an image-space footprint.
///
/// The matching predicate only ever looks at `center_px` and `edge_px`, so a
/// projector is free to model the beam however it likes as long as it fills
/// those in.
pub trait FootprintProjector: Send + Sync + DynClone + Debug {
    /// Computes the footprint of a ping that measured `distance` (one-way).
    fn project(
        &self,
        extrinsics: &SensorExtrinsics,
        intrinsics: &CameraIntrinsics,
        distance: f64,
    ) -> Footprint;
}

// Make the trait object cloneable.
dyn_clone::clone_trait_object!(FootprintProjector);
