// echosounder_core/src/footprint/lateral.rs

use nalgebra::Vector3;

use crate::calibration::{CameraIntrinsics, SensorExtrinsics};
use crate::footprint::{Footprint, FootprintProjector};

/// Approximates the beam footprint as a circle whose rim point sits
/// `radius` along the camera x axis from the centre.
///
/// This is exact only when a lateral camera-frame offset maps to a radial
/// pixel offset, i.e. roughly when the boresight faces the image plane.
#[derive(Debug, Clone, Copy, Default)]
pub struct LateralOffsetProjector;

impl FootprintProjector for LateralOffsetProjector {
    fn project(
        &self,
        extrinsics: &SensorExtrinsics,
        intrinsics: &CameraIntrinsics,
        distance: f64,
    ) -> Footprint {
        let radius = extrinsics.footprint_radius(distance);
        let center_point = extrinsics.point_at(distance);
        let edge_point = center_point + Vector3::new(radius, 0.0, 0.0);

        Footprint {
            radius,
            center_point,
            edge_point,
            center_px: intrinsics.project_direction(&center_point),
            edge_px: intrinsics.project_direction(&edge_point),
        }
    }
}
