// echosounder_core/src/calibration/intrinsics.rs

use nalgebra::{Matrix3x4, Point2, Point3, Vector4};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// A simplified pinhole camera: a 3x4 projection with no skew and no distortion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraIntrinsics {
    /// The projection matrix
    /// ```text
    /// [ fx  0  cx  0 ]
    /// [  0 fy  cy  0 ]
    /// [  0  0   1  0 ]
    /// ```
    pub projection: Matrix3x4<f64>,
    /// Height, in pixels, of the images the intrinsics were calibrated against.
    pub calibration_image_height: u32,
}

impl CameraIntrinsics {
    pub fn new(fx: f64, fy: f64, cx: f64, cy: f64, calibration_image_height: u32) -> Result<Self> {
        if calibration_image_height == 0 {
            return Err(ConfigError::InvalidImageHeight(calibration_image_height));
        }

        #[rustfmt::skip]
        let projection = Matrix3x4::new(
            fx,  0.0, cx,  0.0,
            0.0, fy,  cy,  0.0,
            0.0, 0.0, 1.0, 0.0,
        );

        Ok(Self {
            projection,
            calibration_image_height,
        })
    }

    pub fn fx(&self) -> f64 {
        self.projection[(0, 0)]
    }

    pub fn fy(&self) -> f64 {
        self.projection[(1, 1)]
    }

    pub fn cx(&self) -> f64 {
        self.projection[(0, 2)]
    }

    pub fn cy(&self) -> f64 {
        self.projection[(1, 2)]
    }

    /// Lifts a pixel (at calibration resolution) back to the camera-frame
    /// point at depth `z`.
    pub fn back_project(&self, pixel: &Point2<f64>, z: f64) -> Point3<f64> {
        Point3::new(
            (pixel.x - self.cx()) / self.fx() * z,
            (pixel.y - self.cy()) / self.fy() * z,
            z,
        )
    }

    /// Projects a camera-frame point to pixel coordinates at calibration resolution.
    ///
    /// The point is lifted with a homogeneous coordinate of `0`, not `1`, so the
    /// last column of the projection never contributes. Points with `z == 0`
    /// produce non-finite pixels.
    pub fn project_direction(&self, point: &Point3<f64>) -> Point2<f64> {
        let homogeneous = Vector4::new(point.x, point.y, point.z, 0.0);
        let p = self.projection * homogeneous;
        Point2::new(p.x / p.z, p.y / p.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_optical_axis_lands_on_principal_point() {
        let intr = CameraIntrinsics::new(1.0, 1.0, 320.0, 240.0, 480).unwrap();
        let px = intr.project_direction(&Point3::new(0.0, 0.0, 2.0));
        assert_abs_diff_eq!(px, Point2::new(320.0, 240.0), epsilon = 1e-12);
    }

    #[test]
    fn test_projection_scales_with_focal_length() {
        let intr = CameraIntrinsics::new(500.0, 400.0, 320.0, 240.0, 480).unwrap();
        let px = intr.project_direction(&Point3::new(1.0, -1.0, 2.0));
        assert_abs_diff_eq!(px.x, 320.0 + 250.0, epsilon = 1e-9);
        assert_abs_diff_eq!(px.y, 240.0 - 200.0, epsilon = 1e-9);
    }

    #[test]
    fn test_back_project_inverts_projection() {
        let intr = CameraIntrinsics::new(520.0, 515.0, 318.0, 243.0, 480).unwrap();
        let p = Point3::new(0.4, -0.7, 3.5);
        let px = intr.project_direction(&p);
        assert_abs_diff_eq!(intr.back_project(&px, p.z), p, epsilon = 1e-9);
    }

    #[test]
    fn test_zero_height_is_rejected() {
        assert_eq!(
            CameraIntrinsics::new(1.0, 1.0, 0.0, 0.0, 0),
            Err(ConfigError::InvalidImageHeight(0))
        );
    }
}
