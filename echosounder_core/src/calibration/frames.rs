// echosounder_core/src/calibration/frames.rs

use nalgebra::{Isometry3, Matrix3, Matrix4, Point3, Rotation3, Translation3, UnitQuaternion, Vector3};

use crate::calibration::extrinsics::{SensorExtrinsics, MIN_VECTOR_NORM};
use crate::error::{ConfigError, Result};

/// Smallest allowed `|up x direction|` before the sonar basis is considered
/// degenerate (direction parallel to up).
pub const MIN_BASIS_NORM: f64 = 1e-6;

/// The rigid transform `cTe`: parent camera, child echosounder.
///
/// The echosounder frame has its z axis on the boresight. Its x axis is
/// `normalize(up x direction)` and its y axis is `direction x x`, so the
/// three columns form a right-handed orthonormal basis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SonarToCamera {
    iso: Isometry3<f64>,
}

impl SonarToCamera {
    /// Builds `cTe` from the sensor extrinsics and the chosen "up" axis.
    ///
    /// Fails with [`ConfigError::DegenerateBoresight`] when the boresight is
    /// (anti)parallel to `up`; there is no fallback basis.
    pub fn from_extrinsics(extrinsics: &SensorExtrinsics, up: Vector3<f64>) -> Result<Self> {
        let up = up
            .try_normalize(MIN_VECTOR_NORM)
            .ok_or(ConfigError::ZeroUpVector)?;
        let r3 = extrinsics.direction.into_inner();

        let r1 = up.cross(&r3);
        if r1.norm() < MIN_BASIS_NORM {
            return Err(ConfigError::DegenerateBoresight);
        }
        let r1 = r1.normalize();
        let r2 = r3.cross(&r1);

        let rotation = Rotation3::from_matrix_unchecked(Matrix3::from_columns(&[r1, r2, r3]));
        let iso = Isometry3::from_parts(
            Translation3::from(extrinsics.position.coords),
            UnitQuaternion::from_rotation_matrix(&rotation),
        );

        Ok(Self { iso })
    }

    /// The transform as an isometry (camera <- echosounder).
    pub fn isometry(&self) -> &Isometry3<f64> {
        &self.iso
    }

    /// The transform as a homogeneous 4x4 matrix.
    pub fn to_homogeneous(&self) -> Matrix4<f64> {
        self.iso.to_homogeneous()
    }

    /// The point the beam hits at `distance`, assuming it lies exactly on the
    /// centre line, expressed in the camera frame.
    pub fn project_range(&self, distance: f64) -> Point3<f64> {
        self.iso * Point3::new(0.0, 0.0, distance)
    }
}

/// Moves a camera-frame point into the world frame using the camera pose
/// supplied by the tracker (`Twc`).
pub fn transform_to_world(point: &Point3<f64>, camera_to_world: &Isometry3<f64>) -> Point3<f64> {
    camera_to_world * point
}

/// Same as [`transform_to_world`] for hosts that keep poses as raw 4x4 matrices.
/// Returns `None` when the bottom row does not yield a finite, non-zero `w`.
pub fn transform_to_world_homogeneous(
    point: &Point3<f64>,
    camera_to_world: &Matrix4<f64>,
) -> Option<Point3<f64>> {
    let p = camera_to_world * point.to_homogeneous();
    Point3::from_homogeneous(p).filter(|p| p.coords.iter().all(|c| c.is_finite()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DEFAULT_WORLD_UP;
    use approx::assert_abs_diff_eq;

    fn extrinsics(position: Point3<f64>, direction: Vector3<f64>) -> SensorExtrinsics {
        SensorExtrinsics::new(position, direction, 0.1, true).unwrap()
    }

    #[test]
    fn test_forward_boresight_gives_identity_rotation() {
        let ext = extrinsics(Point3::origin(), Vector3::z());
        let c_t_e = SonarToCamera::from_extrinsics(&ext, DEFAULT_WORLD_UP).unwrap();
        // up x z = (0,1,0) x (0,0,1) = (1,0,0)
        assert_abs_diff_eq!(
            c_t_e.isometry().rotation.to_rotation_matrix().into_inner(),
            Matrix3::identity(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_basis_is_orthonormal_for_oblique_boresight() {
        let ext = extrinsics(Point3::new(0.05, 0.1, 0.0), Vector3::new(0.2, 0.6, 1.0));
        let c_t_e = SonarToCamera::from_extrinsics(&ext, DEFAULT_WORLD_UP).unwrap();
        let r = c_t_e.isometry().rotation.to_rotation_matrix().into_inner();
        assert_abs_diff_eq!(r.transpose() * r, Matrix3::identity(), epsilon = 1e-9);
        assert_abs_diff_eq!(r.determinant(), 1.0, epsilon = 1e-9);
        assert_abs_diff_eq!(r.column(2).into_owned(), ext.direction.into_inner(), epsilon = 1e-9);
    }

    #[test]
    fn test_range_point_lies_on_boresight() {
        let ext = extrinsics(Point3::new(0.1, -0.05, 0.02), Vector3::new(0.3, 0.4, 1.0));
        let c_t_e = SonarToCamera::from_extrinsics(&ext, DEFAULT_WORLD_UP).unwrap();
        for d in [0.0, 0.5, 2.0, 17.25] {
            let p = c_t_e.project_range(d);
            assert_abs_diff_eq!((p - ext.position).norm(), d, epsilon = 1e-9);
            assert_abs_diff_eq!(p, ext.point_at(d), epsilon = 1e-9);
        }
    }

    #[test]
    fn test_homogeneous_form_agrees_with_isometry() {
        let ext = extrinsics(Point3::new(0.1, -0.05, 0.02), Vector3::new(0.3, 0.4, 1.0));
        let c_t_e = SonarToCamera::from_extrinsics(&ext, DEFAULT_WORLD_UP).unwrap();
        let m = c_t_e.to_homogeneous();
        assert_abs_diff_eq!(m, c_t_e.isometry().to_homogeneous(), epsilon = 1e-12);
        let p = transform_to_world_homogeneous(&Point3::new(0.0, 0.0, 3.0), &m).unwrap();
        assert_abs_diff_eq!(p, c_t_e.project_range(3.0), epsilon = 1e-9);
    }

    #[test]
    fn test_boresight_parallel_to_up_is_rejected() {
        let ext = extrinsics(Point3::origin(), Vector3::new(0.0, -3.0, 0.0));
        assert_eq!(
            SonarToCamera::from_extrinsics(&ext, DEFAULT_WORLD_UP),
            Err(ConfigError::DegenerateBoresight)
        );
        // A different up axis makes the same boresight usable.
        assert!(SonarToCamera::from_extrinsics(&ext, Vector3::z()).is_ok());
    }

    #[test]
    fn test_zero_up_is_rejected() {
        let ext = extrinsics(Point3::origin(), Vector3::z());
        assert_eq!(
            SonarToCamera::from_extrinsics(&ext, Vector3::zeros()),
            Err(ConfigError::ZeroUpVector)
        );
    }

    #[test]
    fn test_transform_to_world_matches_homogeneous_variant() {
        let twc = Isometry3::new(Vector3::new(1.0, 2.0, 3.0), Vector3::new(0.0, 0.3, 0.0));
        let p = Point3::new(0.5, -0.2, 4.0);
        let a = transform_to_world(&p, &twc);
        let b = transform_to_world_homogeneous(&p, &twc.to_homogeneous()).unwrap();
        assert_abs_diff_eq!(a, b, epsilon = 1e-12);
    }

    #[test]
    fn test_homogeneous_pose_without_finite_w_is_rejected() {
        let p = Point3::new(0.5, -0.2, 4.0);

        let mut zero_w = Matrix4::identity();
        zero_w.set_row(3, &nalgebra::RowVector4::zeros());
        assert_eq!(transform_to_world_homogeneous(&p, &zero_w), None);

        let mut nan_pose = Matrix4::identity();
        nan_pose[(0, 3)] = f64::NAN;
        assert_eq!(transform_to_world_homogeneous(&p, &nan_pose), None);
    }
}
