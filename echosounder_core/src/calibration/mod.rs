// echosounder_core/src/calibration/mod.rs

//! Calibration-time state: where the echosounder is, how the camera projects,
//! and the rigid transform between the two. Built once, never mutated.

pub mod extrinsics;
pub mod frames;
pub mod intrinsics;

pub use extrinsics::SensorExtrinsics;
pub use frames::{transform_to_world, transform_to_world_homogeneous, SonarToCamera};
pub use intrinsics::CameraIntrinsics;

use log::info;
use nalgebra::{Point3, Vector3};

use crate::error::Result;
use crate::settings::{self, SettingsSource};

/// Minimum sensor confidence accepted when the settings do not override it.
pub const DEFAULT_CONFIDENCE_THRESHOLD: i32 = 100;

/// Everything the fusion core learns from the settings file.
#[derive(Debug, Clone, PartialEq)]
pub struct Calibration {
    pub extrinsics: SensorExtrinsics,
    pub intrinsics: CameraIntrinsics,
    pub sonar_to_camera: SonarToCamera,
    /// Axis used as "up" when the sonar frame was built.
    pub up: Vector3<f64>,
    pub confidence_threshold: i32,
}

impl Calibration {
    /// Assembles a calibration from already-parsed parts.
    pub fn new(
        extrinsics: SensorExtrinsics,
        intrinsics: CameraIntrinsics,
        up: Vector3<f64>,
        confidence_threshold: i32,
    ) -> Result<Self> {
        let sonar_to_camera = SonarToCamera::from_extrinsics(&extrinsics, up)?;
        Ok(Self {
            extrinsics,
            intrinsics,
            sonar_to_camera,
            up,
            confidence_threshold,
        })
    }

    /// Reads every calibration key out of `source`.
    ///
    /// Missing required keys, non-finite values, a zero boresight, or a
    /// boresight parallel to "up" all fail here.
    pub fn from_settings(source: &dyn SettingsSource) -> Result<Self> {
        let position = Point3::new(
            source.required(settings::POSITION_X)?,
            source.required(settings::POSITION_Y)?,
            source.required(settings::POSITION_Z)?,
        );
        let direction = Vector3::new(
            source.required(settings::DIRECTION_X)?,
            source.required(settings::DIRECTION_Y)?,
            source.required(settings::DIRECTION_Z)?,
        );
        let half_angle = source.required(settings::HALF_ANGLE)?;
        let enabled = source.flag(settings::ENABLED)?;
        let extrinsics = SensorExtrinsics::new(position, direction, half_angle, enabled)?;

        let intrinsics = CameraIntrinsics::new(
            source.required(settings::PROJ_00)?,
            source.required(settings::PROJ_11)?,
            source.required(settings::PROJ_02)?,
            source.required(settings::PROJ_12)?,
            source.positive_integer(settings::IMAGE_HEIGHT)?,
        )?;

        let up = Vector3::new(
            source.optional(settings::UP_X, crate::types::DEFAULT_WORLD_UP.x)?,
            source.optional(settings::UP_Y, crate::types::DEFAULT_WORLD_UP.y)?,
            source.optional(settings::UP_Z, crate::types::DEFAULT_WORLD_UP.z)?,
        );
        let confidence_threshold = source
            .optional_integer(settings::CONFIDENCE_THRESHOLD, DEFAULT_CONFIDENCE_THRESHOLD)?;

        let calibration = Self::new(extrinsics, intrinsics, up, confidence_threshold)?;
        calibration.log_summary();
        Ok(calibration)
    }

    fn log_summary(&self) {
        let ext = &self.extrinsics;
        info!("Echosounder parameters:");
        info!("- position: {:?}", ext.position.coords.as_slice());
        info!("- direction: {:?}", ext.direction.as_slice());
        info!("- half angle: {} rad", ext.half_angle);
        info!("- enabled: {}", ext.enabled);
        info!("- confidence threshold: {}", self.confidence_threshold);
        info!("Camera parameters:");
        info!("- projection matrix: {}", self.intrinsics.projection);
        info!(
            "- calibration image height: {}",
            self.intrinsics.calibration_image_height
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;
    use approx::assert_abs_diff_eq;
    use std::collections::HashMap;

    fn base_settings() -> HashMap<String, f64> {
        [
            (settings::POSITION_X, 0.0),
            (settings::POSITION_Y, 0.0),
            (settings::POSITION_Z, 0.0),
            (settings::DIRECTION_X, 0.0),
            (settings::DIRECTION_Y, 0.0),
            (settings::DIRECTION_Z, 2.0),
            (settings::HALF_ANGLE, 0.1),
            (settings::ENABLED, 1.0),
            (settings::PROJ_00, 1.0),
            (settings::PROJ_02, 320.0),
            (settings::PROJ_11, 1.0),
            (settings::PROJ_12, 240.0),
            (settings::IMAGE_HEIGHT, 480.0),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
    }

    #[test]
    fn test_from_settings_reads_all_keys() {
        let cal = Calibration::from_settings(&base_settings()).unwrap();
        assert_abs_diff_eq!(cal.extrinsics.direction.z, 1.0, epsilon = 1e-12);
        assert_eq!(cal.intrinsics.calibration_image_height, 480);
        assert_eq!(cal.confidence_threshold, DEFAULT_CONFIDENCE_THRESHOLD);
        assert_eq!(cal.up, crate::types::DEFAULT_WORLD_UP);
        assert!(cal.extrinsics.enabled);
    }

    #[test]
    fn test_every_required_key_is_enforced() {
        for key in settings::REQUIRED_KEYS {
            let mut s = base_settings();
            s.remove(key);
            assert_eq!(
                Calibration::from_settings(&s),
                Err(ConfigError::MissingKey(key.to_string())),
                "removing '{}' should fail",
                key
            );
        }
    }

    #[test]
    fn test_optional_keys_override_defaults() {
        let mut s = base_settings();
        s.insert(settings::CONFIDENCE_THRESHOLD.to_string(), 75.0);
        s.insert(settings::UP_X.to_string(), 1.0);
        s.insert(settings::UP_Y.to_string(), 0.0);
        let cal = Calibration::from_settings(&s).unwrap();
        assert_eq!(cal.confidence_threshold, 75);
        assert_eq!(cal.up, Vector3::x());
    }

    #[test]
    fn test_malformed_confidence_threshold_fails_calibration() {
        for bad in [99.5, 1e12] {
            let mut s = base_settings();
            s.insert(settings::CONFIDENCE_THRESHOLD.to_string(), bad);
            assert_eq!(
                Calibration::from_settings(&s),
                Err(ConfigError::InvalidValue {
                    key: settings::CONFIDENCE_THRESHOLD.to_string(),
                    value: bad
                })
            );
        }
    }

    #[test]
    fn test_degenerate_boresight_fails_calibration() {
        let mut s = base_settings();
        s.insert(settings::DIRECTION_Y.to_string(), 1.0);
        s.insert(settings::DIRECTION_Z.to_string(), 0.0);
        assert_eq!(
            Calibration::from_settings(&s),
            Err(ConfigError::DegenerateBoresight)
        );
    }
}
