// echosounder_core/src/calibration/extrinsics.rs

use nalgebra::{Point3, Unit, Vector3};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Below this length a direction vector is treated as zero.
pub(crate) const MIN_VECTOR_NORM: f64 = 1e-9;

/// Where the echosounder sits on the camera rig and where it points.
/// Everything is expressed in the camera frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensorExtrinsics {
    /// Origin of the beam in the camera frame.
    pub position: Point3<f64>,
    /// Boresight of the beam. Always unit length.
    pub direction: Unit<Vector3<f64>>,
    /// Beam half-angle, in radians.
    pub half_angle: f64,
    /// Whether readings from this sensor should be trusted at all.
    pub enabled: bool,
}

impl SensorExtrinsics {
    /// Builds the extrinsics, normalizing `direction`.
    pub fn new(
        position: Point3<f64>,
        direction: Vector3<f64>,
        half_angle: f64,
        enabled: bool,
    ) -> Result<Self> {
        let direction =
            Unit::try_new(direction, MIN_VECTOR_NORM).ok_or(ConfigError::ZeroDirection)?;

        Ok(Self {
            position,
            direction,
            half_angle,
            enabled,
        })
    }

    /// The point on the boresight `distance` away from the sensor.
    pub fn point_at(&self, distance: f64) -> Point3<f64> {
        self.position + self.direction.into_inner() * distance
    }

    /// Radius of the beam footprint at `distance`.
    pub fn footprint_radius(&self, distance: f64) -> f64 {
        distance * self.half_angle.tan()
    }
}
